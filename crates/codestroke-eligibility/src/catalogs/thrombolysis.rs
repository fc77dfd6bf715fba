use codestroke_core::models::eligibility::FindingTier;

use crate::ContraindicationCatalog;
use crate::finding::Finding;

/// IV thrombolysis contraindications (alteplase / tenecteplase).
/// Absolute and relative findings apply at any onset time; the
/// window-dependent set applies only between 3 and 4.5 hours.
pub struct Thrombolysis;

impl ContraindicationCatalog for Thrombolysis {
    fn id(&self) -> &str {
        "thrombolysis"
    }

    fn name(&self) -> &str {
        "IV Thrombolysis"
    }

    fn findings(&self) -> &[Finding] {
        static FINDINGS: std::sync::LazyLock<Vec<Finding>> = std::sync::LazyLock::new(|| {
            use FindingTier::{Absolute, Relative, WindowDependent};

            vec![
                // Absolute
                Finding::new("ich_on_imaging", "Intracranial hemorrhage on imaging", Absolute),
                Finding::new("prior_ich", "History of intracranial hemorrhage", Absolute),
                Finding::new(
                    "recent_head_trauma",
                    "Severe head trauma or ischemic stroke within 3 months",
                    Absolute,
                ),
                Finding::new(
                    "recent_neurosurgery",
                    "Intracranial or intraspinal surgery within 3 months",
                    Absolute,
                ),
                Finding::new(
                    "intracranial_neoplasm",
                    "Intra-axial intracranial neoplasm",
                    Absolute,
                ),
                Finding::new("active_bleeding", "Active internal bleeding", Absolute),
                Finding::new("gi_bleed_21d", "GI bleeding within 21 days", Absolute),
                Finding::new(
                    "coagulopathy",
                    "Platelets < 100,000, INR > 1.7, aPTT > 40 s, or PT > 15 s",
                    Absolute,
                ),
                Finding::new(
                    "heparin_24h",
                    "Treatment-dose LMWH within 24 hours",
                    Absolute,
                ),
                Finding::new(
                    "doac_48h",
                    "Direct oral anticoagulant within 48 hours",
                    Absolute,
                )
                .describe("Unless drug-specific labs are normal or the last dose was over 48 hours ago"),
                Finding::new("aortic_dissection", "Suspected aortic arch dissection", Absolute),
                Finding::new("endocarditis", "Infective endocarditis", Absolute),
                Finding::new(
                    "extensive_hypodensity",
                    "Extensive regions of clear hypodensity on CT",
                    Absolute,
                ),
                // Relative
                Finding::new(
                    "minor_nondisabling",
                    "Minor, non-disabling deficits",
                    Relative,
                ),
                Finding::new("pregnancy", "Pregnancy or early postpartum", Relative),
                Finding::new(
                    "seizure_at_onset",
                    "Seizure at onset with postictal impairment",
                    Relative,
                ),
                Finding::new(
                    "major_surgery_14d",
                    "Major surgery or serious trauma within 14 days",
                    Relative,
                ),
                Finding::new("gu_bleed_21d", "Genitourinary bleeding within 21 days", Relative),
                Finding::new("recent_mi", "Myocardial infarction within 3 months", Relative),
                Finding::new(
                    "arterial_puncture_7d",
                    "Arterial puncture at a non-compressible site within 7 days",
                    Relative,
                ),
                Finding::new(
                    "unruptured_aneurysm",
                    "Unruptured intracranial aneurysm or vascular malformation",
                    Relative,
                ),
                Finding::new(
                    "glucose_extreme",
                    "Glucose < 50 or > 400 mg/dL",
                    Relative,
                )
                .describe("Correct and reassess before deciding"),
                // 3 to 4.5 hours
                Finding::new("age_over_80", "Age over 80", WindowDependent),
                Finding::new("severity_over_25", "Severity score over 25", WindowDependent),
                Finding::new(
                    "oral_anticoagulant",
                    "Taking an oral anticoagulant regardless of INR",
                    WindowDependent,
                ),
                Finding::new(
                    "diabetes_and_prior_stroke",
                    "History of both diabetes and prior ischemic stroke",
                    WindowDependent,
                ),
            ]
        });
        &FINDINGS
    }
}
