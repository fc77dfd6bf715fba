//! codestroke-eligibility
//!
//! Contraindication catalogs and the eligibility evaluator. Pure rules,
//! no storage dependency. A catalog lists the findings a clinician can
//! toggle; the evaluator reduces the toggled set to a status.

pub mod catalogs;
pub mod error;
pub mod evaluator;
pub mod finding;

use codestroke_core::models::eligibility::FindingTier;

use finding::Finding;

/// Trait implemented by each contraindication rule set.
pub trait ContraindicationCatalog: Send + Sync {
    /// Unique identifier (e.g., "thrombolysis").
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Every finding, across all tiers, in display order.
    fn findings(&self) -> &[Finding];

    fn finding(&self, id: &str) -> Option<&Finding> {
        self.findings().iter().find(|f| f.id == id)
    }

    fn findings_in(&self, tier: FindingTier) -> Vec<&Finding> {
        self.findings().iter().filter(|f| f.tier == tier).collect()
    }

    /// Findings the clinician should be offered. Window-dependent ones
    /// are hidden while they cannot affect the verdict.
    fn visible_findings(&self, window_findings_active: bool) -> Vec<&Finding> {
        self.findings()
            .iter()
            .filter(|f| window_findings_active || f.tier != FindingTier::WindowDependent)
            .collect()
    }
}

/// Return all registered catalogs.
pub fn all_catalogs() -> Vec<Box<dyn ContraindicationCatalog>> {
    vec![Box::new(catalogs::thrombolysis::Thrombolysis)]
}

/// Look up a catalog by ID.
pub fn get_catalog(id: &str) -> Option<Box<dyn ContraindicationCatalog>> {
    all_catalogs().into_iter().find(|c| c.id() == id)
}
