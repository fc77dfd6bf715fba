use jiff::Timestamp;
use tracing::{debug, info};

use codestroke_core::models::eligibility::{
    EligibilityStatus, FindingSelection, FindingTier, SavedEligibility,
};
use codestroke_core::window;

use crate::ContraindicationCatalog;
use crate::error::EligibilityError;
use crate::finding::Finding;

/// Reduce a selection to a status.
///
/// Precedence: any absolute finding, or any window-dependent finding
/// while those are active, is absolute. Otherwise any relative finding
/// is relative. Window-dependent selections made while inactive never
/// count, however they got there.
pub fn evaluate_selection(
    selection: &FindingSelection,
    window_findings_active: bool,
) -> EligibilityStatus {
    let window_hit = window_findings_active && !selection.window_dependent.is_empty();
    if !selection.absolute.is_empty() || window_hit {
        EligibilityStatus::AbsoluteContraindication
    } else if !selection.relative.is_empty() {
        EligibilityStatus::RelativeContraindication
    } else {
        EligibilityStatus::NoContraindicationsFlagged
    }
}

/// An open eligibility review. Toggle findings, read the live status,
/// then [`save`](Evaluator::save) to freeze it.
pub struct Evaluator {
    catalog: Box<dyn ContraindicationCatalog>,
    onset: Option<Timestamp>,
    selection: FindingSelection,
    notes: String,
}

impl Evaluator {
    pub fn new(catalog: Box<dyn ContraindicationCatalog>, onset: Option<Timestamp>) -> Self {
        Self {
            catalog,
            onset,
            selection: FindingSelection::default(),
            notes: String::new(),
        }
    }

    /// Re-open a saved review against the current onset. Selections and
    /// notes carry over; the status is recomputed live.
    pub fn reopen(
        catalog: Box<dyn ContraindicationCatalog>,
        saved: &SavedEligibility,
        onset: Option<Timestamp>,
    ) -> Self {
        Self {
            catalog,
            onset,
            selection: saved.selection.clone(),
            notes: saved.notes.clone(),
        }
    }

    pub fn catalog(&self) -> &dyn ContraindicationCatalog {
        self.catalog.as_ref()
    }

    pub fn onset(&self) -> Option<Timestamp> {
        self.onset
    }

    /// Follow a corrected LKW. Selections are kept; status and the
    /// window-finding gate are re-derived from the new onset.
    pub fn set_onset(&mut self, onset: Option<Timestamp>) {
        if self.onset != onset {
            debug!(previous = ?self.onset, current = ?onset, "review onset updated");
            self.onset = onset;
        }
    }

    pub fn selection(&self) -> &FindingSelection {
        &self.selection
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn elapsed_hours(&self, now: Timestamp) -> Option<f64> {
        window::onset_elapsed_hours(self.onset, now)
    }

    pub fn window_findings_active(&self, now: Timestamp) -> bool {
        window::window_findings_apply(self.elapsed_hours(now))
    }

    pub fn visible_findings(&self, now: Timestamp) -> Vec<&Finding> {
        self.catalog.visible_findings(self.window_findings_active(now))
    }

    pub fn is_selected(&self, finding_id: &str) -> bool {
        self.catalog
            .finding(finding_id)
            .is_some_and(|f| self.selection.tier(f.tier).contains(finding_id))
    }

    /// Select or deselect a finding. Window-dependent findings can only be
    /// selected while they are offered at `now`; deselecting always works.
    pub fn set(&mut self, finding_id: &str, selected: bool, now: Timestamp) -> Result<(), EligibilityError> {
        let tier = self.tier_of(finding_id)?;
        if selected && tier == FindingTier::WindowDependent && !self.window_findings_active(now) {
            debug!(finding = finding_id, elapsed_hours = ?self.elapsed_hours(now), "window-dependent finding not offered");
            return Err(EligibilityError::FindingNotOffered {
                finding_id: finding_id.to_string(),
            });
        }
        let set = self.selection.tier_mut(tier);
        if selected {
            set.insert(finding_id.to_string());
        } else {
            set.remove(finding_id);
        }
        if tier == FindingTier::WindowDependent {
            debug!(finding = finding_id, selected, "window-dependent finding toggled");
        }
        Ok(())
    }

    /// Flip one finding. Returns its new state.
    pub fn toggle(&mut self, finding_id: &str, now: Timestamp) -> Result<bool, EligibilityError> {
        let selected = !self.is_selected(finding_id);
        self.set(finding_id, selected, now)?;
        Ok(selected)
    }

    pub fn clear(&mut self) {
        self.selection = FindingSelection::default();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn status(&self, now: Timestamp) -> EligibilityStatus {
        evaluate_selection(&self.selection, self.window_findings_active(now))
    }

    /// Freeze the review. Elapsed hours are copied by value: the saved
    /// record is what was known at `now` and never tracks the clock.
    /// Window-dependent selections that no longer apply are left out.
    pub fn save(&self, now: Timestamp) -> SavedEligibility {
        let elapsed = self.elapsed_hours(now);
        let applied = window::window_findings_apply(elapsed);
        let mut selection = self.selection.clone();
        if !applied {
            selection.window_dependent.clear();
        }
        let status = evaluate_selection(&selection, applied);
        info!(
            catalog = self.catalog.id(),
            status = ?status,
            elapsed_hours = ?elapsed,
            window_findings_applied = applied,
            "eligibility review saved"
        );
        SavedEligibility {
            catalog: self.catalog.id().to_string(),
            status,
            selection,
            window_findings_applied: applied,
            onset: self.onset,
            elapsed_hours_at_save: elapsed,
            notes: self.notes.clone(),
            saved_at: now,
        }
    }

    fn tier_of(&self, finding_id: &str) -> Result<FindingTier, EligibilityError> {
        self.catalog
            .finding(finding_id)
            .map(|f| f.tier)
            .ok_or_else(|| EligibilityError::UnknownFinding {
                catalog_id: self.catalog.id().to_string(),
                finding_id: finding_id.to_string(),
            })
    }
}
