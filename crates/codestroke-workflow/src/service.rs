use std::sync::Arc;

use jiff::tz::TimeZone;
use jiff::{Timestamp, civil};
use tracing::{debug, info, warn};

use codestroke_core::clock::Clock;
use codestroke_core::dosing::{self, DosingSummary};
use codestroke_core::milestones::{Milestone, minutes_between};
use codestroke_core::models::eligibility::{EligibilityStatus, SavedEligibility};
use codestroke_core::models::encounter::{Encounter, Stage};
use codestroke_core::models::imaging::{ExtendedPathwayResult, ImagingAndTreatment};
use codestroke_core::models::onset::OnsetAssessment;
use codestroke_core::window::{self, TreatmentWindow};
use codestroke_eligibility::catalogs::thrombolysis::Thrombolysis;
use codestroke_eligibility::error::EligibilityError;
use codestroke_eligibility::evaluator::Evaluator;
use codestroke_export::note::NoteInput;
use codestroke_storage::kv::KvStore;
use codestroke_storage::session::SessionStore;

use crate::config::EngineConfig;
use crate::error::WorkflowError;
use crate::event::{LiveStatus, SubscriptionId, WorkflowEvent};
use crate::transition::{self, Advisory};

pub type Observer = Box<dyn Fn(&WorkflowEvent) + Send>;

/// Owns the encounter and applies every mutation to it.
///
/// Each mutation is synchronous and followed by a best-effort session
/// write. A failed write is logged and reported to observers as a
/// [`WorkflowEvent::Notice`]; it never fails the mutation.
pub struct WorkflowService {
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    time_zone: TimeZone,
    session: SessionStore<Box<dyn KvStore + Send>>,
    encounter: Encounter,
    draft: Option<Evaluator>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl WorkflowService {
    /// Resume the stored encounter if it is still fresh, else start a new one.
    pub fn open(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        store: Box<dyn KvStore + Send>,
    ) -> Result<Self, WorkflowError> {
        let time_zone = config.zone()?;
        let mut session = SessionStore::new(store, config.session_key.clone(), config.session_ttl());
        let now = clock.now();

        let encounter = match session.load::<Encounter>(now) {
            Some(snapshot) => {
                info!(
                    encounter_id = %snapshot.data.id,
                    written_at = %snapshot.written_at,
                    stage = ?snapshot.data.stage,
                    "resumed encounter"
                );
                snapshot.data
            }
            None => {
                let encounter = Encounter::new(now);
                info!(encounter_id = %encounter.id, "started new encounter");
                encounter
            }
        };

        Ok(Self {
            clock,
            config,
            time_zone,
            session,
            encounter,
            draft: None,
            observers: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    pub fn encounter(&self) -> &Encounter {
        &self.encounter
    }

    pub fn stage(&self) -> Stage {
        self.encounter.stage
    }

    // ── Observers ─────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&WorkflowEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn emit(&self, event: WorkflowEvent) {
        for (_, observer) in &self.observers {
            observer(&event);
        }
    }

    // ── Stage 1: onset and vitals ─────────────────────────────────

    /// Replace the onset assessment. A future LKW is rolled back a day.
    pub fn set_onset(&mut self, onset: OnsetAssessment) -> Result<(), WorkflowError> {
        self.ensure_onset_editable()?;
        let now = self.now();
        self.encounter.onset = onset.with_corrected_onset(now);
        self.sync_draft_onset();
        self.mutated(now);
        Ok(())
    }

    /// Set LKW from a wall-clock entry in the configured zone.
    pub fn set_last_known_well_clock(&mut self, time: civil::Time) -> Result<Timestamp, WorkflowError> {
        self.ensure_onset_editable()?;
        let now = self.now();
        let lkw = window::resolve_wall_clock(time, &now.to_zoned(self.time_zone.clone()))?;
        self.encounter.onset.onset_unknown = false;
        self.encounter.onset.last_known_well = Some(lkw);
        self.sync_draft_onset();
        self.mutated(now);
        Ok(lkw)
    }

    pub fn complete_onset(&mut self) -> Result<Vec<Advisory>, WorkflowError> {
        self.ensure_stage(Stage::CollectingOnset)?;
        let now = self.now();
        transition::check_onset_gate(
            &self.encounter.onset,
            now,
            &self.config.pressure,
            &self.config.gates,
        )?;

        let advisories = transition::onset_advisories(&self.encounter.onset);
        for advisory in &advisories {
            warn!(encounter_id = %self.encounter.id, %advisory, "onset advisory");
        }

        let stamped = transition::stamp_onset_milestones(&mut self.encounter.milestones, now);
        self.announce_stamped(stamped);
        self.advance(Stage::CollectingOnset);
        self.mutated(now);
        Ok(advisories)
    }

    // ── Stage 2: imaging and treatment ────────────────────────────

    /// Replace the imaging data. Only while stage 2 is open, so gate 2
    /// always sees what a later stage shows.
    pub fn set_imaging(&mut self, imaging: ImagingAndTreatment) -> Result<(), WorkflowError> {
        self.ensure_imaging_editable()?;
        let now = self.now();
        self.encounter.imaging = imaging;
        self.mutated(now);
        Ok(())
    }

    pub fn complete_imaging(&mut self) -> Result<(), WorkflowError> {
        self.ensure_stage(Stage::CollectingImaging)?;
        transition::check_imaging_gate(&self.encounter.imaging)?;

        let now = self.now();
        let stamped =
            transition::stamp_imaging_milestones(&mut self.encounter.milestones, &self.encounter.imaging);
        self.announce_stamped(stamped);
        self.advance(Stage::CollectingImaging);
        self.mutated(now);
        Ok(())
    }

    pub fn set_extended_pathway(&mut self, result: Option<ExtendedPathwayResult>) {
        let now = self.now();
        self.encounter.extended_pathway = result;
        self.mutated(now);
    }

    // ── Navigation ────────────────────────────────────────────────

    /// Re-enter any stage already reached. Nothing is cleared.
    pub fn navigate(&mut self, stage: Stage) -> Result<(), WorkflowError> {
        if stage > self.encounter.furthest_stage {
            return Err(WorkflowError::StageNotReached(stage));
        }
        let now = self.now();
        self.encounter.stage = stage;
        debug!(encounter_id = %self.encounter.id, ?stage, "stage entered");
        self.emit(WorkflowEvent::StageEntered { stage });
        self.mutated(now);
        Ok(())
    }

    fn advance(&mut self, from: Stage) {
        let Some(to) = from.next() else {
            return;
        };
        self.encounter.stage = to;
        self.encounter.furthest_stage = self.encounter.furthest_stage.max(to);
        info!(encounter_id = %self.encounter.id, ?from, ?to, "stage completed");
        self.emit(WorkflowEvent::StageCompleted { from, to });
    }

    fn ensure_stage(&self, expected: Stage) -> Result<(), WorkflowError> {
        if self.encounter.stage == expected {
            Ok(())
        } else {
            Err(WorkflowError::WrongStage {
                expected,
                actual: self.encounter.stage,
            })
        }
    }

    fn ensure_onset_editable(&self) -> Result<(), WorkflowError> {
        if self.encounter.stage == Stage::CollectingOnset {
            Ok(())
        } else {
            Err(WorkflowError::OnsetLocked)
        }
    }

    fn ensure_imaging_editable(&self) -> Result<(), WorkflowError> {
        match self.encounter.stage {
            Stage::CollectingImaging => Ok(()),
            Stage::CollectingOnset if self.encounter.furthest_stage < Stage::CollectingImaging => {
                Err(WorkflowError::StageNotReached(Stage::CollectingImaging))
            }
            _ => Err(WorkflowError::ImagingLocked),
        }
    }

    // ── Eligibility ───────────────────────────────────────────────

    /// Open a review against the current onset. A saved review is
    /// re-opened with its selections and notes.
    pub fn open_eligibility(&mut self) -> Result<&Evaluator, WorkflowError> {
        let onset = self.encounter.onset.onset();
        let evaluator = match &self.encounter.eligibility {
            Some(saved) => {
                let catalog = codestroke_eligibility::get_catalog(&saved.catalog)
                    .ok_or_else(|| EligibilityError::UnknownCatalog(saved.catalog.clone()))?;
                Evaluator::reopen(catalog, saved, onset)
            }
            None => Evaluator::new(Box::new(Thrombolysis), onset),
        };
        Ok(self.draft.insert(evaluator))
    }

    fn sync_draft_onset(&mut self) {
        let onset = self.encounter.onset.onset();
        if let Some(draft) = self.draft.as_mut() {
            draft.set_onset(onset);
        }
    }

    pub fn eligibility_draft(&self) -> Option<&Evaluator> {
        self.draft.as_ref()
    }

    /// Live status of the open review.
    pub fn eligibility_status(&self) -> Option<EligibilityStatus> {
        self.draft.as_ref().map(|d| d.status(self.now()))
    }

    pub fn set_finding(&mut self, finding_id: &str, selected: bool) -> Result<EligibilityStatus, WorkflowError> {
        let now = self.now();
        let draft = self.draft.as_mut().ok_or(WorkflowError::NoEligibilityDraft)?;
        draft.set(finding_id, selected, now)?;
        Ok(draft.status(now))
    }

    pub fn toggle_finding(&mut self, finding_id: &str) -> Result<bool, WorkflowError> {
        let now = self.now();
        let draft = self.draft.as_mut().ok_or(WorkflowError::NoEligibilityDraft)?;
        Ok(draft.toggle(finding_id, now)?)
    }

    pub fn set_eligibility_notes(&mut self, notes: impl Into<String>) -> Result<(), WorkflowError> {
        let draft = self.draft.as_mut().ok_or(WorkflowError::NoEligibilityDraft)?;
        draft.set_notes(notes);
        Ok(())
    }

    pub fn save_eligibility(&mut self) -> Result<SavedEligibility, WorkflowError> {
        let draft = self.draft.take().ok_or(WorkflowError::NoEligibilityDraft)?;
        let now = self.now();
        let saved = draft.save(now);
        self.encounter.eligibility = Some(saved.clone());
        self.mutated(now);
        Ok(saved)
    }

    pub fn discard_eligibility(&mut self) -> bool {
        self.draft.take().is_some()
    }

    // ── Milestones ────────────────────────────────────────────────

    /// Record a milestone at `at`, or now. Recording again overwrites.
    pub fn record_milestone(&mut self, milestone: Milestone, at: Option<Timestamp>) -> Timestamp {
        let now = self.now();
        let at = at.unwrap_or(now);
        self.encounter.milestones.record(milestone, at);
        self.announce_stamped(vec![(milestone, at)]);
        self.mutated(now);
        at
    }

    /// Record a milestone entered as minutes after arrival.
    pub fn record_milestone_minutes(&mut self, milestone: Milestone, minutes: i64) -> Result<Timestamp, WorkflowError> {
        let at = self
            .encounter
            .milestones
            .at_minutes_from_anchor(minutes)
            .ok_or(WorkflowError::NoAnchor)?;
        Ok(self.record_milestone(milestone, Some(at)))
    }

    pub fn clear_milestone(&mut self, milestone: Milestone) -> Option<Timestamp> {
        let now = self.now();
        let cleared = self.encounter.milestones.clear(milestone);
        if cleared.is_some() {
            self.emit(WorkflowEvent::MilestoneCleared { milestone });
            self.mutated(now);
        }
        cleared
    }

    pub fn clear_milestones(&mut self) {
        let now = self.now();
        self.encounter.milestones.clear_all();
        self.mutated(now);
    }

    pub fn set_anchor(&mut self, anchor: Option<Timestamp>) {
        let now = self.now();
        self.encounter.milestones.set_anchor(anchor);
        self.mutated(now);
    }

    fn announce_stamped(&self, stamped: Vec<(Milestone, Timestamp)>) {
        for (milestone, at) in stamped {
            debug!(encounter_id = %self.encounter.id, milestone = %milestone, %at, "milestone recorded");
            self.emit(WorkflowEvent::MilestoneRecorded { milestone, at });
        }
    }

    // ── Orders and recommendation ─────────────────────────────────

    pub fn add_order(&mut self, order: impl Into<String>) {
        let now = self.now();
        self.encounter.orders.push(order.into());
        self.mutated(now);
    }

    pub fn remove_order(&mut self, index: usize) -> Result<String, WorkflowError> {
        if index >= self.encounter.orders.len() {
            return Err(WorkflowError::NoSuchOrder(index));
        }
        let now = self.now();
        let removed = self.encounter.orders.remove(index);
        self.mutated(now);
        Ok(removed)
    }

    pub fn set_recommendation(&mut self, text: impl Into<String>) {
        let now = self.now();
        self.encounter.recommendation = text.into();
        self.mutated(now);
    }

    // ── Live values ───────────────────────────────────────────────

    /// Hours since onset, re-derived from the clock. Zero when unknown.
    pub fn elapsed_hours(&self) -> f64 {
        self.encounter.onset.elapsed_hours(self.now())
    }

    /// `None` when onset is unknown or not entered.
    pub fn current_window(&self) -> Option<TreatmentWindow> {
        window::onset_elapsed_hours(self.encounter.onset.onset(), self.now()).map(window::classify_window)
    }

    pub fn live_status(&self) -> LiveStatus {
        let now = self.now();
        let elapsed = window::onset_elapsed_hours(self.encounter.onset.onset(), now);
        LiveStatus {
            now,
            stage: self.encounter.stage,
            elapsed_hours: elapsed,
            window: elapsed.map(window::classify_window),
            minutes_since_arrival: self.encounter.milestones.anchor.map(|door| minutes_between(door, now)),
            window_findings_active: window::window_findings_apply(elapsed),
        }
    }

    /// Recompute live values and broadcast them.
    pub fn tick(&self) -> LiveStatus {
        let status = self.live_status();
        self.emit(WorkflowEvent::Tick {
            status: status.clone(),
        });
        status
    }

    pub fn dosing(&self) -> DosingSummary {
        dosing::dosing_summary(&self.encounter.onset.weight)
    }

    pub fn render_note(&self) -> Result<String, WorkflowError> {
        let input = NoteInput::from_encounter(
            &self.encounter,
            &self.config.targets,
            &self.time_zone,
            self.now(),
        );
        Ok(codestroke_export::render::render_note(&input)?)
    }

    // ── Session ───────────────────────────────────────────────────

    /// Start over: drop the stored session and begin a fresh encounter.
    pub fn reset(&mut self) {
        let now = self.now();
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "failed to clear session");
            self.emit(WorkflowEvent::Notice {
                message: format!("Previous session could not be cleared: {e}"),
            });
        }
        let previous = self.encounter.id;
        self.encounter = Encounter::new(now);
        self.draft = None;
        info!(%previous, encounter_id = %self.encounter.id, "encounter reset");
        self.emit(WorkflowEvent::Reset {
            encounter_id: self.encounter.id,
        });
    }

    fn mutated(&mut self, now: Timestamp) {
        self.encounter.touch(now);
        if let Err(e) = self.session.save(&self.encounter, now) {
            warn!(encounter_id = %self.encounter.id, error = %e, "session write failed");
            self.emit(WorkflowEvent::Notice {
                message: format!("Session not saved: {e}"),
            });
        }
    }
}
