//! Premium schedule editor
//!
//! Opens one `(policy, variant)` schedule from the store, applies typed edits
//! in memory and writes the populated rows back with a full replace.
//!
//! # Critical Invariants
//!
//! 1. End-age edits go through the boundary reconciler
//! 2. Every component edit recomputes that row's total immediately
//! 3. A failed save leaves the in-memory schedule exactly as it was
//! 4. Only populated rows are sent, each with its own row number

use crate::config::{DeskConfig, DisplayConfig};
use crate::core::{format_total, parse_age, parse_amount};
use crate::error::DeskError;
use crate::models::band::{AgeBand, RowNum};
use crate::models::event::{DeskEvent, EventLog};
use crate::models::schedule::{InstallmentTenPay, Metering, Monthly, Schedule, ScheduleVariant};
use crate::remote::schedule::{SaveScheduleRequest, ScheduleService, StoredBandRow};
use crate::remote::accept;
use crate::schedule::reconciler::{apply_end_age, partition_gaps, BoundaryChange, PartitionGap};
use serde::Serialize;
use uuid::Uuid;

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Nothing was stored before this save
    Created { rows_sent: usize },

    /// Previously stored rows were replaced
    Updated { rows_sent: usize, removed: usize },
}

impl SaveOutcome {
    fn from_deleted(rows_sent: usize, removed: usize) -> Self {
        if removed == 0 {
            SaveOutcome::Created { rows_sent }
        } else {
            SaveOutcome::Updated { rows_sent, removed }
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Created { .. } => "Premium schedule created",
            SaveOutcome::Updated { .. } => "Premium schedule updated",
        }
    }
}

/// Editor for one schedule of metering `M`
#[derive(Debug, Clone)]
pub struct ScheduleEditor<M: Metering> {
    schedule: Schedule<M>,
    display: DisplayConfig,
    /// Fingerprint of the schedule as last loaded or saved
    saved_fingerprint: Option<String>,
    events: EventLog,
}

impl<M: Metering> ScheduleEditor<M> {
    /// Fetch the stored schedule and open it for editing
    ///
    /// A policy with no stored rows opens as seven blank rows.
    pub fn open<S: ScheduleService + ?Sized>(
        service: &S,
        policy_reference: &str,
        config: &DeskConfig,
    ) -> Result<Self, DeskError> {
        let rows = service.fetch_schedule(policy_reference, M::VARIANT)?;
        let schedule = Schedule::<M>::from_stored(policy_reference, &rows)?;

        let mut editor = Self::from_schedule(schedule, config);
        editor.events.log(DeskEvent::ScheduleLoaded {
            policy_reference: policy_reference.to_string(),
            variant: M::VARIANT,
            stored_rows: rows.len(),
        });
        Ok(editor)
    }

    /// Edit an already-built schedule; its current content counts as saved
    pub fn from_schedule(schedule: Schedule<M>, config: &DeskConfig) -> Self {
        let saved_fingerprint = schedule.fingerprint().ok();
        Self {
            schedule,
            display: config.display.clone(),
            saved_fingerprint,
            events: EventLog::new(),
        }
    }

    pub fn schedule(&self) -> &Schedule<M> {
        &self.schedule
    }

    pub fn policy_reference(&self) -> &str {
        self.schedule.policy_reference()
    }

    pub fn variant(&self) -> ScheduleVariant {
        M::VARIANT
    }

    pub fn band(&self, row: RowNum) -> &AgeBand {
        self.schedule.band(row)
    }

    // ========================================================================
    // Age boundaries
    // ========================================================================

    /// Set a start age directly; the previous row is never adjusted
    pub fn set_start_age(&mut self, row: RowNum, age: Option<u32>) {
        self.schedule.bands_mut()[row.index()].set_start_age(age);
    }

    /// Set or clear an end age and reconcile the following row
    pub fn set_end_age(&mut self, row: RowNum, age: Option<u32>) -> BoundaryChange {
        let change = apply_end_age(self.schedule.bands_mut(), row, age);
        self.log_boundary(change);
        change
    }

    pub fn set_start_age_input(&mut self, row: RowNum, input: &str) -> Result<(), DeskError> {
        let age = parse_age(input)?;
        self.set_start_age(row, age);
        Ok(())
    }

    pub fn set_end_age_input(
        &mut self,
        row: RowNum,
        input: &str,
    ) -> Result<BoundaryChange, DeskError> {
        let age = parse_age(input)?;
        Ok(self.set_end_age(row, age))
    }

    fn log_boundary(&mut self, change: BoundaryChange) {
        let policy_reference = self.schedule.policy_reference().to_string();
        let event = match change {
            BoundaryChange::Propagated { row, start_age } => DeskEvent::BoundaryPropagated {
                policy_reference,
                row: row.get(),
                start_age,
            },
            BoundaryChange::Cleared { row } => DeskEvent::BoundaryCleared {
                policy_reference,
                row: row.get(),
            },
            BoundaryChange::Retained { row, start_age } => DeskEvent::BoundaryRetained {
                policy_reference,
                row: row.get(),
                start_age,
            },
            _ => return,
        };
        self.events.log(event);
    }

    /// Adjacent rows whose boundaries do not meet
    pub fn partition_gaps(&self) -> Vec<PartitionGap> {
        partition_gaps(self.schedule.bands())
    }

    // ========================================================================
    // Premium components
    // ========================================================================

    /// Set the basic component; returns the recomputed total
    pub fn set_basic(&mut self, row: RowNum, amount: Option<i64>) -> Result<i64, DeskError> {
        let total = self.schedule.set_basic(row, amount)?;
        self.log_total(row, total);
        Ok(total)
    }

    /// Set the special component; returns the recomputed total
    pub fn set_special(&mut self, row: RowNum, amount: Option<i64>) -> Result<i64, DeskError> {
        let total = self.schedule.set_special(row, amount)?;
        self.log_total(row, total);
        Ok(total)
    }

    /// Set the basic component from typed text (separators allowed)
    pub fn set_basic_input(&mut self, row: RowNum, input: &str) -> Result<i64, DeskError> {
        let amount = parse_amount(input, self.display.thousands_separator)?;
        self.set_basic(row, amount)
    }

    /// Set the special component from typed text (separators allowed)
    pub fn set_special_input(&mut self, row: RowNum, input: &str) -> Result<i64, DeskError> {
        let amount = parse_amount(input, self.display.thousands_separator)?;
        self.set_special(row, amount)
    }

    fn log_total(&mut self, row: RowNum, total: i64) {
        self.events.log(DeskEvent::TotalRecomputed {
            policy_reference: self.schedule.policy_reference().to_string(),
            row: row.get(),
            total,
        });
    }

    /// Row total as displayed; empty when the total is zero
    pub fn total_display(&self, row: RowNum) -> String {
        format_total(self.band(row).total(), self.display.thousands_separator)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Rows a save would send
    pub fn upsert_rows(&self) -> Vec<StoredBandRow> {
        self.schedule.upsert_rows()
    }

    /// True when the schedule differs from what was last loaded or saved
    pub fn is_dirty(&self) -> bool {
        match (&self.saved_fingerprint, self.schedule.fingerprint()) {
            (Some(saved), Ok(current)) => *saved != current,
            _ => true,
        }
    }

    /// Replace the stored rows with the populated rows of this schedule
    pub fn save<S: ScheduleService + ?Sized>(
        &mut self,
        service: &mut S,
    ) -> Result<SaveOutcome, DeskError> {
        let request = SaveScheduleRequest {
            request_id: Uuid::new_v4(),
            policy_reference: self.schedule.policy_reference().to_string(),
            variant: M::VARIANT,
            rows: self.upsert_rows(),
        };

        match service.save_schedule(&request).and_then(accept) {
            Ok(response) => {
                let outcome = SaveOutcome::from_deleted(request.rows.len(), response.deleted_count);
                self.events.log(DeskEvent::ScheduleSaved {
                    policy_reference: request.policy_reference,
                    variant: M::VARIANT,
                    request_id: request.request_id,
                    rows_sent: request.rows.len(),
                    rows_removed: response.deleted_count,
                });
                self.saved_fingerprint = self.schedule.fingerprint().ok();
                Ok(outcome)
            }
            Err(error) => {
                self.events.log(DeskEvent::ScheduleSaveFailed {
                    policy_reference: request.policy_reference,
                    variant: M::VARIANT,
                    request_id: request.request_id,
                    reason: error.to_string(),
                });
                Err(error.into())
            }
        }
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

/// Schedule editor whose variant is chosen at runtime
#[derive(Debug, Clone)]
pub enum AnyScheduleEditor {
    Monthly(ScheduleEditor<Monthly>),
    InstallmentTenPay(ScheduleEditor<InstallmentTenPay>),
}

macro_rules! dispatch {
    ($self:expr, $editor:ident => $body:expr) => {
        match $self {
            AnyScheduleEditor::Monthly($editor) => $body,
            AnyScheduleEditor::InstallmentTenPay($editor) => $body,
        }
    };
}

impl AnyScheduleEditor {
    pub fn open<S: ScheduleService + ?Sized>(
        service: &S,
        policy_reference: &str,
        variant: ScheduleVariant,
        config: &DeskConfig,
    ) -> Result<Self, DeskError> {
        Ok(match variant {
            ScheduleVariant::Monthly => {
                AnyScheduleEditor::Monthly(ScheduleEditor::open(service, policy_reference, config)?)
            }
            ScheduleVariant::InstallmentTenPay => AnyScheduleEditor::InstallmentTenPay(
                ScheduleEditor::open(service, policy_reference, config)?,
            ),
        })
    }

    pub fn variant(&self) -> ScheduleVariant {
        dispatch!(self, e => e.variant())
    }

    pub fn policy_reference(&self) -> &str {
        dispatch!(self, e => e.policy_reference())
    }

    pub fn band(&self, row: RowNum) -> &AgeBand {
        dispatch!(self, e => e.band(row))
    }

    pub fn set_start_age(&mut self, row: RowNum, age: Option<u32>) {
        dispatch!(self, e => e.set_start_age(row, age))
    }

    pub fn set_end_age(&mut self, row: RowNum, age: Option<u32>) -> BoundaryChange {
        dispatch!(self, e => e.set_end_age(row, age))
    }

    pub fn set_start_age_input(&mut self, row: RowNum, input: &str) -> Result<(), DeskError> {
        dispatch!(self, e => e.set_start_age_input(row, input))
    }

    pub fn set_end_age_input(
        &mut self,
        row: RowNum,
        input: &str,
    ) -> Result<BoundaryChange, DeskError> {
        dispatch!(self, e => e.set_end_age_input(row, input))
    }

    pub fn set_basic(&mut self, row: RowNum, amount: Option<i64>) -> Result<i64, DeskError> {
        dispatch!(self, e => e.set_basic(row, amount))
    }

    pub fn set_basic_input(&mut self, row: RowNum, input: &str) -> Result<i64, DeskError> {
        dispatch!(self, e => e.set_basic_input(row, input))
    }

    pub fn set_special_input(&mut self, row: RowNum, input: &str) -> Result<i64, DeskError> {
        dispatch!(self, e => e.set_special_input(row, input))
    }

    pub fn set_special(&mut self, row: RowNum, amount: Option<i64>) -> Result<i64, DeskError> {
        dispatch!(self, e => e.set_special(row, amount))
    }

    pub fn total_display(&self, row: RowNum) -> String {
        dispatch!(self, e => e.total_display(row))
    }

    pub fn partition_gaps(&self) -> Vec<PartitionGap> {
        dispatch!(self, e => e.partition_gaps())
    }

    pub fn upsert_rows(&self) -> Vec<StoredBandRow> {
        dispatch!(self, e => e.upsert_rows())
    }

    pub fn is_dirty(&self) -> bool {
        dispatch!(self, e => e.is_dirty())
    }

    pub fn save<S: ScheduleService + ?Sized>(
        &mut self,
        service: &mut S,
    ) -> Result<SaveOutcome, DeskError> {
        dispatch!(self, e => e.save(service))
    }

    pub fn events(&self) -> &EventLog {
        dispatch!(self, e => e.events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::memory::InMemoryPolicyStore;

    fn row(n: u8) -> RowNum {
        RowNum::new(n).unwrap()
    }

    #[test]
    fn test_open_empty_policy_gives_blank_rows() {
        let store = InMemoryPolicyStore::new();
        let editor =
            ScheduleEditor::<Monthly>::open(&store, "P-1", &DeskConfig::default()).unwrap();
        assert!(editor.upsert_rows().is_empty());
        assert!(!editor.is_dirty());
        assert_eq!(editor.events().events_of_type("ScheduleLoaded").len(), 1);
    }

    #[test]
    fn test_input_parsing_and_display() {
        let store = InMemoryPolicyStore::new();
        let mut editor =
            ScheduleEditor::<Monthly>::open(&store, "P-1", &DeskConfig::default()).unwrap();

        assert_eq!(editor.set_basic_input(row(1), "12,000").unwrap(), 12_000);
        assert_eq!(editor.set_special_input(row(1), "3000").unwrap(), 15_000);
        assert_eq!(editor.total_display(row(1)), "15,000");
        assert_eq!(editor.total_display(row(2)), "");
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_bad_amount_leaves_row_untouched() {
        let store = InMemoryPolicyStore::new();
        let mut editor =
            ScheduleEditor::<Monthly>::open(&store, "P-1", &DeskConfig::default()).unwrap();
        editor.set_basic(row(1), Some(100)).unwrap();

        let error = editor.set_basic_input(row(1), "12.5").unwrap_err();
        assert!(error.is_validation());
        assert_eq!(editor.band(row(1)).basic(), Some(100));
    }

    #[test]
    fn test_save_outcome_phrasing() {
        assert_eq!(
            SaveOutcome::from_deleted(2, 0).message(),
            "Premium schedule created"
        );
        assert_eq!(
            SaveOutcome::from_deleted(2, 3).message(),
            "Premium schedule updated"
        );
    }

    #[test]
    fn test_any_editor_dispatches_on_variant() {
        let store = InMemoryPolicyStore::new();
        let mut editor = AnyScheduleEditor::open(
            &store,
            "P-1",
            ScheduleVariant::InstallmentTenPay,
            &DeskConfig::default(),
        )
        .unwrap();
        assert_eq!(editor.variant(), ScheduleVariant::InstallmentTenPay);
        editor.set_basic(row(1), Some(5_000)).unwrap();
        assert_eq!(editor.set_special(row(1), Some(500)).unwrap(), 55_000);
    }
}
