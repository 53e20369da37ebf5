//! In-memory policy store
//!
//! Implements every remote interface against plain maps. Used by the CLI and
//! by tests, with per-operation failure injection so callers can be checked
//! against rejections and transport failures.
//!
//! Status classification for installment cycles is scripted per index with
//! [`InMemoryPolicyStore::script_cycle_status`]; the store stands in for the
//! system that owns that rule.

use crate::models::band::SCHEDULE_ROWS;
use crate::models::schedule::ScheduleVariant;
use crate::remote::cycle::{AdvanceCycleRequest, AdvanceCycleResponse, CycleService};
use crate::remote::endorsement::{
    EndorsementBatchRequest, EndorsementBatchResponse, EndorsementService,
};
use crate::remote::schedule::{
    SaveScheduleRequest, SaveScheduleResponse, ScheduleService, StoredBandRow,
};
use crate::remote::stats::{PolicyStatistics, StatisticsService};
use crate::remote::RemoteError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    FetchSchedule,
    SaveSchedule,
    FetchStatistics,
    SubmitEndorsement,
    AdvanceCycle,
}

/// How an operation fails
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum InjectedFailure {
    /// Respond with `success: false` and this message
    Reject(String),

    /// Produce no response at all
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptedStatus {
    label: String,
    color: String,
    elapsed_days: Option<u32>,
}

/// Remote store held in memory
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    schedules: HashMap<(String, ScheduleVariant), Vec<StoredBandRow>>,
    statistics: HashMap<(String, bool), PolicyStatistics>,
    endorsement_batches: Vec<EndorsementBatchRequest>,
    cycle_positions: HashMap<(i64, u32), u8>,
    cycle_script: HashMap<u8, ScriptedStatus>,
    failures: HashMap<StoreOperation, InjectedFailure>,
    attempts: HashMap<StoreOperation, usize>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed stored rows for a schedule
    pub fn insert_schedule(
        &mut self,
        policy_reference: &str,
        variant: ScheduleVariant,
        rows: Vec<StoredBandRow>,
    ) {
        self.schedules
            .insert((policy_reference.to_string(), variant), rows);
    }

    /// Stored rows for a schedule, if any
    pub fn stored_schedule(
        &self,
        policy_reference: &str,
        variant: ScheduleVariant,
    ) -> Option<&[StoredBandRow]> {
        self.schedules
            .get(&(policy_reference.to_string(), variant))
            .map(Vec::as_slice)
    }

    pub fn insert_statistics(
        &mut self,
        policy_reference: &str,
        group_by_manager: bool,
        statistics: PolicyStatistics,
    ) {
        self.statistics
            .insert((policy_reference.to_string(), group_by_manager), statistics);
    }

    /// Batches accepted so far, in submission order
    pub fn endorsement_batches(&self) -> &[EndorsementBatchRequest] {
        &self.endorsement_batches
    }

    /// Status the store reports for a member moved to `index`
    pub fn script_cycle_status(
        &mut self,
        index: u8,
        label: &str,
        color: &str,
        elapsed_days: Option<u32>,
    ) {
        self.cycle_script.insert(
            index,
            ScriptedStatus {
                label: label.to_string(),
                color: color.to_string(),
                elapsed_days,
            },
        );
    }

    pub fn cycle_position(&self, policy_row_id: i64, sequence_position: u32) -> Option<u8> {
        self.cycle_positions
            .get(&(policy_row_id, sequence_position))
            .copied()
    }

    /// Make every call to `operation` fail until [`recover`](Self::recover)
    pub fn fail(&mut self, operation: StoreOperation, failure: InjectedFailure) {
        self.failures.insert(operation, failure);
    }

    pub fn recover(&mut self, operation: StoreOperation) {
        self.failures.remove(&operation);
    }

    /// Number of times a mutating operation was attempted (failed ones included)
    pub fn attempts(&self, operation: StoreOperation) -> usize {
        self.attempts.get(&operation).copied().unwrap_or(0)
    }

    fn record_attempt(&mut self, operation: StoreOperation) {
        *self.attempts.entry(operation).or_insert(0) += 1;
    }

    fn injected(&self, operation: StoreOperation) -> Option<&InjectedFailure> {
        self.failures.get(&operation)
    }

    fn transport_failure(&self, operation: StoreOperation) -> Result<(), RemoteError> {
        match self.injected(operation) {
            Some(InjectedFailure::Transport(reason)) => Err(RemoteError::Transport {
                reason: reason.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn rejection(&self, operation: StoreOperation) -> Option<String> {
        match self.injected(operation) {
            Some(InjectedFailure::Reject(message)) => Some(message.clone()),
            _ => None,
        }
    }
}

impl ScheduleService for InMemoryPolicyStore {
    fn fetch_schedule(
        &self,
        policy_reference: &str,
        variant: ScheduleVariant,
    ) -> Result<Vec<StoredBandRow>, RemoteError> {
        self.transport_failure(StoreOperation::FetchSchedule)?;
        if let Some(message) = self.rejection(StoreOperation::FetchSchedule) {
            return Err(RemoteError::Rejected { message });
        }

        Ok(self
            .stored_schedule(policy_reference, variant)
            .map(<[StoredBandRow]>::to_vec)
            .unwrap_or_default())
    }

    fn save_schedule(
        &mut self,
        request: &SaveScheduleRequest,
    ) -> Result<SaveScheduleResponse, RemoteError> {
        self.record_attempt(StoreOperation::SaveSchedule);
        self.transport_failure(StoreOperation::SaveSchedule)?;

        let reject = |message: String| SaveScheduleResponse {
            success: false,
            deleted_count: 0,
            message: Some(message),
        };

        if let Some(message) = self.rejection(StoreOperation::SaveSchedule) {
            return Ok(reject(message));
        }
        if request.rows.len() > SCHEDULE_ROWS {
            return Ok(reject(format!("at most {} rows allowed", SCHEDULE_ROWS)));
        }

        let key = (request.policy_reference.clone(), request.variant);
        let deleted_count = if request.rows.is_empty() {
            self.schedules.remove(&key).map_or(0, |rows| rows.len())
        } else {
            self.schedules
                .insert(key, request.rows.clone())
                .map_or(0, |rows| rows.len())
        };

        Ok(SaveScheduleResponse {
            success: true,
            deleted_count,
            message: None,
        })
    }
}

impl StatisticsService for InMemoryPolicyStore {
    fn fetch_statistics(
        &self,
        policy_reference: &str,
        group_by_manager: bool,
    ) -> Result<PolicyStatistics, RemoteError> {
        self.transport_failure(StoreOperation::FetchStatistics)?;
        if let Some(message) = self.rejection(StoreOperation::FetchStatistics) {
            return Err(RemoteError::Rejected { message });
        }

        self.statistics
            .get(&(policy_reference.to_string(), group_by_manager))
            .cloned()
            .ok_or_else(|| RemoteError::Rejected {
                message: format!("no statistics for policy {}", policy_reference),
            })
    }
}

impl EndorsementService for InMemoryPolicyStore {
    fn submit_endorsement_batch(
        &mut self,
        request: &EndorsementBatchRequest,
    ) -> Result<EndorsementBatchResponse, RemoteError> {
        self.record_attempt(StoreOperation::SubmitEndorsement);
        self.transport_failure(StoreOperation::SubmitEndorsement)?;

        let reject = |message: String| EndorsementBatchResponse {
            success: false,
            count: 0,
            message: Some(message),
        };

        if let Some(message) = self.rejection(StoreOperation::SubmitEndorsement) {
            return Ok(reject(message));
        }
        if request.rows.is_empty() {
            return Ok(reject("batch has no rows".to_string()));
        }
        if let Some(row) = request.rows.iter().find(|row| {
            row.id_number.len() != 13 || !row.id_number.bytes().all(|b| b.is_ascii_digit())
        }) {
            return Ok(reject(format!("invalid id number for {}", row.name)));
        }

        self.endorsement_batches.push(request.clone());
        Ok(EndorsementBatchResponse {
            success: true,
            count: request.rows.len(),
            message: None,
        })
    }
}

impl CycleService for InMemoryPolicyStore {
    fn advance_cycle(
        &mut self,
        request: &AdvanceCycleRequest,
    ) -> Result<AdvanceCycleResponse, RemoteError> {
        self.record_attempt(StoreOperation::AdvanceCycle);
        self.transport_failure(StoreOperation::AdvanceCycle)?;

        let rejected = |message: String| AdvanceCycleResponse {
            success: false,
            new_index: 0,
            status_label: String::new(),
            status_color: String::new(),
            elapsed_days: None,
            message: Some(message),
        };

        if let Some(message) = self.rejection(StoreOperation::AdvanceCycle) {
            return Ok(rejected(message));
        }
        if !(1..=10).contains(&request.new_index) {
            return Ok(rejected(format!(
                "installment index {} is out of range",
                request.new_index
            )));
        }

        self.cycle_positions.insert(
            (request.policy_row_id, request.sequence_position),
            request.new_index,
        );

        let status = self
            .cycle_script
            .get(&request.new_index)
            .cloned()
            .unwrap_or_else(|| ScriptedStatus {
                label: "other".to_string(),
                color: "gray".to_string(),
                elapsed_days: None,
            });

        Ok(AdvanceCycleResponse {
            success: true,
            new_index: request.new_index,
            status_label: status.label,
            status_color: status.color,
            elapsed_days: status.elapsed_days,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn row(n: u8) -> StoredBandRow {
        StoredBandRow {
            row_num: n,
            start_age: Some(18),
            end_age: Some(30),
            basic_component: Some(100),
            special_component: None,
            total: 100,
        }
    }

    fn save(rows: Vec<StoredBandRow>) -> SaveScheduleRequest {
        SaveScheduleRequest {
            request_id: Uuid::new_v4(),
            policy_reference: "P-1".to_string(),
            variant: ScheduleVariant::Monthly,
            rows,
        }
    }

    #[test]
    fn test_save_is_full_replace_and_reports_deleted_rows() {
        let mut store = InMemoryPolicyStore::new();

        let first = store.save_schedule(&save(vec![row(1), row(2), row(3)])).unwrap();
        assert!(first.success);
        assert_eq!(first.deleted_count, 0);

        let second = store.save_schedule(&save(vec![row(5)])).unwrap();
        assert_eq!(second.deleted_count, 3);

        let stored = store
            .stored_schedule("P-1", ScheduleVariant::Monthly)
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].row_num, 5);
    }

    #[test]
    fn test_variants_are_stored_independently() {
        let mut store = InMemoryPolicyStore::new();
        store.save_schedule(&save(vec![row(1)])).unwrap();

        assert!(store
            .fetch_schedule("P-1", ScheduleVariant::InstallmentTenPay)
            .unwrap()
            .is_empty());
        assert_eq!(
            store
                .fetch_schedule("P-1", ScheduleVariant::Monthly)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_injected_failures() {
        let mut store = InMemoryPolicyStore::new();

        store.fail(
            StoreOperation::SaveSchedule,
            InjectedFailure::Transport("connection reset".to_string()),
        );
        assert!(matches!(
            store.save_schedule(&save(vec![row(1)])),
            Err(RemoteError::Transport { .. })
        ));

        store.fail(
            StoreOperation::SaveSchedule,
            InjectedFailure::Reject("locked".to_string()),
        );
        let response = store.save_schedule(&save(vec![row(1)])).unwrap();
        assert!(!response.success);

        store.recover(StoreOperation::SaveSchedule);
        assert!(store.save_schedule(&save(vec![row(1)])).unwrap().success);
        assert_eq!(store.attempts(StoreOperation::SaveSchedule), 3);
    }

    #[test]
    fn test_advance_cycle_uses_script() {
        let mut store = InMemoryPolicyStore::new();
        store.script_cycle_status(4, "lapsed", "red", Some(47));

        let response = store
            .advance_cycle(&AdvanceCycleRequest {
                request_id: Uuid::new_v4(),
                policy_row_id: 9,
                new_index: 4,
                sequence_position: 2,
            })
            .unwrap();

        assert!(response.success);
        assert_eq!(response.status_label, "lapsed");
        assert_eq!(response.elapsed_days, Some(47));
        assert_eq!(store.cycle_position(9, 2), Some(4));
    }
}
