//! Event logging for editor auditing and debugging.
//!
//! Every editor records the significant state changes it makes in an
//! [`EventLog`]. Events enable:
//! - Auditing (what was sent to the store, and what came back)
//! - Debugging (why a start age changed or survived a clear)
//! - Replay output for the CLI
//!
//! # Event Types
//!
//! Events are grouped by editor:
//! - **Schedule**: loading, boundary reconciliation, totals, saving
//! - **Endorsement**: local rejection, confirmation, submission
//! - **Cycle**: transition requests and how they resolved
//!
//! # Example
//!
//! ```rust
//! use group_policy_desk_core::models::{DeskEvent, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(DeskEvent::BoundaryPropagated {
//!     policy_reference: "2025-S331191".to_string(),
//!     row: 2,
//!     start_age: 31,
//! });
//!
//! assert_eq!(log.events_of_type("BoundaryPropagated").len(), 1);
//! ```

use crate::models::schedule::ScheduleVariant;
use serde::Serialize;
use uuid::Uuid;

/// Editor event capturing a state change.
///
/// Events are logged in the order they occur.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum DeskEvent {
    /// Schedule fetched and opened for editing
    ScheduleLoaded {
        policy_reference: String,
        variant: ScheduleVariant,
        stored_rows: usize,
    },

    /// Following row's start age derived from an edited end age
    BoundaryPropagated {
        policy_reference: String,
        row: u8,
        start_age: u32,
    },

    /// Derived start age removed after its end age was cleared
    BoundaryCleared { policy_reference: String, row: u8 },

    /// Manually entered start age kept although its end age was cleared
    BoundaryRetained {
        policy_reference: String,
        row: u8,
        start_age: Option<u32>,
    },

    /// Row total recomputed after a component edit
    TotalRecomputed {
        policy_reference: String,
        row: u8,
        total: i64,
    },

    /// Schedule rows replaced in the store
    ScheduleSaved {
        policy_reference: String,
        variant: ScheduleVariant,
        request_id: Uuid,
        rows_sent: usize,
        rows_removed: usize,
    },

    /// Save did not take effect
    ScheduleSaveFailed {
        policy_reference: String,
        variant: ScheduleVariant,
        request_id: Uuid,
        reason: String,
    },

    /// Endorsement submit stopped before any network call
    EndorsementRejectedLocally {
        policy_number: String,
        errors: Vec<String>,
    },

    /// User declined the submit confirmation
    EndorsementDeclined { policy_number: String },

    /// Batch accepted by the store
    EndorsementSubmitted {
        policy_number: String,
        request_id: Uuid,
        count: usize,
    },

    /// Batch did not take effect
    EndorsementSubmitFailed {
        policy_number: String,
        request_id: Uuid,
        reason: String,
    },

    /// Recompute requested for a new installment index
    CycleTransitionRequested {
        policy_row_id: i64,
        ticket: u64,
        from_index: u8,
        to_index: u8,
    },

    /// Store's status adopted wholesale
    CycleTransitionAdopted {
        policy_row_id: i64,
        ticket: u64,
        index: u8,
        label: String,
    },

    /// Selection reverted to the last adopted index
    CycleTransitionReverted {
        policy_row_id: i64,
        index: u8,
        reason: String,
    },

    /// Response arrived for a superseded request and was ignored
    CycleResponseDiscarded { policy_row_id: i64, ticket: u64 },
}

impl DeskEvent {
    /// Variant name, used for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            DeskEvent::ScheduleLoaded { .. } => "ScheduleLoaded",
            DeskEvent::BoundaryPropagated { .. } => "BoundaryPropagated",
            DeskEvent::BoundaryCleared { .. } => "BoundaryCleared",
            DeskEvent::BoundaryRetained { .. } => "BoundaryRetained",
            DeskEvent::TotalRecomputed { .. } => "TotalRecomputed",
            DeskEvent::ScheduleSaved { .. } => "ScheduleSaved",
            DeskEvent::ScheduleSaveFailed { .. } => "ScheduleSaveFailed",
            DeskEvent::EndorsementRejectedLocally { .. } => "EndorsementRejectedLocally",
            DeskEvent::EndorsementDeclined { .. } => "EndorsementDeclined",
            DeskEvent::EndorsementSubmitted { .. } => "EndorsementSubmitted",
            DeskEvent::EndorsementSubmitFailed { .. } => "EndorsementSubmitFailed",
            DeskEvent::CycleTransitionRequested { .. } => "CycleTransitionRequested",
            DeskEvent::CycleTransitionAdopted { .. } => "CycleTransitionAdopted",
            DeskEvent::CycleTransitionReverted { .. } => "CycleTransitionReverted",
            DeskEvent::CycleResponseDiscarded { .. } => "CycleResponseDiscarded",
        }
    }

    /// Policy reference or policy number the event concerns, if any
    pub fn policy(&self) -> Option<&str> {
        match self {
            DeskEvent::ScheduleLoaded {
                policy_reference, ..
            }
            | DeskEvent::BoundaryPropagated {
                policy_reference, ..
            }
            | DeskEvent::BoundaryCleared {
                policy_reference, ..
            }
            | DeskEvent::BoundaryRetained {
                policy_reference, ..
            }
            | DeskEvent::TotalRecomputed {
                policy_reference, ..
            }
            | DeskEvent::ScheduleSaved {
                policy_reference, ..
            }
            | DeskEvent::ScheduleSaveFailed {
                policy_reference, ..
            } => Some(policy_reference.as_str()),
            DeskEvent::EndorsementRejectedLocally { policy_number, .. }
            | DeskEvent::EndorsementDeclined { policy_number }
            | DeskEvent::EndorsementSubmitted { policy_number, .. }
            | DeskEvent::EndorsementSubmitFailed { policy_number, .. } => {
                Some(policy_number.as_str())
            }
            DeskEvent::CycleTransitionRequested { .. }
            | DeskEvent::CycleTransitionAdopted { .. }
            | DeskEvent::CycleTransitionReverted { .. }
            | DeskEvent::CycleResponseDiscarded { .. } => None,
        }
    }

    /// Policy row the event concerns, for cycle events
    pub fn policy_row_id(&self) -> Option<i64> {
        match self {
            DeskEvent::CycleTransitionRequested { policy_row_id, .. }
            | DeskEvent::CycleTransitionAdopted { policy_row_id, .. }
            | DeskEvent::CycleTransitionReverted { policy_row_id, .. }
            | DeskEvent::CycleResponseDiscarded { policy_row_id, .. } => Some(*policy_row_id),
            _ => None,
        }
    }
}

/// Ordered event log
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<DeskEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, event: DeskEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DeskEvent] {
        &self.events
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&DeskEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_policy(&self, policy: &str) -> Vec<&DeskEvent> {
        self.events
            .iter()
            .filter(|e| e.policy() == Some(policy))
            .collect()
    }

    pub fn events_for_policy_row(&self, policy_row_id: i64) -> Vec<&DeskEvent> {
        self.events
            .iter()
            .filter(|e| e.policy_row_id() == Some(policy_row_id))
            .collect()
    }

    pub fn last(&self) -> Option<&DeskEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_basic() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(DeskEvent::BoundaryCleared {
            policy_reference: "P-1".to_string(),
            row: 2,
        });

        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_event_log_query_by_policy() {
        let mut log = EventLog::new();

        log.log(DeskEvent::TotalRecomputed {
            policy_reference: "P-1".to_string(),
            row: 1,
            total: 15_000,
        });
        log.log(DeskEvent::EndorsementDeclined {
            policy_number: "P-1".to_string(),
        });
        log.log(DeskEvent::TotalRecomputed {
            policy_reference: "P-2".to_string(),
            row: 1,
            total: 100,
        });
        log.log(DeskEvent::CycleResponseDiscarded {
            policy_row_id: 7,
            ticket: 1,
        });

        assert_eq!(log.events_for_policy("P-1").len(), 2);
        assert_eq!(log.events_for_policy("P-2").len(), 1);
        assert_eq!(log.events_for_policy_row(7).len(), 1);
        assert_eq!(log.events_of_type("TotalRecomputed").len(), 2);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = DeskEvent::BoundaryPropagated {
            policy_reference: "P-1".to_string(),
            row: 2,
            start_age: 31,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "BoundaryPropagated");
        assert_eq!(json["start_age"], 31);
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(DeskEvent::EndorsementDeclined {
            policy_number: "P-1".to_string(),
        });
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last(), None);
    }
}
