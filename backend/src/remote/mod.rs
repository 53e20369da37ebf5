//! Remote store contracts
//!
//! Every business record lives behind an external service. This module
//! defines that boundary: one trait per interface, the serde wire types
//! they exchange, and an in-memory implementation of all of them.
//!
//! # Interfaces
//!
//! - **ScheduleService**: fetch a schedule, atomically replace its rows
//! - **StatisticsService**: read-only premium statistics
//! - **EndorsementService**: submit one endorsement batch
//! - **CycleService**: ask the store to recompute an installment cycle
//!
//! # Failure model
//!
//! Responses carry a `success` flag. A response with `success: false` is a
//! [`RemoteError::Rejected`]; a call that never produced a response is a
//! [`RemoteError::Transport`]. Callers treat both as "the operation did not
//! take effect" and never retry on their own.

pub mod cycle;
pub mod endorsement;
pub mod memory;
pub mod schedule;
pub mod sequence;
pub mod stats;

pub use cycle::{AdvanceCycleRequest, AdvanceCycleResponse, CycleService};
pub use endorsement::{
    EndorsementBatchRequest, EndorsementBatchResponse, EndorsementService, EndorsementSubmissionRow,
};
pub use memory::{InMemoryPolicyStore, InjectedFailure, StoreOperation};
pub use schedule::{SaveScheduleRequest, SaveScheduleResponse, ScheduleService, StoredBandRow};
pub use sequence::{RequestSequencer, RequestTicket};
pub use stats::{PolicyStatistics, StatisticsService};

use thiserror::Error;

/// Generic text shown for every remote failure
pub const REMOTE_FAILURE_NOTICE: &str = "The operation could not be completed. Please try again.";

/// Errors from the remote store boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Remote store rejected the request: {message}")]
    Rejected { message: String },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },
}

impl RemoteError {
    /// Transport failure for a request that exceeded its deadline
    pub fn timeout(timeout_ms: u64) -> Self {
        RemoteError::Transport {
            reason: format!("no response within {} ms", timeout_ms),
        }
    }
}

/// Response envelope carrying a success flag
pub trait RemoteResponse {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

/// Turn a `success: false` envelope into [`RemoteError::Rejected`]
pub fn accept<R: RemoteResponse>(response: R) -> Result<R, RemoteError> {
    if response.success() {
        Ok(response)
    } else {
        Err(RemoteError::Rejected {
            message: response
                .message()
                .unwrap_or("request was not accepted")
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Envelope {
        success: bool,
        message: Option<String>,
    }

    impl RemoteResponse for Envelope {
        fn success(&self) -> bool {
            self.success
        }

        fn message(&self) -> Option<&str> {
            self.message.as_deref()
        }
    }

    #[test]
    fn test_accept_passes_success_through() {
        let ok = Envelope {
            success: true,
            message: None,
        };
        assert!(accept(ok).is_ok());
    }

    #[test]
    fn test_accept_maps_rejection() {
        let rejected = Envelope {
            success: false,
            message: Some("duplicate id".to_string()),
        };
        assert_eq!(
            accept(rejected).err(),
            Some(RemoteError::Rejected {
                message: "duplicate id".to_string()
            })
        );

        let silent = Envelope {
            success: false,
            message: None,
        };
        assert!(matches!(accept(silent), Err(RemoteError::Rejected { .. })));
    }

    #[test]
    fn test_timeout_is_transport_failure() {
        assert_eq!(
            RemoteError::timeout(30_000),
            RemoteError::Transport {
                reason: "no response within 30000 ms".to_string()
            }
        );
    }
}
