//! Top-level error type
//!
//! Three kinds of failure reach the user:
//! - **Validation**: caught locally before any network call, shown with a
//!   specific message
//! - **Remote rejection**: the store answered `success: false`
//! - **Transport failure**: no answer (timeout, connection error)
//!
//! Rejections and transport failures are shown as one generic notice. In
//! every case the editor's local state is exactly what it was before the
//! failed operation.

use crate::config::ConfigError;
use crate::cycle::CycleError;
use crate::endorsement::EndorsementError;
use crate::models::schedule::ScheduleError;
use crate::remote::{RemoteError, REMOTE_FAILURE_NOTICE};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DeskError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("Endorsement batch is invalid: {}", join_messages(.0))]
    Endorsement(Vec<EndorsementError>),

    #[error(transparent)]
    Cycle(#[from] CycleError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_messages(errors: &[EndorsementError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<EndorsementError>> for DeskError {
    fn from(errors: Vec<EndorsementError>) -> Self {
        DeskError::Endorsement(errors)
    }
}

impl DeskError {
    /// True for failures caught before any network call
    pub fn is_validation(&self) -> bool {
        match self {
            DeskError::Schedule(_) | DeskError::Endorsement(_) | DeskError::Config(_) => true,
            DeskError::Cycle(e) => e.is_local(),
            DeskError::Remote(_) => false,
        }
    }

    /// Text for the user-facing notification
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            match self {
                DeskError::Endorsement(errors) => join_messages(errors),
                other => other.to_string(),
            }
        } else {
            REMOTE_FAILURE_NOTICE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_specific() {
        let error = DeskError::from(vec![
            EndorsementError::MissingPhone { row: 2 },
            EndorsementError::NoFilledRows,
        ]);
        assert!(error.is_validation());
        assert_eq!(
            error.user_message(),
            "Row 2: phone number is required; At least one member name is required"
        );

        let error = DeskError::from(ScheduleError::NegativeAmount(-1));
        assert_eq!(error.user_message(), "Amount -1 must not be negative");
    }

    #[test]
    fn test_remote_failures_share_one_notice() {
        let rejected = DeskError::from(RemoteError::Rejected {
            message: "internal detail".to_string(),
        });
        let transport = DeskError::from(RemoteError::timeout(30_000));

        assert!(!rejected.is_validation());
        assert_eq!(rejected.user_message(), REMOTE_FAILURE_NOTICE);
        assert_eq!(transport.user_message(), REMOTE_FAILURE_NOTICE);
    }
}
