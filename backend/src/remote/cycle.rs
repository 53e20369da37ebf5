//! Installment cycle recompute
//!
//! The store owns payment history and the rule that classifies it. The
//! client only asks it to move a member to another installment index and
//! displays whatever status comes back.

use crate::remote::{RemoteError, RemoteResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceCycleRequest {
    pub request_id: Uuid,
    pub policy_row_id: i64,
    pub new_index: u8,
    pub sequence_position: u32,
}

/// Recomputed status; fields other than `success` are only meaningful on success
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceCycleResponse {
    pub success: bool,
    #[serde(default)]
    pub new_index: u8,
    #[serde(default)]
    pub status_label: String,
    #[serde(default)]
    pub status_color: String,
    #[serde(default)]
    pub elapsed_days: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteResponse for AdvanceCycleResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

pub trait CycleService {
    fn advance_cycle(
        &mut self,
        request: &AdvanceCycleRequest,
    ) -> Result<AdvanceCycleResponse, RemoteError>;
}
