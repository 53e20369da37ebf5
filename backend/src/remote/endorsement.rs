//! Endorsement batch submission
//!
//! A batch is posted in a single call and applied atomically by the store:
//! either every row is enrolled or none is.

use crate::remote::{RemoteError, RemoteResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One member row as submitted (id number and phone are digits only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementSubmissionRow {
    pub name: String,
    pub id_number: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementBatchRequest {
    pub request_id: Uuid,
    pub rows: Vec<EndorsementSubmissionRow>,
    pub policy_row_id: i64,
    pub insurer_code: String,
    pub endorsement_date: String,
    pub policy_number: String,
    pub certificate_kind: String,
    pub actor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementBatchResponse {
    pub success: bool,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteResponse for EndorsementBatchResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

pub trait EndorsementService {
    fn submit_endorsement_batch(
        &mut self,
        request: &EndorsementBatchRequest,
    ) -> Result<EndorsementBatchResponse, RemoteError>;
}
