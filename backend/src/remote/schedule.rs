//! Schedule fetch and replace-style upsert
//!
//! The save contract is a full replace: the store atomically deletes every
//! row it holds for `(policy_reference, variant)` and inserts the rows sent.
//! It answers with the number of rows it deleted, which the client uses only
//! to phrase the success message ("created" when zero, "updated" otherwise).

use crate::models::band::AgeBand;
use crate::models::schedule::ScheduleVariant;
use crate::remote::{RemoteError, RemoteResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored schedule row as it travels on the wire
///
/// Amounts are plain integers (no separators).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBandRow {
    pub row_num: u8,
    pub start_age: Option<u32>,
    pub end_age: Option<u32>,
    pub basic_component: Option<i64>,
    pub special_component: Option<i64>,
    #[serde(default)]
    pub total: i64,
}

impl From<&AgeBand> for StoredBandRow {
    fn from(band: &AgeBand) -> Self {
        StoredBandRow {
            row_num: band.row().get(),
            start_age: band.start_age(),
            end_age: band.end_age(),
            basic_component: band.basic(),
            special_component: band.special(),
            total: band.total(),
        }
    }
}

/// Replace request: the populated rows of one schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScheduleRequest {
    pub request_id: Uuid,
    pub policy_reference: String,
    pub variant: ScheduleVariant,
    pub rows: Vec<StoredBandRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveScheduleResponse {
    pub success: bool,
    #[serde(default)]
    pub deleted_count: usize,
    #[serde(default)]
    pub message: Option<String>,
}

impl RemoteResponse for SaveScheduleResponse {
    fn success(&self) -> bool {
        self.success
    }

    fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Schedule half of the remote store
pub trait ScheduleService {
    /// Stored rows for `(policy_reference, variant)`; empty when none exist
    fn fetch_schedule(
        &self,
        policy_reference: &str,
        variant: ScheduleVariant,
    ) -> Result<Vec<StoredBandRow>, RemoteError>;

    /// Atomically replace the stored rows with `request.rows`
    fn save_schedule(
        &mut self,
        request: &SaveScheduleRequest,
    ) -> Result<SaveScheduleResponse, RemoteError>;
}
