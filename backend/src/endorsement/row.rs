//! Endorsement roster rows and batch context

use serde::{Deserialize, Serialize};

/// Rows available in one endorsement batch
pub const MAX_BATCH_ROWS: usize = 10;

/// One new-member row as typed (id number and phone keep their separators)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementRow {
    pub name: String,
    pub id_number: String,
    pub phone: String,
}

impl EndorsementRow {
    pub fn new(
        name: impl Into<String>,
        id_number: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id_number: id_number.into(),
            phone: phone.into(),
        }
    }

    /// A row is filled iff its name is non-blank; only filled rows are
    /// validated and submitted
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Policy-level fields sent with every batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndorsementContext {
    pub policy_row_id: i64,
    pub insurer_code: String,
    pub policy_number: String,
    pub certificate_kind: String,
    /// Effective date of the endorsement, `YYYY-MM-DD`
    pub endorsement_date: String,
    /// Staff member submitting the batch
    pub actor_name: String,
}
