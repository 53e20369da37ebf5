//! Installment cycle status
//!
//! Payment status is classified by the store from payment history the client
//! never sees. [`CycleStatus`] is therefore an opaque display value: it can
//! only be built from something the store returned, and it is replaced
//! wholesale, never edited field by field.

use crate::remote::cycle::AdvanceCycleResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Highest installment index
pub const MAX_CYCLE_INDEX: u8 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CycleError {
    #[error("Installment index {0} is outside 1..=10")]
    IndexOutOfRange(u8),

    #[error("Store returned installment index {0}, outside 1..=10")]
    ServerIndexOutOfRange(u8),
}

impl CycleError {
    /// True when the error was caught before contacting the store
    pub fn is_local(&self) -> bool {
        matches!(self, CycleError::IndexOutOfRange(_))
    }
}

/// Installment index, 1 to 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CycleIndex(u8);

impl CycleIndex {
    pub const FIRST: CycleIndex = CycleIndex(1);

    pub fn new(index: u8) -> Result<Self, CycleError> {
        if (1..=MAX_CYCLE_INDEX).contains(&index) {
            Ok(CycleIndex(index))
        } else {
            Err(CycleError::IndexOutOfRange(index))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for CycleIndex {
    type Error = CycleError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        CycleIndex::new(index)
    }
}

impl From<CycleIndex> for u8 {
    fn from(index: CycleIndex) -> u8 {
        index.0
    }
}

impl fmt::Display for CycleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment label reported by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentLabel {
    Paid,
    Grace,
    Lapsed,
    Other,
}

impl PaymentLabel {
    /// Map the store's label text; anything unrecognised is `Other`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "paid" => PaymentLabel::Paid,
            "grace" => PaymentLabel::Grace,
            "lapsed" => PaymentLabel::Lapsed,
            _ => PaymentLabel::Other,
        }
    }
}

/// Status of one enrolled member's installment cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleStatus {
    index: CycleIndex,
    label: PaymentLabel,
    raw_label: String,
    color_tag: String,
    elapsed_days: Option<u32>,
}

impl CycleStatus {
    /// Status as stored on a roster record fetched from the store
    pub fn from_record(
        index: u8,
        label: &str,
        color_tag: &str,
        elapsed_days: Option<u32>,
    ) -> Result<Self, CycleError> {
        let index =
            CycleIndex::new(index).map_err(|_| CycleError::ServerIndexOutOfRange(index))?;
        Ok(Self {
            index,
            label: PaymentLabel::from_label(label),
            raw_label: label.to_string(),
            color_tag: color_tag.to_string(),
            elapsed_days,
        })
    }

    /// Status carried by a successful recompute response
    pub fn from_response(response: &AdvanceCycleResponse) -> Result<Self, CycleError> {
        Self::from_record(
            response.new_index,
            &response.status_label,
            &response.status_color,
            response.elapsed_days,
        )
    }

    pub fn index(&self) -> CycleIndex {
        self.index
    }

    pub fn label(&self) -> PaymentLabel {
        self.label
    }

    /// Label text exactly as the store sent it
    pub fn raw_label(&self) -> &str {
        &self.raw_label
    }

    pub fn color_tag(&self) -> &str {
        &self.color_tag
    }

    pub fn elapsed_days(&self) -> Option<u32> {
        self.elapsed_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_bounds() {
        assert!(CycleIndex::new(1).is_ok());
        assert!(CycleIndex::new(10).is_ok());
        assert_eq!(CycleIndex::new(0), Err(CycleError::IndexOutOfRange(0)));
        assert_eq!(CycleIndex::new(11), Err(CycleError::IndexOutOfRange(11)));
    }

    #[test]
    fn test_label_mapping() {
        assert_eq!(PaymentLabel::from_label("paid"), PaymentLabel::Paid);
        assert_eq!(PaymentLabel::from_label(" Grace "), PaymentLabel::Grace);
        assert_eq!(PaymentLabel::from_label("LAPSED"), PaymentLabel::Lapsed);
        assert_eq!(PaymentLabel::from_label("suspended"), PaymentLabel::Other);
    }

    #[test]
    fn test_status_from_response() {
        let response = AdvanceCycleResponse {
            success: true,
            new_index: 3,
            status_label: "grace".to_string(),
            status_color: "amber".to_string(),
            elapsed_days: Some(12),
            message: None,
        };
        let status = CycleStatus::from_response(&response).unwrap();
        assert_eq!(status.index().get(), 3);
        assert_eq!(status.label(), PaymentLabel::Grace);
        assert_eq!(status.color_tag(), "amber");
        assert_eq!(status.elapsed_days(), Some(12));
    }

    #[test]
    fn test_server_index_out_of_range_is_not_local() {
        let error = CycleStatus::from_record(0, "paid", "green", None).unwrap_err();
        assert_eq!(error, CycleError::ServerIndexOutOfRange(0));
        assert!(!error.is_local());
    }
}
