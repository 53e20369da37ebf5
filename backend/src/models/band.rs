//! Age band model
//!
//! One row of a premium schedule. Each band describes a contiguous age
//! sub-range and its premium components:
//! - Row number (1..=7, the row's position and also its upsert key)
//! - Start and end age (both optional while the user is typing)
//! - Basic and special premium components (i64 whole units)
//! - Total (derived from the components, never edited directly)
//!
//! A band with every editable field empty is considered absent and is never
//! persisted.

use crate::models::schedule::ScheduleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rows in every premium schedule
pub const SCHEDULE_ROWS: usize = 7;

/// Position of a band within its schedule (1-based)
///
/// # Example
/// ```
/// use group_policy_desk_core::RowNum;
///
/// let row = RowNum::new(3).unwrap();
/// assert_eq!(row.get(), 3);
/// assert_eq!(row.index(), 2);
/// assert_eq!(row.next().map(RowNum::get), Some(4));
/// assert!(RowNum::new(8).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RowNum(u8);

impl RowNum {
    /// First row of a schedule
    pub const FIRST: RowNum = RowNum(1);

    /// Last row of a schedule
    pub const LAST: RowNum = RowNum(SCHEDULE_ROWS as u8);

    /// Create a row number, rejecting anything outside 1..=7
    pub fn new(row: u8) -> Result<Self, ScheduleError> {
        if row == 0 || row as usize > SCHEDULE_ROWS {
            return Err(ScheduleError::RowOutOfRange(row));
        }
        Ok(RowNum(row))
    }

    /// Row number for a zero-based array index
    pub fn from_index(index: usize) -> Option<Self> {
        if index < SCHEDULE_ROWS {
            Some(RowNum(index as u8 + 1))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-based array index
    pub fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// The following row, or None for the last row
    pub fn next(self) -> Option<RowNum> {
        RowNum::from_index(self.index() + 1)
    }

    pub fn is_last(self) -> bool {
        self == RowNum::LAST
    }

    /// Iterate over all seven row numbers in order
    pub fn all() -> impl Iterator<Item = RowNum> {
        (1..=SCHEDULE_ROWS as u8).map(RowNum)
    }
}

impl TryFrom<u8> for RowNum {
    type Error = ScheduleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        RowNum::new(value)
    }
}

impl From<RowNum> for u8 {
    fn from(row: RowNum) -> Self {
        row.0
    }
}

impl fmt::Display for RowNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single schedule row
///
/// Age setters are public because ages never influence the derived total.
/// Premium components are only written through [`crate::Schedule`], which
/// recomputes the total on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    row: RowNum,
    start_age: Option<u32>,
    end_age: Option<u32>,
    basic: Option<i64>,
    special: Option<i64>,

    /// Derived; see `schedule::totals`
    total: i64,
}

impl AgeBand {
    /// Create an empty band at the given position
    pub fn empty(row: RowNum) -> Self {
        Self {
            row,
            start_age: None,
            end_age: None,
            basic: None,
            special: None,
            total: 0,
        }
    }

    /// Seven empty bands, numbered 1..=7
    pub fn blank_rows() -> [AgeBand; SCHEDULE_ROWS] {
        std::array::from_fn(|i| AgeBand::empty(RowNum(i as u8 + 1)))
    }

    pub fn row(&self) -> RowNum {
        self.row
    }

    pub fn start_age(&self) -> Option<u32> {
        self.start_age
    }

    pub fn end_age(&self) -> Option<u32> {
        self.end_age
    }

    pub fn basic(&self) -> Option<i64> {
        self.basic
    }

    pub fn special(&self) -> Option<i64> {
        self.special
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn set_start_age(&mut self, age: Option<u32>) {
        self.start_age = age;
    }

    pub fn set_end_age(&mut self, age: Option<u32>) {
        self.end_age = age;
    }

    pub(crate) fn set_basic(&mut self, amount: Option<i64>) {
        self.basic = amount;
    }

    pub(crate) fn set_special(&mut self, amount: Option<i64>) {
        self.special = amount;
    }

    pub(crate) fn set_total(&mut self, total: i64) {
        self.total = total;
    }

    /// True when at least one editable field holds a value
    ///
    /// Only populated bands are sent to the remote store.
    pub fn is_populated(&self) -> bool {
        self.start_age.is_some()
            || self.end_age.is_some()
            || self.basic.is_some()
            || self.special.is_some()
    }

    /// True when both ages are set and the end precedes the start
    ///
    /// Reported for display only; never rejected.
    pub fn has_inverted_range(&self) -> bool {
        matches!((self.start_age, self.end_age), (Some(start), Some(end)) if end < start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_num_bounds() {
        assert!(RowNum::new(0).is_err());
        assert!(RowNum::new(1).is_ok());
        assert!(RowNum::new(7).is_ok());
        assert_eq!(RowNum::new(8), Err(ScheduleError::RowOutOfRange(8)));
    }

    #[test]
    fn test_row_num_navigation() {
        assert_eq!(RowNum::FIRST.next(), Some(RowNum(2)));
        assert_eq!(RowNum::LAST.next(), None);
        assert!(RowNum::LAST.is_last());
        assert_eq!(RowNum::all().count(), SCHEDULE_ROWS);
    }

    #[test]
    fn test_row_num_serde_rejects_out_of_range() {
        let ok: RowNum = serde_json::from_str("7").unwrap();
        assert_eq!(ok.get(), 7);
        assert!(serde_json::from_str::<RowNum>("9").is_err());
    }

    #[test]
    fn test_blank_rows_are_numbered_and_unpopulated() {
        let rows = AgeBand::blank_rows();
        for (i, band) in rows.iter().enumerate() {
            assert_eq!(band.row().index(), i);
            assert!(!band.is_populated());
            assert_eq!(band.total(), 0);
        }
    }

    #[test]
    fn test_any_single_field_populates() {
        let mut band = AgeBand::empty(RowNum::FIRST);
        band.set_end_age(Some(30));
        assert!(band.is_populated());

        let mut band = AgeBand::empty(RowNum::FIRST);
        band.set_special(Some(0));
        assert!(band.is_populated());
    }

    #[test]
    fn test_inverted_range() {
        let mut band = AgeBand::empty(RowNum::FIRST);
        band.set_start_age(Some(40));
        band.set_end_age(Some(30));
        assert!(band.has_inverted_range());

        band.set_end_age(Some(40));
        assert!(!band.has_inverted_range());
    }
}
