//! Boundary reconciler
//!
//! Keeps the seven bands a contiguous, gapless partition of the age axis
//! while the user edits boundaries, without making them retype every start
//! age.
//!
//! # Rules
//!
//! - **End age set** on row i (positive, not the last row): row i+1's start
//!   age becomes `end + 1`, overwriting whatever was there, unless it
//!   already holds that value. Only the immediately following row is
//!   touched.
//! - **End age cleared** on row i: row i+1's start age is cleared only if it
//!   still equals the value derived from row i's previous end. A start age
//!   the user has since overtyped survives.
//!
//! The reconciler never rejects input. Gaps or overlaps the user creates by
//! overtyping a derived start age are accepted; `partition_gaps` reports
//! them for display.

use crate::models::band::{AgeBand, RowNum, SCHEDULE_ROWS};
use serde::Serialize;

/// What a boundary edit did to the following row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum BoundaryChange {
    /// Following row's start age was set to `start_age`
    Propagated { row: RowNum, start_age: u32 },

    /// Following row's start age already held the derived value
    AlreadyAligned { row: RowNum },

    /// Following row's derived start age was cleared
    Cleared { row: RowNum },

    /// Following row's start age no longer matched the derived value and was kept
    Retained { row: RowNum, start_age: Option<u32> },

    /// Edited row is the last row
    NoFollowingRow,

    /// New end age is zero, so nothing is derived from it
    NotPositive,

    /// Cleared row had no positive end age to derive from
    NoPreviousEnd,

    /// `end + 1` does not fit in an age
    OutOfRange,
}

/// Apply an end-age edit to `row` and reconcile the following row
///
/// `Some(age)` is an edit, `None` clears the field. The previous end age is
/// read from the band before it is overwritten.
pub fn apply_end_age(
    bands: &mut [AgeBand; SCHEDULE_ROWS],
    row: RowNum,
    end_age: Option<u32>,
) -> BoundaryChange {
    let previous_end = bands[row.index()].end_age();
    bands[row.index()].set_end_age(end_age);

    match end_age {
        Some(new_end) => on_end_age_edited(bands, row, new_end),
        None => on_end_age_cleared(bands, row, previous_end),
    }
}

/// Propagate a newly typed end age one row forward
pub fn on_end_age_edited(
    bands: &mut [AgeBand; SCHEDULE_ROWS],
    row: RowNum,
    new_end: u32,
) -> BoundaryChange {
    if new_end == 0 {
        return BoundaryChange::NotPositive;
    }
    let Some(next) = row.next() else {
        return BoundaryChange::NoFollowingRow;
    };
    let Some(derived) = new_end.checked_add(1) else {
        return BoundaryChange::OutOfRange;
    };

    let following = &mut bands[next.index()];
    if following.start_age() == Some(derived) {
        return BoundaryChange::AlreadyAligned { row: next };
    }

    following.set_start_age(Some(derived));
    BoundaryChange::Propagated {
        row: next,
        start_age: derived,
    }
}

/// Undo the derived start age of the following row after an end age is cleared
pub fn on_end_age_cleared(
    bands: &mut [AgeBand; SCHEDULE_ROWS],
    row: RowNum,
    previous_end: Option<u32>,
) -> BoundaryChange {
    let Some(next) = row.next() else {
        return BoundaryChange::NoFollowingRow;
    };
    let Some(previous_end) = previous_end.filter(|end| *end > 0) else {
        return BoundaryChange::NoPreviousEnd;
    };

    let following = &mut bands[next.index()];
    if previous_end.checked_add(1) == following.start_age() {
        following.set_start_age(None);
        BoundaryChange::Cleared { row: next }
    } else {
        BoundaryChange::Retained {
            row: next,
            start_age: following.start_age(),
        }
    }
}

/// Adjacent rows whose boundaries do not meet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartitionGap {
    /// Row whose end age was compared
    pub row: RowNum,
    pub end_age: u32,
    pub next_start_age: u32,
}

impl PartitionGap {
    /// True for an overlap, false for a hole in the age axis
    pub fn is_overlap(&self) -> bool {
        self.next_start_age <= self.end_age
    }
}

/// List every adjacent pair with both boundaries set where
/// `next.start != end + 1`
pub fn partition_gaps(bands: &[AgeBand; SCHEDULE_ROWS]) -> Vec<PartitionGap> {
    bands
        .windows(2)
        .filter_map(|pair| {
            let end_age = pair[0].end_age()?;
            let next_start_age = pair[1].start_age()?;
            if end_age.checked_add(1) == Some(next_start_age) {
                None
            } else {
                Some(PartitionGap {
                    row: pair[0].row(),
                    end_age,
                    next_start_age,
                })
            }
        })
        .collect()
}
