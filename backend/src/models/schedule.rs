//! Premium schedule model
//!
//! A schedule is the fixed set of seven age bands stored for one policy in
//! one metering variant. At most one schedule exists per
//! `(policy_reference, variant)`.
//!
//! # Metering variants
//!
//! The two variants look alike on screen but derive totals differently:
//! - **Monthly**: components are per-period charges, total = basic + special
//! - **InstallmentTenPay**: components are per-installment amounts, total is
//!   the annualised figure, (basic + special) x 10
//!
//! Each variant is its own type implementing [`Metering`], and
//! [`Schedule`] is generic over it, so a monthly schedule can never be
//! totalled with the ten-pay formula by accident.
//!
//! # Critical Invariants
//!
//! 1. Exactly seven bands, numbered 1..=7 in order
//! 2. Every band's total equals the variant formula applied to its components
//! 3. A failed component edit leaves the band untouched

use crate::models::band::{AgeBand, RowNum, SCHEDULE_ROWS};
use crate::remote::schedule::StoredBandRow;
use crate::schedule::totals;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// Errors raised while building or editing a schedule
///
/// All of these are local validation failures; none reach the network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Row number {0} is outside 1..=7")]
    RowOutOfRange(u8),

    #[error("Row {0} appears more than once")]
    DuplicateRow(u8),

    #[error("Schedule has {count} bands, at most {max} are allowed")]
    TooManyBands { count: usize, max: usize },

    #[error("'{0}' is not a whole amount")]
    InvalidAmount(String),

    #[error("Amount {0} must not be negative")]
    NegativeAmount(i64),

    #[error("'{0}' is not a valid age")]
    InvalidAge(String),

    #[error("Total premium for row {row} is too large")]
    TotalOverflow { row: u8 },
}

/// Runtime tag of a metering variant (used on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleVariant {
    Monthly,
    InstallmentTenPay,
}

impl fmt::Display for ScheduleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleVariant::Monthly => write!(f, "monthly"),
            ScheduleVariant::InstallmentTenPay => write!(f, "installment_ten_pay"),
        }
    }
}

/// Type-level metering variant
pub trait Metering: fmt::Debug + Clone + Copy + Default + PartialEq + Eq + 'static {
    const VARIANT: ScheduleVariant;
}

/// Per-period premiums; total is the plain sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Monthly;

impl Metering for Monthly {
    const VARIANT: ScheduleVariant = ScheduleVariant::Monthly;
}

/// Per-installment premiums; total is the ten-installment annual figure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallmentTenPay;

impl Metering for InstallmentTenPay {
    const VARIANT: ScheduleVariant = ScheduleVariant::InstallmentTenPay;
}

/// Seven-row premium schedule for one policy
///
/// # Example
/// ```
/// use group_policy_desk_core::{InstallmentTenPay, RowNum, Schedule};
///
/// let mut schedule = Schedule::<InstallmentTenPay>::new("2025-S331191");
/// let row = RowNum::new(1).unwrap();
/// schedule.set_basic(row, Some(5_000)).unwrap();
/// let total = schedule.set_special(row, Some(500)).unwrap();
/// assert_eq!(total, 55_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule<M: Metering> {
    policy_reference: String,
    bands: [AgeBand; SCHEDULE_ROWS],
    metering: PhantomData<M>,
}

impl<M: Metering> Schedule<M> {
    /// Create an empty schedule (seven blank bands)
    pub fn new(policy_reference: impl Into<String>) -> Self {
        Self {
            policy_reference: policy_reference.into(),
            bands: AgeBand::blank_rows(),
            metering: PhantomData,
        }
    }

    /// Rebuild a schedule from rows fetched from the remote store
    ///
    /// Rows may arrive in any order and with gaps in numbering; each one is
    /// placed at its own row position. Stored totals are ignored and
    /// recomputed with this variant's formula.
    pub fn from_stored(
        policy_reference: impl Into<String>,
        rows: &[StoredBandRow],
    ) -> Result<Self, ScheduleError> {
        if rows.len() > SCHEDULE_ROWS {
            return Err(ScheduleError::TooManyBands {
                count: rows.len(),
                max: SCHEDULE_ROWS,
            });
        }

        let mut schedule = Self::new(policy_reference);
        let mut seen = HashSet::new();

        for stored in rows {
            let row = RowNum::new(stored.row_num)?;
            if !seen.insert(row) {
                return Err(ScheduleError::DuplicateRow(row.get()));
            }

            for amount in [stored.basic_component, stored.special_component]
                .into_iter()
                .flatten()
            {
                if amount < 0 {
                    return Err(ScheduleError::NegativeAmount(amount));
                }
            }

            let total = totals::compute_total::<M>(
                row,
                stored.basic_component,
                stored.special_component,
            )?;

            let band = &mut schedule.bands[row.index()];
            band.set_start_age(stored.start_age);
            band.set_end_age(stored.end_age);
            band.set_basic(stored.basic_component);
            band.set_special(stored.special_component);
            band.set_total(total);
        }

        Ok(schedule)
    }

    pub fn policy_reference(&self) -> &str {
        &self.policy_reference
    }

    pub fn variant(&self) -> ScheduleVariant {
        M::VARIANT
    }

    pub fn bands(&self) -> &[AgeBand; SCHEDULE_ROWS] {
        &self.bands
    }

    pub fn band(&self, row: RowNum) -> &AgeBand {
        &self.bands[row.index()]
    }

    pub(crate) fn bands_mut(&mut self) -> &mut [AgeBand; SCHEDULE_ROWS] {
        &mut self.bands
    }

    /// Set the basic component of a row and recompute its total
    ///
    /// Returns the new total. On error the row is left unchanged.
    pub fn set_basic(&mut self, row: RowNum, amount: Option<i64>) -> Result<i64, ScheduleError> {
        let special = self.band(row).special();
        let total = Self::checked_total(row, amount, special)?;

        let band = &mut self.bands[row.index()];
        band.set_basic(amount);
        band.set_total(total);
        Ok(total)
    }

    /// Set the special component of a row and recompute its total
    ///
    /// Returns the new total. On error the row is left unchanged.
    pub fn set_special(
        &mut self,
        row: RowNum,
        amount: Option<i64>,
    ) -> Result<i64, ScheduleError> {
        let basic = self.band(row).basic();
        let total = Self::checked_total(row, basic, amount)?;

        let band = &mut self.bands[row.index()];
        band.set_special(amount);
        band.set_total(total);
        Ok(total)
    }

    fn checked_total(
        row: RowNum,
        basic: Option<i64>,
        special: Option<i64>,
    ) -> Result<i64, ScheduleError> {
        for amount in [basic, special].into_iter().flatten() {
            if amount < 0 {
                return Err(ScheduleError::NegativeAmount(amount));
            }
        }
        totals::compute_total::<M>(row, basic, special)
    }

    /// Bands holding at least one value, in row order
    pub fn populated_bands(&self) -> impl Iterator<Item = &AgeBand> {
        self.bands.iter().filter(|band| band.is_populated())
    }

    /// Rows to send on save: populated bands only, row numbers preserved
    pub fn upsert_rows(&self) -> Vec<StoredBandRow> {
        self.populated_bands().map(StoredBandRow::from).collect()
    }

    /// Canonical digest of the persisted content of this schedule
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        #[derive(Serialize)]
        struct Persisted<'a> {
            policy_reference: &'a str,
            variant: ScheduleVariant,
            rows: Vec<StoredBandRow>,
        }

        crate::core::canonical_sha256(&Persisted {
            policy_reference: &self.policy_reference,
            variant: M::VARIANT,
            rows: self.upsert_rows(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(n: u8) -> RowNum {
        RowNum::new(n).unwrap()
    }

    fn stored(row_num: u8, start: u32, end: u32, basic: i64, special: i64) -> StoredBandRow {
        StoredBandRow {
            row_num,
            start_age: Some(start),
            end_age: Some(end),
            basic_component: Some(basic),
            special_component: Some(special),
            total: 0,
        }
    }

    #[test]
    fn test_new_schedule_is_blank() {
        let schedule = Schedule::<Monthly>::new("P-1");
        assert_eq!(schedule.variant(), ScheduleVariant::Monthly);
        assert_eq!(schedule.populated_bands().count(), 0);
        assert!(schedule.upsert_rows().is_empty());
    }

    #[test]
    fn test_from_stored_places_rows_by_number() {
        let rows = vec![stored(3, 41, 50, 2_000, 100), stored(1, 18, 30, 1_000, 50)];
        let schedule = Schedule::<Monthly>::from_stored("P-1", &rows).unwrap();

        assert_eq!(schedule.band(row(1)).start_age(), Some(18));
        assert_eq!(schedule.band(row(3)).end_age(), Some(50));
        assert!(!schedule.band(row(2)).is_populated());
        assert_eq!(schedule.band(row(3)).total(), 2_100);
    }

    #[test]
    fn test_from_stored_recomputes_totals_with_variant_formula() {
        let mut row1 = stored(1, 18, 30, 5_000, 500);
        row1.total = 1; // stale server value is ignored
        let schedule = Schedule::<InstallmentTenPay>::from_stored("P-1", &[row1]).unwrap();
        assert_eq!(schedule.band(row(1)).total(), 55_000);
    }

    #[test]
    fn test_from_stored_rejects_more_than_seven_rows() {
        let rows: Vec<_> = (1..=8).map(|n| stored(n, 0, 1, 1, 1)).collect();
        assert_eq!(
            Schedule::<Monthly>::from_stored("P-1", &rows),
            Err(ScheduleError::TooManyBands { count: 8, max: 7 })
        );
    }

    #[test]
    fn test_from_stored_rejects_duplicates_and_bad_rows() {
        let dup = vec![stored(2, 0, 1, 1, 1), stored(2, 2, 3, 1, 1)];
        assert_eq!(
            Schedule::<Monthly>::from_stored("P-1", &dup),
            Err(ScheduleError::DuplicateRow(2))
        );

        let bad = vec![stored(0, 0, 1, 1, 1)];
        assert_eq!(
            Schedule::<Monthly>::from_stored("P-1", &bad),
            Err(ScheduleError::RowOutOfRange(0))
        );
    }

    #[test]
    fn test_negative_component_leaves_row_untouched() {
        let mut schedule = Schedule::<Monthly>::new("P-1");
        schedule.set_basic(row(1), Some(100)).unwrap();

        let result = schedule.set_special(row(1), Some(-5));
        assert_eq!(result, Err(ScheduleError::NegativeAmount(-5)));
        assert_eq!(schedule.band(row(1)).special(), None);
        assert_eq!(schedule.band(row(1)).total(), 100);
    }

    #[test]
    fn test_fingerprint_tracks_persisted_content() {
        let mut schedule = Schedule::<Monthly>::new("P-1");
        let before = schedule.fingerprint().unwrap();

        schedule.set_basic(row(2), Some(10)).unwrap();
        let after = schedule.fingerprint().unwrap();
        assert_ne!(before, after);

        schedule.set_basic(row(2), None).unwrap();
        assert_eq!(schedule.fingerprint().unwrap(), before);
    }
}
