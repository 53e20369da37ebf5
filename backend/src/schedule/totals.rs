//! Totals calculator
//!
//! Derives a band's total premium from its basic and special components.
//! The formula is selected by the schedule's metering variant:
//!
//! | Variant             | Total                         |
//! |---------------------|-------------------------------|
//! | `Monthly`           | basic + special               |
//! | `InstallmentTenPay` | (basic + special) x 10        |
//!
//! A missing component counts as zero. Arithmetic is checked; overflow is
//! reported instead of wrapping.

use crate::models::band::RowNum;
use crate::models::schedule::{Metering, ScheduleError, ScheduleVariant};

/// Number of equal installments in the ten-pay variant
pub const TEN_PAY_INSTALLMENTS: i64 = 10;

/// Compute a row total for metering `M`
///
/// # Example
/// ```
/// use group_policy_desk_core::schedule::totals::compute_total;
/// use group_policy_desk_core::{InstallmentTenPay, Monthly, RowNum};
///
/// let row = RowNum::new(1).unwrap();
/// assert_eq!(compute_total::<Monthly>(row, Some(12_000), Some(3_000)).unwrap(), 15_000);
/// assert_eq!(compute_total::<InstallmentTenPay>(row, Some(5_000), Some(500)).unwrap(), 55_000);
/// ```
pub fn compute_total<M: Metering>(
    row: RowNum,
    basic: Option<i64>,
    special: Option<i64>,
) -> Result<i64, ScheduleError> {
    total_for_variant(M::VARIANT, basic.unwrap_or(0), special.unwrap_or(0))
        .ok_or(ScheduleError::TotalOverflow { row: row.get() })
}

fn total_for_variant(variant: ScheduleVariant, basic: i64, special: i64) -> Option<i64> {
    let sum = basic.checked_add(special)?;
    match variant {
        ScheduleVariant::Monthly => Some(sum),
        ScheduleVariant::InstallmentTenPay => sum.checked_mul(TEN_PAY_INSTALLMENTS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule::{InstallmentTenPay, Monthly};

    #[test]
    fn test_monthly_is_plain_sum() {
        assert_eq!(
            compute_total::<Monthly>(RowNum::FIRST, Some(12_000), Some(3_000)),
            Ok(15_000)
        );
    }

    #[test]
    fn test_ten_pay_annualises() {
        assert_eq!(
            compute_total::<InstallmentTenPay>(RowNum::FIRST, Some(5_000), Some(500)),
            Ok(55_000)
        );
    }

    #[test]
    fn test_missing_components_count_as_zero() {
        assert_eq!(compute_total::<Monthly>(RowNum::FIRST, None, None), Ok(0));
        assert_eq!(
            compute_total::<InstallmentTenPay>(RowNum::FIRST, None, Some(700)),
            Ok(7_000)
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        assert_eq!(
            compute_total::<Monthly>(RowNum::LAST, Some(i64::MAX), Some(1)),
            Err(ScheduleError::TotalOverflow { row: 7 })
        );
        assert_eq!(
            compute_total::<InstallmentTenPay>(RowNum::FIRST, Some(i64::MAX / 5), None),
            Err(ScheduleError::TotalOverflow { row: 1 })
        );
    }
}
