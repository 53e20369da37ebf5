// Endorsement batch validation
//
// Client-side checks run before any network call:
// - Batch size limit
// - Endorsement date shape
// - At least one filled row
// - Required id number and phone on filled rows
// - Id number and phone digit counts
//
// The store re-validates; these checks exist so the user sees a specific
// message without a round trip.

use crate::endorsement::format::{
    strip_formatting, ID_NUMBER_DIGITS, LANDLINE_DIGITS, MOBILE_DIGITS,
};
use crate::endorsement::row::{EndorsementContext, EndorsementRow, MAX_BATCH_ROWS};
use crate::remote::endorsement::EndorsementSubmissionRow;
use thiserror::Error;

/// Validation errors (rows are numbered from 1)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndorsementError {
    #[error("At least one member name is required")]
    NoFilledRows,

    #[error("Row {row}: id number is required")]
    MissingIdNumber { row: usize },

    #[error("Row {row}: phone number is required")]
    MissingPhone { row: usize },

    #[error("Row {row}: id number must have 13 digits, found {digits}")]
    MalformedIdNumber { row: usize, digits: usize },

    #[error("Row {row}: phone number must have 9 or 10 digits, found {digits}")]
    MalformedPhone { row: usize, digits: usize },

    #[error("Batch has {count} rows, at most {max} are allowed")]
    TooManyRows { count: usize, max: usize },

    #[error("Row {0} does not exist; rows are numbered 1 to 10")]
    RowOutOfRange(usize),

    #[error("Endorsement date '{0}' is not a valid YYYY-MM-DD date")]
    InvalidEndorsementDate(String),
}

/// Validation result
pub type ValidationResult = Result<(), Vec<EndorsementError>>;

/// Validate a batch and produce its submission rows
///
/// Runs every check and returns all errors found. On success the returned
/// rows are the filled rows only, in their original order, with names
/// trimmed and id numbers/phones reduced to digits.
///
/// # Example
///
/// ```rust
/// use group_policy_desk_core::endorsement::{validate_batch, EndorsementContext, EndorsementRow};
///
/// let context = EndorsementContext {
///     policy_row_id: 42,
///     insurer_code: "INS01".to_string(),
///     policy_number: "2025-S331191".to_string(),
///     certificate_kind: "group".to_string(),
///     endorsement_date: "2025-03-01".to_string(),
///     actor_name: "clerk".to_string(),
/// };
/// let rows = vec![
///     EndorsementRow::new("Anan", "123456-7890123", "081-234-5678"),
///     EndorsementRow::default(),
/// ];
///
/// let submission = validate_batch(&context, &rows).unwrap();
/// assert_eq!(submission.len(), 1);
/// assert_eq!(submission[0].id_number, "1234567890123");
/// ```
pub fn validate_batch(
    context: &EndorsementContext,
    rows: &[EndorsementRow],
) -> Result<Vec<EndorsementSubmissionRow>, Vec<EndorsementError>> {
    let mut errors = Vec::new();

    if let Err(e) = validate_batch_size(rows) {
        errors.extend(e);
    }

    if let Err(e) = validate_endorsement_date(&context.endorsement_date) {
        errors.extend(e);
    }

    if !rows.iter().any(EndorsementRow::is_filled) {
        errors.push(EndorsementError::NoFilledRows);
    }

    for (i, row) in rows.iter().enumerate() {
        if let Err(e) = validate_row(i + 1, row) {
            errors.extend(e);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(rows
        .iter()
        .filter(|row| row.is_filled())
        .map(|row| EndorsementSubmissionRow {
            name: row.name.trim().to_string(),
            id_number: strip_formatting(&row.id_number),
            phone: strip_formatting(&row.phone),
        })
        .collect())
}

// ============================================================================
// Batch-level checks
// ============================================================================

fn validate_batch_size(rows: &[EndorsementRow]) -> ValidationResult {
    if rows.len() > MAX_BATCH_ROWS {
        Err(vec![EndorsementError::TooManyRows {
            count: rows.len(),
            max: MAX_BATCH_ROWS,
        }])
    } else {
        Ok(())
    }
}

/// Accept a calendar date written `YYYY-MM-DD`
pub fn validate_endorsement_date(date: &str) -> ValidationResult {
    let invalid = || Err(vec![EndorsementError::InvalidEndorsementDate(date.to_string())]);

    let bytes = date.as_bytes();
    if !date.is_ascii() || bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return invalid();
    }

    let field = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &date[range];
        if part.bytes().all(|b| b.is_ascii_digit()) {
            part.parse().ok()
        } else {
            None
        }
    };

    let (Some(year), Some(month), Some(day)) = (field(0..4), field(5..7), field(8..10)) else {
        return invalid();
    };

    if year < 1900 || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month)
    {
        return invalid();
    }

    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
        2 => 28,
        _ => 31,
    }
}

// ============================================================================
// Row-level checks
// ============================================================================

/// Check one row; blank (unfilled) rows always pass
fn validate_row(row_number: usize, row: &EndorsementRow) -> ValidationResult {
    if !row.is_filled() {
        return Ok(());
    }

    let mut errors = Vec::new();

    let id_digits = strip_formatting(&row.id_number).len();
    if row.id_number.trim().is_empty() {
        errors.push(EndorsementError::MissingIdNumber { row: row_number });
    } else if id_digits != ID_NUMBER_DIGITS {
        errors.push(EndorsementError::MalformedIdNumber {
            row: row_number,
            digits: id_digits,
        });
    }

    let phone_digits = strip_formatting(&row.phone).len();
    if row.phone.trim().is_empty() {
        errors.push(EndorsementError::MissingPhone { row: row_number });
    } else if phone_digits != LANDLINE_DIGITS && phone_digits != MOBILE_DIGITS {
        errors.push(EndorsementError::MalformedPhone {
            row: row_number,
            digits: phone_digits,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(date: &str) -> EndorsementContext {
        EndorsementContext {
            policy_row_id: 1,
            insurer_code: "INS01".to_string(),
            policy_number: "P-1".to_string(),
            certificate_kind: "group".to_string(),
            endorsement_date: date.to_string(),
            actor_name: "clerk".to_string(),
        }
    }

    #[test]
    fn test_valid_dates() {
        assert!(validate_endorsement_date("2025-03-01").is_ok());
        assert!(validate_endorsement_date("2024-02-29").is_ok());
        assert!(validate_endorsement_date("2000-02-29").is_ok());
    }

    #[test]
    fn test_invalid_dates() {
        for date in [
            "", "2025-3-01", "2025/03/01", "2025-13-01", "2025-02-29", "1900-02-29", "2025-04-31",
            "2025-00-10", "20a5-01-01", "1899-12-31",
        ] {
            assert!(
                validate_endorsement_date(date).is_err(),
                "{} should be rejected",
                date
            );
        }
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let rows = vec![
            EndorsementRow::default(),
            EndorsementRow::new("Anan", "1234567890123", "0812345678"),
            EndorsementRow::default(),
        ];
        let submission = validate_batch(&context("2025-03-01"), &rows).unwrap();
        assert_eq!(submission.len(), 1);
        assert_eq!(submission[0].name, "Anan");
    }

    #[test]
    fn test_all_errors_are_collected() {
        let rows = vec![
            EndorsementRow::new("Anan", "", ""),
            EndorsementRow::new("Boon", "12345678901", "0812"),
        ];
        let errors = validate_batch(&context("bad"), &rows).unwrap_err();

        assert_eq!(
            errors,
            vec![
                EndorsementError::InvalidEndorsementDate("bad".to_string()),
                EndorsementError::MissingIdNumber { row: 1 },
                EndorsementError::MissingPhone { row: 1 },
                EndorsementError::MalformedIdNumber { row: 2, digits: 11 },
                EndorsementError::MalformedPhone { row: 2, digits: 4 },
            ]
        );
    }

    #[test]
    fn test_too_many_rows() {
        let rows = vec![EndorsementRow::new("Anan", "1234567890123", "0812345678"); 11];
        let errors = validate_batch(&context("2025-03-01"), &rows).unwrap_err();
        assert_eq!(
            errors,
            vec![EndorsementError::TooManyRows { count: 11, max: 10 }]
        );
    }

    #[test]
    fn test_no_filled_rows() {
        let rows = vec![EndorsementRow::default(); 10];
        let errors = validate_batch(&context("2025-03-01"), &rows).unwrap_err();
        assert_eq!(errors, vec![EndorsementError::NoFilledRows]);
    }
}
