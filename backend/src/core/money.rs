//! Money and age text handling
//!
//! Premium amounts are typed with locale thousands separators and displayed
//! the same way, but always travel to the remote store separator-free.
//!
//! CRITICAL: All money values are i64 whole currency units

use crate::models::schedule::ScheduleError;

/// Format an amount with a thousands separator.
///
/// # Example
/// ```
/// use group_policy_desk_core::core::format_amount;
///
/// assert_eq!(format_amount(15_000, ','), "15,000");
/// assert_eq!(format_amount(-1_234_567, ','), "-1,234,567");
/// assert_eq!(format_amount(999, ','), "999");
/// ```
pub fn format_amount(amount: i64, separator: char) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a derived total for display.
///
/// A total that reduces to zero renders as an empty string, never `"0"`.
pub fn format_total(total: i64, separator: char) -> String {
    if total == 0 {
        String::new()
    } else {
        format_amount(total, separator)
    }
}

/// Parse a typed premium amount.
///
/// Blank input means "no value". Thousands separators and whitespace are
/// ignored. Negative and non-integer input is rejected.
///
/// # Example
/// ```
/// use group_policy_desk_core::core::parse_amount;
///
/// assert_eq!(parse_amount("12,000", ',').unwrap(), Some(12_000));
/// assert_eq!(parse_amount("   ", ',').unwrap(), None);
/// assert!(parse_amount("12.50", ',').is_err());
/// ```
pub fn parse_amount(input: &str, separator: char) -> Result<Option<i64>, ScheduleError> {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != separator && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }

    let value: i64 = cleaned
        .parse()
        .map_err(|_| ScheduleError::InvalidAmount(input.trim().to_string()))?;

    if value < 0 {
        return Err(ScheduleError::NegativeAmount(value));
    }

    Ok(Some(value))
}

/// Parse a typed age boundary. Blank input means "no value".
pub fn parse_age(input: &str) -> Result<Option<u32>, ScheduleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| ScheduleError::InvalidAge(trimmed.to_string()))
}
