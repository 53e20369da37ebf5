//! As-you-type formatting for id numbers and phone numbers
//!
//! Formatting is re-applied to the whole field on every keystroke: the
//! input is reduced to its digits and regrouped. Digits beyond the
//! field's length are kept after the last group so that validation can
//! reject the number instead of submitting a shortened one.
//!
//! | Field     | Digits | Grouping                 |
//! |-----------|--------|--------------------------|
//! | id number | 13     | `XXXXXX-XXXXXXX`         |
//! | mobile    | 10     | `XXX-XXX-XXXX`           |
//! | landline  | 9      | `XX-XXX-XXXX`            |

/// Digits in a complete id number
pub const ID_NUMBER_DIGITS: usize = 13;

/// Digits after which the id separator is inserted
const ID_SPLIT: usize = 6;

/// Digits in a mobile number (the longest phone pattern)
pub const MOBILE_DIGITS: usize = 10;

/// Digits in a landline number
pub const LANDLINE_DIGITS: usize = 9;

/// Keep only ASCII digits
pub fn strip_formatting(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Format an id number as typed
///
/// # Example
/// ```
/// use group_policy_desk_core::endorsement::format::format_id_number;
///
/// assert_eq!(format_id_number("12345", '-'), "12345");
/// assert_eq!(format_id_number("1234567", '-'), "123456-7");
/// assert_eq!(format_id_number("1 2345 67890 12 3", '-'), "123456-7890123");
/// assert_eq!(format_id_number("12345678901234", '-'), "123456-78901234");
/// ```
pub fn format_id_number(input: &str, separator: char) -> String {
    group(&strip_formatting(input), &[ID_SPLIT], separator)
}

/// Format a phone number as typed
///
/// Partial input follows the mobile grouping. Exactly nine digits is read
/// as a landline, so a mobile number reflows once on its ninth digit
/// (`081-234-567` shows as `08-123-4567`) and again on its tenth
/// (`081-234-5678`). Extra digits stay in the last group.
///
/// # Example
/// ```
/// use group_policy_desk_core::endorsement::format::format_phone;
///
/// assert_eq!(format_phone("081", '-'), "081");
/// assert_eq!(format_phone("08123", '-'), "081-23");
/// assert_eq!(format_phone("0812345678", '-'), "081-234-5678");
/// assert_eq!(format_phone("021234567", '-'), "02-123-4567");
/// assert_eq!(format_phone("08123456789", '-'), "081-234-56789");
/// ```
pub fn format_phone(input: &str, separator: char) -> String {
    let digits = strip_formatting(input);

    if digits.len() == LANDLINE_DIGITS {
        group(&digits, &[2, 5], separator)
    } else {
        group(&digits, &[3, 6], separator)
    }
}

/// Insert `separator` after each split position that lies inside `digits`
fn group(digits: &str, splits: &[usize], separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + splits.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && splits.contains(&i) {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_formatting() {
        assert_eq!(strip_formatting("123456-7890123"), "1234567890123");
        assert_eq!(strip_formatting(" (081) 234 5678 "), "0812345678");
        assert_eq!(strip_formatting("abc"), "");
    }

    #[test]
    fn test_id_number_separator_after_sixth_digit() {
        assert_eq!(format_id_number("123456", '-'), "123456");
        assert_eq!(format_id_number("1234567890123", '-'), "123456-7890123");
    }

    #[test]
    fn test_id_number_keeps_extra_digits() {
        assert_eq!(format_id_number("12345678901234567", '-'), "123456-78901234567");
        assert_eq!(strip_formatting(&format_id_number("12345678901234", '-')).len(), 14);
    }

    #[test]
    fn test_id_number_reformat_is_stable() {
        let once = format_id_number("1234567890123", '-');
        assert_eq!(format_id_number(&once, '-'), once);
    }

    #[test]
    fn test_phone_progressive_mobile_grouping() {
        assert_eq!(format_phone("0812", '-'), "081-2");
        assert_eq!(format_phone("0812345", '-'), "081-234-5");
        assert_eq!(format_phone("08123456", '-'), "081-234-56");
    }

    #[test]
    fn test_phone_keeps_extra_digits() {
        assert_eq!(format_phone("08123456789999", '-'), "081-234-56789999");
    }

    #[test]
    fn test_phone_reflows_through_landline_length() {
        assert_eq!(format_phone("08123456", '-'), "081-234-56");
        assert_eq!(format_phone("081234567", '-'), "08-123-4567");
        assert_eq!(format_phone("0812345678", '-'), "081-234-5678");
    }

    #[test]
    fn test_phone_nine_digits_is_landline() {
        assert_eq!(format_phone("02-123-4567", '-'), "02-123-4567");
        assert_eq!(format_phone("021234567", ' '), "02 123 4567");
    }
}
