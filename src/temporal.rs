//! Parsers turning loosely formatted textual temporal values into the C date, time and
//! timestamp structs.
//!
//! The server sends every temporal value as text and is liberal about separators, so the
//! parsers work on the digit stream alone. Zero month or day components (`"2020-00-00"`) are
//! legal on the server but not in the ODBC structs; the zero to minimum policy decides whether
//! they are coerced to 1 or rejected.

use atoi::FromRadix10;
use odbc_sys::{Date, Time, Timestamp};
use thiserror::Error as ThisError;

/// A textual value could not be converted into a date, time or timestamp.
#[derive(Debug, ThisError, PartialEq, Eq, Clone)]
#[error("'{text}' cannot be converted to a date or time value")]
pub struct TemporalParseError {
    /// The offending input text.
    pub text: String,
}

impl TemporalParseError {
    fn new(text: &str) -> Self {
        TemporalParseError {
            text: text.to_owned(),
        }
    }
}

/// Convert a string into a timestamp.
///
/// All non digit characters are stripped and the digit stream is brought into the canonical 14
/// digit `YYYYMMDDHHMMSS` form: 6 and 12 digit forms (`YYMMDD[HHMMSS]`) gain a century prefix,
/// `"20"` for two digit years up to the sixties and `"19"` beyond, and short streams are padded
/// with zeroes on the right. With `zero_to_min` a zero month or day is coerced to 1, otherwise
/// it fails.
pub fn parse_timestamp(text: &str, zero_to_min: bool) -> Result<Timestamp, TemporalParseError> {
    let mut digits = [b'0'; 14];
    let mut len = 0;
    for &byte in text.as_bytes() {
        if len == digits.len() {
            break;
        }
        if byte.is_ascii_digit() {
            digits[len] = byte;
            len += 1;
        }
    }

    // YYMMDD or YYMMDDHHMMSS. Insert the century.
    if len == 6 || len == 12 {
        digits.copy_within(0..len, 2);
        let century: &[u8; 2] = if digits[2] <= b'6' { b"20" } else { b"19" };
        digits[..2].copy_from_slice(century);
    }

    if &digits[4..6] == b"00" || &digits[6..8] == b"00" {
        if !zero_to_min {
            return Err(TemporalParseError::new(text));
        }
        if &digits[4..6] == b"00" {
            digits[5] = b'1';
        }
        if &digits[6..8] == b"00" {
            digits[7] = b'1';
        }
    }

    Ok(Timestamp {
        year: u16::from_radix_10(&digits[0..4]).0 as i16,
        month: u16::from_radix_10(&digits[4..6]).0,
        day: u16::from_radix_10(&digits[6..8]).0,
        hour: u16::from_radix_10(&digits[8..10]).0,
        minute: u16::from_radix_10(&digits[10..12]).0,
        second: u16::from_radix_10(&digits[12..14]).0,
        fraction: 0,
    })
}

/// Convert a string into a date.
///
/// The year is four digits wide if the leading digit run has 4, 8 or at least 14 digits
/// (`YYYY-MM-DD`, `YYYYMMDD`, full timestamps), two otherwise. Missing trailing fields default
/// to 1. A zero month or day fails unless `zero_to_min` requests coercion to the minimum valid
/// date.
pub fn parse_date(text: &str, zero_to_min: bool) -> Result<Date, TemporalParseError> {
    let bytes = text.as_bytes();
    let mut pos = bytes.iter().position(|b| b.is_ascii_digit()).unwrap_or(bytes.len());
    if pos == bytes.len() {
        // No digits at all, nothing to build a date from.
        return Err(TemporalParseError::new(text));
    }

    let leading_digits = bytes[pos..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let year_length = if leading_digits == 4 || leading_digits == 8 || leading_digits >= 14 {
        4
    } else {
        2
    };

    let mut fields = [0u32; 3];
    let mut count = 0;
    let mut field_length = year_length;
    while count < 3 && pos < bytes.len() {
        let group = &bytes[pos..bytes.len().min(pos + field_length)];
        let (value, used) = u32::from_radix_10(group);
        fields[count] = value;
        count += 1;
        pos += used;
        // Skip the separator run. Leftover digits of a contiguous form feed the next field.
        while pos < bytes.len() && !bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        field_length = 2;
    }

    // Only a lone year or a field which is present but zero triggers the policy. A merely
    // missing trailing field always defaults to 1.
    let month_zero = count >= 2 && fields[1] == 0;
    let day_zero = count >= 3 && fields[2] == 0;
    if (count <= 1 || month_zero || day_zero) && !zero_to_min {
        return Err(TemporalParseError::new(text));
    }
    Ok(Date {
        year: fields[0] as i16,
        month: if count >= 2 && fields[1] != 0 {
            fields[1] as u16
        } else {
            1
        },
        day: if count >= 3 && fields[2] != 0 {
            fields[2] as u16
        } else {
            1
        },
    })
}

/// Convert a string into a time of day by taking its first six digits as `HHMMSS`. Missing
/// digits read as zero. No range validation is performed.
pub fn parse_time(text: &str) -> Time {
    let mut digits = [b'0'; 6];
    let mut len = 0;
    for &byte in text.as_bytes() {
        if len == digits.len() {
            break;
        }
        if byte.is_ascii_digit() {
            digits[len] = byte;
            len += 1;
        }
    }
    Time {
        hour: u16::from_radix_10(&digits[0..2]).0,
        minute: u16::from_radix_10(&digits[2..4]).0,
        second: u16::from_radix_10(&digits[4..6]).0,
    }
}

/// Convert a time string to a single integer of the form `HHMMSS`.
///
/// Up to three digit groups separated by non digit runs are extracted, so `HHMMSS`, `HH:MM:SS`,
/// `HH.MM.SS` and `{t HH:MM:SS}` are all recognized. If content remains after three groups the
/// remainder is re-parsed as a fresh timestamp shaped string, tolerating timestamps used as
/// times. If fewer than three groups are present, or the first group already exceeds 10000, the
/// first group is returned as is.
pub fn parse_time_as_seconds(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut groups = [0u32; 3];
    let mut count = 0;
    let mut pos = match bytes.iter().position(|b| b.is_ascii_digit()) {
        Some(start) => start,
        None => return 0,
    };
    while count < 3 && pos < bytes.len() {
        let (value, used) = u32::from_radix_10(&bytes[pos..]);
        groups[count] = value;
        count += 1;
        pos += used;
        while pos < bytes.len() && !bytes[pos].is_ascii_digit() {
            pos += 1;
        }
    }
    if pos < bytes.len() {
        // More digit groups follow, the value is a full timestamp.
        return parse_time_as_seconds(&text[pos..]);
    }
    if groups[0] > 10000 || count < 3 {
        return groups[0];
    }
    groups[0] * 10000 + groups[1] * 100 + groups[2]
}
