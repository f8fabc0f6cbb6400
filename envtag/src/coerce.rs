//! Built-in string coercions for the scalar kinds

use crate::duration::{Duration, DurationError};
use crate::target::Scalar;

/// Why a value could not be converted into a scalar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CoerceError {
    #[error("parsing \"{0}\": invalid syntax")]
    Syntax(String),
    #[error("parsing \"{0}\": value out of range")]
    Range(String),
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error("negative duration \"{0}\" cannot be stored in an unsigned duration")]
    NegativeDuration(String),
}

/// Writes `text` into `scalar`. On error the scalar is left untouched.
pub(crate) fn coerce(scalar: Scalar<'_>, text: &str) -> Result<(), CoerceError> {
    match scalar {
        Scalar::Bool(v) => *v = parse_bool(text)?,
        Scalar::I8(v) => *v = parse_int(text, 8)? as i8,
        Scalar::I16(v) => *v = parse_int(text, 16)? as i16,
        Scalar::I32(v) => *v = parse_int(text, 32)? as i32,
        Scalar::I64(v) => *v = parse_int(text, 64)?,
        Scalar::Isize(v) => *v = parse_int(text, isize::BITS)? as isize,
        Scalar::U8(v) => *v = parse_uint(text, 8)? as u8,
        Scalar::U16(v) => *v = parse_uint(text, 16)? as u16,
        Scalar::U32(v) => *v = parse_uint(text, 32)? as u32,
        Scalar::U64(v) => *v = parse_uint(text, 64)?,
        Scalar::Usize(v) => *v = parse_uint(text, usize::BITS)? as usize,
        Scalar::F32(v) => *v = parse_f32(text)?,
        Scalar::F64(v) => *v = parse_f64(text)?,
        Scalar::Str(v) => text.clone_into(v),
        Scalar::Duration(v) => *v = text.parse()?,
        Scalar::StdDuration(v) => {
            let parsed: Duration = text.parse()?;
            *v = parsed
                .to_std()
                .ok_or_else(|| CoerceError::NegativeDuration(text.to_string()))?;
        }
    }
    Ok(())
}

pub(crate) fn parse_bool(text: &str) -> Result<bool, CoerceError> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::Syntax(text.to_string())),
    }
}

/// Detects the radix from a `0x`, `0o`, `0b` or bare `0` prefix and returns
/// it with the remaining digits. Whether a prefix was present decides if
/// underscores are allowed.
fn split_radix(digits: &str) -> (u32, &str, bool) {
    let bytes = digits.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' {
        match bytes[1] {
            b'x' | b'X' => return (16, &digits[2..], true),
            b'o' | b'O' => return (8, &digits[2..], true),
            b'b' | b'B' => return (2, &digits[2..], true),
            _ => return (8, &digits[1..], true),
        }
    }
    (10, digits, false)
}

/// Underscores must sit between digits, or directly after a base prefix.
fn underscores_ok(digits: &str, prefixed: bool) -> bool {
    if !digits.contains('_') {
        return true;
    }
    if !prefixed {
        return false;
    }
    // A base prefix counts as a digit on the left.
    let mut prev_digit = true;
    let mut prev_underscore = false;
    for c in digits.chars() {
        if c == '_' {
            if !prev_digit {
                return false;
            }
            prev_underscore = true;
            prev_digit = false;
        } else {
            prev_underscore = false;
            prev_digit = true;
        }
    }
    !prev_underscore
}

/// Parses an unsigned magnitude without sign handling.
fn parse_magnitude(text: &str, digits: &str) -> Result<u64, CoerceError> {
    let syntax = || CoerceError::Syntax(text.to_string());
    let (radix, rest, prefixed) = split_radix(digits);
    if !underscores_ok(rest, prefixed) {
        return Err(syntax());
    }
    let cleaned: String = rest.chars().filter(|&c| c != '_').collect();
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_digit(radix)) {
        return Err(syntax());
    }
    u64::from_str_radix(&cleaned, radix).map_err(|_| CoerceError::Range(text.to_string()))
}

pub(crate) fn parse_uint(text: &str, bits: u32) -> Result<u64, CoerceError> {
    let value = parse_magnitude(text, text)?;
    let max = if bits >= 64 { u64::MAX } else { (1 << bits) - 1 };
    if value > max {
        return Err(CoerceError::Range(text.to_string()));
    }
    Ok(value)
}

pub(crate) fn parse_int(text: &str, bits: u32) -> Result<i64, CoerceError> {
    let (neg, digits) = split_sign(text);
    let magnitude = parse_magnitude(text, digits)?;
    let cutoff = 1u64 << (bits.min(64) - 1);
    if neg {
        if magnitude > cutoff {
            return Err(CoerceError::Range(text.to_string()));
        }
        // magnitude <= 2^63 here, so the wrapping negation is exact
        Ok((magnitude as i64).wrapping_neg())
    } else {
        if magnitude >= cutoff {
            return Err(CoerceError::Range(text.to_string()));
        }
        Ok(magnitude as i64)
    }
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

fn is_hex_float(text: &str) -> bool {
    let (_, unsigned) = split_sign(text);
    unsigned.starts_with("0x") || unsigned.starts_with("0X")
}

/// Parses a hexadecimal literal such as `0x1.8p3`. The `p` exponent is
/// required and underscores may separate digits.
fn parse_hex_float(text: &str) -> Result<f64, CoerceError> {
    let syntax = || CoerceError::Syntax(text.to_string());
    let (neg, unsigned) = split_sign(text);
    let body = &unsigned[2..];
    let (mantissa, exponent) = body.split_once(['p', 'P']).ok_or_else(syntax)?;
    if !underscores_ok(mantissa, true) {
        return Err(syntax());
    }

    let (exp_neg, exp_digits) = split_sign(exponent);
    if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(syntax());
    }
    // Clamped far beyond the range where the result is zero or infinite
    let mut exp = exp_digits
        .bytes()
        .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(100_000));
    if exp_neg {
        exp = -exp;
    }

    let mut bits: u64 = 0;
    let mut any_digit = false;
    let mut seen_dot = false;
    for c in mantissa.chars().filter(|&c| c != '_') {
        if c == '.' {
            if seen_dot {
                return Err(syntax());
            }
            seen_dot = true;
            continue;
        }
        let digit = c.to_digit(16).ok_or_else(syntax)?;
        any_digit = true;
        if bits < 1 << 60 {
            bits = bits * 16 + u64::from(digit);
            if seen_dot {
                exp -= 4;
            }
        } else {
            // Past 60 bits only a sticky bit matters for rounding
            if digit != 0 {
                bits |= 1;
            }
            if !seen_dot {
                exp += 4;
            }
        }
    }
    if !any_digit {
        return Err(syntax());
    }

    let mut value = bits as f64;
    while exp > 1000 {
        value *= 2f64.powi(1000);
        exp -= 1000;
    }
    while exp < -1000 {
        value *= 2f64.powi(-1000);
        exp += 1000;
    }
    value *= 2f64.powi(exp as i32);
    Ok(if neg { -value } else { value })
}

pub(crate) fn parse_f64(text: &str) -> Result<f64, CoerceError> {
    let value: f64 = if is_hex_float(text) {
        parse_hex_float(text)?
    } else {
        text.parse()
            .map_err(|_| CoerceError::Syntax(text.to_string()))?
    };
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(CoerceError::Range(text.to_string()));
    }
    Ok(value)
}

pub(crate) fn parse_f32(text: &str) -> Result<f32, CoerceError> {
    let value: f32 = if is_hex_float(text) {
        parse_hex_float(text)? as f32
    } else {
        text.parse()
            .map_err(|_| CoerceError::Syntax(text.to_string()))?
    };
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(CoerceError::Range(text.to_string()));
    }
    Ok(value)
}
