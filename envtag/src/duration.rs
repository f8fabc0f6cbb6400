//! Signed durations written as compound literals such as `1h2m3s4ms5us6ns`

use std::fmt;
use std::str::FromStr;

/// A signed span of time with nanosecond resolution.
///
/// Parsed from literals of the form `[-+]?(<num>[.<frac>]<unit>)+`, where a
/// unit is one of `h`, `m`, `s`, `ms`, `us` (or `µs`/`μs`) and `ns`. The
/// literal `0` needs no unit.
///
/// ```rust
/// use envtag::Duration;
///
/// let d: Duration = "1h2m3.5s".parse().unwrap();
/// assert_eq!(d.as_nanos(), 3_723_500_000_000);
/// assert_eq!(d.to_string(), "1h2m3.5s");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Self = Self(0);
    pub const NANOSECOND: Self = Self(NANOSECOND);
    pub const MICROSECOND: Self = Self(MICROSECOND);
    pub const MILLISECOND: Self = Self(MILLISECOND);
    pub const SECOND: Self = Self(SECOND);
    pub const MINUTE: Self = Self(MINUTE);
    pub const HOUR: Self = Self(HOUR);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Converts to a `std::time::Duration`, or `None` when negative.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0)
            .ok()
            .map(std::time::Duration::from_nanos)
    }
}

const NANOSECOND: i64 = 1;
const MICROSECOND: i64 = 1000 * NANOSECOND;
const MILLISECOND: i64 = 1000 * MICROSECOND;
const SECOND: i64 = 1000 * MILLISECOND;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;

/// Magnitude of `i64::MIN`, the largest accumulated value a literal may reach.
const LIMIT: u64 = 1 << 63;

fn unit_nanos(unit: &str) -> Option<u64> {
    let nanos = match unit {
        "ns" => NANOSECOND,
        "us" | "\u{b5}s" | "\u{3bc}s" => MICROSECOND,
        "ms" => MILLISECOND,
        "s" => SECOND,
        "m" => MINUTE,
        "h" => HOUR,
        _ => return None,
    };
    Some(nanos as u64)
}

/// Failure to read a duration literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("invalid duration \"{0}\"")]
    Invalid(String),
    #[error("missing unit in duration \"{0}\"")]
    MissingUnit(String),
    #[error("unknown unit \"{unit}\" in duration \"{literal}\"")]
    UnknownUnit { unit: String, literal: String },
    #[error("duration \"{0}\" out of range")]
    Overflow(String),
}

fn is_digit_or_dot(c: char) -> bool {
    c == '.' || c.is_ascii_digit()
}

/// Splits the leading run of ASCII digits off `s` and accumulates it.
/// Returns `None` when the value exceeds `LIMIT`.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for b in s[..end].bytes() {
        if x > LIMIT / 10 {
            return None;
        }
        x = x * 10 + u64::from(b - b'0');
        if x > LIMIT {
            return None;
        }
    }
    Some((x, &s[end..]))
}

/// Like `leading_int`, but digits that no longer fit are dropped and the
/// returned scale tracks the power of ten actually consumed.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale = 1.0;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        if x > (LIMIT - 1) / 10 {
            overflow = true;
            continue;
        }
        let y = x * 10 + u64::from(b - b'0');
        if y > LIMIT {
            overflow = true;
            continue;
        }
        x = y;
        scale *= 10.0;
    }
    (x, scale, &s[end..])
}

impl FromStr for Duration {
    type Err = DurationError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::Invalid(literal.to_string());
        let overflow = || DurationError::Overflow(literal.to_string());

        let mut s = literal;
        let mut neg = false;
        if let Some(rest) = s.strip_prefix('-') {
            neg = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('+') {
            s = rest;
        }

        if s == "0" {
            return Ok(Self::ZERO);
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut total: u64 = 0;
        while !s.is_empty() {
            if !s.starts_with(is_digit_or_dot) {
                return Err(invalid());
            }

            let before = s.len();
            let (mut value, rest) = leading_int(s).ok_or_else(invalid)?;
            s = rest;
            let has_int = before != s.len();

            let mut fraction = 0;
            let mut scale = 1.0;
            let mut has_fraction = false;
            if let Some(rest) = s.strip_prefix('.') {
                let before = rest.len();
                let (f, sc, rest) = leading_fraction(rest);
                fraction = f;
                scale = sc;
                has_fraction = before != rest.len();
                s = rest;
            }
            if !has_int && !has_fraction {
                return Err(invalid());
            }

            let end = s.find(is_digit_or_dot).unwrap_or(s.len());
            if end == 0 {
                return Err(DurationError::MissingUnit(literal.to_string()));
            }
            let (unit, rest) = s.split_at(end);
            s = rest;
            let nanos = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
                unit: unit.to_string(),
                literal: literal.to_string(),
            })?;

            if value > LIMIT / nanos {
                return Err(overflow());
            }
            value *= nanos;
            if fraction > 0 {
                value += (fraction as f64 * (nanos as f64 / scale)) as u64;
                if value > LIMIT {
                    return Err(overflow());
                }
            }
            total = match total.checked_add(value) {
                Some(sum) if sum <= LIMIT => sum,
                _ => return Err(overflow()),
            };
        }

        if neg {
            // total <= 2^63, so the wrapping negation lands exactly on i64::MIN at worst
            return Ok(Self((total as i64).wrapping_neg()));
        }
        if total > LIMIT - 1 {
            return Err(overflow());
        }
        Ok(Self(total as i64))
    }
}

/// Appends the `prec` low decimal digits of `v` as a fraction with trailing
/// zeros removed, and returns what is left of `v`.
fn push_fraction(out: &mut Vec<u8>, mut v: u64, prec: usize) -> u64 {
    let mut printed = false;
    for _ in 0..prec {
        let digit = (v % 10) as u8;
        printed = printed || digit != 0;
        if printed {
            out.push(b'0' + digit);
        }
        v /= 10;
    }
    if printed {
        out.push(b'.');
    }
    v
}

fn push_int(out: &mut Vec<u8>, mut v: u64) {
    if v == 0 {
        out.push(b'0');
        return;
    }
    while v > 0 {
        out.push(b'0' + (v % 10) as u8);
        v /= 10;
    }
}

impl fmt::Display for Duration {
    /// Formats as `72h3m0.5s`, using `ms`, `us` or `ns` for spans under a second.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut u = self.0.unsigned_abs();
        if u == 0 {
            return f.write_str("0s");
        }

        // Built back to front, then reversed.
        let mut out = Vec::with_capacity(32);
        if u < SECOND as u64 {
            let (unit, prec): (&[u8], usize) = if u < MICROSECOND as u64 {
                (b"sn", 0)
            } else if u < MILLISECOND as u64 {
                (b"su", 3)
            } else {
                (b"sm", 6)
            };
            out.extend_from_slice(unit);
            u = push_fraction(&mut out, u, prec);
            push_int(&mut out, u);
        } else {
            out.push(b's');
            u = push_fraction(&mut out, u, 9);
            push_int(&mut out, u % 60);
            u /= 60;
            if u > 0 {
                out.push(b'm');
                push_int(&mut out, u % 60);
                u /= 60;
                if u > 0 {
                    out.push(b'h');
                    push_int(&mut out, u);
                }
            }
        }
        if self.0 < 0 {
            out.push(b'-');
        }
        out.reverse();

        // Only ASCII bytes were pushed.
        f.write_str(std::str::from_utf8(&out).map_err(|_| fmt::Error)?)
    }
}
