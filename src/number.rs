//! Locale-independent decimal chapter numbers.
//!
//! Kavita reports chapter numbers as strings such as `"12"`, `"10.5"` or `"007"`.
//! The gap heuristic depends on exact decimal arithmetic (`1 + 1.1 < 2.1` must be
//! false), so numbers are kept as a scaled integer instead of a float.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Maximum number of fractional digits accepted when parsing.
const MAX_SCALE: u32 = 18;

/// A decimal chapter number (`mantissa / 10^scale`).
///
/// Equality, ordering and hashing are numeric (`2.50 == 2.5`), while `Display`
/// keeps the precision the number was written with, mirroring how the server
/// spelled it.
#[derive(Clone, Copy, Debug)]
pub struct ChapterNumber {
    mantissa: i64,
    scale: u32,
}

impl ChapterNumber {
    /// Builds a whole chapter number.
    pub const fn whole(value: i64) -> Self {
        Self {
            mantissa: value,
            scale: 0,
        }
    }

    /// Builds a number from its raw parts, e.g. `from_parts(105, 1)` is `10.5`.
    ///
    /// Fails with [`Error::InvalidChapterNumber`] when `scale` exceeds the 18
    /// fractional digits the parser accepts.
    pub fn from_parts(mantissa: i64, scale: u32) -> Result<Self> {
        if scale > MAX_SCALE {
            return Err(Error::InvalidChapterNumber(format!(
                "{}e-{}",
                mantissa, scale
            )));
        }
        Ok(Self { mantissa, scale })
    }

    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Largest integer less than or equal to this number.
    pub fn floor(&self) -> i64 {
        self.mantissa.div_euclid(10_i64.pow(self.scale))
    }

    /// Returns `true` when `self + offset_tenths / 10 < other`.
    ///
    /// Evaluated in `i128` at a common scale, so no rounding is involved.
    pub fn offset_is_below(&self, offset_tenths: i64, other: &ChapterNumber) -> bool {
        let scale = self.scale.max(other.scale).max(1);
        let lhs = self.rescaled(scale) + offset_tenths as i128 * 10_i128.pow(scale - 1);
        lhs < other.rescaled(scale)
    }

    fn rescaled(&self, scale: u32) -> i128 {
        self.mantissa as i128 * 10_i128.pow(scale - self.scale)
    }

    /// Strips trailing fractional zeros, so equal values share one representation.
    fn normalized(&self) -> (i64, u32) {
        let (mut mantissa, mut scale) = (self.mantissa, self.scale);
        while scale > 0 && mantissa % 10 == 0 {
            mantissa /= 10;
            scale -= 1;
        }
        (mantissa, scale)
    }
}

impl FromStr for ChapterNumber {
    type Err = Error;

    /// Parses `[+-]digits[.digits]` with `.` as the only separator.
    ///
    /// Whitespace, digit grouping and exponents are rejected so that the same
    /// input always yields the same number regardless of the host locale.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidChapterNumber(s.to_string());

        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (integral, fractional) = match unsigned.split_once('.') {
            Some((i, f)) => (i, f),
            None => (unsigned, ""),
        };
        if integral.is_empty() && fractional.is_empty() {
            return Err(invalid());
        }
        if !integral
            .bytes()
            .chain(fractional.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }
        let scale = fractional.len() as u32;
        if scale > MAX_SCALE {
            return Err(invalid());
        }

        let mut mantissa: i64 = 0;
        for digit in integral.bytes().chain(fractional.bytes()) {
            mantissa = mantissa
                .checked_mul(10)
                .and_then(|m| m.checked_add((digit - b'0') as i64))
                .ok_or_else(invalid)?;
        }
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self { mantissa, scale })
    }
}

impl fmt::Display for ChapterNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.mantissa < 0 { "-" } else { "" };
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{}{}", sign, digits);
        }
        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (integral, fractional) = padded.split_at(padded.len() - scale);
        write!(f, "{}{}.{}", sign, integral, fractional)
    }
}

impl PartialEq for ChapterNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ChapterNumber {}

impl PartialOrd for ChapterNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChapterNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        self.rescaled(scale).cmp(&other.rescaled(scale))
    }
}

impl Hash for ChapterNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl From<i64> for ChapterNumber {
    fn from(value: i64) -> Self {
        Self::whole(value)
    }
}

impl Serialize for ChapterNumber {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

struct ChapterNumberVisitor;

impl<'de> Visitor<'de> for ChapterNumberVisitor {
    type Value = ChapterNumber;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal chapter number as a string or a number")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> std::result::Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> std::result::Result<Self::Value, E> {
        Ok(ChapterNumber::whole(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> std::result::Result<Self::Value, E> {
        i64::try_from(value)
            .map(ChapterNumber::whole)
            .map_err(|_| E::custom(Error::InvalidChapterNumber(value.to_string())))
    }

    // Shortest round-trip rendering, so 10.5 arrives as "10.5".
    fn visit_f64<E: de::Error>(self, value: f64) -> std::result::Result<Self::Value, E> {
        value.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for ChapterNumber {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ChapterNumberVisitor)
    }
}
