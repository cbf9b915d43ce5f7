//! Money and lenient monetary fields.
//!
//! Amounts are kept as an integer count of paise so report arithmetic is
//! exact. The data-access layer serializes numeric columns as numbers or as
//! strings (and sometimes as garbage), which [`AmountField`] captures without
//! failing the surrounding record.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

const PAISE_PER_RUPEE: i64 = 100;

/// Largest magnitude (in rupees) accepted on intake. Keeps every conversion
/// to paise exact in `f64` and far away from `i64` overflow.
const MAX_RUPEES: f64 = 1.0e13;

/// Signed amount in paise (1/100 rupee).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(PAISE_PER_RUPEE))
    }

    /// Converts a rupee amount to the nearest paisa of its `f64` value, ties
    /// away from zero. `1.005_f64` is slightly below 1.005 and gives 100.
    ///
    /// Returns `None` for NaN, infinities and absurd magnitudes.
    pub fn from_rupees_f64(rupees: f64) -> Option<Self> {
        if !rupees.is_finite() || rupees.abs() > MAX_RUPEES {
            return None;
        }
        Some(Self((rupees * PAISE_PER_RUPEE as f64).round() as i64))
    }

    /// Parses a numeric string (`"1500"`, `" 99.5 "`, `"-20"`, `"1e3"`).
    ///
    /// Plain decimals are rounded half away from zero on their digits, so
    /// `"1.005"` is 101 paise. Exponent forms go through [`Self::from_rupees_f64`].
    pub fn parse_rupees(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::parse_decimal(text)
            .or_else(|| text.parse::<f64>().ok().and_then(Self::from_rupees_f64))
    }

    fn parse_decimal(text: &str) -> Option<Self> {
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
            return None;
        }

        let rupees: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        if rupees as f64 > MAX_RUPEES {
            return None;
        }
        let mut digits = fraction.bytes().map(|b| i64::from(b - b'0'));
        let tenths = digits.next().unwrap_or(0);
        let hundredths = digits.next().unwrap_or(0);
        let carry = i64::from(digits.next().is_some_and(|d| d >= 5));

        let paise = rupees * PAISE_PER_RUPEE + tenths * 10 + hundredths + carry;
        Some(Self(if negative { -paise } else { paise }))
    }

    pub const fn paise(&self) -> i64 {
        self.0
    }

    pub fn as_rupees(&self) -> f64 {
        self.0 as f64 / PAISE_PER_RUPEE as f64
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Floors negative amounts at zero.
    pub fn non_negative(self) -> Self {
        Self(self.0.max(0))
    }

    /// Divides evenly across `parts`, rounding half away from zero to the paisa.
    pub fn average_over(self, parts: usize) -> Self {
        if parts == 0 {
            return Self::ZERO;
        }
        let parts = parts as i128;
        let value = self.0 as i128;
        let rounded = if value >= 0 {
            (value + parts / 2) / parts
        } else {
            (value - parts / 2) / parts
        };
        Self(rounded as i64)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = PAISE_PER_RUPEE as u64;
        write!(f, "{sign}{}.{:02}", abs / per, abs % per)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Reports render money in rupees.
impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_rupees())
    }
}

/// A monetary column as received from the data-access layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AmountField {
    /// Null, absent or blank. Counts as zero without complaint.
    #[default]
    Missing,
    Value(Money),
    /// Present but not numeric; the raw text is kept for diagnostics.
    Invalid(String),
}

impl AmountField {
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Missing,
            JsonValue::Number(n) => {
                let text = n.to_string();
                Money::parse_rupees(&text)
                    .map(Self::Value)
                    .unwrap_or(Self::Invalid(text))
            }
            JsonValue::String(s) if s.trim().is_empty() => Self::Missing,
            JsonValue::String(s) => Money::parse_rupees(s)
                .map(Self::Value)
                .unwrap_or_else(|| Self::Invalid(s.clone())),
            other => Self::Invalid(other.to_string()),
        }
    }

    pub fn value(&self) -> Option<Money> {
        match self {
            Self::Value(m) => Some(*m),
            _ => None,
        }
    }

    pub fn or_zero(&self) -> Money {
        self.value().unwrap_or(Money::ZERO)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }
}

impl From<Money> for AmountField {
    fn from(value: Money) -> Self {
        Self::Value(value)
    }
}

impl<'de> Deserialize<'de> for AmountField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(Self::from_json(&raw))
    }
}
