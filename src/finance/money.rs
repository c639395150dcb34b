use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A numeric field as it arrives from forms and older rows: a JSON number,
/// a locale-formatted string, or something unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberLike {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<f64> for NumberLike {
    fn from(value: f64) -> Self {
        NumberLike::Number(value)
    }
}

impl From<&str> for NumberLike {
    fn from(value: &str) -> Self {
        NumberLike::Text(value.to_string())
    }
}

impl NumberLike {
    /// Finite value of the field, or `None` when it cannot be read as a number.
    pub fn parse(&self) -> Option<f64> {
        match self {
            NumberLike::Number(v) => Some(*v).filter(|v| v.is_finite()),
            NumberLike::Text(s) => parse_decimal(s),
            NumberLike::Other(_) => None,
        }
    }
}

/// Parse a decimal string leniently.
///
/// Whitespace is ignored. A comma is the decimal separator; when one is
/// present, dots are treated as thousands separators (`"1.234,56"` is 1234.56).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = if compact.contains(',') {
        compact.replace('.', "").replacen(',', ".", 1)
    } else {
        compact
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to two decimals, half-up.
///
/// The scaled value is nudged by a few ULPs first so that decimal midpoints
/// stored just below their true value (10.005 is 10.00499999… in binary)
/// still round up.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 100.0;
    let nudged = scaled + scaled.abs().max(1.0) * f64::EPSILON * 8.0;
    (nudged + 0.5).floor() / 100.0
}

/// Whole cents. Sums are exact, so totals do not depend on record order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);
    pub const MAX: Cents = Cents(i64::MAX);

    pub fn new(cents: i64) -> Self {
        Cents(cents)
    }

    /// Currency-rounded conversion; non-finite input is zero.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Cents::ZERO;
        }
        Cents((round_currency(value) * 100.0).round() as i64)
    }

    /// Like `from_f64`, but an overflowed product pins to the bound instead of zero.
    pub fn saturating_from_f64(value: f64) -> Self {
        match value {
            v if v.is_nan() => Cents::ZERO,
            v if v == f64::INFINITY => Cents::MAX,
            v if v == f64::NEG_INFINITY => Cents(i64::MIN),
            v => Cents::from_f64(v),
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn clamp_non_negative(self) -> Self {
        Cents(self.0.max(0))
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        *self = *self + rhs;
    }
}

impl Sub for Cents {
    type Output = Cents;

    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Self {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Cents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Cents::from_f64)
    }
}

/// Brazilian real formatting: `R$ 1.234,56`.
pub fn format_brl(amount: Cents) -> String {
    let sign = if amount.get() < 0 { "-" } else { "" };
    let abs = amount.get().unsigned_abs();
    let units = (abs / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}R$ {grouped},{:02}", abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_brazilian_and_plain_formats() {
        assert_eq!(parse_decimal("1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("10,5"), Some(10.5));
        assert_eq!(parse_decimal(" 1 500 "), Some(1500.0));
        assert_eq!(parse_decimal("99.90"), Some(99.9));
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("   "), None);
        assert_eq!(parse_decimal("R$"), None);
        assert_eq!(parse_decimal("1,2,3"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn number_like_handles_every_shape() {
        assert_eq!(NumberLike::from(12.5).parse(), Some(12.5));
        assert_eq!(NumberLike::Number(f64::NAN).parse(), None);
        assert_eq!(NumberLike::from("1.234,56").parse(), Some(1234.56));
        assert_eq!(NumberLike::Other(serde_json::json!(true)).parse(), None);
    }

    #[test]
    fn number_like_deserializes_leniently() {
        let values: Vec<NumberLike> =
            serde_json::from_str(r#"[1000, "500,25", false, {"x": 1}]"#).unwrap();
        assert_eq!(values[0].parse(), Some(1000.0));
        assert_eq!(values[1].parse(), Some(500.25));
        assert_eq!(values[2].parse(), None);
        assert_eq!(values[3].parse(), None);
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_currency(10.005), 10.01);
        assert_eq!(round_currency(1.005), 1.01);
        assert_eq!(round_currency(0.125), 0.13);
        assert_eq!(round_currency(2.344), 2.34);
        assert_eq!(round_currency(-0.125), -0.12);
        assert_eq!(round_currency(10.0), 10.0);
    }

    #[test]
    fn rounding_is_idempotent_for_known_values() {
        for v in [10.005, 0.1 + 0.2, 1234.565, 99.999, -3.335] {
            let once = round_currency(v);
            assert_eq!(round_currency(once), once);
        }
    }

    #[test]
    fn cents_conversion_and_display() {
        assert_eq!(Cents::from_f64(10.005), Cents::new(1001));
        assert_eq!(Cents::from_f64(f64::INFINITY), Cents::ZERO);
        assert_eq!(Cents::new(-1050).to_string(), "-10.50");
        assert_eq!(Cents::new(7).to_string(), "0.07");
        assert_eq!(Cents::new(1001).as_f64(), 10.01);
    }

    #[test]
    fn cents_serialize_as_decimal_numbers() {
        let json = serde_json::to_string(&Cents::new(123456)).unwrap();
        assert_eq!(json, "1234.56");
    }

    #[test]
    fn formats_brl() {
        assert_eq!(format_brl(Cents::new(123456)), "R$ 1.234,56");
        assert_eq!(format_brl(Cents::new(0)), "R$ 0,00");
        assert_eq!(format_brl(Cents::new(100000000)), "R$ 1.000.000,00");
        assert_eq!(format_brl(Cents::new(-5050)), "-R$ 50,50");
    }
}
