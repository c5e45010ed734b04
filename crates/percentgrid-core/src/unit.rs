//! Measurement units and values tagged with a unit.
//!
//! A [`NumberWithUnit`] is converted to device pixels with the help of a
//! [`UnitSizeHandler`], which knows the screen resolution and the font
//! metrics of the container being laid out.

use crate::error::{LayoutError, Result};
use crate::platform::UnitSizeHandler;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Centimeters per inch.
const CM_PER_INCH: f64 = 2.54;

/// Horizontal dialog units per font size.
const DLU_X: f64 = 4.0;

/// Vertical dialog units per font size.
const DLU_Y: f64 = 8.0;

/// A physical or logical measurement unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Device pixels.
    #[default]
    #[serde(rename = "px")]
    Pixel,
    /// Inches, scaled by the screen resolution.
    #[serde(rename = "in")]
    Inch,
    /// Centimeters, scaled by the screen resolution.
    #[serde(rename = "cm")]
    Cm,
    /// Dialog units, relative to the container's font size.
    #[serde(rename = "dlu")]
    Dlu,
}

impl Unit {
    /// All known units.
    pub const ALL: [Self; 4] = [Self::Pixel, Self::Inch, Self::Cm, Self::Dlu];

    /// The short name used in unit strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pixel => "px",
            Self::Inch => "in",
            Self::Cm => "cm",
            Self::Dlu => "dlu",
        }
    }

    /// Convert `value` given in this unit to pixels.
    ///
    /// Pixel values are only rounded; every other unit consults the handler.
    pub fn to_pixel(self, value: f64, handler: &dyn UnitSizeHandler, vertical: bool) -> i32 {
        let px = match self {
            Self::Pixel => value,
            Self::Inch => value * f64::from(handler.screen_resolution()),
            Self::Cm => value / CM_PER_INCH * f64::from(handler.screen_resolution()),
            Self::Dlu => {
                let divisor = if vertical { DLU_Y } else { DLU_X };
                value * handler.font_size(vertical) / divisor
            }
        };
        round_half_up(px)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Unit {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|u| u.name() == name)
            .ok_or_else(|| LayoutError::parse(s, "unknown unit"))
    }
}

fn round_half_up(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}

/// A magnitude tagged with a [`Unit`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NumberWithUnit {
    value: f64,
    unit: Unit,
}

impl NumberWithUnit {
    /// Zero pixels.
    pub const ZERO: Self = Self::new(0.0, Unit::Pixel);

    /// Create a value with an explicit unit.
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Create a value in pixels.
    #[must_use]
    pub const fn pixels(value: f64) -> Self {
        Self::new(value, Unit::Pixel)
    }

    /// The magnitude.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// The unit.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Convert to pixels along the given axis.
    pub fn to_pixel(&self, handler: &dyn UnitSizeHandler, vertical: bool) -> i32 {
        self.unit.to_pixel(self.value, handler, vertical)
    }

    /// Canonical textual form, e.g. `42px`, `10.5px` or `12.25dlu`.
    ///
    /// Whole pixel values have no fractional part. Parsing the result
    /// yields an equal value.
    #[must_use]
    pub fn to_unit_string(&self) -> String {
        match self.unit {
            Unit::Pixel => format!("{}{}", self.value, self.unit),
            _ => {
                let mut text = self.value.to_string();
                if !text.contains('.') {
                    text.push_str(".0");
                }
                format!("{text}{}", self.unit)
            }
        }
    }
}

impl Default for NumberWithUnit {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for NumberWithUnit {
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && self.value.total_cmp(&other.value) == Ordering::Equal
    }
}

impl Eq for NumberWithUnit {}

impl Hash for NumberWithUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.to_bits().hash(state);
        self.unit.hash(state);
    }
}

impl fmt::Display for NumberWithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_unit_string())
    }
}

impl FromStr for NumberWithUnit {
    type Err = LayoutError;

    /// Parse strings like `42.5 cm`, `10`, `.1cm` or `10.px`.
    ///
    /// Leading and trailing whitespace is ignored, whitespace between the
    /// number and the unit is allowed. A missing unit means pixels.
    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(LayoutError::parse(s, "empty unit string"));
        }

        let bytes = text.as_bytes();
        let mut end = 0;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'.' {
            end += 1;
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }

        let (number, rest) = text.split_at(end);
        let unit_token = rest.trim_start();
        if unit_token.chars().any(char::is_whitespace) {
            return Err(LayoutError::parse(s, "unexpected text after unit"));
        }
        if number.is_empty() || number == "." {
            return Err(LayoutError::parse(s, "missing numeric value"));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| LayoutError::parse(s, "invalid number"))?;
        let unit = if unit_token.is_empty() {
            Unit::Pixel
        } else {
            unit_token
                .parse()
                .map_err(|_| LayoutError::parse(s, format!("unknown unit {unit_token:?}")))?
        };

        Ok(Self::new(value, unit))
    }
}

impl TryFrom<String> for NumberWithUnit {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<NumberWithUnit> for String {
    fn from(n: NumberWithUnit) -> Self {
        n.to_unit_string()
    }
}

impl From<i32> for NumberWithUnit {
    fn from(px: i32) -> Self {
        Self::pixels(f64::from(px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FixedSizeHandler;
    use proptest::prelude::*;

    fn handler() -> FixedSizeHandler {
        FixedSizeHandler::new(96, 20.0)
    }

    fn check_parse(input: &str, value: f64, unit: Unit) {
        let n: NumberWithUnit = input.parse().unwrap();
        assert_eq!(n.value(), value, "value of {input:?}");
        assert_eq!(n.unit(), unit, "unit of {input:?}");
    }

    // ===== Parsing Tests =====

    #[test]
    fn test_parse_with_unit_and_space() {
        check_parse("42.5 Cm", 42.5, Unit::Cm);
    }

    #[test]
    fn test_parse_surrounding_whitespace() {
        check_parse("1        IN   ", 1.0, Unit::Inch);
        check_parse("    17in  ", 17.0, Unit::Inch);
    }

    #[test]
    fn test_parse_defaults_to_pixels() {
        check_parse("10", 10.0, Unit::Pixel);
    }

    #[test]
    fn test_parse_partial_fractions() {
        check_parse(".1cm", 0.1, Unit::Cm);
        check_parse("10.px", 10.0, Unit::Pixel);
        check_parse("3.75dlu", 3.75, Unit::Dlu);
    }

    #[test]
    fn test_parse_errors() {
        for input in [
            "",
            "   ",
            "Invalid!34.0px",
            "cm",
            "10.12345TEST",
            "1..5dlu",
            ".",
            ".px",
            "10 px extra",
        ] {
            assert!(
                input.parse::<NumberWithUnit>().is_err(),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_error_kind() {
        let err = "cm".parse::<NumberWithUnit>().unwrap_err();
        assert!(matches!(err, LayoutError::Parse { .. }));
    }

    #[test]
    fn test_unit_from_str_case_insensitive() {
        assert_eq!("DLU".parse::<Unit>().unwrap(), Unit::Dlu);
        assert_eq!("Px".parse::<Unit>().unwrap(), Unit::Pixel);
        assert!("pt".parse::<Unit>().is_err());
    }

    // ===== Conversion Tests =====

    #[test]
    fn test_pixel_conversion_rounds() {
        let h = handler();
        assert_eq!(NumberWithUnit::pixels(42.0).to_pixel(&h, false), 42);
        assert_eq!(NumberWithUnit::pixels(41.5).to_pixel(&h, true), 42);
        assert_eq!(NumberWithUnit::pixels(41.4).to_pixel(&h, true), 41);
    }

    #[test]
    fn test_inch_conversion() {
        let h = handler();
        assert_eq!(NumberWithUnit::new(2.0, Unit::Inch).to_pixel(&h, false), 192);
    }

    #[test]
    fn test_cm_conversion() {
        let h = handler();
        // 2.54cm is one inch
        assert_eq!(NumberWithUnit::new(2.54, Unit::Cm).to_pixel(&h, true), 96);
        assert_eq!(NumberWithUnit::new(1.0, Unit::Cm).to_pixel(&h, false), 38);
    }

    #[test]
    fn test_dlu_conversion_depends_on_axis() {
        let h = handler();
        let n = NumberWithUnit::new(10.0, Unit::Dlu);
        assert_eq!(n.to_pixel(&h, false), 50);
        assert_eq!(n.to_pixel(&h, true), 25);
    }

    #[test]
    fn test_zero_constant() {
        assert_eq!(NumberWithUnit::ZERO, NumberWithUnit::pixels(0.0));
        assert_eq!(NumberWithUnit::default(), NumberWithUnit::ZERO);
        assert_eq!(NumberWithUnit::ZERO.to_pixel(&handler(), false), 0);
    }

    // ===== Formatting and Equality Tests =====

    #[test]
    fn test_unit_string() {
        assert_eq!(NumberWithUnit::pixels(42.0).to_unit_string(), "42px");
        assert_eq!(NumberWithUnit::pixels(10.5).to_unit_string(), "10.5px");
        assert_eq!(NumberWithUnit::new(42.0, Unit::Cm).to_unit_string(), "42.0cm");
        assert_eq!(NumberWithUnit::new(42.5, Unit::Inch).to_string(), "42.5in");
        assert_eq!(NumberWithUnit::new(12.25, Unit::Dlu).to_string(), "12.25dlu");
    }

    #[test]
    fn test_equality() {
        let a = NumberWithUnit::new(1.0, Unit::Cm);
        assert_eq!(a, NumberWithUnit::new(1.0, Unit::Cm));
        assert_ne!(a, NumberWithUnit::new(1.0, Unit::Inch));
        assert_ne!(a, NumberWithUnit::new(1.5, Unit::Cm));
    }

    #[test]
    fn test_from_i32() {
        assert_eq!(NumberWithUnit::from(7), NumberWithUnit::pixels(7.0));
    }

    #[test]
    fn test_serde_as_unit_string() {
        let n = NumberWithUnit::new(2.5, Unit::Dlu);
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"2.5dlu\"");
        let back: NumberWithUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
        assert!(serde_json::from_str::<NumberWithUnit>("\"2.5furlong\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_unit_string_parses_back(value in 0.0f64..10_000.0, idx in 0usize..4) {
            let n = NumberWithUnit::new(value, Unit::ALL[idx]);
            let back: NumberWithUnit = n.to_unit_string().parse().unwrap();
            prop_assert_eq!(back, n);
        }

        #[test]
        fn prop_pixel_conversion_is_identity(px in 0i32..100_000) {
            let n = NumberWithUnit::from(px);
            prop_assert_eq!(n.to_pixel(&handler(), false), px);
            prop_assert_eq!(n.to_pixel(&handler(), true), px);
        }
    }
}
