//! Sizing and alignment policies for columns and rows.
//!
//! A [`CellConstraints`] value describes one column or row. Values are
//! immutable; they are assembled with a [`CellConstraintsBuilder`] or parsed
//! from a compact specification such as `END/preferred(10dlu)/25`.

use percentgrid_core::{LayoutError, NumberWithUnit, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the parts of a single cell specification.
const PART_DELIMITER: char = '/';

/// Separators between the cells of a grid specification.
const CELL_DELIMITERS: [char; 3] = [' ', ',', ';'];

/// Largest accepted weight factor.
pub const MAX_WEIGHT: u32 = 100;

/// How a component is placed inside the space of its cell(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellAlignment {
    /// Anchored at the leading edge with its preferred size.
    Start,
    /// Anchored at the trailing edge with its preferred size.
    End,
    /// Centered with its preferred size.
    Center,
    /// Stretched over the whole space.
    #[default]
    Full,
}

impl CellAlignment {
    /// Upper case name as used in specification strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::End => "END",
            Self::Center => "CENTER",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for CellAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellAlignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "START" => Ok(Self::Start),
            "END" => Ok(Self::End),
            "CENTER" => Ok(Self::Center),
            "FULL" => Ok(Self::Full),
            _ => Err(LayoutError::parse(s, "unknown cell alignment")),
        }
    }
}

/// How the base size of a cell is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellSize {
    /// Only the declared minimum size; components are not measured.
    None,
    /// Largest minimum size of the cell's components.
    Minimum,
    /// Largest preferred size of the cell's components.
    #[default]
    Preferred,
}

impl CellSize {
    /// Upper case name as used in specification strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Minimum => "MINIMUM",
            Self::Preferred => "PREFERRED",
        }
    }
}

impl fmt::Display for CellSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellSize {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "MINIMUM" => Ok(Self::Minimum),
            "PREFERRED" => Ok(Self::Preferred),
            _ => Err(LayoutError::parse(s, "unknown cell size")),
        }
    }
}

/// Immutable sizing policy of one column or row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellConstraints {
    alignment: CellAlignment,
    cell_size: CellSize,
    min_size: NumberWithUnit,
    weight: u32,
}

impl CellConstraints {
    /// Alignment of components in this cell.
    #[must_use]
    pub const fn alignment(&self) -> CellAlignment {
        self.alignment
    }

    /// Size policy of this cell.
    #[must_use]
    pub const fn cell_size(&self) -> CellSize {
        self.cell_size
    }

    /// Lower bound of the cell size.
    #[must_use]
    pub const fn min_size(&self) -> NumberWithUnit {
        self.min_size
    }

    /// Share of the remaining space this cell receives, in percent.
    #[must_use]
    pub const fn weight(&self) -> u32 {
        self.weight
    }

    /// Canonical specification, e.g. `FULL/PREFERRED(0px)/0`.
    ///
    /// The result can be parsed back into an equal value.
    #[must_use]
    pub fn to_spec_string(&self) -> String {
        format!(
            "{}/{}({})/{}",
            self.alignment,
            self.cell_size,
            self.min_size.to_unit_string(),
            self.weight
        )
    }

    /// Parse a single cell specification.
    ///
    /// `default_alignment` is used if the specification names no alignment.
    pub fn parse(spec: &str, default_alignment: CellAlignment) -> Result<Self> {
        if spec.trim().is_empty() {
            return Err(LayoutError::parse(spec, "empty cell specification"));
        }

        let parts: Vec<&str> = spec.split(PART_DELIMITER).collect();
        let (alignment, size, weight) = match parts.as_slice() {
            [align, size, weight] => (Some(*align), parse_size(size)?, Some(*weight)),
            [first, second] => match parse_size(first) {
                Ok(size) => (None, size, Some(*second)),
                Err(_) => (Some(*first), parse_size(second)?, None),
            },
            [size] => (None, parse_size(size)?, None),
            _ => return Err(LayoutError::parse(spec, "too many components")),
        };

        let (cell_size, min_size) = size;
        if min_size.value() < 0.0 {
            return Err(LayoutError::parse(spec, "minimum size must not be negative"));
        }
        let alignment = match alignment {
            Some(a) => a.parse()?,
            None => default_alignment,
        };
        let weight = match weight {
            Some(w) => parse_weight(w)?,
            None => 0,
        };

        Ok(Self {
            alignment,
            cell_size,
            min_size,
            weight,
        })
    }

    /// Parse a list of cell specifications separated by space, `,` or `;`.
    pub fn parse_list(spec: &str, default_alignment: CellAlignment) -> Result<Vec<Self>> {
        let cells = spec
            .split(CELL_DELIMITERS)
            .filter(|token| !token.is_empty())
            .map(|token| Self::parse(token, default_alignment))
            .collect::<Result<Vec<_>>>()?;
        if cells.is_empty() {
            return Err(LayoutError::parse(spec, "no cell constraints defined"));
        }
        Ok(cells)
    }
}

/// Parse the size part: `SIZE`, `SIZE(MIN)` or a plain minimum `MIN`.
fn parse_size(part: &str) -> Result<(CellSize, NumberWithUnit)> {
    let text = part.trim();
    if let Some(open) = text.find('(').filter(|&pos| pos > 0) {
        let Some(inner) = text[open + 1..].strip_suffix(')') else {
            return Err(LayoutError::parse(part, "unbalanced parenthesis"));
        };
        let size: CellSize = text[..open].parse()?;
        return Ok((size, inner.parse()?));
    }

    match text.parse::<CellSize>() {
        Ok(CellSize::None) => Err(LayoutError::parse(part, "NONE requires a minimum size")),
        Ok(size) => Ok((size, NumberWithUnit::ZERO)),
        Err(_) => text
            .parse::<NumberWithUnit>()
            .map(|min| (CellSize::None, min))
            .map_err(|_| LayoutError::parse(part, "invalid size declaration")),
    }
}

fn parse_weight(part: &str) -> Result<u32> {
    let weight: i64 = part
        .trim()
        .parse()
        .map_err(|_| LayoutError::parse(part, "invalid weight factor"))?;
    if !(0..=i64::from(MAX_WEIGHT)).contains(&weight) {
        return Err(LayoutError::parse(part, "weight must be between 0 and 100"));
    }
    Ok(weight as u32)
}

impl fmt::Display for CellConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_spec_string())
    }
}

impl FromStr for CellConstraints {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, CellAlignment::Full)
    }
}

impl TryFrom<String> for CellConstraints {
    type Error = LayoutError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<CellConstraints> for String {
    fn from(c: CellConstraints) -> Self {
        c.to_spec_string()
    }
}

/// Reusable builder for [`CellConstraints`].
///
/// Invalid values are remembered and reported by [`create`](Self::create),
/// which also resets the builder for the next cell.
#[derive(Debug, Clone)]
pub struct CellConstraintsBuilder {
    default_alignment: CellAlignment,
    alignment: Option<CellAlignment>,
    cell_size: Option<CellSize>,
    min_size: Option<NumberWithUnit>,
    weight: u32,
    error: Option<LayoutError>,
}

impl Default for CellConstraintsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CellConstraintsBuilder {
    /// Create a builder with `FULL` as default alignment.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            default_alignment: CellAlignment::Full,
            alignment: None,
            cell_size: None,
            min_size: None,
            weight: 0,
            error: None,
        }
    }

    /// Alignment used when none is set explicitly.
    #[must_use]
    pub const fn default_alignment(&self) -> CellAlignment {
        self.default_alignment
    }

    /// Change the alignment used when none is set explicitly.
    pub fn set_default_alignment(&mut self, alignment: CellAlignment) -> &mut Self {
        self.default_alignment = alignment;
        self
    }

    /// Set the size policy.
    pub fn with_cell_size(&mut self, size: CellSize) -> &mut Self {
        self.cell_size = Some(size);
        self
    }

    /// Set the minimum size. Must not be negative.
    pub fn with_minimum_size(&mut self, min: NumberWithUnit) -> &mut Self {
        if min.value() < 0.0 {
            self.fail(LayoutError::invalid_argument(format!(
                "minimum size must not be negative: {min}"
            )));
        }
        self.min_size = Some(min);
        self
    }

    /// Set the alignment.
    pub fn with_cell_alignment(&mut self, alignment: CellAlignment) -> &mut Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the weight factor (0 to 100).
    pub fn with_weight(&mut self, weight: i32) -> &mut Self {
        match u32::try_from(weight) {
            Ok(w) if w <= MAX_WEIGHT => self.weight = w,
            _ => self.fail(LayoutError::invalid_argument(format!(
                "weight must be between 0 and 100: {weight}"
            ))),
        }
        self
    }

    /// Discard all properties set so far (the default alignment is kept).
    pub fn reset(&mut self) -> &mut Self {
        self.alignment = None;
        self.cell_size = None;
        self.min_size = None;
        self.weight = 0;
        self.error = None;
        self
    }

    /// Build the constraints and reset the builder.
    ///
    /// Setting only a minimum size implies [`CellSize::None`]; setting
    /// neither a size policy nor a minimum size is an error.
    pub fn create(&mut self) -> Result<CellConstraints> {
        let result = self.build();
        self.reset();
        result
    }

    fn build(&self) -> Result<CellConstraints> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.cell_size.is_none() && self.min_size.is_none() {
            return Err(LayoutError::invalid_state(
                "neither cell size nor minimum size is defined",
            ));
        }
        Ok(CellConstraints {
            alignment: self.alignment.unwrap_or(self.default_alignment),
            cell_size: self.cell_size.unwrap_or(CellSize::None),
            min_size: self.min_size.unwrap_or(NumberWithUnit::ZERO),
            weight: self.weight,
        })
    }

    /// `FULL/PREFERRED(0px)/0`, the usual column.
    pub fn default_column(&mut self) -> CellConstraints {
        self.reset();
        CellConstraints {
            alignment: CellAlignment::Full,
            cell_size: CellSize::Preferred,
            min_size: NumberWithUnit::ZERO,
            weight: 0,
        }
    }

    /// `CENTER/PREFERRED(0px)/0`, the usual row.
    pub fn default_row(&mut self) -> CellConstraints {
        self.reset();
        CellConstraints {
            alignment: CellAlignment::Center,
            cell_size: CellSize::Preferred,
            min_size: NumberWithUnit::ZERO,
            weight: 0,
        }
    }

    /// Parse a specification using this builder's default alignment.
    pub fn parse(&mut self, spec: &str) -> Result<CellConstraints> {
        self.reset();
        CellConstraints::parse(spec, self.default_alignment)
    }

    fn fail(&mut self, err: LayoutError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percentgrid_core::Unit;
    use proptest::prelude::*;

    fn px(v: f64) -> NumberWithUnit {
        NumberWithUnit::pixels(v)
    }

    // ===== Builder Tests =====

    #[test]
    fn test_builder_full_definition() {
        let mut b = CellConstraintsBuilder::new();
        let cc = b
            .with_cell_alignment(CellAlignment::End)
            .with_cell_size(CellSize::Minimum)
            .with_minimum_size(px(10.0))
            .with_weight(25)
            .create()
            .unwrap();
        assert_eq!(cc.alignment(), CellAlignment::End);
        assert_eq!(cc.cell_size(), CellSize::Minimum);
        assert_eq!(cc.min_size(), px(10.0));
        assert_eq!(cc.weight(), 25);
    }

    #[test]
    fn test_builder_defaults() {
        let cc = CellConstraintsBuilder::new()
            .with_cell_size(CellSize::Preferred)
            .create()
            .unwrap();
        assert_eq!(cc.alignment(), CellAlignment::Full);
        assert_eq!(cc.min_size(), NumberWithUnit::ZERO);
        assert_eq!(cc.weight(), 0);
    }

    #[test]
    fn test_builder_minimum_only_means_none() {
        let cc = CellConstraintsBuilder::new()
            .with_minimum_size(px(4.0))
            .create()
            .unwrap();
        assert_eq!(cc.cell_size(), CellSize::None);
        assert_eq!(cc.min_size(), px(4.0));
    }

    #[test]
    fn test_builder_undefined_size() {
        let err = CellConstraintsBuilder::new()
            .with_weight(10)
            .create()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));
    }

    #[test]
    fn test_builder_rejects_negative_values() {
        let mut b = CellConstraintsBuilder::new();
        assert!(b
            .with_cell_size(CellSize::Preferred)
            .with_minimum_size(px(-1.0))
            .create()
            .is_err());
        assert!(b
            .with_cell_size(CellSize::Preferred)
            .with_weight(-1)
            .create()
            .is_err());
        assert!(b
            .with_cell_size(CellSize::Preferred)
            .with_weight(101)
            .create()
            .is_err());
    }

    #[test]
    fn test_builder_create_resets() {
        let mut b = CellConstraintsBuilder::new();
        let first = b
            .with_cell_alignment(CellAlignment::Start)
            .with_cell_size(CellSize::Minimum)
            .with_weight(30)
            .create()
            .unwrap();
        let second = b.with_cell_size(CellSize::Preferred).create().unwrap();
        assert_eq!(first.weight(), 30);
        assert_eq!(first.alignment(), CellAlignment::Start);
        assert_eq!(second.weight(), 0);
        assert_eq!(second.alignment(), CellAlignment::Full);
    }

    #[test]
    fn test_builder_error_cleared_by_create() {
        let mut b = CellConstraintsBuilder::new();
        assert!(b.with_weight(-5).with_cell_size(CellSize::None).create().is_err());
        assert!(b.with_cell_size(CellSize::None).create().is_ok());
    }

    #[test]
    fn test_default_column_and_row() {
        let mut b = CellConstraintsBuilder::new();
        assert_eq!(b.default_column().to_spec_string(), "FULL/PREFERRED(0px)/0");
        assert_eq!(b.default_row().to_spec_string(), "CENTER/PREFERRED(0px)/0");
    }

    #[test]
    fn test_builder_default_alignment() {
        let mut b = CellConstraintsBuilder::new();
        b.set_default_alignment(CellAlignment::Center);
        let cc = b.with_cell_size(CellSize::Preferred).create().unwrap();
        assert_eq!(cc.alignment(), CellAlignment::Center);
        assert_eq!(b.default_alignment(), CellAlignment::Center);
    }

    // ===== Parsing Tests =====

    #[test]
    fn test_parse_size_only() {
        let cc: CellConstraints = "minimum".parse().unwrap();
        assert_eq!(cc.cell_size(), CellSize::Minimum);
        assert_eq!(cc.alignment(), CellAlignment::Full);
        assert_eq!(cc.min_size(), NumberWithUnit::ZERO);
    }

    #[test]
    fn test_parse_size_with_minimum() {
        let cc: CellConstraints = "PreFerreD(10)".parse().unwrap();
        assert_eq!(cc.cell_size(), CellSize::Preferred);
        assert_eq!(cc.min_size(), px(10.0));
    }

    #[test]
    fn test_parse_alignment_and_size() {
        let cc: CellConstraints = " Start / minimum ".parse().unwrap();
        assert_eq!(cc.alignment(), CellAlignment::Start);
        assert_eq!(cc.cell_size(), CellSize::Minimum);

        let cc: CellConstraints = "end/preferred(15cm)".parse().unwrap();
        assert_eq!(cc.alignment(), CellAlignment::End);
        assert_eq!(cc.min_size(), NumberWithUnit::new(15.0, Unit::Cm));
    }

    #[test]
    fn test_parse_size_and_weight() {
        let cc: CellConstraints = "PREFERRED/5".parse().unwrap();
        assert_eq!(cc.cell_size(), CellSize::Preferred);
        assert_eq!(cc.weight(), 5);
        assert_eq!(cc.alignment(), CellAlignment::Full);
    }

    #[test]
    fn test_parse_all_parts() {
        let cc: CellConstraints = "end/preferred/25".parse().unwrap();
        assert_eq!(cc.alignment(), CellAlignment::End);
        assert_eq!(cc.cell_size(), CellSize::Preferred);
        assert_eq!(cc.weight(), 25);
    }

    #[test]
    fn test_parse_plain_minimum() {
        let cc: CellConstraints = "10dlu".parse().unwrap();
        assert_eq!(cc.cell_size(), CellSize::None);
        assert_eq!(cc.min_size(), NumberWithUnit::new(10.0, Unit::Dlu));

        let cc: CellConstraints = "none(3)".parse().unwrap();
        assert_eq!(cc.cell_size(), CellSize::None);
        assert_eq!(cc.min_size(), px(3.0));
    }

    #[test]
    fn test_parse_errors() {
        for spec in [
            "",
            "/",
            "undef",
            "none",
            "minimum(42",
            "42/minimum/10",
            "preferred/weight",
            "start/minimum/10/4",
            "END/PREFERRED(-1cm)",
            "PREFERRED/-10",
            "PREFERRED/101",
            "(10)",
        ] {
            assert!(spec.parse::<CellConstraints>().is_err(), "{spec:?} should fail");
        }
    }

    #[test]
    fn test_parse_uses_default_alignment() {
        let cc = CellConstraints::parse("preferred", CellAlignment::Center).unwrap();
        assert_eq!(cc.alignment(), CellAlignment::Center);

        let mut b = CellConstraintsBuilder::new();
        b.set_default_alignment(CellAlignment::End);
        assert_eq!(b.parse("minimum").unwrap().alignment(), CellAlignment::End);
    }

    #[test]
    fn test_parse_list() {
        let list =
            CellConstraints::parse_list("10,preferred;10 minimum(10),END/preferred/10", CellAlignment::Full)
                .unwrap();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].cell_size(), CellSize::None);
        assert_eq!(list[3].min_size(), px(10.0));
        assert_eq!(list[4].alignment(), CellAlignment::End);
        assert_eq!(list[4].weight(), 10);
    }

    #[test]
    fn test_parse_list_errors() {
        assert!(CellConstraints::parse_list("", CellAlignment::Full).is_err());
        assert!(CellConstraints::parse_list(" ,; ", CellAlignment::Full).is_err());
        assert!(CellConstraints::parse_list("10, END/PREFERRED, 10dlu, invalid", CellAlignment::Full)
            .is_err());
    }

    #[test]
    fn test_spec_string() {
        let cc: CellConstraints = "center/minimum(2.5cm)/40".parse().unwrap();
        assert_eq!(cc.to_spec_string(), "CENTER/MINIMUM(2.5cm)/40");
        assert_eq!(cc.to_string(), cc.to_spec_string());
    }

    #[test]
    fn test_serde_as_spec_string() {
        let cc: CellConstraints = "start/preferred(4px)/10".parse().unwrap();
        let json = serde_json::to_string(&cc).unwrap();
        assert_eq!(json, "\"START/PREFERRED(4px)/10\"");
        let back: CellConstraints = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cc);
    }

    fn any_alignment() -> impl Strategy<Value = CellAlignment> {
        prop_oneof![
            Just(CellAlignment::Start),
            Just(CellAlignment::End),
            Just(CellAlignment::Center),
            Just(CellAlignment::Full),
        ]
    }

    fn any_size() -> impl Strategy<Value = CellSize> {
        prop_oneof![
            Just(CellSize::None),
            Just(CellSize::Minimum),
            Just(CellSize::Preferred),
        ]
    }

    proptest! {
        #[test]
        fn prop_spec_string_parses_back(
            align in any_alignment(),
            size in any_size(),
            min in 0.0f64..500.0,
            weight in 0i32..=100,
        ) {
            let cc = CellConstraintsBuilder::new()
                .with_cell_alignment(align)
                .with_cell_size(size)
                .with_minimum_size(NumberWithUnit::pixels(min))
                .with_weight(weight)
                .create()
                .unwrap();
            let back: CellConstraints = cc.to_spec_string().parse().unwrap();
            prop_assert_eq!(back, cc);
        }
    }
}
