//! A single row of equally wide buttons.

use crate::constraints::{CellConstraints, CellConstraintsBuilder, CellSize};
use crate::data::PercentDataBuilder;
use crate::engine::CellGrid;
use crate::group::CellGroup;
use crate::layout::Layout;
use percentgrid_core::{ComponentId, LayoutError, NumberWithUnit, Result, Unit};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default space around the button bar.
pub const DEFAULT_MARGIN: NumberWithUnit = NumberWithUnit::new(2.0, Unit::Dlu);

/// Default space between two buttons.
pub const DEFAULT_GAP: NumberWithUnit = NumberWithUnit::new(1.0, Unit::Dlu);

/// Where the buttons go if the bar is wider than needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonAlignment {
    /// Buttons at the left edge
    Left,
    /// Buttons in the middle
    Center,
    /// Buttons at the right edge
    #[default]
    Right,
}

impl ButtonAlignment {
    /// Upper case name of the alignment.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "LEFT",
            Self::Center => "CENTER",
            Self::Right => "RIGHT",
        }
    }

    /// Weight of the margin column on `side`.
    ///
    /// Free space goes to the margin opposite to the alignment, or is
    /// split evenly for centered buttons.
    const fn margin_weight(self, side: Self) -> i32 {
        match (self, side) {
            (Self::Center, _) => 50,
            (Self::Left, Self::Left) | (Self::Right, Self::Right) => 0,
            _ => 100,
        }
    }
}

impl fmt::Display for ButtonAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ButtonAlignment {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        [Self::Left, Self::Center, Self::Right]
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| LayoutError::parse(s, "unknown button alignment"))
    }
}

/// Lays out buttons in one row, all as wide as the widest one.
///
/// The grid has a margin row above and below the buttons and `2n + 1`
/// columns for `n` buttons: the left margin, the buttons separated by gap
/// columns, and the right margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonLayout {
    #[serde(default = "default_margin")]
    left_margin: NumberWithUnit,
    #[serde(default = "default_margin")]
    right_margin: NumberWithUnit,
    #[serde(default = "default_margin")]
    top_margin: NumberWithUnit,
    #[serde(default = "default_margin")]
    bottom_margin: NumberWithUnit,
    #[serde(default = "default_gap")]
    gap: NumberWithUnit,
    #[serde(default)]
    alignment: ButtonAlignment,
    #[serde(default = "default_can_shrink")]
    can_shrink: bool,
    #[serde(default)]
    buttons: Vec<ComponentId>,
    #[serde(skip)]
    grid: Option<CellGrid>,
}

const fn default_margin() -> NumberWithUnit {
    DEFAULT_MARGIN
}

const fn default_gap() -> NumberWithUnit {
    DEFAULT_GAP
}

const fn default_can_shrink() -> bool {
    true
}

impl Default for ButtonLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ButtonLayout {
    fn eq(&self, other: &Self) -> bool {
        self.left_margin == other.left_margin
            && self.right_margin == other.right_margin
            && self.top_margin == other.top_margin
            && self.bottom_margin == other.bottom_margin
            && self.gap == other.gap
            && self.alignment == other.alignment
            && self.can_shrink == other.can_shrink
            && self.buttons == other.buttons
    }
}

impl Eq for ButtonLayout {}

impl ButtonLayout {
    /// Create an empty, right aligned button bar with default spacing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left_margin: DEFAULT_MARGIN,
            right_margin: DEFAULT_MARGIN,
            top_margin: DEFAULT_MARGIN,
            bottom_margin: DEFAULT_MARGIN,
            gap: DEFAULT_GAP,
            alignment: ButtonAlignment::Right,
            can_shrink: true,
            buttons: Vec::new(),
            grid: None,
        }
    }

    /// Space left of the first button.
    #[must_use]
    pub const fn left_margin(&self) -> NumberWithUnit {
        self.left_margin
    }

    /// Space right of the last button.
    #[must_use]
    pub const fn right_margin(&self) -> NumberWithUnit {
        self.right_margin
    }

    /// Space above the buttons.
    #[must_use]
    pub const fn top_margin(&self) -> NumberWithUnit {
        self.top_margin
    }

    /// Space below the buttons.
    #[must_use]
    pub const fn bottom_margin(&self) -> NumberWithUnit {
        self.bottom_margin
    }

    /// Space between two buttons.
    #[must_use]
    pub const fn gap(&self) -> NumberWithUnit {
        self.gap
    }

    /// Horizontal alignment of the buttons.
    #[must_use]
    pub const fn alignment(&self) -> ButtonAlignment {
        self.alignment
    }

    /// Set the space left of the first button.
    pub fn set_left_margin(&mut self, margin: NumberWithUnit) {
        self.left_margin = margin;
        self.grid = None;
    }

    /// Set the space right of the last button.
    pub fn set_right_margin(&mut self, margin: NumberWithUnit) {
        self.right_margin = margin;
        self.grid = None;
    }

    /// Set the space above the buttons.
    pub fn set_top_margin(&mut self, margin: NumberWithUnit) {
        self.top_margin = margin;
        self.grid = None;
    }

    /// Set the space below the buttons.
    pub fn set_bottom_margin(&mut self, margin: NumberWithUnit) {
        self.bottom_margin = margin;
        self.grid = None;
    }

    /// Set the space between adjacent buttons.
    pub fn set_gap(&mut self, gap: NumberWithUnit) {
        self.gap = gap;
        self.grid = None;
    }

    /// Set where free horizontal space goes.
    pub fn set_alignment(&mut self, alignment: ButtonAlignment) {
        self.alignment = alignment;
        self.grid = None;
    }

    /// Whether buttons fall back to their minimum width if space is short.
    #[must_use]
    pub const fn can_shrink(&self) -> bool {
        self.can_shrink
    }

    /// Enable or disable falling back to minimum sizes.
    pub fn set_can_shrink(&mut self, can_shrink: bool) {
        self.can_shrink = can_shrink;
        if let Some(grid) = &mut self.grid {
            grid.set_can_shrink(can_shrink);
        }
    }

    /// Append a button. A button added again moves to the end.
    pub fn add_button(&mut self, id: ComponentId) {
        self.buttons.retain(|b| *b != id);
        self.buttons.push(id);
        self.grid = None;
    }

    /// Remove a button.
    pub fn remove_button(&mut self, id: ComponentId) -> bool {
        let before = self.buttons.len();
        self.buttons.retain(|b| *b != id);
        let removed = self.buttons.len() != before;
        if removed {
            self.grid = None;
        }
        removed
    }

    /// Buttons from left to right.
    #[must_use]
    pub fn buttons(&self) -> &[ComponentId] {
        &self.buttons
    }

    /// Build the grid for the current properties and buttons.
    ///
    /// Without buttons the grid has a single column sized by the right
    /// margin.
    pub fn build_grid(&self) -> Result<CellGrid> {
        let count = self.buttons.len();
        let last = 2 * count;
        let mut builder = CellConstraintsBuilder::new();

        let mut columns = Vec::with_capacity(last + 1);
        for index in 0..=last {
            let cc = if index == last {
                builder
                    .with_minimum_size(self.right_margin)
                    .with_weight(self.alignment.margin_weight(ButtonAlignment::Right))
                    .create()?
            } else if index == 0 {
                builder
                    .with_minimum_size(self.left_margin)
                    .with_weight(self.alignment.margin_weight(ButtonAlignment::Left))
                    .create()?
            } else if index % 2 == 0 {
                builder.with_minimum_size(self.gap).create()?
            } else {
                builder.with_cell_size(CellSize::Preferred).create()?
            };
            columns.push(cc);
        }

        let rows: Vec<CellConstraints> = vec![
            builder.with_minimum_size(self.top_margin).create()?,
            builder.default_row(),
            builder.with_minimum_size(self.bottom_margin).create()?,
        ];

        let mut grid = CellGrid::new(columns, rows)?;
        grid.set_can_shrink(self.can_shrink);
        if count > 1 {
            grid.add_column_group(CellGroup::new((0..count).map(|i| 2 * i + 1))?);
        }
        let mut data = PercentDataBuilder::new();
        for (i, &id) in self.buttons.iter().enumerate() {
            grid.add_component(id, data.pos(2 * i + 1, 1)?);
        }
        Ok(grid)
    }
}

impl Layout for ButtonLayout {
    fn cell_grid(&mut self) -> Result<&mut CellGrid> {
        let grid = match self.grid.take() {
            Some(grid) => grid,
            None => self.build_grid()?,
        };
        Ok(self.grid.insert(grid))
    }
}
