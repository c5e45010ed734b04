//! Border layout on top of a 7x7 percent grid.
//!
//! The grid looks like this (M = margin, G = gap):
//!
//! ```text
//!   M  W  G  C  G  E  M
//! M .  .  .  .  .  .  .
//! N .  NW .  N  .  NE .
//! G .  .  .  .  .  .  .
//! C .  W  .  C  .  E  .
//! G .  .  .  .  .  .  .
//! S .  SW .  S  .  SE .
//! M .  .  .  .  .  .  .
//! ```
//!
//! Regions that are not occupied collapse: their cells stay empty and the
//! adjacent gap becomes zero, while the neighbouring regions span into the
//! free space.

use crate::constraints::{CellConstraints, CellConstraintsBuilder, CellSize};
use crate::data::{PercentData, PercentDataBuilder};
use crate::engine::CellGrid;
use crate::layout::Layout;
use percentgrid_core::{ComponentId, LayoutError, NumberWithUnit, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LOG_TARGET: &str = "percentgrid::border";

const GRID_SIZE: usize = 7;
const CENTER_INDEX: usize = 3;

/// The five regions of a [`BorderLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BorderRegion {
    /// Top edge
    North,
    /// Bottom edge
    South,
    /// Left edge
    West,
    /// Right edge
    East,
    /// Remaining space
    Center,
}

impl BorderRegion {
    /// All regions.
    pub const ALL: [Self; 5] = [Self::North, Self::South, Self::West, Self::East, Self::Center];

    /// Upper case name of the region.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "NORTH",
            Self::South => "SOUTH",
            Self::West => "WEST",
            Self::East => "EAST",
            Self::Center => "CENTER",
        }
    }
}

impl fmt::Display for BorderRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BorderRegion {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| LayoutError::parse(s, "unknown border region"))
    }
}

/// Which regions are occupied, in the order they were seen.
#[derive(Debug, Default, Clone, Copy)]
struct Seen {
    north: bool,
    south: bool,
    west: bool,
    east: bool,
}

/// First cell of a region edge: the inner cell if the outer one is taken.
const fn edge_pos(taken: bool) -> usize {
    if taken {
        3
    } else {
        1
    }
}

/// Cells spanned between two edges; every free edge adds two cells.
const fn edge_span(first: bool, second: bool) -> usize {
    1 + if first { 0 } else { 2 } + if second { 0 } else { 2 }
}

/// Arranges up to five components along the edges and in the center.
///
/// The margins surround the whole layout, the gaps separate the center
/// from the edge regions. All of them default to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorderLayout {
    #[serde(default)]
    left_margin: NumberWithUnit,
    #[serde(default)]
    top_margin: NumberWithUnit,
    #[serde(default)]
    right_margin: NumberWithUnit,
    #[serde(default)]
    bottom_margin: NumberWithUnit,
    #[serde(default)]
    north_gap: NumberWithUnit,
    #[serde(default)]
    west_gap: NumberWithUnit,
    #[serde(default)]
    south_gap: NumberWithUnit,
    #[serde(default)]
    east_gap: NumberWithUnit,
    #[serde(default = "default_can_shrink")]
    can_shrink: bool,
    #[serde(default)]
    regions: Vec<(ComponentId, BorderRegion)>,
    #[serde(skip)]
    grid: Option<CellGrid>,
}

const fn default_can_shrink() -> bool {
    true
}

impl Default for BorderLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BorderLayout {
    fn eq(&self, other: &Self) -> bool {
        self.margins() == other.margins()
            && self.gaps() == other.gaps()
            && self.can_shrink == other.can_shrink
            && self.regions == other.regions
    }
}

impl Eq for BorderLayout {}

macro_rules! length_property {
    ($(#[$doc:meta] $field:ident, $setter:ident;)*) => {
        $(
            #[$doc]
            #[must_use]
            pub const fn $field(&self) -> NumberWithUnit {
                self.$field
            }

            #[doc = concat!("Change `", stringify!($field), "`.")]
            pub fn $setter(&mut self, value: NumberWithUnit) {
                self.$field = value;
                self.grid = None;
            }
        )*
    };
}

impl BorderLayout {
    /// Create an empty layout without margins and gaps.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            left_margin: NumberWithUnit::ZERO,
            top_margin: NumberWithUnit::ZERO,
            right_margin: NumberWithUnit::ZERO,
            bottom_margin: NumberWithUnit::ZERO,
            north_gap: NumberWithUnit::ZERO,
            west_gap: NumberWithUnit::ZERO,
            south_gap: NumberWithUnit::ZERO,
            east_gap: NumberWithUnit::ZERO,
            can_shrink: true,
            regions: Vec::new(),
            grid: None,
        }
    }

    length_property! {
        /// Space left of the layout.
        left_margin, set_left_margin;
        /// Space above the layout.
        top_margin, set_top_margin;
        /// Space right of the layout.
        right_margin, set_right_margin;
        /// Space below the layout.
        bottom_margin, set_bottom_margin;
        /// Space between the north region and the center.
        north_gap, set_north_gap;
        /// Space between the west region and the center.
        west_gap, set_west_gap;
        /// Space between the south region and the center.
        south_gap, set_south_gap;
        /// Space between the east region and the center.
        east_gap, set_east_gap;
    }

    /// Set all four margins at once.
    pub fn set_margins(&mut self, margin: NumberWithUnit) {
        self.left_margin = margin;
        self.top_margin = margin;
        self.right_margin = margin;
        self.bottom_margin = margin;
        self.grid = None;
    }

    /// Set all four gaps at once.
    pub fn set_gaps(&mut self, gap: NumberWithUnit) {
        self.north_gap = gap;
        self.west_gap = gap;
        self.south_gap = gap;
        self.east_gap = gap;
        self.grid = None;
    }

    /// Left, top, right and bottom margin.
    #[must_use]
    pub const fn margins(&self) -> [NumberWithUnit; 4] {
        [self.left_margin, self.top_margin, self.right_margin, self.bottom_margin]
    }

    /// North, west, south and east gap.
    #[must_use]
    pub const fn gaps(&self) -> [NumberWithUnit; 4] {
        [self.north_gap, self.west_gap, self.south_gap, self.east_gap]
    }

    /// Whether occupied cells fall back to minimum sizes if space is short.
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

    /// Put a component into a region.
    ///
    /// A component added again moves to the new region. A region can hold
    /// only one component.
    pub fn add_component(&mut self, id: ComponentId, region: BorderRegion) -> Result<()> {
        if let Some((other, _)) = self.regions.iter().find(|(c, r)| *r == region && *c != id) {
            return Err(LayoutError::invalid_argument(format!(
                "region {region} is already occupied by {other}"
            )));
        }
        self.regions.retain(|(c, _)| *c != id);
        self.regions.push((id, region));
        self.grid = None;
        Ok(())
    }

    /// Put a component into the region named by `region`.
    pub fn add_component_named(&mut self, id: ComponentId, region: &str) -> Result<()> {
        self.add_component(id, region.parse()?)
    }

    /// Take a component out of the layout.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|(c, _)| *c != id);
        let removed = self.regions.len() != before;
        if removed {
            self.grid = None;
        }
        removed
    }

    /// Region of a component.
    #[must_use]
    pub fn region(&self, id: ComponentId) -> Option<BorderRegion> {
        self.regions
            .iter()
            .find_map(|(c, r)| (*c == id).then_some(*r))
    }

    /// Component in a region.
    #[must_use]
    pub fn component_in(&self, region: BorderRegion) -> Option<ComponentId> {
        self.regions
            .iter()
            .find_map(|(c, r)| (*r == region).then_some(*c))
    }

    /// Components with their regions, in registration order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, BorderRegion)> + '_ {
        self.regions.iter().copied()
    }

    fn has_region(&self, region: BorderRegion) -> bool {
        self.regions.iter().any(|(_, r)| *r == region)
    }

    /// Build the 7x7 grid for the current properties and components.
    pub fn build_grid(&self) -> Result<CellGrid> {
        let columns = axis_constraints(
            self.left_margin,
            (self.has_region(BorderRegion::West), self.west_gap),
            (self.has_region(BorderRegion::East), self.east_gap),
            self.right_margin,
        )?;
        let rows = axis_constraints(
            self.top_margin,
            (self.has_region(BorderRegion::North), self.north_gap),
            (self.has_region(BorderRegion::South), self.south_gap),
            self.bottom_margin,
        )?;

        let mut grid = CellGrid::new(columns, rows)?;
        grid.set_can_shrink(self.can_shrink);
        for (id, data) in self.placements()? {
            grid.add_component(id, data);
        }
        log::trace!(
            target: LOG_TARGET,
            "built border grid for {} regions",
            self.regions.len()
        );
        Ok(grid)
    }

    /// Cells of every component. Edges registered earlier claim the corners.
    fn placements(&self) -> Result<Vec<(ComponentId, PercentData)>> {
        let mut seen = Seen::default();
        let mut builder = PercentDataBuilder::new();
        let mut result = Vec::with_capacity(self.regions.len());
        let mut center = None;

        for &(id, region) in &self.regions {
            let data = match region {
                BorderRegion::North | BorderRegion::South => {
                    let row = if region == BorderRegion::North { 1 } else { 5 };
                    if region == BorderRegion::North {
                        seen.north = true;
                    } else {
                        seen.south = true;
                    }
                    builder
                        .xy(edge_pos(seen.west), row)
                        .span_x(edge_span(seen.west, seen.east))
                        .with_target_column(CENTER_INDEX)
                        .create()?
                }
                BorderRegion::West | BorderRegion::East => {
                    let column = if region == BorderRegion::West { 1 } else { 5 };
                    if region == BorderRegion::West {
                        seen.west = true;
                    } else {
                        seen.east = true;
                    }
                    builder
                        .xy(column, edge_pos(seen.north))
                        .span_y(edge_span(seen.north, seen.south))
                        .with_target_row(CENTER_INDEX)
                        .create()?
                }
                BorderRegion::Center => {
                    center = Some(id);
                    continue;
                }
            };
            result.push((id, data));
        }

        if let Some(id) = center {
            let data = builder
                .xy(edge_pos(seen.west), edge_pos(seen.north))
                .span(edge_span(seen.west, seen.east), edge_span(seen.north, seen.south))
                .with_target_column(CENTER_INDEX)
                .with_target_row(CENTER_INDEX)
                .create()?;
            result.push((id, data));
        }
        Ok(result)
    }
}

/// Margin, edge, gap, center, gap, edge, margin.
fn axis_constraints(
    leading_margin: NumberWithUnit,
    (leading, leading_gap): (bool, NumberWithUnit),
    (trailing, trailing_gap): (bool, NumberWithUnit),
    trailing_margin: NumberWithUnit,
) -> Result<Vec<CellConstraints>> {
    let mut builder = CellConstraintsBuilder::new();
    let mut fixed = |size: NumberWithUnit| builder.with_minimum_size(size).create();
    let gap = |present: bool, size: NumberWithUnit| {
        if present {
            size
        } else {
            NumberWithUnit::ZERO
        }
    };

    let cells = vec![
        fixed(leading_margin)?,
        preferred(0)?,
        fixed(gap(leading, leading_gap))?,
        preferred(100)?,
        fixed(gap(trailing, trailing_gap))?,
        preferred(0)?,
        fixed(trailing_margin)?,
    ];
    debug_assert_eq!(cells.len(), GRID_SIZE);
    Ok(cells)
}

fn preferred(weight: i32) -> Result<CellConstraints> {
    CellConstraintsBuilder::new()
        .with_cell_size(CellSize::Preferred)
        .with_weight(weight)
        .create()
}

impl Layout for BorderLayout {
    fn cell_grid(&mut self) -> Result<&mut CellGrid> {
        let grid = match self.grid.take() {
            Some(grid) => grid,
            None => self.build_grid()?,
        };
        Ok(self.grid.insert(grid))
    }
}
