//! Freely configurable percent layout.

use crate::constraints::{CellAlignment, CellConstraints, CellConstraintsBuilder};
use crate::data::{PercentData, PercentDataBuilder};
use crate::engine::CellGrid;
use crate::group::CellGroup;
use crate::layout::Layout;
use percentgrid_core::{ComponentId, Result};
use serde::{Deserialize, Serialize};

/// A grid layout with explicit column and row constraints.
///
/// # Example
///
/// ```
/// use percentgrid_core::{ComponentId, ComponentSizes, FixedPlatform, FixedSizeHandler, Size};
/// use percentgrid_layout::{Layout, PercentLayout};
///
/// let mut layout = PercentLayout::from_specs("4px, preferred/100, 4px", "center/preferred").unwrap();
/// let label = ComponentId::new(1);
/// layout.add_at(label, 1, 0).unwrap();
///
/// let platform = FixedPlatform::new(FixedSizeHandler::default())
///     .with_component(label, ComponentSizes::fixed(Size::new(60, 20)));
/// assert_eq!(layout.preferred_layout_size(&platform).unwrap(), Size::new(68, 20));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentLayout {
    grid: CellGrid,
}

impl PercentLayout {
    /// Create a layout with `columns` x `rows` default cells.
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        CellGrid::with_dimensions(columns, rows).map(Self::from_grid)
    }

    /// Create a layout from column and row constraints.
    pub fn from_constraints(
        columns: impl IntoIterator<Item = CellConstraints>,
        rows: impl IntoIterator<Item = CellConstraints>,
    ) -> Result<Self> {
        CellGrid::new(columns.into_iter().collect(), rows.into_iter().collect()).map(Self::from_grid)
    }

    /// Create a layout from constraint strings such as
    /// `"10, preferred/50, 10, minimum(10), END/preferred/50"`.
    pub fn from_specs(columns: &str, rows: &str) -> Result<Self> {
        CellGrid::from_specs(columns, rows).map(Self::from_grid)
    }

    /// Wrap an existing grid.
    #[must_use]
    pub const fn from_grid(grid: CellGrid) -> Self {
        Self { grid }
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// The underlying grid, for direct configuration.
    pub fn grid_mut(&mut self) -> &mut CellGrid {
        &mut self.grid
    }

    /// Unwrap the underlying grid.
    #[must_use]
    pub fn into_grid(self) -> CellGrid {
        self.grid
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.grid.column_count()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    /// Register a component with its placement.
    pub fn add_component(&mut self, id: ComponentId, data: PercentData) {
        self.grid.add_component(id, data);
    }

    /// Register a component in the single cell `(column, row)`.
    pub fn add_at(&mut self, id: ComponentId, column: usize, row: usize) -> Result<()> {
        let data = PercentDataBuilder::new().pos(column, row)?;
        self.grid.add_component(id, data);
        Ok(())
    }

    /// Unregister a component.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        self.grid.remove_component(id)
    }

    /// Registered components with their placement.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &PercentData)> + '_ {
        self.grid.components()
    }

    /// Placement of a component.
    #[must_use]
    pub fn percent_data(&self, id: ComponentId) -> Option<&PercentData> {
        self.grid.percent_data(id)
    }

    /// Force the given columns to one width.
    pub fn add_column_group(&mut self, group: CellGroup) {
        self.grid.add_column_group(group);
    }

    /// Force the given rows to one height.
    pub fn add_row_group(&mut self, group: CellGroup) {
        self.grid.add_row_group(group);
    }

    /// Whether cells fall back to minimum sizes if space is short.
    #[must_use]
    pub const fn can_shrink(&self) -> bool {
        self.grid.can_shrink()
    }

    /// Enable or disable falling back to minimum sizes.
    pub fn set_can_shrink(&mut self, can_shrink: bool) {
        self.grid.set_can_shrink(can_shrink);
    }

    /// Drop cached component data.
    pub fn flush_cache(&mut self) {
        self.grid.flush_cache();
    }

    /// A constraints builder producing column constraints.
    #[must_use]
    pub fn column_builder() -> CellConstraintsBuilder {
        builder_for(CellAlignment::Full)
    }

    /// A constraints builder producing row constraints.
    #[must_use]
    pub fn row_builder() -> CellConstraintsBuilder {
        builder_for(CellAlignment::Center)
    }
}

fn builder_for(alignment: CellAlignment) -> CellConstraintsBuilder {
    let mut builder = CellConstraintsBuilder::new();
    builder.set_default_alignment(alignment);
    builder
}

impl Layout for PercentLayout {
    fn cell_grid(&mut self) -> Result<&mut CellGrid> {
        Ok(&mut self.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::CellSize;
    use percentgrid_core::{
        ComponentSizes, FixedPlatform, FixedSizeHandler, Insets, LayoutError, Rect, Size,
    };

    fn platform() -> FixedPlatform {
        FixedPlatform::new(FixedSizeHandler::new(96, 12.0))
            .with_component(
                ComponentId::new(1),
                ComponentSizes::new(Size::new(80, 20), Size::new(40, 20)),
            )
            .with_component(
                ComponentId::new(2),
                ComponentSizes::new(Size::new(120, 24), Size::new(60, 20)),
            )
    }

    fn form() -> PercentLayout {
        let mut layout =
            PercentLayout::from_specs("end/preferred, 3dlu, preferred/100", "preferred").unwrap();
        layout.add_at(ComponentId::new(1), 0, 0).unwrap();
        layout.add_at(ComponentId::new(2), 2, 0).unwrap();
        layout
    }

    #[test]
    fn test_new_dimensions() {
        let layout = PercentLayout::new(4, 2).unwrap();
        assert_eq!(layout.column_count(), 4);
        assert_eq!(layout.row_count(), 2);
        assert!(PercentLayout::new(0, 1).is_err());
    }

    #[test]
    fn test_from_constraints() {
        let mut cb = PercentLayout::column_builder();
        let gap = cb.with_minimum_size("4px".parse().unwrap()).create().unwrap();
        let col = cb.with_cell_size(CellSize::Minimum).create().unwrap();
        let row = PercentLayout::row_builder()
            .with_cell_size(CellSize::Preferred)
            .create()
            .unwrap();
        assert_eq!(row.alignment(), CellAlignment::Center);
        let layout = PercentLayout::from_constraints([col, gap, col], [row]).unwrap();
        assert_eq!(layout.grid().column_constraints(1).unwrap(), gap);
    }

    #[test]
    fn test_preferred_and_minimum_size() {
        let p = platform();
        let mut layout = form();
        // 3dlu at font size 12 is 9px
        assert_eq!(layout.preferred_layout_size(&p).unwrap(), Size::new(209, 24));
        assert_eq!(layout.minimum_layout_size(&p).unwrap(), Size::new(109, 20));
        layout.set_can_shrink(false);
        assert_eq!(layout.minimum_layout_size(&p).unwrap(), Size::new(209, 24));
    }

    #[test]
    fn test_perform_layout_assigns_bounds() {
        let mut p = platform();
        let mut layout = form();
        let result = layout
            .perform_layout(&mut p, Insets::uniform(2), Size::new(304, 30))
            .unwrap();
        assert_eq!(result.column_sizes, vec![80, 9, 211]);
        assert_eq!(result.row_sizes, vec![24]);
        // rows default to CENTER alignment
        assert_eq!(p.bounds(ComponentId::new(1)), Some(Rect::new(2, 4, 80, 20)));
        assert_eq!(p.bounds(ComponentId::new(2)), Some(Rect::new(91, 2, 211, 24)));
    }

    #[test]
    fn test_perform_layout_is_repeatable() {
        let mut p = platform();
        let mut layout = form();
        let first = layout
            .perform_layout(&mut p, Insets::ZERO, Size::new(150, 40))
            .unwrap();
        let second = layout
            .perform_layout(&mut p, Insets::ZERO, Size::new(150, 40))
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_remove_component() {
        let p = platform();
        let mut layout = form();
        assert!(layout.remove_component(ComponentId::new(2)));
        assert_eq!(layout.components().count(), 1);
        assert_eq!(layout.preferred_layout_size(&p).unwrap(), Size::new(89, 20));
    }

    #[test]
    fn test_equality_and_serde() {
        let mut layout = form();
        layout.add_column_group(CellGroup::new([0, 2]).unwrap());
        let json = serde_json::to_string(&layout).unwrap();
        let back: PercentLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);

        let mut other = back.clone();
        other.add_at(ComponentId::new(3), 1, 0).unwrap();
        assert_ne!(other, layout);
    }

    #[test]
    fn test_fractional_pixels_survive_serde() {
        let layout = PercentLayout::from_specs("preferred(10.5), 2.5", "preferred").unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert!(json.contains("FULL/PREFERRED(10.5px)/0"));
        assert!(json.contains("FULL/NONE(2.5px)/0"));
        let back: PercentLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn test_loaded_empty_span_is_rejected() {
        let mut p = platform();
        let mut value = serde_json::to_value(form()).unwrap();
        value["components"][0][1]["span_x"] = serde_json::json!(0);
        let mut layout: PercentLayout = serde_json::from_value(value).unwrap();

        let err = layout
            .perform_layout(&mut p, Insets::ZERO, Size::new(300, 30))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));
        assert!(layout.preferred_layout_size(&p).is_err());
    }

    #[test]
    fn test_invalid_placement_reported_lazily() {
        let p = platform();
        let mut layout = PercentLayout::new(2, 2).unwrap();
        layout.add_at(ComponentId::new(1), 5, 0).unwrap();
        assert!(layout.preferred_layout_size(&p).is_err());
        layout.remove_component(ComponentId::new(1));
        assert!(layout.preferred_layout_size(&p).is_ok());
    }
}
