//! The cell size solver.
//!
//! [`CellGrid`] holds the column and row constraints, the cell groups and
//! the placement of every managed component. For each axis it computes
//! cell sizes in four steps:
//!
//! 1. base sizes from the cell's minimum size and its single-span components
//! 2. enlargement of cells under components spanning several cells
//! 3. equalization of grouped cells
//! 4. distribution of remaining space by weight
//!
//! If the preferred sizes do not fit into the container and shrinking is
//! enabled, steps 1 to 3 are repeated with minimum sizes.

use crate::cache::LayoutCache;
use crate::constraints::{CellAlignment, CellConstraints, CellConstraintsBuilder, CellSize};
use crate::data::PercentData;
use crate::group::CellGroup;
use percentgrid_core::{
    ComponentId, Insets, LayoutError, PlatformAdapter, Rect, Result, Size,
};
use serde::{Deserialize, Serialize};
use std::ops::Range;

const LOG_TARGET: &str = "percentgrid::engine";

/// Result of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellLayout {
    /// Width of every column
    pub column_sizes: Vec<i32>,
    /// Height of every row
    pub row_sizes: Vec<i32>,
    /// Left edge of every column
    pub column_positions: Vec<i32>,
    /// Top edge of every row
    pub row_positions: Vec<i32>,
    /// Bounds assigned to the components, in registration order
    pub bounds: Vec<(ComponentId, Rect)>,
}

/// Grid state and sizing algorithm shared by all layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellGrid {
    columns: Vec<CellConstraints>,
    rows: Vec<CellConstraints>,
    #[serde(default)]
    column_groups: Vec<CellGroup>,
    #[serde(default)]
    row_groups: Vec<CellGroup>,
    #[serde(default)]
    components: Vec<(ComponentId, PercentData)>,
    #[serde(default = "default_can_shrink")]
    can_shrink: bool,
    #[serde(skip)]
    cache: LayoutCache,
}

const fn default_can_shrink() -> bool {
    true
}

impl PartialEq for CellGrid {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && self.column_groups == other.column_groups
            && self.row_groups == other.row_groups
            && self.components == other.components
            && self.can_shrink == other.can_shrink
    }
}

impl Eq for CellGrid {}

impl CellGrid {
    /// Create a grid from explicit column and row constraints.
    pub fn new(columns: Vec<CellConstraints>, rows: Vec<CellConstraints>) -> Result<Self> {
        if columns.is_empty() {
            return Err(LayoutError::invalid_argument("no column constraints defined"));
        }
        if rows.is_empty() {
            return Err(LayoutError::invalid_argument("no row constraints defined"));
        }
        Ok(Self {
            columns,
            rows,
            column_groups: Vec::new(),
            row_groups: Vec::new(),
            components: Vec::new(),
            can_shrink: true,
            cache: LayoutCache::new(),
        })
    }

    /// Create a grid of the given dimensions with default constraints.
    ///
    /// Columns use `FULL/PREFERRED`, rows `CENTER/PREFERRED`.
    pub fn with_dimensions(columns: usize, rows: usize) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::invalid_argument(format!(
                "invalid grid dimensions {columns} x {rows}"
            )));
        }
        let mut builder = CellConstraintsBuilder::new();
        Self::new(
            vec![builder.default_column(); columns],
            vec![builder.default_row(); rows],
        )
    }

    /// Create a grid from constraint strings.
    ///
    /// Columns default to `FULL` alignment, rows to `CENTER`.
    pub fn from_specs(columns: &str, rows: &str) -> Result<Self> {
        Self::new(
            CellConstraints::parse_list(columns, CellAlignment::Full)?,
            CellConstraints::parse_list(rows, CellAlignment::Center)?,
        )
    }

    // ===== Configuration =====

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Constraints of a column.
    pub fn column_constraints(&self, index: usize) -> Result<CellConstraints> {
        lookup(&self.columns, index)
    }

    /// Constraints of a row.
    pub fn row_constraints(&self, index: usize) -> Result<CellConstraints> {
        lookup(&self.rows, index)
    }

    /// Replace the constraints of a column.
    pub fn set_column_constraints(&mut self, index: usize, cc: CellConstraints) -> Result<()> {
        replace(&mut self.columns, index, cc)?;
        self.cache.invalidate_weights();
        Ok(())
    }

    /// Replace the constraints of a row.
    pub fn set_row_constraints(&mut self, index: usize, cc: CellConstraints) -> Result<()> {
        replace(&mut self.rows, index, cc)?;
        self.cache.invalidate_weights();
        Ok(())
    }

    /// All column constraints.
    #[must_use]
    pub fn all_column_constraints(&self) -> &[CellConstraints] {
        &self.columns
    }

    /// All row constraints.
    #[must_use]
    pub fn all_row_constraints(&self) -> &[CellConstraints] {
        &self.rows
    }

    /// Constraints of one axis.
    #[must_use]
    pub fn axis_constraints(&self, vertical: bool) -> &[CellConstraints] {
        if vertical {
            &self.rows
        } else {
            &self.columns
        }
    }

    /// Column groups.
    #[must_use]
    pub fn column_groups(&self) -> &[CellGroup] {
        &self.column_groups
    }

    /// Row groups.
    #[must_use]
    pub fn row_groups(&self) -> &[CellGroup] {
        &self.row_groups
    }

    /// Groups of one axis.
    #[must_use]
    pub fn groups(&self, vertical: bool) -> &[CellGroup] {
        if vertical {
            &self.row_groups
        } else {
            &self.column_groups
        }
    }

    /// Add a column group. Indices are checked when sizes are computed.
    pub fn add_column_group(&mut self, group: CellGroup) {
        self.column_groups.push(group);
    }

    /// Add a row group. Indices are checked when sizes are computed.
    pub fn add_row_group(&mut self, group: CellGroup) {
        self.row_groups.push(group);
    }

    /// Whether cells fall back to minimum sizes if space is short.
    #[must_use]
    pub const fn can_shrink(&self) -> bool {
        self.can_shrink
    }

    /// Enable or disable falling back to minimum sizes.
    pub fn set_can_shrink(&mut self, can_shrink: bool) {
        self.can_shrink = can_shrink;
    }

    // ===== Components =====

    /// Register a component. A component registered before is moved.
    ///
    /// The placement is validated when sizes are computed next.
    pub fn add_component(&mut self, id: ComponentId, data: PercentData) {
        match self.components.iter_mut().find(|(c, _)| *c == id) {
            Some(entry) => entry.1 = data,
            None => self.components.push((id, data)),
        }
        self.cache.invalidate();
    }

    /// Unregister a component. Returns false if it was not registered.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        let before = self.components.len();
        self.components.retain(|(c, _)| *c != id);
        let removed = self.components.len() != before;
        if removed {
            self.cache.invalidate();
        }
        removed
    }

    /// Unregister all components.
    pub fn clear_components(&mut self) {
        self.components.clear();
        self.cache.invalidate();
    }

    /// Registered components with their placement, in registration order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &PercentData)> + '_ {
        self.components.iter().map(|(id, pd)| (*id, pd))
    }

    /// Number of registered components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Placement of a component.
    #[must_use]
    pub fn percent_data(&self, id: ComponentId) -> Option<&PercentData> {
        self.components
            .iter()
            .find_map(|(c, pd)| (*c == id).then_some(pd))
    }

    /// The component starting in a cell.
    #[must_use]
    pub fn component_at(&self, column: usize, row: usize) -> Option<ComponentId> {
        self.components
            .iter()
            .find_map(|(id, pd)| (pd.column() == column && pd.row() == row).then_some(*id))
    }

    /// Drop the component classification; it is rebuilt on the next pass.
    pub fn flush_cache(&mut self) {
        self.cache.invalidate();
        self.cache.invalidate_weights();
    }

    /// The classification cache, for inspection.
    #[must_use]
    pub const fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Validate all placements against the grid.
    pub fn validate(&mut self) -> Result<()> {
        self.cache
            .ensure(self.columns.len(), self.rows.len(), &self.components)
    }

    /// Sum of the weights of one axis.
    pub fn total_weight(&mut self, vertical: bool) -> u32 {
        let constraints = if vertical { &self.rows } else { &self.columns };
        self.cache.total_weight(vertical, constraints)
    }

    // ===== Sizing =====

    /// Constraints that apply to a component along one axis.
    ///
    /// A component override wins; otherwise the constraints of the target
    /// cell (if set) or the start cell are used.
    #[must_use]
    pub fn effective_constraints(&self, pd: &PercentData, vertical: bool) -> CellConstraints {
        if let Some(cc) = pd.constraints(vertical) {
            return cc;
        }
        let axis = self.axis_constraints(vertical);
        let index = pd.target(vertical).unwrap_or_else(|| pd.start(vertical));
        axis.get(index)
            .or_else(|| axis.get(pd.start(vertical)))
            .copied()
            .unwrap_or_else(|| CellConstraintsBuilder::new().default_column())
    }

    /// Size a component claims along one axis.
    ///
    /// `NONE` cells do not measure the component. `MINIMUM` cells and
    /// minimum passes use its minimum size, otherwise the preferred size is
    /// used. The result is never below the constraints' minimum size.
    pub fn component_size<A: PlatformAdapter + ?Sized>(
        &self,
        adapter: &A,
        id: ComponentId,
        pd: &PercentData,
        minimum: bool,
        vertical: bool,
    ) -> i32 {
        let cc = self.effective_constraints(pd, vertical);
        let size = match cc.cell_size() {
            CellSize::None => 0,
            CellSize::Minimum => adapter.minimum_size(id, vertical),
            CellSize::Preferred if minimum => adapter.minimum_size(id, vertical),
            CellSize::Preferred => adapter.preferred_size(id, vertical),
        };
        size.max(cc.min_size().to_pixel(adapter.size_handler(), vertical))
    }

    /// Cell sizes from components and constraints, without groups.
    pub fn calc_cell_sizes<A: PlatformAdapter + ?Sized>(
        &mut self,
        adapter: &A,
        minimum: bool,
        vertical: bool,
    ) -> Result<Vec<i32>> {
        self.validate()?;
        let handler = adapter.size_handler();
        let axis = self.axis_constraints(vertical);

        let mut sizes: Vec<i32> = axis
            .iter()
            .enumerate()
            .map(|(index, cc)| {
                self.cache
                    .single(vertical, index)
                    .iter()
                    .map(|&c| {
                        let (id, pd) = &self.components[c];
                        self.component_size(adapter, *id, pd, minimum, vertical)
                    })
                    .fold(cc.min_size().to_pixel(handler, vertical), i32::max)
            })
            .collect();

        self.handle_multi_spans(adapter, &mut sizes, minimum, vertical);
        Ok(sizes)
    }

    fn handle_multi_spans<A: PlatformAdapter + ?Sized>(
        &self,
        adapter: &A,
        sizes: &mut [i32],
        minimum: bool,
        vertical: bool,
    ) {
        let axis = self.axis_constraints(vertical);
        for &c in self.cache.multi(vertical) {
            let (id, pd) = &self.components[c];
            let required = self.component_size(adapter, *id, pd, minimum, vertical);
            let start = pd.start(vertical);
            let cells = start..start + pd.span(vertical);
            let available: i32 = sizes[cells.clone()].iter().sum();
            if required > available && !enlarge_cells(sizes, axis, cells, required - available) {
                log::trace!(
                    target: LOG_TARGET,
                    "cannot enlarge fixed cells for component {id} ({required} > {available})"
                );
            }
        }
    }

    /// Cell sizes with the groups of the axis applied.
    pub fn calc_cell_sizes_with_groups<A: PlatformAdapter + ?Sized>(
        &mut self,
        adapter: &A,
        minimum: bool,
        vertical: bool,
    ) -> Result<Vec<i32>> {
        let mut sizes = self.calc_cell_sizes(adapter, minimum, vertical)?;
        for group in self.groups(vertical) {
            group.apply(&mut sizes)?;
        }
        Ok(sizes)
    }

    /// Final cell sizes for a container extent along one axis.
    pub fn calc_sizes<A: PlatformAdapter + ?Sized>(
        &mut self,
        adapter: &A,
        container_size: i32,
        vertical: bool,
    ) -> Result<Vec<i32>> {
        let mut sizes = self.calc_cell_sizes_with_groups(adapter, false, vertical)?;
        let required: i32 = sizes.iter().sum();
        if required > container_size && self.can_shrink {
            log::debug!(
                target: LOG_TARGET,
                "shrinking {} ({required} > {container_size})",
                axis_name(vertical)
            );
            sizes = self.calc_cell_sizes_with_groups(adapter, true, vertical)?;
        }
        self.apply_weight_factors(&mut sizes, container_size, vertical);
        Ok(sizes)
    }

    /// Distribute space left in the container over the weighted cells.
    pub fn apply_weight_factors(&mut self, sizes: &mut [i32], container_size: i32, vertical: bool) {
        let total = self.total_weight(vertical);
        distribute_weights(sizes, container_size, self.axis_constraints(vertical), total);
    }

    /// Position and extent of a component along one axis.
    ///
    /// `sizes` holds the sizes of all cells of the axis and `start_pos` the
    /// position of the component's start cell.
    pub fn align_component<A: PlatformAdapter + ?Sized>(
        &self,
        adapter: &A,
        id: ComponentId,
        pd: &PercentData,
        sizes: &[i32],
        start_pos: i32,
        vertical: bool,
    ) -> Result<(i32, i32)> {
        let start = pd.start(vertical);
        let end = start.saturating_add(pd.span(vertical));
        let available: i32 = sizes
            .get(start..end)
            .ok_or_else(|| LayoutError::OutOfBounds {
                index: end.saturating_sub(1),
                len: sizes.len(),
            })?
            .iter()
            .sum();

        let alignment = self.effective_constraints(pd, vertical).alignment();
        if alignment == CellAlignment::Full {
            return Ok((start_pos, available));
        }
        let size = self.component_size(adapter, id, pd, false, vertical);
        let pos = match alignment {
            CellAlignment::Center => start_pos + (available - size).div_euclid(2),
            CellAlignment::End => start_pos + available - size,
            CellAlignment::Start | CellAlignment::Full => start_pos,
        };
        Ok((pos, size))
    }

    /// Preferred size of the whole grid.
    pub fn preferred_layout_size<A: PlatformAdapter + ?Sized>(&mut self, adapter: &A) -> Result<Size> {
        self.layout_size(adapter, false)
    }

    /// Minimum size of the whole grid.
    ///
    /// Without shrinking this equals the preferred size.
    pub fn minimum_layout_size<A: PlatformAdapter + ?Sized>(&mut self, adapter: &A) -> Result<Size> {
        self.layout_size(adapter, self.can_shrink)
    }

    fn layout_size<A: PlatformAdapter + ?Sized>(&mut self, adapter: &A, minimum: bool) -> Result<Size> {
        let columns = self.calc_cell_sizes_with_groups(adapter, minimum, false)?;
        let rows = self.calc_cell_sizes_with_groups(adapter, minimum, true)?;
        Ok(Size::new(columns.iter().sum(), rows.iter().sum()))
    }

    /// Lay out all components inside a container.
    ///
    /// Cells are sized for the container minus `insets`; the first cell
    /// starts at the top left inset. Every component's bounds are handed
    /// to the adapter.
    pub fn perform_layout<A: PlatformAdapter + ?Sized>(
        &mut self,
        adapter: &mut A,
        insets: Insets,
        size: Size,
    ) -> Result<CellLayout> {
        let content = insets.shrink(size);
        let column_sizes = self.calc_sizes(&*adapter, content.width, false)?;
        let row_sizes = self.calc_sizes(&*adapter, content.height, true)?;
        let column_positions = calc_cell_positions(&column_sizes, insets.left);
        let row_positions = calc_cell_positions(&row_sizes, insets.top);

        let bounds = self
            .components
            .iter()
            .map(|(id, pd)| {
                let (x, width) = self.align_component(
                    &*adapter,
                    *id,
                    pd,
                    &column_sizes,
                    column_positions[pd.column()],
                    false,
                )?;
                let (y, height) = self.align_component(
                    &*adapter,
                    *id,
                    pd,
                    &row_sizes,
                    row_positions[pd.row()],
                    true,
                )?;
                Ok((*id, Rect::new(x, y, width, height)))
            })
            .collect::<Result<Vec<_>>>()?;

        for (id, rect) in &bounds {
            adapter.set_bounds(*id, *rect);
        }
        log::debug!(
            target: LOG_TARGET,
            "layout {}x{}: columns {column_sizes:?}, rows {row_sizes:?}",
            size.width,
            size.height
        );

        Ok(CellLayout {
            column_sizes,
            row_sizes,
            column_positions,
            row_positions,
            bounds,
        })
    }
}

/// Start offset of every cell: `start`, then the running sum of `sizes`.
#[must_use]
pub fn calc_cell_positions(sizes: &[i32], start: i32) -> Vec<i32> {
    sizes
        .iter()
        .scan(start, |pos, &size| {
            let current = *pos;
            *pos += size;
            Some(current)
        })
        .collect()
}

/// Give the space left in the container to the weighted cells.
///
/// Each weighted cell receives `floor(extra * weight / total)`. The few
/// pixels lost to rounding go to the first weighted cells, one each, so
/// the whole extra space is used. Nothing happens without extra space or
/// without weights.
pub fn distribute_weights(
    sizes: &mut [i32],
    container_size: i32,
    constraints: &[CellConstraints],
    total_weight: u32,
) {
    let extra = i64::from(container_size) - sizes.iter().map(|&s| i64::from(s)).sum::<i64>();
    if extra <= 0 || total_weight == 0 {
        return;
    }

    let total = i64::from(total_weight);
    let mut assigned = 0;
    for (size, cc) in sizes.iter_mut().zip(constraints) {
        if cc.weight() > 0 {
            let share = extra * i64::from(cc.weight()) / total;
            *size += share as i32;
            assigned += share;
        }
    }

    let mut remainder = extra - assigned;
    for (size, cc) in sizes.iter_mut().zip(constraints) {
        if remainder <= 0 {
            break;
        }
        if cc.weight() > 0 {
            *size += 1;
            remainder -= 1;
        }
    }
}

/// Spread `amount` over the cells in `range` that are not `NONE`.
///
/// Returns false (and changes nothing) if every cell is fixed.
pub(crate) fn enlarge_cells(
    sizes: &mut [i32],
    constraints: &[CellConstraints],
    range: Range<usize>,
    amount: i32,
) -> bool {
    let eligible: Vec<usize> = range
        .filter(|&i| constraints[i].cell_size() != CellSize::None)
        .collect();
    if eligible.is_empty() {
        return false;
    }

    let count = eligible.len() as i32;
    let factor = amount / count;
    let modulo = amount % count;
    for (n, &i) in eligible.iter().enumerate() {
        sizes[i] += factor + i32::from((n as i32) < modulo);
    }
    true
}

fn lookup(cells: &[CellConstraints], index: usize) -> Result<CellConstraints> {
    cells.get(index).copied().ok_or(LayoutError::OutOfBounds {
        index,
        len: cells.len(),
    })
}

fn replace(cells: &mut [CellConstraints], index: usize, cc: CellConstraints) -> Result<()> {
    let len = cells.len();
    let slot = cells
        .get_mut(index)
        .ok_or(LayoutError::OutOfBounds { index, len })?;
    *slot = cc;
    Ok(())
}

const fn axis_name(vertical: bool) -> &'static str {
    if vertical {
        "rows"
    } else {
        "columns"
    }
}
