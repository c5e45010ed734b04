//! Placement of a single component inside the grid.

use crate::constraints::CellConstraints;
use percentgrid_core::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a component lives in the grid and how many cells it spans.
///
/// Optional constraint overrides replace the constraints of the column or
/// row the component starts in. A target column or row redirects that
/// lookup to another cell, which lets a component spanning empty
/// neighbours behave like the cell it visually belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PercentData {
    column: usize,
    row: usize,
    span_x: usize,
    span_y: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_column: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column_constraints: Option<CellConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    row_constraints: Option<CellConstraints>,
}

impl PercentData {
    /// Single-cell placement at `(column, row)`.
    #[must_use]
    pub const fn at(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            span_x: 1,
            span_y: 1,
            target_column: None,
            target_row: None,
            column_constraints: None,
            row_constraints: None,
        }
    }

    /// Start column.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.column
    }

    /// Start row.
    #[must_use]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn span_x(&self) -> usize {
        self.span_x
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn span_y(&self) -> usize {
        self.span_y
    }

    /// Column whose constraints apply instead of the start column.
    #[must_use]
    pub const fn target_column(&self) -> Option<usize> {
        self.target_column
    }

    /// Row whose constraints apply instead of the start row.
    #[must_use]
    pub const fn target_row(&self) -> Option<usize> {
        self.target_row
    }

    /// Column constraints override.
    #[must_use]
    pub const fn column_constraints(&self) -> Option<CellConstraints> {
        self.column_constraints
    }

    /// Row constraints override.
    #[must_use]
    pub const fn row_constraints(&self) -> Option<CellConstraints> {
        self.row_constraints
    }

    /// Start index along one axis.
    #[must_use]
    pub const fn start(&self, vertical: bool) -> usize {
        if vertical {
            self.row
        } else {
            self.column
        }
    }

    /// Span along one axis.
    #[must_use]
    pub const fn span(&self, vertical: bool) -> usize {
        if vertical {
            self.span_y
        } else {
            self.span_x
        }
    }

    /// Target index along one axis.
    #[must_use]
    pub const fn target(&self, vertical: bool) -> Option<usize> {
        if vertical {
            self.target_row
        } else {
            self.target_column
        }
    }

    /// Constraints override along one axis.
    #[must_use]
    pub const fn constraints(&self, vertical: bool) -> Option<CellConstraints> {
        if vertical {
            self.row_constraints
        } else {
            self.column_constraints
        }
    }
}

impl fmt::Display for PercentData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "col = {} row = {} spanx = {} spany = {}",
            self.column, self.row, self.span_x, self.span_y
        )?;
        if let Some(tc) = self.target_column {
            write!(f, " targetCol = {tc}")?;
        }
        if let Some(tr) = self.target_row {
            write!(f, " targetRow = {tr}")?;
        }
        if let Some(cc) = self.column_constraints {
            write!(f, " colConstr = {cc}")?;
        }
        if let Some(rc) = self.row_constraints {
            write!(f, " rowConstr = {rc}")?;
        }
        Ok(())
    }
}

/// Reusable builder for [`PercentData`].
///
/// [`create`](Self::create) resets all properties but remembers the
/// created placement, so [`after_previous`](Self::after_previous) can put
/// the next component directly to its right.
#[derive(Debug, Clone)]
pub struct PercentDataBuilder {
    position: Option<(usize, usize)>,
    span_x: usize,
    span_y: usize,
    target_column: Option<usize>,
    target_row: Option<usize>,
    column_constraints: Option<CellConstraints>,
    row_constraints: Option<CellConstraints>,
    previous: Option<PercentData>,
    error: Option<LayoutError>,
}

impl Default for PercentDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PercentDataBuilder {
    /// Create an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            position: None,
            span_x: 1,
            span_y: 1,
            target_column: None,
            target_row: None,
            column_constraints: None,
            row_constraints: None,
            previous: None,
            error: None,
        }
    }

    /// Set the start cell.
    pub fn xy(&mut self, column: usize, row: usize) -> &mut Self {
        self.position = Some((column, row));
        self
    }

    /// Place the component right after the previously created one, in the
    /// same row. Without a previous placement this is cell `(0, 0)`.
    pub fn after_previous(&mut self) -> &mut Self {
        let pos = self
            .previous
            .map_or((0, 0), |p| (p.column + p.span_x, p.row));
        self.position = Some(pos);
        self
    }

    /// Number of columns covered; at least 1.
    pub fn span_x(&mut self, span: usize) -> &mut Self {
        self.span_x = self.checked_span(span);
        self
    }

    /// Number of rows covered; at least 1.
    pub fn span_y(&mut self, span: usize) -> &mut Self {
        self.span_y = self.checked_span(span);
        self
    }

    /// Set both spans.
    pub fn span(&mut self, span_x: usize, span_y: usize) -> &mut Self {
        self.span_x(span_x).span_y(span_y)
    }

    /// Take column constraints from another column.
    pub fn with_target_column(&mut self, column: usize) -> &mut Self {
        self.target_column = Some(column);
        self
    }

    /// Take row constraints from another row.
    pub fn with_target_row(&mut self, row: usize) -> &mut Self {
        self.target_row = Some(row);
        self
    }

    /// Override the column constraints for this component.
    pub fn with_column_constraints(&mut self, constraints: CellConstraints) -> &mut Self {
        self.column_constraints = Some(constraints);
        self
    }

    /// Override the row constraints for this component.
    pub fn with_row_constraints(&mut self, constraints: CellConstraints) -> &mut Self {
        self.row_constraints = Some(constraints);
        self
    }

    /// Shortcut for `xy(column, row).create()`.
    pub fn pos(&mut self, column: usize, row: usize) -> Result<PercentData> {
        self.xy(column, row).create()
    }

    /// Build the placement and reset the builder.
    pub fn create(&mut self) -> Result<PercentData> {
        let result = self.build();
        if let Ok(data) = result {
            self.previous = Some(data);
        }
        self.reset();
        result
    }

    /// Discard all properties set so far.
    pub fn reset(&mut self) -> &mut Self {
        self.position = None;
        self.span_x = 1;
        self.span_y = 1;
        self.target_column = None;
        self.target_row = None;
        self.column_constraints = None;
        self.row_constraints = None;
        self.error = None;
        self
    }

    fn build(&self) -> Result<PercentData> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let (column, row) = self
            .position
            .ok_or_else(|| LayoutError::invalid_state("no position defined"))?;
        Ok(PercentData {
            column,
            row,
            span_x: self.span_x,
            span_y: self.span_y,
            target_column: self.target_column,
            target_row: self.target_row,
            column_constraints: self.column_constraints,
            row_constraints: self.row_constraints,
        })
    }

    fn checked_span(&mut self, span: usize) -> usize {
        if span == 0 && self.error.is_none() {
            self.error = Some(LayoutError::invalid_argument("span must be at least 1"));
        }
        span.max(1)
    }
}
