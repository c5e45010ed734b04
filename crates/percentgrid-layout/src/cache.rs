//! Component classification cache.
//!
//! Sizing passes repeatedly ask which components start in a given column
//! or row and which ones span several cells. The answers only change when
//! components are added or removed, so they are computed once and kept
//! until the cache is invalidated.

use crate::constraints::CellConstraints;
use crate::data::PercentData;
use percentgrid_core::{ComponentId, LayoutError, Result};
use std::collections::HashMap;

const LOG_TARGET: &str = "percentgrid::cache";

/// Lazily rebuilt index over the registered components.
#[derive(Debug, Default, Clone)]
pub struct LayoutCache {
    valid: bool,
    /// Per column: components starting there with a horizontal span of 1.
    single_columns: Vec<Vec<usize>>,
    /// Per row: components starting there with a vertical span of 1.
    single_rows: Vec<Vec<usize>>,
    multi_columns: Vec<usize>,
    multi_rows: Vec<usize>,
    total_weight_x: Option<u32>,
    total_weight_y: Option<u32>,
    hits: usize,
    rebuilds: usize,
}

impl LayoutCache {
    /// Create a new empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the component classification.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Drop the cached total weights.
    pub fn invalidate_weights(&mut self) {
        self.total_weight_x = None;
        self.total_weight_y = None;
    }

    /// Drop everything, including statistics.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the classification is up to date.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get the number of lookups served without a rebuild.
    #[must_use]
    pub const fn hits(&self) -> usize {
        self.hits
    }

    /// Get the number of rebuilds.
    #[must_use]
    pub const fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Make sure the classification matches `components`.
    ///
    /// Rebuilding validates every placement against the grid: components
    /// must fit into `columns` x `rows` and no two may share a start cell.
    pub(crate) fn ensure(
        &mut self,
        columns: usize,
        rows: usize,
        components: &[(ComponentId, PercentData)],
    ) -> Result<()> {
        if self.valid {
            self.hits += 1;
            return Ok(());
        }

        let mut single_columns = vec![Vec::new(); columns];
        let mut single_rows = vec![Vec::new(); rows];
        let mut multi_columns = Vec::new();
        let mut multi_rows = Vec::new();
        let mut occupied: HashMap<(usize, usize), ComponentId> = HashMap::new();

        for (idx, (id, pd)) in components.iter().enumerate() {
            check_fits(*id, pd, columns, rows)?;
            if let Some(other) = occupied.insert((pd.column(), pd.row()), *id) {
                return Err(LayoutError::invalid_state(format!(
                    "components {other} and {id} both start in cell ({}, {})",
                    pd.column(),
                    pd.row()
                )));
            }

            if pd.span_x() == 1 {
                single_columns[pd.column()].push(idx);
            } else {
                multi_columns.push(idx);
            }
            if pd.span_y() == 1 {
                single_rows[pd.row()].push(idx);
            } else {
                multi_rows.push(idx);
            }
        }

        self.single_columns = single_columns;
        self.single_rows = single_rows;
        self.multi_columns = multi_columns;
        self.multi_rows = multi_rows;
        self.valid = true;
        self.rebuilds += 1;
        log::trace!(
            target: LOG_TARGET,
            "classified {} components ({} multi-column, {} multi-row)",
            components.len(),
            self.multi_columns.len(),
            self.multi_rows.len()
        );
        Ok(())
    }

    /// Registry indices of single-span components starting in a cell.
    pub(crate) fn single(&self, vertical: bool, index: usize) -> &[usize] {
        let cells = if vertical {
            &self.single_rows
        } else {
            &self.single_columns
        };
        cells.get(index).map_or(&[][..], Vec::as_slice)
    }

    /// Registry indices of components spanning several cells.
    pub(crate) fn multi(&self, vertical: bool) -> &[usize] {
        if vertical {
            &self.multi_rows
        } else {
            &self.multi_columns
        }
    }

    /// Sum of the weights of one axis, computed on first use.
    pub(crate) fn total_weight(&mut self, vertical: bool, constraints: &[CellConstraints]) -> u32 {
        let slot = if vertical {
            &mut self.total_weight_y
        } else {
            &mut self.total_weight_x
        };
        *slot.get_or_insert_with(|| constraints.iter().map(CellConstraints::weight).sum())
    }
}

fn check_fits(id: ComponentId, pd: &PercentData, columns: usize, rows: usize) -> Result<()> {
    if pd.span_x() == 0 || pd.span_y() == 0 {
        return Err(LayoutError::invalid_state(format!(
            "component {id} has an empty span {}x{}",
            pd.span_x(),
            pd.span_y()
        )));
    }
    if pd.column().checked_add(pd.span_x()).map_or(true, |end| end > columns) {
        return Err(LayoutError::invalid_state(format!(
            "component {id} at column {} with span {} exceeds {columns} columns",
            pd.column(),
            pd.span_x()
        )));
    }
    if pd.row().checked_add(pd.span_y()).map_or(true, |end| end > rows) {
        return Err(LayoutError::invalid_state(format!(
            "component {id} at row {} with span {} exceeds {rows} rows",
            pd.row(),
            pd.span_y()
        )));
    }
    if let Some(tc) = pd.target_column().filter(|&tc| tc >= columns) {
        return Err(LayoutError::invalid_state(format!(
            "component {id} targets column {tc} of {columns}"
        )));
    }
    if let Some(tr) = pd.target_row().filter(|&tr| tr >= rows) {
        return Err(LayoutError::invalid_state(format!(
            "component {id} targets row {tr} of {rows}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PercentDataBuilder;

    fn registry(placements: &[PercentData]) -> Vec<(ComponentId, PercentData)> {
        placements
            .iter()
            .enumerate()
            .map(|(i, pd)| (ComponentId::new(i as u64), *pd))
            .collect()
    }

    #[test]
    fn test_cache_new() {
        let cache = LayoutCache::new();
        assert!(!cache.is_valid());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.rebuilds(), 0);
    }

    #[test]
    fn test_classification() {
        let mut b = PercentDataBuilder::new();
        let comps = registry(&[
            b.pos(0, 0).unwrap(),
            b.xy(1, 0).span_x(2).create().unwrap(),
            b.xy(0, 1).span_y(2).create().unwrap(),
        ]);
        let mut cache = LayoutCache::new();
        cache.ensure(3, 3, &comps).unwrap();

        assert_eq!(cache.single(false, 0), &[0, 2]);
        assert!(cache.single(false, 1).is_empty());
        assert_eq!(cache.single(true, 0), &[0, 1]);
        assert_eq!(cache.multi(false), &[1]);
        assert_eq!(cache.multi(true), &[2]);
        assert!(cache.single(false, 17).is_empty());
    }

    #[test]
    fn test_hits_and_rebuilds() {
        let comps = registry(&[PercentData::at(0, 0)]);
        let mut cache = LayoutCache::new();
        cache.ensure(1, 1, &comps).unwrap();
        cache.ensure(1, 1, &comps).unwrap();
        assert_eq!(cache.rebuilds(), 1);
        assert_eq!(cache.hits(), 1);

        cache.invalidate();
        cache.ensure(1, 1, &comps).unwrap();
        assert_eq!(cache.rebuilds(), 2);

        cache.clear();
        assert_eq!(cache.rebuilds(), 0);
        assert!(!cache.is_valid());
    }

    #[test]
    fn test_column_out_of_grid() {
        let comps = registry(&[PercentDataBuilder::new().xy(1, 0).span_x(3).create().unwrap()]);
        let err = LayoutCache::new().ensure(3, 1, &comps).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));
    }

    #[test]
    fn test_row_out_of_grid() {
        let comps = registry(&[PercentData::at(0, 4)]);
        assert!(LayoutCache::new().ensure(1, 4, &comps).is_err());
    }

    #[test]
    fn test_target_out_of_grid() {
        let comps = registry(&[PercentDataBuilder::new()
            .xy(0, 0)
            .with_target_column(3)
            .create()
            .unwrap()]);
        assert!(LayoutCache::new().ensure(3, 1, &comps).is_err());
        assert!(LayoutCache::new().ensure(4, 1, &comps).is_ok());
    }

    #[test]
    fn test_start_index_overflow() {
        let mut b = PercentDataBuilder::new();
        let comps = registry(&[b.xy(usize::MAX, 0).span_x(2).create().unwrap()]);
        let err = LayoutCache::new().ensure(3, 1, &comps).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));

        let comps = registry(&[b.xy(0, usize::MAX).span_y(2).create().unwrap()]);
        let err = LayoutCache::new().ensure(1, 3, &comps).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));
    }

    #[test]
    fn test_empty_span() {
        let pd: PercentData =
            serde_json::from_str(r#"{"column":0,"row":0,"span_x":0,"span_y":1}"#).unwrap();
        let err = LayoutCache::new().ensure(2, 2, &registry(&[pd])).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidState(_)));
    }

    #[test]
    fn test_failed_validation_stays_invalid() {
        let comps = registry(&[PercentData::at(0, 4)]);
        let mut cache = LayoutCache::new();
        assert!(cache.ensure(1, 4, &comps).is_err());
        assert!(!cache.is_valid());
        assert!(cache.ensure(1, 4, &comps).is_err());
    }

    #[test]
    fn test_shared_start_cell() {
        let comps = registry(&[PercentData::at(1, 1), PercentData::at(1, 1)]);
        let err = LayoutCache::new().ensure(2, 2, &comps).unwrap_err();
        assert!(err.to_string().contains("(1, 1)"));
    }

    #[test]
    fn test_total_weight_is_cached() {
        let a: CellConstraints = "preferred/30".parse().unwrap();
        let b: CellConstraints = "preferred/20".parse().unwrap();
        let mut cache = LayoutCache::new();
        assert_eq!(cache.total_weight(false, &[a, b]), 50);
        // served from the cache until invalidated
        assert_eq!(cache.total_weight(false, &[a]), 50);
        assert_eq!(cache.total_weight(true, &[a]), 30);
        cache.invalidate_weights();
        assert_eq!(cache.total_weight(false, &[a]), 30);
    }
}
