//! Common interface of all layout managers.

use crate::engine::{CellGrid, CellLayout};
use percentgrid_core::{Insets, PlatformAdapter, Result, Size};

/// A layout manager backed by a [`CellGrid`].
///
/// Specialized layouts generate their grid from a few declarative
/// properties and rebuild it lazily after a property changes, so access to
/// the grid can fail if the properties describe an invalid configuration.
pub trait Layout {
    /// The grid that performs the actual computation.
    fn cell_grid(&mut self) -> Result<&mut CellGrid>;

    /// Size needed to show every component at its preferred size.
    fn preferred_layout_size(&mut self, adapter: &dyn PlatformAdapter) -> Result<Size> {
        self.cell_grid()?.preferred_layout_size(adapter)
    }

    /// Smallest sensible size of the container.
    fn minimum_layout_size(&mut self, adapter: &dyn PlatformAdapter) -> Result<Size> {
        self.cell_grid()?.minimum_layout_size(adapter)
    }

    /// Compute cell sizes for a container and assign component bounds.
    fn perform_layout(
        &mut self,
        adapter: &mut dyn PlatformAdapter,
        insets: Insets,
        size: Size,
    ) -> Result<CellLayout> {
        self.cell_grid()?.perform_layout(adapter, insets, size)
    }
}
