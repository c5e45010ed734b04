#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
//! Percent layout managers.
//!
//! A percent layout divides its container into a grid of columns and rows.
//! Every column and row carries [`CellConstraints`]: an alignment, a size
//! policy, a minimum size and a weight that claims a share of any space
//! left over. Components are registered with [`PercentData`] naming the
//! cell they start in and how many cells they span.
//!
//! - [`PercentLayout`]: any number of cells, configured directly
//! - [`BorderLayout`]: north, south, west, east and center regions
//! - [`ButtonLayout`]: a row of equally wide buttons
//!
//! All three implement [`Layout`] and share the solver in [`CellGrid`].
//! Measuring and moving components is delegated to a
//! [`PlatformAdapter`](percentgrid_core::PlatformAdapter).

mod border;
mod button;
mod cache;
mod constraints;
mod data;
mod engine;
mod group;
mod layout;
mod percent;

pub use border::{BorderLayout, BorderRegion};
pub use button::{ButtonAlignment, ButtonLayout, DEFAULT_GAP, DEFAULT_MARGIN};
pub use cache::LayoutCache;
pub use constraints::{CellAlignment, CellConstraints, CellConstraintsBuilder, CellSize, MAX_WEIGHT};
pub use data::{PercentData, PercentDataBuilder};
pub use engine::{calc_cell_positions, distribute_weights, CellGrid, CellLayout};
pub use group::CellGroup;
pub use layout::Layout;
pub use percent::PercentLayout;
