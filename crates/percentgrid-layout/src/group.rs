//! Groups of cells that share one size.

use percentgrid_core::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separators accepted between the indices of a group string.
const SEPARATORS: [char; 4] = [' ', ',', ';', '/'];

/// A set of at least two column or row indices forced to the same size.
///
/// Indices are kept sorted, so equality does not depend on the order in
/// which they were given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct CellGroup {
    indices: Vec<usize>,
}

impl CellGroup {
    /// Create a group from the given indices.
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Result<Self> {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        if indices.len() < 2 {
            return Err(LayoutError::invalid_argument(
                "a cell group must contain at least 2 indices",
            ));
        }
        if let Some(pair) = indices.windows(2).find(|w| w[0] == w[1]) {
            return Err(LayoutError::invalid_argument(format!(
                "duplicate index {} in cell group",
                pair[0]
            )));
        }
        Ok(Self { indices })
    }

    /// The sorted member indices.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false; a group has at least two members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Largest member index.
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.indices.last().copied().unwrap_or_default()
    }

    /// Set every member of `sizes` to the largest size among the members.
    ///
    /// Fails without touching `sizes` if an index lies outside of it.
    pub fn apply(&self, sizes: &mut [i32]) -> Result<()> {
        let max_index = self.max_index();
        if max_index >= sizes.len() {
            return Err(LayoutError::OutOfBounds {
                index: max_index,
                len: sizes.len(),
            });
        }

        let max = self.indices.iter().map(|&i| sizes[i]).max().unwrap_or_default();
        for &i in &self.indices {
            sizes[i] = max;
        }
        Ok(())
    }
}

impl fmt::Display for CellGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.indices.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for CellGroup {
    type Err = LayoutError;

    /// Parse indices separated by space, `,`, `;` or `/`.
    fn from_str(s: &str) -> Result<Self> {
        let indices = s
            .split(SEPARATORS)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<usize>()
                    .map_err(|_| LayoutError::parse(s, format!("invalid cell index {t:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(indices)
    }
}

impl TryFrom<Vec<usize>> for CellGroup {
    type Error = LayoutError;

    fn try_from(indices: Vec<usize>) -> Result<Self> {
        Self::new(indices)
    }
}

impl From<CellGroup> for Vec<usize> {
    fn from(group: CellGroup) -> Self {
        group.indices
    }
}
