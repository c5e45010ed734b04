//! Results printed by the CLI, as text or JSON.

use crate::config::Prepared;
use percentgrid_core::{Rect, Size};
use percentgrid_layout::CellLayout;
use serde::Serialize;
use std::fmt;

/// Preferred and minimum container size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SizeReport {
    pub(crate) preferred: Size,
    pub(crate) minimum: Size,
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "preferred: {}x{}",
            self.preferred.width, self.preferred.height
        )?;
        write!(f, "minimum:   {}x{}", self.minimum.width, self.minimum.height)
    }
}

/// Bounds of one named component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ComponentBounds {
    pub(crate) name: String,
    #[serde(flatten)]
    pub(crate) bounds: Rect,
}

/// Outcome of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LayoutReport {
    pub(crate) container: Size,
    pub(crate) column_sizes: Vec<i32>,
    pub(crate) row_sizes: Vec<i32>,
    pub(crate) components: Vec<ComponentBounds>,
}

impl LayoutReport {
    pub(crate) fn new(prepared: &Prepared, container: Size, layout: CellLayout) -> Self {
        let components = layout
            .bounds
            .into_iter()
            .map(|(id, bounds)| ComponentBounds {
                name: prepared.name(id).to_string(),
                bounds,
            })
            .collect();
        Self {
            container,
            column_sizes: layout.column_sizes,
            row_sizes: layout.row_sizes,
            components,
        }
    }
}

fn join(values: &[i32]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "container: {}x{}",
            self.container.width, self.container.height
        )?;
        writeln!(f, "columns:   {}", join(&self.column_sizes))?;
        write!(f, "rows:      {}", join(&self.row_sizes))?;

        let width = self
            .components
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(0);
        for c in &self.components {
            let b = c.bounds;
            write!(
                f,
                "\n{:<width$}  x={} y={} w={} h={}",
                c.name, b.x, b.y, b.width, b.height
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LayoutReport {
        LayoutReport {
            container: Size::new(300, 40),
            column_sizes: vec![80, 9, 211],
            row_sizes: vec![24],
            components: vec![
                ComponentBounds {
                    name: "label".into(),
                    bounds: Rect::new(0, 2, 80, 20),
                },
                ComponentBounds {
                    name: "ok".into(),
                    bounds: Rect::new(89, 0, 211, 24),
                },
            ],
        }
    }

    #[test]
    fn test_size_report_text() {
        let report = SizeReport {
            preferred: Size::new(209, 24),
            minimum: Size::new(149, 24),
        };
        assert_eq!(report.to_string(), "preferred: 209x24\nminimum:   149x24");
    }

    #[test]
    fn test_layout_report_text() {
        let text = sample().to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "container: 300x40");
        assert_eq!(lines[1], "columns:   80 9 211");
        assert_eq!(lines[2], "rows:      24");
        assert_eq!(lines[3], "label  x=0 y=2 w=80 h=20");
        assert_eq!(lines[4], "ok     x=89 y=0 w=211 h=24");
    }

    #[test]
    fn test_layout_report_json() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["column_sizes"], serde_json::json!([80, 9, 211]));
        assert_eq!(json["components"][1]["name"], "ok");
        assert_eq!(json["components"][1]["x"], 89);
        assert_eq!(json["components"][1]["width"], 211);
    }

    #[test]
    fn test_empty_layout_report() {
        let report = LayoutReport {
            container: Size::new(0, 0),
            column_sizes: vec![],
            row_sizes: vec![],
            components: vec![],
        };
        assert_eq!(report.to_string(), "container: 0x0\ncolumns:   \nrows:      ");
    }
}
