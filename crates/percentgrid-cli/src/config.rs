//! Layout descriptions read from TOML or YAML files.

use crate::error::{CliError, CliResult};
use percentgrid_core::{
    ComponentId, ComponentSizes, FixedPlatform, FixedSizeHandler, Insets, NumberWithUnit, Size,
};
use percentgrid_layout::{
    BorderLayout, BorderRegion, ButtonAlignment, ButtonLayout, CellGroup, Layout,
    PercentDataBuilder, PercentLayout, DEFAULT_GAP, DEFAULT_MARGIN,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A complete layout description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LayoutDescription {
    /// Screen metrics used for unit conversion
    #[serde(default)]
    pub(crate) screen: ScreenConfig,
    /// Container the layout is performed in
    #[serde(default)]
    pub(crate) container: Option<ContainerConfig>,
    /// Whether cells may fall back to minimum sizes
    #[serde(default = "default_true")]
    pub(crate) can_shrink: bool,
    /// Kind of layout and its properties
    pub(crate) layout: LayoutKind,
    /// Managed components in registration order
    #[serde(default)]
    pub(crate) components: Vec<ComponentConfig>,
}

fn default_true() -> bool {
    true
}

/// Screen resolution and font size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScreenConfig {
    /// Dots per inch
    #[serde(default = "default_resolution")]
    pub(crate) resolution: u32,
    /// Reference font size for dialog units
    #[serde(default = "default_font_size")]
    pub(crate) font_size: f64,
}

fn default_resolution() -> u32 {
    FixedSizeHandler::default().resolution
}

fn default_font_size() -> f64 {
    FixedSizeHandler::default().font_size
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            font_size: default_font_size(),
        }
    }
}

/// Container size and insets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ContainerConfig {
    pub(crate) width: i32,
    pub(crate) height: i32,
    #[serde(default)]
    pub(crate) insets: Insets,
}

/// The layout manager to use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum LayoutKind {
    /// A free grid
    Percent {
        columns: String,
        rows: String,
        #[serde(default)]
        column_groups: Vec<String>,
        #[serde(default)]
        row_groups: Vec<String>,
    },
    /// Five border regions
    Border {
        #[serde(default)]
        margin: NumberWithUnit,
        #[serde(default)]
        gap: NumberWithUnit,
    },
    /// A row of buttons
    Button {
        #[serde(default = "default_button_margin")]
        margin: NumberWithUnit,
        #[serde(default = "default_button_gap")]
        gap: NumberWithUnit,
        #[serde(default)]
        alignment: ButtonAlignment,
    },
}

fn default_button_margin() -> NumberWithUnit {
    DEFAULT_MARGIN
}

fn default_button_gap() -> NumberWithUnit {
    DEFAULT_GAP
}

/// One managed component: its measurements and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ComponentConfig {
    pub(crate) name: String,
    pub(crate) width: i32,
    pub(crate) height: i32,
    /// Defaults to the preferred width
    #[serde(default)]
    pub(crate) min_width: Option<i32>,
    /// Defaults to the preferred height
    #[serde(default)]
    pub(crate) min_height: Option<i32>,
    /// Start column (percent layouts)
    #[serde(default)]
    pub(crate) column: Option<usize>,
    /// Start row (percent layouts)
    #[serde(default)]
    pub(crate) row: Option<usize>,
    #[serde(default = "default_span")]
    pub(crate) span_x: usize,
    #[serde(default = "default_span")]
    pub(crate) span_y: usize,
    /// Border region (border layouts)
    #[serde(default)]
    pub(crate) region: Option<String>,
}

fn default_span() -> usize {
    1
}

impl ComponentConfig {
    fn sizes(&self) -> ComponentSizes {
        ComponentSizes::new(
            Size::new(self.width, self.height),
            Size::new(
                self.min_width.unwrap_or(self.width),
                self.min_height.unwrap_or(self.height),
            ),
        )
    }
}

/// A layout ready to run, with a platform that knows every component.
pub(crate) struct Prepared {
    pub(crate) layout: Box<dyn Layout>,
    pub(crate) platform: FixedPlatform,
    /// Component names, indexed by component id
    pub(crate) names: Vec<String>,
}

impl Prepared {
    /// Name of a component.
    pub(crate) fn name(&self, id: ComponentId) -> &str {
        usize::try_from(id.0)
            .ok()
            .and_then(|i| self.names.get(i))
            .map_or("?", String::as_str)
    }
}

impl LayoutDescription {
    /// Read a description, choosing the format by file extension.
    pub(crate) fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Err(CliError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// Parse a TOML description.
    pub(crate) fn from_toml(content: &str) -> CliResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse a YAML description.
    pub(crate) fn from_yaml(content: &str) -> CliResult<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Build the layout and register every component.
    pub(crate) fn prepare(&self) -> CliResult<Prepared> {
        let handler = FixedSizeHandler::new(self.screen.resolution, self.screen.font_size);
        let mut platform = FixedPlatform::new(handler);
        let mut names = Vec::with_capacity(self.components.len());
        for (i, component) in self.components.iter().enumerate() {
            platform.insert(ComponentId::new(i as u64), component.sizes());
            names.push(component.name.clone());
        }

        let layout: Box<dyn Layout> = match &self.layout {
            LayoutKind::Percent {
                columns,
                rows,
                column_groups,
                row_groups,
            } => Box::new(self.percent(columns, rows, column_groups, row_groups)?),
            LayoutKind::Border { margin, gap } => Box::new(self.border(*margin, *gap)?),
            LayoutKind::Button {
                margin,
                gap,
                alignment,
            } => Box::new(self.button(*margin, *gap, *alignment)),
        };
        log::debug!("prepared layout with {} components", names.len());

        Ok(Prepared {
            layout,
            platform,
            names,
        })
    }

    fn percent(
        &self,
        columns: &str,
        rows: &str,
        column_groups: &[String],
        row_groups: &[String],
    ) -> CliResult<PercentLayout> {
        let mut layout = PercentLayout::from_specs(columns, rows)?;
        layout.set_can_shrink(self.can_shrink);
        for group in column_groups {
            layout.add_column_group(group.parse::<CellGroup>()?);
        }
        for group in row_groups {
            layout.add_row_group(group.parse::<CellGroup>()?);
        }

        let mut builder = PercentDataBuilder::new();
        for (i, component) in self.components.iter().enumerate() {
            let (Some(column), Some(row)) = (component.column, component.row) else {
                return Err(CliError::Config(format!(
                    "component {:?} needs a column and a row",
                    component.name
                )));
            };
            let data = builder
                .xy(column, row)
                .span(component.span_x, component.span_y)
                .create()?;
            layout.add_component(ComponentId::new(i as u64), data);
        }
        Ok(layout)
    }

    fn border(&self, margin: NumberWithUnit, gap: NumberWithUnit) -> CliResult<BorderLayout> {
        let mut layout = BorderLayout::new();
        layout.set_margins(margin);
        layout.set_gaps(gap);
        layout.set_can_shrink(self.can_shrink);
        for (i, component) in self.components.iter().enumerate() {
            let region = component.region.as_deref().unwrap_or(BorderRegion::Center.name());
            layout.add_component_named(ComponentId::new(i as u64), region)?;
        }
        Ok(layout)
    }

    fn button(
        &self,
        margin: NumberWithUnit,
        gap: NumberWithUnit,
        alignment: ButtonAlignment,
    ) -> ButtonLayout {
        let mut layout = ButtonLayout::new();
        layout.set_left_margin(margin);
        layout.set_right_margin(margin);
        layout.set_top_margin(margin);
        layout.set_bottom_margin(margin);
        layout.set_gap(gap);
        layout.set_alignment(alignment);
        layout.set_can_shrink(self.can_shrink);
        for i in 0..self.components.len() {
            layout.add_button(ComponentId::new(i as u64));
        }
        layout
    }
}
