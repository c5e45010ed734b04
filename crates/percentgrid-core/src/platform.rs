//! Collaborator traits between the layout engine and a UI toolkit.
//!
//! The engine never owns widgets. It refers to them through [`ComponentId`]
//! handles and asks a [`PlatformAdapter`] to measure and position them.

use crate::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque handle of a component managed by a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// Create a new component ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Supplies the metrics needed to convert units to pixels.
///
/// A handler is bound to the container being laid out, so font-relative
/// units use that container's font.
pub trait UnitSizeHandler {
    /// Screen resolution in dots per inch.
    fn screen_resolution(&self) -> u32;

    /// Reference font size along one axis.
    fn font_size(&self, vertical: bool) -> f64;
}

/// Measures and positions components on behalf of the layout engine.
pub trait PlatformAdapter {
    /// Preferred extent of a component along one axis.
    fn preferred_size(&self, id: ComponentId, vertical: bool) -> i32;

    /// Minimum extent of a component along one axis.
    fn minimum_size(&self, id: ComponentId, vertical: bool) -> i32;

    /// Assign the final bounds of a component.
    fn set_bounds(&mut self, id: ComponentId, bounds: Rect);

    /// Unit conversion metrics of the current container.
    fn size_handler(&self) -> &dyn UnitSizeHandler;
}

/// A [`UnitSizeHandler`] with constant metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedSizeHandler {
    /// Screen resolution (DPI)
    pub resolution: u32,
    /// Font size used for both axes
    pub font_size: f64,
}

impl FixedSizeHandler {
    /// Create a handler with the given resolution and font size.
    #[must_use]
    pub const fn new(resolution: u32, font_size: f64) -> Self {
        Self {
            resolution,
            font_size,
        }
    }
}

impl Default for FixedSizeHandler {
    fn default() -> Self {
        Self::new(96, 12.0)
    }
}

impl UnitSizeHandler for FixedSizeHandler {
    fn screen_resolution(&self) -> u32 {
        self.resolution
    }

    fn font_size(&self, _vertical: bool) -> f64 {
        self.font_size
    }
}

/// Preferred and minimum size of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComponentSizes {
    /// Preferred size
    pub preferred: Size,
    /// Minimum size
    pub minimum: Size,
}

impl ComponentSizes {
    /// Create from preferred and minimum size.
    #[must_use]
    pub const fn new(preferred: Size, minimum: Size) -> Self {
        Self { preferred, minimum }
    }

    /// A component whose minimum equals its preferred size.
    #[must_use]
    pub const fn fixed(size: Size) -> Self {
        Self::new(size, size)
    }
}

/// Headless adapter backed by a table of component sizes.
///
/// Records the bounds assigned by the last layout pass, which makes it
/// useful for tests and for computing layouts outside of a toolkit.
#[derive(Debug, Clone, Default)]
pub struct FixedPlatform {
    handler: FixedSizeHandler,
    sizes: HashMap<ComponentId, ComponentSizes>,
    bounds: HashMap<ComponentId, Rect>,
}

impl FixedPlatform {
    /// Create an empty platform using the given metrics.
    #[must_use]
    pub fn new(handler: FixedSizeHandler) -> Self {
        Self {
            handler,
            ..Self::default()
        }
    }

    /// Register (or replace) the sizes of a component.
    pub fn insert(&mut self, id: ComponentId, sizes: ComponentSizes) {
        self.sizes.insert(id, sizes);
    }

    /// Builder-style variant of [`FixedPlatform::insert`].
    #[must_use]
    pub fn with_component(mut self, id: ComponentId, sizes: ComponentSizes) -> Self {
        self.insert(id, sizes);
        self
    }

    /// Sizes registered for a component.
    #[must_use]
    pub fn sizes(&self, id: ComponentId) -> Option<ComponentSizes> {
        self.sizes.get(&id).copied()
    }

    /// Bounds assigned to a component by the last layout pass.
    #[must_use]
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.bounds.get(&id).copied()
    }

    /// All assigned bounds, ordered by component.
    #[must_use]
    pub fn all_bounds(&self) -> Vec<(ComponentId, Rect)> {
        let mut all: Vec<_> = self.bounds.iter().map(|(id, r)| (*id, *r)).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    /// Forget all assigned bounds.
    pub fn clear_bounds(&mut self) {
        self.bounds.clear();
    }

    fn lookup(&self, id: ComponentId) -> ComponentSizes {
        self.sizes.get(&id).copied().unwrap_or_else(|| {
            log::warn!(target: "percentgrid::platform", "no sizes registered for component {id}");
            ComponentSizes::default()
        })
    }
}

impl PlatformAdapter for FixedPlatform {
    fn preferred_size(&self, id: ComponentId, vertical: bool) -> i32 {
        self.lookup(id).preferred.along(vertical)
    }

    fn minimum_size(&self, id: ComponentId, vertical: bool) -> i32 {
        self.lookup(id).minimum.along(vertical)
    }

    fn set_bounds(&mut self, id: ComponentId, bounds: Rect) {
        log::trace!(target: "percentgrid::platform", "bounds of {id}: {bounds:?}");
        self.bounds.insert(id, bounds);
    }

    fn size_handler(&self) -> &dyn UnitSizeHandler {
        &self.handler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id_display() {
        assert_eq!(ComponentId::new(7).to_string(), "#7");
    }

    #[test]
    fn test_fixed_handler() {
        let h = FixedSizeHandler::new(72, 10.0);
        assert_eq!(h.screen_resolution(), 72);
        assert_eq!(h.font_size(true), 10.0);
        assert_eq!(h.font_size(false), 10.0);
    }

    #[test]
    fn test_fixed_platform_measures() {
        let id = ComponentId::new(1);
        let platform = FixedPlatform::default().with_component(
            id,
            ComponentSizes::new(Size::new(80, 20), Size::new(40, 10)),
        );
        assert_eq!(platform.preferred_size(id, false), 80);
        assert_eq!(platform.preferred_size(id, true), 20);
        assert_eq!(platform.minimum_size(id, false), 40);
        assert_eq!(platform.minimum_size(id, true), 10);
    }

    #[test]
    fn test_fixed_platform_unknown_component() {
        let platform = FixedPlatform::default();
        assert_eq!(platform.preferred_size(ComponentId::new(9), false), 0);
        assert_eq!(platform.sizes(ComponentId::new(9)), None);
    }

    #[test]
    fn test_fixed_platform_records_bounds() {
        let mut platform = FixedPlatform::default();
        let a = ComponentId::new(2);
        let b = ComponentId::new(1);
        platform.set_bounds(a, Rect::new(1, 2, 3, 4));
        platform.set_bounds(b, Rect::new(0, 0, 1, 1));
        assert_eq!(platform.bounds(a), Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(platform.all_bounds()[0].0, b);

        platform.clear_bounds();
        assert!(platform.all_bounds().is_empty());
    }
}
