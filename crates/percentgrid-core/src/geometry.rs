//! Integer geometry: Size, Rect, Insets.
//!
//! Layout computations work in whole device pixels.

use serde::{Deserialize, Serialize};

/// A 2D size with width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Size {
    /// Zero size
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The extent along one axis.
    #[must_use]
    pub const fn along(&self, vertical: bool) -> i32 {
        if vertical {
            self.height
        } else {
            self.width
        }
    }

    /// Check if this size can contain another size.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X position of top-left corner
    pub x: i32,
    /// Y position of top-left corner
    pub y: i32,
    /// Width
    pub width: i32,
    /// Height
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create from size at origin.
    #[must_use]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Get the size.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if this rectangle fully contains another.
    #[must_use]
    pub const fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Space reserved on each side of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Insets {
    /// Left inset
    pub left: i32,
    /// Top inset
    pub top: i32,
    /// Right inset
    pub right: i32,
    /// Bottom inset
    pub bottom: i32,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create insets from the four sides.
    #[must_use]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on every side.
    #[must_use]
    pub const fn uniform(amount: i32) -> Self {
        Self::new(amount, amount, amount, amount)
    }

    /// Sum of left and right.
    #[must_use]
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[must_use]
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Space left for content inside a container of the given size.
    #[must_use]
    pub const fn shrink(&self, size: Size) -> Size {
        Size::new(size.width - self.horizontal(), size.height - self.vertical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_along() {
        let s = Size::new(30, 40);
        assert_eq!(s.along(false), 30);
        assert_eq!(s.along(true), 40);
    }

    #[test]
    fn test_size_contains() {
        assert!(Size::new(10, 10).contains(&Size::new(5, 10)));
        assert!(!Size::new(10, 10).contains(&Size::new(11, 1)));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(5, 10, 20, 30);
        assert_eq!(r.right(), 25);
        assert_eq!(r.bottom(), 40);
        assert_eq!(r.size(), Size::new(20, 30));
    }

    #[test]
    fn test_rect_contains_rect() {
        let outer = Rect::from_size(Size::new(100, 100));
        assert!(outer.contains_rect(&Rect::new(10, 10, 90, 90)));
        assert!(!outer.contains_rect(&Rect::new(10, 10, 91, 90)));
    }

    #[test]
    fn test_insets_shrink() {
        let insets = Insets::new(1, 2, 3, 4);
        assert_eq!(insets.horizontal(), 4);
        assert_eq!(insets.vertical(), 6);
        assert_eq!(insets.shrink(Size::new(100, 50)), Size::new(96, 44));
        assert_eq!(Insets::uniform(2).shrink(Size::new(10, 10)), Size::new(6, 6));
    }

    #[test]
    fn test_geometry_serde() {
        let r = Rect::new(1, 2, 3, 4);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
