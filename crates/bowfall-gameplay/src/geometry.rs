//! Axis-aligned rectangles and the overlap test every system shares.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box stored as top-left corner plus size.
///
/// Y grows downward, matching screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width (non-negative)
    pub width: f32,
    /// Height (non-negative)
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test. Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Returns a copy narrowed to `fraction` of its width, keeping the same center.
    #[must_use]
    pub fn narrowed(&self, fraction: f32) -> Self {
        let width = self.width * fraction;
        Self {
            x: self.x + (self.width - width) / 2.0,
            y: self.y,
            width,
            height: self.height,
        }
    }

    /// True when every component is finite and the size is non-negative.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Anything with a collision box.
pub trait Bounded {
    /// The collision box in world coordinates.
    fn bounds(&self) -> Rect;

    /// Whether this collision box overlaps another one.
    fn overlaps<B: Bounded + ?Sized>(&self, other: &B) -> bool {
        self.bounds().intersects(&other.bounds())
    }
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
