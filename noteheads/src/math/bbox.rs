//! Axis-aligned bounding box in absolute sheet coordinates.

use glam::{DVec2, IVec2};

/// Axis-aligned bounding box with signed pixel coordinates.
///
/// Uses inclusive bounds: a pixel at (x, y) is inside if
/// `x_min <= x <= x_max` and `y_min <= y <= y_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Aabb {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Aabb {
    #[inline]
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Box covering `width x height` pixels starting at `origin`.
    #[inline]
    pub fn from_origin_size(origin: IVec2, width: usize, height: usize) -> Self {
        Self {
            x_min: origin.x,
            x_max: origin.x + width as i32 - 1,
            y_min: origin.y,
            y_max: origin.y + height as i32 - 1,
        }
    }

    /// Box of the given size whose center is `center`, rounded to pixels.
    pub fn centered_at(center: DVec2, width: usize, height: usize) -> Self {
        let origin = IVec2::new(
            (center.x - width as f64 / 2.0).round() as i32,
            (center.y - height as f64 / 2.0).round() as i32,
        );
        Self::from_origin_size(origin, width, height)
    }

    /// Empty box with inverted bounds, ready for accumulation.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            x_min: i32::MAX,
            x_max: i32::MIN,
            y_min: i32::MAX,
            y_max: i32::MIN,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x_min > self.x_max || self.y_min > self.y_max
    }

    #[inline]
    pub fn include(&mut self, x: i32, y: i32) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }

    /// Expand to include a horizontal span `[x_start, x_end)` on row `y`.
    #[inline]
    pub fn include_span(&mut self, y: i32, x_start: i32, x_end: i32) {
        debug_assert!(x_start < x_end);
        self.include(x_start, y);
        self.include(x_end - 1, y);
    }

    #[inline]
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }

    #[inline]
    pub fn translate(&self, offset: IVec2) -> Aabb {
        Aabb {
            x_min: self.x_min + offset.x,
            x_max: self.x_max + offset.x,
            y_min: self.y_min + offset.y,
            y_max: self.y_max + offset.y,
        }
    }

    #[inline]
    pub const fn origin(&self) -> IVec2 {
        IVec2::new(self.x_min, self.y_min)
    }

    /// Number of columns, zero when empty.
    #[inline]
    pub fn width(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.x_max - self.x_min + 1) as usize
    }

    /// Number of rows, zero when empty.
    #[inline]
    pub fn height(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.y_max - self.y_min + 1) as usize
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    #[inline]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    #[inline]
    pub const fn contains_box(&self, other: &Aabb) -> bool {
        other.x_min >= self.x_min
            && other.x_max <= self.x_max
            && other.y_min >= self.y_min
            && other.y_max <= self.y_max
    }
}
