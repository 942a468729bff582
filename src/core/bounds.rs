use serde::{Deserialize, Serialize};

use crate::core::Viewport;

/// Axis-aligned bounds accumulated point by point.
///
/// Membership tests are half-open (`[min, max)`), matching how pixel rows and
/// columns are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for Bounds2 {
    fn default() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }
}

impl Bounds2 {
    #[must_use]
    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Inverted accumulator: the first `update` replaces every side.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY)
    }

    /// Tight bounds over `points`; `None` when the iterator is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut bounds = Self::empty();
        let mut seen = false;
        for (x, y) in points {
            bounds.update(x, y);
            seen = true;
        }
        seen.then_some(bounds)
    }

    pub fn update(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// Clamps every side into the given limits.
    pub fn crop(&mut self, min_x: f64, max_x: f64, min_y: f64, max_y: f64) {
        self.min_x = self.min_x.max(min_x);
        self.min_y = self.min_y.max(min_y);
        self.max_x = self.max_x.min(max_x);
        self.max_y = self.max_y.min(max_y);
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }

    #[must_use]
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.min_x && x < self.max_x
    }

    #[must_use]
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.min_y && y < self.max_y
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let (w, h) = (self.width(), self.height());
        !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0)
    }

    /// Widens a flat (or inverted) axis symmetrically by `pad` so later
    /// divisions by the extent are always defined.
    #[must_use]
    pub fn ensure_extent(mut self, pad: f64) -> Self {
        if !(self.width() > 0.0) {
            let mid = if self.min_x.is_finite() { self.min_x } else { 0.0 };
            self.min_x = mid - pad;
            self.max_x = mid + pad;
        }
        if !(self.height() > 0.0) {
            let mid = if self.min_y.is_finite() { self.min_y } else { 0.0 };
            self.min_y = mid - pad;
            self.max_y = mid + pad;
        }
        self
    }
}

/// Integer pixel rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self::new(
            0,
            0,
            i32::try_from(viewport.width).unwrap_or(i32::MAX),
            i32::try_from(viewport.height).unwrap_or(i32::MAX),
        )
    }

    #[must_use]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    #[must_use]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Exclusive membership: points on any edge are rejected.
    #[must_use]
    pub fn contains_strict(&self, x: i32, y: i32) -> bool {
        x > self.x && x < self.right() && y > self.y && y < self.bottom()
    }

    #[must_use]
    pub fn clamp_to(&self, viewport: Viewport) -> Self {
        let limit = Self::from_viewport(viewport);
        let x0 = self.x.clamp(0, limit.width);
        let y0 = self.y.clamp(0, limit.height);
        let x1 = self.right().clamp(0, limit.width);
        let y1 = self.bottom().clamp(0, limit.height);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}
