//! Value types shared by the transform, layout and render stages
//!
//! Pixel geometry uses `f32` (logical pixels, origin top-left, y down).
//! Data geometry uses `f64`.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use serde::{Deserialize, Serialize};

use crate::{PlotError, PlotResult};

/// A position in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Nearest integer pixel
    pub fn to_point(self) -> Point {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

/// A position in data space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned rectangle in pixel space
///
/// `left`/`top` are inclusive and `right`/`bottom` exclusive when testing
/// whether a pixel lies inside, so rectangles that share an edge never both
/// claim the same pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PixelRect {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rectangle anchored at the origin
    pub const fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, width, 0.0, height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    /// True when either dimension is zero or negative
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn contains(&self, pixel: PixelPoint) -> bool {
        pixel.x >= self.left && pixel.x < self.right && pixel.y >= self.top && pixel.y < self.bottom
    }

    /// Shrink by padding on each side, never producing a negative size
    pub fn contract(&self, padding: PixelPadding) -> Self {
        let left = (self.left + padding.left).min(self.right);
        let top = (self.top + padding.top).min(self.bottom);
        Self {
            left,
            right: (self.right - padding.right).max(left),
            top,
            bottom: (self.bottom - padding.bottom).max(top),
        }
    }

    /// Integer rectangle covering the same pixels
    pub fn to_rectangle(&self) -> Rectangle {
        let left = self.left.round() as i32;
        let top = self.top.round() as i32;
        let right = (self.right.round() as i32).max(left);
        let bottom = (self.bottom.round() as i32).max(top);

        Rectangle::new(
            Point::new(left, top),
            Size::new((right - left) as u32, (bottom - top) as u32),
        )
    }
}

impl From<Rectangle> for PixelRect {
    fn from(rect: Rectangle) -> Self {
        Self::new(
            rect.top_left.x as f32,
            (rect.top_left.x + rect.size.width as i32) as f32,
            rect.top_left.y as f32,
            (rect.top_left.y + rect.size.height as i32) as f32,
        )
    }
}

/// Padding on the four sides of a rectangle, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPadding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl PixelPadding {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Equal padding on all sides
    pub const fn uniform(padding: f32) -> Self {
        Self::new(padding, padding, padding, padding)
    }
}

/// Axis-aligned rectangle in data space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateRect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl CoordinateRect {
    pub const fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Build from independent horizontal and vertical limits
    pub fn from_limits(x: AxisLimits, y: AxisLimits) -> Self {
        Self::new(x.min(), x.max(), y.min(), y.max())
    }

    /// Smallest rectangle containing every point, `None` for an empty set
    pub fn bounding(points: impl IntoIterator<Item = Coordinates>) -> Option<Self> {
        points
            .into_iter()
            .filter(Coordinates::is_finite)
            .fold(None, |rect: Option<Self>, p| {
                Some(match rect {
                    None => Self::new(p.x, p.x, p.y, p.y),
                    Some(r) => Self::new(
                        r.left.min(p.x),
                        r.right.max(p.x),
                        r.bottom.min(p.y),
                        r.top.max(p.y),
                    ),
                })
            })
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn contains(&self, point: Coordinates) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    /// Horizontal extent as axis limits
    pub fn x_limits(&self) -> PlotResult<AxisLimits> {
        AxisLimits::new(self.left, self.right)
    }

    /// Vertical extent as axis limits
    pub fn y_limits(&self) -> PlotResult<AxisLimits> {
        AxisLimits::new(self.bottom, self.top)
    }
}

/// Visible data range of one axis
///
/// Invariant: both ends and the span are finite and `min <= max`. Zero-width
/// limits are allowed; transforms treat them specially. Deserialization goes
/// through the same validation as [`AxisLimits::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLimits")]
pub struct AxisLimits {
    min: f64,
    max: f64,
}

/// Unvalidated wire form of [`AxisLimits`]
#[derive(Deserialize)]
struct RawLimits {
    min: f64,
    max: f64,
}

impl TryFrom<RawLimits> for AxisLimits {
    type Error = PlotError;

    fn try_from(raw: RawLimits) -> PlotResult<Self> {
        Self::new(raw.min, raw.max)
    }
}

impl AxisLimits {
    /// Validated limits
    pub fn new(min: f64, max: f64) -> PlotResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(PlotError::invalid_argument(format!(
                "axis limits must be finite (got {min}..{max})"
            )));
        }
        if min > max {
            return Err(PlotError::invalid_argument(format!(
                "axis limits must satisfy min <= max (got {min}..{max})"
            )));
        }
        if !(max - min).is_finite() {
            return Err(PlotError::invalid_argument(format!(
                "axis limits span overflows (got {min}..{max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// Limits whose validity is known at compile time
    pub(crate) const fn new_unchecked(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn center(&self) -> f64 {
        self.min + self.span() / 2.0
    }

    pub fn is_zero_width(&self) -> bool {
        self.span() == 0.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Smallest limits containing both
    ///
    /// Fails when the combined span is too large to represent.
    pub fn union(&self, other: &AxisLimits) -> PlotResult<Self> {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Pad both ends by `fraction` of the span, widening zero-width limits first
    ///
    /// Fails when the padded range no longer fits in an `f64`.
    pub fn with_margin(&self, fraction: f64, min_span: f64) -> PlotResult<Self> {
        let span = self.span().max(min_span);
        let center = self.center();
        let half = span * (0.5 + fraction.max(0.0));
        Self::new(center - half, center + half)
    }

    /// Shift both ends by `delta`
    pub fn pan(&self, delta: f64) -> PlotResult<Self> {
        Self::new(self.min + delta, self.max + delta)
    }

    /// Scale the span by `1 / fraction` keeping `about` fixed
    ///
    /// `fraction > 1` zooms in, `fraction < 1` zooms out.
    pub fn zoom(&self, fraction: f64, about: f64) -> PlotResult<Self> {
        if !fraction.is_finite() || fraction <= 0.0 {
            return Err(PlotError::invalid_argument(format!(
                "zoom fraction must be positive and finite (got {fraction})"
            )));
        }
        Self::new(
            about - (about - self.min) / fraction,
            about + (self.max - about) / fraction,
        )
    }
}
