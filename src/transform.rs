//! Coordinate transformation between data space and pixel space
//!
//! One [`AxisTransform`] maps a single dimension: an [`AxisLimits`] range onto
//! a pixel span. Vertical transforms run from the bottom of the data rectangle
//! to its top, so data increasing upward maps to pixels decreasing downward.

use crate::primitives::{AxisLimits, PixelRect};

/// Linear map between one axis's data range and a pixel span
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    limits: AxisLimits,
    pixel_start: f32,
    pixel_end: f32,
    scale_factor: f32,
}

impl AxisTransform {
    /// Map `limits.min()` to `pixel_start` and `limits.max()` to `pixel_end`
    pub fn new(limits: AxisLimits, pixel_start: f32, pixel_end: f32) -> Self {
        Self {
            limits,
            pixel_start,
            pixel_end,
            scale_factor: 1.0,
        }
    }

    /// Left-to-right transform across a data rectangle
    pub fn horizontal(limits: AxisLimits, data_rect: PixelRect) -> Self {
        Self::new(limits, data_rect.left, data_rect.right)
    }

    /// Bottom-to-top transform across a data rectangle
    pub fn vertical(limits: AxisLimits, data_rect: PixelRect) -> Self {
        Self::new(limits, data_rect.bottom, data_rect.top)
    }

    /// Multiply pixel outputs (and divide pixel inputs) by a high-DPI factor
    ///
    /// Replaces any previous factor rather than compounding it.
    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Signed pixel length of the span, before scaling
    pub fn pixel_span(&self) -> f32 {
        self.pixel_end - self.pixel_start
    }

    /// Pixels per data unit, `None` when the limits have zero width
    pub fn pixels_per_unit(&self) -> Option<f64> {
        if self.limits.is_zero_width() {
            return None;
        }
        Some(self.pixel_span().abs() as f64 * self.scale_factor as f64 / self.limits.span())
    }

    /// Data coordinate to pixel
    ///
    /// Zero-width limits map every coordinate to the midpoint of the span.
    pub fn to_pixel(&self, coordinate: f64) -> f32 {
        let start = self.pixel_start as f64;
        let end = self.pixel_end as f64;

        let pixel = if self.limits.is_zero_width() {
            (start + end) / 2.0
        } else {
            start + (coordinate - self.limits.min()) / self.limits.span() * (end - start)
        };

        (pixel * self.scale_factor as f64) as f32
    }

    /// Pixel to data coordinate, NaN when the mapping cannot be inverted
    pub fn to_coordinate(&self, pixel: f32) -> f64 {
        let span = self.pixel_span() as f64;
        if self.limits.is_zero_width() || span == 0.0 || self.scale_factor == 0.0 {
            return f64::NAN;
        }

        let unscaled = pixel as f64 / self.scale_factor as f64;
        self.limits.min() + (unscaled - self.pixel_start as f64) / span * self.limits.span()
    }

    /// Data distance to pixel distance (no offset, sign preserved)
    ///
    /// Zero-width limits collapse every distance to 0, consistent with
    /// [`to_pixel`](Self::to_pixel) mapping everything onto one pixel.
    pub fn distance_to_pixels(&self, delta: f64) -> f32 {
        match self.pixels_per_unit() {
            Some(ppu) => (delta * ppu) as f32,
            None => 0.0,
        }
    }

    /// Pixel distance to data distance, NaN when the mapping cannot be inverted
    pub fn distance_to_coordinates(&self, delta: f32) -> f64 {
        match self.pixels_per_unit() {
            Some(ppu) if ppu > 0.0 => delta as f64 / ppu,
            _ => f64::NAN,
        }
    }
}
