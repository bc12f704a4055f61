//! Colours, fonts and line patterns
//!
//! Colours are stored as [`Color`] so styles can live in a serializable
//! [`PlotConfig`](crate::config::PlotConfig); they convert to the
//! embedded-graphics `Rgb888` used by every draw call.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Colors
// ============================================================================

/// 24-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a colour from a `0xRRGGBB` literal
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Convert to the embedded-graphics colour type
    pub const fn rgb888(self) -> Rgb888 {
        Rgb888::new(self.r, self.g, self.b)
    }
}

impl From<Rgb888> for Color {
    fn from(color: Rgb888) -> Self {
        Self::new(color.r(), color.g(), color.b())
    }
}

impl From<Color> for Rgb888 {
    fn from(color: Color) -> Self {
        color.rgb888()
    }
}

pub const WHITE: Color = Color::from_hex(0xffffff);
pub const BLACK: Color = Color::from_hex(0x000000);
pub const LIGHT_GRAY: Color = Color::from_hex(0xc8c8c8);
pub const MID_GRAY: Color = Color::from_hex(0x808080);
pub const DARK_GRAY: Color = Color::from_hex(0x404040);
pub const GRID_GRAY: Color = Color::from_hex(0xe6e6e6);
pub const SERIES_BLUE: Color = Color::from_hex(0x1f77b4);

/// Linearly blend two colours, `t` clamped to `0.0..=1.0`
pub fn lerp_color(start: Rgb888, end: Rgb888, t: f32) -> Rgb888 {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

    Rgb888::new(
        channel(start.r(), end.r()),
        channel(start.g(), end.g()),
        channel(start.b(), end.b()),
    )
}

/// Sample a piecewise-linear gradient through evenly spaced colour stops
pub fn gradient_color(stops: &[Rgb888], t: f32) -> Rgb888 {
    match stops {
        [] => BLACK.rgb888(),
        [only] => *only,
        _ => {
            let t = t.clamp(0.0, 1.0);
            let scaled = t * (stops.len() - 1) as f32;
            let index = (scaled.floor() as usize).min(stops.len() - 2);
            lerp_color(stops[index], stops[index + 1], scaled - index as f32)
        }
    }
}

// ============================================================================
// Fonts
// ============================================================================

/// Font size presets backed by embedded-graphics mono fonts
///
/// - `Small`: 5x8 font
/// - `Medium`: 6x10 font (default)
/// - `Large`: 10x20 font
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn font(&self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &ascii::FONT_5X8,
            FontSize::Medium => &ascii::FONT_6X10,
            FontSize::Large => &ascii::FONT_10X20,
        }
    }

    /// Text style drawing this font in the given colour
    pub fn text_style(&self, color: Color) -> MonoTextStyle<'static, Rgb888> {
        MonoTextStyle::new(self.font(), color.rgb888())
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Dash pattern for grid and frame lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinePattern {
    /// Solid continuous line
    #[default]
    Solid,
    /// Dashed line with specified dash and gap lengths
    Dashed {
        /// Length of each dash in pixels
        dash_length: u32,
        /// Length of gap between dashes in pixels
        gap_length: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_through_rgb888() {
        let color = Color::from_hex(0x12ab34);
        assert_eq!(color, Color::new(0x12, 0xab, 0x34));
        assert_eq!(Color::from(color.rgb888()), color);
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Rgb888::new(0, 0, 0);
        let b = Rgb888::new(200, 100, 50);
        assert_eq!(lerp_color(a, b, 0.0), a);
        assert_eq!(lerp_color(a, b, 1.0), b);
        assert_eq!(lerp_color(a, b, 0.5), Rgb888::new(100, 50, 25));
        assert_eq!(lerp_color(a, b, 7.0), b);
    }

    #[test]
    fn gradient_walks_through_stops() {
        let stops = [Rgb888::RED, Rgb888::GREEN, Rgb888::BLUE];
        assert_eq!(gradient_color(&stops, 0.0), Rgb888::RED);
        assert_eq!(gradient_color(&stops, 0.5), Rgb888::GREEN);
        assert_eq!(gradient_color(&stops, 1.0), Rgb888::BLUE);
        assert_eq!(gradient_color(&[], 0.3), Rgb888::BLACK);
    }
}
