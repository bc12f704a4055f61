//! Plot-wide styling defaults
//!
//! A [`PlotConfig`] is handed to [`Plot::with_config`](crate::Plot::with_config)
//! and pushed into the axes, title, legend and default grid it creates. There is
//! no global styling state.

use serde::{Deserialize, Serialize};

use crate::constants::AUTO_SCALE_MARGIN_FACTOR;
use crate::layout::LayoutMode;
use crate::style::{self, Color, FontSize};
use crate::{PlotError, PlotResult};

/// Fraction of the data span added on each side when autoscaling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoscaleMargins {
    pub x: f64,
    pub y: f64,
}

impl Default for AutoscaleMargins {
    fn default() -> Self {
        Self {
            x: AUTO_SCALE_MARGIN_FACTOR,
            y: AUTO_SCALE_MARGIN_FACTOR,
        }
    }
}

/// Colours, fonts and geometry defaults for a plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Fill behind everything
    pub figure_background: Color,
    /// Fill behind the data rectangle
    pub data_background: Color,
    /// Axis lines and tick marks
    pub frame_color: Color,
    pub tick_label_color: Color,
    pub axis_label_color: Color,
    pub title_color: Color,
    pub grid_color: Color,
    pub legend_background: Color,
    pub legend_border: Color,

    pub tick_font: FontSize,
    pub label_font: FontSize,
    pub title_font: FontSize,

    /// Physical pixels per logical pixel
    pub scale_factor: f32,
    pub margins: AutoscaleMargins,
    pub layout: LayoutMode,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            figure_background: style::WHITE,
            data_background: style::WHITE,
            frame_color: style::BLACK,
            tick_label_color: style::BLACK,
            axis_label_color: style::BLACK,
            title_color: style::BLACK,
            grid_color: style::GRID_GRAY,
            legend_background: style::WHITE,
            legend_border: style::MID_GRAY,
            tick_font: FontSize::Small,
            label_font: FontSize::Medium,
            title_font: FontSize::Large,
            scale_factor: 1.0,
            margins: AutoscaleMargins::default(),
            layout: LayoutMode::Automatic,
        }
    }
}

impl PlotConfig {
    /// Dark theme preset
    pub fn dark() -> Self {
        Self {
            figure_background: style::BLACK,
            data_background: Color::from_hex(0x101010),
            frame_color: style::LIGHT_GRAY,
            tick_label_color: style::LIGHT_GRAY,
            axis_label_color: style::LIGHT_GRAY,
            title_color: style::WHITE,
            grid_color: style::DARK_GRAY,
            legend_background: Color::from_hex(0x202020),
            legend_border: style::MID_GRAY,
            ..Self::default()
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_layout(mut self, layout: LayoutMode) -> Self {
        self.layout = layout;
        self
    }

    /// Reject values no render could honour
    pub fn validate(&self) -> PlotResult<()> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(PlotError::invalid_argument(format!(
                "scale factor must be positive and finite (got {})",
                self.scale_factor
            )));
        }

        let AutoscaleMargins { x, y } = self.margins;
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return Err(PlotError::invalid_argument(format!(
                "autoscale margins must be finite and non-negative (got x={x}, y={y})"
            )));
        }

        self.layout.validate()
    }

    /// Serialize with postcard
    pub fn to_bytes(&self) -> PlotResult<Vec<u8>> {
        postcard::to_allocvec(self).map_err(|e| PlotError::Config {
            reason: format!("encode failed: {e}"),
        })
    }

    /// Deserialize with postcard and validate
    pub fn from_bytes(bytes: &[u8]) -> PlotResult<Self> {
        let config: Self = postcard::from_bytes(bytes).map_err(|e| PlotError::Config {
            reason: format!("decode failed: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PixelPadding;

    #[test]
    fn default_is_valid() {
        assert!(PlotConfig::default().validate().is_ok());
        assert!(PlotConfig::dark().validate().is_ok());
    }

    #[test]
    fn bad_scale_factor_is_rejected() {
        for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = PlotConfig::default().with_scale_factor(scale);
            assert!(matches!(
                config.validate(),
                Err(PlotError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn negative_margin_is_rejected() {
        let mut config = PlotConfig::default();
        config.margins.y = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn survives_postcard() {
        let config = PlotConfig::dark()
            .with_scale_factor(2.0)
            .with_layout(LayoutMode::FixedPadding(PixelPadding::new(40.0, 10.0, 10.0, 30.0)));
        let bytes = config.to_bytes().unwrap();
        assert_eq!(PlotConfig::from_bytes(&bytes).unwrap(), config);
    }

    #[test]
    fn garbage_bytes_are_a_config_error() {
        assert!(matches!(
            PlotConfig::from_bytes(&[0xff]),
            Err(PlotError::Config { .. })
        ));
    }
}
