//! Line series plottable
//!
//! Stores data points with associated styling and interpolation settings and
//! draws them as a line with optional point markers.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle};

use super::interpolation::{Interpolation, LinePainter, draw_linear_series, draw_smooth_series};
use crate::canvas::Surface;
use crate::constants::{DEFAULT_MARKER_SIZE_PX, DEFAULT_SERIES_LINE_WIDTH_PX};
use crate::plottable::{LegendItem, Plottable};
use crate::primitives::{CoordinateRect, Coordinates, PixelPoint, PixelRect};
use crate::style::{self, Color};
use crate::transform::AxisTransform;
use crate::{PlotError, PlotResult};

/// Visual style configuration for a data series
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    /// Line color
    pub color: Color,
    /// Line width in pixels, 0 draws markers only
    pub line_width: u32,
    /// Whether to draw dots at data points
    pub show_points: bool,
    /// Marker diameter in pixels
    pub marker_size: u32,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: style::SERIES_BLUE,
            line_width: DEFAULT_SERIES_LINE_WIDTH_PX,
            show_points: false,
            marker_size: DEFAULT_MARKER_SIZE_PX,
        }
    }
}

/// A data series containing points, style, and interpolation settings
#[derive(Debug, Clone, Default)]
pub struct Series {
    points: Vec<Coordinates>,
    style: SeriesStyle,
    interpolation: Interpolation,
    label: Option<String>,
    hidden: bool,
}

impl Series {
    pub fn new(points: impl IntoIterator<Item = Coordinates>) -> Self {
        Self {
            points: points.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Pair up parallel x and y slices
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> PlotResult<Self> {
        if xs.len() != ys.len() {
            return Err(PlotError::invalid_argument(format!(
                "x and y lengths differ ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        Ok(Self::new(
            xs.iter().zip(ys).map(|(&x, &y)| Coordinates::new(x, y)),
        ))
    }

    /// Set the visual style
    pub fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.style.color = color;
        self
    }

    pub fn with_points(mut self, show_points: bool) -> Self {
        self.style.show_points = show_points;
        self
    }

    /// Set the interpolation type
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Name shown in the legend
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn push(&mut self, point: Coordinates) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Coordinates] {
        &self.points
    }

    pub fn style(&self) -> &SeriesStyle {
        &self.style
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.hidden = !visible;
    }

    /// Clear all data points
    pub fn clear(&mut self) {
        self.points.clear();
    }

    fn draw_markers(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        x: &AxisTransform,
        y: &AxisTransform,
    ) -> PlotResult<()> {
        let diameter = self.style.marker_size.max(1);
        let marker = PrimitiveStyle::with_fill(self.style.color.rgb888());
        let reach = diameter as f32;
        let bounds = PixelRect::new(
            data_rect.left - reach,
            data_rect.right + reach,
            data_rect.top - reach,
            data_rect.bottom + reach,
        );

        for point in self.points.iter().filter(|p| p.is_finite()) {
            let pixel = PixelPoint::new(x.to_pixel(point.x), y.to_pixel(point.y));
            if bounds.contains(pixel) {
                Circle::with_center(pixel.to_point(), diameter)
                    .into_styled(marker)
                    .draw(surface)?;
            }
        }
        Ok(())
    }
}

impl Plottable for Series {
    fn render(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        x: &AxisTransform,
        y: &AxisTransform,
    ) -> PlotResult<()> {
        if self.style.line_width > 0 {
            let mut painter = LinePainter::new(
                surface,
                self.style.color.rgb888(),
                self.style.line_width,
                data_rect,
            );
            match self.interpolation {
                Interpolation::Linear => draw_linear_series(&mut painter, &self.points, x, y)?,
                Interpolation::Smooth => draw_smooth_series(&mut painter, &self.points, x, y)?,
            }
        }

        if self.style.show_points {
            self.draw_markers(surface, data_rect, x, y)?;
        }
        Ok(())
    }

    fn axis_limits(&self) -> Option<CoordinateRect> {
        CoordinateRect::bounding(self.points.iter().copied())
    }

    fn legend_items(&self) -> Vec<LegendItem> {
        self.label
            .iter()
            .map(|label| LegendItem::line(label.clone(), self.style.color, self.style.line_width))
            .collect()
    }

    fn is_visible(&self) -> bool {
        !self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Bitmap;
    use crate::primitives::AxisLimits;
    use embedded_graphics::pixelcolor::Rgb888;

    fn transforms(rect: PixelRect) -> (AxisTransform, AxisTransform) {
        let limits = AxisLimits::new(0.0, 10.0).unwrap();
        (
            AxisTransform::horizontal(limits, rect),
            AxisTransform::vertical(limits, rect),
        )
    }

    #[test]
    fn from_xy_rejects_mismatched_lengths() {
        assert!(matches!(
            Series::from_xy(&[1.0, 2.0], &[1.0]),
            Err(PlotError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn limits_ignore_non_finite_points() {
        let series = Series::from_xy(&[0.0, 5.0, f64::NAN, 10.0], &[1.0, -2.0, 100.0, 3.0]).unwrap();
        assert_eq!(
            series.axis_limits(),
            Some(CoordinateRect::new(0.0, 10.0, -2.0, 3.0))
        );
        assert_eq!(Series::default().axis_limits(), None);
    }

    #[test]
    fn legend_only_for_labelled_series() {
        assert!(Series::default().legend_items().is_empty());
        let items = Series::default().with_label("rpm").legend_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].label, "rpm");
    }

    #[test]
    fn draws_horizontal_line_across_data_rect() {
        let rect = PixelRect::from_size(100.0, 100.0);
        let (x, y) = transforms(rect);
        let series = Series::from_xy(&[0.0, 10.0], &[5.0, 5.0])
            .unwrap()
            .with_color(style::WHITE)
            .with_style(SeriesStyle {
                color: style::WHITE,
                line_width: 1,
                ..SeriesStyle::default()
            });

        let mut bitmap = Bitmap::new(100, 100).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);
        series.render(&mut surface, rect, &x, &y).unwrap();
        drop(surface);

        assert_eq!(bitmap.pixel(50, 50), Some(Rgb888::WHITE));
        assert_eq!(bitmap.pixel(50, 40), Some(Rgb888::BLACK));
    }

    #[test]
    fn smooth_series_reaches_end_points() {
        let rect = PixelRect::from_size(100.0, 100.0);
        let (x, y) = transforms(rect);
        let series = Series::from_xy(&[0.0, 2.0, 4.0, 6.0, 8.0, 10.0], &[5.0; 6])
            .unwrap()
            .with_style(SeriesStyle {
                color: style::WHITE,
                line_width: 1,
                ..SeriesStyle::default()
            })
            .with_interpolation(Interpolation::Smooth);

        let mut bitmap = Bitmap::new(101, 101).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);
        series.render(&mut surface, rect, &x, &y).unwrap();
        drop(surface);

        assert_eq!(bitmap.pixel(0, 50), Some(Rgb888::WHITE));
        assert_eq!(bitmap.pixel(99, 50), Some(Rgb888::WHITE));
    }

    #[test]
    fn hidden_series_reports_invisible() {
        let mut series = Series::default();
        series.set_visible(false);
        assert!(!series.is_visible());
    }
}
