//! Axes: limits, ticks, labels and the panel that draws them
//!
//! An [`Axis`] sits on one figure edge. It owns the data range for its
//! dimension and provides the transform between that range and the data
//! rectangle. As a [`Panel`] it measures and draws its frame line, tick marks,
//! tick labels and axis label.

pub mod label;
pub mod manager;
pub mod ticks;

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

pub use label::{Label, Orientation};
pub use manager::AxisManager;
pub use ticks::{Tick, TickFormatter, TickGenerator, TickLabel};

use crate::PlotResult;
use crate::canvas::Surface;
use crate::config::PlotConfig;
use crate::constants::{
    AXIS_LINE_WIDTH_PX, DEFAULT_AXIS_MAX, DEFAULT_AXIS_MIN, MAJOR_TICK_LENGTH_PX,
    MIN_TICK_SPACING_HORIZONTAL_PX, MIN_TICK_SPACING_VERTICAL_PX, MINOR_TICK_LENGTH_PX,
    TICK_LABEL_GAP_PX,
};
use crate::panels::{Edge, Panel, PanelId};
use crate::primitives::{AxisLimits, PixelRect};
use crate::style::{self, Color, FontSize};
use crate::transform::AxisTransform;

/// Axes are panels, so they share the panel id space
pub type AxisId = PanelId;

/// The horizontal and vertical axis a plottable or grid is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisPair {
    pub x: AxisId,
    pub y: AxisId,
}

impl AxisPair {
    pub const fn new(x: AxisId, y: AxisId) -> Self {
        Self { x, y }
    }
}

/// Tick mark and tick label appearance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStyle {
    pub major_length: f32,
    pub minor_length: f32,
    /// Colour of the tick marks
    pub color: Color,
    pub label_color: Color,
    pub font: FontSize,
    pub show_marks: bool,
    pub show_labels: bool,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            major_length: MAJOR_TICK_LENGTH_PX,
            minor_length: MINOR_TICK_LENGTH_PX,
            color: style::BLACK,
            label_color: style::BLACK,
            font: FontSize::Small,
            show_marks: true,
            show_labels: true,
        }
    }
}

/// One axis of a plot
#[derive(Debug, Clone)]
pub struct Axis {
    id: AxisId,
    edge: Edge,
    limits: AxisLimits,
    label: Label,
    tick_style: TickStyle,
    tick_generator: TickGenerator,
    ticks: Vec<Tick>,
    frame_color: Color,
    show_frame: bool,
    visible: bool,
    min_size: f32,
}

impl Axis {
    /// Visible axis on `edge` with default limits and an empty label
    pub fn new(edge: Edge) -> Self {
        let (orientation, spacing) = if edge.is_horizontal() {
            (Orientation::Horizontal, MIN_TICK_SPACING_HORIZONTAL_PX)
        } else {
            (Orientation::Vertical, MIN_TICK_SPACING_VERTICAL_PX)
        };

        Self {
            id: PanelId::next(),
            edge,
            limits: AxisLimits::new_unchecked(DEFAULT_AXIS_MIN, DEFAULT_AXIS_MAX),
            label: Label::new("").with_orientation(orientation),
            tick_style: TickStyle::default(),
            tick_generator: TickGenerator::new(spacing),
            ticks: Vec::new(),
            frame_color: style::BLACK,
            show_frame: true,
            visible: true,
            min_size: 0.0,
        }
    }

    pub fn bottom() -> Self {
        Self::new(Edge::Bottom)
    }

    pub fn left() -> Self {
        Self::new(Edge::Left)
    }

    pub fn top() -> Self {
        Self::new(Edge::Top)
    }

    pub fn right() -> Self {
        Self::new(Edge::Right)
    }

    pub fn with_label(mut self, text: impl Into<String>) -> Self {
        self.label.set_text(text);
        self
    }

    pub fn with_limits(mut self, limits: AxisLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_tick_generator(mut self, generator: TickGenerator) -> Self {
        self.tick_generator = generator;
        self
    }

    /// True for axes on the top or bottom edge
    pub fn is_horizontal(&self) -> bool {
        self.edge.is_horizontal()
    }

    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: AxisLimits) {
        self.limits = limits;
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn tick_style(&self) -> &TickStyle {
        &self.tick_style
    }

    pub fn tick_style_mut(&mut self) -> &mut TickStyle {
        &mut self.tick_style
    }

    pub fn tick_generator(&self) -> &TickGenerator {
        &self.tick_generator
    }

    pub fn tick_generator_mut(&mut self) -> &mut TickGenerator {
        &mut self.tick_generator
    }

    /// Ticks from the last [`regenerate_ticks`](Self::regenerate_ticks)
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Recompute ticks for an axis drawn over `pixel_length` pixels
    pub fn regenerate_ticks(&mut self, pixel_length: f32) {
        self.ticks = self.tick_generator.generate(self.limits, pixel_length);
    }

    /// Hide tick marks and tick labels
    pub fn hide_ticks(&mut self) {
        self.tick_style.show_marks = false;
        self.tick_style.show_labels = false;
    }

    pub fn show_ticks(&mut self) {
        self.tick_style.show_marks = true;
        self.tick_style.show_labels = true;
    }

    pub fn set_frame_visible(&mut self, visible: bool) {
        self.show_frame = visible;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Lower bound on the measured thickness of a visible axis
    pub fn set_min_size(&mut self, min_size: f32) {
        self.min_size = min_size.max(0.0);
    }

    /// Apply colours and fonts from a plot configuration
    pub fn apply_config(&mut self, config: &PlotConfig) {
        self.frame_color = config.frame_color;
        self.tick_style.color = config.frame_color;
        self.tick_style.label_color = config.tick_label_color;
        self.tick_style.font = config.tick_font;
        self.label.set_color(config.axis_label_color);
        self.label.set_font(config.label_font);
    }

    /// Transform between this axis's limits and the data rectangle
    pub fn transform(&self, data_rect: PixelRect) -> AxisTransform {
        if self.is_horizontal() {
            AxisTransform::horizontal(self.limits, data_rect)
        } else {
            AxisTransform::vertical(self.limits, data_rect)
        }
    }

    pub fn get_pixel(&self, coordinate: f64, data_rect: PixelRect) -> f32 {
        self.transform(data_rect).to_pixel(coordinate)
    }

    pub fn get_coordinate(&self, pixel: f32, data_rect: PixelRect) -> f64 {
        self.transform(data_rect).to_coordinate(pixel)
    }

    fn tick_text_style(&self) -> MonoTextStyle<'static, Rgb888> {
        self.tick_style.font.text_style(self.tick_style.label_color)
    }

    /// Space taken by tick labels perpendicular to the edge
    fn tick_label_extent(&self) -> f32 {
        let style = self.tick_text_style();
        if self.is_horizontal() {
            return style.font.character_size.height as f32;
        }

        self.ticks
            .iter()
            .filter(|tick| tick.is_major && !tick.label.is_empty())
            .map(|tick| {
                style
                    .measure_string(&tick.label, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size
                    .width
            })
            .max()
            .unwrap_or(0) as f32
    }

    fn draws_tick_labels(&self) -> bool {
        self.tick_style.show_labels && self.ticks.iter().any(|t| t.is_major && !t.label.is_empty())
    }

    fn marks_length(&self) -> f32 {
        if self.tick_style.show_marks && !self.ticks.is_empty() {
            self.tick_style.major_length
        } else {
            0.0
        }
    }

    /// Pixel `depth` steps outward from the inner edge, `along` the edge
    fn edge_point(&self, panel: PixelRect, along: i32, depth: i32) -> Point {
        let rect = panel.to_rectangle();
        let left = rect.top_left.x;
        let top = rect.top_left.y;
        let right = left + rect.size.width as i32;
        let bottom = top + rect.size.height as i32;

        match self.edge {
            Edge::Bottom => Point::new(along, top + depth),
            Edge::Top => Point::new(along, bottom - 1 - depth),
            Edge::Left => Point::new(right - 1 - depth, along),
            Edge::Right => Point::new(left + depth, along),
        }
    }

    fn label_rect(&self, panel: PixelRect, data: PixelRect) -> PixelRect {
        let t = self.label.thickness(self.is_horizontal());
        match self.edge {
            Edge::Bottom => PixelRect::new(data.left, data.right, panel.bottom - t, panel.bottom),
            Edge::Top => PixelRect::new(data.left, data.right, panel.top, panel.top + t),
            Edge::Left => PixelRect::new(panel.left, panel.left + t, data.top, data.bottom),
            Edge::Right => PixelRect::new(panel.right - t, panel.right, data.top, data.bottom),
        }
    }
}

impl Panel for Axis {
    fn id(&self) -> PanelId {
        self.id
    }

    fn edge(&self) -> Edge {
        self.edge
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn measure(&self, _figure_rect: PixelRect) -> f32 {
        if !self.visible {
            return 0.0;
        }

        let mut size = AXIS_LINE_WIDTH_PX + self.marks_length();
        if self.draws_tick_labels() {
            size += TICK_LABEL_GAP_PX + self.tick_label_extent();
        }
        size += self.label.thickness(self.is_horizontal());

        size.max(self.min_size)
    }

    fn render(
        &self,
        surface: &mut Surface<'_>,
        panel_rect: PixelRect,
        data_rect: PixelRect,
    ) -> PlotResult<()> {
        if !self.visible {
            return Ok(());
        }

        let data = data_rect.to_rectangle();
        if data.is_zero_sized() {
            return Ok(());
        }
        let (along_start, along_end) = if self.is_horizontal() {
            (data.top_left.x, data.top_left.x + data.size.width as i32 - 1)
        } else {
            (data.top_left.y, data.top_left.y + data.size.height as i32 - 1)
        };

        if self.show_frame {
            Line::new(
                self.edge_point(panel_rect, along_start, 0),
                self.edge_point(panel_rect, along_end, 0),
            )
            .into_styled(PrimitiveStyle::with_stroke(
                self.frame_color.rgb888(),
                AXIS_LINE_WIDTH_PX as u32,
            ))
            .draw(surface)?;
        }

        let transform = self.transform(data_rect);
        let mark_style = PrimitiveStyle::with_stroke(self.tick_style.color.rgb888(), 1);
        let text_style = self.tick_text_style();
        let (alignment, baseline) = match self.edge {
            Edge::Bottom => (Alignment::Center, Baseline::Top),
            Edge::Top => (Alignment::Center, Baseline::Bottom),
            Edge::Left => (Alignment::Right, Baseline::Middle),
            Edge::Right => (Alignment::Left, Baseline::Middle),
        };
        let layout = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        let label_depth = (AXIS_LINE_WIDTH_PX + self.marks_length() + TICK_LABEL_GAP_PX) as i32;

        for tick in &self.ticks {
            if !self.limits.contains(tick.position) {
                continue;
            }
            let along = (transform.to_pixel(tick.position).round() as i32).clamp(along_start, along_end);

            let length = if tick.is_major {
                self.tick_style.major_length
            } else {
                self.tick_style.minor_length
            } as i32;
            if self.tick_style.show_marks && length > 0 {
                Line::new(
                    self.edge_point(panel_rect, along, 1),
                    self.edge_point(panel_rect, along, length),
                )
                .into_styled(mark_style)
                .draw(surface)?;
            }

            if self.tick_style.show_labels && tick.is_major && !tick.label.is_empty() {
                Text::with_text_style(
                    &tick.label,
                    self.edge_point(panel_rect, along, label_depth),
                    text_style,
                    layout,
                )
                .draw(surface)?;
            }
        }

        self.label
            .render(surface, self.label_rect(panel_rect, data_rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Bitmap;

    #[test]
    fn hidden_axis_measures_zero() {
        let axis = Axis::bottom().with_visible(false);
        assert_eq!(axis.measure(PixelRect::from_size(100.0, 100.0)), 0.0);
    }

    #[test]
    fn hidden_ticks_leave_only_the_frame_line() {
        let mut axis = Axis::left();
        axis.regenerate_ticks(300.0);
        axis.hide_ticks();
        assert_eq!(axis.measure(PixelRect::from_size(400.0, 300.0)), AXIS_LINE_WIDTH_PX);
    }

    #[test]
    fn thickness_adds_marks_labels_and_title() {
        let mut axis = Axis::bottom();
        axis.regenerate_ticks(400.0);
        let bare = axis.measure(PixelRect::from_size(400.0, 300.0));
        // FONT_5X8 tick labels
        assert_eq!(
            bare,
            AXIS_LINE_WIDTH_PX + MAJOR_TICK_LENGTH_PX + TICK_LABEL_GAP_PX + 8.0
        );

        axis.label_mut().set_text("Time");
        let titled = axis.measure(PixelRect::from_size(400.0, 300.0));
        assert_eq!(titled, bare + axis.label().thickness(true));
    }

    #[test]
    fn vertical_axis_measures_widest_label() {
        let mut axis = Axis::left().with_limits(AxisLimits::new(0.0, 1000.0).unwrap());
        axis.regenerate_ticks(300.0);
        // "1000" in FONT_5X8 is 4 * 5 px wide plus spacing
        let extent = axis.tick_label_extent();
        assert!(extent >= 20.0, "extent {extent}");
    }

    #[test]
    fn min_size_is_a_floor() {
        let mut axis = Axis::bottom();
        axis.hide_ticks();
        axis.set_min_size(25.0);
        assert_eq!(axis.measure(PixelRect::from_size(10.0, 10.0)), 25.0);
    }

    #[test]
    fn vertical_transform_runs_bottom_to_top() {
        let axis = Axis::left().with_limits(AxisLimits::new(0.0, 10.0).unwrap());
        let data = PixelRect::new(0.0, 100.0, 0.0, 200.0);
        assert_eq!(axis.get_pixel(0.0, data), 200.0);
        assert_eq!(axis.get_pixel(10.0, data), 0.0);
        assert!((axis.get_coordinate(100.0, data) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn bottom_axis_draws_frame_on_inner_edge() {
        let mut axis = Axis::bottom();
        axis.hide_ticks();
        let mut config = PlotConfig::default();
        config.frame_color = style::WHITE;
        axis.apply_config(&config);

        let data = PixelRect::new(10.0, 90.0, 0.0, 40.0);
        let panel = PixelRect::new(10.0, 90.0, 40.0, 41.0);
        let mut bitmap = Bitmap::new(100, 60).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);
        axis.render(&mut surface, panel, data).unwrap();
        drop(surface);

        let white = style::WHITE.rgb888();
        assert_eq!(bitmap.pixel(10, 40), Some(white));
        assert_eq!(bitmap.pixel(89, 40), Some(white));
        assert_eq!(bitmap.pixel(90, 40), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(50, 39), Some(Rgb888::BLACK));
    }
}
