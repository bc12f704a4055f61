//! Colour bar: a gradient strip with its own value ticks

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::PlotResult;
use crate::axes::{Tick, TickGenerator};
use crate::canvas::Surface;
use crate::constants::{
    COLORBAR_MARGIN_PX, COLORBAR_WIDTH_PX, MAJOR_TICK_LENGTH_PX, MIN_TICK_SPACING_VERTICAL_PX,
    TICK_LABEL_GAP_PX,
};
use crate::panels::{Edge, Panel, PanelId};
use crate::primitives::{AxisLimits, PixelRect};
use crate::style::{self, Color, FontSize, gradient_color};
use crate::transform::AxisTransform;

/// Vertical gradient mapping a value range onto colour stops
#[derive(Debug, Clone)]
pub struct Colorbar {
    id: PanelId,
    range: AxisLimits,
    stops: Vec<Color>,
    generator: TickGenerator,
    /// Major ticks from the last `prepare`
    labels: Vec<Tick>,
    font: FontSize,
    frame_color: Color,
    label_color: Color,
    visible: bool,
}

impl Colorbar {
    /// `stops` are evenly spaced from `range.min()` (bottom) to `range.max()` (top)
    pub fn new(range: AxisLimits, stops: Vec<Color>) -> Self {
        Self {
            id: PanelId::next(),
            range,
            stops,
            generator: TickGenerator::new(MIN_TICK_SPACING_VERTICAL_PX),
            labels: Vec::new(),
            font: FontSize::Small,
            frame_color: style::BLACK,
            label_color: style::BLACK,
            visible: true,
        }
    }

    pub fn with_tick_generator(mut self, generator: TickGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_colors(mut self, frame: Color, label: Color) -> Self {
        self.frame_color = frame;
        self.label_color = label;
        self
    }

    pub fn range(&self) -> AxisLimits {
        self.range
    }

    pub fn set_range(&mut self, range: AxisLimits) {
        self.range = range;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Colour for a value, clamped to the range
    pub fn color_at(&self, value: f64) -> Rgb888 {
        let stops: Vec<Rgb888> = self.stops.iter().map(|c| c.rgb888()).collect();
        let t = if self.range.is_zero_width() {
            0.5
        } else {
            ((value - self.range.min()) / self.range.span()) as f32
        };
        gradient_color(&stops, t)
    }

    fn text_style(&self) -> MonoTextStyle<'static, Rgb888> {
        self.font.text_style(self.label_color)
    }

    /// Labelled ticks used by both `measure` and `render`
    pub fn ticks(&self) -> &[Tick] {
        &self.labels
    }
}

impl Panel for Colorbar {
    fn id(&self) -> PanelId {
        self.id
    }

    fn edge(&self) -> Edge {
        Edge::Right
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn prepare(&mut self, figure_rect: PixelRect) {
        self.labels = self
            .generator
            .generate(self.range, figure_rect.height())
            .into_iter()
            .filter(|tick| tick.is_major)
            .collect();
    }

    fn measure(&self, _figure_rect: PixelRect) -> f32 {
        if !self.visible {
            return 0.0;
        }

        let style = self.text_style();
        let label_width = self
            .labels
            .iter()
            .map(|tick| {
                style
                    .measure_string(&tick.label, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size
                    .width
            })
            .max()
            .unwrap_or(0) as f32;

        COLORBAR_MARGIN_PX + COLORBAR_WIDTH_PX + MAJOR_TICK_LENGTH_PX + TICK_LABEL_GAP_PX + label_width
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

        let strip = PixelRect::new(
            panel_rect.left + COLORBAR_MARGIN_PX,
            panel_rect.left + COLORBAR_MARGIN_PX + COLORBAR_WIDTH_PX,
            data_rect.top,
            data_rect.bottom,
        )
        .to_rectangle();
        if strip.is_zero_sized() {
            return Ok(());
        }

        let stops: Vec<Rgb888> = self.stops.iter().map(|c| c.rgb888()).collect();
        let rows = strip.size.height as i32;
        for row in 0..rows {
            // Bottom row is t = 0
            let t = if rows > 1 {
                (rows - 1 - row) as f32 / (rows - 1) as f32
            } else {
                0.5
            };
            surface.fill_solid(
                &Rectangle::new(
                    strip.top_left + Point::new(0, row),
                    Size::new(strip.size.width, 1),
                ),
                gradient_color(&stops, t),
            )?;
        }
        strip
            .into_styled(PrimitiveStyle::with_stroke(self.frame_color.rgb888(), 1))
            .draw(surface)?;

        let transform = AxisTransform::vertical(self.range, data_rect);
        let mark_style = PrimitiveStyle::with_stroke(self.frame_color.rgb888(), 1);
        let text_style = self.text_style();
        let layout = TextStyleBuilder::new()
            .alignment(Alignment::Left)
            .baseline(Baseline::Middle)
            .build();
        let right = strip.top_left.x + strip.size.width as i32;
        let bottom = strip.top_left.y + rows - 1;

        for tick in &self.labels {
            let y = (transform.to_pixel(tick.position).round() as i32).clamp(strip.top_left.y, bottom);
            Line::new(
                Point::new(right, y),
                Point::new(right + MAJOR_TICK_LENGTH_PX as i32 - 1, y),
            )
            .into_styled(mark_style)
            .draw(surface)?;
            Text::with_text_style(
                &tick.label,
                Point::new(right + (MAJOR_TICK_LENGTH_PX + TICK_LABEL_GAP_PX) as i32, y),
                text_style,
                layout,
            )
            .draw(surface)?;
        }
        Ok(())
    }
}
