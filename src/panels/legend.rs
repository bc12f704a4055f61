//! Legend box listing the labelled plottables

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle};
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};

use crate::PlotResult;
use crate::canvas::Surface;
use crate::config::PlotConfig;
use crate::constants::{
    LEGEND_MARGIN_PX, LEGEND_PADDING_PX, LEGEND_ROW_GAP_PX, LEGEND_SWATCH_GAP_PX,
    LEGEND_SWATCH_WIDTH_PX,
};
use crate::panels::{Edge, Panel, PanelId};
use crate::plottable::{LegendItem, LegendMarker};
use crate::primitives::PixelRect;
use crate::style::{self, Color, FontSize};

/// Legend panel on the right edge, hidden until shown
#[derive(Debug, Clone)]
pub struct Legend {
    id: PanelId,
    items: Vec<LegendItem>,
    visible: bool,
    font: FontSize,
    text_color: Color,
    background: Color,
    border: Color,
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Legend {
    pub fn new() -> Self {
        Self {
            id: PanelId::next(),
            items: Vec::new(),
            visible: false,
            font: FontSize::Small,
            text_color: style::BLACK,
            background: style::WHITE,
            border: style::MID_GRAY,
        }
    }

    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    /// Replace the listed items
    pub fn set_items(&mut self, items: Vec<LegendItem>) {
        self.items = items;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_shown(&self) -> bool {
        self.visible
    }

    pub fn apply_config(&mut self, config: &PlotConfig) {
        self.font = config.tick_font;
        self.text_color = config.tick_label_color;
        self.background = config.legend_background;
        self.border = config.legend_border;
    }

    fn text_style(&self) -> MonoTextStyle<'static, Rgb888> {
        self.font.text_style(self.text_color)
    }

    fn row_height(&self) -> f32 {
        self.font.font().character_size.height as f32
    }

    fn widest_label(&self) -> f32 {
        let style = self.text_style();
        self.items
            .iter()
            .map(|item| {
                style
                    .measure_string(&item.label, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size
                    .width
            })
            .max()
            .unwrap_or(0) as f32
    }

    /// Outer size of the legend box
    fn box_size(&self) -> (f32, f32) {
        let rows = self.items.len() as f32;
        let width = 2.0 * LEGEND_PADDING_PX
            + LEGEND_SWATCH_WIDTH_PX
            + LEGEND_SWATCH_GAP_PX
            + self.widest_label();
        let height = 2.0 * LEGEND_PADDING_PX
            + rows * self.row_height()
            + (rows - 1.0).max(0.0) * LEGEND_ROW_GAP_PX;
        (width, height)
    }

    fn draw_swatch(
        &self,
        surface: &mut Surface<'_>,
        item: &LegendItem,
        top_left: Point,
    ) -> PlotResult<()> {
        let width = LEGEND_SWATCH_WIDTH_PX as i32;
        let height = self.row_height() as i32;
        let color = item.color.rgb888();

        match item.marker {
            LegendMarker::Line { width: stroke } => {
                let y = top_left.y + height / 2;
                Line::new(Point::new(top_left.x, y), Point::new(top_left.x + width - 1, y))
                    .into_styled(PrimitiveStyle::with_stroke(color, stroke.max(1)))
                    .draw(surface)?;
            }
            LegendMarker::Fill => {
                Rectangle::new(
                    top_left + Point::new(0, 1),
                    Size::new(width as u32, (height - 2).max(1) as u32),
                )
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(surface)?;
            }
        }
        Ok(())
    }
}

impl Panel for Legend {
    fn id(&self) -> PanelId {
        self.id
    }

    fn edge(&self) -> Edge {
        Edge::Right
    }

    fn is_visible(&self) -> bool {
        self.visible && !self.items.is_empty()
    }

    fn measure(&self, _figure_rect: PixelRect) -> f32 {
        if !self.is_visible() {
            return 0.0;
        }
        LEGEND_MARGIN_PX + self.box_size().0
    }

    fn render(
        &self,
        surface: &mut Surface<'_>,
        panel_rect: PixelRect,
        data_rect: PixelRect,
    ) -> PlotResult<()> {
        if !self.is_visible() {
            return Ok(());
        }

        let (width, height) = self.box_size();
        let frame = PixelRect::new(
            panel_rect.left + LEGEND_MARGIN_PX,
            panel_rect.left + LEGEND_MARGIN_PX + width,
            data_rect.top,
            data_rect.top + height,
        )
        .to_rectangle();

        surface.with_clip(panel_rect.to_rectangle(), |surface| {
            frame
                .into_styled(
                    PrimitiveStyleBuilder::new()
                        .fill_color(self.background.rgb888())
                        .stroke_color(self.border.rgb888())
                        .stroke_width(1)
                        .build(),
                )
                .draw(surface)?;

            let text_style = self.text_style();
            let row_step = (self.row_height() + LEGEND_ROW_GAP_PX) as i32;
            let origin = frame.top_left + Point::new(LEGEND_PADDING_PX as i32, LEGEND_PADDING_PX as i32);
            let text_x = (LEGEND_SWATCH_WIDTH_PX + LEGEND_SWATCH_GAP_PX) as i32;

            for (row, item) in self.items.iter().enumerate() {
                let row_origin = origin + Point::new(0, row_step * row as i32);
                self.draw_swatch(surface, item, row_origin)?;
                Text::with_baseline(
                    &item.label,
                    row_origin + Point::new(text_x, 0),
                    text_style,
                    Baseline::Top,
                )
                .draw(surface)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Bitmap;

    fn items() -> Vec<LegendItem> {
        vec![
            LegendItem::line("alpha", style::SERIES_BLUE, 2),
            LegendItem::fill("be", Color::from_hex(0xff0000)),
        ]
    }

    #[test]
    fn hidden_by_default() {
        let mut legend = Legend::new();
        legend.set_items(items());
        assert!(!legend.is_visible());
        assert_eq!(legend.measure(PixelRect::from_size(400.0, 300.0)), 0.0);
    }

    #[test]
    fn shown_but_empty_takes_no_space() {
        let mut legend = Legend::new();
        legend.set_visible(true);
        assert!(!legend.is_visible());
    }

    #[test]
    fn width_fits_widest_label() {
        let mut legend = Legend::new();
        legend.set_items(items());
        legend.set_visible(true);
        // "alpha" in FONT_5X8 is 25 px wide
        let expected = LEGEND_MARGIN_PX
            + 2.0 * LEGEND_PADDING_PX
            + LEGEND_SWATCH_WIDTH_PX
            + LEGEND_SWATCH_GAP_PX
            + 25.0;
        assert_eq!(legend.measure(PixelRect::from_size(400.0, 300.0)), expected);
    }

    #[test]
    fn render_is_clipped_to_panel() {
        let mut legend = Legend::new();
        legend.set_items(items());
        legend.set_visible(true);

        let mut bitmap = Bitmap::new(120, 60).unwrap();
        let data = PixelRect::new(0.0, 60.0, 0.0, 60.0);
        // Narrower than the legend wants
        let panel = PixelRect::new(60.0, 80.0, 0.0, 60.0);
        let mut surface = Surface::new(&mut bitmap, 1.0);
        legend.render(&mut surface, panel, data).unwrap();
        drop(surface);

        // Background is white inside the panel, untouched outside
        assert_eq!(bitmap.pixel(70, 10), Some(Rgb888::WHITE));
        assert_eq!(bitmap.pixel(85, 10), Some(Rgb888::BLACK));
    }
}
