//! Text blocks owned by axes and the title panel

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::renderer::TextRenderer;
use embedded_graphics::text::{Baseline, Text};
use embedded_layout::align::{Align, horizontal, vertical};

use crate::PlotResult;
use crate::canvas::Surface;
use crate::constants::AXIS_LABEL_PADDING_PX;
use crate::primitives::PixelRect;
use crate::style::{self, Color, FontSize};

/// Reading direction of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    /// Characters stacked top to bottom, used beside vertical axes
    Vertical,
}

/// A single line of text with its style
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    font: FontSize,
    color: Color,
    visible: bool,
    orientation: Orientation,
    padding: f32,
}

impl Default for Label {
    fn default() -> Self {
        Self::new("")
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontSize::Medium,
            color: style::BLACK,
            visible: true,
            orientation: Orientation::Horizontal,
            padding: AXIS_LABEL_PADDING_PX,
        }
    }

    pub fn with_font(mut self, font: FontSize) -> Self {
        self.font = font;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn font(&self) -> FontSize {
        self.font
    }

    pub fn set_font(&mut self, font: FontSize) {
        self.font = font;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Visible and non-empty
    pub fn is_drawn(&self) -> bool {
        self.visible && !self.text.is_empty()
    }

    fn style(&self) -> MonoTextStyle<'static, Rgb888> {
        self.font.text_style(self.color)
    }

    /// Size of the rendered text without padding
    pub fn measure(&self) -> Size {
        if self.text.is_empty() {
            return Size::zero();
        }

        let style = self.style();
        match self.orientation {
            Orientation::Horizontal => {
                style
                    .measure_string(&self.text, Point::zero(), Baseline::Top)
                    .bounding_box
                    .size
            }
            Orientation::Vertical => {
                let glyph = style.font.character_size;
                Size::new(glyph.width, glyph.height * self.text.chars().count() as u32)
            }
        }
    }

    /// Space taken perpendicular to an edge, padding on both sides included
    ///
    /// `across_height` selects the height (for labels beside horizontal edges)
    /// instead of the width.
    pub fn thickness(&self, across_height: bool) -> f32 {
        if !self.is_drawn() {
            return 0.0;
        }
        let size = self.measure();
        let extent = if across_height { size.height } else { size.width };
        extent as f32 + 2.0 * self.padding
    }

    /// Draw centred inside `rect`
    pub fn render(&self, surface: &mut Surface<'_>, rect: PixelRect) -> PlotResult<()> {
        if !self.is_drawn() {
            return Ok(());
        }

        let target = rect.to_rectangle();
        let style = self.style();

        match self.orientation {
            Orientation::Horizontal => {
                Text::with_baseline(&self.text, Point::zero(), style, Baseline::Top)
                    .align_to(&target, horizontal::Center, vertical::Center)
                    .draw(surface)?;
            }
            Orientation::Vertical => {
                let block = Rectangle::new(Point::zero(), self.measure())
                    .align_to(&target, horizontal::Center, vertical::Center);
                let step = style.font.character_size.height as i32;

                let mut buf = [0u8; 4];
                for (i, ch) in self.text.chars().enumerate() {
                    let glyph: &str = ch.encode_utf8(&mut buf);
                    let position = block.top_left + Point::new(0, step * i as i32);
                    Text::with_baseline(glyph, position, style, Baseline::Top).draw(surface)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Bitmap;

    #[test]
    fn empty_label_takes_no_space() {
        let label = Label::new("");
        assert_eq!(label.measure(), Size::zero());
        assert_eq!(label.thickness(true), 0.0);
    }

    #[test]
    fn hidden_label_takes_no_space() {
        let mut label = Label::new("Time");
        label.set_visible(false);
        assert_eq!(label.thickness(true), 0.0);
    }

    #[test]
    fn horizontal_measure_follows_font_metrics() {
        // FONT_6X10: 6 px advance, no extra spacing
        let label = Label::new("abcd").with_font(FontSize::Medium);
        assert_eq!(label.measure(), Size::new(24, 10));
        assert_eq!(label.thickness(true), 10.0 + 2.0 * AXIS_LABEL_PADDING_PX);
    }

    #[test]
    fn vertical_measure_stacks_characters() {
        let label = Label::new("abc")
            .with_font(FontSize::Medium)
            .with_orientation(Orientation::Vertical)
            .with_padding(1.0);
        assert_eq!(label.measure(), Size::new(6, 30));
        assert_eq!(label.thickness(false), 8.0);
    }

    #[test]
    fn render_stays_inside_rect() {
        let mut bitmap = Bitmap::new(60, 20).unwrap();
        let label = Label::new("Hi").with_color(style::WHITE);
        let rect = PixelRect::new(20.0, 40.0, 5.0, 15.0);

        let mut surface = Surface::new(&mut bitmap, 1.0);
        label.render(&mut surface, rect).unwrap();
        drop(surface);

        let mut lit = 0;
        for y in 0..20 {
            for x in 0..60 {
                if bitmap.pixel(x, y) == Some(style::WHITE.rgb888()) {
                    assert!((20..40).contains(&x) && (5..15).contains(&y));
                    lit += 1;
                }
            }
        }
        assert!(lit > 0);
    }
}
