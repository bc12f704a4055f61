//! Figure title above the top axes

use crate::PlotResult;
use crate::axes::Label;
use crate::canvas::Surface;
use crate::config::PlotConfig;
use crate::constants::TITLE_PADDING_PX;
use crate::panels::{Edge, Panel, PanelId};
use crate::primitives::PixelRect;
use crate::style::FontSize;

/// Title panel, hidden while its text is empty
#[derive(Debug, Clone)]
pub struct Title {
    id: PanelId,
    label: Label,
}

impl Default for Title {
    fn default() -> Self {
        Self::new("")
    }
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: PanelId::next(),
            label: Label::new(text)
                .with_font(FontSize::Large)
                .with_padding(TITLE_PADDING_PX),
        }
    }

    pub fn text(&self) -> &str {
        self.label.text()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.label.set_text(text);
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn apply_config(&mut self, config: &PlotConfig) {
        self.label.set_color(config.title_color);
        self.label.set_font(config.title_font);
    }
}

impl Panel for Title {
    fn id(&self) -> PanelId {
        self.id
    }

    fn edge(&self) -> Edge {
        Edge::Top
    }

    fn is_visible(&self) -> bool {
        self.label.is_drawn()
    }

    fn measure(&self, _figure_rect: PixelRect) -> f32 {
        self.label.thickness(true)
    }

    fn render(
        &self,
        surface: &mut Surface<'_>,
        panel_rect: PixelRect,
        _data_rect: PixelRect,
    ) -> PlotResult<()> {
        self.label.render(surface, panel_rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_hidden() {
        let title = Title::default();
        assert!(!title.is_visible());
        assert_eq!(title.measure(PixelRect::from_size(100.0, 100.0)), 0.0);
    }

    #[test]
    fn title_height_includes_padding() {
        // FONT_10X20
        let title = Title::new("Pressure");
        assert_eq!(
            title.measure(PixelRect::from_size(400.0, 300.0)),
            20.0 + 2.0 * TITLE_PADDING_PX
        );
    }
}
