//! Panels: decorations stacked along the figure edges
//!
//! A panel reports how thick it needs to be, where it sits relative to the data
//! rectangle and how to draw itself. The layout manager only talks to panels
//! through the [`Panel`] trait, so axes, the title, the legend, colour bars and
//! user-supplied decorations are laid out by the same algorithm.

pub mod colorbar;
pub mod legend;
pub mod title;

use core::sync::atomic::{AtomicU32, Ordering};

pub use colorbar::Colorbar;
pub use legend::Legend;
pub use title::Title;

use crate::PlotResult;
use crate::canvas::Surface;
use crate::primitives::PixelRect;

/// Figure edge a panel is stacked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// True for the top and bottom edges
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }
}

static NEXT_PANEL_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique panel handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u32);

impl PanelId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_PANEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// A sizeable, positionable decoration
pub trait Panel {
    fn id(&self) -> PanelId;

    fn edge(&self) -> Edge;

    /// Invisible panels still take part in layout with zero thickness
    fn is_visible(&self) -> bool;

    /// Refresh content that depends on the figure size
    ///
    /// Runs once per render before layout, so `measure` and `render` see the
    /// same content.
    fn prepare(&mut self, _figure_rect: PixelRect) {}

    /// Thickness perpendicular to the edge, given the whole figure
    fn measure(&self, figure_rect: PixelRect) -> f32;

    /// Rectangle for this panel given its measured size and stack offset
    fn panel_rect(&self, data_rect: PixelRect, size: f32, offset: f32) -> PixelRect {
        edge_rect(self.edge(), data_rect, size, offset)
    }

    /// Draw into `panel_rect`; `data_rect` is provided for alignment
    fn render(
        &self,
        surface: &mut Surface<'_>,
        panel_rect: PixelRect,
        data_rect: PixelRect,
    ) -> PlotResult<()>;
}

/// Band of thickness `size` that starts `offset` pixels outside the data
/// rectangle and spans it along the edge
pub fn edge_rect(edge: Edge, data_rect: PixelRect, size: f32, offset: f32) -> PixelRect {
    let d = data_rect;
    match edge {
        Edge::Left => {
            let right = d.left - offset;
            PixelRect::new(right - size, right, d.top, d.bottom)
        }
        Edge::Right => {
            let left = d.right + offset;
            PixelRect::new(left, left + size, d.top, d.bottom)
        }
        Edge::Top => {
            let bottom = d.top - offset;
            PixelRect::new(d.left, d.right, bottom - size, bottom)
        }
        Edge::Bottom => {
            let top = d.bottom + offset;
            PixelRect::new(d.left, d.right, top, top + size)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = PanelId::next();
        let b = PanelId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn edge_rects_stack_outward() {
        let data = PixelRect::new(50.0, 350.0, 20.0, 270.0);

        assert_eq!(
            edge_rect(Edge::Left, data, 30.0, 0.0),
            PixelRect::new(20.0, 50.0, 20.0, 270.0)
        );
        assert_eq!(
            edge_rect(Edge::Left, data, 10.0, 30.0),
            PixelRect::new(10.0, 20.0, 20.0, 270.0)
        );
        assert_eq!(
            edge_rect(Edge::Right, data, 10.0, 5.0),
            PixelRect::new(355.0, 365.0, 20.0, 270.0)
        );
        assert_eq!(
            edge_rect(Edge::Top, data, 20.0, 0.0),
            PixelRect::new(50.0, 350.0, 0.0, 20.0)
        );
        assert_eq!(
            edge_rect(Edge::Bottom, data, 25.0, 0.0),
            PixelRect::new(50.0, 350.0, 270.0, 295.0)
        );
    }
}
