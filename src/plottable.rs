//! The capability every drawable data item provides
//!
//! The render manager knows nothing about what a plottable draws. It hands each
//! one a surface clipped to the data rectangle and the transforms for the axes
//! the plottable is bound to.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::PlotResult;
use crate::canvas::Surface;
use crate::primitives::{CoordinateRect, PixelRect};
use crate::style::Color;
use crate::transform::AxisTransform;

static NEXT_PLOTTABLE_ID: AtomicU32 = AtomicU32::new(1);

/// Handle returned when a plottable is added to a plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlottableId(u32);

impl PlottableId {
    pub(crate) fn next() -> Self {
        Self(NEXT_PLOTTABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Swatch drawn next to a legend entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMarker {
    /// Horizontal stroke of the given width
    Line { width: u32 },
    /// Filled box
    Fill,
}

/// One legend row
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub color: Color,
    pub marker: LegendMarker,
}

impl LegendItem {
    pub fn line(label: impl Into<String>, color: Color, width: u32) -> Self {
        Self {
            label: label.into(),
            color,
            marker: LegendMarker::Line { width },
        }
    }

    pub fn fill(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            color,
            marker: LegendMarker::Fill,
        }
    }
}

/// Something that can be drawn in the data area
pub trait Plottable {
    /// Draw using the transforms of the bound axes
    ///
    /// The surface is already clipped to `data_rect`.
    fn render(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        x: &AxisTransform,
        y: &AxisTransform,
    ) -> PlotResult<()>;

    /// Data extent used by autoscale, `None` when there is nothing to fit
    fn axis_limits(&self) -> Option<CoordinateRect>;

    fn legend_items(&self) -> Vec<LegendItem> {
        Vec::new()
    }

    fn is_visible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = PlottableId::next();
        let b = PlottableId::next();
        assert!(b > a);
    }

    #[test]
    fn legend_item_constructors() {
        let item = LegendItem::line("temp", Color::new(1, 2, 3), 2);
        assert_eq!(item.marker, LegendMarker::Line { width: 2 });
        assert_eq!(LegendItem::fill("x", Color::new(0, 0, 0)).marker, LegendMarker::Fill);
    }
}
