//! Figure partitioning
//!
//! Panels are grouped by the edge they sit on. Along each edge the first panel
//! hugs the data rectangle (offset 0) and later panels stack outward. The data
//! rectangle is whatever remains of the figure once every edge's total
//! thickness is taken away. Layout is recomputed from scratch on every render.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::panels::{Edge, Panel, PanelId};
use crate::primitives::{PixelPadding, PixelPoint, PixelRect};
use crate::{PlotError, PlotResult};

/// How the data rectangle is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Measure every panel and give the data area what is left
    #[default]
    Automatic,
    /// Data area is the figure minus fixed padding; panels stack in the padding
    FixedPadding(PixelPadding),
    /// Data area is an explicit rectangle inside the figure
    FixedDataRect(PixelRect),
}

impl LayoutMode {
    pub fn validate(&self) -> PlotResult<()> {
        let ok = match self {
            LayoutMode::Automatic => true,
            LayoutMode::FixedPadding(p) => [p.left, p.right, p.top, p.bottom]
                .iter()
                .all(|v| v.is_finite() && *v >= 0.0),
            LayoutMode::FixedDataRect(r) => {
                [r.left, r.right, r.top, r.bottom].iter().all(|v| v.is_finite())
                    && r.width() >= 0.0
                    && r.height() >= 0.0
            }
        };
        if ok {
            Ok(())
        } else {
            Err(PlotError::invalid_argument(format!(
                "layout mode has negative or non-finite geometry: {self:?}"
            )))
        }
    }
}

/// Where one panel ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub id: PanelId,
    pub edge: Edge,
    /// Thickness perpendicular to the edge
    pub size: f32,
    /// Distance from the data rectangle
    pub offset: f32,
    pub rect: PixelRect,
}

/// Result of one layout pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutDetails {
    pub figure_rect: PixelRect,
    pub data_rect: PixelRect,
    /// In stacking order
    pub panels: Vec<PanelLayout>,
}

impl LayoutDetails {
    pub fn panel(&self, id: PanelId) -> Option<&PanelLayout> {
        self.panels.iter().find(|p| p.id == id)
    }

    /// Total thickness of every panel on `edge`
    pub fn edge_thickness(&self, edge: Edge) -> f32 {
        self.panels
            .iter()
            .filter(|p| p.edge == edge)
            .map(|p| p.size)
            .sum()
    }

    /// Topmost panel containing `pixel`
    ///
    /// Panels are searched in reverse stacking order, so when rectangles
    /// overlap the one laid out (and drawn) last wins.
    pub fn panel_at(&self, pixel: PixelPoint) -> Option<PanelId> {
        self.panels
            .iter()
            .rev()
            .find(|p| p.rect.contains(pixel))
            .map(|p| p.id)
    }
}

/// Computes [`LayoutDetails`] for a figure
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutManager {
    mode: LayoutMode,
}

impl LayoutManager {
    pub fn new(mode: LayoutMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    /// Partition `figure_rect` between `panels` and the data rectangle
    pub fn compute(&self, figure_rect: PixelRect, panels: &[&dyn Panel]) -> LayoutDetails {
        let mut totals = EdgeTotals::default();
        let mut placed = Vec::with_capacity(panels.len());

        for panel in panels {
            let size = if panel.is_visible() {
                sanitize(panel.measure(figure_rect))
            } else {
                0.0
            };
            let edge = panel.edge();
            let offset = totals.get(edge);
            totals.add(edge, size);
            placed.push((*panel, edge, size, offset));
        }

        let data_rect = match self.mode {
            LayoutMode::Automatic => {
                let padding = PixelPadding::new(
                    totals.get(Edge::Left),
                    totals.get(Edge::Right),
                    totals.get(Edge::Top),
                    totals.get(Edge::Bottom),
                );
                if padding.left + padding.right > figure_rect.width()
                    || padding.top + padding.bottom > figure_rect.height()
                {
                    warn!(
                        "Panels need {}x{} px but the figure is {}x{}; data area clamped",
                        padding.left + padding.right,
                        padding.top + padding.bottom,
                        figure_rect.width(),
                        figure_rect.height()
                    );
                }
                figure_rect.contract(padding)
            }
            LayoutMode::FixedPadding(padding) => figure_rect.contract(padding),
            LayoutMode::FixedDataRect(rect) => rect.contract(PixelPadding::default()),
        };

        let panels = placed
            .into_iter()
            .map(|(panel, edge, size, offset)| PanelLayout {
                id: panel.id(),
                edge,
                size,
                offset,
                rect: panel.panel_rect(data_rect, size, offset),
            })
            .collect();

        debug!(
            "Layout {}x{}: data rect ({}, {})..({}, {})",
            figure_rect.width(),
            figure_rect.height(),
            data_rect.left,
            data_rect.top,
            data_rect.right,
            data_rect.bottom
        );

        LayoutDetails {
            figure_rect,
            data_rect,
            panels,
        }
    }
}

/// Measured sizes must be finite and non-negative
fn sanitize(size: f32) -> f32 {
    if size.is_finite() && size > 0.0 { size } else { 0.0 }
}

#[derive(Debug, Default)]
struct EdgeTotals {
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
}

impl EdgeTotals {
    fn slot(&mut self, edge: Edge) -> &mut f32 {
        match edge {
            Edge::Left => &mut self.left,
            Edge::Right => &mut self.right,
            Edge::Top => &mut self.top,
            Edge::Bottom => &mut self.bottom,
        }
    }

    fn get(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    fn add(&mut self, edge: Edge, size: f32) {
        *self.slot(edge) += size;
    }
}
