//! Everything a render pass draws
//!
//! The scene owns the axes, the built-in panels, user panels, grids and the
//! plottable list. The plot facade mutates it; the render manager reads it.

use log::debug;

use crate::axes::{AxisManager, AxisPair};
use crate::config::PlotConfig;
use crate::grid::{DefaultGrid, Grid};
use crate::panels::{Legend, Panel, PanelId, Title};
use crate::plottable::{Plottable, PlottableId};
use crate::primitives::PixelRect;

/// A plottable together with the axes it is drawn against
pub struct PlottableEntry {
    pub id: PlottableId,
    pub axes: AxisPair,
    pub plottable: Box<dyn Plottable>,
}

/// Axes, panels, grids and plottables of one plot
pub struct Scene {
    pub(crate) config: PlotConfig,
    pub(crate) axes: AxisManager,
    pub(crate) title: Title,
    pub(crate) legend: Legend,
    pub(crate) panels: Vec<Box<dyn Panel>>,
    pub(crate) default_grid: Option<DefaultGrid>,
    pub(crate) grids: Vec<Box<dyn Grid>>,
    /// Insertion order is z-order
    pub(crate) plottables: Vec<PlottableEntry>,
}

impl Scene {
    pub fn new(config: PlotConfig) -> Self {
        let axes = AxisManager::new();
        let default_grid = DefaultGrid::new(axes.default_pair());
        let mut scene = Self {
            config,
            axes,
            title: Title::default(),
            legend: Legend::new(),
            panels: Vec::new(),
            default_grid: Some(default_grid),
            grids: Vec::new(),
            plottables: Vec::new(),
        };
        scene.apply_config();
        scene
    }

    /// Push the configured colours and fonts into every built-in element
    pub(crate) fn apply_config(&mut self) {
        for axis in self.axes.iter_mut() {
            axis.apply_config(&self.config);
        }
        self.title.apply_config(&self.config);
        self.legend.apply_config(&self.config);
        if let Some(grid) = &mut self.default_grid {
            grid.apply_config(&self.config);
        }
    }

    /// Refresh content that depends on the plottables or the figure size
    ///
    /// Runs at the start of every render, before layout.
    pub(crate) fn prepare(&mut self, figure_rect: PixelRect) {
        if !self.axes.limits_set() && self.autoscale() {
            debug!("First render: limits fitted to the data");
        }

        let items = self
            .plottables
            .iter()
            .filter(|entry| entry.plottable.is_visible())
            .flat_map(|entry| entry.plottable.legend_items())
            .collect();
        self.legend.set_items(items);

        self.axes.regenerate_ticks(figure_rect);
        for panel in &mut self.panels {
            panel.prepare(figure_rect);
        }
    }

    /// Fit the axes to every visible plottable
    ///
    /// Returns false, leaving the limits alone, when nothing reports limits.
    pub(crate) fn autoscale(&mut self) -> bool {
        let bounds: Vec<_> = self
            .plottables
            .iter()
            .filter(|entry| entry.plottable.is_visible())
            .filter_map(|entry| entry.plottable.axis_limits().map(|rect| (entry.axes, rect)))
            .collect();
        if bounds.is_empty() {
            return false;
        }
        self.axes.autoscale(bounds, self.config.margins);
        true
    }

    /// Panels in stacking order: axes, title, user panels, legend
    pub(crate) fn ordered_panels(&self) -> Vec<&dyn Panel> {
        let mut panels: Vec<&dyn Panel> = Vec::with_capacity(self.axes.len() + self.panels.len() + 2);
        panels.extend(self.axes.iter().map(|axis| axis as &dyn Panel));
        panels.push(&self.title);
        panels.extend(self.panels.iter().map(|panel| panel.as_ref()));
        panels.push(&self.legend);
        panels
    }

    /// Default grid first, then user grids in insertion order
    pub(crate) fn grids(&self) -> impl Iterator<Item = &dyn Grid> {
        self.default_grid
            .iter()
            .map(|grid| grid as &dyn Grid)
            .chain(self.grids.iter().map(|grid| grid.as_ref()))
    }

    pub(crate) fn plottable_index(&self, id: PlottableId) -> Option<usize> {
        self.plottables.iter().position(|entry| entry.id == id)
    }

    pub(crate) fn contains_panel(&self, id: PanelId) -> bool {
        self.ordered_panels().iter().any(|panel| panel.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plottables::Series;
    use crate::primitives::Coordinates;

    fn entry(scene: &Scene, series: Series) -> PlottableEntry {
        PlottableEntry {
            id: PlottableId::next(),
            axes: scene.axes.default_pair(),
            plottable: Box::new(series),
        }
    }

    #[test]
    fn panel_order_puts_axes_first_and_legend_last() {
        let scene = Scene::new(PlotConfig::default());
        let panels = scene.ordered_panels();
        assert_eq!(panels.len(), 6);
        assert_eq!(panels[0].id(), scene.axes.bottom().id());
        assert_eq!(panels[4].id(), scene.title.id());
        assert_eq!(panels[5].id(), scene.legend.id());
    }

    #[test]
    fn prepare_autoscales_once() {
        let mut scene = Scene::new(PlotConfig::default());
        let series = Series::new([Coordinates::new(0.0, 0.0), Coordinates::new(10.0, 20.0)]);
        let e = entry(&scene, series);
        scene.plottables.push(e);

        scene.prepare(PixelRect::from_size(400.0, 300.0));
        let x = scene.axes.bottom().limits();
        assert!((x.min() - -1.0).abs() < 1e-9);
        assert!((x.max() - 11.0).abs() < 1e-9);
        assert!(scene.axes.limits_set());

        // Later data does not move the view
        let e = entry(&scene, Series::new([Coordinates::new(100.0, 100.0)]));
        scene.plottables.push(e);
        scene.prepare(PixelRect::from_size(400.0, 300.0));
        assert_eq!(scene.axes.bottom().limits(), x);
    }

    #[test]
    fn empty_scene_keeps_default_limits() {
        let mut scene = Scene::new(PlotConfig::default());
        scene.prepare(PixelRect::from_size(400.0, 300.0));
        assert!(!scene.axes.limits_set());
    }

    #[test]
    fn legend_collects_visible_labels() {
        let mut scene = Scene::new(PlotConfig::default());
        let labelled = entry(&scene, Series::default().with_label("a"));
        let mut hidden_series = Series::default().with_label("b");
        hidden_series.set_visible(false);
        let hidden = entry(&scene, hidden_series);
        scene.plottables.push(labelled);
        scene.plottables.push(hidden);

        scene.prepare(PixelRect::from_size(400.0, 300.0));
        assert_eq!(scene.legend.items().len(), 1);
        assert_eq!(scene.legend.items()[0].label, "a");
    }
}
