//! The plot facade
//!
//! [`Plot`] owns a scene and a render manager. Application code adds
//! plottables and decorations, renders onto any [`Canvas`] or into an image,
//! and converts between pixels and coordinates using the last render.
//!
//! A plot is single-threaded: renders on one instance must be serialized by
//! the caller. The published [`RenderDetails`] is an immutable snapshot and may
//! be handed to other threads.

use std::path::Path;
use std::sync::Arc;

use crate::axes::{Axis, AxisId, AxisManager, AxisPair};
use crate::canvas::{Bitmap, Canvas};
use crate::config::PlotConfig;
use crate::error::validate_size;
use crate::export::{self, ImageFormat};
use crate::grid::{DefaultGrid, Grid};
use crate::panels::{Legend, Panel, PanelId, Title};
use crate::plottable::{Plottable, PlottableId};
use crate::primitives::{AxisLimits, CoordinateRect, Coordinates, PixelPoint, PixelRect};
use crate::render::{RenderDetails, RenderManager};
use crate::scene::{PlottableEntry, Scene};
use crate::transform::AxisTransform;
use crate::{PlotError, PlotResult};

/// An interactive 2D plot
pub struct Plot {
    scene: Scene,
    renderer: RenderManager,
}

impl Default for Plot {
    fn default() -> Self {
        Self::new()
    }
}

impl Plot {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(PlotConfig::default()),
            renderer: RenderManager::new(),
        }
    }

    /// Plot styled by `config`
    pub fn with_config(config: PlotConfig) -> PlotResult<Self> {
        config.validate()?;
        Ok(Self {
            scene: Scene::new(config),
            renderer: RenderManager::new(),
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.scene.config
    }

    /// Replace the configuration and restyle the built-in elements
    pub fn set_config(&mut self, config: PlotConfig) -> PlotResult<()> {
        config.validate()?;
        self.scene.config = config;
        self.scene.apply_config();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Plottables
    // ------------------------------------------------------------------

    /// Add a plottable on the default bottom/left axes, drawn above the others
    pub fn add(&mut self, plottable: impl Plottable + 'static) -> PlottableId {
        let axes = self.scene.axes.default_pair();
        self.push(Box::new(plottable), axes)
    }

    /// Add a plottable bound to a specific axis pair
    ///
    /// `axes.x` must be a top or bottom axis and `axes.y` a left or right one.
    pub fn add_with_axes(
        &mut self,
        plottable: impl Plottable + 'static,
        axes: AxisPair,
    ) -> PlotResult<PlottableId> {
        self.scene.axes.validate_pair(axes)?;
        Ok(self.push(Box::new(plottable), axes))
    }

    fn push(&mut self, plottable: Box<dyn Plottable>, axes: AxisPair) -> PlottableId {
        let id = PlottableId::next();
        self.scene.plottables.push(PlottableEntry {
            id,
            axes,
            plottable,
        });
        id
    }

    /// Remove a plottable, keeping the relative order of the rest
    pub fn remove(&mut self, id: PlottableId) -> Option<Box<dyn Plottable>> {
        let index = self.scene.plottable_index(id)?;
        Some(self.scene.plottables.remove(index).plottable)
    }

    pub fn clear(&mut self) {
        self.scene.plottables.clear();
    }

    /// Draw `id` above every other plottable
    pub fn move_to_front(&mut self, id: PlottableId) -> PlotResult<()> {
        let index = self.index_of(id)?;
        let entry = self.scene.plottables.remove(index);
        self.scene.plottables.push(entry);
        Ok(())
    }

    /// Draw `id` beneath every other plottable
    pub fn move_to_back(&mut self, id: PlottableId) -> PlotResult<()> {
        let index = self.index_of(id)?;
        let entry = self.scene.plottables.remove(index);
        self.scene.plottables.insert(0, entry);
        Ok(())
    }

    fn index_of(&self, id: PlottableId) -> PlotResult<usize> {
        self.scene
            .plottable_index(id)
            .ok_or_else(|| PlotError::invalid_argument(format!("no plottable with id {id:?}")))
    }

    /// Plottables in draw order
    pub fn plottables(&self) -> impl Iterator<Item = &dyn Plottable> {
        self.scene.plottables.iter().map(|entry| entry.plottable.as_ref())
    }

    pub fn plottable_ids(&self) -> Vec<PlottableId> {
        self.scene.plottables.iter().map(|entry| entry.id).collect()
    }

    pub fn plottable(&self, id: PlottableId) -> Option<&dyn Plottable> {
        let index = self.scene.plottable_index(id)?;
        Some(self.scene.plottables[index].plottable.as_ref())
    }

    // ------------------------------------------------------------------
    // Axes and limits
    // ------------------------------------------------------------------

    pub fn axes(&self) -> &AxisManager {
        &self.scene.axes
    }

    pub fn axes_mut(&mut self) -> &mut AxisManager {
        &mut self.scene.axes
    }

    /// Remove an added axis
    ///
    /// Refused while a plottable or grid is still bound to it, and for the
    /// four default axes.
    pub fn remove_axis(&mut self, id: AxisId) -> PlotResult<Axis> {
        let bound = |pair: AxisPair| pair.x == id || pair.y == id;
        let plottables = self.scene.plottables.iter().filter(|e| bound(e.axes)).count();
        let grids = self.scene.grids().filter(|g| bound(g.axes())).count();
        if plottables + grids > 0 {
            return Err(PlotError::invalid_operation(format!(
                "axis {id:?} is still used by {plottables} plottables and {grids} grids"
            )));
        }
        self.scene.axes.remove_axis(id)
    }

    /// Set the limits of the default bottom/left axes
    pub fn set_limits(&mut self, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> PlotResult<()> {
        let x = AxisLimits::new(x_min, x_max)?;
        let y = AxisLimits::new(y_min, y_max)?;
        self.scene.axes.set_limits(x, y);
        Ok(())
    }

    /// Limits of the default bottom/left axes
    pub fn limits(&self) -> CoordinateRect {
        self.scene.axes.limits()
    }

    /// Fit every axis to its plottables
    pub fn autoscale(&mut self) {
        self.scene.autoscale();
    }

    /// Move the view of the default axes by a drag of `dx`/`dy` physical pixels
    pub fn pan(&mut self, dx: f32, dy: f32) -> PlotResult<()> {
        let (data_rect, scale) = self.last_geometry()?;
        let pair = self.scene.axes.default_pair();
        let delta = PixelPoint::new(dx / scale, dy / scale);
        self.scene.axes.pan(pair, delta, data_rect)
    }

    /// Zoom the default axes about a physical pixel
    ///
    /// Fractions above 1 zoom in.
    pub fn zoom(&mut self, fx: f64, fy: f64, about: PixelPoint) -> PlotResult<()> {
        let (data_rect, scale) = self.last_geometry()?;
        let pair = self.scene.axes.default_pair();
        let about = PixelPoint::new(about.x / scale, about.y / scale);
        self.scene.axes.zoom(pair, fx, fy, about, data_rect)
    }

    fn last_geometry(&self) -> PlotResult<(PixelRect, f32)> {
        let details = self.rendered()?;
        Ok((details.data_rect, details.scale_factor))
    }

    // ------------------------------------------------------------------
    // Rendering and export
    // ------------------------------------------------------------------

    /// Render over the whole canvas
    pub fn render(&mut self, canvas: &mut dyn Canvas) -> PlotResult<Arc<RenderDetails>> {
        self.renderer.render(canvas, &mut self.scene)
    }

    /// Render into a logical-pixel rectangle of the canvas
    pub fn render_in(
        &mut self,
        canvas: &mut dyn Canvas,
        output_rect: PixelRect,
    ) -> PlotResult<Arc<RenderDetails>> {
        self.renderer.render_in(canvas, &mut self.scene, output_rect)
    }

    /// Render into a fresh `width` x `height` bitmap (physical pixels)
    pub fn get_image(&mut self, width: u32, height: u32) -> PlotResult<Bitmap> {
        validate_size(width, height)?;
        let mut bitmap = Bitmap::new(width, height)?;
        self.render(&mut bitmap)?;
        Ok(bitmap)
    }

    /// Render and encode to image bytes
    pub fn encode(&mut self, width: u32, height: u32, format: ImageFormat) -> PlotResult<Vec<u8>> {
        format.ensure_supported()?;
        let bitmap = self.get_image(width, height)?;
        export::encode(&bitmap, format)
    }

    /// Render and save, choosing the format from the file extension
    pub fn save(&mut self, path: impl AsRef<Path>, width: u32, height: u32) -> PlotResult<()> {
        let format = ImageFormat::from_path(path.as_ref())?;
        self.save_as(path, width, height, format)
    }

    /// Render and save in an explicit format
    pub fn save_as(
        &mut self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> PlotResult<()> {
        format.ensure_supported()?;
        let bitmap = self.get_image(width, height)?;
        export::save(&bitmap, path, format)
    }

    pub fn last_render(&self) -> Arc<RenderDetails> {
        self.renderer.last_render()
    }

    // ------------------------------------------------------------------
    // Pixel <-> coordinate conversion
    // ------------------------------------------------------------------

    fn rendered(&self) -> PlotResult<Arc<RenderDetails>> {
        let details = self.renderer.last_render();
        if !details.has_rendered() {
            return Err(PlotError::invalid_operation(
                "the plot has not been rendered yet; render before converting pixels",
            ));
        }
        Ok(details)
    }

    /// Transforms for `axes` as they were during the last render
    fn recorded_transforms(&self, axes: AxisPair) -> PlotResult<(AxisTransform, AxisTransform)> {
        let details = self.rendered()?;
        self.scene.axes.validate_pair(axes)?;
        let limits = |id| {
            details.axis_limits(id).ok_or_else(|| {
                PlotError::invalid_operation(format!("axis {id:?} was not part of the last render"))
            })
        };
        let scale = details.scale_factor;
        Ok((
            AxisTransform::horizontal(limits(axes.x)?, details.data_rect).with_scale_factor(scale),
            AxisTransform::vertical(limits(axes.y)?, details.data_rect).with_scale_factor(scale),
        ))
    }

    /// Physical pixel of a data point
    pub fn get_pixel(&self, coordinates: Coordinates, axes: AxisPair) -> PlotResult<PixelPoint> {
        let (x, y) = self.recorded_transforms(axes)?;
        Ok(PixelPoint::new(
            x.to_pixel(coordinates.x),
            y.to_pixel(coordinates.y),
        ))
    }

    /// Data point under a physical pixel
    pub fn get_coordinates(&self, pixel: PixelPoint, axes: AxisPair) -> PlotResult<Coordinates> {
        let (x, y) = self.recorded_transforms(axes)?;
        Ok(Coordinates::new(x.to_coordinate(pixel.x), y.to_coordinate(pixel.y)))
    }

    /// Data rectangle covered by a square of `radius` physical pixels around `pixel`
    pub fn get_coordinate_rect(
        &self,
        pixel: PixelPoint,
        radius: f32,
        axes: AxisPair,
    ) -> PlotResult<CoordinateRect> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PlotError::invalid_argument(format!(
                "radius must be finite and non-negative (got {radius})"
            )));
        }
        let (x, y) = self.recorded_transforms(axes)?;
        let (x0, x1) = (x.to_coordinate(pixel.x - radius), x.to_coordinate(pixel.x + radius));
        let (y0, y1) = (y.to_coordinate(pixel.y + radius), y.to_coordinate(pixel.y - radius));
        Ok(CoordinateRect::new(x0.min(x1), x0.max(x1), y0.min(y1), y0.max(y1)))
    }

    /// Panel under a physical pixel, the last drawn winning on overlap
    pub fn get_panel(&self, pixel: PixelPoint) -> PlotResult<Option<PanelId>> {
        let details = self.rendered()?;
        let scale = details.scale_factor;
        let logical = PixelPoint::new(pixel.x / scale, pixel.y / scale);
        Ok(details.layout.panel_at(logical))
    }

    // ------------------------------------------------------------------
    // Panels, grids and decorations
    // ------------------------------------------------------------------

    /// Add a decoration, stacked outside the built-in panels on its edge
    pub fn add_panel(&mut self, panel: impl Panel + 'static) -> PanelId {
        let id = panel.id();
        self.scene.panels.push(Box::new(panel));
        id
    }

    /// Remove a panel added with [`add_panel`](Self::add_panel)
    pub fn remove_panel(&mut self, id: PanelId) -> Option<Box<dyn Panel>> {
        let index = self.scene.panels.iter().position(|panel| panel.id() == id)?;
        Some(self.scene.panels.remove(index))
    }

    pub fn has_panel(&self, id: PanelId) -> bool {
        self.scene.contains_panel(id)
    }

    /// Add a grid drawn after the default one
    ///
    /// The grid's axis pair is checked the same way as for
    /// [`add_with_axes`](Self::add_with_axes).
    pub fn add_grid(&mut self, grid: impl Grid + 'static) -> PlotResult<()> {
        self.scene.axes.validate_pair(grid.axes())?;
        self.scene.grids.push(Box::new(grid));
        Ok(())
    }

    pub fn default_grid(&self) -> PlotResult<&DefaultGrid> {
        self.scene.default_grid.as_ref().ok_or_else(no_default_grid)
    }

    pub fn default_grid_mut(&mut self) -> PlotResult<&mut DefaultGrid> {
        self.scene.default_grid.as_mut().ok_or_else(no_default_grid)
    }

    pub fn remove_default_grid(&mut self) -> Option<DefaultGrid> {
        self.scene.default_grid.take()
    }

    pub fn show_grid(&mut self) -> PlotResult<()> {
        self.default_grid_mut()?.visible = true;
        Ok(())
    }

    pub fn hide_grid(&mut self) -> PlotResult<()> {
        self.default_grid_mut()?.visible = false;
        Ok(())
    }

    pub fn legend(&self) -> &Legend {
        &self.scene.legend
    }

    pub fn legend_mut(&mut self) -> &mut Legend {
        &mut self.scene.legend
    }

    pub fn show_legend(&mut self) {
        self.scene.legend.set_visible(true);
    }

    pub fn hide_legend(&mut self) {
        self.scene.legend.set_visible(false);
    }

    pub fn title(&mut self, text: impl Into<String>) -> &mut Title {
        self.scene.title.set_text(text);
        &mut self.scene.title
    }

    /// Label the default bottom axis
    pub fn x_label(&mut self, text: impl Into<String>) {
        self.scene.axes.bottom_mut().label_mut().set_text(text);
    }

    /// Label the default left axis
    pub fn y_label(&mut self, text: impl Into<String>) {
        self.scene.axes.left_mut().label_mut().set_text(text);
    }
}

fn no_default_grid() -> PlotError {
    PlotError::invalid_operation("the default grid has been removed")
}
