//! Render orchestration
//!
//! A pass runs its steps strictly in order: layout, figure background, data
//! background, grids beneath the data, plottables, grids above the data, then
//! panels. A failing step aborts the pass. Whatever earlier steps painted stays
//! on the canvas and the previously published [`RenderDetails`] remains the
//! last render of record.

use core::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use embedded_graphics::prelude::*;
use log::{debug, warn};

use crate::axes::AxisId;
use crate::canvas::{Canvas, Surface};
use crate::error::validate_size;
use crate::layout::{LayoutDetails, LayoutManager};
use crate::panels::Panel;
use crate::primitives::{AxisLimits, PixelRect};
use crate::scene::Scene;
use crate::{PlotError, PlotResult};

/// Stage of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderStep {
    Layout,
    FigureBackground,
    DataBackground,
    GridsBeneath,
    Plottables,
    GridsAbove,
    Panels,
}

impl RenderStep {
    /// Every step in execution order
    pub const ALL: [RenderStep; 7] = [
        RenderStep::Layout,
        RenderStep::FigureBackground,
        RenderStep::DataBackground,
        RenderStep::GridsBeneath,
        RenderStep::Plottables,
        RenderStep::GridsAbove,
        RenderStep::Panels,
    ];
}

impl fmt::Display for RenderStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderStep::Layout => "layout",
            RenderStep::FigureBackground => "figure background",
            RenderStep::DataBackground => "data background",
            RenderStep::GridsBeneath => "grids beneath plottables",
            RenderStep::Plottables => "plottables",
            RenderStep::GridsAbove => "grids above plottables",
            RenderStep::Panels => "panels",
        };
        f.write_str(name)
    }
}

/// How long one step took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    pub step: RenderStep,
    pub elapsed: Duration,
}

/// Record of a completed render pass
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDetails {
    /// Area rendered into, in logical pixels
    pub figure_rect: PixelRect,
    /// Area plottables were drawn into, in logical pixels
    pub data_rect: PixelRect,
    pub layout: LayoutDetails,
    pub scale_factor: f32,
    /// Limits of every axis at the time of the pass
    pub axis_limits: Vec<(AxisId, AxisLimits)>,
    pub timings: Vec<StepTiming>,
    pub elapsed: Duration,
    /// Completed passes so far, 0 before the first
    pub count: u64,
    pub plottables_rendered: usize,
    pub panels_rendered: usize,
    /// Limits differ from the previous pass
    pub axis_limits_changed: bool,
    /// Figure size differs from the previous pass
    pub size_changed: bool,
}

impl Default for RenderDetails {
    fn default() -> Self {
        Self {
            figure_rect: PixelRect::default(),
            data_rect: PixelRect::default(),
            layout: LayoutDetails::default(),
            scale_factor: 1.0,
            axis_limits: Vec::new(),
            timings: Vec::new(),
            elapsed: Duration::ZERO,
            count: 0,
            plottables_rendered: 0,
            panels_rendered: 0,
            axis_limits_changed: false,
            size_changed: false,
        }
    }
}

impl RenderDetails {
    pub fn has_rendered(&self) -> bool {
        self.count > 0
    }

    /// Limits recorded for `id`, `None` when the axis did not exist
    pub fn axis_limits(&self, id: AxisId) -> Option<AxisLimits> {
        self.axis_limits
            .iter()
            .find(|(axis, _)| *axis == id)
            .map(|(_, limits)| *limits)
    }

    pub fn timing(&self, step: RenderStep) -> Option<Duration> {
        self.timings
            .iter()
            .find(|timing| timing.step == step)
            .map(|timing| timing.elapsed)
    }

    /// Same figure, data rectangle and panel geometry
    pub fn is_layout_equivalent(&self, other: &RenderDetails) -> bool {
        self.figure_rect == other.figure_rect
            && self.data_rect == other.data_rect
            && self.layout == other.layout
    }
}

/// Runs render passes and publishes their details
#[derive(Debug, Default)]
pub struct RenderManager {
    last: Arc<RenderDetails>,
}

impl RenderManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Details of the most recent successful pass
    pub fn last_render(&self) -> Arc<RenderDetails> {
        Arc::clone(&self.last)
    }

    /// Render `scene` over the whole canvas
    pub fn render(&mut self, canvas: &mut dyn Canvas, scene: &mut Scene) -> PlotResult<Arc<RenderDetails>> {
        let size = canvas.size();
        validate_size(size.width, size.height)?;
        scene.config.validate()?;

        let scale = scene.config.scale_factor;
        let figure = PixelRect::from_size(size.width as f32 / scale, size.height as f32 / scale);
        self.render_in(canvas, scene, figure)
    }

    /// Render `scene` into `output_rect` (logical pixels) of the canvas
    ///
    /// Nothing outside `output_rect` is touched.
    pub fn render_in(
        &mut self,
        canvas: &mut dyn Canvas,
        scene: &mut Scene,
        output_rect: PixelRect,
    ) -> PlotResult<Arc<RenderDetails>> {
        scene.config.validate()?;
        let finite = [output_rect.left, output_rect.right, output_rect.top, output_rect.bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite || output_rect.width() < 1.0 || output_rect.height() < 1.0 {
            return Err(PlotError::invalid_argument(format!(
                "output rectangle must be finite and at least 1x1 (got {output_rect:?})"
            )));
        }

        let started = Instant::now();
        let mut surface = Surface::new(canvas, scene.config.scale_factor);
        let mut pass = Pass::default();
        surface.with_clip(output_rect.to_rectangle(), |surface| {
            pass.run(surface, scene, output_rect)
        })?;

        let details = self.publish(pass, scene, output_rect, started.elapsed());
        debug!(
            "Render #{} finished in {:?}: {} plottables, {} panels",
            details.count, details.elapsed, details.plottables_rendered, details.panels_rendered
        );
        Ok(details)
    }

    fn publish(
        &mut self,
        pass: Pass,
        scene: &Scene,
        figure_rect: PixelRect,
        elapsed: Duration,
    ) -> Arc<RenderDetails> {
        let previous = &self.last;
        let axis_limits: Vec<_> = scene
            .axes
            .iter()
            .map(|axis| (axis.id(), axis.limits()))
            .collect();
        let layout = pass.layout.unwrap_or_default();

        let details = RenderDetails {
            figure_rect,
            data_rect: layout.data_rect,
            layout,
            scale_factor: scene.config.scale_factor,
            axis_limits_changed: previous.has_rendered() && previous.axis_limits != axis_limits,
            size_changed: previous.has_rendered()
                && (previous.figure_rect.width() != figure_rect.width()
                    || previous.figure_rect.height() != figure_rect.height()),
            axis_limits,
            timings: pass.timings,
            elapsed,
            count: previous.count + 1,
            plottables_rendered: pass.plottables_rendered,
            panels_rendered: pass.panels_rendered,
        };

        self.last = Arc::new(details);
        Arc::clone(&self.last)
    }
}

/// State accumulated while a pass runs
#[derive(Default)]
struct Pass {
    timings: Vec<StepTiming>,
    layout: Option<LayoutDetails>,
    plottables_rendered: usize,
    panels_rendered: usize,
}

impl Pass {
    /// Time `step` and wrap any failure in a `RenderFailure`
    fn step<T>(&mut self, step: RenderStep, run: impl FnOnce(&mut Self) -> PlotResult<T>) -> PlotResult<T> {
        let started = Instant::now();
        let result = run(self);
        self.timings.push(StepTiming {
            step,
            elapsed: started.elapsed(),
        });

        result.map_err(|err| {
            let message = match err {
                PlotError::RenderFailure { message, .. } => message,
                other => other.to_string(),
            };
            warn!("Render aborted during {step}: {message}");
            PlotError::RenderFailure { step, message }
        })
    }

    fn run(&mut self, surface: &mut Surface<'_>, scene: &mut Scene, figure_rect: PixelRect) -> PlotResult<()> {
        let layout = self.step(RenderStep::Layout, |_| {
            scene.prepare(figure_rect);
            let manager = LayoutManager::new(scene.config.layout);
            Ok(manager.compute(figure_rect, &scene.ordered_panels()))
        })?;
        let data_rect = layout.data_rect;
        let scene: &Scene = scene;

        self.step(RenderStep::FigureBackground, |_| {
            surface.fill_solid(&figure_rect.to_rectangle(), scene.config.figure_background.rgb888())?;
            Ok(())
        })?;

        self.step(RenderStep::DataBackground, |_| {
            surface.fill_solid(&data_rect.to_rectangle(), scene.config.data_background.rgb888())?;
            Ok(())
        })?;

        self.step(RenderStep::GridsBeneath, |_| {
            render_grids(surface, scene, data_rect, true)
        })?;

        self.step(RenderStep::Plottables, |pass| {
            for entry in scene.plottables.iter().filter(|e| e.plottable.is_visible()) {
                let (x_axis, y_axis) = scene.axes.pair(entry.axes)?;
                let x = x_axis.transform(data_rect);
                let y = y_axis.transform(data_rect);
                surface.with_clip(data_rect.to_rectangle(), |surface| {
                    entry.plottable.render(surface, data_rect, &x, &y)
                })?;
                pass.plottables_rendered += 1;
            }
            Ok(())
        })?;

        self.step(RenderStep::GridsAbove, |_| {
            render_grids(surface, scene, data_rect, false)
        })?;

        self.step(RenderStep::Panels, |pass| {
            let panels = scene.ordered_panels();
            for (panel, placed) in panels.iter().zip(&layout.panels) {
                if !panel.is_visible() {
                    continue;
                }
                panel.render(surface, placed.rect, data_rect)?;
                pass.panels_rendered += 1;
            }
            Ok(())
        })?;

        self.layout = Some(layout);
        Ok(())
    }
}

fn render_grids(
    surface: &mut Surface<'_>,
    scene: &Scene,
    data_rect: PixelRect,
    beneath: bool,
) -> PlotResult<()> {
    let grids = scene
        .grids()
        .filter(|grid| grid.is_visible() && grid.is_beneath_plottables() == beneath);

    for grid in grids {
        let (x_axis, y_axis) = scene.axes.pair(grid.axes())?;
        surface.with_clip(data_rect.to_rectangle(), |surface| {
            grid.render(surface, data_rect, x_axis, y_axis)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Bitmap;
    use crate::config::PlotConfig;
    use crate::plottable::{Plottable, PlottableId};
    use crate::plottables::Series;
    use crate::primitives::{CoordinateRect, Coordinates};
    use crate::scene::PlottableEntry;
    use crate::style::{self, Color};
    use crate::transform::AxisTransform;
    use embedded_graphics::pixelcolor::Rgb888;

    /// Plottable that always fails
    struct Broken;

    impl Plottable for Broken {
        fn render(
            &self,
            _surface: &mut Surface<'_>,
            _data_rect: PixelRect,
            _x: &AxisTransform,
            _y: &AxisTransform,
        ) -> PlotResult<()> {
            Err(PlotError::invalid_operation("broken plottable"))
        }

        fn axis_limits(&self) -> Option<CoordinateRect> {
            None
        }
    }

    fn push(scene: &mut Scene, plottable: Box<dyn Plottable>) {
        let axes = scene.axes.default_pair();
        scene.plottables.push(PlottableEntry {
            id: PlottableId::next(),
            axes,
            plottable,
        });
    }

    fn colored_scene() -> Scene {
        let config = PlotConfig {
            figure_background: Color::new(10, 20, 30),
            data_background: Color::new(200, 210, 220),
            ..PlotConfig::default()
        };
        Scene::new(config)
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn published_details_can_cross_threads() {
        assert_send_sync::<RenderDetails>();
        assert_send_sync::<Arc<RenderDetails>>();

        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        let mut bitmap = Bitmap::new(64, 48).unwrap();
        let details = manager.render(&mut bitmap, &mut scene).unwrap();
        let count = std::thread::spawn(move || details.count).join().unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        let mut bitmap = Bitmap::new(10, 10).unwrap();
        let result = manager.render_in(&mut bitmap, &mut scene, PixelRect::from_size(0.0, 10.0));
        assert!(matches!(result, Err(PlotError::InvalidArgument { .. })));
        assert!(!manager.last_render().has_rendered());
    }

    #[test]
    fn backgrounds_fill_their_rects() {
        let mut manager = RenderManager::new();
        let mut scene = colored_scene();
        let mut bitmap = Bitmap::new(200, 150).unwrap();
        let details = manager.render(&mut bitmap, &mut scene).unwrap();

        let data = details.data_rect;
        assert!(!data.is_empty());
        // A quarter of the way in sits between grid lines
        let x = (data.left + data.width() / 4.0) as u32;
        let y = (data.top + data.height() / 4.0) as u32;
        assert_eq!(bitmap.pixel(x, y), Some(Rgb888::new(200, 210, 220)));
        // Bottom-left corner lies outside every panel
        assert_eq!(bitmap.pixel(0, 149), Some(Rgb888::new(10, 20, 30)));
    }

    #[test]
    fn steps_are_timed_in_order() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        let mut bitmap = Bitmap::new(64, 48).unwrap();
        let details = manager.render(&mut bitmap, &mut scene).unwrap();

        let steps: Vec<_> = details.timings.iter().map(|t| t.step).collect();
        assert_eq!(steps, RenderStep::ALL);
        assert_eq!(details.count, 1);
    }

    #[test]
    fn repeated_renders_are_layout_equivalent() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        push(
            &mut scene,
            Box::new(Series::new([Coordinates::new(0.0, 0.0), Coordinates::new(3.0, 9.0)])),
        );
        let mut bitmap = Bitmap::new(320, 240).unwrap();

        let first = manager.render(&mut bitmap, &mut scene).unwrap();
        let second = manager.render(&mut bitmap, &mut scene).unwrap();
        assert!(first.is_layout_equivalent(&second));
        assert_eq!(second.count, 2);
        assert!(!second.axis_limits_changed);
        assert!(!second.size_changed);
        assert_eq!(second.plottables_rendered, 1);
    }

    #[test]
    fn failure_keeps_previous_details() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        let mut bitmap = Bitmap::new(100, 100).unwrap();
        let good = manager.render(&mut bitmap, &mut scene).unwrap();

        push(&mut scene, Box::new(Broken));
        let err = manager.render(&mut bitmap, &mut scene).unwrap_err();
        assert!(matches!(
            err,
            PlotError::RenderFailure {
                step: RenderStep::Plottables,
                ..
            }
        ));
        assert_eq!(*manager.last_render(), *good);
    }

    #[test]
    fn render_in_leaves_outside_untouched() {
        let mut manager = RenderManager::new();
        let mut scene = colored_scene();
        let mut bitmap = Bitmap::new(100, 100).unwrap();
        manager
            .render_in(&mut bitmap, &mut scene, PixelRect::new(50.0, 100.0, 0.0, 100.0))
            .unwrap();

        assert_eq!(bitmap.pixel(10, 10), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(50, 99), Some(Rgb888::new(10, 20, 30)));
    }

    #[test]
    fn scale_factor_halves_the_logical_figure() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default().with_scale_factor(2.0));
        let mut bitmap = Bitmap::new(200, 100).unwrap();
        let details = manager.render(&mut bitmap, &mut scene).unwrap();

        assert_eq!(details.figure_rect, PixelRect::from_size(100.0, 50.0));
        assert_eq!(bitmap.pixel(199, 0), Some(style::WHITE.rgb888()));
    }

    #[test]
    fn limit_and_size_changes_are_flagged() {
        let mut manager = RenderManager::new();
        let mut scene = Scene::new(PlotConfig::default());
        let mut small = Bitmap::new(80, 60).unwrap();
        let mut large = Bitmap::new(120, 90).unwrap();

        manager.render(&mut small, &mut scene).unwrap();
        let limits = AxisLimits::new(0.0, 1.0).unwrap();
        scene.axes.set_limits(limits, limits);
        let details = manager.render(&mut large, &mut scene).unwrap();
        assert!(details.axis_limits_changed);
        assert!(details.size_changed);
    }
}
