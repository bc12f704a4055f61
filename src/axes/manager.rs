//! Ownership of every axis in a plot
//!
//! The four default axes always exist: bottom and left start visible, top and
//! right start hidden. Additional axes can be stacked on any edge.

use log::{debug, warn};

use super::{Axis, AxisId, AxisPair};
use crate::config::AutoscaleMargins;
use crate::constants::MIN_DATA_RANGE;
use crate::panels::{Edge, Panel};
use crate::primitives::{AxisLimits, CoordinateRect, PixelPoint, PixelRect};
use crate::{PlotError, PlotResult};

const BOTTOM: usize = 0;
const LEFT: usize = 1;
const TOP: usize = 2;
const RIGHT: usize = 3;
const DEFAULT_AXIS_COUNT: usize = 4;

/// All axes of a plot, defaults first
#[derive(Debug, Clone)]
pub struct AxisManager {
    axes: Vec<Axis>,
    limits_set: bool,
}

impl Default for AxisManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisManager {
    pub fn new() -> Self {
        Self {
            axes: vec![
                Axis::bottom(),
                Axis::left(),
                Axis::top().with_visible(false),
                Axis::right().with_visible(false),
            ],
            limits_set: false,
        }
    }

    pub fn bottom(&self) -> &Axis {
        &self.axes[BOTTOM]
    }

    pub fn bottom_mut(&mut self) -> &mut Axis {
        &mut self.axes[BOTTOM]
    }

    pub fn left(&self) -> &Axis {
        &self.axes[LEFT]
    }

    pub fn left_mut(&mut self) -> &mut Axis {
        &mut self.axes[LEFT]
    }

    pub fn top(&self) -> &Axis {
        &self.axes[TOP]
    }

    pub fn top_mut(&mut self) -> &mut Axis {
        &mut self.axes[TOP]
    }

    pub fn right(&self) -> &Axis {
        &self.axes[RIGHT]
    }

    pub fn right_mut(&mut self) -> &mut Axis {
        &mut self.axes[RIGHT]
    }

    /// Bottom and left axes
    pub fn default_pair(&self) -> AxisPair {
        AxisPair::new(self.axes[BOTTOM].id(), self.axes[LEFT].id())
    }

    /// Add a visible axis stacked outside the existing ones on `edge`
    pub fn add_axis(&mut self, edge: Edge) -> AxisId {
        self.add(Axis::new(edge))
    }

    /// Take ownership of a configured axis
    pub fn add(&mut self, axis: Axis) -> AxisId {
        let id = axis.id();
        debug!("Adding {:?} axis {:?}", axis.edge(), id);
        self.axes.push(axis);
        id
    }

    /// Remove an added axis; the four defaults cannot be removed
    ///
    /// Callers must make sure nothing in the scene is still bound to `id`.
    pub(crate) fn remove_axis(&mut self, id: AxisId) -> PlotResult<Axis> {
        let index = self
            .index_of(id)
            .ok_or_else(|| PlotError::invalid_argument(format!("no axis with id {id:?}")))?;
        if index < DEFAULT_AXIS_COUNT {
            return Err(PlotError::invalid_operation(
                "default axes cannot be removed, hide them instead",
            ));
        }
        Ok(self.axes.remove(index))
    }

    fn index_of(&self, id: AxisId) -> Option<usize> {
        self.axes.iter().position(|axis| axis.id() == id)
    }

    pub fn contains(&self, id: AxisId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: AxisId) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.id() == id)
    }

    pub fn get_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.iter_mut().find(|axis| axis.id() == id)
    }

    /// Both axes of a pair, or `InvalidOperation` naming the missing one
    pub fn pair(&self, pair: AxisPair) -> PlotResult<(&Axis, &Axis)> {
        let lookup = |id: AxisId| {
            self.get(id)
                .ok_or_else(|| PlotError::invalid_operation(format!("axis {id:?} does not exist")))
        };
        Ok((lookup(pair.x)?, lookup(pair.y)?))
    }

    /// Check that both axes exist, `x` lies on the top or bottom edge and `y`
    /// on the left or right edge
    pub fn validate_pair(&self, pair: AxisPair) -> PlotResult<()> {
        let lookup = |id: AxisId| {
            self.get(id)
                .ok_or_else(|| PlotError::invalid_argument(format!("no axis with id {id:?}")))
        };
        let (x, y) = (lookup(pair.x)?, lookup(pair.y)?);
        if !x.is_horizontal() {
            return Err(PlotError::invalid_argument(format!(
                "x axis {:?} sits on the {:?} edge, expected top or bottom",
                pair.x,
                x.edge()
            )));
        }
        if y.is_horizontal() {
            return Err(PlotError::invalid_argument(format!(
                "y axis {:?} sits on the {:?} edge, expected left or right",
                pair.y,
                y.edge()
            )));
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axis> {
        self.axes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Axis> {
        self.axes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Whether limits were set explicitly or by a previous autoscale
    pub fn limits_set(&self) -> bool {
        self.limits_set
    }

    /// Set the limits of the default pair
    pub fn set_limits(&mut self, x: AxisLimits, y: AxisLimits) {
        self.axes[BOTTOM].set_limits(x);
        self.axes[LEFT].set_limits(y);
        self.limits_set = true;
    }

    pub fn set_axis_limits(&mut self, id: AxisId, limits: AxisLimits) -> PlotResult<()> {
        let axis = self
            .get_mut(id)
            .ok_or_else(|| PlotError::invalid_argument(format!("no axis with id {id:?}")))?;
        axis.set_limits(limits);
        self.limits_set = true;
        Ok(())
    }

    /// Limits of the default pair
    pub fn limits(&self) -> CoordinateRect {
        CoordinateRect::from_limits(self.axes[BOTTOM].limits(), self.axes[LEFT].limits())
    }

    pub fn axis_limits(&self, id: AxisId) -> Option<AxisLimits> {
        self.get(id).map(Axis::limits)
    }

    /// Fit every axis to the union of the data bound to it, plus margins
    ///
    /// Axes with no data keep their limits. Zero-span data is widened to a
    /// minimum range so the transform stays invertible.
    pub fn autoscale(
        &mut self,
        bounds: impl IntoIterator<Item = (AxisPair, CoordinateRect)>,
        margins: AutoscaleMargins,
    ) {
        // Raw extents per axis; validated once all bounds are merged
        let mut extents: Vec<(AxisId, f64, f64)> = Vec::new();
        let mut merge = |id: AxisId, min: f64, max: f64| {
            if !min.is_finite() || !max.is_finite() || min > max {
                return;
            }
            match extents.iter_mut().find(|(eid, _, _)| *eid == id) {
                Some((_, lo, hi)) => {
                    *lo = lo.min(min);
                    *hi = hi.max(max);
                }
                None => extents.push((id, min, max)),
            }
        };
        for (pair, rect) in bounds {
            merge(pair.x, rect.left, rect.right);
            merge(pair.y, rect.bottom, rect.top);
        }

        for (id, min, max) in extents {
            let Ok(limits) = AxisLimits::new(min, max) else {
                warn!("Data on axis {id:?} spans {min}..{max}, too wide to autoscale");
                continue;
            };
            if let Some(axis) = self.get_mut(id) {
                let margin = if axis.is_horizontal() {
                    margins.x
                } else {
                    margins.y
                };
                // Margins that overflow fall back to the bare data range
                let padded = limits.with_margin(margin, MIN_DATA_RANGE).unwrap_or(limits);
                debug!("Autoscaled axis {id:?} to {}..{}", padded.min(), padded.max());
                axis.set_limits(padded);
            }
        }
        self.limits_set = true;
    }

    /// Shift a pair's limits so the data under `delta` pixels of drag follows
    /// the cursor
    pub fn pan(&mut self, pair: AxisPair, delta: PixelPoint, data_rect: PixelRect) -> PlotResult<()> {
        let (x_axis, y_axis) = self.pair(pair)?;
        let dx = x_axis.transform(data_rect).distance_to_coordinates(delta.x);
        let dy = y_axis.transform(data_rect).distance_to_coordinates(delta.y);
        if !dx.is_finite() || !dy.is_finite() {
            return Err(PlotError::invalid_operation(
                "cannot pan an axis with zero-width limits or an empty data area",
            ));
        }

        // Dragging right moves the view left; pixel y grows downward so the
        // vertical shift keeps its sign.
        let x = x_axis.limits().pan(-dx)?;
        let y = y_axis.limits().pan(dy)?;
        self.apply(pair, x, y)
    }

    /// Zoom a pair's limits by `fx`/`fy` keeping the data under `about` fixed
    ///
    /// Fractions above 1 zoom in. A fraction of exactly 1 leaves that axis alone.
    /// Zero-width limits are first widened to the minimum data range.
    pub fn zoom(
        &mut self,
        pair: AxisPair,
        fx: f64,
        fy: f64,
        about: PixelPoint,
        data_rect: PixelRect,
    ) -> PlotResult<()> {
        let (x_axis, y_axis) = self.pair(pair)?;
        let anchor = |axis: &Axis, pixel: f32| {
            let coordinate = axis.get_coordinate(pixel, data_rect);
            if coordinate.is_finite() {
                coordinate
            } else {
                axis.limits().center()
            }
        };

        let zoomed = |axis: &Axis, fraction: f64, pixel: f32| -> PlotResult<AxisLimits> {
            let limits = axis.limits();
            if limits.is_zero_width() {
                return limits.with_margin(0.0, MIN_DATA_RANGE)?.zoom(fraction, limits.center());
            }
            limits.zoom(fraction, anchor(axis, pixel))
        };

        let x = zoomed(x_axis, fx, about.x)?;
        let y = zoomed(y_axis, fy, about.y)?;
        self.apply(pair, x, y)
    }

    fn apply(&mut self, pair: AxisPair, x: AxisLimits, y: AxisLimits) -> PlotResult<()> {
        self.set_axis_limits(pair.x, x)?;
        self.set_axis_limits(pair.y, y)
    }

    /// Regenerate every axis's ticks for the given figure size
    pub fn regenerate_ticks(&mut self, figure_rect: PixelRect) {
        for axis in &mut self.axes {
            let length = if axis.is_horizontal() {
                figure_rect.width()
            } else {
                figure_rect.height()
            };
            axis.regenerate_ticks(length);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_AXIS_MAX, DEFAULT_AXIS_MIN};

    fn limits(min: f64, max: f64) -> AxisLimits {
        AxisLimits::new(min, max).unwrap()
    }

    #[test]
    fn defaults_are_bottom_left_visible() {
        let manager = AxisManager::new();
        assert!(manager.bottom().is_visible());
        assert!(manager.left().is_visible());
        assert!(!manager.top().is_visible());
        assert!(!manager.right().is_visible());
        assert!(!manager.limits_set());
    }

    #[test]
    fn default_axes_cannot_be_removed() {
        let mut manager = AxisManager::new();
        let id = manager.bottom().id();
        assert!(matches!(
            manager.remove_axis(id),
            Err(PlotError::InvalidOperation { .. })
        ));

        let extra = manager.add_axis(Edge::Right);
        assert_eq!(manager.len(), 5);
        assert_eq!(manager.remove_axis(extra).unwrap().id(), extra);
        assert!(!manager.contains(extra));
    }

    #[test]
    fn autoscale_unions_and_pads() {
        let mut manager = AxisManager::new();
        let pair = manager.default_pair();
        manager.autoscale(
            [
                (pair, CoordinateRect::new(0.0, 10.0, 0.0, 1.0)),
                (pair, CoordinateRect::new(5.0, 20.0, -1.0, 0.5)),
            ],
            AutoscaleMargins { x: 0.1, y: 0.0 },
        );

        let rect = manager.limits();
        assert!((rect.left - -2.0).abs() < 1e-9);
        assert!((rect.right - 22.0).abs() < 1e-9);
        assert!((rect.bottom - -1.0).abs() < 1e-9);
        assert!((rect.top - 1.0).abs() < 1e-9);
        assert!(manager.limits_set());
    }

    #[test]
    fn autoscale_widens_single_point() {
        let mut manager = AxisManager::new();
        let pair = manager.default_pair();
        manager.autoscale(
            [(pair, CoordinateRect::new(3.0, 3.0, 7.0, 7.0))],
            AutoscaleMargins::default(),
        );
        assert!(!manager.bottom().limits().is_zero_width());
        assert!(manager.bottom().limits().contains(3.0));
    }

    #[test]
    fn pan_follows_the_cursor() {
        let mut manager = AxisManager::new();
        manager.set_limits(limits(0.0, 100.0), limits(0.0, 100.0));
        let pair = manager.default_pair();
        let data = PixelRect::from_size(200.0, 200.0);

        // Drag 20 px right and 20 px down: 10 data units each
        manager.pan(pair, PixelPoint::new(20.0, 20.0), data).unwrap();
        assert_eq!(manager.bottom().limits(), limits(-10.0, 90.0));
        assert_eq!(manager.left().limits(), limits(10.0, 110.0));
    }

    #[test]
    fn zoom_about_pixel_keeps_anchor() {
        let mut manager = AxisManager::new();
        manager.set_limits(limits(0.0, 100.0), limits(0.0, 100.0));
        let pair = manager.default_pair();
        let data = PixelRect::from_size(200.0, 200.0);

        // Pixel (50, 150) is data (25, 25)
        manager
            .zoom(pair, 2.0, 1.0, PixelPoint::new(50.0, 150.0), data)
            .unwrap();
        let x = manager.bottom().limits();
        assert!((x.min() - 12.5).abs() < 1e-9);
        assert!((x.max() - 62.5).abs() < 1e-9);
        assert_eq!(manager.left().limits(), limits(0.0, 100.0));
    }

    #[test]
    fn autoscale_skips_axes_whose_data_overflows() {
        let mut manager = AxisManager::new();
        let pair = manager.default_pair();
        manager.autoscale(
            [
                (pair, CoordinateRect::new(-f64::MAX, 0.0, 0.0, 10.0)),
                (pair, CoordinateRect::new(0.0, f64::MAX, 0.0, 10.0)),
            ],
            AutoscaleMargins::default(),
        );

        let x = manager.bottom().limits();
        assert!(x.span().is_finite());
        assert_eq!(x, limits(DEFAULT_AXIS_MIN, DEFAULT_AXIS_MAX));
        assert!(manager.left().limits().contains(10.0));
    }

    #[test]
    fn autoscale_keeps_bare_range_when_margin_overflows() {
        let mut manager = AxisManager::new();
        let pair = manager.default_pair();
        manager.autoscale(
            [(pair, CoordinateRect::new(-f64::MAX / 2.0, f64::MAX / 2.0, 0.0, 1.0))],
            AutoscaleMargins { x: 0.5, y: 0.0 },
        );
        assert_eq!(
            manager.bottom().limits(),
            limits(-f64::MAX / 2.0, f64::MAX / 2.0)
        );
    }

    #[test]
    fn pan_rejects_overflow_and_leaves_limits() {
        let mut manager = AxisManager::new();
        let start = limits(f64::MAX / 2.0, f64::MAX);
        manager.set_limits(start, limits(0.0, 1.0));
        let pair = manager.default_pair();

        // Dragging across the whole data rect shifts by the whole span
        let data = PixelRect::from_size(100.0, 100.0);
        assert!(manager.pan(pair, PixelPoint::new(-100.0, 0.0), data).is_err());
        assert_eq!(manager.bottom().limits(), start);
    }

    #[test]
    fn zoom_recovers_from_zero_width_limits() {
        let mut manager = AxisManager::new();
        manager.set_limits(limits(4.0, 4.0), limits(0.0, 10.0));
        let pair = manager.default_pair();
        let data = PixelRect::from_size(100.0, 100.0);

        manager
            .zoom(pair, 0.5, 1.0, PixelPoint::new(10.0, 10.0), data)
            .unwrap();
        let x = manager.bottom().limits();
        assert!(!x.is_zero_width());
        assert!((x.center() - 4.0).abs() < 1e-9);
        assert!((x.span() - MIN_DATA_RANGE * 2.0).abs() < 1e-12);
    }

    #[test]
    fn pair_orientation_is_validated() {
        let mut manager = AxisManager::new();
        let (bottom, left) = (manager.bottom().id(), manager.left().id());
        let top = manager.top().id();
        let extra_right = manager.add_axis(Edge::Right);

        assert!(manager.validate_pair(AxisPair::new(bottom, left)).is_ok());
        assert!(manager.validate_pair(AxisPair::new(top, extra_right)).is_ok());
        for pair in [
            AxisPair::new(left, bottom),
            AxisPair::new(bottom, top),
            AxisPair::new(extra_right, left),
            AxisPair::new(Axis::bottom().id(), left),
        ] {
            assert!(matches!(
                manager.validate_pair(pair),
                Err(PlotError::InvalidArgument { .. })
            ));
        }
    }

    #[test]
    fn unknown_pair_is_invalid_operation() {
        let mut manager = AxisManager::new();
        let stray = Axis::bottom().id();
        let pair = AxisPair::new(stray, manager.left().id());
        assert!(matches!(
            manager.pan(pair, PixelPoint::new(1.0, 1.0), PixelRect::from_size(10.0, 10.0)),
            Err(PlotError::InvalidOperation { .. })
        ));
    }
}
