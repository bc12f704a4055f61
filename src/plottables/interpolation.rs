//! Interpolation algorithms for rendering data lines
//!
//! Provides linear and Catmull-Rom spline interpolation for data series.
//! Points are transformed to pixels, clipped against the data rectangle and
//! drawn with embedded-graphics `Line` primitives. A non-finite point breaks
//! the line into separate runs.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use crate::PlotResult;
use crate::canvas::Surface;
use crate::constants::DEFAULT_SMOOTH_SUBDIVISIONS;
use crate::primitives::{Coordinates, PixelPoint, PixelRect, PixelPadding};
use crate::transform::AxisTransform;

/// How consecutive points are joined
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interpolation {
    /// Straight lines between points
    #[default]
    Linear,
    /// Catmull-Rom spline through every point
    Smooth,
}

/// Map a data point to pixel space, `None` for non-finite input
fn to_pixel(point: Coordinates, x: &AxisTransform, y: &AxisTransform) -> Option<PixelPoint> {
    point
        .is_finite()
        .then(|| PixelPoint::new(x.to_pixel(point.x), y.to_pixel(point.y)))
}

/// Liang-Barsky clip of segment `a -> b` to `rect`
fn clip_segment(a: PixelPoint, b: PixelPoint, rect: PixelRect) -> Option<(PixelPoint, PixelPoint)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, a.x - rect.left),
        (dx, rect.right - a.x),
        (-dy, a.y - rect.top),
        (dy, rect.bottom - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        PixelPoint::new(a.x + t0 * dx, a.y + t0 * dy),
        PixelPoint::new(a.x + t1 * dx, a.y + t1 * dy),
    ))
}

/// Draws polylines in pixel space, clipped to a bounds rectangle
pub(crate) struct LinePainter<'s, 'a> {
    surface: &'s mut Surface<'a>,
    style: PrimitiveStyle<Rgb888>,
    bounds: PixelRect,
}

impl<'s, 'a> LinePainter<'s, 'a> {
    /// `bounds` is the data rectangle grown by the stroke width so thick
    /// lines are not cut short at the edges
    pub(crate) fn new(
        surface: &'s mut Surface<'a>,
        color: Rgb888,
        width: u32,
        data_rect: PixelRect,
    ) -> Self {
        let grow = -(width as f32);
        Self {
            surface,
            style: PrimitiveStyle::with_stroke(color, width),
            bounds: data_rect.contract(PixelPadding::uniform(grow)),
        }
    }

    pub(crate) fn segment(&mut self, a: PixelPoint, b: PixelPoint) -> PlotResult<()> {
        if let Some((a, b)) = clip_segment(a, b, self.bounds) {
            Line::new(a.to_point(), b.to_point())
                .into_styled(self.style)
                .draw(self.surface)?;
        }
        Ok(())
    }

    /// Join consecutive points, restarting after every `None`
    pub(crate) fn polyline(
        &mut self,
        points: impl IntoIterator<Item = Option<PixelPoint>>,
    ) -> PlotResult<()> {
        let mut prev: Option<PixelPoint> = None;
        for point in points {
            if let (Some(a), Some(b)) = (prev, point) {
                self.segment(a, b)?;
            }
            prev = point;
        }
        Ok(())
    }
}

/// Draw a data series with straight lines
pub(crate) fn draw_linear_series(
    painter: &mut LinePainter<'_, '_>,
    points: &[Coordinates],
    x: &AxisTransform,
    y: &AxisTransform,
) -> PlotResult<()> {
    painter.polyline(points.iter().map(|p| to_pixel(*p, x, y)))
}

/// Draw a data series with a Catmull-Rom spline
///
/// Each finite run is smoothed separately. The end points are repeated as
/// outer control points so the curve reaches the first and last samples.
/// Runs shorter than three points fall back to straight lines.
pub(crate) fn draw_smooth_series(
    painter: &mut LinePainter<'_, '_>,
    points: &[Coordinates],
    x: &AxisTransform,
    y: &AxisTransform,
) -> PlotResult<()> {
    for run in points.split(|p| !p.is_finite()) {
        if run.len() < 3 {
            draw_linear_series(painter, run, x, y)?;
            continue;
        }

        let step = 1.0 / DEFAULT_SMOOTH_SUBDIVISIONS as f64;
        let last = run.len() - 1;
        let mut curve = Vec::with_capacity(last * DEFAULT_SMOOTH_SUBDIVISIONS + 1);
        curve.push(to_pixel(run[0], x, y));

        for i in 0..last {
            let p0 = run[i.saturating_sub(1)];
            let p1 = run[i];
            let p2 = run[i + 1];
            let p3 = run[(i + 2).min(last)];

            for j in 1..=DEFAULT_SMOOTH_SUBDIVISIONS {
                let t = j as f64 * step;
                curve.push(to_pixel(catmull_rom_point(p0, p1, p2, p3, t), x, y));
            }
        }
        painter.polyline(curve)?;
    }
    Ok(())
}

/// Calculate a point on a Catmull-Rom spline curve
///
/// Uses the standard Catmull-Rom basis matrix (tension 0.5).
/// The curve passes through p1 and p2, using p0 and p3 as control points.
///
/// # Arguments
///
/// * `p0` - Previous control point
/// * `p1` - Start point (curve passes through this)
/// * `p2` - End point (curve passes through this)
/// * `p3` - Next control point
/// * `t` - Interpolation parameter (0.0 to 1.0)
pub(crate) fn catmull_rom_point(
    p0: Coordinates,
    p1: Coordinates,
    p2: Coordinates,
    p3: Coordinates,
    t: f64,
) -> Coordinates {
    let t2 = t * t;
    let t3 = t2 * t;

    let x = 0.5
        * (2.0 * p1.x
            + (-p0.x + p2.x) * t
            + (2.0 * p0.x - 5.0 * p1.x + 4.0 * p2.x - p3.x) * t2
            + (-p0.x + 3.0 * p1.x - 3.0 * p2.x + p3.x) * t3);

    let y = 0.5
        * (2.0 * p1.y
            + (-p0.y + p2.y) * t
            + (2.0 * p0.y - 5.0 * p1.y + 4.0 * p2.y - p3.y) * t2
            + (-p0.y + 3.0 * p1.y - 3.0 * p2.y + p3.y) * t3);

    Coordinates::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spline_passes_through_control_points() {
        let p = [
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.0, 2.0),
            Coordinates::new(2.0, -1.0),
            Coordinates::new(3.0, 4.0),
        ];
        assert_eq!(catmull_rom_point(p[0], p[1], p[2], p[3], 0.0), p[1]);
        let end = catmull_rom_point(p[0], p[1], p[2], p[3], 1.0);
        assert!((end.x - p[2].x).abs() < 1e-12 && (end.y - p[2].y).abs() < 1e-12);
    }

    #[test]
    fn segment_inside_is_untouched() {
        let rect = PixelRect::from_size(100.0, 100.0);
        let a = PixelPoint::new(10.0, 10.0);
        let b = PixelPoint::new(90.0, 50.0);
        assert_eq!(clip_segment(a, b, rect), Some((a, b)));
    }

    #[test]
    fn far_endpoint_is_clipped_to_edge() {
        let rect = PixelRect::from_size(100.0, 100.0);
        let (a, b) = clip_segment(
            PixelPoint::new(50.0, 50.0),
            PixelPoint::new(1.0e9, 50.0),
            rect,
        )
        .unwrap();
        assert_eq!(a, PixelPoint::new(50.0, 50.0));
        assert!((b.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn segment_outside_is_dropped() {
        let rect = PixelRect::from_size(100.0, 100.0);
        assert!(clip_segment(PixelPoint::new(-5.0, -5.0), PixelPoint::new(-1.0, 200.0), rect).is_none());
    }
}
