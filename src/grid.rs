//! Grid line rendering for the data area
//!
//! Grid lines follow the tick positions of the axes a grid is bound to and
//! support solid and dashed line styles.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle};

use crate::PlotResult;
use crate::axes::{Axis, AxisPair};
use crate::canvas::Surface;
use crate::config::PlotConfig;
use crate::constants::DEFAULT_GRID_LINE_WIDTH_PX;
use crate::primitives::PixelRect;
use crate::style::{self, Color, LinePattern};

/// Draws reference lines behind or over the plottables
pub trait Grid {
    /// Axes whose ticks the lines follow
    fn axes(&self) -> AxisPair;

    fn is_visible(&self) -> bool;

    /// Drawn before the plottables when true, after them otherwise
    fn is_beneath_plottables(&self) -> bool;

    /// Draw onto a surface clipped to `data_rect`
    fn render(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        x_axis: &Axis,
        y_axis: &Axis,
    ) -> PlotResult<()>;
}

/// Colour, width and dash pattern of one class of grid line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLineStyle {
    pub color: Color,
    /// Line width in pixels
    pub width: u32,
    pub pattern: LinePattern,
}

impl Default for GridLineStyle {
    fn default() -> Self {
        Self {
            color: style::GRID_GRAY,
            width: DEFAULT_GRID_LINE_WIDTH_PX,
            pattern: LinePattern::Solid,
        }
    }
}

/// Grid at the major (and optionally minor) ticks of an axis pair
#[derive(Debug, Clone)]
pub struct DefaultGrid {
    axes: AxisPair,
    pub major: GridLineStyle,
    /// `None` skips minor ticks
    pub minor: Option<GridLineStyle>,
    pub beneath_plottables: bool,
    pub visible: bool,
}

impl DefaultGrid {
    pub fn new(axes: AxisPair) -> Self {
        Self {
            axes,
            major: GridLineStyle::default(),
            minor: None,
            beneath_plottables: true,
            visible: true,
        }
    }

    pub fn with_major(mut self, major: GridLineStyle) -> Self {
        self.major = major;
        self
    }

    pub fn with_minor(mut self, minor: GridLineStyle) -> Self {
        self.minor = Some(minor);
        self
    }

    pub fn set_axes(&mut self, axes: AxisPair) {
        self.axes = axes;
    }

    pub fn apply_config(&mut self, config: &PlotConfig) {
        self.major.color = config.grid_color;
        if let Some(minor) = &mut self.minor {
            minor.color = config.grid_color;
        }
    }

    fn style_for(&self, is_major: bool) -> Option<GridLineStyle> {
        if is_major { Some(self.major) } else { self.minor }
    }

    fn draw_axis_lines(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        axis: &Axis,
    ) -> PlotResult<()> {
        let rect = data_rect.to_rectangle();
        if rect.is_zero_sized() {
            return Ok(());
        }
        let left = rect.top_left.x;
        let top = rect.top_left.y;
        let right = left + rect.size.width as i32 - 1;
        let bottom = top + rect.size.height as i32 - 1;
        let transform = axis.transform(data_rect);

        for tick in axis.ticks() {
            let Some(line_style) = self.style_for(tick.is_major) else {
                continue;
            };
            if !axis.limits().contains(tick.position) {
                continue;
            }

            let pixel = transform.to_pixel(tick.position).round() as i32;
            let (start, end) = if axis.is_horizontal() {
                let x = pixel.clamp(left, right);
                (Point::new(x, top), Point::new(x, bottom))
            } else {
                let y = pixel.clamp(top, bottom);
                (Point::new(left, y), Point::new(right, y))
            };

            draw_line(
                start,
                end,
                line_style.color.rgb888(),
                line_style.width,
                line_style.pattern,
                surface,
            )?;
        }
        Ok(())
    }
}

impl Grid for DefaultGrid {
    fn axes(&self) -> AxisPair {
        self.axes
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_beneath_plottables(&self) -> bool {
        self.beneath_plottables
    }

    fn render(
        &self,
        surface: &mut Surface<'_>,
        data_rect: PixelRect,
        x_axis: &Axis,
        y_axis: &Axis,
    ) -> PlotResult<()> {
        self.draw_axis_lines(surface, data_rect, x_axis)?;
        self.draw_axis_lines(surface, data_rect, y_axis)
    }
}

/// Draw a single line with specified style
fn draw_line(
    start: Point,
    end: Point,
    color: Rgb888,
    width: u32,
    pattern: LinePattern,
    surface: &mut Surface<'_>,
) -> PlotResult<()> {
    match pattern {
        LinePattern::Solid => {
            Line::new(start, end)
                .into_styled(PrimitiveStyle::with_stroke(color, width))
                .draw(surface)?;
        }
        LinePattern::Dashed {
            dash_length,
            gap_length,
        } => {
            draw_dashed_line(start, end, color, width, dash_length, gap_length, surface)?;
        }
    }

    Ok(())
}

/// Draw a dashed line by rendering individual dash segments
fn draw_dashed_line(
    start: Point,
    end: Point,
    color: Rgb888,
    width: u32,
    dash_length: u32,
    gap_length: u32,
    surface: &mut Surface<'_>,
) -> PlotResult<()> {
    let dx = (end.x - start.x) as f32;
    let dy = (end.y - start.y) as f32;
    let total_length = dx.hypot(dy);

    if total_length < 0.1 {
        return Ok(());
    }

    // A zero-length pattern would never advance
    let pattern_length = (dash_length + gap_length).max(1) as f32;
    let mut distance = 0.0;

    let line_style = PrimitiveStyle::with_stroke(color, width);

    while distance < total_length {
        let t_start = distance / total_length;
        let t_end = ((distance + dash_length as f32).min(total_length)) / total_length;

        let dash_start = Point::new(
            start.x + (dx * t_start) as i32,
            start.y + (dy * t_start) as i32,
        );

        let dash_end = Point::new(start.x + (dx * t_end) as i32, start.y + (dy * t_end) as i32);

        Line::new(dash_start, dash_end)
            .into_styled(line_style)
            .draw(surface)?;

        distance += pattern_length;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::AxisManager;
    use crate::canvas::Bitmap;
    use crate::panels::Panel;
    use crate::primitives::AxisLimits;

    fn white_grid(manager: &AxisManager) -> DefaultGrid {
        DefaultGrid::new(manager.default_pair()).with_major(GridLineStyle {
            color: style::WHITE,
            ..GridLineStyle::default()
        })
    }

    fn setup() -> (AxisManager, PixelRect) {
        let mut manager = AxisManager::new();
        let limits = AxisLimits::new(0.0, 10.0).unwrap();
        manager.set_limits(limits, limits);
        let data = PixelRect::from_size(100.0, 100.0);
        // 100 px at 60/40 px spacing: steps of 10 and 5
        manager.regenerate_ticks(data);
        (manager, data)
    }

    #[test]
    fn lines_land_on_tick_pixels() {
        let (manager, data) = setup();
        let grid = white_grid(&manager);

        let mut bitmap = Bitmap::new(100, 100).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);
        grid.render(&mut surface, data, manager.bottom(), manager.left())
            .unwrap();
        drop(surface);

        let white = Some(Rgb888::WHITE);
        // Vertical lines at x = 0 and x = 99 (tick 10 clamped inside)
        assert_eq!(bitmap.pixel(0, 30), white);
        assert_eq!(bitmap.pixel(99, 30), white);
        // Horizontal line for y = 5 at pixel 50
        assert_eq!(bitmap.pixel(30, 50), white);
        assert_eq!(bitmap.pixel(30, 30), Some(Rgb888::BLACK));
    }

    #[test]
    fn dashed_lines_leave_gaps() {
        let mut bitmap = Bitmap::new(20, 3).unwrap();
        let mut surface = Surface::new(&mut bitmap, 1.0);
        draw_dashed_line(
            Point::new(0, 1),
            Point::new(19, 1),
            Rgb888::WHITE,
            1,
            2,
            3,
            &mut surface,
        )
        .unwrap();
        drop(surface);

        assert_eq!(bitmap.pixel(0, 1), Some(Rgb888::WHITE));
        assert_eq!(bitmap.pixel(3, 1), Some(Rgb888::BLACK));
        assert_eq!(bitmap.pixel(5, 1), Some(Rgb888::WHITE));
    }

    #[test]
    fn minor_lines_only_when_styled() {
        let grid = DefaultGrid::new(AxisManager::new().default_pair());
        assert!(grid.style_for(false).is_none());
        let grid = grid.with_minor(GridLineStyle::default());
        assert!(grid.style_for(false).is_some());
    }

    #[test]
    fn default_grid_is_beneath_and_visible() {
        let manager = AxisManager::new();
        let grid = DefaultGrid::new(manager.default_pair());
        assert!(grid.is_visible());
        assert!(grid.is_beneath_plottables());
        assert_eq!(grid.axes().x, manager.bottom().id());
    }
}
