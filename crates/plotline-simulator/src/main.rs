//! Desktop viewer for plotline.
//!
//! Renders a plot in an SDL2 window via `embedded-graphics-simulator` and
//! forwards mouse input to the plot's pan, zoom and hit-testing.
//!
//! # Controls
//!
//! | Input       | Action                          |
//! |-------------|---------------------------------|
//! | Drag        | Pan                             |
//! | Wheel       | Zoom about the cursor           |
//! | Click       | Report the panel under the cursor |
//! | A           | Autoscale                       |
//! | G           | Toggle grid                     |
//! | L           | Toggle legend                   |
//! | S           | Save `plotline.png`             |
//! | Q           | Quit                            |

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{error, info, warn};

use plotline::panels::Colorbar;
use plotline::plottables::{Interpolation, Series, SeriesStyle};
use plotline::style::{self, Color};
use plotline::{AxisLimits, Bitmap, PixelPoint, Plot, PlotResult};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 480;
const DISPLAY_HEIGHT_PX: u32 = 320;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Zoom fraction applied per wheel notch.
const ZOOM_STEP: f64 = 1.15;

/// Pointer travel below which a press/release counts as a click.
const CLICK_SLOP_PX: i32 = 2;

const EXPORT_PATH: &str = "plotline.png";

// ---------------------------------------------------------------------------
// Demo scene
// ---------------------------------------------------------------------------

/// Synthetic sensor-like curves
fn build_plot() -> PlotResult<Plot> {
    let mut plot = Plot::new();
    plot.title("Cabin climate");
    plot.x_label("minutes");
    plot.y_label("value");

    let minutes: Vec<f64> = (0..=120).map(|i| i as f64 * 0.5).collect();

    let temperature: Vec<f64> = minutes
        .iter()
        .map(|t| 23.0 + 3.0 * (t / 12.0).sin() + 0.5 * (t / 3.7).cos())
        .collect();
    plot.add(
        Series::from_xy(&minutes, &temperature)?
            .with_label("temperature")
            .with_interpolation(Interpolation::Smooth),
    );

    let humidity: Vec<f64> = minutes
        .iter()
        .map(|t| 20.0 + 4.0 * (t / 18.0).sin() + 1.0 * (t / 2.3).cos())
        .collect();
    plot.add(
        Series::from_xy(&minutes, &humidity)?
            .with_label("humidity")
            .with_style(SeriesStyle {
                color: Color::from_hex(0xd62728),
                show_points: true,
                ..SeriesStyle::default()
            }),
    );

    let colorbar = Colorbar::new(
        AxisLimits::new(400.0, 800.0)?,
        vec![style::SERIES_BLUE, Color::from_hex(0x2ca02c), Color::from_hex(0xd62728)],
    );
    plot.add_panel(colorbar);
    plot.show_legend();

    Ok(plot)
}

// ---------------------------------------------------------------------------
// Interaction
// ---------------------------------------------------------------------------

/// Mouse state between events
#[derive(Default)]
struct Pointer {
    pressed_at: Option<Point>,
    /// Last drag position, `None` while no button is held
    last: Option<Point>,
    hover: Option<Point>,
}

fn to_pixel(point: Point) -> PixelPoint {
    PixelPoint::new(point.x as f32, point.y as f32)
}

fn report_panel(plot: &Plot, point: Point) {
    match plot.get_panel(to_pixel(point)) {
        Ok(Some(id)) => info!("Click at {point:?} hit panel {}", id.get()),
        Ok(None) => match plot.get_coordinates(to_pixel(point), plot.axes().default_pair()) {
            Ok(c) => info!("Click at {point:?} -> ({:.3}, {:.3})", c.x, c.y),
            Err(e) => warn!("Coordinate lookup failed: {e}"),
        },
        Err(e) => warn!("Hit test failed: {e}"),
    }
}

fn toggle_grid(plot: &mut Plot) -> PlotResult<()> {
    if plot.default_grid()?.visible {
        plot.hide_grid()
    } else {
        plot.show_grid()
    }
}

fn toggle_legend(plot: &mut Plot) {
    if plot.legend().is_shown() {
        plot.hide_legend();
    } else {
        plot.show_legend();
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> PlotResult<()> {
    env_logger::init();
    info!("Starting plotline simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Drag=pan  Wheel=zoom  Click=hit-test  A=autoscale  G=grid  L=legend  S=save  Q=quit");

    let mut plot = build_plot()?;

    let mut display = SimulatorDisplay::<Rgb888>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let mut frame = Bitmap::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX)?;

    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Plotline Simulator", &output_settings);

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    plot.render(&mut frame)?;
    let _ = frame.flush(&mut display);
    window.update(&display);

    let mut pointer = Pointer::default();
    let mut needs_redraw = false;

    'running: loop {
        let frame_start = Instant::now();

        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::A => {
                        plot.autoscale();
                        needs_redraw = true;
                    }
                    Keycode::G => {
                        if let Err(e) = toggle_grid(&mut plot) {
                            warn!("Grid toggle failed: {e}");
                        }
                        needs_redraw = true;
                    }
                    Keycode::L => {
                        toggle_legend(&mut plot);
                        needs_redraw = true;
                    }
                    Keycode::S => {
                        if let Err(e) = plot.save(EXPORT_PATH, DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX) {
                            error!("Save failed: {e}");
                        }
                    }
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => {
                    pointer.pressed_at = Some(point);
                    pointer.last = Some(point);
                }

                SimulatorEvent::MouseMove { point } => {
                    pointer.hover = Some(point);
                    if let Some(last) = pointer.last {
                        let delta = point - last;
                        if delta != Point::zero() {
                            match plot.pan(delta.x as f32, delta.y as f32) {
                                Ok(()) => needs_redraw = true,
                                Err(e) => warn!("Pan rejected: {e}"),
                            }
                            pointer.last = Some(point);
                        }
                    }
                }

                SimulatorEvent::MouseButtonUp { point, .. } => {
                    if let Some(start) = pointer.pressed_at.take() {
                        let travel = point - start;
                        if travel.x.abs() <= CLICK_SLOP_PX && travel.y.abs() <= CLICK_SLOP_PX {
                            report_panel(&plot, point);
                        }
                    }
                    pointer.last = None;
                }

                SimulatorEvent::MouseWheel { scroll_delta, .. } => {
                    let fraction = ZOOM_STEP.powi(scroll_delta.y);
                    // Wheel events carry no position; zoom about the last known pointer
                    let about = pointer
                        .hover
                        .map(to_pixel)
                        .unwrap_or_else(|| plot.last_render().data_rect.center());
                    match plot.zoom(fraction, fraction, about) {
                        Ok(()) => needs_redraw = true,
                        Err(e) => warn!("Zoom rejected: {e}"),
                    }
                }

                _ => {}
            }
        }

        if needs_redraw {
            match plot.render(&mut frame) {
                Ok(details) => log::debug!("Frame rendered in {:?}", details.elapsed),
                Err(e) => error!("Render error: {e}"),
            }
            let _ = frame.flush(&mut display);
            needs_redraw = false;
        }

        window.update(&display);

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
    Ok(())
}
