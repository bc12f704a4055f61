//! Layered 2D plotting core
//!
//! This crate maps data coordinates to pixels and back, partitions a figure
//! into edge panels (axes, title, legend, colour bars) around a central data
//! rectangle, and renders a scene onto any embedded-graphics draw target in a
//! fixed layer order. The last render is recorded so mouse positions can be
//! converted to data coordinates and hit-tested against panels.
//!
//! Drawing goes through the [`canvas::Canvas`] trait; every
//! `DrawTarget<Color = Rgb888>` is one, and [`canvas::Bitmap`] is an in-memory
//! canvas used for image export.

pub mod axes;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod grid;
pub mod layout;
pub mod panels;
pub mod plot;
pub mod plottable;
pub mod plottables;
pub mod primitives;
pub mod render;
pub mod scene;
pub mod style;
pub mod transform;

pub use axes::{Axis, AxisId, AxisManager, AxisPair};
pub use canvas::{Bitmap, Canvas, Surface};
pub use config::PlotConfig;
pub use error::{PlotError, PlotResult};
pub use export::ImageFormat;
pub use layout::{LayoutDetails, LayoutMode};
pub use panels::{Edge, Panel, PanelId};
pub use plot::Plot;
pub use plottable::{LegendItem, Plottable, PlottableId};
pub use primitives::{AxisLimits, CoordinateRect, Coordinates, PixelPadding, PixelPoint, PixelRect};
pub use render::{RenderDetails, RenderStep};
pub use transform::AxisTransform;
