//! Constants for layout and rendering
//!
//! All magic numbers are defined here with descriptive names and units.
//! Pixel values are logical pixels; the scale factor is applied on output.

/// Default lower limit for freshly created axes
pub const DEFAULT_AXIS_MIN: f64 = -10.0;

/// Default upper limit for freshly created axes
pub const DEFAULT_AXIS_MAX: f64 = 10.0;

/// Width of the axis frame line in pixels
pub const AXIS_LINE_WIDTH_PX: f32 = 1.0;

/// Length of major tick marks in pixels
pub const MAJOR_TICK_LENGTH_PX: f32 = 4.0;

/// Length of minor tick marks in pixels
pub const MINOR_TICK_LENGTH_PX: f32 = 2.0;

/// Gap between the end of a tick mark and its label in pixels
pub const TICK_LABEL_GAP_PX: f32 = 3.0;

/// Padding around axis labels (the axis title, not tick labels)
pub const AXIS_LABEL_PADDING_PX: f32 = 4.0;

/// Minimum spacing between major ticks along a horizontal axis
pub const MIN_TICK_SPACING_HORIZONTAL_PX: f32 = 60.0;

/// Minimum spacing between major ticks along a vertical axis
pub const MIN_TICK_SPACING_VERTICAL_PX: f32 = 40.0;

/// Upper bound on generated ticks, guards against pathological limits
pub const MAX_TICK_COUNT: usize = 256;

/// Maximum length of formatted tick labels (characters)
pub const MAX_TICK_LABEL_LENGTH: usize = 24;

/// Padding above and below the title text
pub const TITLE_PADDING_PX: f32 = 6.0;

/// Inner padding of the legend box
pub const LEGEND_PADDING_PX: f32 = 6.0;

/// Width of a legend swatch in pixels
pub const LEGEND_SWATCH_WIDTH_PX: f32 = 14.0;

/// Gap between a legend swatch and its label
pub const LEGEND_SWATCH_GAP_PX: f32 = 4.0;

/// Vertical gap between legend rows
pub const LEGEND_ROW_GAP_PX: f32 = 2.0;

/// Gap between the data rectangle and the legend box
pub const LEGEND_MARGIN_PX: f32 = 6.0;

/// Width of the colour bar strip
pub const COLORBAR_WIDTH_PX: f32 = 12.0;

/// Gap between the data rectangle and the colour bar strip
pub const COLORBAR_MARGIN_PX: f32 = 8.0;

/// Margin factor for auto-scaling bounds (10% padding)
pub const AUTO_SCALE_MARGIN_FACTOR: f64 = 0.1;

/// Minimum data range for auto-scaling (expands single-valued data)
pub const MIN_DATA_RANGE: f64 = 0.001;

/// Number of subdivisions per segment for smooth curve interpolation
pub const DEFAULT_SMOOTH_SUBDIVISIONS: usize = 5;

/// Default series line width in pixels
pub const DEFAULT_SERIES_LINE_WIDTH_PX: u32 = 2;

/// Default marker diameter for series points in pixels
pub const DEFAULT_MARKER_SIZE_PX: u32 = 5;

/// Default grid line width in pixels
pub const DEFAULT_GRID_LINE_WIDTH_PX: u32 = 1;

/// JPEG encoder quality (0-100)
pub const JPEG_QUALITY: u8 = 90;
