//! Tick placement and label formatting
//!
//! Major ticks land on "nice" multiples (1, 2 or 5 times a power of ten) spaced
//! at least `min_spacing_px` apart. Labels are formatted into fixed-capacity
//! strings so regenerating ticks on every render does not allocate per label.

use core::fmt::Write;

use heapless::String;

use crate::constants::{MAX_TICK_COUNT, MAX_TICK_LABEL_LENGTH};
use crate::primitives::AxisLimits;

/// Formatted tick label
pub type TickLabel = String<MAX_TICK_LABEL_LENGTH>;

/// One tick on an axis
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Data coordinate of the tick
    pub position: f64,
    /// Empty for minor ticks
    pub label: TickLabel,
    pub is_major: bool,
}

/// Label formatter for axis values
#[derive(Debug, Clone, Copy)]
pub enum TickFormatter {
    /// Format as numeric value with optional unit
    Numeric {
        /// Decimal places; `None` derives them from the tick step
        precision: Option<usize>,
        /// Unit suffix (e.g., "°C", "%", "ppm")
        unit: &'static str,
    },
    /// Format as an offset in seconds from the axis maximum (e.g., "-48H", "NOW")
    TimeOffset {
        /// Label for the current time point
        now_label: &'static str,
    },
    /// Custom formatter using function pointer
    Custom(fn(f64) -> TickLabel),
}

impl Default for TickFormatter {
    fn default() -> Self {
        Self::Numeric {
            precision: None,
            unit: "",
        }
    }
}

impl TickFormatter {
    /// Format `value` for an axis showing `limits` with major spacing `step`
    pub fn format(&self, value: f64, limits: AxisLimits, step: f64) -> TickLabel {
        let mut s = TickLabel::new();
        match self {
            TickFormatter::Numeric { precision, unit } => {
                let precision = precision.unwrap_or_else(|| decimals_for_step(step));
                let _ = write!(s, "{value:.precision$}{unit}");
            }
            TickFormatter::TimeOffset { now_label } => {
                let max = limits.max();
                let threshold = (limits.span().abs() * 0.02).max(1.0);

                if (value - max).abs() <= threshold {
                    let _ = s.push_str(now_label);
                } else {
                    let offset = (value - max) as i64;
                    let _ = match offset.abs() {
                        a if a >= 86_400 => write!(s, "{}D", offset / 86_400),
                        a if a >= 3_600 => write!(s, "{}H", offset / 3_600),
                        a if a >= 60 => write!(s, "{}M", offset / 60),
                        _ => write!(s, "{offset}S"),
                    };
                }
            }
            TickFormatter::Custom(func) => return func(value),
        }
        s
    }
}

/// Decimal places needed to tell ticks `step` apart
fn decimals_for_step(step: f64) -> usize {
    if !step.is_finite() || step <= 0.0 || step >= 1.0 {
        return 0;
    }
    (-step.log10().floor()).max(0.0) as usize
}

/// Smallest 1/2/5 x 10^n that is at least `rough`
pub fn nice_step(rough: f64) -> f64 {
    if !rough.is_finite() || rough <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(rough.log10().floor());
    let fraction = rough / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Places and labels ticks for one axis
#[derive(Debug, Clone, Copy)]
pub struct TickGenerator {
    pub formatter: TickFormatter,
    /// Minimum distance between major ticks in pixels
    pub min_spacing_px: f32,
    /// Minor ticks between consecutive majors (0 disables minor ticks)
    pub minor_per_major: usize,
}

impl TickGenerator {
    pub fn new(min_spacing_px: f32) -> Self {
        Self {
            formatter: TickFormatter::default(),
            min_spacing_px,
            minor_per_major: 0,
        }
    }

    pub fn with_formatter(mut self, formatter: TickFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_minor_ticks(mut self, minor_per_major: usize) -> Self {
        self.minor_per_major = minor_per_major;
        self
    }

    /// Major step for `limits` drawn over `pixel_length` pixels
    pub fn major_step(&self, limits: AxisLimits, pixel_length: f32) -> Option<f64> {
        if limits.is_zero_width() || !(pixel_length > 0.0) {
            return None;
        }
        let max_ticks = (pixel_length / self.min_spacing_px.max(1.0)).floor().max(1.0) as f64;
        Some(nice_step(limits.span() / max_ticks))
    }

    /// Ticks inside `limits`, majors and minors in ascending order
    pub fn generate(&self, limits: AxisLimits, pixel_length: f32) -> Vec<Tick> {
        if limits.is_zero_width() {
            return vec![Tick {
                position: limits.min(),
                label: self.formatter.format(limits.min(), limits, 1.0),
                is_major: true,
            }];
        }
        let Some(step) = self.major_step(limits, pixel_length) else {
            return Vec::new();
        };

        let subdivisions = self.minor_per_major + 1;
        let fine_step = step / subdivisions as f64;
        let epsilon = fine_step * 1e-9;

        let first = (limits.min() / fine_step - 1e-9).ceil() as i64;
        let mut ticks = Vec::new();
        for index in first.. {
            let raw = index as f64 * fine_step;
            if raw > limits.max() + epsilon || ticks.len() >= MAX_TICK_COUNT {
                break;
            }
            let position = if raw.abs() < epsilon { 0.0 } else { raw };

            let is_major = index.rem_euclid(subdivisions as i64) == 0;
            let label = if is_major {
                self.formatter.format(position, limits, step)
            } else {
                TickLabel::new()
            };
            ticks.push(Tick {
                position,
                label,
                is_major,
            });
        }
        ticks
    }
}
