//! Concrete plottables

pub mod interpolation;
pub mod series;

pub use interpolation::Interpolation;
pub use series::{Series, SeriesStyle};
