//! Error types for plotting operations
//!
//! Every fallible public operation returns [`PlotResult`]. Nothing is retried
//! internally: failures surface synchronously to the caller that triggered them.

use thiserror_no_std::Error;

use crate::canvas::CanvasError;
use crate::render::RenderStep;

/// Error types for plot operations
#[derive(Debug, Error)]
pub enum PlotError {
    /// Malformed input, rejected before any mutation or drawing
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },

    /// The plot is not in a state where the operation makes sense
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Why the operation was refused
        reason: String,
    },

    /// A render step failed; the canvas keeps whatever earlier steps painted
    #[error("Render failed during {step}: {message}")]
    RenderFailure {
        /// Step that was running when the failure occurred
        step: RenderStep,
        /// Description of the underlying failure
        message: String,
    },

    /// Export format is recognized but not implemented, or not recognized at all
    #[error("Unsupported export format: {format}")]
    UnsupportedFormat {
        /// Format name or file extension
        format: String,
    },

    /// The drawing surface rejected a primitive
    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    /// Encoding or writing an exported image failed
    #[error("Export failed: {reason}")]
    Export {
        /// Encoder or I/O error description
        reason: String,
    },

    /// A configuration could not be validated, encoded or decoded
    #[error("Invalid configuration: {reason}")]
    Config {
        /// What was wrong with the configuration
        reason: String,
    },
}

impl PlotError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_operation(reason: impl Into<String>) -> Self {
        Self::InvalidOperation {
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }
}

/// Result type for plot operations
pub type PlotResult<T> = Result<T, PlotError>;

/// Reject render and export sizes smaller than one pixel
pub(crate) fn validate_size(width: u32, height: u32) -> PlotResult<()> {
    if width < 1 || height < 1 {
        return Err(PlotError::invalid_argument(format!(
            "width and height must be at least 1 (got {width}x{height})"
        )));
    }
    Ok(())
}
