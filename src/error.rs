//! Error types for the back curve detector library.

use thiserror::Error;

/// Status text reported when more than one body is tracked in a frame
pub const STATUS_AMBIGUOUS_BODY: &str = "More than 1 body found";

/// Status text reported when no body (or not all back joints) is tracked
pub const STATUS_NO_BODY: &str = "No body tracked";

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Fewer than the five required back joints are tracked in the frame
    #[error("Insufficient tracking: {tracked} of 5 required joints tracked")]
    InsufficientTracking {
        /// Number of required joints in `Tracked` state (0 when no body is tracked)
        tracked: usize,
    },

    /// More than one tracked body in the frame
    #[error("Ambiguous input: {count} tracked bodies, expected exactly one")]
    AmbiguousBody {
        /// Number of tracked bodies found
        count: usize,
    },

    /// Two landmark points coincide (or are not finite) when constructing a line
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A line was queried along an axis it cannot represent
    #[error("Invalid axis query: {0}")]
    InvalidAxisQuery(String),

    /// None of the candidates of a row passed the noise filter
    #[error("No spine point found in row {row}")]
    NoRowCandidate {
        /// Raster row index
        row: usize,
    },

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filter initialization error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic I/O error with description
    #[error("I/O error: {0}")]
    IoError(String),
}

impl Error {
    /// Whether the error only means "skip this frame" (tracking preconditions not met).
    #[must_use]
    pub fn is_frame_skip(&self) -> bool {
        matches!(self, Self::InsufficientTracking { .. } | Self::AmbiguousBody { .. })
    }

    /// Human readable status for the conditions surfaced to the status sink.
    #[must_use]
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            Self::AmbiguousBody { .. } => Some(STATUS_AMBIGUOUS_BODY),
            Self::InsufficientTracking { .. } => Some(STATUS_NO_BODY),
            _ => None,
        }
    }
}

/// Application-specific error type (alias for main Error type)
pub type AppError = Error;

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
