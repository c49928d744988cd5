//! Error types for pattern generation and their mapping onto run outcomes

use std::fmt;
use std::path::PathBuf;

/// Main error type for all pattern generation operations
#[derive(Debug)]
pub enum PatternError {
    /// Source image path does not resolve to anything on disk
    ///
    /// Raised before any decode attempt is made.
    MissingInput {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Failed to open or decode the source image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Configuration value rejected before any pixel work starts
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Numerical computation produced an unusable result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// The TIFF encoder failed while writing the pattern
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying TIFF encoding error
        source: tiff::TiffError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput { path } => {
                write!(f, "Input file '{}' was not found", path.display())
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::MissingInput { .. } | Self::InvalidParameter { .. } | Self::Computation { .. } => {
                None
            }
        }
    }
}

impl PatternError {
    /// True for failures that happen while writing the output file
    pub const fn is_save_error(&self) -> bool {
        matches!(self, Self::ImageExport { .. } | Self::FileSystem { .. })
    }
}

/// Convenience type alias for pattern generation results
pub type Result<T> = std::result::Result<T, PatternError>;

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PatternError {
    PatternError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> PatternError {
    PatternError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
