//! Error types for engine operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all engine operations
#[derive(Debug)]
pub enum EvalError {
    /// Failed to read or parse a layout record file
    RecordLoad {
        /// Path to the record file
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },

    /// Record content doesn't meet the engine's input contract
    RecordParse {
        /// Description of what's wrong with the record
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Screenshot decode or re-encode failure in the compressibility probe
    Image {
        /// Operation being performed
        operation: &'static str,
        /// Underlying image error
        source: image::ImageError,
    },

    /// Expected per-domain evaluation rows missing at aggregation time
    ///
    /// Aggregation aborts for the run instead of silently reducing a
    /// partial set.
    MissingDomains {
        /// Domains (or record file stems) without evaluation rows
        missing: Vec<String>,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
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

    /// Failed to export a summary table to disk
    TableExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordLoad { path, reason } => {
                write!(f, "Failed to load record '{}': {reason}", path.display())
            }
            Self::RecordParse { reason } => {
                write!(f, "Invalid layout record: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Image { operation, source } => {
                write!(f, "Image error during {operation}: {source}")
            }
            Self::MissingDomains { missing } => {
                write!(
                    f,
                    "Aggregation aborted, no evaluation rows for: {}",
                    missing.join(", ")
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
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
            Self::TableExport { path, source } => {
                write!(f, "Failed to export table to '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image { source, .. } => Some(source),
            Self::FileSystem { source, .. } | Self::TableExport { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for engine results
pub type Result<T> = std::result::Result<T, EvalError>;

impl From<image::ImageError> for EvalError {
    fn from(err: image::ImageError) -> Self {
        Self::Image {
            operation: "image processing",
            source: err,
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> EvalError {
    EvalError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> EvalError {
    EvalError::Computation {
        operation,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_domains_display() {
        let err = EvalError::MissingDomains {
            missing: vec!["amazon_se".to_string(), "walmart_com".to_string()],
        };

        let message = err.to_string();
        assert!(message.contains("amazon_se"));
        assert!(message.contains("walmart_com"));
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = invalid_parameter("jpeg_quality", &0, &"quality must be between 1 and 100");
        match err {
            EvalError::InvalidParameter {
                parameter, value, ..
            } => {
                assert_eq!(parameter, "jpeg_quality");
                assert_eq!(value, "0");
            }
            _ => unreachable!("Expected InvalidParameter error type"),
        }
    }
}
