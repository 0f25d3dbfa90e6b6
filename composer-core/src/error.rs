//! Error types for composer operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Drag updates, layer reordering and autofix never produce these; they are
/// reserved for explicit validation, construction and configuration loading.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// An element with the same id already exists in the scene.
    #[error("Duplicate element id: {0}")]
    DuplicateElement(String),

    /// Format name missing from the format table.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Scene dimensions disagree with the nominal size of its format.
    #[error("Format {format} expects {expected_width}x{expected_height}, scene is {width}x{height}")]
    DimensionMismatch {
        /// Format name.
        format: String,
        /// Nominal width of the format.
        expected_width: u32,
        /// Nominal height of the format.
        expected_height: u32,
        /// Actual scene width.
        width: u32,
        /// Actual scene height.
        height: u32,
    },

    /// Scene serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a configuration file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            CanvasError::DuplicateElement("logo".into()).to_string(),
            "Duplicate element id: logo"
        );
        let mismatch = CanvasError::DimensionMismatch {
            format: "SQUARE".into(),
            expected_width: 1080,
            expected_height: 1080,
            width: 1200,
            height: 628,
        };
        assert_eq!(
            mismatch.to_string(),
            "Format SQUARE expects 1080x1080, scene is 1200x628"
        );
    }
}
