//! Error types for the render pipeline, input loading and configuration

use std::path::PathBuf;

/// Failures of the vector/matrix algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// Matrix element access outside `[1, 4] x [1, 4]`.
    #[error("matrix index ({row}, {col}) is out of bounds [1, 4]")]
    IndexOutOfRange { row: usize, col: usize },

    /// Normalizing a vector of zero length.
    #[error("cannot normalize a zero-length vector")]
    DivideByZero,

    /// Camera basis collapsed (forward parallel to up).
    #[error("degenerate camera basis")]
    Degenerate,
}

/// Failures while reading a height grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field that does not parse as a number (1-based line and column).
    #[error("line {line}, column {column}: '{value}' is not a number")]
    Parse {
        line: usize,
        column: usize,
        value: String,
    },

    #[error("height grid contains no values")]
    Empty,
}

/// Failures while loading, saving or validating a render configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Failures while building a renderer or writing its output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Math(#[from] MathError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
