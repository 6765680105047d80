use thiserror::Error;

/// Errors surfaced by the sketch core to its caller
#[derive(Error, Debug)]
pub enum SketchError {
    /// Export was requested but every pixel is fully transparent
    #[error("Nothing has been drawn yet")]
    EmptyDrawing,

    /// The surface has not been sized yet
    #[error("Drawing surface is not available before it has been sized")]
    BufferUnavailable,

    #[error("Invalid color value: {0:?}")]
    InvalidColor(String),

    #[error("Brush width {0} is outside the supported range 1..=50")]
    InvalidBrushWidth(u32),

    #[error("Malformed image data URI")]
    MalformedDataUri,

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sketch operations
pub type SketchResult<T> = Result<T, SketchError>;
