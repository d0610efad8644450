/// Result alias that carries the custom [`RuneVizError`] type.
pub type Result<T> = std::result::Result<T, RuneVizError>;

/// Common error type for the core crate.
///
/// Variants fall into two groups. Input rejections describe a chart (or a
/// requested output) that cannot be rendered and carry a message meant for the
/// person who submitted it. Everything else is an internal failure.
#[derive(Debug, thiserror::Error)]
pub enum RuneVizError {
    #[error("there are no runes to draw")]
    EmptyChart,
    #[error("images can be generated only for a maximum of {max} runes (got {count})")]
    TooManyNotes { count: usize, max: usize },
    #[error("images can be generated only for a maximum of {max} beats (got {beats})")]
    TooManyBeats { beats: u32, max: u32 },
    #[error("rune {index} uses lane {lane}, lanes must be between 0 and 3")]
    InvalidLane { index: usize, lane: u8 },
    #[error("tempo change {index} has bpm {bpm}, bpm must be a positive number")]
    InvalidTempo { index: usize, bpm: f64 },
    /// The chart could not be decoded, e.g. a lane outside the `u8` range.
    #[error("invalid chart: {0}")]
    InvalidChart(#[source] serde_json::Error),
    #[error("couldn't recognise image format `{0}`")]
    UnsupportedFormat(String),
    /// Canvas or sprite allocation failed while painting.
    #[error("rendering failed: {0}")]
    Render(String),
    #[error("{0}")]
    Encode(#[from] image::ImageError),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl RuneVizError {
    /// Returns `true` when the error describes unusable input rather than an
    /// unexpected failure.
    pub fn is_input_rejection(&self) -> bool {
        matches!(
            self,
            Self::EmptyChart
                | Self::TooManyNotes { .. }
                | Self::TooManyBeats { .. }
                | Self::InvalidLane { .. }
                | Self::InvalidTempo { .. }
                | Self::InvalidChart(_)
                | Self::UnsupportedFormat(_)
        )
    }
}
