use std::io;

#[derive(Debug, thiserror::Error)]
pub enum SickError {
    #[error("Telegram has {actual} tokens but at least {expected} are required.")]
    TooFewTokens { expected: usize, actual: usize },
    #[error("Field `{field}` is not a valid number: {token:?}.")]
    InvalidNumber { field: &'static str, token: String },
    #[error("Field `{field}` is not ASCII text.")]
    InvalidText { field: &'static str },
    #[error("Telegram declares {declared} samples but carries {available}.")]
    SampleCountMismatch { declared: i64, available: usize },
    #[error("View angle {0} degree is outside the sensor field of view.")]
    InvalidViewAngle(f64),
    #[error("Angle window {start}..{end} does not fit a scan of {len} samples.")]
    WindowOutOfBounds { start: isize, end: isize, len: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Timed out while connecting to {0}")]
    ConnectionTimeout(String),
    #[error("Failed to spawn the ingestion thread: {0}")]
    ThreadSpawn(io::Error),
    #[error(transparent)]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] io::Error),
}

impl SickError {
    /// Errors caused by the content of one telegram. The ingestion loop skips
    /// the telegram and keeps reading.
    pub fn is_malformed_telegram(&self) -> bool {
        matches!(
            self,
            SickError::TooFewTokens { .. }
                | SickError::InvalidNumber { .. }
                | SickError::InvalidText { .. }
                | SickError::SampleCountMismatch { .. }
        )
    }
}
