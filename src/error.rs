// Error type shared by loading, querying and exporting.

/// Everything that can go wrong outside of the silent row-level cleaning.
#[derive(Debug, thiserror::Error)]
pub enum AirQualityError {
    /// The header row lacks one or more mandatory columns. Fatal at load.
    #[error("dataset missing required columns: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    /// A query addressed a city (or summary) with no cleaned data behind it.
    #[error("no data available for {city:?}")]
    EmptyInput { city: String },

    /// CSV read/write failure. `csv::Error` already names itself.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON export failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AirQualityError {
    pub fn empty_input(city: impl Into<String>) -> Self {
        Self::EmptyInput { city: city.into() }
    }
}

pub type Result<T> = std::result::Result<T, AirQualityError>;
