#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read workouts file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Invalid value in row {row}, column {column}: {message}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("Missing user_id")]
    MissingUserId,
    #[error("Missing workout_id")]
    MissingWorkoutId,
    #[error("Invalid workout_start_time: {value:?}")]
    InvalidTimestamp { value: String },
    #[error("workout_length_minutes {workout_length_minutes} puts the end time out of range")]
    EndTimeOutOfRange { workout_length_minutes: f64 },
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("SVG generation failed: {0}")]
    SvgError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("PNG rendering failed: {0}")]
    RenderFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
