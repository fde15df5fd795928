use std::io::Read;
use std::path::Path;

use crate::error::LoadError;
use crate::types::workout::{is_null_token, RawWorkoutRow};

const USER_ID: &str = "user_id";
const WORKOUT_ID: &str = "workout_id";
const FITNESS_DISCIPLINE: &str = "fitness_discipline";
const CLASS_TYPE: &str = "class_type";
const WORKOUT_START_TIME: &str = "workout_start_time";
const WORKOUT_LENGTH_MINUTES: &str = "workout_length_minutes";
const CLASS_LENGTH: &str = "class_length";

struct Columns {
    user_id: usize,
    workout_id: usize,
    fitness_discipline: usize,
    class_type: usize,
    workout_start_time: usize,
    workout_length_minutes: usize,
    class_length: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            user_id: find(USER_ID)?,
            workout_id: find(WORKOUT_ID)?,
            fitness_discipline: find(FITNESS_DISCIPLINE)?,
            class_type: find(CLASS_TYPE)?,
            workout_start_time: find(WORKOUT_START_TIME)?,
            workout_length_minutes: find(WORKOUT_LENGTH_MINUTES)?,
            class_length: find(CLASS_LENGTH)?,
        })
    }
}

pub fn load_csv(path: &Path) -> Result<Vec<RawWorkoutRow>, LoadError> {
    let file = std::fs::File::open(path)?;
    let rows = read_csv(file)?;
    tracing::info!("Loaded {} workout rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Reads every row or fails as a whole; there is no partial load.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawWorkoutRow>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut rows = Vec::new();

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let workout_length_minutes =
            parse_number(field(&record, columns.workout_length_minutes), row, WORKOUT_LENGTH_MINUTES)?
                .ok_or_else(|| LoadError::InvalidValue {
                    row,
                    column: WORKOUT_LENGTH_MINUTES,
                    message: "value is required".to_string(),
                })?;
        if workout_length_minutes < 0.0 {
            return Err(LoadError::InvalidValue {
                row,
                column: WORKOUT_LENGTH_MINUTES,
                message: format!("negative length {}", workout_length_minutes),
            });
        }

        let class_length = parse_number(field(&record, columns.class_length), row, CLASS_LENGTH)?;

        rows.push(RawWorkoutRow {
            row,
            user_id: non_null(field(&record, columns.user_id)),
            workout_id: non_null(field(&record, columns.workout_id)),
            fitness_discipline: field(&record, columns.fitness_discipline).to_string(),
            class_type: non_null(field(&record, columns.class_type)),
            workout_start_time: field(&record, columns.workout_start_time).to_string(),
            workout_length_minutes,
            class_length,
        });
    }

    Ok(rows)
}

fn field(record: &csv::StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn non_null(value: &str) -> Option<String> {
    if is_null_token(value) {
        None
    } else {
        Some(value.trim().to_string())
    }
}

fn parse_number(value: &str, row: usize, column: &'static str) -> Result<Option<f64>, LoadError> {
    if is_null_token(value) {
        return Ok(None);
    }
    let parsed: f64 = value.trim().parse().map_err(|e| LoadError::InvalidValue {
        row,
        column,
        message: format!("{:?} is not a number ({})", value, e),
    })?;
    if !parsed.is_finite() {
        return Err(LoadError::InvalidValue {
            row,
            column,
            message: format!("{:?} is not finite", value),
        });
    }
    Ok(Some(parsed))
}
