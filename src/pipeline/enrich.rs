use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeDelta, Timelike, Weekday};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::RecordError;
use crate::types::workout::{
    ClassType, Discipline, EnrichedWorkout, Neighbor, RawWorkoutRow, WorkoutRecord,
};

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub row: usize,
    pub workout_id: Option<String>,
    #[serde(serialize_with = "serialize_error")]
    pub error: RecordError,
}

#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub workouts: Vec<EnrichedWorkout>,
    pub rejected: Vec<RejectedRecord>,
    /// Discipline labels outside the known set, with their record counts.
    pub unknown_disciplines: BTreeMap<String, usize>,
}

impl Enrichment {
    pub fn user_count(&self) -> usize {
        let mut users: Vec<&str> = self.workouts.iter().map(|w| w.user_id.as_str()).collect();
        users.dedup();
        users.len()
    }
}

/// Validates raw rows, reports every reject, and enriches the valid subset.
pub fn enrich(rows: &[RawWorkoutRow]) -> Enrichment {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for raw in rows {
        match validate(raw) {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!("Rejecting row {}: {}", raw.row, error);
                rejected.push(RejectedRecord {
                    row: raw.row,
                    workout_id: raw.workout_id.clone(),
                    error,
                });
            }
        }
    }

    let mut unknown_disciplines = BTreeMap::new();
    for record in records.iter().filter(|r| !r.fitness_discipline.is_known()) {
        *unknown_disciplines
            .entry(record.fitness_discipline.as_str().to_string())
            .or_insert(0) += 1;
    }
    for (label, count) in &unknown_disciplines {
        tracing::warn!("Unrecognised fitness_discipline {:?} on {} workouts", label, count);
    }

    let workouts = enrich_records(&records);
    let enrichment = Enrichment {
        workouts,
        rejected,
        unknown_disciplines,
    };

    tracing::info!(
        "Enriched {} workouts for {} users ({} rejected)",
        enrichment.workouts.len(),
        enrichment.user_count(),
        enrichment.rejected.len()
    );

    enrichment
}

pub fn validate(raw: &RawWorkoutRow) -> Result<WorkoutRecord, RecordError> {
    let user_id = raw.user_id.clone().ok_or(RecordError::MissingUserId)?;
    let workout_id = raw.workout_id.clone().ok_or(RecordError::MissingWorkoutId)?;
    let workout_start_time =
        parse_timestamp(&raw.workout_start_time).ok_or_else(|| RecordError::InvalidTimestamp {
            value: raw.workout_start_time.clone(),
        })?;
    let workout_end_time = end_time(workout_start_time, raw.workout_length_minutes).ok_or(
        RecordError::EndTimeOutOfRange {
            workout_length_minutes: raw.workout_length_minutes,
        },
    )?;

    Ok(WorkoutRecord {
        row: raw.row,
        workout_id,
        user_id,
        fitness_discipline: Discipline::parse(&raw.fitness_discipline),
        class_type: ClassType::parse(raw.class_type.as_deref()),
        workout_start_time,
        workout_end_time,
        workout_length_minutes: raw.workout_length_minutes,
        class_length: raw.class_length,
    })
}

/// Timestamps carrying an offset (RFC 3339 or basic `+hhmm`) are normalised to UTC; naive ones are taken as wall-clock time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Partitions by user, orders each partition chronologically and links neighbours.
/// Output is grouped by ascending `user_id`, chronological within each user.
pub fn enrich_records(records: &[WorkoutRecord]) -> Vec<EnrichedWorkout> {
    let mut partitions: BTreeMap<&str, Vec<&WorkoutRecord>> = BTreeMap::new();
    for record in records {
        partitions.entry(record.user_id.as_str()).or_default().push(record);
    }

    let partitions: Vec<Vec<&WorkoutRecord>> = partitions.into_values().collect();

    partitions
        .into_par_iter()
        .map(|mut timeline| {
            // Stable sort: equal start times keep input order.
            timeline.sort_by(|a, b| a.workout_start_time.cmp(&b.workout_start_time));
            link_timeline(&timeline)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn link_timeline(timeline: &[&WorkoutRecord]) -> Vec<EnrichedWorkout> {
    let mut enriched: Vec<EnrichedWorkout> = timeline.iter().map(|r| enrich_standalone(r)).collect();

    for i in 1..enriched.len() {
        let gap = gap_minutes(enriched[i - 1].workout_end_time, enriched[i].workout_start_time);
        let previous = neighbor(&enriched[i - 1]);
        let next = neighbor(&enriched[i]);

        enriched[i].previous = Some(previous);
        enriched[i].gap_minutes_from_previous = Some(gap);
        enriched[i - 1].next = Some(next);
        enriched[i - 1].gap_minutes_to_next = Some(gap);
    }

    enriched
}

fn enrich_standalone(record: &WorkoutRecord) -> EnrichedWorkout {
    let start = record.workout_start_time;
    let pct_of_class_completed = completion_ratio(record.workout_length_minutes, record.class_length);
    let day_of_week = start.weekday();

    EnrichedWorkout {
        workout_id: record.workout_id.clone(),
        user_id: record.user_id.clone(),
        fitness_discipline: record.fitness_discipline.clone(),
        class_type: record.class_type.clone(),
        workout_start_time: start,
        workout_length_minutes: record.workout_length_minutes,
        class_length: record.class_length,
        pct_of_class_completed,
        workout_finished: is_finished(pct_of_class_completed),
        workout_end_time: record.workout_end_time,
        day_of_week,
        is_weekend: matches!(day_of_week, Weekday::Sat | Weekday::Sun),
        hour_of_day: start.hour(),
        previous: None,
        next: None,
        gap_minutes_from_previous: None,
        gap_minutes_to_next: None,
    }
}

fn neighbor(workout: &EnrichedWorkout) -> Neighbor {
    Neighbor {
        workout_id: workout.workout_id.clone(),
        user_id: workout.user_id.clone(),
        fitness_discipline: workout.fitness_discipline.clone(),
        class_type: workout.class_type.clone(),
        workout_finished: workout.workout_finished,
        workout_start_time: workout.workout_start_time,
        workout_end_time: workout.workout_end_time,
    }
}

/// `None` when the class has no nominal length (free sessions) or a zero length.
pub fn completion_ratio(workout_length_minutes: f64, class_length: Option<f64>) -> Option<f64> {
    class_length
        .filter(|len| *len > 0.0)
        .map(|len| workout_length_minutes / len)
}

/// Unrateable workouts count as not finished.
pub fn is_finished(pct_of_class_completed: Option<f64>) -> bool {
    pct_of_class_completed.is_some_and(|pct| pct >= 1.0)
}

/// Start plus the length rounded to whole seconds, ties to even. `None` when the
/// result falls outside the representable calendar range.
pub fn end_time(start: NaiveDateTime, workout_length_minutes: f64) -> Option<NaiveDateTime> {
    let seconds = (workout_length_minutes * 60.0).round_ties_even();
    if !seconds.is_finite() || seconds.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_seconds(seconds as i64).and_then(|delta| start.checked_add_signed(delta))
}

/// Minutes from `previous_end` to `start`; negative when the workouts overlap.
pub fn gap_minutes(previous_end: NaiveDateTime, start: NaiveDateTime) -> f64 {
    (start - previous_end).num_milliseconds() as f64 / 60_000.0
}

fn serialize_error<S: serde::Serializer>(error: &RecordError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}
