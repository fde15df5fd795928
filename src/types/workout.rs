use std::fmt;

use chrono::{NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

/// Top-level workout category. Labels outside the known set are kept verbatim in
/// `Other` so typos surface in reports instead of disappearing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Discipline {
    Cycling,
    Running,
    Walking,
    Strength,
    Yoga,
    Stretching,
    Meditation,
    Cardio,
    BikeBootcamp,
    Unknown,
    Other(String),
}

impl Discipline {
    pub fn parse(label: &str) -> Self {
        if is_null_token(label) {
            return Discipline::Unknown;
        }
        let normalized = label.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "unknown" => Discipline::Unknown,
            "cycling" => Discipline::Cycling,
            "running" => Discipline::Running,
            "walking" => Discipline::Walking,
            "strength" => Discipline::Strength,
            "yoga" => Discipline::Yoga,
            "stretching" => Discipline::Stretching,
            "meditation" => Discipline::Meditation,
            "cardio" => Discipline::Cardio,
            "bike_bootcamp" | "bootcamp" => Discipline::BikeBootcamp,
            _ => Discipline::Other(label.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Discipline::Cycling => "Cycling",
            Discipline::Running => "Running",
            Discipline::Walking => "Walking",
            Discipline::Strength => "Strength",
            Discipline::Yoga => "Yoga",
            Discipline::Stretching => "Stretching",
            Discipline::Meditation => "Meditation",
            Discipline::Cardio => "Cardio",
            Discipline::BikeBootcamp => "Bike Bootcamp",
            Discipline::Unknown => "Unknown",
            Discipline::Other(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Discipline::Unknown | Discipline::Other(_))
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Discipline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Sub-category within a discipline. Open-ended, so only whitespace is normalised.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClassType(String);

impl ClassType {
    pub fn parse(label: Option<&str>) -> Option<Self> {
        let label = label?.trim();
        if is_null_token(label) {
            None
        } else {
            Some(ClassType(label.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_null_token(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("na")
        || value.eq_ignore_ascii_case("nan")
        || value.eq_ignore_ascii_case("null")
}

/// One CSV row after schema validation. Keys and the timestamp stay raw so each
/// record can be rejected on its own during enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct RawWorkoutRow {
    pub row: usize,
    pub user_id: Option<String>,
    pub workout_id: Option<String>,
    pub fitness_discipline: String,
    pub class_type: Option<String>,
    pub workout_start_time: String,
    pub workout_length_minutes: f64,
    pub class_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    pub row: usize,
    pub workout_id: String,
    pub user_id: String,
    pub fitness_discipline: Discipline,
    pub class_type: Option<ClassType>,
    pub workout_start_time: NaiveDateTime,
    pub workout_end_time: NaiveDateTime,
    pub workout_length_minutes: f64,
    pub class_length: Option<f64>,
}

/// Attributes of the chronologically adjacent workout of the same user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neighbor {
    pub workout_id: String,
    pub user_id: String,
    pub fitness_discipline: Discipline,
    pub class_type: Option<ClassType>,
    pub workout_finished: bool,
    pub workout_start_time: NaiveDateTime,
    pub workout_end_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedWorkout {
    pub workout_id: String,
    pub user_id: String,
    pub fitness_discipline: Discipline,
    pub class_type: Option<ClassType>,
    pub workout_start_time: NaiveDateTime,
    pub workout_length_minutes: f64,
    pub class_length: Option<f64>,
    pub pct_of_class_completed: Option<f64>,
    pub workout_finished: bool,
    pub workout_end_time: NaiveDateTime,
    pub day_of_week: Weekday,
    pub is_weekend: bool,
    pub hour_of_day: u32,
    pub previous: Option<Neighbor>,
    pub next: Option<Neighbor>,
    pub gap_minutes_from_previous: Option<f64>,
    pub gap_minutes_to_next: Option<f64>,
}

impl EnrichedWorkout {
    pub fn previous_workout_id(&self) -> Option<&str> {
        self.previous.as_ref().map(|n| n.workout_id.as_str())
    }

    pub fn next_workout_id(&self) -> Option<&str> {
        self.next.as_ref().map(|n| n.workout_id.as_str())
    }

    pub fn previous_fitness_discipline(&self) -> Option<&Discipline> {
        self.previous.as_ref().map(|n| &n.fitness_discipline)
    }

    pub fn previous_workout_finished(&self) -> Option<bool> {
        self.previous.as_ref().map(|n| n.workout_finished)
    }

    /// True iff the previous workout of this user had `discipline` and was finished.
    pub fn occurred_after_completed(&self, discipline: &Discipline) -> bool {
        self.previous
            .as_ref()
            .is_some_and(|prev| prev.workout_finished && &prev.fitness_discipline == discipline)
    }

    /// Like `occurred_after_completed`, and the workout started at most
    /// `threshold_minutes` after that one ended. Overlapping starts never match.
    pub fn followed_completed_within(&self, discipline: &Discipline, threshold_minutes: f64) -> bool {
        self.occurred_after_completed(discipline)
            && self
                .gap_minutes_from_previous
                .is_some_and(|gap| (0.0..=threshold_minutes).contains(&gap))
    }
}
