use std::collections::BTreeMap;

use serde::Serialize;

use crate::pipeline::enrich::RejectedRecord;
use crate::pipeline::query::CdfPoint;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub totals: Totals,
    pub disciplines: Vec<DisciplineSummary>,
    pub schedule: ScheduleSummary,
    pub gaps: GapSummary,
    pub post_cycling: PostCyclingSummary,
    pub transitions: Vec<TransitionSummary>,
    pub rejected: Vec<RejectedRecord>,
    pub unknown_disciplines: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub rows_loaded: usize,
    pub workouts_enriched: usize,
    pub rows_rejected: usize,
    pub users: usize,
    pub distinct_workouts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DisciplineSummary {
    pub discipline: String,
    pub workouts: usize,
    /// Workouts with a nominal class length, i.e. whose completion can be assessed.
    pub rateable_workouts: usize,
    pub finished_workouts: usize,
    /// Finished share among rateable workouts.
    pub finished_share: Option<f64>,
    pub median_length_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub by_weekday: Vec<LabelCount>,
    pub by_hour: Vec<LabelCount>,
    pub weekend_share: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GapSummary {
    pub workouts_with_previous: usize,
    pub negative_gaps: usize,
    pub negative_share: Option<f64>,
    /// Median over non-negative gaps only.
    pub median_gap_minutes: Option<f64>,
    pub cdf_max_minutes: f64,
    pub cdf: Vec<CdfPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCyclingSummary {
    pub threshold_minutes: f64,
    pub non_cycling_workouts: usize,
    pub non_cycling_after_finished_cycling: usize,
    pub non_cycling_after_finished_cycling_share: Option<f64>,
    pub by_discipline: Vec<LabelCount>,
    pub finished_cycling_workouts: usize,
    pub finished_cycling_followed_within: usize,
    pub finished_cycling_followed_share: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionSummary {
    pub from: String,
    pub to: String,
    pub count: usize,
    pub median_gap_minutes: Option<f64>,
}
