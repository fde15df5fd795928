use std::collections::BTreeMap;

use chrono::Weekday;

use crate::config::Config;
use crate::pipeline::enrich::Enrichment;
use crate::pipeline::query::{count_by, count_distinct, empirical_cdf, median, share};
use crate::types::report::{
    DisciplineSummary, GapSummary, LabelCount, PostCyclingSummary, Report, ScheduleSummary,
    TransitionSummary, Totals,
};
use crate::types::workout::{Discipline, EnrichedWorkout};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub rows_loaded: usize,
    pub threshold_minutes: f64,
    pub gap_cdf_max_minutes: f64,
    pub top_transitions: usize,
}

impl ReportOptions {
    pub fn from_config(config: &Config, rows_loaded: usize) -> Self {
        Self {
            rows_loaded,
            threshold_minutes: config.threshold_minutes,
            gap_cdf_max_minutes: config.gap_cdf_max_minutes,
            top_transitions: 10,
        }
    }
}

pub fn build_report(enrichment: &Enrichment, options: &ReportOptions) -> Report {
    let workouts = &enrichment.workouts;

    Report {
        totals: Totals {
            rows_loaded: options.rows_loaded,
            workouts_enriched: workouts.len(),
            rows_rejected: enrichment.rejected.len(),
            users: enrichment.user_count(),
            distinct_workouts: count_distinct(workouts.iter().map(|w| w.workout_id.as_str())),
        },
        disciplines: summarize_disciplines(workouts),
        schedule: summarize_schedule(workouts),
        gaps: summarize_gaps(workouts, options.gap_cdf_max_minutes),
        post_cycling: summarize_post_cycling(workouts, options.threshold_minutes),
        transitions: summarize_transitions(workouts, options.top_transitions),
        rejected: enrichment.rejected.clone(),
        unknown_disciplines: enrichment.unknown_disciplines.clone(),
    }
}

fn summarize_disciplines(workouts: &[EnrichedWorkout]) -> Vec<DisciplineSummary> {
    let mut groups: BTreeMap<&Discipline, Vec<&EnrichedWorkout>> = BTreeMap::new();
    for workout in workouts {
        groups.entry(&workout.fitness_discipline).or_default().push(workout);
    }

    let mut summaries: Vec<DisciplineSummary> = groups
        .into_iter()
        .map(|(discipline, group)| {
            let rateable: Vec<&&EnrichedWorkout> = group
                .iter()
                .filter(|w| w.pct_of_class_completed.is_some())
                .collect();
            DisciplineSummary {
                discipline: discipline.to_string(),
                workouts: count_distinct(group.iter().map(|w| w.workout_id.as_str())),
                rateable_workouts: rateable.len(),
                finished_workouts: group.iter().filter(|w| w.workout_finished).count(),
                finished_share: share(rateable.iter(), |w| w.workout_finished),
                median_length_minutes: median(group.iter().map(|w| Some(w.workout_length_minutes))),
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.workouts.cmp(&a.workouts).then_with(|| a.discipline.cmp(&b.discipline)));
    summaries
}

fn summarize_schedule(workouts: &[EnrichedWorkout]) -> ScheduleSummary {
    let weekday_counts = count_by(workouts.iter(), |w| w.day_of_week.num_days_from_monday());
    let hour_counts = count_by(workouts.iter(), |w| w.hour_of_day);

    ScheduleSummary {
        by_weekday: WEEKDAYS
            .iter()
            .map(|day| LabelCount {
                label: day.to_string(),
                count: weekday_counts
                    .get(&day.num_days_from_monday())
                    .copied()
                    .unwrap_or(0),
            })
            .collect(),
        by_hour: (0..24)
            .map(|hour| LabelCount {
                label: format!("{:02}", hour),
                count: hour_counts.get(&hour).copied().unwrap_or(0),
            })
            .collect(),
        weekend_share: share(workouts.iter(), |w| w.is_weekend),
    }
}

fn summarize_gaps(workouts: &[EnrichedWorkout], cdf_max_minutes: f64) -> GapSummary {
    let gaps: Vec<f64> = workouts
        .iter()
        .filter_map(|w| w.gap_minutes_from_previous)
        .collect();
    let non_negative = || gaps.iter().copied().filter(|g| *g >= 0.0).map(Some);

    let cdf = empirical_cdf(non_negative())
        .into_iter()
        .filter(|point| point.value <= cdf_max_minutes)
        .collect();

    GapSummary {
        workouts_with_previous: gaps.len(),
        negative_gaps: gaps.iter().filter(|g| **g < 0.0).count(),
        negative_share: share(gaps.iter(), |g| **g < 0.0),
        median_gap_minutes: median(non_negative()),
        cdf_max_minutes,
        cdf,
    }
}

fn summarize_post_cycling(workouts: &[EnrichedWorkout], threshold_minutes: f64) -> PostCyclingSummary {
    let cycling = Discipline::Cycling;

    let non_cycling: Vec<&EnrichedWorkout> = workouts
        .iter()
        .filter(|w| w.fitness_discipline != cycling)
        .collect();
    let after_cycling: Vec<&EnrichedWorkout> = non_cycling
        .iter()
        .copied()
        .filter(|w| w.followed_completed_within(&cycling, threshold_minutes))
        .collect();

    let finished_cycling: Vec<&EnrichedWorkout> = workouts
        .iter()
        .filter(|w| w.fitness_discipline == cycling && w.workout_finished)
        .collect();
    let followed_within = |w: &EnrichedWorkout| {
        w.gap_minutes_to_next
            .is_some_and(|gap| (0.0..=threshold_minutes).contains(&gap))
    };

    PostCyclingSummary {
        threshold_minutes,
        non_cycling_workouts: non_cycling.len(),
        non_cycling_after_finished_cycling: after_cycling.len(),
        non_cycling_after_finished_cycling_share: share(non_cycling.iter(), |w| {
            w.followed_completed_within(&cycling, threshold_minutes)
        }),
        by_discipline: ranked(count_by(after_cycling.iter(), |w| w.fitness_discipline.to_string())),
        finished_cycling_workouts: finished_cycling.len(),
        finished_cycling_followed_within: finished_cycling
            .iter()
            .filter(|w| followed_within(w))
            .count(),
        finished_cycling_followed_share: share(finished_cycling.iter(), |w| followed_within(w)),
    }
}

fn summarize_transitions(workouts: &[EnrichedWorkout], limit: usize) -> Vec<TransitionSummary> {
    let mut groups: BTreeMap<(String, String), Vec<Option<f64>>> = BTreeMap::new();
    for workout in workouts {
        let Some(previous) = workout.previous.as_ref() else {
            continue;
        };
        groups
            .entry((
                previous.fitness_discipline.to_string(),
                workout.fitness_discipline.to_string(),
            ))
            .or_default()
            .push(workout.gap_minutes_from_previous.filter(|g| *g >= 0.0));
    }

    let mut transitions: Vec<TransitionSummary> = groups
        .into_iter()
        .map(|((from, to), gaps)| TransitionSummary {
            from,
            to,
            count: gaps.len(),
            median_gap_minutes: median(gaps),
        })
        .collect();

    transitions.sort_by(|a, b| b.count.cmp(&a.count));
    transitions.truncate(limit);
    transitions
}

/// Counts ordered by descending count; ties keep label order.
fn ranked(counts: BTreeMap<String, usize>) -> Vec<LabelCount> {
    let mut entries: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

pub fn log_summary(report: &Report) {
    let totals = &report.totals;
    tracing::info!(
        "{} rows loaded, {} workouts enriched, {} rejected, {} users",
        totals.rows_loaded,
        totals.workouts_enriched,
        totals.rows_rejected,
        totals.users
    );
    for discipline in &report.disciplines {
        tracing::info!(
            "{}: {} workouts, finished share {}",
            discipline.discipline,
            discipline.workouts,
            format_share(discipline.finished_share)
        );
    }
    tracing::info!(
        "Negative gaps: {} of {} ({})",
        report.gaps.negative_gaps,
        report.gaps.workouts_with_previous,
        format_share(report.gaps.negative_share)
    );
    let post = &report.post_cycling;
    tracing::info!(
        "Non-cycling workouts started within {} min of a finished cycling workout: {} of {} ({})",
        post.threshold_minutes,
        post.non_cycling_after_finished_cycling,
        post.non_cycling_workouts,
        format_share(post.non_cycling_after_finished_cycling_share)
    );
    tracing::info!(
        "Finished cycling workouts followed by another workout within {} min: {} of {} ({})",
        post.threshold_minutes,
        post.finished_cycling_followed_within,
        post.finished_cycling_workouts,
        format_share(post.finished_cycling_followed_share)
    );
}

fn format_share(share: Option<f64>) -> String {
    share
        .map(|s| format!("{:.1}%", s * 100.0))
        .unwrap_or_else(|| "n/a".to_string())
}
