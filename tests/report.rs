use workout_timeline::pipeline::enrich::enrich;
use workout_timeline::pipeline::output::{write_report, REPORT_FILE};
use workout_timeline::pipeline::report::{build_report, ReportOptions};
use workout_timeline::types::report::Report;
use workout_timeline::types::workout::RawWorkoutRow;

fn row(user: &str, id: &str, discipline: &str, start: &str, length: f64, class_length: Option<f64>) -> RawWorkoutRow {
    RawWorkoutRow {
        row: 0,
        user_id: Some(user.to_string()),
        workout_id: Some(id.to_string()),
        fitness_discipline: discipline.to_string(),
        class_type: None,
        workout_start_time: start.to_string(),
        workout_length_minutes: length,
        class_length,
    }
}

fn fixture() -> Vec<RawWorkoutRow> {
    vec![
        row("a", "a1", "cycling", "2019-01-07 09:00:00", 30.0, Some(30.0)),
        row("a", "a2", "strength", "2019-01-07 09:35:00", 10.0, Some(10.0)),
        row("a", "a3", "cycling", "2019-01-07 18:00:00", 20.0, Some(30.0)),
        row("a", "a4", "yoga", "2019-01-07 18:25:00", 15.0, None),
        row("b", "b1", "cycling", "2019-01-12 07:00:00", 45.0, Some(45.0)),
        row("b", "b2", "stretching", "2019-01-12 07:40:00", 5.0, Some(5.0)),
        row("b", "b3", "stretching", "2019-01-12 08:00:00", 10.0, Some(10.0)),
        row("c", "c1", "meditation", "2019-01-08 21:00:00", 10.0, Some(10.0)),
    ]
}

fn report() -> Report {
    let rows = fixture();
    let enrichment = enrich(&rows);
    let options = ReportOptions {
        rows_loaded: rows.len(),
        threshold_minutes: 10.0,
        gap_cdf_max_minutes: 120.0,
        top_transitions: 10,
    };
    build_report(&enrichment, &options)
}

#[test]
fn totals_count_users_and_workouts() {
    let report = report();
    assert_eq!(report.totals.rows_loaded, 8);
    assert_eq!(report.totals.workouts_enriched, 8);
    assert_eq!(report.totals.rows_rejected, 0);
    assert_eq!(report.totals.users, 3);
    assert_eq!(report.totals.distinct_workouts, 8);
}

#[test]
fn discipline_summary_uses_rateable_workouts() {
    let report = report();
    let names: Vec<&str> = report.disciplines.iter().map(|d| d.discipline.as_str()).collect();
    assert_eq!(names, vec!["Cycling", "Stretching", "Meditation", "Strength", "Yoga"]);

    let cycling = &report.disciplines[0];
    assert_eq!(cycling.workouts, 3);
    assert_eq!(cycling.finished_workouts, 2);
    assert_eq!(cycling.finished_share, Some(2.0 / 3.0));
    assert_eq!(cycling.median_length_minutes, Some(30.0));

    let yoga = &report.disciplines[4];
    assert_eq!(yoga.rateable_workouts, 0);
    assert_eq!(yoga.finished_share, None);
}

#[test]
fn schedule_counts_every_weekday_and_hour() {
    let report = report();
    let weekday: Vec<(&str, usize)> = report
        .schedule
        .by_weekday
        .iter()
        .map(|c| (c.label.as_str(), c.count))
        .collect();
    assert_eq!(
        weekday,
        vec![("Mon", 4), ("Tue", 1), ("Wed", 0), ("Thu", 0), ("Fri", 0), ("Sat", 3), ("Sun", 0)]
    );
    assert_eq!(report.schedule.by_hour.len(), 24);
    assert_eq!(report.schedule.by_hour[18].count, 2);
    assert_eq!(report.schedule.weekend_share, Some(0.375));
}

#[test]
fn negative_gaps_are_counted_but_kept_out_of_the_cdf() {
    let report = report();
    assert_eq!(report.gaps.workouts_with_previous, 5);
    assert_eq!(report.gaps.negative_gaps, 1);
    assert_eq!(report.gaps.negative_share, Some(0.2));
    assert_eq!(report.gaps.median_gap_minutes, Some(10.0));

    let cdf: Vec<(f64, f64)> = report
        .gaps
        .cdf
        .iter()
        .map(|p| (p.value, p.cumulative_share))
        .collect();
    assert_eq!(cdf, vec![(5.0, 0.5), (15.0, 0.75)]);
}

#[test]
fn post_cycling_shares_respect_threshold_and_overlap() {
    let report = report();
    let post = &report.post_cycling;

    assert_eq!(post.non_cycling_workouts, 5);
    assert_eq!(post.non_cycling_after_finished_cycling, 1);
    assert_eq!(post.non_cycling_after_finished_cycling_share, Some(0.2));
    assert_eq!(post.by_discipline.len(), 1);
    assert_eq!(post.by_discipline[0].label, "Strength");
    assert_eq!(post.finished_cycling_workouts, 2);
    assert_eq!(post.finished_cycling_followed_within, 1);
    assert_eq!(post.finished_cycling_followed_share, Some(0.5));
}

#[test]
fn transitions_exclude_negative_gaps_from_medians() {
    let report = report();
    assert_eq!(report.transitions.len(), 5);

    let first = &report.transitions[0];
    assert_eq!((first.from.as_str(), first.to.as_str()), ("Cycling", "Strength"));
    assert_eq!(first.median_gap_minutes, Some(5.0));

    let overlap = report
        .transitions
        .iter()
        .find(|t| t.from == "Cycling" && t.to == "Stretching")
        .expect("cycling to stretching");
    assert_eq!(overlap.count, 1);
    assert_eq!(overlap.median_gap_minutes, None);
}

#[test]
fn writes_report_json_without_charts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let written = write_report(&report(), dir.path(), None).expect("write report");

    assert_eq!(written, vec![dir.path().join(REPORT_FILE)]);
    let body = std::fs::read(dir.path().join(REPORT_FILE)).expect("read report");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("report json");
    assert_eq!(json["totals"]["users"], 3);
    assert_eq!(json["post_cycling"]["non_cycling_after_finished_cycling"], 1);
}
