use std::io::Write;

use workout_timeline::error::LoadError;
use workout_timeline::pipeline::load::{load_csv, read_csv};

const HEADER: &str = "\"\",user_id,workout_id,fitness_discipline,class_type,workout_start_time,workout_length_minutes,class_length\n";

fn csv_with(rows: &[&str]) -> String {
    let mut body = HEADER.to_string();
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    body
}

#[test]
fn reads_rows_and_ignores_index_column() {
    let body = csv_with(&[
        "1,u1,w1,cycling,Climb,2019-01-07 09:00:00,30,30",
        "2,u1,w2,strength,NA,2019-01-07 09:35:00,20.5,NA",
    ]);
    let rows = read_csv(body.as_bytes()).expect("rows");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row, 1);
    assert_eq!(rows[0].user_id.as_deref(), Some("u1"));
    assert_eq!(rows[0].class_type.as_deref(), Some("Climb"));
    assert_eq!(rows[0].class_length, Some(30.0));
    assert_eq!(rows[1].class_type, None);
    assert_eq!(rows[1].workout_length_minutes, 20.5);
    assert_eq!(rows[1].class_length, None);
}

#[test]
fn empty_keys_load_as_missing() {
    let body = csv_with(&["1,,w1,cycling,,2019-01-07 09:00:00,30,", "2,u1,NA,yoga,,garbage,10,10"]);
    let rows = read_csv(body.as_bytes()).expect("rows");

    assert_eq!(rows[0].user_id, None);
    assert_eq!(rows[0].class_length, None);
    assert_eq!(rows[1].workout_id, None);
    assert_eq!(rows[1].workout_start_time, "garbage");
}

#[test]
fn missing_column_aborts() {
    let body = "user_id,workout_id,fitness_discipline,workout_start_time,workout_length_minutes,class_length\n";
    let err = read_csv(body.as_bytes()).expect_err("missing class_type");
    assert!(matches!(err, LoadError::MissingColumn("class_type")));
}

#[test]
fn non_numeric_length_aborts() {
    let body = csv_with(&["1,u1,w1,cycling,,2019-01-07 09:00:00,thirty,30"]);
    let err = read_csv(body.as_bytes()).expect_err("bad length");
    assert!(matches!(
        err,
        LoadError::InvalidValue {
            row: 1,
            column: "workout_length_minutes",
            ..
        }
    ));
}

#[test]
fn negative_or_missing_length_aborts() {
    let negative = csv_with(&["1,u1,w1,cycling,,2019-01-07 09:00:00,-3,30"]);
    assert!(matches!(
        read_csv(negative.as_bytes()),
        Err(LoadError::InvalidValue { .. })
    ));

    let missing = csv_with(&["1,u1,w1,cycling,,2019-01-07 09:00:00,,30"]);
    assert!(matches!(
        read_csv(missing.as_bytes()),
        Err(LoadError::InvalidValue { .. })
    ));
}

#[test]
fn ragged_row_aborts() {
    let body = csv_with(&["1,u1,w1,cycling,,2019-01-07 09:00:00,30"]);
    let err = read_csv(body.as_bytes()).expect_err("short row");
    assert!(matches!(err, LoadError::Csv(_)));
}

#[test]
fn loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(csv_with(&["1,u1,w1,cycling,,2019-01-07 09:00:00,30,30"]).as_bytes())
        .expect("write csv");

    let rows = load_csv(file.path()).expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fitness_discipline, "cycling");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = load_csv(&dir.path().join("absent.csv")).expect_err("missing file");
    assert!(matches!(err, LoadError::Io(_)));
}
