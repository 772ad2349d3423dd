use chrono::NaiveDate;
use rolling_anomaly::loader::{fill_missing, load_series, parse_timestamp};
use std::{env, fs, path::PathBuf};

fn write_csv(name: &str, contents: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("loader");
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    let file = test_dir.join(name);
    fs::write(&file, contents).expect("failed to write csv file");
    file
}

#[test]
fn loads_sorted_series() {
    let file = write_csv(
        "sorted.csv",
        "id,timestamp,value\n\
         1,2024-01-01 02:00:00,3.5\n\
         2,2024-01-01 00:00:00,1.5\n\
         3,2024-01-01 01:00:00,2.5\n",
    );

    let loaded = load_series(&file, "timestamp", "value").expect("failed to load series");
    assert_eq!(loaded.n_filled, 0);

    let vals: Vec<_> = loaded.samples.iter().map(|sample| sample.value).collect();
    assert_eq!(vals, vec![1.5, 2.5, 3.5]);

    let first = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date");
    assert_eq!(loaded.samples[0].timestamp, first);
}

#[test]
fn fills_missing_values() {
    let file = write_csv(
        "missing.csv",
        "timestamp,value\n\
         2024-01-01,\n\
         2024-01-02,2.0\n\
         2024-01-03,n/a\n\
         2024-01-04,4.0\n\
         2024-01-05,\n",
    );

    let loaded = load_series(&file, "timestamp", "value").expect("failed to load series");
    assert_eq!(loaded.n_filled, 3);

    let vals: Vec<_> = loaded.samples.iter().map(|sample| sample.value).collect();
    assert_eq!(vals, vec![2.0, 2.0, 2.0, 4.0, 4.0]);
}

#[test]
fn rejects_missing_column() {
    let file = write_csv("columns.csv", "time,reading\n2024-01-01,1.0\n2024-01-02,2.0\n");

    let error = load_series(&file, "timestamp", "reading").expect_err("column should be missing");
    let message = format!("{error:#}");
    assert!(message.contains("timestamp"), "{message}");
    assert!(message.contains("reading"), "{message}");
}

#[test]
fn rejects_bad_input() {
    let file = write_csv("empty.csv", "timestamp,value\n2024-01-01,\n2024-01-02,\n");
    assert!(load_series(&file, "timestamp", "value").is_err());

    let file = write_csv("short.csv", "timestamp,value\n2024-01-01,1.0\n");
    assert!(load_series(&file, "timestamp", "value").is_err());

    let file = write_csv("badtime.csv", "timestamp,value\nyesterday,1.0\n2024-01-02,2.0\n");
    assert!(load_series(&file, "timestamp", "value").is_err());

    assert!(load_series(write_csv("gone.csv", "").with_extension("missing"), "t", "v").is_err());
}

#[test]
fn parses_timestamp_layouts() {
    let exp = NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_opt(6, 30, 0))
        .expect("valid date");

    for field in [
        "2024-03-05 06:30:00",
        "2024-03-05T06:30:00",
        "2024-03-05T06:30:00.000",
        "2024-03-05T06:30:00Z",
        "2024-03-05T08:30:00+02:00",
    ] {
        assert_eq!(parse_timestamp(field).expect("failed to parse"), exp, "{field}");
    }

    let midnight = parse_timestamp("2024-03-05").expect("failed to parse");
    assert_eq!(midnight.date(), exp.date());
}

#[test]
fn fill_missing_edges() {
    let mut vals = vec![Some(1.0), Some(2.0)];
    assert_eq!(fill_missing(&mut vals).expect("nothing to fill"), 0);

    let mut vals = vec![None, None, Some(7.0)];
    assert_eq!(fill_missing(&mut vals).expect("failed to fill"), 2);
    assert_eq!(vals, vec![Some(7.0); 3]);

    let mut vals: Vec<Option<f64>> = vec![None, None];
    assert!(fill_missing(&mut vals).is_err());
}
