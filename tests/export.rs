use rolling_anomaly::analysis::Summary;
use rolling_anomaly::export::{write_anomalies, write_summary};
use rolling_anomaly::{Params, Sample, analyze};
use std::{env, fs, path::PathBuf};

fn test_file(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("export");
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    test_dir.join(name)
}

fn spiked_series() -> Vec<Sample<usize>> {
    let mut vals = vec![10.0, 11.0, 9.0, 10.0, 11.0, 9.0, 10.0, 11.0, 9.0, 10.0];
    vals.push(40.0);
    vals.extend([10.0, 11.0, 9.0]);
    vals.into_iter()
        .enumerate()
        .map(|(timestamp, value)| Sample { timestamp, value })
        .collect()
}

#[test]
fn summary_file_is_complete_on_return() {
    let result = analyze(&spiked_series(), &Params::new(5, 1.5)).expect("failed to analyze");
    let summary = Summary::from_result(&result, 3);

    let file = test_file("spiked.summary.json");
    write_summary(&file, &summary).expect("failed to write summary");

    let contents = fs::read_to_string(&file).expect("failed to read summary");
    let json: serde_json::Value = serde_json::from_str(&contents).expect("invalid summary json");
    assert_eq!(json["n_points"], 14);
    assert_eq!(json["window_size"], 5);
    assert_eq!(json["n_anomalies"], summary.n_anomalies);
    assert!(summary.n_anomalies >= 1);

    let top = json["top_anomalies"].as_array().expect("top anomalies is an array");
    assert_eq!(top.len(), summary.top_anomalies.len());
    assert_eq!(top[0]["value"], 40.0);
}

#[test]
fn anomalies_table_has_header_when_empty() {
    let samples: Vec<_> = (0..8)
        .map(|timestamp| Sample { timestamp, value: 1.0 })
        .collect();
    let result = analyze(&samples, &Params::new(3, 2.0)).expect("failed to analyze");
    assert_eq!(result.n_anomalies(), 0);

    let file = test_file("flat.anomalies.csv");
    write_anomalies(&file, &result).expect("failed to write anomalies");

    let contents = fs::read_to_string(&file).expect("failed to read anomalies");
    assert_eq!(contents.trim_end(), "timestamp,value,z_score,rolling_mean");
}
