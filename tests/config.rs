use rolling_anomaly::WindowPolicy;
use rolling_anomaly::config::Config;

#[test]
fn empty_config_uses_defaults() {
    let cfg = Config::from_toml_str("").expect("failed to parse config");
    assert_eq!(cfg, Config::default());

    assert_eq!(cfg.input.pattern, "data.csv");
    assert_eq!(cfg.detection.window_size, 20);
    assert_eq!(cfg.detection.threshold, 2.5);
    assert_eq!(cfg.detection.window_policy, WindowPolicy::Full);
    assert_eq!(cfg.output.top_anomalies, 5);
    assert_eq!(cfg.generate.n_points, 500);
    assert_eq!(cfg.generate.seed, 42);
}

#[test]
fn full_config() {
    let contents = String::new()
        + "[input]\n"
        + "pattern = \"series-*.csv\"\n"
        + "timestamp_column = \"time\"\n"
        + "value_column = \"load\"\n"
        + "\n"
        + "[detection]\n"
        + "window_size = 48\n"
        + "threshold = 3.0\n"
        + "window_policy = \"partial\"\n"
        + "\n"
        + "[output]\n"
        + "top_anomalies = 10\n"
        + "write_anomalies = false\n"
        + "\n"
        + "[generate]\n"
        + "n_points = 1000\n"
        + "start_date = \"2023-06-01\"\n"
        + "include_anomalies = false\n"
        + "seed = 7\n";

    let cfg = Config::from_toml_str(&contents).expect("failed to parse config");
    assert_eq!(cfg.input.timestamp_column, "time");
    assert_eq!(cfg.input.value_column, "load");

    let params = cfg.detection.params();
    assert_eq!(params.window_size, 48);
    assert_eq!(params.threshold, 3.0);
    assert_eq!(params.window_policy, WindowPolicy::Partial);

    assert!(!cfg.output.write_anomalies);
    assert!(!cfg.generate.include_anomalies);
    assert_eq!(cfg.generate.start_date().expect("valid date").to_string(), "2023-06-01");
}

#[test]
fn invalid_configs_are_rejected() {
    let invalid = [
        "[detection]\nwindow_size = 0\n",
        "[detection]\nwindow_size = 2.5\n",
        "[detection]\nthreshold = -1.0\n",
        "[detection]\nthreshold = 0.0\n",
        "[detection]\nthreshold = 1000.0\n",
        "[detection]\nwindow_policy = \"sometimes\"\n",
        "[input]\npattern = \"\"\n",
        "[input]\ntimestamp_column = \"value\"\n",
        "[output]\ntop_anomalies = 5000\n",
        "[generate]\nn_points = 1\n",
        "[generate]\nstart_date = \"01/01/2024\"\n",
        "[detection]\nwindow = 10\n",
    ];

    for contents in invalid {
        assert!(
            Config::from_toml_str(contents).is_err(),
            "config should be rejected:\n{contents}"
        );
    }
}
