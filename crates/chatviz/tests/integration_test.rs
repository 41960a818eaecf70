//! Integration tests for the chatviz front end.

use chatviz::{resolve_config, run_report, Args};
use chatviz_common::test_utils::{init_test_logging, write_export, SAMPLE_EXPORT};
use chatviz_config::ChartKind;
use clap::Parser;

#[test]
fn test_flags_parse() {
    let args = Args::try_parse_from([
        "chatviz",
        "-i",
        "debate.json",
        "--output-dir",
        "out",
        "--aggregates",
        "agg.json",
        "-l",
        "debug",
    ])
    .unwrap();

    assert_eq!(args.input.as_deref(), Some("debate.json"));
    assert_eq!(args.output_dir.as_deref(), Some("out"));
    assert_eq!(args.aggregates.as_deref(), Some("agg.json"));
    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert!(args.config.is_none());
}

#[test]
fn test_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("chatviz.yaml");
    std::fs::write(
        &config_path,
        "input:\n  path: from_file.json\noutput:\n  directory: file_out\ngraph:\n  top_n: 5\n",
    )
    .unwrap();

    let args = Args {
        config: Some(config_path),
        output_dir: Some("flag_out".to_string()),
        ..Args::default()
    };
    let config = resolve_config(&args).unwrap();

    assert_eq!(config.input.path, "from_file.json");
    assert_eq!(config.output.directory, "flag_out");
    assert_eq!(config.graph.top_n, 5);
}

#[test]
fn test_invalid_log_level_flag_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("chatviz.yaml");
    std::fs::write(&config_path, "graph:\n  top_n: 3\n").unwrap();

    let args = Args {
        config: Some(config_path),
        log_level: Some("loud".to_string()),
        ..Args::default()
    };

    assert!(resolve_config(&args).is_err());
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("chatviz.yaml");
    std::fs::write(&config_path, "output:\n  charts: [source_distribution]\n").unwrap();

    let args = Args {
        config: Some(config_path),
        input: Some(dir.path().join("absent.json").to_string_lossy().into_owned()),
        output_dir: Some(dir.path().to_string_lossy().into_owned()),
        ..Args::default()
    };
    let config = resolve_config(&args).unwrap();

    let err = run_report(config).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
    assert!(!dir.path().join(ChartKind::SourceDistribution.file_name()).exists());
}

#[test]
fn test_report_writes_aggregates() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let input = write_export(dir.path(), SAMPLE_EXPORT);
    let config_path = dir.path().join("chatviz.yaml");
    std::fs::write(&config_path, "graph:\n  top_n: 2\n").unwrap();
    let aggregates = dir.path().join("aggregates.json");

    let args = Args {
        config: Some(config_path),
        input: Some(input.to_string_lossy().into_owned()),
        output_dir: Some(dir.path().join("charts").to_string_lossy().into_owned()),
        aggregates: Some(aggregates.to_string_lossy().into_owned()),
        ..Args::default()
    };
    let config = resolve_config(&args).unwrap();

    // Rendering needs a system font; the dump is written first either way
    let _ = run_report(config);

    let dumped: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&aggregates).unwrap()).unwrap();
    assert_eq!(dumped["cleaning"]["rows"], 5);
    assert_eq!(dumped["top_authors"].as_array().unwrap().len(), 2);
    assert_eq!(dumped["top_authors"][0]["name"], "alice");
}
