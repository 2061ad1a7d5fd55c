use flameprof::commands::{
    execute_render, render_layout, validate_args, validate_stats_file, OutputFormat, RenderArgs,
};
use flameprof::flamegraph::{FlamegraphConfig, Layout};
use std::path::{Path, PathBuf};

const STATS: &str = r#"{
  "version": "1.0.0",
  "stats": [
    { "file": "app.py", "line": 1, "name": "main", "cc": 1, "nc": 1, "tt": 2.0, "ct": 4.0 },
    { "file": "app.py", "line": 7, "name": "<parse & load>", "cc": 3, "nc": 3, "tt": 2.0, "ct": 2.0,
      "callers": [ { "file": "app.py", "line": 1, "name": "main", "cc": 3, "nc": 3, "tt": 2.0, "ct": 2.0 } ] }
  ]
}"#;

fn write_stats_file(dir: &Path) -> PathBuf {
    let path = dir.join("stats.json");
    std::fs::write(&path, STATS).unwrap();
    path
}

#[test]
fn test_validate_args_defaults() {
    assert!(validate_args(&RenderArgs::default()).is_ok());
}

#[test]
fn test_validate_args_zero_font_size() {
    let args = RenderArgs {
        flamegraph_config: FlamegraphConfig::new().with_font_size(0),
        ..Default::default()
    };

    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_args_threshold_bounds_inclusive() {
    for threshold_percent in [0.0, 100.0] {
        let args = RenderArgs {
            threshold_percent,
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }
}

#[test]
fn test_render_svg_escapes_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out/graph.svg");

    let args = RenderArgs {
        input: write_stats_file(dir.path()),
        output: Some(output.clone()),
        flamegraph_config: FlamegraphConfig::new().with_title("Run <1>"),
        ..Default::default()
    };
    execute_render(args).unwrap();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("&lt;parse &amp; load&gt;"));
    assert!(svg.contains("<title>Run &lt;1&gt;</title>"));
    assert!(!svg.contains("<parse & load>"));
}

#[test]
fn test_render_inferno() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("classic.svg");

    let args = RenderArgs {
        input: write_stats_file(dir.path()),
        output: Some(output.clone()),
        format: OutputFormat::Inferno,
        ..Default::default()
    };
    execute_render(args).unwrap();

    let svg = std::fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("main"));
}

#[test]
fn test_render_inferno_empty_layout_fails() {
    let layout = Layout {
        blocks: Vec::new(),
        caller_blocks: Vec::new(),
        root_weight: 0.0,
    };
    let args = RenderArgs {
        format: OutputFormat::Inferno,
        ..Default::default()
    };

    assert!(render_layout(&layout, &args).is_err());
}

#[test]
fn test_render_log_uses_multiplier() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("graph.log");

    let args = RenderArgs {
        input: write_stats_file(dir.path()),
        output: Some(output.clone()),
        format: OutputFormat::Log,
        log_multiplier: 10,
        ..Default::default()
    };
    execute_render(args).unwrap();

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "app.py:1:main 20\napp.py:1:main;app.py:7:<parse & load> 20\n"
    );
}

#[test]
fn test_render_save_stats_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("graph.svg");

    let args = RenderArgs {
        input: write_stats_file(dir.path()),
        output: Some(output),
        save_stats: true,
        ..Default::default()
    };
    execute_render(args).unwrap();

    // The saved copy is itself a valid input
    let saved = dir.path().join("graph.stats.json");
    assert!(validate_stats_file(&saved).is_ok());
}

#[test]
fn test_render_rejects_unknown_caller() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stats.json");
    std::fs::write(
        &input,
        r#"[{ "file": "a.py", "line": 1, "name": "f", "cc": 1, "nc": 1, "tt": 1.0, "ct": 1.0,
             "callers": [ { "file": "a.py", "line": 9, "name": "ghost", "cc": 1, "nc": 1, "tt": 1.0, "ct": 1.0 } ] }]"#,
    )
    .unwrap();

    let args = RenderArgs {
        input,
        output: Some(dir.path().join("graph.svg")),
        ..Default::default()
    };

    let err = execute_render(args).unwrap_err();
    assert!(format!("{:#}", err).contains("ghost"));
}

#[test]
fn test_validate_missing_file() {
    assert!(validate_stats_file(Path::new("/nonexistent/stats.json")).is_err());
}
