use flameprof::callgraph::build_graph;
use flameprof::flamegraph::{generate_flamegraph, prepare, LayoutConfig};
use flameprof::output::{validate_path, write_layout, write_stats, write_svg, write_text};
use flameprof::parser::{read_stats, CallStat, FunctionId, FunctionRecord};
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_records() -> Vec<FunctionRecord> {
    vec![
        FunctionRecord::new(FunctionId::new("app.py", 1, "main"), CallStat::new(1, 1, 0.5, 2.0)),
        FunctionRecord::new(FunctionId::new("app.py", 4, "step"), CallStat::new(5, 5, 1.5, 1.5))
            .called_by(FunctionId::new("app.py", 1, "main"), CallStat::new(5, 5, 1.5, 1.5)),
    ]
}

#[test]
fn test_write_and_read_stats() {
    let records = create_test_records();
    let temp_file = NamedTempFile::new().unwrap();

    write_stats(&records, temp_file.path()).unwrap();
    let loaded = read_stats(temp_file.path()).unwrap();

    assert_eq!(loaded, records);
}

#[test]
fn test_write_layout_json() {
    let graph = build_graph(create_test_records()).unwrap();
    let layout = prepare(&graph, &LayoutConfig::default());
    let temp_file = NamedTempFile::new().unwrap();

    write_layout(&layout, temp_file.path()).unwrap();

    let content = std::fs::read_to_string(temp_file.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["root_weight"], 2.0);
    assert_eq!(value["blocks"][1]["name"], "step");
    assert_eq!(value["blocks"][1]["x"], 0.5);
    assert_eq!(value["caller_blocks"][0]["color"], "root_like");
}

#[test]
fn test_write_svg_from_layout() {
    let graph = build_graph(create_test_records()).unwrap();
    let layout = prepare(&graph, &LayoutConfig::default());
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("graphs/profile.svg");

    write_svg(&generate_flamegraph(&layout, None), &path).unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.ends_with("</svg>\n"));
}

#[test]
fn test_write_text_overwrites() {
    let temp_file = NamedTempFile::new().unwrap();

    write_text("first\n", temp_file.path()).unwrap();
    write_text("second\n", temp_file.path()).unwrap();

    assert_eq!(std::fs::read_to_string(temp_file.path()).unwrap(), "second\n");
}

#[test]
fn test_validate_path() {
    let temp_dir = tempfile::tempdir().unwrap();

    assert!(validate_path(Path::new("")).is_err());
    assert!(validate_path(temp_dir.path()).is_err());
    assert!(validate_path(&temp_dir.path().join("new.svg")).is_ok());
}
