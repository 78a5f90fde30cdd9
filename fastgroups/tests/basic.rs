use serde_json::json;
use std::path::Path;
use std::process::Command;

fn write_graph(path: &Path, variant: &str) {
    let graph = json!({
        "name": "cli",
        "nodes": [
            {"id": 1, "kind": "Loader", "pos": [10.0, 10.0]},
            {"id": 2, "kind": "Saver", "pos": [10.0, 210.0]},
            {"id": 3, "kind": "PrimitiveNode", "pos": [500.0, 500.0], "widgets_values": ["false"]},
            {"id": 4, "kind": "Toggle", "pos": [500.0, 600.0], "boolean_widget": true},
            {"id": 100, "kind": "Remote", "pos": [800.0, 0.0]}
        ],
        "groups": [
            {"title": "Load", "bounding": [0.0, 0.0, 100.0, 100.0]},
            {"title": "Save", "bounding": [0.0, 200.0, 100.0, 100.0]}
        ],
        "links": [
            {"id": 1, "from_node": 3, "to_node": 100, "to_input": "Enable Load"},
            {"id": 2, "from_node": 4, "to_node": 100, "to_input": "Enable Save"}
        ],
        "controllers": [
            {"id": 100, "variant": variant}
        ]
    });
    std::fs::write(path, serde_json::to_vec_pretty(&graph).unwrap()).unwrap();
}

#[test]
fn slots_lists_one_input_per_group() {
    let exe = env!("CARGO_BIN_EXE_fastgroups");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    write_graph(&path, "muter");

    let output = Command::new(exe)
        .args(["slots", path.to_str().unwrap()])
        .output()
        .expect("run slots");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[FastGroups][INFO] 100 - Fast Groups Muter Remote"));
    assert!(stdout.contains("Enable Load [BOOLEAN] <- link 1"));
    assert!(stdout.contains("Enable Save [BOOLEAN] <- link 2"));
    assert!(stdout.contains("out: OPT_CONNECTION [*]"));
}

#[test]
fn slots_json_reports_inputs() {
    let exe = env!("CARGO_BIN_EXE_fastgroups");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    write_graph(&path, "bypasser");

    let output = Command::new(exe)
        .args(["slots", path.to_str().unwrap(), "--json"])
        .output()
        .expect("run slots");
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary[0]["variant"], "Fast Groups Bypasser Remote");
    assert_eq!(summary[0]["inputs"].as_array().unwrap().len(), 2);
}

#[test]
fn simulate_applies_modes_and_writes_graph() {
    let exe = env!("CARGO_BIN_EXE_fastgroups");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let out = dir.path().join("applied.json");
    write_graph(&path, "bypasser");

    let output = Command::new(exe)
        .args(["simulate", path.to_str().unwrap(), "--output", out.to_str().unwrap()])
        .output()
        .expect("run simulate");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Load (inactive): 1=bypassed"));
    assert!(stdout.contains("Save (active): 2=always"));

    let applied: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    let nodes = applied["nodes"].as_array().unwrap();
    assert_eq!(nodes[0]["mode"], json!("bypass"));
}

#[test]
fn variant_override_switches_to_muting() {
    let exe = env!("CARGO_BIN_EXE_fastgroups");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    write_graph(&path, "bypasser");

    let output = Command::new(exe)
        .args(["simulate", path.to_str().unwrap(), "--variant", "muter"])
        .output()
        .expect("run simulate");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Load (inactive): 1=muted"));
}

#[test]
fn unknown_variant_fails() {
    let exe = env!("CARGO_BIN_EXE_fastgroups");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    write_graph(&path, "muter");

    let output = Command::new(exe)
        .args(["slots", path.to_str().unwrap(), "--variant", "shouter"])
        .output()
        .expect("run slots");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[FastGroups][ERROR]"));
    assert!(stderr.contains("shouter"));
}
