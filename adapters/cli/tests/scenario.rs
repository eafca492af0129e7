use std::{env, fs, path::PathBuf, process::Command};

fn demo_scenario() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join("demo.json")
}

#[test]
fn demo_scenario_reports_every_turn() {
    let output = Command::new(env!("CARGO_BIN_EXE_breach-planner"))
        .arg("--scenario")
        .arg(demo_scenario())
        .arg("-q")
        .output()
        .expect("failed to run breach-planner");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("stdout is utf-8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "{stdout}");
    for (index, line) in lines.iter().enumerate() {
        assert!(line.starts_with(&format!("turn {}: defenders [", index + 1)), "{line}");
        assert!(line.contains("threatened ["), "{line}");
    }
}

#[test]
fn saved_surface_can_seed_next_run() {
    let surface = env::temp_dir().join(format!("breach-planner-surface-{}.txt", std::process::id()));

    let saved = Command::new(env!("CARGO_BIN_EXE_breach-planner"))
        .arg("--scenario")
        .arg(demo_scenario())
        .arg("--save-surface")
        .arg(&surface)
        .arg("-q")
        .status()
        .expect("failed to run breach-planner");
    assert!(saved.success());

    let encoded = fs::read_to_string(&surface).expect("surface written");
    assert!(encoded.starts_with("threat:v1:210:"));

    let loaded = Command::new(env!("CARGO_BIN_EXE_breach-planner"))
        .arg("--scenario")
        .arg(demo_scenario())
        .arg("--load-surface")
        .arg(&surface)
        .arg("-q")
        .status()
        .expect("failed to run breach-planner");
    assert!(loaded.success());

    let _ = fs::remove_file(&surface);
}

#[test]
fn missing_scenario_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_breach-planner"))
        .arg("--scenario")
        .arg("does-not-exist.json")
        .output()
        .expect("failed to run breach-planner");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read scenario"), "{stderr}");
}
