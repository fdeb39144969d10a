use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "lifeline-defence"])
        .status()
        .expect("failed to invoke cargo check for lifeline-defence CLI binary");

    assert!(
        status.success(),
        "cargo check --bin lifeline-defence should succeed"
    );
}

#[test]
fn headless_session_prints_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeline-defence"))
        .args([
            "--seed",
            "11",
            "--max-seconds",
            "20",
            "--tower",
            "turret@2,0",
            "--tower",
            "turret@1,0",
            "--merge",
            "2,0",
        ])
        .output()
        .expect("failed to run lifeline-defence");

    assert!(output.status.success(), "headless session should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Lifeline Defence."));
    assert!(stdout.contains("towers:  1"), "merge should leave one tower:\n{stdout}");
}

#[test]
fn malformed_tower_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeline-defence"))
        .args(["--tower", "laser@1,1"])
        .output()
        .expect("failed to run lifeline-defence");

    assert!(!output.status.success());
}
