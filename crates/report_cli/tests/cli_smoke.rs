use std::process::Command;

#[test]
fn cli_smoke_help() {
    let exe = env!("CARGO_BIN_EXE_user_reports");
    let output = Command::new(exe)
        .arg("--help")
        .output()
        .expect("failed to run user_reports --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--out-dir"));
}

#[test]
fn cli_rejects_unknown_flag() {
    let exe = env!("CARGO_BIN_EXE_user_reports");
    let output = Command::new(exe)
        .arg("--frobnicate")
        .output()
        .expect("failed to run user_reports");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR: invalid_input - "));
}
