use std::fs;
use std::process::Command;

fn reactor() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reactor"))
}

#[test]
fn test_headless_run_prints_frames() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("panel.toml");
    fs::write(
        &config,
        r#"
        bar_count = 16
        target_fps = 500.0

        [log]
        console_output = false
        "#,
    )
    .unwrap();

    let output = reactor()
        .args(["--config", config.to_str().unwrap()])
        .args(["--frames", "40", "--print-every", "20"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].trim_start().starts_with("20 |"));
    assert!(lines[1].trim_start().starts_with("40 |"));
    assert!(lines[1].ends_with('%'));
}

#[test]
fn test_file_logging() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    let config = dir.path().join("panel.toml");
    fs::write(
        &config,
        format!(
            "target_fps = 500.0\n[log]\nconsole_output = false\nfile_output = true\nlog_directory = {:?}\n",
            logs.to_str().unwrap()
        ),
    )
    .unwrap();

    let output = reactor()
        .args(["--config", config.to_str().unwrap(), "--frames", "5"])
        .env_remove("RUST_LOG")
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);

    let log = fs::read_to_string(logs.join("reactor.log")).unwrap();
    assert!(log.contains("Reactor Session Started"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("panel.toml");
    fs::write(&config, "bar_color = \"purple\"").unwrap();

    let output = reactor()
        .args(["--config", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load config"));
}

#[test]
fn test_help() {
    let output = reactor().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: reactor"));
    assert!(stdout.contains("--print-every"));
}

#[test]
fn test_zero_print_every_rejected() {
    let output = reactor()
        .args(["--frames", "1", "--print-every", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--print-every"));
}
