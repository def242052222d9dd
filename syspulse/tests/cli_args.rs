//! CLI arg parsing tests for syspulse. Everything here exits before touching the network.
use assert_cmd::Command;
use tempfile::TempDir;

/// The binary with an empty config home. Keep the `TempDir` alive until the command has run.
fn syspulse() -> (Command, TempDir) {
    let td = tempfile::tempdir().expect("tempdir");
    let mut cmd = Command::cargo_bin("syspulse").expect("binary built");
    // Keep the developer's environment out of the resolved config.
    cmd.env_remove("SYSPULSE_WS_URL")
        .env_remove("SYSPULSE_MAX_POINTS")
        .env_remove("SYSPULSE_RECONNECT_MS")
        .env("XDG_CONFIG_HOME", td.path());
    (cmd, td)
}

fn output_text(out: &std::process::Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    )
}

#[test]
fn help_mentions_short_and_long_flags() {
    let (mut cmd, _home) = syspulse();
    let out = cmd.arg("--help").output().expect("run syspulse --help");
    assert!(out.status.success());
    let text = output_text(&out);
    for flag in [
        "--max-points",
        "-n",
        "--reconnect-delay-ms",
        "-r",
        "--config",
        "--log-file",
        "--dry-run",
        "--sort",
    ] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn dry_run_prints_defaults() {
    let (mut cmd, _home) = syspulse();
    let out = cmd.arg("--dry-run").output().expect("run syspulse");
    assert!(out.status.success(), "{}", output_text(&out));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("ws_url: ws://localhost:8000/ws/metrics"), "{text}");
    assert!(text.contains("max_data_points: 60"), "{text}");
    assert!(text.contains("reconnect_delay_ms: 3000"), "{text}");
}

#[test]
fn flags_override_defaults() {
    let (mut cmd, _home) = syspulse();
    let out = cmd
        .args(["ws://example:9/ws", "-n", "120", "--reconnect-delay-ms", "500", "--dry-run"])
        .output()
        .expect("run syspulse");
    assert!(out.status.success(), "{}", output_text(&out));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("ws_url: ws://example:9/ws"), "{text}");
    assert!(text.contains("max_data_points: 120"), "{text}");
    assert!(text.contains("reconnect_delay_ms: 500"), "{text}");
}

#[test]
fn env_vars_are_read() {
    let (mut cmd, _home) = syspulse();
    let out = cmd
        .env("SYSPULSE_WS_URL", "wss://metrics.internal/ws")
        .env("SYSPULSE_MAX_POINTS", "30")
        .arg("--dry-run")
        .output()
        .expect("run syspulse");
    assert!(out.status.success(), "{}", output_text(&out));
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("ws_url: wss://metrics.internal/ws"), "{text}");
    assert!(text.contains("max_data_points: 30"), "{text}");
}

#[test]
fn config_home_is_removed_after_the_run() {
    let (mut cmd, home) = syspulse();
    let path = home.path().to_path_buf();
    let out = cmd.arg("--dry-run").output().expect("run syspulse");
    assert!(out.status.success(), "{}", output_text(&out));
    drop(home);
    assert!(!path.exists(), "temporary config home leaked: {}", path.display());
}

#[test]
fn invalid_values_are_rejected() {
    for args in [
        &["--max-points", "0", "--dry-run"][..],
        &["--reconnect-delay-ms", "0", "--dry-run"][..],
        &["http://example/ws", "--dry-run"][..],
        &["--max-points", "lots", "--dry-run"][..],
        &["--sort", "bogus", "--dry-run"][..],
    ] {
        let (mut cmd, _home) = syspulse();
        let out = cmd.args(args).output().expect("run syspulse");
        assert!(!out.status.success(), "{args:?} should fail");
    }
}

#[test]
fn missing_explicit_config_fails() {
    let (mut cmd, _home) = syspulse();
    let out = cmd
        .args(["--config", "/nonexistent/syspulse/config.json", "--dry-run"])
        .output()
        .expect("run syspulse");
    assert!(!out.status.success());
    assert!(output_text(&out).contains("does not exist"));
}
