use std::process::Command;

fn panel_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_atv320-panel"))
}

#[test]
fn test_cli_help() {
    let output = panel_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute atv320-panel binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage: atv320-panel"));
    assert!(stdout.contains("--list-ports"));
}

#[test]
fn test_cli_list_ports_json() {
    let output = panel_bin()
        .args(["--list-ports", "--json", "--log-file", "/dev/null"])
        .output()
        .expect("Failed to execute atv320-panel binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(&stdout).expect("list-ports --json prints JSON");
    assert!(value.is_array());
}

#[test]
fn test_cli_json_requires_list_ports() {
    let output = panel_bin()
        .arg("--json")
        .output()
        .expect("Failed to execute atv320-panel binary");
    assert!(!output.status.success());
}

#[test]
fn test_cli_rejects_bad_station_id() {
    let output = panel_bin()
        .args(["--station-id", "0", "--log-file", "/dev/null"])
        .output()
        .expect("Failed to execute atv320-panel binary");
    assert!(!output.status.success());
}
