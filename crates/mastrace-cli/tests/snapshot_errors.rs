use assert_cmd::cargo::cargo_bin_cmd;
use mastrace_testing::TestWorld;
use mastrace_testing::fixtures::BETA;
use predicates::prelude::*;

#[test]
fn test_missing_snapshot_file() {
    // no snapshot written into the world
    let world = TestWorld::new();
    let result = world.run(&["session", "list"]).unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(result.stderr().starts_with("Error: Snapshot not found"));
    assert!(result.stdout().is_empty());
}

#[test]
fn test_snapshot_missing_a_table() {
    let world = TestWorld::new().with_snapshot(|b| {
        b.execute("DROP TABLE function_calls;")?;
        Ok(())
    });

    let mut cmd = cargo_bin_cmd!("mastrace");
    world.configure_command(&mut cmd).args(["session", "list"]);
    cmd.assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing table 'function_calls'"));
}

#[test]
fn test_malformed_usage_aborts() {
    let world = TestWorld::new().with_snapshot(|b| {
        b.execute(
            "INSERT INTO chat_completions \
             (id, invocation_id, client_id, wrapper_id, session_id, request, response, \
              is_cached, cost, start_time, end_time) \
             VALUES (1, 'I1', 'C1', 'W1', 'S1', '{}', '{\"usage\": \"abc\"}', 0, 0.1, \
              '2024-05-01 10:00:00', '2024-05-01 10:00:01');",
        )?;
        Ok(())
    });

    let mut cmd = cargo_bin_cmd!("mastrace");
    world.configure_command(&mut cmd).args(["session", "list"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_no_snapshot_configured() {
    let world = TestWorld::new().without_snapshot_flag();
    let result = world.run(&["session", "list"]).unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("No snapshot given"));
}

#[test]
fn test_default_snapshot_from_config() {
    let world = TestWorld::new().with_sample_snapshot();
    let config = format!(
        "default_snapshot = {:?}\n",
        world.snapshot_path().display().to_string()
    );
    let world = world
        .with_config(&config)
        .without_snapshot_flag()
        .with_format("json");

    let result = world.run(&["session", "list", "--status", "failed"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());
    assert_eq!(result.json().unwrap()["content"]["sessions"][0]["session_id"], BETA);
}

#[test]
fn test_invalid_config_is_reported() {
    let world = TestWorld::new()
        .with_sample_snapshot()
        .with_config("top_sessions = \"many\"\n");
    let result = world.run(&["analytics"]).unwrap();

    assert!(!result.success());
    assert!(result.stderr().contains("Invalid config"));
}

#[test]
fn test_help_lists_commands() {
    let mut cmd = cargo_bin_cmd!("mastrace");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("analytics"));
}
