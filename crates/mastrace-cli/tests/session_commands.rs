use mastrace_testing::fixtures::{ALPHA, BETA};
use mastrace_testing::{TestWorld, assertions};

fn sample_world(format: &str) -> TestWorld {
    TestWorld::new().with_sample_snapshot().with_format(format)
}

#[test]
fn test_session_list_newest_first() {
    let world = sample_world("json");
    let result = world.run(&["session", "list"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json().unwrap();
    assertions::assert_session_count(&json, 2).unwrap();
    assertions::assert_session_order(&json, &[BETA, ALPHA]).unwrap();

    let sessions = json["content"]["sessions"].as_array().unwrap();
    let beta = &sessions[0];
    assert_eq!(beta["status"], "Failed");
    assert_eq!(beta["duration_seconds"], 5.0);
    assert_eq!(beta["num_llm_calls"], 1);
    assert_eq!(beta["total_tokens"], 40);

    let alpha = &sessions[1];
    assert_eq!(alpha["status"], "Completed");
    assert_eq!(alpha["start_time"], "2024-05-01 09:59:58");
    assert_eq!(alpha["end_time"], "2024-05-01 10:00:05");
    assert_eq!(alpha["num_messages"], 1);
    assert_eq!(alpha["num_function_calls"], 1);
    assert_eq!(alpha["total_tokens"], 100);
    assert_eq!(json["content"]["total_count"], 2);
}

#[test]
fn test_session_list_status_filter() {
    let world = sample_world("json");

    let failed = world
        .run(&["session", "list", "--status", "failed"])
        .unwrap()
        .json()
        .unwrap();
    assertions::assert_session_order(&failed, &[BETA]).unwrap();
    assertions::assert_all_sessions_have_status(&failed, "Failed").unwrap();

    let completed = world
        .run(&["session", "list", "--status", "completed"])
        .unwrap()
        .json()
        .unwrap();
    assertions::assert_session_order(&completed, &[ALPHA]).unwrap();
}

#[test]
fn test_session_list_limit_reports_total() {
    let world = sample_world("json");
    let json = world
        .run(&["session", "list", "--limit", "1"])
        .unwrap()
        .json()
        .unwrap();

    assertions::assert_session_order(&json, &[BETA]).unwrap();
    assert_eq!(json["content"]["total_count"], 2);
    assert!(json["suggestions"].as_array().is_some_and(|s| !s.is_empty()));
}

#[test]
fn test_session_list_csv() {
    let world = sample_world("csv");
    let result = world.run(&["session", "list"]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let mut lines = result.stdout().lines();
    assert_eq!(
        lines.next(),
        Some(
            "session_id,start_time,end_time,duration_seconds,status,num_messages,\
             num_llm_calls,num_function_calls,total_cost,total_tokens,participants"
        )
    );
    assert!(lines.next().is_some_and(|l| l.starts_with("run-beta,2024-05-02 14:00:00,")));
    assert!(lines.next().is_some_and(|l| l.starts_with("run-alpha,2024-05-01 09:59:58,")));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_session_show_plain_timeline() {
    let world = sample_world("plain");
    let result = world.run(&["session", "show", ALPHA]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let out = result.stdout();
    assert!(out.contains("Session run-alpha completed"));
    assert!(out.contains("Timeline:"));
    assert!(out.contains("wrapper_config"));
    assert!(out.contains("class AssistantAgent"));
    assert!(out.contains("model gpt-4"));
    assert!(out.contains("lookup()"));

    // chronological: configuration rows precede the completion
    let wrapper = out.find("wrapper config").unwrap();
    let agent = out.find("class AssistantAgent").unwrap();
    let call = out.find("lookup()").unwrap();
    assert!(wrapper < agent && agent < call);
}

#[test]
fn test_session_show_json() {
    let world = sample_world("json");
    let json = world.run(&["session", "show", BETA]).unwrap().json().unwrap();

    let content = &json["content"];
    assert_eq!(content["session"]["status"], "Failed");
    assert_eq!(content["models"][0], "gpt-4o-mini");
    assert_eq!(content["event_counts"]["llm_call_end"], 1);

    let types: Vec<&str> = content["timeline"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["event_type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        [
            "agent_config",
            "llm_call_start",
            "llm_call_end",
            "event_received_message"
        ]
    );
    assert_eq!(content["timeline"][1]["invocation_id"], "I2");
    assert_eq!(json["badge"]["level"], "warning");
}

#[test]
fn test_session_flow_json() {
    let world = sample_world("json");
    let result = world.run(&["session", "flow", ALPHA]).unwrap();
    assert!(result.success(), "stderr: {}", result.stderr());

    let json = result.json().unwrap();
    assertions::assert_flow_mentions(&json, "Launch plan ready").unwrap();
    assertions::assert_flow_mentions(&json, "Draft the launch plan").unwrap();

    let messages = json["content"]["messages"].as_array().unwrap();
    let first = &messages[0];
    assert_eq!(first["sender"], "product_manager_CTO");
    assert_eq!(first["role"], "CTO");
    assert_eq!(first["receiver"], "CEO");

    let last = messages.last().unwrap();
    assert_eq!(last["kind"], "function");
    assert_eq!(last["content"], "Function call: lookup");
}

#[test]
fn test_session_flow_preview_chars() {
    let world = sample_world("json");
    let json = world
        .run(&["session", "flow", ALPHA, "--preview-chars", "8"])
        .unwrap()
        .json()
        .unwrap();

    let first = &json["content"]["messages"][0];
    assert_eq!(first["content"], "Draft...");
    assert_eq!(first["full_content"], "Draft the launch plan");
}

#[test]
fn test_unknown_session_names_the_id() {
    let world = sample_world("plain");

    for command in ["show", "flow"] {
        let result = world.run(&["session", command, "run-gamma"]).unwrap();
        assert!(!result.success());
        assert!(result.stderr().contains("Session not found: run-gamma"));
    }
}
