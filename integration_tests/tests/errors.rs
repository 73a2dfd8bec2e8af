mod common;

use common::{call, call_ok, error_kind, service};

#[test]
fn configuration_errors_are_invalid_input() -> anyhow::Result<()> {
    let mut service = service();
    for line in [
        "create_map width=0 height=10",
        "create_map width=61 height=10",
        "create_map width=10 height=10 spawns=1 spawn_radius=5",
        "create_map width=10 height=10 bedrooms=2 bedroom_radius=0",
        "create_map width=10",
        "create_map width=ten height=10",
    ] {
        assert_eq!(error_kind(&mut service, line)?, "invalid_input", "{line}");
    }
    assert_eq!(service.registry().map_count(), 0);
    Ok(())
}

#[test]
fn packing_exhaustion_is_distinct_and_names_the_circle() -> anyhow::Result<()> {
    let mut service = service();
    let value = call(
        &mut service,
        "create_map width=9 height=9 spawns=1 bedrooms=12 spawn_radius=3 bedroom_radius=2",
    )?;
    assert_eq!(value["kind"], "packing_exhausted");
    let message = value["message"].as_str().unwrap_or_default();
    assert!(message.starts_with("failed to place bedroom "), "{message}");
    assert_eq!(service.registry().map_count(), 0);
    Ok(())
}

#[test]
fn unknown_references() -> anyhow::Result<()> {
    let mut service = service();
    assert_eq!(error_kind(&mut service, "distribute 4 1.0")?, "unknown_reference");
    assert_eq!(error_kind(&mut service, "speeds 4 10")?, "unknown_reference");
    assert_eq!(error_kind(&mut service, "show 4")?, "unknown_reference");
    assert_eq!(error_kind(&mut service, "view_player 1")?, "unknown_reference");

    let created = call_ok(&mut service, "create_map width=10 height=10 spawns=1 spawn_radius=1")?;
    let map_id = created["id"].as_u64().unwrap_or_default();
    // Known map, but nothing to advance yet.
    assert_eq!(error_kind(&mut service, &format!("epoch {map_id}"))?, "unknown_reference");
    Ok(())
}

#[test]
fn out_of_range_values_are_rejected_before_state_changes() -> anyhow::Result<()> {
    let mut service = service();
    let created = call_ok(&mut service, "create_map width=10 height=10")?;
    let map_id = created["id"].as_u64().unwrap_or_default();

    assert_eq!(error_kind(&mut service, &format!("speeds {map_id} 50 101"))?, "invalid_input");
    assert_eq!(error_kind(&mut service, &format!("speeds {map_id} -1"))?, "invalid_input");
    assert_eq!(error_kind(&mut service, &format!("distribute {map_id} 0.5 -0.5"))?, "invalid_input");
    assert_eq!(error_kind(&mut service, &format!("epoch {map_id} 0"))?, "invalid_input");
    // The fixture caps a single request at 100 steps.
    assert_eq!(error_kind(&mut service, &format!("epoch {map_id} 101"))?, "invalid_input");

    let shown = call_ok(&mut service, &format!("show {map_id}"))?;
    assert_eq!(shown["summary"]["speeds"], serde_json::json!([]));
    assert_eq!(shown["summary"]["seeded"], false);
    Ok(())
}

#[test]
fn protocol_errors_are_invalid_input() -> anyhow::Result<()> {
    let mut service = service();
    assert_eq!(error_kind(&mut service, "teleport 1")?, "invalid_input");
    assert_eq!(error_kind(&mut service, r#"{"command":"epoch"}"#)?, "invalid_input");
    assert_eq!(error_kind(&mut service, "{broken")?, "invalid_input");
    assert_eq!(error_kind(&mut service, "")?, "invalid_input");
    Ok(())
}

#[test]
fn empty_weights_are_rejected_on_both_transports() -> anyhow::Result<()> {
    let mut service = service();
    let created = call_ok(&mut service, "create_map width=10 height=10 spawns=1 spawn_radius=1")?;
    let map_id = created["id"].as_u64().unwrap_or_default();

    assert_eq!(error_kind(&mut service, &format!("distribute {map_id}"))?, "invalid_input");
    let json = format!(r#"{{"command":"distribute","map_id":{map_id},"probabilities":[]}}"#);
    assert_eq!(error_kind(&mut service, &json)?, "invalid_input");

    let shown = call_ok(&mut service, &format!("show {map_id}"))?;
    assert_eq!(shown["summary"]["seeded"], false);
    Ok(())
}
