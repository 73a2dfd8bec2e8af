mod common;

use common::{call_ok, error_kind, service};
use serde_json::Value;
use sim_schema::Player;

#[test]
fn spawn_move_and_view() -> anyhow::Result<()> {
    let mut service = service();
    let created = call_ok(
        &mut service,
        "create_map width=20 height=20 spawns=1 bedrooms=2 spawn_radius=3 bedroom_radius=2 max_gap=2",
    )?;
    let map_id = created["id"].as_u64().unwrap_or_default();
    call_ok(&mut service, &format!("distribute {map_id} 1"))?;

    let spawned = call_ok(&mut service, &format!("spawn_player {map_id} Scout"))?;
    let player: Player = serde_json::from_value(spawned["player"].clone())?;
    assert_eq!(player.name, "Scout");
    // The first spawn circle sits on the map center.
    let d2 = player.position().distance_squared(sim_schema::Coord::new(10, 10));
    assert!((1..=9).contains(&d2), "spawned at {}", player.position());

    let moved = call_ok(&mut service, &format!("move_player {} left", player.id))?;
    let moved: Player = serde_json::from_value(moved["player"].clone())?;
    assert_eq!(moved.position(), player.position().offset(-1, 0));

    let view = call_ok(&mut service, &format!("view_player {}", player.id))?;
    assert_eq!(view["result"], "view");
    assert_eq!(view["radius"], 2);
    let cells = view["cells"].as_array().map(Vec::len).unwrap_or_default();
    assert_eq!(cells, 5);
    let me = &view["cells"][2][2];
    assert_eq!(me["is_player"], true);
    assert_eq!(me["map_x"], moved.x);
    Ok(())
}

#[test]
fn moving_off_the_map_is_rejected() -> anyhow::Result<()> {
    let mut service = service();
    let created = call_ok(
        &mut service,
        "create_map width=3 height=3 spawns=1 spawn_radius=1",
    )?;
    let map_id = created["id"].as_u64().unwrap_or_default();
    let spawned = call_ok(&mut service, &format!("spawn_player {map_id}"))?;
    let player: Player = serde_json::from_value(spawned["player"].clone())?;

    // Every non-center cell of a radius-1 circle on a 3x3 map touches an edge.
    let direction = match (player.x, player.y) {
        (0, _) => "left",
        (2, _) => "right",
        (_, 0) => "up",
        _ => "down",
    };
    let line = format!("move_player {} {direction}", player.id);
    assert_eq!(error_kind(&mut service, &line)?, "invalid_input");
    Ok(())
}

#[test]
fn view_at_the_edge_reports_outside_cells() -> anyhow::Result<()> {
    let mut service = service();
    let created = call_ok(&mut service, "create_map width=5 height=5 spawns=1 spawn_radius=2")?;
    let map_id = created["id"].as_u64().unwrap_or_default();
    let spawned = call_ok(&mut service, &format!("spawn_player {map_id}"))?;
    let player: Player = serde_json::from_value(spawned["player"].clone())?;
    let view = call_ok(&mut service, &format!("view_player {}", player.id))?;
    let outside = view["cells"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(Value::as_array)
        .flatten()
        .filter(|cell| cell["zone"] == "outside")
        .count();
    // A 5x5 view around any cell other than the center of a 5x5 map spills over.
    assert!(outside > 0);
    Ok(())
}

#[test]
fn show_lists_the_players_on_that_map() -> anyhow::Result<()> {
    let mut service = service();
    let mut map_ids = Vec::new();
    for _ in 0..2 {
        let created = call_ok(&mut service, "create_map width=9 height=9 spawns=1 spawn_radius=2")?;
        map_ids.push(created["id"].as_u64().unwrap_or_default());
    }
    call_ok(&mut service, &format!("spawn_player {} alpha", map_ids[0]))?;
    call_ok(&mut service, &format!("spawn_player {} beta", map_ids[1]))?;
    call_ok(&mut service, &format!("spawn_player {} gamma", map_ids[0]))?;

    let shown = call_ok(&mut service, &format!("show {}", map_ids[0]))?;
    let players: Vec<Player> = serde_json::from_value(shown["players"].clone())?;
    let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "gamma"]);
    Ok(())
}
