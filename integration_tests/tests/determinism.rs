mod common;

use common::{call_ok, service};
use serde_json::Value;

fn run(seed: Option<u64>) -> anyhow::Result<(Value, Vec<Value>)> {
    let mut service = service();
    let seed_arg = seed.map(|s| format!(" seed={s}")).unwrap_or_default();
    let created = call_ok(
        &mut service,
        &format!(
            "create_map width=40 height=30 spawns=2 bedrooms=6 spawn_radius=3 bedroom_radius=2 max_gap=4{seed_arg}"
        ),
    )?;
    let map_id = created["id"].as_u64().unwrap_or_default();
    call_ok(&mut service, &format!("distribute {map_id} 0.5 0.3 0.2"))?;
    call_ok(&mut service, &format!("speeds {map_id} 70 40 10"))?;
    let mut fingerprints = Vec::new();
    for _ in 0..5 {
        let report = call_ok(&mut service, &format!("epoch {map_id}"))?;
        fingerprints.push(report["fingerprint"].clone());
    }
    Ok((created["circles"].clone(), fingerprints))
}

#[test]
fn same_seed_same_map_and_trajectory() -> anyhow::Result<()> {
    let (circles_a, prints_a) = run(Some(99))?;
    let (circles_b, prints_b) = run(Some(99))?;
    assert_eq!(circles_a, circles_b);
    assert_eq!(prints_a, prints_b);
    Ok(())
}

#[test]
fn configured_seed_applies_when_none_given() -> anyhow::Result<()> {
    let (circles_default, prints_default) = run(None)?;
    let (circles_explicit, prints_explicit) = run(Some(1234))?;
    assert_eq!(circles_default, circles_explicit);
    assert_eq!(prints_default, prints_explicit);
    Ok(())
}

#[test]
fn epochs_move_the_population() -> anyhow::Result<()> {
    let (_, prints) = run(Some(5))?;
    assert!(prints.windows(2).any(|w| w[0] != w[1]));
    Ok(())
}
