#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use anyhow::{bail, Context};
use core_sim::{load_simulation_config_from_env, CommandService};
use serde_json::Value;

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_simulation_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test simulation config at {}",
            config_path.display()
        );

        std::env::set_var("SIM_CONFIG_PATH", &config_path);
    });
}

/// Command service built from the fixture config.
pub fn service() -> CommandService {
    ensure_test_config();
    let (config, _) = load_simulation_config_from_env();
    CommandService::new(config)
}

/// Send one line and decode the response as JSON.
pub fn call(service: &mut CommandService, line: &str) -> anyhow::Result<Value> {
    let raw = service.handle_line(line).to_line();
    serde_json::from_str(&raw).with_context(|| format!("response to '{line}' is not json: {raw}"))
}

/// Like [`call`], but fails unless the response is ok.
pub fn call_ok(service: &mut CommandService, line: &str) -> anyhow::Result<Value> {
    let value = call(service, line)?;
    if value["status"] != "ok" {
        bail!("'{line}' failed: {value}");
    }
    Ok(value)
}

/// Error kind of a failed response.
pub fn error_kind(service: &mut CommandService, line: &str) -> anyhow::Result<String> {
    let value = call(service, line)?;
    if value["status"] != "error" {
        bail!("'{line}' unexpectedly succeeded: {value}");
    }
    value["kind"]
        .as_str()
        .map(str::to_string)
        .context("error response without kind")
}
