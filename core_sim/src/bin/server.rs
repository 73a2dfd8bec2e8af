use core_sim::network::{serve, spawn_command_listener};
use core_sim::{load_simulation_config_from_env, CommandService};
use tracing::{error, info};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (config, metadata) = load_simulation_config_from_env();
    let (command_addr, requests) = match spawn_command_listener(config.command_bind) {
        Ok(bound) => bound,
        Err(err) => {
            error!(
                target: "circle_map::server",
                command_bind = %config.command_bind,
                error = %err,
                "server.bind_failed"
            );
            std::process::exit(1);
        }
    };

    info!(
        target: "circle_map::server",
        command_bind = %command_addr,
        config_path = ?metadata.path(),
        max_width = config.max_width,
        max_height = config.max_height,
        "server.ready"
    );

    let mut service = CommandService::new(config);
    serve(&mut service, requests);
}
