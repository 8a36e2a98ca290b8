use gridpath::action_log::ActionLog;
use gridpath::pathfinding::{format_path, path_edges};
use gridpath::{Config, Engine};
use log::{debug, error, info, warn};
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let config_path = args.get(1).map(String::as_str).unwrap_or("config.toml");

    // Load before the logger exists so the configured level applies
    let config = Config::load_or_default(config_path);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();
    debug!("Configuration from {}: {:?}", config_path, config);

    let mut engine = Engine::from_config(&config);

    if let Some(replay_path) = args.get(2) {
        let replay = match ActionLog::load_from_file(replay_path) {
            Ok(replay) => replay,
            Err(e) => {
                error!("Cannot replay {}: {}", replay_path, e);
                return ExitCode::FAILURE;
            }
        };

        if config.logging.enable_action_log {
            let mut action_log = ActionLog::new();
            for logged in replay.actions() {
                action_log.record(logged.action.clone(), &mut engine);
            }
            match action_log.save_to_file(&config.logging.action_log_path) {
                Ok(()) => info!("Action log written to {}", config.logging.action_log_path),
                Err(e) => warn!("Failed to write action log: {}", e),
            }
            info!("\n{}", action_log.summary());
        } else {
            replay.replay(&mut engine);
        }
    }

    for diagnostic in engine.take_diagnostics() {
        info!("{:?}", diagnostic);
    }

    let grid = engine.grid();
    println!(
        "Grid {}x{} ({} blocked, {} manual obstacles)",
        grid.width(),
        grid.height(),
        grid.blocked_count(),
        engine.obstacles().len()
    );
    println!("Start {} -> Goal {}", engine.start(), engine.goal());
    println!("Path: {}", format_path(engine.path()));
    if !engine.path().is_empty() {
        println!("Length: {} steps", path_edges(engine.path()));
    }

    ExitCode::SUCCESS
}
