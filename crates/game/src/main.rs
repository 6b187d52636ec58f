use std::path::PathBuf;

use anyhow::{Context, Result};
use delve_game::config::GameConfig;
use delve_game::session::MiningSession;

/// Swing budget per forward step before giving up on a tunnel.
const MAX_SWINGS_PER_STEP: usize = 64;

/// Default tunnel length.
const DEFAULT_DIG: usize = 16;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Value following `--name` on the command line.
fn arg_value(name: &str) -> Option<String> {
    std::env::args().skip_while(|a| a != name).nth(1)
}

fn parse_count(name: &str, default: usize) -> Result<usize> {
    match arg_value(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid value {:?} for {}", raw, name)),
        None => Ok(default),
    }
}

fn run() -> Result<()> {
    if std::env::args().any(|a| a == "--dump-config") {
        println!("{}", GameConfig::default().to_json_pretty()?);
        return Ok(());
    }

    let config = match arg_value("--config").map(PathBuf::from) {
        Some(path) => {
            let config = GameConfig::load(&path)?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => GameConfig::default(),
    };
    let dig = parse_count("--dig", DEFAULT_DIG)?;
    let turn_every = parse_count("--turn-every", 0)?;

    tracing::info!(
        "delve -- hollow {}x{}x{}, cell size {}",
        config.hollow.x,
        config.hollow.y,
        config.hollow.z,
        config.cell_size
    );

    let mut session = MiningSession::new(config.build_manager());
    tracing::info!("Starting room ready: {} blocks", session.manager().store().len());

    // Face the nearest wall so the first step already has to dig.
    session.turn_left();

    for i in 0..dig {
        if turn_every > 0 && i > 0 && i % turn_every == 0 {
            session.turn_right();
        }
        if !session.dig_forward(MAX_SWINGS_PER_STEP) {
            tracing::warn!("Tunnel stopped after {} steps", i);
            break;
        }
    }

    let store = session.manager().store();
    tracing::info!(
        "Dig finished at {:?}: {} blocks standing, {} cells mined out",
        session.cell(),
        store.len(),
        store.mined_count()
    );

    let summary = serde_json::to_string_pretty(session.stats()).context("serializing stats")?;
    println!("{}", summary);
    Ok(())
}
