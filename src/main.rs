//! economy-sync demo driver.
//!
//! Loads configuration, initialises structured logging, hooks the
//! reconciliation service into an in-memory economy, and walks every player
//! through the world-group profiles listed in the profiles file.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use economy_sync::config;
use economy_sync::economy::ledger::InMemoryEconomy;
use economy_sync::economy::registry::HostServices;
use economy_sync::economy::{EconomyProvider, EconomyService};
use economy_sync::swap;
use economy_sync::types::{PlayerId, PlayerProfile};

fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = config::AppConfig::load("config.toml")?;
    init_logging();

    info!(
        sync_enabled = cfg.economy.sync_enabled,
        companion = ?cfg.economy.companion_plugin,
        provider = %cfg.demo.provider_name,
        "economy-sync starting up"
    );

    // -- Host services ---------------------------------------------------

    let ledger = Arc::new(InMemoryEconomy::new(&cfg.demo.provider_name));
    let mut services = HostServices::new();
    if let Some(companion) = &cfg.economy.companion_plugin {
        services = services.require_companion(companion.clone());
        services.register_plugin(companion.clone());
    }
    services.register_provider(ledger.clone());

    let mut service = EconomyService::new(Arc::new(cfg.economy.clone()), Arc::new(services));
    let activation = service.activate();
    info!(%activation, active = service.is_active(), "Economy activation finished");

    // -- Replay profiles -------------------------------------------------

    let profiles = load_profiles(&cfg.demo.profiles_file)?;
    info!(count = profiles.len(), path = %cfg.demo.profiles_file, "Profiles loaded");

    let mut current: HashMap<PlayerId, PlayerProfile> = HashMap::new();
    let mut failures = 0usize;

    for incoming in profiles {
        let player = incoming.player;
        let succeeded = match current.get_mut(&player) {
            Some(outgoing) => match swap::switch(&service, player, outgoing, &incoming) {
                Ok(report) => report.succeeded(),
                Err(e) => {
                    warn!(%player, error = %e, "Profile swap rejected");
                    false
                }
            },
            None => match swap::restore(&service, player, &incoming) {
                Ok(change) => {
                    info!(%player, group = %incoming.group, %change, "Initial profile applied");
                    change.succeeded()
                }
                Err(e) => {
                    warn!(%player, error = %e, "Initial profile rejected");
                    false
                }
            },
        };
        if !succeeded {
            failures += 1;
        }
        current.insert(player, incoming);
    }

    for (player, profile) in &current {
        info!(
            %player,
            group = %profile.group,
            expected = %profile.balance,
            actual = %ledger.balance(*player),
            "Final balance"
        );
    }

    info!(
        players = current.len(),
        transactions = ledger.history().len(),
        failures,
        "economy-sync finished"
    );

    Ok(())
}

fn load_profiles(path: &str) -> Result<Vec<PlayerProfile>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profiles from {path}"))?;
    let profiles = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse profiles from {path}"))?;
    Ok(profiles)
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("economy_sync=info"));

    let json_logging = std::env::var("ECONOMY_SYNC_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
