//! Oreminer
//!
//! Terminal idle mining game. Loads (or initializes) the player profile,
//! runs the menu loop, and guarantees a final save on every ordinary way
//! out - explicit quit, interrupted input, or an unexpected failure.

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use oreminer::core::config::SAVE_FILE;
use oreminer::core::rng::derive_session_seed;
use oreminer::game::session::Session;
use oreminer::ui::ConsoleUi;
use oreminer::{GameConfig, GameRng, GameState, ProfileStore, StateService, VERSION};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("oreminer v{}", VERSION);

    let config = GameConfig::default();
    let store = ProfileStore::load(SAVE_FILE).context("failed to open the profile store")?;

    // Seed the session from the player name and the start time so no two
    // sessions share loot pools or event rolls; logged for replay.
    let started_at = chrono::Utc::now().timestamp_millis();
    let seed = derive_session_seed(&store.profile().name, started_at);
    info!(seed, "session seed derived");

    let mut rng = GameRng::new(seed);
    let state = GameState::from_profile(store.profile(), &mut rng, &config.loot);
    let service = StateService::new(state, store);

    let mut session = Session::new(service, rng, config);
    let mut ui = ConsoleUi::new();

    match session.run(&mut ui) {
        Ok(()) => {
            println!("Progress saved. See you soon!");
            Ok(())
        }
        Err(err) if err.is_interrupt() => {
            session.save().context("final save after interrupt")?;
            println!("\nProgress saved. See you soon!");
            Ok(())
        }
        Err(err) => {
            error!(%err, "session aborted, attempting final save");
            if let Err(save_err) = session.save() {
                error!(%save_err, "final save failed");
            }
            Err(err).context("session aborted")
        }
    }
}
