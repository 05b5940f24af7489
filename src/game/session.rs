//! Session Loop
//!
//! One run of the game from greeting to exit: dispatches menu commands
//! to the action behaviors, gates the post-mining event roll on the
//! defence counter, and owns the save-on-exit contract.

use tracing::info;

use crate::core::config::GameConfig;
use crate::core::rng::GameRng;
use crate::game::action::{self, MenuCommand};
use crate::game::event::{EventEngine, EventKind};
use crate::game::service::{StateError, StateService};
use crate::game::GameError;
use crate::ui::Ui;

/// One play session over a loaded profile.
pub struct Session {
    service: StateService,
    engine: EventEngine,
    rng: GameRng,
    config: GameConfig,
}

impl Session {
    /// Wire a session together.
    pub fn new(service: StateService, rng: GameRng, config: GameConfig) -> Self {
        let engine = EventEngine::new(config.events.clone(), config.pacing.clone());
        Self {
            service,
            engine,
            rng,
            config,
        }
    }

    /// Read-only view of the running state (diagnostics, tests).
    pub fn service(&self) -> &StateService {
        &self.service
    }

    /// Run the menu loop until save-and-exit.
    ///
    /// Returns [`GameError::Ui`] with `Interrupted` when input ends
    /// early; the caller is expected to [`Session::save`] on that path.
    pub fn run(&mut self, ui: &mut dyn Ui) -> Result<(), GameError> {
        self.welcome(ui)?;

        loop {
            ui.clear();
            ui.print_menu(self.service.state());

            let input = ui.read_choice("choice: ")?;
            match MenuCommand::parse(&input) {
                Some(MenuCommand::Mine) => {
                    action::run_mining(&mut self.service, ui, &mut self.rng, &self.config.pacing)?;
                    // Protected minings suppress the roll entirely; the
                    // mining behavior already consumed one charge.
                    if self.service.state().event_defence() == 0 {
                        self.engine.maybe_trigger(&mut self.service, ui, &mut self.rng)?;
                    }
                }
                Some(MenuCommand::Inventory) => {
                    action::run_inventory(&mut self.service, ui, &self.config.pacing)?;
                }
                Some(MenuCommand::Upgrades) => {
                    action::run_upgrades(
                        &mut self.service,
                        ui,
                        &self.config.upgrades,
                        &self.config.pacing,
                    )?;
                }
                Some(MenuCommand::Shop) => {
                    action::run_shop(&mut self.service, ui, &mut self.rng, &self.config.pacing)?;
                }
                Some(MenuCommand::Quit) => {
                    self.service.save_state()?;
                    info!("session saved, exiting");
                    return Ok(());
                }
                Some(MenuCommand::Debug) => {
                    self.engine.trigger_specific(
                        EventKind::HelpSomeone,
                        &mut self.service,
                        ui,
                        &mut self.rng,
                    )?;
                }
                None => {
                    ui.clear();
                    ui.print_message("Invalid choice!");
                    ui.pause(self.config.pacing.invalid_choice_delay);
                }
            }
        }
    }

    /// Best-effort final flush, used on interrupt and failure paths.
    pub fn save(&mut self) -> Result<(), StateError> {
        self.service.save_state()
    }

    fn welcome(&mut self, ui: &mut dyn Ui) -> Result<(), GameError> {
        if self.service.player_name().is_empty() {
            ui.clear();
            ui.slow_reveal(
                "Welcome to oreminer, what's your name?",
                self.config.pacing.reveal_char_delay,
            );
            let name = ui.read_choice("")?;
            self.service.set_player_name(&name)?;
            self.service.save_state()?;
            ui.slow_reveal(&format!("Hello {name}!"), self.config.pacing.reveal_char_delay);
        } else {
            ui.slow_reveal(
                &format!("Welcome back {}!", self.service.player_name()),
                self.config.pacing.reveal_char_delay,
            );
        }
        ui.pause(self.config.pacing.welcome_delay);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{EventConfig, LootConfig};
    use crate::game::state::GameState;
    use crate::profile::{Profile, ProfileStore};
    use crate::ui::testing::ScriptedUi;

    fn session_from(profile: Profile, config: GameConfig) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("save.json")).unwrap();
        store.update_all(&profile).unwrap();
        let mut rng = GameRng::new(61);
        let state = GameState::from_profile(&profile, &mut rng, &LootConfig::default());
        let service = StateService::new(state, store);
        (dir, Session::new(service, rng, config))
    }

    fn named_profile() -> Profile {
        Profile {
            name: "Dusty".into(),
            ..Profile::default()
        }
    }

    /// Events pinned off so menu flows need no event inputs.
    fn quiet_config() -> GameConfig {
        GameConfig {
            events: EventConfig {
                trigger_chance: 0.0,
                ..EventConfig::default()
            },
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_returning_player_greeted_and_quit_saves() {
        let (_dir, mut session) = session_from(named_profile(), quiet_config());
        let mut ui = ScriptedUi::new(&["5"]);

        session.run(&mut ui).unwrap();

        assert!(ui.saw("Welcome back Dusty!"));
    }

    #[test]
    fn test_first_run_asks_name_and_persists_it() {
        let (_dir, mut session) = session_from(Profile::default(), quiet_config());
        let mut ui = ScriptedUi::new(&["Vey", "5"]);

        session.run(&mut ui).unwrap();

        assert!(ui.saw("what's your name?"));
        assert!(ui.saw("Hello Vey!"));
        assert_eq!(session.service().player_name(), "Vey");
    }

    #[test]
    fn test_invalid_menu_input_reprompts() {
        let (_dir, mut session) = session_from(named_profile(), quiet_config());
        let mut ui = ScriptedUi::new(&["9", "x", "5"]);

        session.run(&mut ui).unwrap();

        assert!(ui.saw("Invalid choice!"));
    }

    #[test]
    fn test_exhausted_input_surfaces_interrupt() {
        let (_dir, mut session) = session_from(named_profile(), quiet_config());
        let mut ui = ScriptedUi::new(&[]);

        let err = session.run(&mut ui).unwrap_err();
        assert!(err.is_interrupt());

        // The interrupt path still flushes cleanly.
        session.save().unwrap();
    }

    #[test]
    fn test_mining_with_zero_defence_rolls_an_event() {
        let config = GameConfig {
            events: EventConfig {
                trigger_chance: 1.0,
                // Pin the pick to the no-op event so no input is needed.
                kind_weights: [0.0, 1.0, 0.0, 0.0, 0.0],
                ..EventConfig::default()
            },
            ..GameConfig::default()
        };
        let (_dir, mut session) = session_from(named_profile(), config);
        let mut ui = ScriptedUi::new(&["1", "5"]);

        session.run(&mut ui).unwrap();

        assert!(ui.saw("Event Triggered!"));
    }

    #[test]
    fn test_event_defence_suppresses_the_roll() {
        let config = GameConfig {
            events: EventConfig {
                trigger_chance: 1.0,
                kind_weights: [0.0, 1.0, 0.0, 0.0, 0.0],
                ..EventConfig::default()
            },
            ..GameConfig::default()
        };
        let profile = Profile {
            event_defence: 2,
            ..named_profile()
        };
        let (_dir, mut session) = session_from(profile, config);
        let mut ui = ScriptedUi::new(&["1", "5"]);

        session.run(&mut ui).unwrap();

        // One charge consumed, one left, and no event fired.
        assert_eq!(session.service().state().event_defence(), 1);
        assert!(!ui.saw("Event Triggered!"));
    }

    #[test]
    fn test_debug_command_forces_the_choice_event() {
        let (_dir, mut session) = session_from(named_profile(), quiet_config());
        let mut ui = ScriptedUi::new(&["debug", "2", "5"]);

        session.run(&mut ui).unwrap();

        assert!(ui.saw("A stranger asks you for help."));
    }

    #[test]
    fn test_full_loop_mine_then_sell() {
        let (_dir, mut session) = session_from(named_profile(), quiet_config());
        // Mine once, open inventory, sell all, exit.
        let mut ui = ScriptedUi::new(&["1", "2", "1", "5"]);

        session.run(&mut ui).unwrap();

        assert!(session.service().state().inventory().is_empty());
        assert!(session.service().state().money() > 0);
        assert!(ui.saw("Sold all items for"));
    }
}
