//! Random Events
//!
//! World events that perturb the economy after a mining run: injuries,
//! windfalls, equipment failures, and one encounter where the player
//! chooses and the outcome is a coin flip between a good and a bad pool.
//!
//! The reference catalog is a class hierarchy; here it is two tagged
//! enums — [`EventKind`] for what happens and [`Consequence`] for what it
//! does to the state — with a single dispatch in [`Consequence::apply`].

use tracing::info;

use crate::core::config::{EventConfig, PacingConfig, CHOICE_ATTEMPTS};
use crate::core::rng::GameRng;
use crate::game::service::{StateError, StateService};
use crate::game::GameError;
use crate::ui::Ui;

// =============================================================================
// EVENT KINDS
// =============================================================================

/// One kind of world event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Mining injury: permanent slowdown.
    Trauma,
    /// The base event: something stirs, nothing comes of it.
    Mundane,
    /// Windfall: free money.
    Lucky,
    /// Broken gear: a repair bill, or everything if the player is broke.
    EquipmentFailure,
    /// A stranger asks for help; the player chooses, fate flips a coin.
    HelpSomeone,
}

impl EventKind {
    /// Every kind, in the order matching
    /// [`EventConfig::kind_weights`].
    pub const ALL: [EventKind; 5] = [
        EventKind::Trauma,
        EventKind::Mundane,
        EventKind::Lucky,
        EventKind::EquipmentFailure,
        EventKind::HelpSomeone,
    ];

    /// Lead-in text shown when the event fires.
    pub fn description(self) -> &'static str {
        match self {
            EventKind::Trauma => "You suffered a traumatic injury while mining!",
            EventKind::Mundane => "An event has occurred.",
            EventKind::Lucky => "You found a lucky break while mining!",
            EventKind::EquipmentFailure => "Your mining equipment has failed!",
            EventKind::HelpSomeone => "A stranger asks you for help. What do you do?",
        }
    }

    /// True for events resolved through a player choice.
    pub fn has_choice(self) -> bool {
        matches!(self, EventKind::HelpSomeone)
    }
}

// =============================================================================
// CONSEQUENCES
// =============================================================================

/// The resolved effect of an event, built at resolution time and applied
/// once. Carries only its magnitude and display text.
#[derive(Clone, Debug, PartialEq)]
pub enum Consequence {
    /// Credit money.
    MoneyGain {
        /// Dollars credited.
        amount: i64,
        /// Display text.
        text: String,
    },
    /// Debit money (pre-clamped to the balance where the event promises
    /// a full deduction).
    MoneyLoss {
        /// Dollars debited.
        amount: i64,
        /// Display text.
        text: String,
    },
    /// Shorten mining runs.
    SpeedGain {
        /// Seconds removed per run.
        seconds: f64,
        /// Display text.
        text: String,
    },
    /// Lengthen mining runs.
    SpeedLoss {
        /// Seconds added per run.
        seconds: f64,
        /// Display text.
        text: String,
    },
    /// No effect.
    Nothing {
        /// Display text.
        text: String,
    },
}

impl Consequence {
    /// Display text for the resolved outcome.
    pub fn text(&self) -> &str {
        match self {
            Consequence::MoneyGain { text, .. }
            | Consequence::MoneyLoss { text, .. }
            | Consequence::SpeedGain { text, .. }
            | Consequence::SpeedLoss { text, .. }
            | Consequence::Nothing { text } => text,
        }
    }

    /// Apply the effect through the mutation service.
    pub fn apply(&self, service: &mut StateService) -> Result<(), StateError> {
        match self {
            Consequence::MoneyGain { amount, .. } => {
                service.add_money(*amount)?;
            }
            Consequence::MoneyLoss { amount, .. } => {
                service.deduct_money(*amount)?;
            }
            Consequence::SpeedGain { seconds, .. } => {
                service.increase_mining_speed(*seconds)?;
            }
            Consequence::SpeedLoss { seconds, .. } => {
                service.decrease_mining_speed(*seconds)?;
            }
            Consequence::Nothing { .. } => {}
        }
        Ok(())
    }
}

// =============================================================================
// ENGINE
// =============================================================================

/// Rolls, selects, and executes world events.
pub struct EventEngine {
    events: EventConfig,
    pacing: PacingConfig,
}

impl EventEngine {
    /// Build an engine from tuning.
    pub fn new(events: EventConfig, pacing: PacingConfig) -> Self {
        Self { events, pacing }
    }

    /// Roll the post-mining Bernoulli trial and, on success, pick and run
    /// one event. Returns whether an event fired.
    ///
    /// The caller gates this on the event-defence counter; the engine
    /// itself never reads it.
    pub fn maybe_trigger(
        &self,
        service: &mut StateService,
        ui: &mut dyn Ui,
        rng: &mut GameRng,
    ) -> Result<bool, GameError> {
        if !rng.chance(self.events.trigger_chance) {
            return Ok(false);
        }
        let kind = self.pick_kind(rng);
        info!(event = ?kind, "random event triggered");
        self.run(kind, service, ui, rng)?;
        Ok(true)
    }

    /// Force one event to run, bypassing the trigger roll. Diagnostic
    /// path behind the hidden `debug` command.
    pub fn trigger_specific(
        &self,
        kind: EventKind,
        service: &mut StateService,
        ui: &mut dyn Ui,
        rng: &mut GameRng,
    ) -> Result<(), GameError> {
        info!(event = ?kind, "specific event triggered");
        self.run(kind, service, ui, rng)
    }

    /// Pick an event kind by weight.
    ///
    /// The weights are renormalized by their sum (they ship summing to
    /// 0.5), so equal weights mean equal effective probability.
    fn pick_kind(&self, rng: &mut GameRng) -> EventKind {
        match rng.weighted_index(&self.events.kind_weights) {
            Some(idx) => EventKind::ALL[idx],
            // All weights zeroed out in config: fall back to the base event.
            None => EventKind::Mundane,
        }
    }

    fn run(
        &self,
        kind: EventKind,
        service: &mut StateService,
        ui: &mut dyn Ui,
        rng: &mut GameRng,
    ) -> Result<(), GameError> {
        ui.clear();
        ui.slow_reveal("Event Triggered!", self.pacing.event_reveal_delay);
        ui.pause(self.pacing.event_banner_delay);

        ui.clear();
        let description = kind.description();
        ui.slow_reveal(description, self.pacing.event_reveal_delay);

        let consequence = if kind.has_choice() {
            self.resolve_choice(kind, service, ui, rng)?
        } else {
            // Reading time scales with the text just revealed.
            ui.pause(description.len() as f64 * self.pacing.event_reveal_delay + 1.0);
            self.resolve(kind, service.state().money(), rng)
        };

        consequence.apply(service)?;

        ui.clear();
        ui.slow_reveal(consequence.text(), self.pacing.consequence_reveal_delay);
        ui.wait_for_acknowledgement("\nPress enter to continue...")?;
        Ok(())
    }

    /// Resolve a no-choice event into its consequence.
    fn resolve(&self, kind: EventKind, money: i64, rng: &mut GameRng) -> Consequence {
        match kind {
            EventKind::Trauma => {
                let (lo, hi) = self.events.trauma_slowdown_tenths;
                Consequence::SpeedLoss {
                    seconds: rng.next_int_range(lo, hi) as f64 / 10.0,
                    text: "You lost some mining speed.".to_string(),
                }
            }
            EventKind::Mundane => Consequence::Nothing {
                text: "Nothing happened.".to_string(),
            },
            EventKind::Lucky => {
                let (lo, hi) = self.events.lucky_reward;
                Consequence::MoneyGain {
                    amount: rng.next_int_range(lo, hi),
                    text: "You gained some money.".to_string(),
                }
            }
            EventKind::EquipmentFailure => {
                if money < self.events.repair_cost_min {
                    return Consequence::MoneyLoss {
                        amount: money,
                        text: "You don't have enough money to repair the equipment. \
                               You lost all your money."
                            .to_string(),
                    };
                }
                let floor = self.events.repair_cost_min;
                let ceiling = floor.max(money / 2);
                let cost = rng.next_int_range(floor, ceiling);
                Consequence::MoneyLoss {
                    amount: cost,
                    text: format!("You paid ${cost} to repair your equipment."),
                }
            }
            // Choice events never reach here.
            EventKind::HelpSomeone => Consequence::Nothing {
                text: "Nothing happened.".to_string(),
            },
        }
    }

    /// Present the choices, collect a selection with bounded retries,
    /// then flip a fair coin between the good and bad pool and pick one
    /// consequence uniformly from it.
    fn resolve_choice(
        &self,
        kind: EventKind,
        service: &StateService,
        ui: &mut dyn Ui,
        rng: &mut GameRng,
    ) -> Result<Consequence, GameError> {
        let choices = choice_table(kind);
        for (key, label) in choices {
            ui.slow_reveal(&format!("[{key}]: {label}"), self.pacing.event_reveal_delay);
        }

        let selected = self.read_valid_choice(choices, ui)?;

        let money = service.state().money();
        let (good, bad) = consequence_pools(kind, selected, money);
        let mut pool = if rng.chance(0.5) { good } else { bad };
        let idx = rng.next_int(pool.len() as u32) as usize;
        Ok(pool.swap_remove(idx))
    }

    /// Up to [`CHOICE_ATTEMPTS`] tries for a declared key; afterwards the
    /// first declared choice is picked for the player.
    fn read_valid_choice(
        &self,
        choices: &[(&'static str, &'static str)],
        ui: &mut dyn Ui,
    ) -> Result<&'static str, GameError> {
        for attempt in 0..CHOICE_ATTEMPTS {
            let input = ui.read_choice("Your choice: ")?;
            if let Some((key, _)) = choices.iter().find(|(key, _)| *key == input) {
                return Ok(key);
            }
            let remaining = CHOICE_ATTEMPTS - attempt - 1;
            if remaining > 0 {
                ui.slow_reveal(
                    &format!("Invalid choice. Try again ({remaining} attempts left)."),
                    self.pacing.event_reveal_delay,
                );
            }
        }
        Ok(choices[0].0)
    }
}

/// Declared choices for a choice event, in display order.
fn choice_table(kind: EventKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        EventKind::HelpSomeone => &[("1", "Help them"), ("2", "Ignore and walk away")],
        _ => &[],
    }
}

/// Good and bad consequence pools for one selected choice.
///
/// Money losses are pre-clamped to the current balance where the outcome
/// text promises the full amount is taken.
fn consequence_pools(
    kind: EventKind,
    choice: &str,
    money: i64,
) -> (Vec<Consequence>, Vec<Consequence>) {
    match (kind, choice) {
        (EventKind::HelpSomeone, "1") => (
            vec![
                Consequence::MoneyGain {
                    amount: 50,
                    text: "They thanked you and gave you money! +$50".to_string(),
                },
                Consequence::SpeedGain {
                    seconds: 0.05,
                    text: "They blessed you with good luck! Mining speed +5%".to_string(),
                },
            ],
            vec![
                Consequence::MoneyLoss {
                    amount: money.min(30),
                    text: "It was a trap! They stole $30 from you.".to_string(),
                },
                Consequence::SpeedLoss {
                    seconds: 0.03,
                    text: "Bad luck! Your mining speed decreased by 3%".to_string(),
                },
            ],
        ),
        (EventKind::HelpSomeone, _) => (
            vec![
                Consequence::MoneyGain {
                    amount: 75,
                    text: "You avoided a dangerous situation and found $75!".to_string(),
                },
                Consequence::SpeedGain {
                    seconds: 0.08,
                    text: "You dodged trouble! Mining speed +8%".to_string(),
                },
            ],
            vec![
                Consequence::MoneyLoss {
                    amount: money.min(40),
                    text: "Karma came back to haunt you! Lost $40".to_string(),
                },
                Consequence::SpeedLoss {
                    seconds: 0.04,
                    text: "Curse of the ignored! Mining speed -4%".to_string(),
                },
            ],
        ),
        _ => (Vec::new(), Vec::new()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
