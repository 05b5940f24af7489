//! Terminal Boundary
//!
//! Everything non-deterministic about presentation lives behind the
//! [`Ui`] trait: screen clearing, text output, pacing sleeps, and input
//! reads. Game logic calls this contract and never formats terminal
//! escape codes or sleeps on its own, so tests drive the whole game with
//! a scripted, zero-delay implementation.

pub mod console;

pub use console::ConsoleUi;

use crate::game::item::Item;
use crate::game::state::GameState;

/// Terminal boundary errors.
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    /// Input ended (EOF / interrupt); the session should save and exit.
    #[error("input interrupted")]
    Interrupted,

    /// The terminal itself failed.
    #[error("terminal failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Output/input collaborator used by the game core.
///
/// Implementations own all pacing: `pause` and the per-character delay of
/// `slow_reveal` may be real sleeps or nothing at all.
pub trait Ui {
    /// Wipe the screen.
    fn clear(&mut self);

    /// Print one message line.
    fn print_message(&mut self, text: &str);

    /// Print the main menu for the current state.
    fn print_menu(&mut self, state: &GameState);

    /// Print the inventory listing with its total sale value.
    fn print_inventory(&mut self, items: &[Item], total_value: i64);

    /// Print the upgrades listing with current balance and costs.
    fn print_upgrades(&mut self, money: i64, speed_cost: i64, capacity_cost: i64);

    /// Reveal text character by character.
    fn slow_reveal(&mut self, text: &str, per_char_delay: f64);

    /// Read one line of input, trimmed.
    fn read_choice(&mut self, prompt: &str) -> Result<String, UiError>;

    /// Block until the player acknowledges.
    fn wait_for_acknowledgement(&mut self, prompt: &str) -> Result<(), UiError>;

    /// Block for `seconds` (implementations may shorten or skip).
    fn pause(&mut self, seconds: f64);
}
