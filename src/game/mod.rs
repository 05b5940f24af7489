//! Game logic: session state, the mutation service, random events, and
//! the menu actions that drive them.

pub mod action;
pub mod event;
pub mod item;
pub mod service;
pub mod session;
pub mod state;

use crate::game::service::StateError;
use crate::profile::StoreError;
use crate::ui::UiError;

/// Errors that abort a running session.
///
/// Everything recoverable (invalid input, insufficient funds, a full
/// inventory) is handled in place; what reaches this enum is either a
/// broken terminal, a failed save, or a contract violation.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// A state mutation was rejected or could not be persisted.
    #[error(transparent)]
    State(#[from] StateError),

    /// The profile store failed outside a state mutation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The terminal boundary failed or the player interrupted input.
    #[error(transparent)]
    Ui(#[from] UiError),
}

impl GameError {
    /// True when the player ended input (EOF / interrupt) rather than
    /// anything actually failing.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, GameError::Ui(UiError::Interrupted))
    }
}
