//! # Oreminer
//!
//! Terminal idle mining game: mine ore, sell it, buy upgrades, survive
//! random events. All progress lives in a single JSON profile on disk.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        OREMINER                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives and tuning                     │
//! │  ├── rng.rs      - Xorshift128+ PRNG + session seeding       │
//! │  └── config.rs   - Tuning constants and defaults             │
//! │                                                              │
//! │  profile.rs      - Durable player record (load/set/save)     │
//! │                                                              │
//! │  game/           - Game logic                                │
//! │  ├── item.rs     - Ore catalog                               │
//! │  ├── state.rs    - Session state + loot pools                │
//! │  ├── service.rs  - Sole state mutator, write-through saves   │
//! │  ├── event.rs    - Random events and consequences            │
//! │  ├── action.rs   - Mining / inventory / upgrades / shop      │
//! │  └── session.rs  - Menu loop and lifecycle                   │
//! │                                                              │
//! │  ui/             - Terminal boundary (non-deterministic IO)  │
//! │  ├── mod.rs      - Ui trait (output collaborator contract)   │
//! │  └── console.rs  - crossterm/stdin implementation            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State discipline
//!
//! `game/` never touches the terminal or the filesystem directly: all
//! output goes through the [`ui::Ui`] trait and all persistence goes
//! through [`game::service::StateService`], which is the only writer of
//! [`game::state::GameState`]. Every mutation is written through to the
//! profile immediately, except money credits which are batched (see
//! [`core::config::AUTOSAVE_EVERY`]).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod profile;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::GameConfig;
pub use crate::core::rng::GameRng;
pub use crate::game::service::StateService;
pub use crate::game::state::GameState;
pub use crate::profile::{Profile, ProfileStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
