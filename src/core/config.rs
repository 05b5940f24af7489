//! Tuning Constants
//!
//! Every number a designer might want to touch lives here, grouped into
//! config structs whose `Default` impls carry the shipped balance. Nothing
//! in this module is an invariant: invariants (floors, clamps) live next
//! to the state they guard.

/// Mining time can never drop below this many seconds.
pub const MINING_TIME_FLOOR: f64 = 0.1;

/// Item capacity can never drop below one slot.
pub const MIN_ITEM_CAPACITY: usize = 1;

/// `add_money` persists on every Nth call instead of every call.
///
/// Frequent small credits (selling, lucky events) would otherwise rewrite
/// the save file each time; an abnormal kill loses at most N-1 credits.
pub const AUTOSAVE_EVERY: u8 = 5;

/// Default save file next to the binary.
pub const SAVE_FILE: &str = "save.json";

/// Invalid inputs tolerated during an event choice before the first
/// declared choice is picked for the player.
pub const CHOICE_ATTEMPTS: u32 = 3;

/// Minings covered by one shop protection deal.
pub const EVENT_DEFENCE_DURATION: u32 = 10;

/// Fresh-profile values used when no save exists or it cannot be read.
#[derive(Clone, Debug)]
pub struct ProfileDefaults {
    /// Starting balance.
    pub money: i64,
    /// Starting inventory slots.
    pub item_capacity: usize,
    /// Starting seconds per mining run.
    pub mining_time: f64,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            money: 0,
            item_capacity: 5,
            mining_time: 2.0,
        }
    }
}

/// Session loot pool generation.
#[derive(Clone, Debug)]
pub struct LootConfig {
    /// Slots in the session ore pool (and in the yield-count pool).
    pub pool_size: usize,
    /// Minimum items one mining run can yield.
    pub yield_min: i64,
    /// Maximum items one mining run can yield.
    pub yield_max: i64,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            yield_min: 1,
            yield_max: 2,
        }
    }
}

/// Upgrade pricing and effect sizes.
#[derive(Clone, Debug)]
pub struct UpgradeConfig {
    /// Speed upgrade cost curve: max(min_cost, base - mining_time * factor).
    pub speed_cost_base: f64,
    /// See `speed_cost_base`.
    pub speed_cost_factor: f64,
    /// Cost floor once the curve bottoms out.
    pub speed_min_cost: f64,
    /// Fraction of the current mining time removed per speed upgrade.
    pub speed_decrease_rate: f64,
    /// Capacity upgrade cost = capacity * multiplier.
    pub capacity_cost_multiplier: i64,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            speed_cost_base: 100.0,
            speed_cost_factor: 30.0,
            speed_min_cost: 10.0,
            speed_decrease_rate: 0.1,
            capacity_cost_multiplier: 25,
        }
    }
}

/// Random event tuning.
#[derive(Clone, Debug)]
pub struct EventConfig {
    /// Bernoulli probability that a mining run is followed by an event.
    pub trigger_chance: f64,
    /// Relative weight per event kind, indexed by `EventKind::ALL` order.
    ///
    /// These deliberately sum to 0.5, not 1.0: the draw renormalizes by
    /// the total (each kind lands at an effective 0.2). Kept as-is, it is
    /// the shipped behavior.
    pub kind_weights: [f64; 5],
    /// Trauma event slowdown, drawn in tenths of a second (inclusive).
    pub trauma_slowdown_tenths: (i64, i64),
    /// Lucky event reward range in dollars (inclusive).
    pub lucky_reward: (i64, i64),
    /// Minimum equipment repair bill; below this the player is wiped out.
    pub repair_cost_min: i64,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            trigger_chance: 0.25,
            kind_weights: [0.1; 5],
            trauma_slowdown_tenths: (1, 5),
            lucky_reward: (10, 50),
            repair_cost_min: 10,
        }
    }
}

/// Pacing of the terminal presentation.
///
/// The game logic never sleeps on its own; it asks the [`crate::ui::Ui`]
/// collaborator to pause, so tests run with zero delay.
#[derive(Clone, Debug)]
pub struct PacingConfig {
    /// Animation frames per mining run ("mining.", "mining..", ...).
    pub mining_frames: u32,
    /// Seconds shown to an invalid menu choice before re-prompting.
    pub invalid_choice_delay: f64,
    /// Seconds a one-line result message stays on screen.
    pub message_delay: f64,
    /// Seconds the "Inventory is full" refusal stays on screen.
    pub full_inventory_delay: f64,
    /// Per-character delay of the slow text reveal.
    pub reveal_char_delay: f64,
    /// Per-character delay when revealing event descriptions.
    pub event_reveal_delay: f64,
    /// Per-character delay when revealing consequence lines.
    pub consequence_reveal_delay: f64,
    /// Pause after the "Event Triggered!" banner.
    pub event_banner_delay: f64,
    /// Pause after greeting the player at startup.
    pub welcome_delay: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            mining_frames: 3,
            invalid_choice_delay: 1.5,
            message_delay: 1.5,
            full_inventory_delay: 2.0,
            reveal_char_delay: 0.04,
            event_reveal_delay: 0.03,
            consequence_reveal_delay: 0.03,
            event_banner_delay: 1.5,
            welcome_delay: 2.0,
        }
    }
}

/// Aggregate of all tuning, passed once into the session.
#[derive(Clone, Debug, Default)]
pub struct GameConfig {
    /// Fresh-profile values.
    pub defaults: ProfileDefaults,
    /// Loot pool generation.
    pub loot: LootConfig,
    /// Upgrade pricing.
    pub upgrades: UpgradeConfig,
    /// Random event tuning.
    pub events: EventConfig,
    /// Presentation pacing.
    pub pacing: PacingConfig,
}
