//! Session Game State
//!
//! The in-memory snapshot of one play session, derived from the persisted
//! profile at startup and discarded after the final save. Fields are
//! crate-private: the only writer is [`crate::game::service::StateService`].

use tracing::warn;

use crate::core::config::{LootConfig, MINING_TIME_FLOOR, MIN_ITEM_CAPACITY};
use crate::core::rng::GameRng;
use crate::game::item::{Item, CATALOG};
use crate::profile::Profile;

/// Mutable state of one play session.
///
/// Invariant: `inventory.len() <= item_capacity` at all times; an add
/// beyond capacity is rejected, never silently dropped.
#[derive(Clone, Debug)]
pub struct GameState {
    pub(crate) inventory: Vec<Item>,
    pub(crate) item_amounts: Vec<u32>,
    pub(crate) money: i64,
    pub(crate) item_capacity: usize,
    pub(crate) mining_time: f64,
    pub(crate) ore_pool: Vec<Item>,
    pub(crate) event_defence: u32,
    // Money-additions since the last persist; not itself persisted.
    pub(crate) auto_save_counter: u8,
}

impl GameState {
    /// Build session state from a profile, clamping out-of-range fields
    /// and sampling the session loot pools.
    ///
    /// The ore pool is `loot.pool_size` uniform picks from the catalog;
    /// the yield pool is the same number of counts drawn from
    /// `[yield_min, yield_max]`. Both are fixed for the whole session.
    pub fn from_profile(profile: &Profile, rng: &mut GameRng, loot: &LootConfig) -> Self {
        let money = if profile.money < 0 {
            warn!(money = profile.money, "negative balance in save, clamping to 0");
            0
        } else {
            profile.money
        };

        let item_capacity = profile.item_capacity.max(MIN_ITEM_CAPACITY);

        let mut inventory = Vec::with_capacity(item_capacity);
        for name in &profile.inventory {
            match Item::by_name(name) {
                Some(item) => inventory.push(item),
                None => warn!(item = %name, "unknown item in save, skipping"),
            }
        }
        if inventory.len() > item_capacity {
            warn!(
                held = inventory.len(),
                capacity = item_capacity,
                "inventory exceeds capacity in save, truncating"
            );
            inventory.truncate(item_capacity);
        }

        let mut ore_pool = Vec::with_capacity(loot.pool_size);
        let mut item_amounts = Vec::with_capacity(loot.pool_size);
        for _ in 0..loot.pool_size {
            let idx = rng.next_int(CATALOG.len() as u32) as usize;
            ore_pool.push(CATALOG[idx]);
            item_amounts.push(rng.next_int_range(loot.yield_min, loot.yield_max) as u32);
        }

        let mut state = Self {
            inventory,
            item_amounts,
            money,
            item_capacity,
            mining_time: 0.0,
            ore_pool,
            event_defence: profile.event_defence,
            auto_save_counter: 0,
        };
        state.set_mining_time(profile.mining_time);
        state
    }

    /// Current inventory, acquisition order.
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    /// Total sale value of the inventory.
    pub fn inventory_value(&self) -> i64 {
        self.inventory.iter().map(|item| item.price).sum()
    }

    /// True when no further item fits.
    pub fn inventory_full(&self) -> bool {
        self.inventory.len() >= self.item_capacity
    }

    /// Current balance.
    pub fn money(&self) -> i64 {
        self.money
    }

    /// Inventory slot count.
    pub fn item_capacity(&self) -> usize {
        self.item_capacity
    }

    /// Seconds per mining run, never below [`MINING_TIME_FLOOR`].
    ///
    /// The setter clamps too; the read-side clamp stays as a second
    /// guard for state loaded from older saves.
    pub fn mining_time(&self) -> f64 {
        self.mining_time.max(MINING_TIME_FLOOR)
    }

    /// Session ore pool: the population mining actually draws from.
    pub fn ore_pool(&self) -> &[Item] {
        &self.ore_pool
    }

    /// Session yield-count pool.
    pub fn item_amounts(&self) -> &[u32] {
        &self.item_amounts
    }

    /// Minings still covered by event protection.
    pub fn event_defence(&self) -> u32 {
        self.event_defence
    }

    pub(crate) fn set_mining_time(&mut self, seconds: f64) {
        self.mining_time = seconds.max(MINING_TIME_FLOOR);
    }

    /// Snapshot for persistence. The name is not session state; the
    /// caller supplies it from the store.
    pub fn to_profile(&self, name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            money: self.money,
            inventory: self.inventory.iter().map(|item| item.name.to_string()).collect(),
            item_capacity: self.item_capacity,
            mining_time: self.mining_time(),
            event_defence: self.event_defence,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LootConfig;

    fn fresh(profile: &Profile) -> GameState {
        let mut rng = GameRng::new(4242);
        GameState::from_profile(profile, &mut rng, &LootConfig::default())
    }

    #[test]
    fn test_loot_pools_sampled_at_session_start() {
        let state = fresh(&Profile::default());
        let loot = LootConfig::default();

        assert_eq!(state.ore_pool().len(), loot.pool_size);
        assert_eq!(state.item_amounts().len(), loot.pool_size);
        for amount in state.item_amounts() {
            assert!((loot.yield_min..=loot.yield_max).contains(&(*amount as i64)));
        }
        for ore in state.ore_pool() {
            assert!(Item::by_name(ore.name).is_some());
        }
    }

    #[test]
    fn test_loot_pools_are_seed_deterministic() {
        let a = fresh(&Profile::default());
        let b = fresh(&Profile::default());

        assert_eq!(a.ore_pool(), b.ore_pool());
        assert_eq!(a.item_amounts(), b.item_amounts());
    }

    #[test]
    fn test_from_profile_clamps_out_of_range_fields() {
        let profile = Profile {
            money: -50,
            item_capacity: 0,
            mining_time: 0.01,
            ..Profile::default()
        };
        let state = fresh(&profile);

        assert_eq!(state.money(), 0);
        assert_eq!(state.item_capacity(), MIN_ITEM_CAPACITY);
        assert_eq!(state.mining_time(), MINING_TIME_FLOOR);
    }

    #[test]
    fn test_mining_time_read_clamp_guards_raw_field() {
        let mut state = fresh(&Profile::default());

        // Force the raw field below the floor; the accessor still clamps.
        state.mining_time = 0.0001;
        assert_eq!(state.mining_time(), MINING_TIME_FLOOR);

        // And the setter clamps on its own.
        state.set_mining_time(-3.0);
        assert_eq!(state.mining_time, MINING_TIME_FLOOR);
    }

    #[test]
    fn test_inventory_resolved_and_truncated() {
        let profile = Profile {
            inventory: vec![
                "Stone".into(),
                "Mithril".into(), // not in the catalog, skipped
                "Ruby".into(),
                "Coal".into(),
            ],
            item_capacity: 2,
            ..Profile::default()
        };
        let state = fresh(&profile);

        assert_eq!(state.inventory().len(), 2);
        assert_eq!(state.inventory()[0].name, "Stone");
        assert_eq!(state.inventory()[1].name, "Ruby");
    }

    #[test]
    fn test_to_profile_round_trip() {
        let profile = Profile {
            name: "Vey".into(),
            money: 123,
            inventory: vec!["Gold".into(), "Stone".into()],
            item_capacity: 6,
            mining_time: 1.4,
            event_defence: 2,
        };
        let state = fresh(&profile);

        assert_eq!(state.to_profile("Vey"), profile);
    }

    #[test]
    fn test_inventory_value_sums_prices() {
        let profile = Profile {
            inventory: vec!["Stone".into(), "Ruby".into()],
            ..Profile::default()
        };
        let state = fresh(&profile);

        assert_eq!(state.inventory_value(), 2 + 150);
    }
}
