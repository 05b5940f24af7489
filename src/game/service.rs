//! State Mutation Service
//!
//! The sole writer of [`GameState`]. Every mutation is persisted to the
//! profile store synchronously, with one deliberate exception: money
//! credits are batched and flushed on every fifth call, trading up to
//! four unsaved credits on an abnormal kill for far fewer disk writes
//! during normal play.

use crate::core::config::AUTOSAVE_EVERY;
use crate::game::item::Item;
use crate::game::state::GameState;
use crate::profile::{FieldValue, ProfileStore, StoreError};

/// State mutation errors.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A mutation was called with a negative magnitude.
    #[error("amount must be non-negative, got {0}")]
    NegativeAmount(f64),

    /// Persisting the mutation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Sole authorized mutator of [`GameState`].
///
/// Owns both the session state and the profile store; callers read
/// through [`StateService::state`] and mutate through the operations
/// here. Operations taking a magnitude reject negative values with the
/// state untouched.
#[derive(Debug)]
pub struct StateService {
    state: GameState,
    store: ProfileStore,
}

impl StateService {
    /// Wire a session state to its backing store.
    pub fn new(state: GameState, store: ProfileStore) -> Self {
        Self { state, store }
    }

    /// Read-only view of the session state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Player name as held by the store.
    pub fn player_name(&self) -> &str {
        &self.store.profile().name
    }

    /// Set the player name and persist it.
    pub fn set_player_name(&mut self, name: &str) -> Result<(), StateError> {
        self.store.set("name", FieldValue::Text(name.to_string()))?;
        Ok(())
    }

    /// Credit `amount`; returns the new balance.
    ///
    /// Persists only every [`AUTOSAVE_EVERY`]th call. Callers needing a
    /// guaranteed flush point use [`StateService::save_state`].
    pub fn add_money(&mut self, amount: i64) -> Result<i64, StateError> {
        if amount < 0 {
            return Err(StateError::NegativeAmount(amount as f64));
        }
        self.state.money += amount;
        self.state.auto_save_counter += 1;
        if self.state.auto_save_counter >= AUTOSAVE_EVERY {
            self.persist()?;
            self.state.auto_save_counter = 0;
        }
        Ok(self.state.money)
    }

    /// Debit `amount` if the balance covers it; returns the balance
    /// afterwards.
    ///
    /// When the balance is short this is a silent no-op: no error, no
    /// persist, the unchanged balance comes back. Callers must pre-check
    /// affordability or compare the returned balance.
    pub fn deduct_money(&mut self, amount: i64) -> Result<i64, StateError> {
        if amount < 0 {
            return Err(StateError::NegativeAmount(amount as f64));
        }
        if self.state.money >= amount {
            self.state.money -= amount;
            self.persist()?;
        }
        Ok(self.state.money)
    }

    /// Shorten each mining run by `seconds`, floored at the minimum
    /// mining time.
    pub fn increase_mining_speed(&mut self, seconds: f64) -> Result<(), StateError> {
        if seconds < 0.0 {
            return Err(StateError::NegativeAmount(seconds));
        }
        let target = self.state.mining_time() - seconds;
        self.state.set_mining_time(target);
        self.persist()
    }

    /// Lengthen each mining run by `seconds`.
    pub fn decrease_mining_speed(&mut self, seconds: f64) -> Result<(), StateError> {
        if seconds < 0.0 {
            return Err(StateError::NegativeAmount(seconds));
        }
        let target = self.state.mining_time() + seconds;
        self.state.set_mining_time(target);
        self.persist()
    }

    /// Grow the inventory by `slots`.
    pub fn increase_item_capacity(&mut self, slots: usize) -> Result<(), StateError> {
        self.state.item_capacity += slots;
        self.persist()
    }

    /// Shrink the inventory by `slots`, floored at one slot.
    ///
    /// Items already held beyond the new capacity stay; only further
    /// adds are blocked.
    pub fn decrease_item_capacity(&mut self, slots: usize) -> Result<(), StateError> {
        self.state.item_capacity = self
            .state
            .item_capacity
            .saturating_sub(slots)
            .max(crate::core::config::MIN_ITEM_CAPACITY);
        self.persist()
    }

    /// Append `item` if a slot is free; returns whether it was added.
    ///
    /// A full inventory is a normal negative result, not an error, and
    /// does not touch the store.
    pub fn add_item_to_inventory(&mut self, item: Item) -> Result<bool, StateError> {
        if self.state.inventory.len() >= self.state.item_capacity {
            return Ok(false);
        }
        self.state.inventory.push(item);
        self.persist()?;
        Ok(true)
    }

    /// Drop every held item.
    pub fn clear_inventory(&mut self) -> Result<(), StateError> {
        self.state.inventory.clear();
        self.persist()
    }

    /// Extend event protection by `minings`.
    pub fn add_event_defence(&mut self, minings: u32) -> Result<(), StateError> {
        self.state.event_defence += minings;
        self.persist()
    }

    /// Consume one mining's worth of event protection.
    ///
    /// A counter already at zero stays at zero and does not persist.
    pub fn reduce_event_defence(&mut self) -> Result<(), StateError> {
        if self.state.event_defence == 0 {
            return Ok(());
        }
        self.state.event_defence -= 1;
        self.persist()
    }

    /// Guaranteed flush point: persist everything now.
    pub fn save_state(&mut self) -> Result<(), StateError> {
        self.persist()?;
        self.state.auto_save_counter = 0;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StateError> {
        let profile = self.state.to_profile(&self.store.profile().name);
        self.store.update_all(&profile)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{LootConfig, MINING_TIME_FLOOR};
    use crate::core::rng::GameRng;
    use crate::profile::Profile;
    use proptest::prelude::*;

    fn service_with(profile: Profile) -> (tempfile::TempDir, StateService) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProfileStore::load(dir.path().join("save.json")).unwrap();
        store.update_all(&profile).unwrap();
        let mut rng = GameRng::new(7);
        let state = GameState::from_profile(&profile, &mut rng, &LootConfig::default());
        (dir, StateService::new(state, store))
    }

    fn service() -> (tempfile::TempDir, StateService) {
        service_with(Profile::default())
    }

    fn stone() -> Item {
        Item::by_name("Stone").unwrap()
    }

    fn snapshot(service: &StateService) -> (i64, f64, usize, Vec<Item>, u32) {
        let s = service.state();
        (
            s.money(),
            s.mining_time(),
            s.item_capacity(),
            s.inventory().to_vec(),
            s.event_defence(),
        )
    }

    fn saved_profile(service: &StateService) -> Profile {
        let raw = std::fs::read_to_string(service.store.path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_negative_magnitudes_rejected_state_untouched() {
        let (_dir, mut service) = service();
        let before = snapshot(&service);

        assert!(matches!(service.add_money(-1), Err(StateError::NegativeAmount(_))));
        assert!(matches!(service.deduct_money(-5), Err(StateError::NegativeAmount(_))));
        assert!(matches!(
            service.increase_mining_speed(-0.5),
            Err(StateError::NegativeAmount(_))
        ));
        assert!(matches!(
            service.decrease_mining_speed(-0.5),
            Err(StateError::NegativeAmount(_))
        ));

        assert_eq!(snapshot(&service), before);
    }

    #[test]
    fn test_deduct_beyond_balance_is_silent_noop() {
        let (_dir, mut service) = service();

        let balance = service.deduct_money(50).unwrap();
        assert_eq!(balance, 0);
        assert_eq!(service.state().money(), 0);
    }

    #[test]
    fn test_earn_spend_cycle() {
        let (_dir, mut service) = service();

        assert_eq!(service.deduct_money(50).unwrap(), 0);
        assert_eq!(service.add_money(50).unwrap(), 50);
        assert_eq!(service.deduct_money(50).unwrap(), 0);
    }

    #[test]
    fn test_add_money_batches_persists_on_fifth_call() {
        let (_dir, mut service) = service();

        for amount in [1, 2, 3, 4] {
            service.add_money(amount).unwrap();
            // In memory only; the store still has the starting balance.
            assert_eq!(saved_profile(&service).money, 0);
        }

        service.add_money(5).unwrap();
        assert_eq!(service.state().money(), 15);
        assert_eq!(saved_profile(&service).money, 15);
    }

    #[test]
    fn test_save_state_flushes_pending_credits() {
        let (_dir, mut service) = service();

        service.add_money(7).unwrap();
        assert_eq!(saved_profile(&service).money, 0);

        service.save_state().unwrap();
        assert_eq!(saved_profile(&service).money, 7);

        // The explicit flush also reset the batch counter: four more
        // credits stay in memory again.
        for _ in 0..4 {
            service.add_money(1).unwrap();
        }
        assert_eq!(saved_profile(&service).money, 7);
    }

    #[test]
    fn test_mining_speed_floor() {
        let (_dir, mut service) = service_with(Profile {
            mining_time: 0.1,
            ..Profile::default()
        });

        service.increase_mining_speed(1000.0).unwrap();
        assert_eq!(service.state().mining_time(), MINING_TIME_FLOOR);

        service.decrease_mining_speed(0.4).unwrap();
        assert!((service.state().mining_time() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_capacity_floor() {
        let (_dir, mut service) = service();

        service.decrease_item_capacity(1000).unwrap();
        assert_eq!(service.state().item_capacity(), 1);

        service.increase_item_capacity(2).unwrap();
        assert_eq!(service.state().item_capacity(), 3);
    }

    #[test]
    fn test_inventory_capacity_is_enforced() {
        let (_dir, mut service) = service_with(Profile {
            item_capacity: 2,
            ..Profile::default()
        });

        assert!(service.add_item_to_inventory(stone()).unwrap());
        assert_eq!(service.state().inventory().len(), 1);
        assert!(service.add_item_to_inventory(stone()).unwrap());
        assert_eq!(service.state().inventory().len(), 2);

        // Third add is refused, length unchanged.
        assert!(!service.add_item_to_inventory(stone()).unwrap());
        assert_eq!(service.state().inventory().len(), 2);
    }

    #[test]
    fn test_clear_inventory_persists() {
        let (_dir, mut service) = service();

        service.add_item_to_inventory(stone()).unwrap();
        service.clear_inventory().unwrap();

        assert!(service.state().inventory().is_empty());
        assert!(saved_profile(&service).inventory.is_empty());
    }

    #[test]
    fn test_event_defence_counts_down_to_zero_and_stops() {
        let (_dir, mut service) = service();

        service.add_event_defence(2).unwrap();
        service.reduce_event_defence().unwrap();
        service.reduce_event_defence().unwrap();
        assert_eq!(service.state().event_defence(), 0);

        service.reduce_event_defence().unwrap();
        assert_eq!(service.state().event_defence(), 0);
    }

    #[test]
    fn test_reduce_event_defence_at_zero_does_not_persist() {
        let (_dir, mut service) = service();
        assert_eq!(service.state().event_defence(), 0);

        // Plant a sentinel in the save file; a persist would overwrite it.
        std::fs::write(service.store.path(), "sentinel").unwrap();
        service.reduce_event_defence().unwrap();
        assert_eq!(
            std::fs::read_to_string(service.store.path()).unwrap(),
            "sentinel"
        );
    }

    #[test]
    fn test_mutations_write_through() {
        let (_dir, mut service) = service();

        service.deduct_money(0).unwrap();
        service.add_event_defence(3).unwrap();
        service.increase_item_capacity(1).unwrap();
        service.decrease_mining_speed(0.5).unwrap();

        let saved = saved_profile(&service);
        assert_eq!(saved.event_defence, 3);
        assert_eq!(saved.item_capacity, 6);
        assert!((saved.mining_time - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_set_player_name_persists() {
        let (_dir, mut service) = service();

        service.set_player_name("Dusty").unwrap();
        assert_eq!(service.player_name(), "Dusty");
        assert_eq!(saved_profile(&service).name, "Dusty");

        // A later state persist keeps the name.
        service.add_event_defence(1).unwrap();
        assert_eq!(saved_profile(&service).name, "Dusty");
    }

    proptest! {
        #[test]
        fn prop_mining_time_never_below_floor(
            start in 0.1f64..60.0,
            deltas in proptest::collection::vec(0.0f64..100.0, 1..20),
        ) {
            let (_dir, mut service) = service_with(Profile {
                mining_time: start,
                ..Profile::default()
            });

            for (i, delta) in deltas.iter().enumerate() {
                if i % 2 == 0 {
                    service.increase_mining_speed(*delta).unwrap();
                } else {
                    service.decrease_mining_speed(*delta).unwrap();
                }
                prop_assert!(service.state().mining_time() >= MINING_TIME_FLOOR);
            }
        }

        #[test]
        fn prop_balance_never_negative(
            credits in proptest::collection::vec(0i64..1000, 1..10),
            debits in proptest::collection::vec(0i64..2000, 1..10),
        ) {
            let (_dir, mut service) = service();

            for amount in credits {
                service.add_money(amount).unwrap();
            }
            for amount in debits {
                let before = service.state().money();
                let after = service.deduct_money(amount).unwrap();
                prop_assert!(after >= 0);
                if amount > before {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
