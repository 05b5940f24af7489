//! Ore Catalog
//!
//! The fixed set of minable items. Catalog entries are immutable values;
//! the session ore pool (see [`crate::game::state::GameState`]) is sampled
//! from here at startup.

use std::cmp::Ordering;
use std::fmt;

/// One ore type: display name, sale price, natural spawn weight.
///
/// `spawn_weight` is the declared relative likelihood of being mined. The
/// current yield draw samples the session ore pool uniformly and does not
/// consult it; the weight stays part of the item record.
#[derive(Clone, Copy, Debug)]
pub struct Item {
    /// Display name, also the key used in the save file.
    pub name: &'static str,
    /// Sale price in dollars.
    pub price: i64,
    /// Relative spawn likelihood (unused by the uniform draw).
    pub spawn_weight: f64,
}

/// Every minable ore, cheapest first.
pub const CATALOG: [Item; 7] = [
    Item { name: "Stone", price: 2, spawn_weight: 0.4 },
    Item { name: "Coal", price: 5, spawn_weight: 0.3 },
    Item { name: "Iron", price: 15, spawn_weight: 0.2 },
    Item { name: "Gold", price: 30, spawn_weight: 0.1 },
    Item { name: "Diamond", price: 75, spawn_weight: 0.05 },
    Item { name: "Emerald", price: 100, spawn_weight: 0.03 },
    Item { name: "Ruby", price: 150, spawn_weight: 0.02 },
];

impl Item {
    /// Look up a catalog entry by its save-file name.
    pub fn by_name(name: &str) -> Option<Item> {
        CATALOG.iter().find(|item| item.name == name).copied()
    }
}

// Equality and ordering compare by price only.
impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.price == other.price
    }
}

impl Eq for Item {}

impl PartialOrd for Item {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Item {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price.cmp(&other.price)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
