//! Persisted Player Profile
//!
//! One flat JSON record per player, rewritten whole on every mutation.
//! A missing or unreadable save is a normal condition: the store falls
//! back to defaults and persists them immediately, it never refuses to
//! open.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::config::ProfileDefaults;

/// The durable record of one player's progress.
///
/// Field names are pinned to the on-disk keys; changing a rename here
/// orphans existing saves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Player name; empty means the welcome flow has not run yet.
    #[serde(default)]
    pub name: String,

    /// Current balance in dollars.
    #[serde(default)]
    pub money: i64,

    /// Inventory as catalog item names, in acquisition order.
    #[serde(default)]
    pub inventory: Vec<String>,

    /// Inventory slot count.
    #[serde(rename = "itemcapacity", default = "default_item_capacity")]
    pub item_capacity: usize,

    /// Seconds per mining run.
    #[serde(rename = "miningtime", default = "default_mining_time")]
    pub mining_time: f64,

    /// Minings still covered by event protection.
    #[serde(rename = "eventdefencecounter", default)]
    pub event_defence: u32,
}

fn default_item_capacity() -> usize {
    ProfileDefaults::default().item_capacity
}

fn default_mining_time() -> f64 {
    ProfileDefaults::default().mining_time
}

impl Default for Profile {
    fn default() -> Self {
        let defaults = ProfileDefaults::default();
        Self {
            name: String::new(),
            money: defaults.money,
            inventory: Vec::new(),
            item_capacity: defaults.item_capacity,
            mining_time: defaults.mining_time,
            event_defence: 0,
        }
    }
}

/// A single profile field, read or written by key.
///
/// Lets callers probe fields without compile-time knowledge of the schema,
/// while keeping "unknown key" a reported condition instead of a panic.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// String field ("name").
    Text(String),
    /// Integer field ("money", "itemcapacity", "eventdefencecounter").
    Int(i64),
    /// Float field ("miningtime").
    Float(f64),
    /// Name-list field ("inventory").
    Names(Vec<String>),
}

/// Profile store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not write the save file.
    #[error("failed to write save file: {0}")]
    Io(#[from] std::io::Error),

    /// Could not serialize the profile.
    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),

    /// `set` was asked for a field outside the schema.
    #[error("unknown profile field: {0}")]
    UnknownField(String),

    /// `set` was given a value of the wrong shape for the field.
    #[error("field {field} expects {expected}")]
    FieldType {
        /// Schema field that rejected the value.
        field: &'static str,
        /// What the field would have accepted.
        expected: &'static str,
    },
}

/// Durable key-value store for one [`Profile`].
///
/// Every mutating call re-serializes the whole record synchronously; the
/// file is replaced atomically (temp file + rename) so a crash mid-write
/// leaves the previous save intact.
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    profile: Profile,
}

impl ProfileStore {
    /// Open the store at `path`.
    ///
    /// An existing readable save is loaded as-is. A missing or corrupt
    /// file is recovered by initializing defaults and persisting them
    /// right away; only a failure to write that initial save is an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Profile>(&raw) {
                Ok(profile) => return Ok(Self { path, profile }),
                Err(err) => {
                    warn!(save = %path.display(), %err, "corrupt save file, starting fresh");
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                warn!(save = %path.display(), %err, "unreadable save file, starting fresh");
            }
        }

        let store = Self {
            path,
            profile: Profile::default(),
        };
        store.save()?;
        Ok(store)
    }

    /// The profile as currently held in memory.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Where this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read one field by key. `None` means the key is not in the schema.
    pub fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(FieldValue::Text(self.profile.name.clone())),
            "money" => Some(FieldValue::Int(self.profile.money)),
            "inventory" => Some(FieldValue::Names(self.profile.inventory.clone())),
            "itemcapacity" => Some(FieldValue::Int(self.profile.item_capacity as i64)),
            "miningtime" => Some(FieldValue::Float(self.profile.mining_time)),
            "eventdefencecounter" => Some(FieldValue::Int(self.profile.event_defence as i64)),
            _ => None,
        }
    }

    /// Write one field by key and persist synchronously.
    ///
    /// Unknown keys and mismatched value shapes fail fast with the state
    /// untouched. The store does not apply game clamps; those belong to
    /// the session state.
    pub fn set(&mut self, field: &str, value: FieldValue) -> Result<(), StoreError> {
        match (field, value) {
            ("name", FieldValue::Text(v)) => self.profile.name = v,
            ("name", _) => {
                return Err(StoreError::FieldType { field: "name", expected: "text" });
            }
            ("money", FieldValue::Int(v)) => self.profile.money = v,
            ("money", _) => {
                return Err(StoreError::FieldType { field: "money", expected: "an integer" });
            }
            ("inventory", FieldValue::Names(v)) => self.profile.inventory = v,
            ("inventory", _) => {
                return Err(StoreError::FieldType {
                    field: "inventory",
                    expected: "a list of item names",
                });
            }
            ("itemcapacity", FieldValue::Int(v)) => {
                self.profile.item_capacity = usize::try_from(v).map_err(|_| {
                    StoreError::FieldType {
                        field: "itemcapacity",
                        expected: "a non-negative integer",
                    }
                })?;
            }
            ("itemcapacity", _) => {
                return Err(StoreError::FieldType {
                    field: "itemcapacity",
                    expected: "a non-negative integer",
                });
            }
            ("miningtime", FieldValue::Float(v)) => self.profile.mining_time = v,
            ("miningtime", _) => {
                return Err(StoreError::FieldType { field: "miningtime", expected: "a number" });
            }
            ("eventdefencecounter", FieldValue::Int(v)) => {
                self.profile.event_defence = u32::try_from(v).map_err(|_| {
                    StoreError::FieldType {
                        field: "eventdefencecounter",
                        expected: "a non-negative integer",
                    }
                })?;
            }
            ("eventdefencecounter", _) => {
                return Err(StoreError::FieldType {
                    field: "eventdefencecounter",
                    expected: "a non-negative integer",
                });
            }
            (other, _) => return Err(StoreError::UnknownField(other.to_string())),
        }
        self.save()
    }

    /// Replace the whole record and persist once.
    pub fn update_all(&mut self, profile: &Profile) -> Result<(), StoreError> {
        self.profile = profile.clone();
        self.save()
    }

    /// Persist the in-memory record: whole-file rewrite, atomic replace.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.profile)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
