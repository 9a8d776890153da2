//! Save/load of the three shop records in key-value storage.
//!
//! Each record is read and written whole and independently of the others:
//!
//! - `cr7Money`: balance as a decimal string.
//! - `cr7Quantities`: JSON object, canonical item name → units owned.
//! - `cr7Receipt`: JSON receipt (totals plus the entry list).
//!
//! There is no cross-record transaction. A failure between two writes can
//! leave them out of step, and nothing tries to repair that.

use std::collections::BTreeMap;

use crate::storage::{KeyValueStore, StorageError};

use super::format::normalize_item_name;
use super::receipt::Receipt;

pub const MONEY_KEY: &str = "cr7Money";
pub const QUANTITIES_KEY: &str = "cr7Quantities";
pub const RECEIPT_KEY: &str = "cr7Receipt";

/// Balance of a fresh game.
pub const DEFAULT_BALANCE: u64 = 2_000_000_000;

fn corrupt(key: &str, reason: impl ToString) -> StorageError {
    StorageError::Corrupt {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn load_balance(store: &impl KeyValueStore) -> Result<u64, StorageError> {
    match store.get(MONEY_KEY)? {
        None => Ok(DEFAULT_BALANCE),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| corrupt(MONEY_KEY, format!("not a number: {raw:?}"))),
    }
}

pub fn save_balance(store: &impl KeyValueStore, balance: u64) -> Result<(), StorageError> {
    store.set(MONEY_KEY, &balance.to_string())
}

/// Load the quantity map. Keys written by older builds may still carry
/// decorative quotes, so every key is normalized on the way in.
pub fn load_quantities(store: &impl KeyValueStore) -> Result<BTreeMap<String, u64>, StorageError> {
    let Some(raw) = store.get(QUANTITIES_KEY)? else {
        return Ok(BTreeMap::new());
    };
    let stored: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&raw).map_err(|e| corrupt(QUANTITIES_KEY, e))?;

    let mut quantities = BTreeMap::new();
    for (key, value) in stored {
        let count = value
            .as_u64()
            .ok_or_else(|| corrupt(QUANTITIES_KEY, format!("`{key}` is not a count: {value}")))?;
        quantities.insert(normalize_item_name(&key), count);
    }
    Ok(quantities)
}

/// Read-modify-write the quantity map with one item's new count.
pub fn save_quantity(store: &impl KeyValueStore, item_name: &str, quantity: u64) -> Result<(), StorageError> {
    let mut quantities = load_quantities(store)?;
    quantities.insert(normalize_item_name(item_name), quantity);
    let json = serde_json::to_string(&quantities).map_err(|e| corrupt(QUANTITIES_KEY, e))?;
    store.set(QUANTITIES_KEY, &json)
}

pub fn load_receipt(store: &impl KeyValueStore) -> Result<Receipt, StorageError> {
    match store.get(RECEIPT_KEY)? {
        None => Ok(Receipt::new()),
        Some(raw) => serde_json::from_str(&raw).map_err(|e| corrupt(RECEIPT_KEY, e)),
    }
}

pub fn save_receipt(store: &impl KeyValueStore, receipt: &Receipt) -> Result<(), StorageError> {
    let json = serde_json::to_string(receipt).map_err(|e| corrupt(RECEIPT_KEY, e))?;
    store.set(RECEIPT_KEY, &json)
}

/// Remove all three records. The next load starts a fresh game.
pub fn clear_all(store: &impl KeyValueStore) -> Result<(), StorageError> {
    store.remove(MONEY_KEY)?;
    store.remove(QUANTITIES_KEY)?;
    store.remove(RECEIPT_KEY)
}

/// Everything restored at startup.
#[derive(Debug, PartialEq)]
pub struct SavedGame {
    pub balance: u64,
    pub quantities: BTreeMap<String, u64>,
    pub receipt: Receipt,
}

/// Load all three records. A corrupt record is logged, deleted and replaced
/// by its default so the rest of the save still loads.
pub fn load_game(store: &impl KeyValueStore) -> SavedGame {
    SavedGame {
        balance: recover(store, MONEY_KEY, load_balance(store), DEFAULT_BALANCE),
        quantities: recover(store, QUANTITIES_KEY, load_quantities(store), BTreeMap::new()),
        receipt: recover(store, RECEIPT_KEY, load_receipt(store), Receipt::new()),
    }
}

fn recover<T>(store: &impl KeyValueStore, key: &str, loaded: Result<T, StorageError>, default: T) -> T {
    match loaded {
        Ok(value) => value,
        Err(e @ StorageError::Corrupt { .. }) => {
            log::warn!("discarding save record: {e}");
            if let Err(e) = store.remove(key) {
                log::warn!("could not remove `{key}`: {e}");
            }
            default
        }
        Err(e) => {
            log::error!("could not read `{key}`: {e}");
            default
        }
    }
}
