//! CR7 Shop game logic: plain functions over `ShopState`, fully testable.

use crate::storage::{KeyValueStore, StorageError};

use super::anim::{MoneyAnimation, INSUFFICIENT_CUE_MS, QUANTITY_PULSE_MS};
use super::format::format_money;
use super::save;
use super::state::ShopState;

/// Result of one buy action.
#[derive(Clone, Debug, PartialEq)]
pub enum PurchaseOutcome {
    Bought {
        name: String,
        quantity: u64,
        total_cost: u64,
        new_balance: u64,
    },
    Insufficient {
        name: String,
        quantity: u64,
        needed: u64,
        shortfall: u64,
    },
    /// No card at that index.
    UnknownItem,
}

impl PurchaseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PurchaseOutcome::Bought { .. })
    }

    /// Text for the blocking alert after a failed purchase.
    pub fn alert_message(&self) -> Option<String> {
        match self {
            PurchaseOutcome::Insufficient {
                name,
                quantity,
                needed,
                shortfall,
            } => Some(format!(
                "Not enough money to buy {} × {}! Needed: {}$ (short by {}$)",
                quantity,
                name,
                format_money(*needed),
                format_money(*shortfall)
            )),
            _ => None,
        }
    }
}

/// Buy `quantity` units of the card at `item_idx`. All or nothing: either
/// the whole cost is debited or nothing changes except the warning cue.
///
/// On success the balance, the item's count and the receipt are written to
/// `store` in that order; the first failing write is returned after the
/// in-memory purchase has already been applied.
pub fn purchase(
    state: &mut ShopState,
    store: &impl KeyValueStore,
    item_idx: usize,
    quantity: u64,
    now_ms: f64,
) -> Result<PurchaseOutcome, StorageError> {
    let Some(item) = state.items.get(item_idx) else {
        return Ok(PurchaseOutcome::UnknownItem);
    };
    let name = item.name();
    let unit_price = item.price;

    let affordable = unit_price
        .checked_mul(quantity)
        .filter(|cost| *cost <= state.balance);
    let Some(total_cost) = affordable else {
        let needed = unit_price.saturating_mul(quantity);
        state.insufficient.trigger(INSUFFICIENT_CUE_MS);
        log::info!("cannot afford {quantity} × {name}: need {needed}, have {}", state.balance);
        return Ok(PurchaseOutcome::Insufficient {
            shortfall: needed - state.balance,
            name,
            quantity,
            needed,
        });
    };

    let new_balance = state.balance - total_cost;
    state.money_anim = Some(MoneyAnimation::supersede(
        state.money_anim.as_ref(),
        state.balance,
        new_balance,
    ));
    state.balance = new_balance;

    let owned = state.quantities.entry(name.clone()).or_insert(0);
    *owned = owned.saturating_add(quantity);
    let owned = *owned;
    if let Some(pulse) = state.quantity_pulse.get_mut(item_idx) {
        pulse.trigger(QUANTITY_PULSE_MS);
    }

    let touched = state.receipt.add(&name, unit_price, quantity, now_ms);
    state.panel.focus = Some(touched);

    log::info!("bought {quantity} × {name} for {total_cost}, balance now {new_balance}");

    save::save_balance(store, new_balance)?;
    save::save_quantity(store, &name, owned)?;
    save::save_receipt(store, &state.receipt)?;

    Ok(PurchaseOutcome::Bought {
        name,
        quantity,
        total_cost,
        new_balance,
    })
}

/// Empty the receipt and persist the empty record. Balance and owned counts
/// are untouched.
pub fn clear_receipt(state: &mut ShopState, store: &impl KeyValueStore) -> Result<(), StorageError> {
    state.receipt.clear();
    state.panel.focus = None;
    log::info!("receipt cleared");
    save::save_receipt(store, &state.receipt)
}

/// Wipe all three records and start over from whatever storage now yields
/// (the defaults), the same as reloading the page after a reset.
pub fn reset(state: &mut ShopState, store: &impl KeyValueStore) -> Result<(), StorageError> {
    save::clear_all(store)?;
    let saved = save::load_game(store);
    let viewport = state.viewport;
    *state = ShopState::new(saved.balance, saved.quantities, saved.receipt);
    state.viewport = viewport;
    log::info!("game reset");
    Ok(())
}

/// Advance animations and cues by one frame.
pub fn tick(state: &mut ShopState, delta_ms: f64) {
    if delta_ms <= 0.0 {
        return;
    }
    if let Some(anim) = &mut state.money_anim {
        anim.advance(delta_ms);
        if anim.is_finished() {
            state.money_anim = None;
        }
    }
    for pulse in &mut state.quantity_pulse {
        pulse.advance(delta_ms);
    }
    state.insufficient.advance(delta_ms);
}
