//! Semantic action IDs for CR7 Shop click targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

// ── Receipt panel ───────────────────────────────────────────────
/// Header strip of the receipt panel; pressing it starts a drag.
pub const RECEIPT_HANDLE: u16 = 1;
pub const RECEIPT_TOGGLE: u16 = 2;
pub const RECEIPT_CLEAR: u16 = 3;
/// Anything else inside the panel. Swallows clicks so cards underneath
/// the overlay are not bought by accident.
pub const RECEIPT_BODY: u16 = 4;

// ── Game ────────────────────────────────────────────────────────
pub const RESET_GAME: u16 = 10;

// ── Buy controls (base + catalog index) ─────────────────────────
pub const BUY_ITEM_BASE: u16 = 100;
