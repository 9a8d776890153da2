//! Purchase receipt: the running ledger and the floating panel that shows it.

use chrono::DateTime;
use ratzilla::ratatui::layout::Rect;
use serde::{Deserialize, Deserializer, Serialize};

use super::format::normalize_item_name;

/// Panel width in cells (borders included).
pub const PANEL_WIDTH: u16 = 40;
/// Rows the expanded panel may grow to (borders included).
pub const PANEL_MAX_HEIGHT: u16 = 20;
/// Rows each receipt entry occupies.
pub const ENTRY_ROWS: u16 = 2;
/// Rows above the panel reserved for the balance bar when it is not dragged.
const DEFAULT_TOP: u16 = 3;

/// All purchases of one canonical item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptEntry {
    pub name: String,
    /// Unit price at the first purchase.
    pub price: u64,
    pub quantity: u64,
    pub total_price: u64,
    /// Epoch milliseconds of the first purchase.
    #[serde(default, deserialize_with = "timestamp_ms")]
    pub timestamp: f64,
}

/// Accepts epoch milliseconds or an RFC 3339 string, which is how a JS
/// `Date` comes out of `JSON.stringify`. `null` reads as 0.
fn timestamp_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stamp {
        Millis(f64),
        Iso(String),
    }

    match Option::<Stamp>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(Stamp::Millis(ms)) => Ok(ms),
        Some(Stamp::Iso(text)) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis() as f64)
            .map_err(serde::de::Error::custom),
    }
}

/// Aggregated purchase history, persisted as a whole.
///
/// `total_spent` and `total_items` always equal the sums over `entries()`.
/// `total_purchases` counts buy actions, not units.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Receipt {
    total_spent: u64,
    total_purchases: u64,
    total_items: u64,
    purchase_history: Vec<ReceiptEntry>,
}

impl Receipt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one buy action. Repeat purchases of the same canonical item
    /// accumulate into its existing entry. Returns the index of the entry
    /// that was created or updated.
    pub fn add(&mut self, item_name: &str, unit_price: u64, quantity: u64, now_ms: f64) -> usize {
        let name = normalize_item_name(item_name);
        let cost = unit_price.saturating_mul(quantity);

        self.total_purchases += 1;
        self.total_items = self.total_items.saturating_add(quantity);
        self.total_spent = self.total_spent.saturating_add(cost);

        match self.purchase_history.iter().position(|e| e.name == name) {
            Some(idx) => {
                let entry = &mut self.purchase_history[idx];
                entry.quantity = entry.quantity.saturating_add(quantity);
                entry.total_price = entry.total_price.saturating_add(cost);
                idx
            }
            None => {
                self.purchase_history.push(ReceiptEntry {
                    name,
                    price: unit_price,
                    quantity,
                    total_price: cost,
                    timestamp: now_ms,
                });
                self.purchase_history.len() - 1
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Receipt::default();
    }

    pub fn total_spent(&self) -> u64 {
        self.total_spent
    }

    pub fn total_purchases(&self) -> u64 {
        self.total_purchases
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn entries(&self) -> &[ReceiptEntry] {
        &self.purchase_history
    }

    pub fn is_empty(&self) -> bool {
        self.purchase_history.is_empty()
    }

    #[cfg(test)]
    pub fn entry(&self, name: &str) -> Option<&ReceiptEntry> {
        let name = normalize_item_name(name);
        self.purchase_history.iter().find(|e| e.name == name)
    }
}

/// View state of the receipt overlay. Never persisted.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReceiptPanel {
    pub collapsed: bool,
    /// Top-left cell once the player has dragged the panel.
    pub position: Option<(u16, u16)>,
    /// Grab point relative to the panel origin while a drag is in progress.
    drag_offset: Option<(u16, u16)>,
    /// Entry to keep scrolled into view (the last one added or updated).
    pub focus: Option<usize>,
}

impl ReceiptPanel {
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_offset.is_some()
    }

    /// Where the panel sits inside `viewport`. Before any drag it hugs the
    /// right edge below the balance bar; a dragged position is clamped so the
    /// panel never leaves the screen.
    pub fn rect(&self, viewport: Rect, entry_count: usize) -> Rect {
        let width = PANEL_WIDTH.min(viewport.width);
        let height = panel_height(self.collapsed, entry_count).min(viewport.height);
        let max_x = viewport.x + viewport.width - width;
        let max_y = viewport.y + viewport.height - height;

        let (x, y) = match self.position {
            Some((x, y)) => (x, y),
            None => (max_x, viewport.y + DEFAULT_TOP),
        };
        Rect::new(
            x.clamp(viewport.x, max_x),
            y.clamp(viewport.y, max_y),
            width,
            height,
        )
    }

    pub fn start_drag(&mut self, col: u16, row: u16, current: Rect) {
        self.drag_offset = Some((
            col.saturating_sub(current.x),
            row.saturating_sub(current.y),
        ));
        self.position = Some((current.x, current.y));
    }

    pub fn drag_to(&mut self, col: u16, row: u16) {
        if let Some((dx, dy)) = self.drag_offset {
            self.position = Some((col.saturating_sub(dx), row.saturating_sub(dy)));
        }
    }

    pub fn end_drag(&mut self) {
        self.drag_offset = None;
    }
}

/// Total rows of the panel: borders, header, stats, entries (or the empty
/// placeholder) and the total line.
pub fn panel_height(collapsed: bool, entry_count: usize) -> u16 {
    if collapsed {
        return 3;
    }
    let entry_rows = entry_count.saturating_mul(ENTRY_ROWS as usize).max(1);
    entry_rows
        .saturating_add(2 + 1 + 1 + 1)
        .min(PANEL_MAX_HEIGHT as usize) as u16
}
