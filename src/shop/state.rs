/// CR7 Shop state definitions.

use std::collections::BTreeMap;

use ratzilla::ratatui::layout::Rect;

use super::anim::{Cue, MoneyAnimation};
use super::format::{format_money, normalize_item_name};
use super::receipt::{Receipt, ReceiptPanel};

/// One card in the shop.
#[derive(Clone, Debug, PartialEq)]
pub struct ShopItem {
    /// Label as printed on the card, decorative quotes included.
    pub label: &'static str,
    pub price: u64,
}

impl ShopItem {
    /// Canonical name used as the key in every saved record.
    pub fn name(&self) -> String {
        normalize_item_name(self.label)
    }

    pub fn price_label(&self) -> String {
        format!("{}$", format_money(self.price))
    }
}

/// The shop's cards in display order. Key `1` buys the first one.
pub const CATALOG: &[ShopItem] = &[
    ShopItem { label: "\"CR7\" Football", price: 150 },
    ShopItem { label: "«Al-Nassr Jersey»", price: 120 },
    ShopItem { label: "«Mercurial Boots»", price: 2_500 },
    ShopItem { label: "\"Rolex Daytona\"", price: 45_000 },
    ShopItem { label: "«Bugatti Chiron»", price: 3_000_000 },
    ShopItem { label: "«Madeira Villa»", price: 12_000_000 },
    ShopItem { label: "\"Private Jet\"", price: 65_000_000 },
    ShopItem { label: "«Yacht Azzam»", price: 600_000_000 },
    ShopItem { label: "«Ballon d'Or»", price: 1_500_000_000 },
];

/// Everything the shop knows during a session.
pub struct ShopState {
    pub items: Vec<ShopItem>,
    /// Authoritative spendable money. The balance bar only ever displays it.
    pub balance: u64,
    /// Canonical item name → units owned.
    pub quantities: BTreeMap<String, u64>,
    pub receipt: Receipt,
    pub panel: ReceiptPanel,
    pub money_anim: Option<MoneyAnimation>,
    /// Owned-counter pulse, one per catalog entry.
    pub quantity_pulse: Vec<Cue>,
    pub insufficient: Cue,
    /// Screen area the shop was last laid out in.
    pub viewport: Rect,
}

impl ShopState {
    pub fn new(balance: u64, quantities: BTreeMap<String, u64>, receipt: Receipt) -> Self {
        let items = CATALOG.to_vec();
        let quantity_pulse = vec![Cue::default(); items.len()];
        Self {
            items,
            balance,
            quantities,
            receipt,
            panel: ReceiptPanel::default(),
            money_anim: None,
            quantity_pulse,
            insufficient: Cue::default(),
            viewport: Rect::default(),
        }
    }

    /// Units owned of the card at `idx`.
    pub fn owned(&self, idx: usize) -> u64 {
        self.items
            .get(idx)
            .and_then(|item| self.quantities.get(&item.name()))
            .copied()
            .unwrap_or(0)
    }

    /// Balance as currently shown, following any running animation.
    pub fn displayed_balance(&self) -> u64 {
        match &self.money_anim {
            Some(anim) => anim.value(),
            None => self.balance,
        }
    }

    /// Where the receipt overlay currently sits.
    pub fn receipt_rect(&self) -> Rect {
        self.panel.rect(self.viewport, self.receipt.entries().len())
    }
}
