/// CR7 Shop: spend Cristiano's fortune one purchase at a time.

pub mod actions;
pub mod anim;
pub mod format;
pub mod logic;
pub mod receipt;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::dialog::Dialogs;
use crate::input::{ClickState, DragPhase, InputEvent, Modifiers};
use crate::storage::KeyValueStore;
use crate::time::FrameClock;

use actions::*;
use state::ShopState;

pub const CLEAR_RECEIPT_PROMPT: &str = "Clear purchase history?";
pub const RESET_PROMPT: &str = "Reset the whole game and clear the receipt?";

/// Shifted digit row on a US layout; `Shift+1` arrives as `!`.
const SHIFTED_DIGITS: [char; 9] = ['!', '@', '#', '$', '%', '^', '&', '*', '('];

pub struct ShopGame<S: KeyValueStore, D: Dialogs> {
    pub state: ShopState,
    store: S,
    dialogs: D,
    clock: FrameClock,
}

impl<S: KeyValueStore, D: Dialogs> ShopGame<S, D> {
    /// Restore the shop from `store`, falling back to a fresh game for any
    /// record that is missing or unreadable.
    pub fn load(store: S, dialogs: D) -> Self {
        let saved = save::load_game(&store);
        log::info!(
            "shop loaded: balance {}, {} item kinds owned, {} receipt entries",
            saved.balance,
            saved.quantities.len(),
            saved.receipt.entries().len()
        );
        Self {
            state: ShopState::new(saved.balance, saved.quantities, saved.receipt),
            store,
            dialogs,
            clock: FrameClock::new(),
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c, mods) => self.handle_key(*c, *mods),
            InputEvent::Click(id, mods) => self.handle_click(*id, *mods),
            InputEvent::Drag(phase) => self.handle_drag(*phase),
        }
    }

    fn handle_key(&mut self, key: char, mods: Modifiers) -> bool {
        if let Some(digit) = key.to_digit(10).filter(|d| (1..=9).contains(d)) {
            self.buy(digit as usize - 1, mods.purchase_quantity());
            return true;
        }
        if let Some(idx) = SHIFTED_DIGITS.iter().position(|&s| s == key) {
            let mods = Modifiers { shift: true, ..mods };
            self.buy(idx, mods.purchase_quantity());
            return true;
        }
        // Ctrl+C, Ctrl+R, Ctrl+- and friends belong to the browser.
        if mods.ctrl {
            return false;
        }
        match key.to_ascii_lowercase() {
            '-' | '+' | '=' => {
                self.state.panel.toggle_collapsed();
                true
            }
            'c' => {
                self.clear_receipt();
                true
            }
            'r' => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, id: u16, mods: Modifiers) -> bool {
        match id {
            RECEIPT_TOGGLE => self.state.panel.toggle_collapsed(),
            RECEIPT_CLEAR => {
                self.clear_receipt();
            }
            // Presses inside the panel never reach what lies underneath.
            RECEIPT_HANDLE | RECEIPT_BODY => {}
            RESET_GAME => {
                self.reset();
            }
            id if id >= BUY_ITEM_BASE => {
                let idx = (id - BUY_ITEM_BASE) as usize;
                if idx >= self.state.items.len() {
                    return false;
                }
                self.buy(idx, mods.purchase_quantity());
            }
            _ => return false,
        }
        true
    }

    fn handle_drag(&mut self, phase: DragPhase) -> bool {
        match phase {
            DragPhase::Start { col, row } => {
                let current = self.state.receipt_rect();
                self.state.panel.start_drag(col, row, current);
            }
            DragPhase::Move { col, row } => {
                if !self.state.panel.is_dragging() {
                    return false;
                }
                self.state.panel.drag_to(col, row);
            }
            DragPhase::End => {
                if !self.state.panel.is_dragging() {
                    return false;
                }
                self.state.panel.end_drag();
            }
        }
        true
    }

    /// Buy `quantity` units of the card at `item_idx`. Shows an alert and
    /// returns false when the balance does not cover the whole cost.
    pub fn buy(&mut self, item_idx: usize, quantity: u64) -> bool {
        let now_ms = self.clock.now_ms().unwrap_or_default();
        match logic::purchase(&mut self.state, &self.store, item_idx, quantity, now_ms) {
            Ok(outcome) => {
                if let Some(message) = outcome.alert_message() {
                    self.dialogs.alert(&message);
                }
                outcome.is_success()
            }
            Err(e) => {
                // Already applied in memory; only the save is behind.
                log::warn!("purchase not saved: {e}");
                true
            }
        }
    }

    /// Empty the receipt after the player confirms. Returns whether it was
    /// cleared.
    pub fn clear_receipt(&mut self) -> bool {
        if !self.dialogs.confirm(CLEAR_RECEIPT_PROMPT) {
            return false;
        }
        if let Err(e) = logic::clear_receipt(&mut self.state, &self.store) {
            log::warn!("cleared receipt not saved: {e}");
        }
        true
    }

    /// Wipe the save and start over after the player confirms. Returns
    /// whether the game was reset.
    pub fn reset(&mut self) -> bool {
        if !self.dialogs.confirm(RESET_PROMPT) {
            return false;
        }
        if let Err(e) = logic::reset(&mut self.state, &self.store) {
            log::error!("reset failed: {e}");
            return false;
        }
        true
    }

    /// Advance animations to the frame stamped `now_ms`.
    pub fn tick(&mut self, now_ms: f64) {
        let delta = self.clock.update(now_ms);
        logic::tick(&mut self.state, delta);
    }

    /// Lay the shop out in `area` from now on.
    pub fn resize(&mut self, area: Rect) {
        self.state.viewport = area;
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state, f, area, click_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::ScriptedDialogs;
    use crate::shop::save::{DEFAULT_BALANCE, MONEY_KEY};
    use crate::storage::MemoryStorage;

    type TestGame = ShopGame<Rc<MemoryStorage>, ScriptedDialogs>;

    fn game(answer: bool) -> (TestGame, Rc<MemoryStorage>) {
        let store = Rc::new(MemoryStorage::new());
        let mut game = ShopGame::load(store.clone(), ScriptedDialogs::answering(answer));
        game.resize(Rect::new(0, 0, 100, 30));
        (game, store)
    }

    fn shift() -> Modifiers {
        Modifiers { shift: true, ctrl: false }
    }

    fn ctrl() -> Modifiers {
        Modifiers { shift: false, ctrl: true }
    }

    #[test]
    fn fresh_game_has_default_balance() {
        let (game, _) = game(true);
        assert_eq!(game.state.balance, DEFAULT_BALANCE);
        assert!(game.state.receipt.is_empty());
    }

    #[test]
    fn number_key_buys_matching_card() {
        let (mut game, _) = game(true);
        let price = game.state.items[0].price;
        assert!(game.handle_input(&InputEvent::Key('1', Modifiers::NONE)));
        assert_eq!(game.state.owned(0), 1);
        assert_eq!(game.state.balance, DEFAULT_BALANCE - price);
    }

    #[test]
    fn click_modifiers_buy_ten_or_hundred() {
        let (mut game, _) = game(true);
        game.handle_input(&InputEvent::Click(BUY_ITEM_BASE + 1, shift()));
        assert_eq!(game.state.owned(1), 10);
        game.handle_input(&InputEvent::Click(BUY_ITEM_BASE + 1, ctrl()));
        assert_eq!(game.state.owned(1), 110);
        assert_eq!(game.state.receipt.total_purchases(), 2);
    }

    #[test]
    fn shifted_digit_buys_ten() {
        let (mut game, _) = game(true);
        game.handle_input(&InputEvent::Key('@', Modifiers::NONE));
        assert_eq!(game.state.owned(1), 10);
    }

    #[test]
    fn unknown_card_click_is_not_consumed() {
        let (mut game, _) = game(true);
        assert!(!game.handle_input(&InputEvent::Click(BUY_ITEM_BASE + 50, Modifiers::NONE)));
    }

    #[test]
    fn failed_purchase_alerts_and_returns_false() {
        let (mut game, _) = game(true);
        game.state.balance = 100;
        assert!(!game.buy(0, 1));
        assert_eq!(game.state.balance, 100);
        let shown = game.dialogs.shown.borrow();
        assert_eq!(shown.len(), 1);
        assert!(shown[0].starts_with("Not enough money to buy 1 × CR7 Football!"));
    }

    #[test]
    fn declined_clear_keeps_receipt() {
        let (mut game, _) = game(false);
        game.buy(0, 1);
        assert!(!game.clear_receipt());
        assert_eq!(game.state.receipt.entries().len(), 1);
        assert_eq!(game.dialogs.shown.borrow()[0], CLEAR_RECEIPT_PROMPT);
    }

    #[test]
    fn clear_key_empties_receipt_after_confirm() {
        let (mut game, store) = game(true);
        game.buy(0, 1);
        game.handle_input(&InputEvent::Key('c', Modifiers::NONE));
        assert!(game.state.receipt.is_empty());

        let reloaded = ShopGame::load(store, ScriptedDialogs::answering(true));
        assert!(reloaded.state.receipt.is_empty());
        assert_eq!(reloaded.state.owned(0), 1);
    }

    #[test]
    fn declined_reset_changes_nothing() {
        let (mut game, store) = game(false);
        game.buy(0, 1);
        assert!(game.handle_input(&InputEvent::Click(RESET_GAME, Modifiers::NONE)));
        assert_eq!(game.dialogs.shown.borrow().as_slice(), [RESET_PROMPT]);
        assert_eq!(game.state.owned(0), 1);
        assert!(store.get(MONEY_KEY).unwrap().is_some());
    }

    #[test]
    fn confirmed_reset_starts_over() {
        let (mut game, store) = game(true);
        game.buy(2, 3);
        assert!(game.reset());
        assert_eq!(game.state.balance, DEFAULT_BALANCE);
        assert_eq!(game.state.owned(2), 0);
        assert_eq!(store.len(), 0);
        assert_eq!(game.state.viewport, Rect::new(0, 0, 100, 30));

        let reloaded = ShopGame::load(store, ScriptedDialogs::answering(true));
        assert_eq!(reloaded.state.balance, DEFAULT_BALANCE);
        assert!(reloaded.state.receipt.is_empty());
        assert!(reloaded.state.quantities.is_empty());
    }

    #[test]
    fn state_survives_reload() {
        let (mut game, store) = game(true);
        game.buy(3, 2);
        game.buy(3, 1);
        let balance = game.state.balance;

        let reloaded = ShopGame::load(store, ScriptedDialogs::answering(true));
        assert_eq!(reloaded.state.balance, balance);
        assert_eq!(reloaded.state.owned(3), 3);
        assert_eq!(reloaded.state.receipt, game.state.receipt);
    }

    #[test]
    fn ctrl_shortcuts_are_left_to_the_browser() {
        let (mut game, _) = game(true);
        game.buy(0, 1);
        assert!(!game.handle_input(&InputEvent::Key('c', ctrl())));
        assert!(!game.handle_input(&InputEvent::Key('r', ctrl())));
        assert!(!game.handle_input(&InputEvent::Key('-', ctrl())));
        assert!(game.dialogs.shown.borrow().is_empty());
        assert!(!game.state.panel.collapsed);
        assert_eq!(game.state.receipt.entries().len(), 1);
    }

    #[test]
    fn ctrl_digit_still_buys_hundred() {
        let (mut game, _) = game(true);
        assert!(game.handle_input(&InputEvent::Key('2', ctrl())));
        assert_eq!(game.state.owned(1), 100);
    }

    #[test]
    fn toggle_key_and_button_collapse_panel() {
        let (mut game, _) = game(true);
        game.handle_input(&InputEvent::Key('-', Modifiers::NONE));
        assert!(game.state.panel.collapsed);
        game.handle_input(&InputEvent::Click(RECEIPT_TOGGLE, Modifiers::NONE));
        assert!(!game.state.panel.collapsed);
    }

    #[test]
    fn clicks_inside_panel_are_swallowed() {
        let (mut game, _) = game(true);
        assert!(game.handle_input(&InputEvent::Click(RECEIPT_BODY, Modifiers::NONE)));
        assert!(game.state.receipt.is_empty());
    }

    #[test]
    fn dragging_moves_panel() {
        let (mut game, _) = game(true);
        let start = game.state.receipt_rect();
        game.handle_input(&InputEvent::Drag(DragPhase::Start {
            col: start.x + 4,
            row: start.y,
        }));
        game.handle_input(&InputEvent::Drag(DragPhase::Move { col: 10, row: 8 }));
        assert!(game.handle_input(&InputEvent::Drag(DragPhase::End)));

        let moved = game.state.receipt_rect();
        assert_eq!((moved.x, moved.y), (6, 8));
        assert!(!game.handle_input(&InputEvent::Drag(DragPhase::End)));
    }

    #[test]
    fn stray_drag_move_is_ignored() {
        let (mut game, _) = game(true);
        assert!(!game.handle_input(&InputEvent::Drag(DragPhase::Move { col: 1, row: 1 })));
        assert_eq!(game.state.panel.position, None);
    }

    #[test]
    fn tick_runs_balance_animation_to_completion() {
        let (mut game, _) = game(true);
        game.tick(1_000.0);
        game.buy(0, 1);
        assert_eq!(game.state.displayed_balance(), DEFAULT_BALANCE);

        for step in 1..=4 {
            game.tick(1_000.0 + step as f64 * 300.0);
        }
        assert_eq!(game.state.displayed_balance(), game.state.balance);
        assert!(game.state.money_anim.is_none());
    }

    #[test]
    fn receipt_timestamp_comes_from_frame_clock() {
        let (mut game, _) = game(true);
        game.tick(1_700_000_000_000.0);
        game.buy(0, 1);
        assert_eq!(game.state.receipt.entries()[0].timestamp, 1_700_000_000_000.0);
    }
}
