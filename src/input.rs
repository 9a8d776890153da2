//! Input handling: coordinate conversion, click targets, and event types.
//!
//! Keyboard, mouse and touch all end up as an [`InputEvent`]. The shop decides
//! what each action ID means.

use ratzilla::ratatui::layout::Rect;

/// Modifier keys held while a buy control is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };

    /// How many units one activation buys: 1, 10 with Shift, 100 with Ctrl.
    /// Ctrl wins when both are held.
    pub fn purchase_quantity(self) -> u64 {
        if self.ctrl {
            100
        } else if self.shift {
            10
        } else {
            1
        }
    }
}

/// Phases of a pointer drag (mouse or single-finger touch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Start { col: u16, row: u16 },
    Move { col: u16, row: u16 },
    End,
}

/// All possible input events, normalized from keyboard, mouse, and touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press from keyboard.
    Key(char, Modifiers),
    /// A click/tap on a registered target, identified by a semantic action ID.
    Click(u16, Modifiers),
    /// Pointer drag in terminal cell coordinates.
    Drag(DragPhase),
}

/// A region on screen that can be tapped/clicked to trigger an action.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// The rectangular region (in terminal cell coordinates) for hit testing.
    pub rect: Rect,
    pub action_id: u16,
}

/// Shared state between the render loop and the pointer handlers.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    /// Register a click target with a rectangular hit region and a semantic action ID.
    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-row click target at the given row within an area.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.targets.push(ClickTarget {
                rect: Rect::new(area.x, row, area.width, 1),
                action_id,
            });
        }
    }

    /// Hit-test a terminal cell coordinate against all registered targets.
    /// When targets overlap the last registered one wins, the same way a
    /// later-drawn overlay sits on top of what is under it.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            if col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height {
                Some(t.action_id)
            } else {
                None
            }
        })
    }

    /// Turn a pointer press into an event: a drag start when it lands on
    /// `drag_handle`, a click on any other target, nothing on empty space.
    pub fn resolve_press(
        &self,
        col: u16,
        row: u16,
        mods: Modifiers,
        drag_handle: u16,
    ) -> Option<InputEvent> {
        match self.hit_test(col, row)? {
            id if id == drag_handle => Some(InputEvent::Drag(DragPhase::Start { col, row })),
            id => Some(InputEvent::Click(id, mods)),
        }
    }
}

/// Determine whether a screen width (in columns) should use narrow layout.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Convert a pixel Y coordinate to a terminal row index.
///
/// `click_y` is relative to the grid container's top edge.
/// Returns `None` if the click is outside the grid or inputs are invalid.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    if grid_height <= 0.0 || terminal_rows == 0 || click_y < 0.0 {
        return None;
    }

    let cell_height = grid_height / terminal_rows as f64;
    let row = (click_y / cell_height) as u16;

    if row >= terminal_rows {
        return None;
    }

    Some(row)
}

/// Convert a pixel X coordinate to a terminal column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    if grid_width <= 0.0 || terminal_cols == 0 || click_x < 0.0 {
        return None;
    }
    let cell_width = grid_width / terminal_cols as f64;
    let col = (click_x / cell_width) as u16;
    if col >= terminal_cols { None } else { Some(col) }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ───────────────────────────────────────────────────

    #[test]
    fn plain_click_buys_one() {
        assert_eq!(Modifiers::NONE.purchase_quantity(), 1);
    }

    #[test]
    fn shift_buys_ten_ctrl_buys_hundred() {
        let shift = Modifiers { shift: true, ctrl: false };
        let ctrl = Modifiers { shift: false, ctrl: true };
        assert_eq!(shift.purchase_quantity(), 10);
        assert_eq!(ctrl.purchase_quantity(), 100);
    }

    #[test]
    fn ctrl_wins_over_shift() {
        let both = Modifiers { shift: true, ctrl: true };
        assert_eq!(both.purchase_quantity(), 100);
    }

    // ── hit_test tests ──────────────────────────────────────────────

    #[test]
    fn hit_test_basic() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);

        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
    }

    #[test]
    fn hit_test_miss_returns_none() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);

        assert_eq!(cs.hit_test(5, 9), None);
        assert_eq!(cs.hit_test(5, 11), None);
    }

    #[test]
    fn hit_test_column_precision() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 10, 1), 1);
        cs.add_click_target(Rect::new(10, 5, 10, 1), 2);

        assert_eq!(cs.hit_test(9, 5), Some(1));
        assert_eq!(cs.hit_test(10, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), None);
    }

    #[test]
    fn hit_test_overlay_registered_last_wins() {
        let mut cs = ClickState::new();
        // Shop card row underneath
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        // Receipt panel drawn on top of it
        cs.add_click_target(Rect::new(50, 3, 30, 6), 2);

        assert_eq!(cs.hit_test(60, 5), Some(2));
        assert_eq!(cs.hit_test(10, 5), Some(1));
    }

    #[test]
    fn hit_test_empty() {
        let cs = ClickState::new();
        assert_eq!(cs.hit_test(0, 0), None);
    }

    // ── add_row_target tests ──────────────────────────────────────

    #[test]
    fn add_row_target_within_area() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 12, 99);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(15, 12), Some(99));
    }

    #[test]
    fn add_row_target_outside_area_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 99);
        cs.add_row_target(area, 15, 98);

        assert_eq!(cs.targets.len(), 0);
    }

    #[test]
    fn click_state_clear() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 2, 80, 1), 2);
        assert_eq!(cs.targets.len(), 2);

        cs.clear_targets();
        assert_eq!(cs.targets.len(), 0);
        assert_eq!(cs.hit_test(0, 1), None);
    }

    // ── resolve_press ──────────────────────────────────────────────

    #[test]
    fn press_on_handle_starts_drag() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(40, 2, 30, 1), 7);
        let ev = cs.resolve_press(45, 2, Modifiers::NONE, 7);
        assert_eq!(ev, Some(InputEvent::Drag(DragPhase::Start { col: 45, row: 2 })));
    }

    #[test]
    fn press_on_button_is_click_with_modifiers() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 4, 40, 1), 100);
        let mods = Modifiers { shift: true, ctrl: false };
        assert_eq!(
            cs.resolve_press(3, 4, mods, 7),
            Some(InputEvent::Click(100, mods))
        );
    }

    #[test]
    fn press_on_empty_space_is_ignored() {
        let cs = ClickState::new();
        assert_eq!(cs.resolve_press(3, 4, Modifiers::NONE, 7), None);
    }

    // ── Layout responsive tests ────────────────────────────────────

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(30));
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
        assert!(!is_narrow_layout(80));
    }

    // ── pixel coordinate conversion tests ──────────────────────────

    #[test]
    fn pixel_to_row_basic() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(14.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
    }

    #[test]
    fn pixel_to_row_out_of_bounds() {
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 450.0, 0), None);
    }

    #[test]
    fn pixel_x_to_col_basic() {
        assert_eq!(pixel_x_to_col(0.0, 800.0, 80), Some(0));
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(799.0, 800.0, 80), Some(79));
    }

    #[test]
    fn pixel_x_to_col_out_of_bounds() {
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
        assert_eq!(pixel_x_to_col(-1.0, 800.0, 80), None);
    }

    #[test]
    fn full_click_pipeline() {
        let mut cs = ClickState::new();
        cs.terminal_cols = 80;
        cs.terminal_rows = 30;
        cs.add_click_target(Rect::new(0, 11, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 12, 80, 1), 2);

        let grid_height = 450.0;
        let grid_width = 800.0;
        let cell_height = grid_height / 30.0;

        let row = pixel_y_to_row(12.0 * cell_height + 7.0, grid_height, cs.terminal_rows).unwrap();
        let col = pixel_x_to_col(405.0, grid_width, cs.terminal_cols).unwrap();
        assert_eq!((col, row), (40, 12));
        assert_eq!(cs.hit_test(col, row), Some(2));
    }
}
