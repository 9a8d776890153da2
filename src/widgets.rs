//! Reusable clickable UI components.
//!
//! Each component renders itself and registers its click targets in the same
//! call, so what is drawn and what is clickable cannot drift apart.
//!
//! # Components
//!
//! - [`ButtonBar`]: a row of inline `[X] label` buttons.
//! - [`ClickableList`]: vertical list with per-row click targets.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::Style;
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::Paragraph;
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── ButtonBar ──────────────────────────────────────────────────

/// A single-row strip of buttons, optionally preceded by a plain title.
///
/// Each button's click target covers exactly the cells its label occupies
/// (display width, so `«`, `−` and emoji are measured correctly).
///
/// # Example
/// ```ignore
/// ButtonBar::new()
///     .title(" Receipt ", title_style)
///     .button("[-]", key_style, RECEIPT_TOGGLE)
///     .render(f, area, &mut cs);
/// ```
pub struct ButtonBar {
    title: Option<(String, Style)>,
    buttons: Vec<(String, Style, u16)>,
    gap: u16,
}

impl ButtonBar {
    pub fn new() -> Self {
        Self {
            title: None,
            buttons: Vec::new(),
            gap: 1,
        }
    }

    pub fn title(mut self, text: impl Into<String>, style: Style) -> Self {
        self.title = Some((text.into(), style));
        self
    }

    pub fn button(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.buttons.push((label.into(), style, action_id));
        self
    }

    /// Column offsets (relative to the bar) and widths of every button.
    fn layout(&self, width: u16) -> Vec<(u16, u16, u16)> {
        let title_width = self
            .title
            .as_ref()
            .map_or(0, |(t, _)| Line::from(t.as_str()).width() as u16);
        let buttons_width: u16 = self
            .buttons
            .iter()
            .map(|(label, _, _)| Line::from(label.as_str()).width() as u16)
            .sum::<u16>()
            + self.gap * self.buttons.len().saturating_sub(1) as u16;

        // Buttons are right-aligned; the title keeps the left edge.
        let mut cursor = width.saturating_sub(buttons_width).max(title_width);
        let mut placed = Vec::with_capacity(self.buttons.len());
        for (label, _, action_id) in &self.buttons {
            let w = Line::from(label.as_str()).width() as u16;
            if cursor >= width {
                break;
            }
            placed.push((cursor, w.min(width - cursor), *action_id));
            cursor += w + self.gap;
        }
        placed
    }

    /// Render the bar into a one-row `area` and register button targets.
    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let placed = self.layout(area.width);

        let mut spans: Vec<Span> = Vec::new();
        let mut col = 0u16;
        if let Some((text, style)) = &self.title {
            spans.push(Span::styled(text.clone(), *style));
            col = Line::from(text.as_str()).width() as u16;
        }
        for ((label, style, _), (x, _, _)) in self.buttons.iter().zip(&placed) {
            if *x > col {
                spans.push(Span::raw(" ".repeat((*x - col) as usize)));
            }
            spans.push(Span::styled(label.clone(), *style));
            col = *x + Line::from(label.as_str()).width() as u16;
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);

        for (x, w, action_id) in placed {
            cs.add_click_target(Rect::new(area.x + x, area.y, w, 1), action_id);
        }
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// A builder that pairs rendered [`Line`]s with click actions.
///
/// Annotate lines as clickable while adding them, then call
/// [`register_targets`](ClickableList::register_targets) once to register
/// every target at the row it actually ends up on.
///
/// # Example
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Header (not clickable)"));
/// cl.push_clickable(Line::from("Buy item"), BUY_ITEM_BASE);
/// cl.register_targets(area, &mut cs, 1, 1, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Add a non-clickable line.
    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    /// Add a clickable line with a semantic action ID.
    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        let idx = self.lines.len() as u16;
        self.actions.push((idx, action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register click targets for all clickable lines. One logical line is
    /// one row; lines scrolled out of view or clipped by the bottom edge
    /// get no target.
    ///
    /// * `top_offset`: rows before content (1 for a top border).
    /// * `bottom_offset`: rows after content (1 for a bottom border).
    /// * `scroll`: vertical scroll offset in rows.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);

        for &(line_idx, action_id) in &self.actions {
            if line_idx < scroll {
                continue;
            }
            let row = content_y + (line_idx - scroll);
            if row >= content_end {
                continue;
            }
            cs.add_row_target(area, row, action_id);
        }
    }
}
