//! CR7 Shop rendering: balance bar, shop cards, help bar and the floating
//! receipt overlay.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ButtonBar, ClickableList};

use super::actions::*;
use super::format::format_money;
use super::receipt::{Receipt, ENTRY_ROWS};
use super::state::ShopState;

const MULTI_BUY_HELP: &str = "Click = 1 · Shift+Click = 10 · Ctrl+Click = 100";
const MULTI_BUY_HELP_SHORT: &str = "Shift ×10 · Ctrl ×100";

pub fn render(state: &ShopState, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .split(area);

    render_balance(state, f, chunks[0]);
    render_cards(state, f, chunks[1], click_state);
    render_help(f, chunks[2], click_state);

    // Overlay last: drawn on top, and its targets win the hit test.
    render_receipt(state, f, click_state);
}

fn render_balance(state: &ShopState, f: &mut Frame, area: Rect) {
    let style = if state.insufficient.is_active() {
        Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD)
    } else if state.money_anim.is_some() {
        Style::default()
            .fg(Color::LightYellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let text = format!(" {}$ ", format_money(state.displayed_balance()));
    let widget = Paragraph::new(Line::from(Span::styled(text, style)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" CR7 Shop "),
        )
        .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_cards(
    state: &ShopState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let narrow = is_narrow_layout(area.width);
    let name_width = state
        .items
        .iter()
        .map(|item| Line::from(item.label).width())
        .max()
        .unwrap_or(0);

    let mut cl = ClickableList::new();
    for (idx, item) in state.items.iter().enumerate() {
        let action = BUY_ITEM_BASE + idx as u16;
        let key = Span::styled(
            format!(" [{}] ", idx + 1),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let affordable = item.price <= state.balance;
        let price = Span::styled(
            item.price_label(),
            if affordable {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        );
        let owned = owned_span(state, idx);

        if narrow {
            cl.push_clickable(
                Line::from(vec![key, Span::styled(item.label, Style::default().fg(Color::White))]),
                action,
            );
            cl.push_clickable(
                Line::from(vec![Span::raw("     "), price, Span::raw("  "), owned]),
                action,
            );
        } else {
            let pad = name_width.saturating_sub(Line::from(item.label).width()) + 2;
            cl.push_clickable(
                Line::from(vec![
                    key,
                    Span::styled(item.label, Style::default().fg(Color::White)),
                    Span::raw(" ".repeat(pad)),
                    price,
                    Span::raw("  "),
                    owned,
                ]),
                action,
            );
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" ▶ Shop (tap to buy) ");

    let mut cs = click_state.borrow_mut();
    cl.register_targets(area, &mut cs, 1, 1, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

/// Owned counter for one card; highlighted while its purchase pulse runs.
fn owned_span(state: &ShopState, idx: usize) -> Span<'static> {
    let pulsing = state
        .quantity_pulse
        .get(idx)
        .is_some_and(|pulse| pulse.is_active());
    let style = if pulsing {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("owned: {}", format_money(state.owned(idx))), style)
}

fn render_help(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let help = if is_narrow_layout(area.width) {
        MULTI_BUY_HELP_SHORT
    } else {
        MULTI_BUY_HELP
    };
    let mut cs = click_state.borrow_mut();
    ButtonBar::new()
        .title(format!(" {help}"), Style::default().fg(Color::DarkGray))
        .button(
            "[R] Reset",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            RESET_GAME,
        )
        .render(f, inner, &mut cs);
}

fn render_receipt(state: &ShopState, f: &mut Frame, click_state: &Rc<RefCell<ClickState>>) {
    let rect = state.receipt_rect();
    if rect.width < 3 || rect.height < 3 {
        return;
    }

    let border = if state.panel.is_dragging() {
        Color::Cyan
    } else {
        Color::Yellow
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let mut cs = click_state.borrow_mut();
    cs.add_click_target(rect, RECEIPT_BODY);
    // Top border plus the header row grab the panel.
    cs.add_click_target(Rect::new(rect.x, rect.y, rect.width, 2), RECEIPT_HANDLE);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let toggle = if state.panel.collapsed { "[+]" } else { "[-]" };
    ButtonBar::new()
        .title(
            " Receipt",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .button(toggle, key_style, RECEIPT_TOGGLE)
        .button("[C]", key_style, RECEIPT_CLEAR)
        .render(f, Rect::new(inner.x, inner.y, inner.width, 1), &mut cs);

    if state.panel.collapsed || inner.height < 3 {
        return;
    }
    let receipt = &state.receipt;

    let stats = format!(
        " {} purchases · {} items",
        format_money(receipt.total_purchases()),
        format_money(receipt.total_items())
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(stats, Style::default().fg(Color::Gray)))),
        Rect::new(inner.x, inner.y + 1, inner.width, 1),
    );

    let total = format!(" Total: {}$", format_money(receipt.total_spent()));
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            total,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))),
        Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1),
    );

    let list_area = Rect::new(inner.x, inner.y + 2, inner.width, inner.height - 3);
    if list_area.height == 0 {
        return;
    }
    if receipt.is_empty() {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                " No purchases yet",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))),
            list_area,
        );
        return;
    }

    let scroll = entry_scroll(receipt, state.panel.focus, list_area.width, list_area.height);
    let entries = Paragraph::new(entry_lines(receipt))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(entries, list_area);
}

/// Two lines per receipt entry: the name, then quantity, unit price and
/// entry total.
fn entry_lines(receipt: &Receipt) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(receipt.entries().len() * ENTRY_ROWS as usize);
    for entry in receipt.entries() {
        lines.push(Line::from(Span::styled(
            format!(" {}", entry.name),
            Style::default().fg(Color::White),
        )));
        lines.push(Line::from(vec![
            Span::styled(
                format!("   {} pcs × {}$", format_money(entry.quantity), format_money(entry.price)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                format!("  = {}$", format_money(entry.total_price)),
                Style::default().fg(Color::Green),
            ),
        ]));
    }
    lines
}

/// Vertical scroll that brings the focused entry fully into view, measured
/// in wrapped rows at `width`.
fn entry_scroll(receipt: &Receipt, focus: Option<usize>, width: u16, height: u16) -> u16 {
    let Some(focus) = focus else {
        return 0;
    };
    let lines = entry_lines(receipt);
    let end = ((focus + 1) * ENTRY_ROWS as usize).min(lines.len());
    let rows = Paragraph::new(lines[..end].to_vec())
        .wrap(Wrap { trim: false })
        .line_count(width);
    rows.saturating_sub(height as usize) as u16
}
