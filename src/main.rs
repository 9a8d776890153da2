mod dialog;
mod input;
mod logging;
mod shop;
mod storage;
mod time;
mod touch;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use dialog::BrowserDialogs;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, DragPhase, InputEvent, Modifiers};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use shop::actions::RECEIPT_HANDLE;
use shop::ShopGame;
use storage::{BrowserStorage, KeyValueStore, MemoryStorage};

type Shop = ShopGame<Rc<dyn KeyValueStore>, BrowserDialogs>;

/// Query the grid container's bounding rect and convert client pixel
/// coordinates to a terminal cell.
pub(crate) fn dom_pixel_to_cell(client_x: f64, client_y: f64, cs: &ClickState) -> Option<(u16, u16)> {
    if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
        return None;
    }
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(client_x - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(client_y - rect.top(), rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

/// localStorage, or an in-memory store when the browser refuses it
/// (private mode, disabled storage). Progress then lasts one visit.
fn open_store() -> Rc<dyn KeyValueStore> {
    match BrowserStorage::open() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            log::warn!("{e}; progress will not be saved");
            Rc::new(MemoryStorage::new())
        }
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);

    let game: Rc<RefCell<Shop>> = Rc::new(RefCell::new(ShopGame::load(open_store(), BrowserDialogs)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse: press on a target clicks it (or grabs the receipt), moves and
    // releases continue a drag.
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            let event = match mouse_event.event {
                MouseEventKind::Pressed if mouse_event.button == MouseButton::Left => {
                    let cs = click_state.borrow();
                    let Some((col, row)) =
                        dom_pixel_to_cell(mouse_event.x as f64, mouse_event.y as f64, &cs)
                    else {
                        return;
                    };
                    let mods = Modifiers {
                        shift: mouse_event.shift,
                        ctrl: mouse_event.ctrl,
                    };
                    match cs.resolve_press(col, row, mods, RECEIPT_HANDLE) {
                        Some(event) => event,
                        None => return,
                    }
                }
                MouseEventKind::Moved if game.borrow().state.panel.is_dragging() => {
                    let cs = click_state.borrow();
                    match dom_pixel_to_cell(mouse_event.x as f64, mouse_event.y as f64, &cs) {
                        Some((col, row)) => InputEvent::Drag(DragPhase::Move { col, row }),
                        None => return,
                    }
                }
                MouseEventKind::Released => InputEvent::Drag(DragPhase::End),
                _ => return,
            };
            game.borrow_mut().handle_input(&event);
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                let mods = Modifiers {
                    shift: key_event.shift,
                    ctrl: key_event.ctrl,
                };
                game.borrow_mut().handle_input(&InputEvent::Key(c, mods));
            }
        }
    });

    touch::install(game.clone(), click_state.clone());

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            let mut shop = game.borrow_mut();
            shop.tick(js_sys::Date::now());
            shop.resize(size);
            shop.render(f, size, &click_state);
        }
    });

    Ok(())
}
