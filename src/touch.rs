//! Touch drag for the receipt panel.
//!
//! ratzilla only reports mouse events, and a browser turns a tap into a
//! synthetic click on its own, so buy buttons already work on touch screens.
//! Dragging does not: a finger moving over the page scrolls it. These
//! document-level listeners catch a touch that starts on the panel handle
//! and turn it into [`DragPhase`] events, suppressing the scroll and the
//! synthetic click for that gesture only.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, TouchEvent};

use crate::dialog::Dialogs;
use crate::input::{ClickState, DragPhase, InputEvent, Modifiers};
use crate::shop::actions::RECEIPT_HANDLE;
use crate::shop::ShopGame;
use crate::storage::KeyValueStore;

/// Cell under the first finger of `ev`, if it lies on the grid.
fn first_touch_cell(ev: &TouchEvent, cs: &ClickState) -> Option<(u16, u16)> {
    if ev.touches().length() != 1 {
        return None;
    }
    let touch = ev.touches().get(0)?;
    crate::dom_pixel_to_cell(touch.client_x() as f64, touch.client_y() as f64, cs)
}

/// Register touchstart/touchmove/touchend on the document. The closures are
/// leaked; they live as long as the page.
pub fn install<S, D>(game: Rc<RefCell<ShopGame<S, D>>>, click_state: Rc<RefCell<ClickState>>)
where
    S: KeyValueStore + 'static,
    D: Dialogs + 'static,
{
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::warn!("no document, touch drag disabled");
        return;
    };

    // Non-passive so preventDefault() can stop the page from scrolling.
    let options = AddEventListenerOptions::new();
    options.set_passive(false);

    let on_start = Closure::<dyn FnMut(TouchEvent)>::new({
        let game = game.clone();
        let click_state = click_state.clone();
        move |ev: TouchEvent| {
            let cs = click_state.borrow();
            let Some((col, row)) = first_touch_cell(&ev, &cs) else {
                return;
            };
            let Some(event) = cs.resolve_press(col, row, Modifiers::NONE, RECEIPT_HANDLE) else {
                return;
            };
            drop(cs);
            if matches!(event, InputEvent::Drag(DragPhase::Start { .. })) {
                ev.prevent_default();
                game.borrow_mut().handle_input(&event);
            }
        }
    });

    let on_move = Closure::<dyn FnMut(TouchEvent)>::new({
        let game = game.clone();
        let click_state = click_state.clone();
        move |ev: TouchEvent| {
            if !game.borrow().state.panel.is_dragging() {
                return;
            }
            ev.prevent_default();
            let cell = first_touch_cell(&ev, &click_state.borrow());
            if let Some((col, row)) = cell {
                game.borrow_mut()
                    .handle_input(&InputEvent::Drag(DragPhase::Move { col, row }));
            }
        }
    });

    let on_end = Closure::<dyn FnMut(TouchEvent)>::new(move |ev: TouchEvent| {
        let mut game = game.borrow_mut();
        if game.state.panel.is_dragging() {
            ev.prevent_default();
            game.handle_input(&InputEvent::Drag(DragPhase::End));
        }
    });

    let listeners: [(&str, &Closure<dyn FnMut(TouchEvent)>); 4] = [
        ("touchstart", &on_start),
        ("touchmove", &on_move),
        ("touchend", &on_end),
        ("touchcancel", &on_end),
    ];
    for (kind, callback) in listeners {
        let added = document.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        );
        if added.is_err() {
            log::warn!("could not listen for {kind}");
        }
    }

    on_start.forget();
    on_move.forget();
    on_end.forget();
}
