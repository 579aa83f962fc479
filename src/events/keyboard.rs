use crate::core::AppState;
use crate::input::{command_for_key, KeyCommand};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_global_keydown(state: Rc<RefCell<AppState>>) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let Some(command) = command_for_key(&ev.key()) else {
            return;
        };
        match command {
            KeyCommand::CloseDialog => {
                let mut s = state.borrow_mut();
                if s.dialog_open {
                    log::info!("[keys] escape");
                    s.close_dialog();
                    ev.prevent_default();
                }
            }
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
