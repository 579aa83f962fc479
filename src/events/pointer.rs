use crate::constants::{BUTTON_PRIMARY, BUTTON_SECONDARY, CLICK_SLOP_PX};
use crate::core::{screen_ray, AppState, Ray};
use crate::dom;
use crate::input::{self, DragMode, DragState};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub state: Rc<RefCell<AppState>>,
    pub drag: Rc<RefCell<DragState>>,
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointermove(&w);
    wire_pointerdown(&w);
    wire_pointerup(&w);
    wire_pointerleave(&w);
    wire_wheel(&w);
    wire_contextmenu(&w);
}

fn pointer_ray(state: &AppState, ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Ray {
    screen_ray(&state.camera, input::pointer_canvas_ndc(ev, canvas))
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    target: &web::EventTarget,
    name: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if target
        .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())
        .is_err()
    {
        log::warn!("[input] could not listen for {}", name);
    }
    closure.forget();
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    listen(&target, "pointermove", move |ev: web::PointerEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let mut drag = w.drag.borrow_mut();
        let mut guard = w.state.borrow_mut();
        let state = &mut *guard;

        if drag.is_active() && ev.pointer_id() == drag.pointer_id {
            let delta = drag.advance(pos);
            let h = w.canvas.get_bounding_client_rect().height() as f32;
            match drag.mode {
                DragMode::Rotate => state.controls.rotate_by_pixels(delta.x, delta.y, h),
                DragMode::Pan => state.controls.pan_by_pixels(delta.x, delta.y, &state.camera, h),
                DragMode::None => {}
            }
            return;
        }

        let ray = pointer_ray(state, &ev, &w.canvas);
        let hovered = state.pointer_move(&ray);
        dom::set_cursor(&w.canvas, if hovered.is_some() { "pointer" } else { "grab" });
    });
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    listen(&target, "pointerdown", move |ev: web::PointerEvent| {
        let mode = match ev.button() {
            BUTTON_PRIMARY => DragMode::Rotate,
            BUTTON_SECONDARY => DragMode::Pan,
            _ => return,
        };
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        w.drag.borrow_mut().begin(mode, ev.pointer_id(), pos);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
        if mode == DragMode::Rotate && w.state.borrow().entities.hovered().is_none() {
            dom::set_cursor(&w.canvas, "grabbing");
        }
        log::debug!("[mouse] {:?} begin at ({:.0},{:.0})", mode, pos.x, pos.y);
        ev.prevent_default();
    });
}

fn wire_pointerup(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    listen(&target, "pointerup", move |ev: web::PointerEvent| {
        let (mode, was_click) = {
            let mut drag = w.drag.borrow_mut();
            if !drag.is_active() || ev.pointer_id() != drag.pointer_id {
                return;
            }
            let pos = input::pointer_canvas_px(&ev, &w.canvas);
            drag.advance(pos);
            (drag.end(), drag.is_click(CLICK_SLOP_PX))
        };
        _ = w.canvas.release_pointer_capture(ev.pointer_id());

        if mode == DragMode::Rotate && was_click {
            let mut state = w.state.borrow_mut();
            let ray = pointer_ray(&state, &ev, &w.canvas);
            if let Some(action) = state.click(&ray) {
                log::debug!("[mouse] click dispatched {:?}", action);
            }
        }
        let hovered = w.state.borrow().entities.hovered();
        dom::set_cursor(&w.canvas, if hovered.is_some() { "pointer" } else { "grab" });
        ev.prevent_default();
    });
}

fn wire_pointerleave(w: &InputWiring) {
    let w = w.clone();
    let target = w.canvas.clone();
    listen(&target, "pointerleave", move |_ev: web::PointerEvent| {
        if w.drag.borrow().is_active() {
            return;
        }
        w.state.borrow_mut().pointer_leave();
        dom::set_cursor(&w.canvas, "grab");
    });
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let state = w.state.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        state.borrow_mut().controls.dolly(ev.delta_y() as f32);
    }) as Box<dyn FnMut(_)>);
    // Non-passive so the page does not scroll under the canvas
    let options = web::AddEventListenerOptions::new();
    options.set_passive(false);
    _ = w
        .canvas
        .add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &options,
        );
    closure.forget();
}

fn wire_contextmenu(w: &InputWiring) {
    let target = w.canvas.clone();
    listen(&target, "contextmenu", |ev: web::MouseEvent| {
        ev.prevent_default();
    });
}
