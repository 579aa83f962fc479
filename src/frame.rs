use crate::core::AppState;
use crate::overlay;
use crate::render;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub state: Rc<RefCell<AppState>>,
    pub gpu: Option<render::GpuState<'a>>,

    pub canvas: web::HtmlCanvasElement,
    pub document: web::Document,

    pub started: Instant,
    // What the DOM currently shows; synced from `AppState::dialog_open`
    pub dialog_shown: bool,
    pub model_uploaded: bool,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let elapsed = self.started.elapsed().as_secs_f32();
        let w = self.canvas.width();
        let h = self.canvas.height();

        let mut state = self.state.borrow_mut();
        if h > 0 {
            state.set_aspect(w as f32 / h as f32);
        }
        let update = state.tick(elapsed);

        if let Some(readout) = update.readout {
            overlay::update_readout(&self.document, &readout);
            log::debug!("[camera] {}", readout);
        }
        if state.dialog_open != self.dialog_shown {
            overlay::set_dialog_visible(&self.document, state.dialog_open);
            self.dialog_shown = state.dialog_open;
        }

        if let Some(g) = &mut self.gpu {
            if !self.model_uploaded {
                if let Some(model) = state.asset.model() {
                    g.upload_model(model);
                    self.model_uploaded = true;
                }
            }
            let scene = state.build_scene().flatten();
            g.resize_if_needed(w, h);
            if let Err(e) = g.render(&state.camera, &scene) {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
