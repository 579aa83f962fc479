#![cfg(target_arch = "wasm32")]
use crate::constants::{CANVAS_ID, DIALOG_CLOSE_ID};
use crate::core::{parse_glb, AppState, AssetLoadError, ModelScene, ViewerConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod fetch;
mod frame;
mod input;
mod overlay;
mod render;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

/// Page settings from the canvas `data-*` attributes, before logging is up.
fn read_config() -> ViewerConfig {
    let canvas = dom::window_document().and_then(|d| d.get_element_by_id(CANVAS_ID));
    let attr = |name: &str| canvas.as_ref().and_then(|c| c.get_attribute(name));
    ViewerConfig::from_attributes(
        attr("data-model-url").as_deref(),
        attr("data-log-level").as_deref(),
    )
}

fn wire_dialog(document: &web::Document, state: &Rc<RefCell<AppState>>) {
    overlay::mount_dialog(document);
    let state_close = state.clone();
    dom::add_click_listener(document, DIALOG_CLOSE_ID, move || {
        state_close.borrow_mut().close_dialog();
    });
}

async fn load_model(url: &str) -> Result<ModelScene, AssetLoadError> {
    log::info!("[asset] fetching {}", url);
    let bytes = fetch::fetch_bytes(url).await?;
    log::info!("[asset] received {} bytes", bytes.len());
    parse_glb(&bytes)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let config = read_config();
    console_log::init_with_level(config.log_level).ok();
    log::info!("fortress-web starting");

    spawn_local(async move {
        if let Err(e) = init(config).await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init(config: ViewerConfig) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);
    dom::set_cursor(&canvas, "grab");

    let aspect = canvas.width().max(1) as f32 / canvas.height().max(1) as f32;
    let state = Rc::new(RefCell::new(AppState::new(aspect)));
    wire_dialog(&document, &state);

    // One load attempt; the scene renders without the model until it settles
    {
        let state = state.clone();
        let url = config.model_url.clone();
        spawn_local(async move {
            let result = load_model(&url).await;
            state.borrow_mut().finish_asset_load(result);
        });
    }

    events::wire_global_keydown(state.clone());
    events::wire_input_handlers(events::InputWiring {
        canvas: canvas.clone(),
        state: state.clone(),
        drag: Rc::new(RefCell::new(input::DragState::default())),
    });

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        state,
        gpu,
        canvas,
        document,
        started: Instant::now(),
        dialog_shown: false,
        model_uploaded: false,
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
