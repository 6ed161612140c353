use crate::audio::WebAudio;
use crate::constants::*;
use crate::dom;
use crate::frame::{self, FrameContext, SharedScene};
use crate::overlay::SpectrumOverlay;
use crate::playback::AudioGate;
use crate::render::{GpuState, SceneRenderer};
use cosmos_core::{
    resolve, Asset, DeviceClass, FrameOrchestrator, PlaybackState, Pointer, SetupError, Trigger,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cosmos-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

fn device_class(window: &web::Window) -> DeviceClass {
    if let Some(name) = dom::query_param(window, QUALITY_QUERY_KEY) {
        match DeviceClass::from_name(&name) {
            Some(class) => {
                log::info!("[quality] forced {:?} by query", class);
                return class;
            }
            None => log::warn!("[quality] unknown override {:?}; classifying", name),
        }
    }
    let (width, _) = dom::viewport_size(window);
    DeviceClass::classify(width as u32, &dom::user_agent(window))
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(SCENE_CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", SCENE_CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    let profile = resolve(device_class(&window));
    let pixel_ratio = profile.pixel_ratio_for(window.device_pixel_ratio() as f32) as f64;
    dom::sync_canvas_backing_size(&canvas, pixel_ratio);

    let gpu = GpuState::new(&canvas)
        .await
        .map_err(|e| SetupError::RenderUnavailable(e.to_string()))?;
    let mut orchestrator =
        FrameOrchestrator::new(profile.clone(), SceneRenderer::new(gpu), rand::random())?;
    // The ship is drawn from renderer-side sprites, available once the GPU is.
    orchestrator.mark_asset_ready(Asset::ShipModel);
    let scene: SharedScene = Rc::new(RefCell::new(orchestrator));

    wire_play_button(&document, scene.clone(), profile.fft_size);

    {
        let scene = scene.clone();
        dom::add_event_listener(&document, "click", move |_ev: web::MouseEvent| {
            scene.borrow_mut().trigger(Trigger::Click);
        });
    }
    {
        let scene = scene.clone();
        let window = window.clone();
        dom::add_event_listener(&document, "pointermove", move |ev: web::PointerEvent| {
            let (w, h) = dom::viewport_size(&window);
            let (x, y) = (ev.client_x() as f32, ev.client_y() as f32);
            let pointer = Pointer::from_client(x, y, w as f32, h as f32);
            scene.borrow_mut().set_pointer(pointer);
        });
    }

    let overlay = document
        .get_element_by_id(OVERLAY_CANVAS_ID)
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
        .and_then(|c| SpectrumOverlay::new(c, profile.overlay_bar_cap));
    if overlay.is_none() {
        log::warn!("[overlay] #{} unavailable; 2D bars disabled", OVERLAY_CANVAS_ID);
    }

    let frame_ctx = Rc::new(RefCell::new(FrameContext {
        scene: scene.clone(),
        canvas,
        overlay,
        pixel_ratio,
        last_instant: Instant::now(),
        last_state: PlaybackState::Idle,
    }));
    let handle = frame::start_loop(frame_ctx);

    // Tear everything down when the page goes away.
    let mut handle = Some(handle);
    dom::add_event_listener(&window, "pagehide", move |_ev: web::Event| {
        if let Some(h) = handle.take() {
            h.cancel();
        }
        scene.borrow_mut().teardown();
    });
    Ok(())
}

fn wire_play_button(document: &web::Document, scene: SharedScene, fft_size: u32) {
    let Some(element) = document
        .get_element_by_id(AUDIO_ELEMENT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlAudioElement>().ok())
    else {
        log::warn!("[audio] #{} missing; scene stays passive", AUDIO_ELEMENT_ID);
        return;
    };
    dom::set_style(document, PLAY_BUTTON_ID, "display:block");

    let doc = document.clone();
    let mut gate = AudioGate::default();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        let mut scene = scene.borrow_mut();
        // The context is created on the first gesture so browsers allow it to start.
        let ready = gate.ensure(|| {
            let audio = WebAudio::attach(element.clone(), fft_size)?;
            scene.attach_audio(Box::new(audio));
            Ok::<(), SetupError>(())
        });
        if !ready {
            dom::set_text(&doc, PLAY_BUTTON_ID, AUDIO_FAILED_LABEL);
            dom::set_disabled(&doc, PLAY_BUTTON_ID);
            return;
        }
        match scene.toggle() {
            Ok(PlaybackState::Idle) => dom::set_text(&doc, PLAY_BUTTON_ID, PLAY_LABEL),
            // A suspended context is still resuming after the play request.
            Ok(_) => {
                dom::set_text(&doc, PLAY_BUTTON_ID, PAUSE_LABEL);
                dom::set_style(&doc, HEADING_ID, "display:block");
                dom::set_style(&doc, OVERLAY_CONTAINER_ID, "display:block");
            }
            Err(e) => log::warn!("[audio] {}", e),
        }
    });
}
