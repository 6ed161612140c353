use crate::dom;
use crate::overlay::SpectrumOverlay;
use crate::render::SceneRenderer;
use cosmos_core::{FrameOrchestrator, PlaybackState};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedScene = Rc<RefCell<FrameOrchestrator<SceneRenderer>>>;

pub struct FrameContext {
    pub scene: SharedScene,
    pub canvas: web::HtmlCanvasElement,
    pub overlay: Option<SpectrumOverlay>,
    pub pixel_ratio: f64,
    pub last_instant: Instant,
    pub last_state: PlaybackState,
}

impl FrameContext {
    /// One animation frame. Returns false once the scene has been torn down.
    pub fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        dom::sync_canvas_backing_size(&self.canvas, self.pixel_ratio);
        let mut scene = self.scene.borrow_mut();
        scene
            .sink_mut()
            .resize_if_needed(self.canvas.width(), self.canvas.height());

        let report = scene.frame(dt.as_secs_f64());
        if report.stopped {
            return false;
        }
        if report.state != self.last_state {
            log::info!("[frame] playback {:?} -> {:?}", self.last_state, report.state);
            self.last_state = report.state;
        }

        if let Some(overlay) = &self.overlay {
            overlay.sync_size();
            overlay.draw(scene.spectrum());
        }
        true
    }
}

/// Handle to a running animation-frame loop.
pub struct LoopHandle {
    raf_id: Rc<Cell<Option<i32>>>,
    tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl LoopHandle {
    /// Cancel the pending callback and drop the closure.
    pub fn cancel(&self) {
        if let (Some(id), Some(w)) = (self.raf_id.take(), web::window()) {
            let _ = w.cancel_animation_frame(id);
        }
        self.tick.borrow_mut().take();
    }
}

fn schedule(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>, raf_id: &Cell<Option<i32>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        raf_id.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        raf_clone.set(None);
        if frame_ctx.borrow_mut().frame() {
            schedule(&tick_clone, &raf_clone);
        } else {
            log::info!("[frame] scene stopped; loop ends");
            // Break the closure's reference to itself.
            drop(tick_clone.borrow_mut().take());
        }
    }) as Box<dyn FnMut()>));
    schedule(&tick, &raf_id);

    LoopHandle { raf_id, tick }
}
