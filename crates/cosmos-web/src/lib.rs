//! Browser front-end: WebAudio analyser, WebGPU sprite renderer, DOM wiring
//! and the animation-frame loop around the `cosmos-core` pipeline.

pub mod constants;
pub mod playback;
pub mod scene;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;
