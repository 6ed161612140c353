pub mod animators;
pub mod bands;
pub mod beat;
pub mod color;
pub mod constants;
pub mod error;
pub mod orchestrator;
pub mod overlay;
pub mod quality;
pub mod registry;
pub mod spectrum;
pub mod state;

pub use animators::{AnimContext, Animator, AnimatorSet, Asset, FrameSignals, Trigger};
pub use bands::*;
pub use beat::*;
pub use error::*;
pub use orchestrator::*;
pub use overlay::*;
pub use quality::*;
pub use registry::*;
pub use spectrum::*;
pub use state::*;
