//! Renderer crate for the shady effect showcase.
//!
//! The flow from startup to pixels:
//!
//! ```text
//!   shady CLI
//!      │ RendererConfig
//!      ▼
//!   run() ──▶ GpuContext ──▶ SurfaceBridge<GpuBackend> ──▶ RenderSession ──▶ draw(0..4)
//!      ▲                            ▲
//!      │                            └── EffectSelector (advance on input)
//!      └── winit event loop (resize, pointer, keys, pacing)
//! ```
//!
//! The bridge talks to the GPU only through the [`EffectBackend`] trait, so
//! the session lifecycle (prepare, tick, dispose) and everything above it can
//! be exercised without a display.

mod bridge;
mod gpu;
mod input;
mod pacing;
mod session;
mod types;
mod uniforms;
mod window;

#[cfg(test)]
mod test_support;

pub use bridge::{EffectBackend, FrameOutcome, SurfaceBridge};
pub use input::{command_for_button, command_for_key, Command, PointerState};
pub use pacing::FramePacer;
pub use session::{FrameClock, RenderSession, SessionPhase};
pub use types::{AdapterProfile, GpuPowerPreference, PresentPreference, RendererConfig};
pub use uniforms::EffectUniforms;
pub use window::run;
