//! wgpu side of the showcase.
//!
//! - `context` owns the instance, device and surface, and reconfigures the
//!   swapchain on resize or loss.
//! - `pipeline` compiles the shared WGSL module once per device and builds a
//!   render pipeline plus uniform buffer per effect.
//! - `backend` implements [`EffectBackend`](crate::bridge::EffectBackend) on
//!   top of the two, so sessions never touch wgpu directly.

mod backend;
mod context;
mod pipeline;

pub(crate) use backend::GpuBackend;
pub(crate) use context::GpuContext;
