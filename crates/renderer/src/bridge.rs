use anyhow::Result;
use effects::Effect;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::session::RenderSession;
use crate::uniforms::EffectUniforms;

/// GPU-facing half of the surface bridge.
///
/// The production implementation owns the wgpu device, queue and surface;
/// tests substitute a recorder so the session lifecycle can be exercised
/// without a display.
pub trait EffectBackend {
    type Pipeline;
    type Frame;

    fn surface_size(&self) -> PhysicalSize<u32>;

    /// Compiles the pipeline for `effect` against the current surface format.
    fn build_pipeline(&mut self, effect: &Effect) -> Result<Self::Pipeline>;

    fn resize(&mut self, size: PhysicalSize<u32>);

    /// Returns the next drawable, or `None` when this frame should be skipped.
    fn acquire_frame(&mut self) -> Option<Self::Frame>;

    /// Uploads `uniforms`, draws the full-screen quad and presents `frame`.
    fn submit(
        &mut self,
        pipeline: &Self::Pipeline,
        frame: Self::Frame,
        uniforms: &EffectUniforms,
        clear_color: [f64; 4],
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// No drawable was available.
    Skipped,
    Paused,
    /// No live session.
    Inactive,
}

/// Owns the backend and at most one live [`RenderSession`].
pub struct SurfaceBridge<B: EffectBackend> {
    backend: B,
    session: Option<RenderSession<B::Pipeline>>,
    fps_override: Option<u32>,
    paused: bool,
}

impl<B: EffectBackend> SurfaceBridge<B> {
    pub fn new(backend: B, fps_override: Option<u32>) -> Self {
        Self {
            backend,
            session: None,
            fps_override: fps_override.filter(|fps| *fps > 0),
            paused: false,
        }
    }

    /// Disposes the current session, then prepares a fresh one for `effect`.
    ///
    /// A new session always starts animating, so attaching clears any pause.
    /// On failure the bridge is left without a session.
    pub fn attach(&mut self, effect: &'static Effect) -> Result<()> {
        self.detach();
        self.paused = false;
        let fps = self.fps_for(effect);
        let mut session = RenderSession::new(effect, fps, self.backend.surface_size());
        session.prepare(&mut self.backend)?;
        self.session = Some(session);
        Ok(())
    }

    /// Returns `true` if a live session was disposed.
    pub fn detach(&mut self) -> bool {
        match self.session.take() {
            Some(mut session) => session.dispose(),
            None => false,
        }
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            tracing::debug!(?size, "ignoring zero-sized resize");
            return;
        }
        self.backend.resize(size);
        if let Some(session) = self.session.as_mut() {
            session.resize(size);
        }
    }

    /// Forwards the pointer only to effects that read it.
    pub fn on_pointer(&mut self, position: PhysicalPosition<f64>) {
        if let Some(session) = self.session.as_mut() {
            if session.effect().reads_pointer() {
                session.set_pointer(position);
            }
        }
    }

    pub fn on_frame_tick(&mut self) -> FrameOutcome {
        match self.session.as_mut() {
            Some(session) => session.tick(&mut self.backend),
            None => FrameOutcome::Inactive,
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if let Some(session) = self.session.as_mut() {
            session.set_paused(paused);
        }
    }

    /// Flips the pause flag and returns the new value.
    pub fn toggle_paused(&mut self) -> bool {
        self.set_paused(!self.paused);
        self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn session(&self) -> Option<&RenderSession<B::Pipeline>> {
        self.session.as_ref()
    }

    /// Frame rate of the live session, if any.
    pub fn frame_rate(&self) -> Option<u32> {
        self.session.as_ref().map(RenderSession::fps)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn fps_for(&self, effect: &Effect) -> u32 {
        self.fps_override.unwrap_or(effect.preferred_fps)
    }
}

impl<B: EffectBackend> Drop for SurfaceBridge<B> {
    fn drop(&mut self) {
        self.detach();
    }
}
