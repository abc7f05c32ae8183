use anyhow::{bail, Context, Result};
use effects::Effect;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::bridge::{EffectBackend, FrameOutcome};
use crate::uniforms::EffectUniforms;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Ready,
    Rendering,
    Disposed,
}

/// Effect time accumulator. Advances by a fixed step per presented frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    elapsed: f32,
    step: f32,
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self {
            elapsed: 0.0,
            step: step.max(0.0),
        }
    }

    pub fn advance(&mut self) -> f32 {
        self.elapsed += self.step;
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

/// Live binding of one effect's pipeline to the surface.
///
/// The pipeline is built once in [`prepare`](Self::prepare) and reused for
/// every tick until [`dispose`](Self::dispose) drops it.
pub struct RenderSession<P> {
    effect: &'static Effect,
    phase: SessionPhase,
    pipeline: Option<P>,
    clock: FrameClock,
    fps: u32,
    resolution: PhysicalSize<u32>,
    /// Last known pointer, origin until the first drag.
    pointer: PhysicalPosition<f64>,
    paused: bool,
    frames: u64,
}

impl<P> RenderSession<P> {
    pub fn new(effect: &'static Effect, fps: u32, resolution: PhysicalSize<u32>) -> Self {
        let fps = fps.max(1);
        Self {
            effect,
            phase: SessionPhase::Uninitialized,
            pipeline: None,
            clock: FrameClock::new(effect.time_step.seconds(fps)),
            fps,
            resolution,
            pointer: PhysicalPosition::new(0.0, 0.0),
            paused: false,
            frames: 0,
        }
    }

    /// Builds the pipeline. Only valid from `Uninitialized`.
    pub fn prepare<B>(&mut self, backend: &mut B) -> Result<()>
    where
        B: EffectBackend<Pipeline = P>,
    {
        if self.phase != SessionPhase::Uninitialized {
            bail!(
                "cannot prepare `{}` session in {:?} phase",
                self.effect.slug,
                self.phase
            );
        }
        let pipeline = backend
            .build_pipeline(self.effect)
            .with_context(|| format!("failed to build pipeline for `{}`", self.effect.slug))?;
        self.pipeline = Some(pipeline);
        self.phase = SessionPhase::Ready;
        tracing::info!(
            effect = self.effect.slug,
            fps = self.fps,
            step = self.clock.step(),
            "session ready"
        );
        Ok(())
    }

    /// Renders one frame if the session is live, unpaused and a drawable is
    /// available. Skipped frames leave the clock untouched.
    pub fn tick<B>(&mut self, backend: &mut B) -> FrameOutcome
    where
        B: EffectBackend<Pipeline = P>,
    {
        if !matches!(self.phase, SessionPhase::Ready | SessionPhase::Rendering) {
            return FrameOutcome::Inactive;
        }
        if self.paused {
            return FrameOutcome::Paused;
        }
        let Some(pipeline) = self.pipeline.as_ref() else {
            return FrameOutcome::Inactive;
        };
        let Some(frame) = backend.acquire_frame() else {
            return FrameOutcome::Skipped;
        };

        let time = self.clock.advance();
        let uniforms = EffectUniforms::for_effect(self.effect, time, self.resolution, self.pointer);
        backend.submit(pipeline, frame, &uniforms, self.effect.clear_color);
        self.frames += 1;
        self.phase = SessionPhase::Rendering;
        FrameOutcome::Presented
    }

    /// Stores the resolution used by the next frame. Zero sizes are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.resolution = size;
    }

    pub fn set_pointer(&mut self, position: PhysicalPosition<f64>) {
        self.pointer = position;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Releases the pipeline. Returns `false` if the session was already
    /// disposed.
    pub fn dispose(&mut self) -> bool {
        if self.phase == SessionPhase::Disposed {
            return false;
        }
        self.pipeline = None;
        self.phase = SessionPhase::Disposed;
        tracing::info!(effect = self.effect.slug, frames = self.frames, "session disposed");
        true
    }

    pub fn effect(&self) -> &'static Effect {
        self.effect
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn resolution(&self) -> PhysicalSize<u32> {
        self.resolution
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingBackend;
    use effects::{resolve, CATALOG};

    fn prepared(slug: &str, backend: &mut RecordingBackend) -> RenderSession<crate::test_support::RecordingPipeline> {
        let effect = resolve(slug).unwrap();
        let mut session = RenderSession::new(effect, effect.preferred_fps, backend.size);
        session.prepare(backend).unwrap();
        session
    }

    #[test]
    fn prepare_moves_to_ready_and_builds_once() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("ripples", &mut backend);
        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(backend.built, vec!["ripples"]);

        let err = session.prepare(&mut backend).unwrap_err();
        assert!(err.to_string().contains("Ready"));
        assert_eq!(backend.built.len(), 1);
    }

    #[test]
    fn failed_prepare_stays_uninitialized() {
        let mut backend = RecordingBackend::new(640, 480);
        backend.fail_on = Some("clouds");
        let effect = resolve("clouds").unwrap();
        let mut session: RenderSession<crate::test_support::RecordingPipeline> =
            RenderSession::new(effect, 60, backend.size);
        let err = session.prepare(&mut backend).unwrap_err();
        assert!(format!("{err:#}").contains("clouds"));
        assert_eq!(session.phase(), SessionPhase::Uninitialized);
        assert_eq!(session.tick(&mut backend), FrameOutcome::Inactive);
    }

    #[test]
    fn ticks_advance_time_monotonically() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("sine_waves", &mut backend);
        let mut last = session.elapsed();
        for _ in 0..10 {
            assert_eq!(session.tick(&mut backend), FrameOutcome::Presented);
            assert!(session.elapsed() >= last);
            last = session.elapsed();
        }
        assert_eq!(session.phase(), SessionPhase::Rendering);
        assert!((session.elapsed() - 0.16).abs() < 1e-5);
        assert_eq!(backend.submitted.len(), 10);
        assert_eq!(session.frames(), 10);
    }

    #[test]
    fn frame_rate_step_follows_fps() {
        let mut backend = RecordingBackend::new(640, 480);
        let effect = resolve("raindrops").unwrap();
        let mut session = RenderSession::new(effect, 30, backend.size);
        session.prepare(&mut backend).unwrap();
        for _ in 0..30 {
            session.tick(&mut backend);
        }
        assert!((session.elapsed() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn skipped_frames_do_not_advance_time() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("ripples", &mut backend);
        session.tick(&mut backend);
        let before = session.elapsed();

        backend.frames_available = false;
        assert_eq!(session.tick(&mut backend), FrameOutcome::Skipped);
        assert_eq!(session.elapsed(), before);
        assert_eq!(backend.submitted.len(), 1);
    }

    #[test]
    fn paused_session_does_not_draw() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("ripples", &mut backend);
        session.set_paused(true);
        assert_eq!(session.tick(&mut backend), FrameOutcome::Paused);
        assert_eq!(session.elapsed(), 0.0);
        assert!(backend.submitted.is_empty());

        session.set_paused(false);
        assert_eq!(session.tick(&mut backend), FrameOutcome::Presented);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_ticks() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("lava_lamp", &mut backend);
        assert_eq!(backend.live.get(), 1);

        assert!(session.dispose());
        assert_eq!(session.phase(), SessionPhase::Disposed);
        assert_eq!(backend.live.get(), 0);
        assert!(!session.dispose());
        assert_eq!(session.tick(&mut backend), FrameOutcome::Inactive);
        assert!(session.prepare(&mut backend).is_err());
    }

    #[test]
    fn resize_is_seen_by_next_payload() {
        let mut backend = RecordingBackend::new(640, 480);
        let mut session = prepared("ripples", &mut backend);
        session.tick(&mut backend);
        session.resize(PhysicalSize::new(1920, 1080));
        session.resize(PhysicalSize::new(0, 1080));
        session.tick(&mut backend);

        assert_eq!(backend.submitted[0].resolution, [640.0, 480.0]);
        assert_eq!(backend.submitted[1].resolution, [1920.0, 1080.0]);
    }

    #[test]
    fn pointer_drag_reaches_next_payload_flipped() {
        let mut backend = RecordingBackend::new(1200, 800);
        let mut session = prepared("silvery_liquid", &mut backend);
        session.set_pointer(PhysicalPosition::new(120.0, 340.0));
        session.tick(&mut backend);
        assert_eq!(backend.submitted[0].pointer, [120.0, 460.0]);
    }

    #[test]
    fn clear_colour_comes_from_effect() {
        let mut backend = RecordingBackend::new(64, 64);
        let mut session = prepared("lightning", &mut backend);
        session.tick(&mut backend);
        assert_eq!(backend.clears, vec![CATALOG[14].clear_color]);
    }

    #[test]
    fn frame_clock_clamps_negative_steps() {
        let mut clock = FrameClock::new(-1.0);
        assert_eq!(clock.advance(), 0.0);
    }
}
