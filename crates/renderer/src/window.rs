use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use effects::{Effect, EffectSelector, ShaderLibrary, CATALOG};
use tracing::{debug, error, info};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::window::{Window, WindowBuilder};

use crate::bridge::{FrameOutcome, SurfaceBridge};
use crate::gpu::{GpuBackend, GpuContext};
use crate::input::{command_for_button, command_for_key, Command, PointerState};
use crate::pacing::FramePacer;
use crate::types::RendererConfig;

/// Opens the showcase window and runs until the user quits.
///
/// Startup failures (shader library, window, adapter, device, first
/// pipeline) are returned before the event loop starts. Pipeline failures
/// while switching effects stop the loop and are returned afterwards.
pub fn run(config: RendererConfig) -> Result<()> {
    let library = ShaderLibrary::compiled_in().context("embedded shader library is invalid")?;
    library
        .verify(&CATALOG)
        .context("effect catalogue does not match the shader library")?;

    let event_loop = EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let selector = EffectSelector::new(config.start_effect);
    let (width, height) = config.window_size;
    let window = WindowBuilder::new()
        .with_title(window_title(selector.current(), selector.len(), false))
        .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;

    let context = GpuContext::new(&window, window.inner_size(), config.power, config.present)
        .context("failed to initialise GPU")?;
    let profile = context.adapter_profile.clone();
    info!(
        adapter = %profile.name,
        backend = ?profile.backend,
        software = profile.is_software(),
        "GPU ready"
    );
    let backend = GpuBackend::new(context, library)?;
    let mut showcase = Showcase::new(window, selector, backend, config.fps_override)?;

    event_loop
        .run(|event, elwt| showcase.handle_event(event, elwt))
        .map_err(|err| anyhow!("window event loop error: {err}"))?;

    match showcase.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn window_title(effect: &Effect, count: usize, paused: bool) -> String {
    let suffix = if paused { " (paused)" } else { "" };
    format!(
        "Shady: {} [{}/{}]{suffix}",
        effect.title,
        effect.index + 1,
        count
    )
}

/// Event-loop state. Field order matters: the bridge (and the surface it
/// owns) must drop before the window.
struct Showcase {
    bridge: SurfaceBridge<GpuBackend>,
    selector: EffectSelector,
    pointer: PointerState,
    pacer: FramePacer,
    stats: RenderStats,
    suspended: bool,
    fatal: Option<anyhow::Error>,
    window: Window,
}

impl Showcase {
    fn new(
        window: Window,
        selector: EffectSelector,
        backend: GpuBackend,
        fps_override: Option<u32>,
    ) -> Result<Self> {
        let mut bridge = SurfaceBridge::new(backend, fps_override);
        let effect = selector.current();
        bridge.attach(effect)?;
        let fps = bridge.frame_rate().unwrap_or(effect.preferred_fps);
        info!(effect = effect.slug, index = effect.index, fps, "showing effect");
        Ok(Self {
            bridge,
            selector,
            pointer: PointerState::default(),
            pacer: FramePacer::new(fps),
            stats: RenderStats::new(Instant::now()),
            suspended: false,
            fatal: None,
            window,
        })
    }

    fn handle_event(&mut self, event: Event<()>, elwt: &EventLoopWindowTarget<()>) {
        match event {
            Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                self.handle_window_event(event, elwt);
            }
            Event::AboutToWait => self.schedule(elwt),
            Event::Suspended => {
                self.suspended = true;
                if self.bridge.detach() {
                    info!("suspended; session released");
                }
            }
            Event::Resumed if self.suspended => {
                self.suspended = false;
                info!("resumed");
                self.show(self.selector.current(), elwt);
            }
            _ => {}
        }
    }

    fn handle_window_event(&mut self, event: WindowEvent, elwt: &EventLoopWindowTarget<()>) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let Some(command) = command_for_key(&event.logical_key) {
                        self.apply(command, elwt);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer.handle_cursor_moved(position);
                if let Some(position) = self.pointer.drag_position() {
                    self.bridge.on_pointer(position);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.handle_button(button, state);
                if let Some(position) = self.pointer.drag_position() {
                    self.bridge.on_pointer(position);
                }
                if let Some(command) = command_for_button(button, state) {
                    self.apply(command, elwt);
                }
            }
            WindowEvent::Resized(size) => {
                self.bridge.on_resize(size);
                self.pacer.reset();
            }
            WindowEvent::RedrawRequested => self.redraw(Instant::now()),
            _ => {}
        }
    }

    fn apply(&mut self, command: Command, elwt: &EventLoopWindowTarget<()>) {
        match command {
            Command::Advance => {
                let effect = self.selector.advance();
                self.show(effect, elwt);
            }
            Command::TogglePause => {
                let paused = self.bridge.toggle_paused();
                info!(paused, "animation toggled");
                self.pacer.reset();
                self.update_title();
            }
            Command::Quit => elwt.exit(),
        }
    }

    fn show(&mut self, effect: &'static Effect, elwt: &EventLoopWindowTarget<()>) {
        if let Err(err) = self.bridge.attach(effect) {
            error!(effect = effect.slug, "failed to prepare effect: {err:#}");
            self.fatal = Some(err.context(format!("failed to prepare effect `{}`", effect.slug)));
            elwt.exit();
            return;
        }
        let fps = self.bridge.frame_rate().unwrap_or(effect.preferred_fps);
        info!(effect = effect.slug, index = effect.index, fps, "showing effect");
        self.pacer.set_frame_rate(fps);
        self.stats = RenderStats::new(Instant::now());
        self.update_title();
        self.window.request_redraw();
    }

    fn update_title(&self) {
        let title = window_title(self.selector.current(), self.selector.len(), self.bridge.is_paused());
        self.window.set_title(&title);
    }

    fn redraw(&mut self, now: Instant) {
        match self.bridge.on_frame_tick() {
            FrameOutcome::Presented => {
                self.pacer.mark_rendered(now);
                if let Some(session) = self.bridge.session() {
                    self.stats.record(now, session.effect().slug, session.elapsed());
                }
            }
            FrameOutcome::Skipped => self.pacer.mark_rendered(now),
            FrameOutcome::Paused | FrameOutcome::Inactive => {}
        }
    }

    fn schedule(&mut self, elwt: &EventLoopWindowTarget<()>) {
        if self.suspended || self.bridge.is_paused() || self.bridge.session().is_none() {
            elwt.set_control_flow(ControlFlow::Wait);
            return;
        }
        let now = Instant::now();
        if self.pacer.ready(now) {
            tracing::trace!("pacer: issuing redraw now");
            self.window.request_redraw();
            elwt.set_control_flow(ControlFlow::Wait);
        } else if let Some(deadline) = self.pacer.next_deadline() {
            elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
        } else {
            elwt.set_control_flow(ControlFlow::Wait);
        }
    }
}

/// Once-a-second frame rate log.
struct RenderStats {
    since: Instant,
    frames: u32,
}

impl RenderStats {
    fn new(now: Instant) -> Self {
        Self {
            since: now,
            frames: 0,
        }
    }

    /// Counts a presented frame. Returns the measured rate when a report
    /// was emitted.
    fn record(&mut self, now: Instant, effect: &str, time: f32) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        debug!(effect, fps = fps.round(), time, "render stats");
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}
