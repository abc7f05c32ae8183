use std::cell::Cell;
use std::rc::Rc;

use anyhow::{bail, Result};
use effects::Effect;
use winit::dpi::PhysicalSize;

use crate::bridge::EffectBackend;
use crate::uniforms::EffectUniforms;

/// Pipeline stand-in that tracks how many are alive at once.
pub(crate) struct RecordingPipeline {
    pub slug: &'static str,
    live: Rc<Cell<usize>>,
}

impl Drop for RecordingPipeline {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Backend that records every call instead of touching a GPU.
pub(crate) struct RecordingBackend {
    pub size: PhysicalSize<u32>,
    pub live: Rc<Cell<usize>>,
    pub max_live: usize,
    pub built: Vec<&'static str>,
    pub drawn: Vec<&'static str>,
    pub submitted: Vec<EffectUniforms>,
    pub clears: Vec<[f64; 4]>,
    pub resizes: Vec<PhysicalSize<u32>>,
    pub frames_available: bool,
    pub fail_on: Option<&'static str>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: PhysicalSize::new(width, height),
            live: Rc::new(Cell::new(0)),
            max_live: 0,
            built: Vec::new(),
            drawn: Vec::new(),
            submitted: Vec::new(),
            clears: Vec::new(),
            resizes: Vec::new(),
            frames_available: true,
            fail_on: None,
        }
    }
}

impl EffectBackend for RecordingBackend {
    type Pipeline = RecordingPipeline;
    type Frame = ();

    fn surface_size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn build_pipeline(&mut self, effect: &Effect) -> Result<Self::Pipeline> {
        if self.fail_on == Some(effect.slug) {
            bail!("entry point `{}` rejected", effect.fragment_entry);
        }
        self.built.push(effect.slug);
        self.live.set(self.live.get() + 1);
        self.max_live = self.max_live.max(self.live.get());
        Ok(RecordingPipeline {
            slug: effect.slug,
            live: Rc::clone(&self.live),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.size = size;
        self.resizes.push(size);
    }

    fn acquire_frame(&mut self) -> Option<Self::Frame> {
        self.frames_available.then_some(())
    }

    fn submit(
        &mut self,
        pipeline: &Self::Pipeline,
        _frame: Self::Frame,
        uniforms: &EffectUniforms,
        clear_color: [f64; 4],
    ) {
        self.drawn.push(pipeline.slug);
        self.submitted.push(*uniforms);
        self.clears.push(clear_color);
    }
}
