use anyhow::{Context, Result};
use effects::{Effect, ShaderLibrary};
use winit::dpi::PhysicalSize;

use super::context::GpuContext;
use super::pipeline::{EffectPipeline, PipelineLayouts};
use crate::bridge::EffectBackend;
use crate::uniforms::EffectUniforms;

/// wgpu implementation of [`EffectBackend`].
pub(crate) struct GpuBackend {
    context: GpuContext,
    library: ShaderLibrary,
    layouts: PipelineLayouts,
}

impl GpuBackend {
    pub fn new(context: GpuContext, library: ShaderLibrary) -> Result<Self> {
        let layouts = PipelineLayouts::new(&context.device, &library)?;
        Ok(Self {
            context,
            library,
            layouts,
        })
    }
}

impl EffectBackend for GpuBackend {
    type Pipeline = EffectPipeline;
    type Frame = wgpu::SurfaceTexture;

    fn surface_size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    fn build_pipeline(&mut self, effect: &Effect) -> Result<Self::Pipeline> {
        let entries = self
            .library
            .resolve(effect)
            .with_context(|| format!("effect `{}` has no usable entry points", effect.slug))?;
        EffectPipeline::new(
            &self.context.device,
            &self.layouts,
            self.context.surface_format,
            entries,
        )
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.context.resize(size);
    }

    fn acquire_frame(&mut self) -> Option<Self::Frame> {
        match self.context.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost or outdated; reconfiguring");
                self.context.reconfigure();
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::debug!("surface timeout; skipping frame");
                None
            }
            Err(other) => {
                tracing::warn!(error = ?other, "surface error; skipping frame");
                None
            }
        }
    }

    fn submit(
        &mut self,
        pipeline: &Self::Pipeline,
        frame: Self::Frame,
        uniforms: &EffectUniforms,
        clear_color: [f64; 4],
    ) {
        let queue = &self.context.queue;
        queue.write_buffer(&pipeline.uniform_buffer, 0, uniforms.as_bytes());

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("effect encoder"),
                });
        {
            let [r, g, b, a] = clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("effect pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&pipeline.pipeline);
            render_pass.set_bind_group(0, &pipeline.bind_group, &[]);
            render_pass.draw(0..4, 0..1);
        }
        queue.submit(Some(encoder.finish()));
        frame.present();
    }
}
