use bytemuck::{Pod, Zeroable};
use effects::Effect;
use winit::dpi::{PhysicalPosition, PhysicalSize};

/// Uniform block shared by every effect (`Uniforms` in `effects.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EffectUniforms {
    pub resolution: [f32; 2],
    pub time: f32,
    pub _pad0: f32,
    pub pointer: [f32; 2],
    pub _pad1: [f32; 2],
}

impl EffectUniforms {
    /// Packs the payload for one frame.
    ///
    /// Only the fields in the effect's schema are written; the rest stay
    /// zero. The pointer is flipped to a bottom-left origin against the
    /// height of `resolution`, so an untouched pointer at the window origin
    /// arrives as `(0, height)`.
    pub fn for_effect(
        effect: &Effect,
        time: f32,
        resolution: PhysicalSize<u32>,
        pointer: PhysicalPosition<f64>,
    ) -> Self {
        let schema = effect.uniforms;
        let mut uniforms = Self::zeroed();
        if schema.time {
            uniforms.time = time;
        }
        if schema.resolution {
            uniforms.resolution = [resolution.width as f32, resolution.height as f32];
        }
        if schema.pointer {
            let height = resolution.height as f32;
            uniforms.pointer = [pointer.x as f32, height - pointer.y as f32];
        }
        uniforms
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
