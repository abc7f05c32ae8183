//! Effect catalogue for the shady showcase.
//!
//! The crate owns three things:
//! - [`CATALOG`]: the fixed, ordered list of effects and the metadata the
//!   renderer needs to draw each one (entry point names, uniform schema,
//!   time step, preferred frame rate, clear colour).
//! - [`ShaderLibrary`]: the compiled-in WGSL module that holds the shared
//!   full-screen vertex stage and one fragment entry point per effect.
//! - [`EffectSelector`]: the wrap-around cursor used to cycle effects.
//!
//! Nothing here touches the GPU; the library is parsed and validated with
//! naga so entry point lookups can fail early with a readable message.

mod catalog;
mod library;
mod selector;

pub use catalog::{resolve, Effect, TimeStep, UniformSchema, CATALOG, EFFECT_COUNT};
pub use library::{EntryPoint, LibraryError, ResolvedEntryPoints, ShaderLibrary, EFFECTS_WGSL};
pub use selector::EffectSelector;
