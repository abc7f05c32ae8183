use crate::catalog::{Effect, CATALOG};

/// Wrap-around cursor over an ordered list of effects.
#[derive(Debug, Clone)]
pub struct EffectSelector {
    effects: &'static [Effect],
    index: usize,
}

impl EffectSelector {
    /// Selector over the full catalogue. Out-of-range starts wrap.
    pub fn new(start: usize) -> Self {
        Self::with_effects(&CATALOG, start)
    }

    /// # Panics
    ///
    /// Panics if `effects` is empty.
    pub fn with_effects(effects: &'static [Effect], start: usize) -> Self {
        assert!(!effects.is_empty(), "effect selector needs at least one effect");
        Self {
            effects,
            index: start % effects.len(),
        }
    }

    pub fn current(&self) -> &'static Effect {
        &self.effects[self.index]
    }

    /// Moves to the next effect, wrapping after the last one.
    pub fn advance(&mut self) -> &'static Effect {
        self.index = (self.index + 1) % self.effects.len();
        tracing::debug!(index = self.index, slug = self.current().slug, "effect selected");
        self.current()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl Default for EffectSelector {
    fn default() -> Self {
        Self::new(0)
    }
}
