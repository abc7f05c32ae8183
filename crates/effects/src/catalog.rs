use std::fmt;

use serde::Serialize;

/// Which shared uniform fields an effect reads.
///
/// Fields an effect does not consume are zeroed before upload so the
/// uniform block never carries stale data from a previous effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UniformSchema {
    pub time: bool,
    pub resolution: bool,
    pub pointer: bool,
}

impl UniformSchema {
    pub const NONE: Self = Self {
        time: false,
        resolution: false,
        pointer: false,
    };
    pub const TIME: Self = Self {
        time: true,
        resolution: false,
        pointer: false,
    };
    pub const TIME_RESOLUTION: Self = Self {
        time: true,
        resolution: true,
        pointer: false,
    };
    pub const INTERACTIVE: Self = Self {
        time: true,
        resolution: true,
        pointer: true,
    };
}

impl fmt::Display for UniformSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if self.time {
            parts.push("time");
        }
        if self.resolution {
            parts.push("resolution");
        }
        if self.pointer {
            parts.push("pointer");
        }
        if parts.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&parts.join("+"))
        }
    }
}

/// How far the effect clock moves per presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "seconds")]
pub enum TimeStep {
    /// A constant increment regardless of the frame rate.
    Fixed(f32),
    /// `1 / fps` of the active frame rate.
    FrameRate,
}

impl TimeStep {
    pub fn seconds(self, fps: u32) -> f32 {
        match self {
            TimeStep::Fixed(step) => step,
            TimeStep::FrameRate => 1.0 / fps.max(1) as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Effect {
    pub index: usize,
    pub slug: &'static str,
    pub title: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    pub uniforms: UniformSchema,
    pub time_step: TimeStep,
    pub preferred_fps: u32,
    pub clear_color: [f64; 4],
}

impl Effect {
    pub fn reads_pointer(&self) -> bool {
        self.uniforms.pointer
    }
}

pub const EFFECT_COUNT: usize = 16;

const VERTEX: &str = "vs_quad";
const FIXED: TimeStep = TimeStep::Fixed(0.016);
const BLACK: [f64; 4] = [0.0, 0.0, 0.0, 1.0];

#[allow(clippy::too_many_arguments)]
const fn effect(
    index: usize,
    slug: &'static str,
    title: &'static str,
    fragment_entry: &'static str,
    uniforms: UniformSchema,
    time_step: TimeStep,
    preferred_fps: u32,
    clear_color: [f64; 4],
) -> Effect {
    Effect {
        index,
        slug,
        title,
        vertex_entry: VERTEX,
        fragment_entry,
        uniforms,
        time_step,
        preferred_fps,
        clear_color,
    }
}

/// Presentation order is fixed; selectors cycle through it front to back.
pub static CATALOG: [Effect; EFFECT_COUNT] = [
    effect(0, "sine_waves", "Sine Waves", "fs_sine_waves", UniformSchema::TIME, FIXED, 60, BLACK),
    effect(1, "color_bands", "Color Bands", "fs_color_bands", UniformSchema::TIME, FIXED, 60, BLACK),
    effect(
        2,
        "metallic_liquid",
        "Metallic Liquid",
        "fs_metallic_liquid",
        UniformSchema::TIME,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(3, "ripples", "Ripples", "fs_ripples", UniformSchema::TIME_RESOLUTION, FIXED, 60, BLACK),
    effect(
        4,
        "molten_glow",
        "Molten Glow",
        "fs_molten_glow",
        UniformSchema::TIME_RESOLUTION,
        FIXED,
        60,
        BLACK,
    ),
    effect(
        5,
        "metaball_stars",
        "Metaball Stars",
        "fs_metaball_stars",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(
        6,
        "northern_lights",
        "Northern Lights",
        "fs_northern_lights",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(7, "fireworks", "Fireworks", "fs_fireworks", UniformSchema::TIME_RESOLUTION, FIXED, 60, BLACK),
    effect(
        8,
        "kaleidoscope",
        "Kaleidoscope",
        "fs_kaleidoscope",
        UniformSchema::TIME_RESOLUTION,
        FIXED,
        60,
        BLACK,
    ),
    effect(
        9,
        "raindrops",
        "Raindrops",
        "fs_raindrops",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        30,
        BLACK,
    ),
    effect(
        10,
        "rainy_window",
        "Rainy Window",
        "fs_rainy_window",
        UniformSchema::TIME_RESOLUTION,
        FIXED,
        30,
        BLACK,
    ),
    effect(
        11,
        "silvery_liquid",
        "Silvery Liquid",
        "fs_silvery_liquid",
        UniformSchema::INTERACTIVE,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(
        12,
        "clouds",
        "Clouds",
        "fs_clouds",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(
        13,
        "lava_lamp",
        "Lava Lamp",
        "fs_lava_lamp",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        BLACK,
    ),
    effect(
        14,
        "lightning",
        "Lightning",
        "fs_lightning",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        [0.02, 0.03, 0.08, 1.0],
    ),
    effect(
        15,
        "warp_drive",
        "Warp Drive",
        "fs_warp_drive",
        UniformSchema::TIME_RESOLUTION,
        TimeStep::FrameRate,
        60,
        [0.01, 0.02, 0.05, 1.0],
    ),
];

/// Looks an effect up by slug or zero-based index.
///
/// Slugs match case-insensitively and treat `-` and `_` alike, so
/// `Northern-Lights` resolves the same as `northern_lights`.
pub fn resolve(handle: &str) -> Option<&'static Effect> {
    let handle = handle.trim();
    if handle.is_empty() {
        return None;
    }
    if let Ok(index) = handle.parse::<usize>() {
        return CATALOG.get(index);
    }
    let wanted = handle.to_ascii_lowercase().replace('-', "_");
    CATALOG.iter().find(|effect| effect.slug == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_indices_match_positions() {
        assert_eq!(CATALOG.len(), EFFECT_COUNT);
        for (position, effect) in CATALOG.iter().enumerate() {
            assert_eq!(effect.index, position, "{} out of order", effect.slug);
        }
    }

    #[test]
    fn slugs_and_entry_points_are_unique() {
        let slugs: HashSet<_> = CATALOG.iter().map(|effect| effect.slug).collect();
        let fragments: HashSet<_> = CATALOG.iter().map(|effect| effect.fragment_entry).collect();
        assert_eq!(slugs.len(), EFFECT_COUNT);
        assert_eq!(fragments.len(), EFFECT_COUNT);
    }

    #[test]
    fn only_silvery_liquid_reads_pointer() {
        let interactive: Vec<_> = CATALOG
            .iter()
            .filter(|effect| effect.reads_pointer())
            .map(|effect| effect.slug)
            .collect();
        assert_eq!(interactive, vec!["silvery_liquid"]);
    }

    #[test]
    fn rain_effects_prefer_thirty_fps() {
        for effect in &CATALOG {
            let expected = if effect.slug.starts_with("rain") { 30 } else { 60 };
            assert_eq!(effect.preferred_fps, expected, "{}", effect.slug);
        }
    }

    #[test]
    fn resolve_accepts_slug_variants_and_index() {
        assert_eq!(resolve("northern_lights").map(|e| e.index), Some(6));
        assert_eq!(resolve("Northern-Lights").map(|e| e.index), Some(6));
        assert_eq!(resolve("15").map(|e| e.slug), Some("warp_drive"));
        assert!(resolve("16").is_none());
        assert!(resolve("aurora").is_none());
        assert!(resolve("  ").is_none());
    }

    #[test]
    fn time_step_seconds() {
        assert_eq!(TimeStep::Fixed(0.016).seconds(30), 0.016);
        assert!((TimeStep::FrameRate.seconds(60) - 1.0 / 60.0).abs() < f32::EPSILON);
        assert_eq!(TimeStep::FrameRate.seconds(0), 1.0);
    }

    #[test]
    fn schema_display() {
        assert_eq!(UniformSchema::TIME.to_string(), "time");
        assert_eq!(UniformSchema::INTERACTIVE.to_string(), "time+resolution+pointer");
    }

    #[test]
    fn effect_serialises_for_listing() {
        let value = serde_json::to_value(&CATALOG[0]).unwrap();
        assert_eq!(value["slug"], "sine_waves");
        assert_eq!(value["time_step"]["kind"], "fixed");
        assert_eq!(value["uniforms"]["pointer"], false);
    }
}
