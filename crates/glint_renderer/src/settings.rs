//! Render settings and the patch type the UI edits them through.

use serde::{Deserialize, Serialize};

pub const MIN_RAY_BOUNCES: u32 = 1;
pub const MIN_RESOLUTION_SCALE: u32 = 1;
pub const MAX_RESOLUTION_SCALE: u32 = 100;

/// Renderer configuration.
///
/// Mutated only through [`crate::Renderer::apply_settings_patch`], which
/// decides whether a change invalidates the accumulated frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Temporal blending of frames into the accumulation buffer.
    pub accumulate: bool,
    /// Row-parallel dispatch. Output is identical either way.
    pub multithreading: bool,
    /// Hash-based per-pixel sampling instead of the `rand` generator.
    pub fast_random: bool,
    /// Mix wall-clock time into per-pixel seeds (non-reproducible renders).
    pub use_clock_time: bool,
    /// Mix the frame index into per-pixel seeds.
    pub use_frame_index: bool,
    /// Mix the bounce count into per-pixel seeds.
    pub use_ray_bounces: bool,
    /// Bounce loop upper bound, at least [`MIN_RAY_BOUNCES`].
    pub ray_bounces: u32,
    /// Percentage of the requested viewport resolution actually rendered.
    pub resolution_scale: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            accumulate: true,
            multithreading: true,
            fast_random: true,
            use_clock_time: true,
            use_frame_index: true,
            use_ray_bounces: true,
            ray_bounces: 5,
            resolution_scale: 100,
        }
    }
}

impl Settings {
    /// Force out-of-range numeric fields back into their valid ranges.
    pub(crate) fn clamp_ranges(&mut self) {
        self.ray_bounces = self.ray_bounces.max(MIN_RAY_BOUNCES);
        self.resolution_scale = self
            .resolution_scale
            .clamp(MIN_RESOLUTION_SCALE, MAX_RESOLUTION_SCALE);
    }
}

/// Partial settings update. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsPatch {
    pub accumulate: Option<bool>,
    pub multithreading: Option<bool>,
    pub fast_random: Option<bool>,
    pub use_clock_time: Option<bool>,
    pub use_frame_index: Option<bool>,
    pub use_ray_bounces: Option<bool>,
    pub ray_bounces: Option<u32>,
    pub resolution_scale: Option<u32>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, settings: &mut Settings) {
        if let Some(v) = self.accumulate {
            settings.accumulate = v;
        }
        if let Some(v) = self.multithreading {
            settings.multithreading = v;
        }
        if let Some(v) = self.fast_random {
            settings.fast_random = v;
        }
        if let Some(v) = self.use_clock_time {
            settings.use_clock_time = v;
        }
        if let Some(v) = self.use_frame_index {
            settings.use_frame_index = v;
        }
        if let Some(v) = self.use_ray_bounces {
            settings.use_ray_bounces = v;
        }
        if let Some(v) = self.ray_bounces {
            settings.ray_bounces = v;
        }
        if let Some(v) = self.resolution_scale {
            settings.resolution_scale = v;
        }
        settings.clamp_ranges();
    }
}

/// A patch that sets every field, used when loading a settings file.
impl From<Settings> for SettingsPatch {
    fn from(s: Settings) -> Self {
        Self {
            accumulate: Some(s.accumulate),
            multithreading: Some(s.multithreading),
            fast_random: Some(s.fast_random),
            use_clock_time: Some(s.use_clock_time),
            use_frame_index: Some(s.use_frame_index),
            use_ray_bounces: Some(s.use_ray_bounces),
            ray_bounces: Some(s.ray_bounces),
            resolution_scale: Some(s.resolution_scale),
        }
    }
}
