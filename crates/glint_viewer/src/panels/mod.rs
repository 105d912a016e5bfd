//! Editor panels.
//!
//! Panels are plain functions over the state they edit; each returns the
//! intent the session acts on (a frame invalidation flag or a settings
//! patch). There is no panel hierarchy.

mod scene;
mod settings;
mod stats;
mod viewport;

pub use scene::scene_panel;
pub use settings::settings_panel;
pub use stats::{stats_panel, RenderStats};
pub use viewport::{viewport_panel, ViewportState};
