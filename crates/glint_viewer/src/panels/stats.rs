//! Render statistics panel.

use crate::i18n::I18n;

#[derive(Clone, Copy, Debug, Default)]
pub struct RenderStats {
    pub last_render_ms: f32,
    pub frame_index: u32,
    pub render_size: (u32, u32),
    pub viewport_size: (u32, u32),
}

pub fn stats_panel(ui: &mut egui::Ui, stats: &RenderStats, i18n: &I18n) {
    ui.label(format!(
        "{}: {:.2} ms",
        i18n.get("stats.last_render"),
        stats.last_render_ms
    ));
    ui.label(format!(
        "{}: {}",
        i18n.get("stats.frame_index"),
        stats.frame_index
    ));
    ui.separator();
    ui.label(format!(
        "{}: {}x{}",
        i18n.get("stats.render_resolution"),
        stats.render_size.0,
        stats.render_size.1
    ));
    ui.label(format!(
        "{}: {}x{}",
        i18n.get("stats.viewport_resolution"),
        stats.viewport_size.0,
        stats.viewport_size.1
    ));
}
