//! Render settings panel.
//!
//! Edits a draft copy of the settings and emits a patch of only the
//! fields that actually changed; the renderer decides what invalidates.

use glint_renderer::{Settings, SettingsPatch, MAX_RESOLUTION_SCALE, MIN_RAY_BOUNCES, MIN_RESOLUTION_SCALE};

use crate::i18n::I18n;

pub fn settings_panel(ui: &mut egui::Ui, settings: &Settings, i18n: &I18n) -> SettingsPatch {
    let mut draft = settings.clone();
    let mut patch = SettingsPatch::default();

    if ui
        .checkbox(&mut draft.accumulate, i18n.get("settings.accumulate"))
        .changed()
    {
        patch.accumulate = Some(draft.accumulate);
    }
    if ui
        .checkbox(&mut draft.multithreading, i18n.get("settings.multithreading"))
        .changed()
    {
        patch.multithreading = Some(draft.multithreading);
    }

    ui.separator();

    if ui
        .checkbox(&mut draft.fast_random, i18n.get("settings.fast_random"))
        .changed()
    {
        patch.fast_random = Some(draft.fast_random);
    }
    ui.add_enabled_ui(draft.fast_random, |ui| {
        if ui
            .checkbox(&mut draft.use_clock_time, i18n.get("settings.use_clock_time"))
            .changed()
        {
            patch.use_clock_time = Some(draft.use_clock_time);
        }
        if ui
            .checkbox(&mut draft.use_frame_index, i18n.get("settings.use_frame_index"))
            .changed()
        {
            patch.use_frame_index = Some(draft.use_frame_index);
        }
        if ui
            .checkbox(&mut draft.use_ray_bounces, i18n.get("settings.use_ray_bounces"))
            .changed()
        {
            patch.use_ray_bounces = Some(draft.use_ray_bounces);
        }
    });

    ui.separator();

    if ui
        .add(
            egui::Slider::new(&mut draft.ray_bounces, MIN_RAY_BOUNCES..=32)
                .text(i18n.get("settings.ray_bounces")),
        )
        .changed()
    {
        patch.ray_bounces = Some(draft.ray_bounces);
    }
    if ui
        .add(
            egui::Slider::new(
                &mut draft.resolution_scale,
                MIN_RESOLUTION_SCALE..=MAX_RESOLUTION_SCALE,
            )
            .text(i18n.get("settings.resolution_scale"))
            .suffix("%"),
        )
        .changed()
    {
        patch.resolution_scale = Some(draft.resolution_scale);
    }

    patch
}
