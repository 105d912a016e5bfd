//! Modal dialogs: new scene, controls, about, close confirmation.

use crate::i18n::I18n;

#[derive(Default)]
pub struct ModalState {
    pub about_open: bool,
    pub controls_open: bool,
    pub new_scene_open: bool,
    pub new_scene_name: String,
    pub close_confirmation_open: bool,
}

/// What the user picked in the close-confirmation dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitChoice {
    SaveAndExit,
    ExitWithoutSaving,
}

fn centered_modal(title: &str) -> egui::Window<'_> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
}

/// Returns the chosen scene name once the user confirms.
pub fn new_scene_modal(
    ctx: &egui::Context,
    state: &mut ModalState,
    i18n: &I18n,
) -> Option<String> {
    if !state.new_scene_open {
        return None;
    }

    let mut created = None;
    centered_modal(i18n.get("modal.new_scene")).show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(i18n.get("modal.new_scene.name"));
            ui.text_edit_singleline(&mut state.new_scene_name);
        });

        let name_missing = state.new_scene_name.trim().is_empty();
        ui.horizontal(|ui| {
            ui.add_enabled_ui(!name_missing, |ui| {
                if ui.button(i18n.get("modal.new_scene.create")).clicked() {
                    created = Some(state.new_scene_name.trim().to_string());
                    state.new_scene_name.clear();
                    state.new_scene_open = false;
                }
            });
            if ui.button(i18n.get("modal.cancel")).clicked() {
                state.new_scene_name.clear();
                state.new_scene_open = false;
            }
        });
    });

    created
}

pub fn about_modal(ctx: &egui::Context, state: &mut ModalState, i18n: &I18n) {
    if !state.about_open {
        return;
    }
    let mut open = state.about_open;
    egui::Window::new(i18n.get("modal.about"))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(i18n.get("modal.about.text"));
            ui.label(format!(
                "{}: {}",
                i18n.get("modal.about.version"),
                env!("CARGO_PKG_VERSION")
            ));
        });
    state.about_open = open;
}

pub fn controls_modal(ctx: &egui::Context, state: &mut ModalState, i18n: &I18n) {
    if !state.controls_open {
        return;
    }
    let mut open = state.controls_open;
    egui::Window::new(i18n.get("modal.controls"))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .show(ctx, |ui| {
            ui.label(i18n.get("modal.controls.look"));
            ui.label(i18n.get("modal.controls.move"));
            ui.label(i18n.get("modal.controls.vertical"));
            ui.label(i18n.get("modal.controls.boost"));
        });
    state.controls_open = open;
}

/// Shown when the user tries to exit with unsaved scene changes.
pub fn close_confirmation_modal(
    ctx: &egui::Context,
    state: &mut ModalState,
    i18n: &I18n,
) -> Option<ExitChoice> {
    if !state.close_confirmation_open {
        return None;
    }

    let mut choice = None;
    centered_modal(i18n.get("modal.close_confirmation")).show(ctx, |ui| {
        ui.label(i18n.get("modal.close_confirmation.text"));
        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button(i18n.get("modal.cancel")).clicked() {
                state.close_confirmation_open = false;
            }
            if ui.button(i18n.get("modal.close_confirmation.save_and_exit")).clicked() {
                choice = Some(ExitChoice::SaveAndExit);
                state.close_confirmation_open = false;
            }
            if ui
                .button(i18n.get("modal.close_confirmation.exit_without_saving"))
                .clicked()
            {
                choice = Some(ExitChoice::ExitWithoutSaving);
                state.close_confirmation_open = false;
            }
        });
    });

    choice
}
