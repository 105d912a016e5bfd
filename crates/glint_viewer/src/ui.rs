//! Per-frame UI assembly: menu bar, editor panels, modals, then the
//! render pass for the next frame's viewport image.

use glint_renderer::SettingsPatch;

use crate::modals::{self, ExitChoice};
use crate::panels::{self, RenderStats};
use crate::session::Session;

pub fn draw(ctx: &egui::Context, session: &mut Session) {
    handle_shortcuts(ctx, session);
    menu_bar(ctx, session);

    if session.show_scene_panel {
        let mut invalidated = false;
        egui::Window::new(session.i18n.get("panel.scene"))
            .open(&mut session.show_scene_panel)
            .default_width(320.0)
            .vscroll(true)
            .show(ctx, |ui| {
                invalidated = panels::scene_panel(
                    ui,
                    &mut session.scene,
                    &mut session.camera,
                    &session.i18n,
                );
            });
        if invalidated {
            session.renderer.reset_frame_index();
        }
    }

    if session.show_settings_panel {
        let mut patch: Option<SettingsPatch> = None;
        egui::Window::new(session.i18n.get("panel.settings"))
            .open(&mut session.show_settings_panel)
            .default_width(260.0)
            .show(ctx, |ui| {
                patch = Some(panels::settings_panel(
                    ui,
                    session.renderer.settings(),
                    &session.i18n,
                ));
            });
        if let Some(patch) = patch {
            if !patch.is_empty() {
                // The renderer resets accumulation itself when needed.
                session.renderer.apply_settings_patch(patch);
            }
        }
    }

    if session.show_stats_panel {
        let stats = RenderStats {
            last_render_ms: session.last_render_time_ms,
            frame_index: session.renderer.frame_index(),
            render_size: session.renderer.render_size(),
            viewport_size: (session.viewport.width, session.viewport.height),
        };
        egui::Window::new(session.i18n.get("panel.stats"))
            .open(&mut session.show_stats_panel)
            .default_width(220.0)
            .show(ctx, |ui| {
                panels::stats_panel(ui, &stats, &session.i18n);
            });
    }

    if session.show_viewport_panel {
        let texture = session.viewport_texture.clone();
        let mut viewport = session.viewport;
        egui::CentralPanel::default().show(ctx, |ui| {
            viewport = panels::viewport_panel(ui, texture.as_ref(), &session.i18n);
        });
        session.viewport = viewport;
    } else {
        session.viewport.focused = false;
    }

    if let Some(name) = modals::new_scene_modal(ctx, &mut session.modals, &session.i18n) {
        session.new_scene(name);
    }
    modals::about_modal(ctx, &mut session.modals, &session.i18n);
    modals::controls_modal(ctx, &mut session.modals, &session.i18n);
    if let Some(choice) = modals::close_confirmation_modal(ctx, &mut session.modals, &session.i18n)
    {
        match choice {
            ExitChoice::SaveAndExit => {
                session.save_scene();
                session.request_exit();
            }
            ExitChoice::ExitWithoutSaving => session.request_exit(),
        }
    }

    session.render_frame(ctx);
}

fn handle_shortcuts(ctx: &egui::Context, session: &mut Session) {
    let (new_scene, save) = ctx.input(|i| {
        (
            i.modifiers.command && i.key_pressed(egui::Key::N),
            i.modifiers.command && i.key_pressed(egui::Key::S),
        )
    });
    if new_scene {
        session.modals.new_scene_open = true;
    }
    if save {
        session.save_scene();
    }
}

fn menu_bar(ctx: &egui::Context, session: &mut Session) {
    // Labels are owned up front so the menus below can borrow the whole
    // session mutably.
    let file_label = session.i18n.get("menu.file").to_string();
    let new_label = session.i18n.get("menu.file.new_scene").to_string();
    let save_label = session.i18n.get("menu.file.save_scene").to_string();
    let load_label = session.i18n.get("menu.file.load_scene").to_string();
    let default_label = session.i18n.get("menu.file.default_scene").to_string();
    let exit_label = session.i18n.get("menu.file.exit").to_string();
    let view_label = session.i18n.get("menu.view").to_string();
    let show_scene = session.i18n.get("menu.view.scene").to_string();
    let show_settings = session.i18n.get("menu.view.settings").to_string();
    let show_stats = session.i18n.get("menu.view.stats").to_string();
    let show_viewport = session.i18n.get("menu.view.viewport").to_string();
    let export_label = session.i18n.get("menu.export").to_string();
    let export_image_label = session.i18n.get("menu.export.image").to_string();
    let help_label = session.i18n.get("menu.help").to_string();
    let about_label = session.i18n.get("menu.help.about").to_string();
    let controls_label = session.i18n.get("menu.help.controls").to_string();

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(&file_label, |ui| {
                if ui.button(&new_label).clicked() {
                    session.modals.new_scene_open = true;
                    ui.close_menu();
                }
                if ui.button(&save_label).clicked() {
                    session.save_scene();
                    ui.close_menu();
                }
                ui.menu_button(&load_label, |ui| {
                    if ui.button(&default_label).clicked() {
                        session.load_default_scene();
                        ui.close_menu();
                    }
                    let scenes = session.list_scenes();
                    if !scenes.is_empty() {
                        ui.separator();
                    }
                    for name in scenes {
                        if ui.button(&name).clicked() {
                            session.load_scene(&name);
                            ui.close_menu();
                        }
                    }
                });
                ui.separator();
                if ui.button(&exit_label).clicked() {
                    if session.unsaved_changes() {
                        session.modals.close_confirmation_open = true;
                    } else {
                        session.request_exit();
                    }
                    ui.close_menu();
                }
            });

            ui.menu_button(&view_label, |ui| {
                ui.checkbox(&mut session.show_scene_panel, &show_scene);
                ui.checkbox(&mut session.show_settings_panel, &show_settings);
                ui.checkbox(&mut session.show_stats_panel, &show_stats);
                ui.checkbox(&mut session.show_viewport_panel, &show_viewport);
            });

            ui.menu_button(&export_label, |ui| {
                if ui.button(&export_image_label).clicked() {
                    session.export_image();
                    ui.close_menu();
                }
            });

            ui.menu_button(&help_label, |ui| {
                if ui.button(&about_label).clicked() {
                    session.modals.about_open = true;
                    ui.close_menu();
                }
                if ui.button(&controls_label).clicked() {
                    session.modals.controls_open = true;
                    ui.close_menu();
                }
            });
        });
    });
}
