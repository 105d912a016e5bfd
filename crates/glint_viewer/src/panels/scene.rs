//! Scene editor panel: sky, lights, materials, spheres, and the camera
//! parameters.

use glint_core::{Light, Material, Scene, Sphere, Vec3};
use glint_renderer::Camera;

use crate::i18n::I18n;

/// Draw the scene editor. Returns true when anything that affects the
/// rendered image changed, so the session can reset accumulation.
pub fn scene_panel(
    ui: &mut egui::Ui,
    scene: &mut Scene,
    camera: &mut Camera,
    i18n: &I18n,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        ui.label(i18n.get("scene.name"));
        ui.text_edit_singleline(&mut scene.name);
    });

    ui.separator();

    ui.collapsing(i18n.get("scene.sky"), |ui| {
        changed |= ui
            .checkbox(&mut scene.sky.enabled, i18n.get("scene.enabled"))
            .changed();
        ui.horizontal(|ui| {
            ui.label(i18n.get("scene.color"));
            changed |= color_edit(ui, &mut scene.sky.color);
        });
    });

    ui.collapsing(i18n.get("scene.lights"), |ui| {
        let mut remove = None;
        for (index, light) in scene.lights.iter_mut().enumerate() {
            ui.push_id(index, |ui| {
                ui.horizontal(|ui| {
                    changed |= ui
                        .checkbox(&mut light.enabled, i18n.get("scene.enabled"))
                        .changed();
                    changed |= vec3_drag(ui, &mut light.position);
                    if ui.small_button(i18n.get("scene.remove")).clicked() {
                        remove = Some(index);
                    }
                });
            });
        }
        if let Some(index) = remove {
            scene.remove_light(index);
            changed = true;
        }
        if ui.button(i18n.get("scene.add_light")).clicked() {
            scene.lights.push(Light::default());
            changed = true;
        }
    });

    ui.collapsing(i18n.get("scene.materials"), |ui| {
        let mut remove = None;
        for (index, material) in scene.materials.iter_mut().enumerate() {
            ui.push_id(index, |ui| {
                changed |= material_editor(ui, material, i18n);
                if ui.small_button(i18n.get("scene.remove")).clicked() {
                    remove = Some(index);
                }
                ui.separator();
            });
        }
        if let Some(index) = remove {
            scene.remove_material(index);
            changed = true;
        }
        if ui.button(i18n.get("scene.add_material")).clicked() {
            scene.materials.push(Material {
                name: format!("Material {}", scene.materials.len()),
                ..Default::default()
            });
            changed = true;
        }
    });

    ui.collapsing(i18n.get("scene.spheres"), |ui| {
        let mut remove = None;
        let material_names: Vec<String> =
            scene.materials.iter().map(|m| m.name.clone()).collect();
        for (index, sphere) in scene.spheres.iter_mut().enumerate() {
            ui.push_id(index, |ui| {
                changed |= sphere_editor(ui, sphere, &material_names, i18n);
                if ui.small_button(i18n.get("scene.remove")).clicked() {
                    remove = Some(index);
                }
                ui.separator();
            });
        }
        if let Some(index) = remove {
            scene.remove_sphere(index);
            changed = true;
        }
        if ui.button(i18n.get("scene.add_sphere")).clicked() {
            scene.spheres.push(Sphere::default());
            changed = true;
        }
    });

    ui.collapsing(i18n.get("scene.camera"), |ui| {
        changed |= camera_editor(ui, camera, i18n);
    });

    changed
}

fn material_editor(ui: &mut egui::Ui, material: &mut Material, i18n: &I18n) -> bool {
    let mut changed = false;

    ui.text_edit_singleline(&mut material.name);
    ui.horizontal(|ui| {
        ui.label(i18n.get("scene.albedo"));
        changed |= color_edit(ui, &mut material.albedo);
    });
    changed |= ui
        .add(
            egui::Slider::new(&mut material.roughness, 0.0..=1.0)
                .text(i18n.get("scene.roughness")),
        )
        .changed();
    changed |= ui
        .add(
            egui::Slider::new(&mut material.metallic, 0.0..=1.0)
                .text(i18n.get("scene.metallic")),
        )
        .changed();
    ui.horizontal(|ui| {
        ui.label(i18n.get("scene.emission_color"));
        changed |= color_edit(ui, &mut material.emission_color);
    });
    changed |= ui
        .add(
            egui::DragValue::new(&mut material.emission_power)
                .speed(0.05)
                .range(0.0..=f32::INFINITY)
                .prefix(format!("{}: ", i18n.get("scene.emission_power"))),
        )
        .changed();

    changed
}

fn sphere_editor(
    ui: &mut egui::Ui,
    sphere: &mut Sphere,
    material_names: &[String],
    i18n: &I18n,
) -> bool {
    let mut changed = false;

    ui.horizontal(|ui| {
        changed |= ui
            .checkbox(&mut sphere.enabled, i18n.get("scene.enabled"))
            .changed();
        changed |= vec3_drag(ui, &mut sphere.position);
    });
    changed |= ui
        .add(
            egui::DragValue::new(&mut sphere.radius)
                .speed(0.05)
                .range(0.01..=f32::INFINITY)
                .prefix(format!("{}: ", i18n.get("scene.radius"))),
        )
        .changed();

    let selected_name = material_names
        .get(sphere.material_index)
        .map(String::as_str)
        .unwrap_or(i18n.get("scene.no_material"));
    egui::ComboBox::from_id_salt("material")
        .selected_text(selected_name)
        .show_ui(ui, |ui| {
            for (index, name) in material_names.iter().enumerate() {
                changed |= ui
                    .selectable_value(&mut sphere.material_index, index, name)
                    .changed();
            }
        });

    changed
}

fn camera_editor(ui: &mut egui::Ui, camera: &mut Camera, i18n: &I18n) -> bool {
    let mut data = camera.data().clone();
    let mut edited = false;

    ui.horizontal(|ui| {
        ui.label(i18n.get("scene.position"));
        edited |= vec3_drag(ui, &mut data.position);
    });
    edited |= ui
        .add(
            egui::Slider::new(&mut data.vertical_fov, 10.0..=120.0)
                .text(i18n.get("scene.vertical_fov")),
        )
        .changed();
    edited |= ui
        .add(
            egui::DragValue::new(&mut data.normal_movement_speed)
                .speed(0.1)
                .range(0.1..=f32::INFINITY)
                .prefix(format!("{}: ", i18n.get("scene.movement_speed"))),
        )
        .changed();
    edited |= ui
        .add(
            egui::DragValue::new(&mut data.fast_movement_speed)
                .speed(0.1)
                .range(0.1..=f32::INFINITY)
                .prefix(format!("{}: ", i18n.get("scene.fast_movement_speed"))),
        )
        .changed();
    edited |= ui
        .add(
            egui::DragValue::new(&mut data.rotation_speed)
                .speed(0.01)
                .range(0.01..=10.0)
                .prefix(format!("{}: ", i18n.get("scene.rotation_speed"))),
        )
        .changed();

    if edited {
        // Only position/FOV/clip changes invalidate the image.
        camera.set_data(data)
    } else {
        false
    }
}

fn color_edit(ui: &mut egui::Ui, color: &mut Vec3) -> bool {
    let mut rgb = color.to_array();
    let changed = ui.color_edit_button_rgb(&mut rgb).changed();
    if changed {
        *color = Vec3::from_array(rgb);
    }
    changed
}

fn vec3_drag(ui: &mut egui::Ui, value: &mut Vec3) -> bool {
    let mut changed = false;
    changed |= ui
        .add(egui::DragValue::new(&mut value.x).speed(0.05))
        .changed();
    changed |= ui
        .add(egui::DragValue::new(&mut value.y).speed(0.05))
        .changed();
    changed |= ui
        .add(egui::DragValue::new(&mut value.z).speed(0.05))
        .changed();
    changed
}
