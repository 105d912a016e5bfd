//! Top-level editor session.
//!
//! The session is the single owner of the scene, camera, renderer, and UI
//! state. Panels receive views of that state one call at a time and hand
//! back intents; the session applies them and keeps the accumulation
//! reset rule in one place.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use glint_core::{color, Material, Scene, Sphere, Vec3};
use glint_renderer::{Camera, CameraInput, Renderer, Settings, SettingsPatch};

use crate::export;
use crate::i18n::{I18n, DEFAULT_LANGUAGE};
use crate::modals::ModalState;
use crate::panels::ViewportState;

pub const SCENES_DIR: &str = "scenes";
pub const EXPORTS_DIR: &str = "exports";
pub const DEFAULT_SCENE_NAME: &str = "Default";
pub const SETTINGS_FILE: &str = "settings.json";

pub struct Session {
    pub scene: Scene,
    /// Snapshot of the scene as last saved/loaded, for unsaved-changes
    /// detection.
    loaded_scene: Scene,
    pub camera: Camera,
    pub renderer: Renderer,
    pub i18n: I18n,

    pub modals: ModalState,
    pub show_scene_panel: bool,
    pub show_settings_panel: bool,
    pub show_stats_panel: bool,
    pub show_viewport_panel: bool,

    pub viewport: ViewportState,
    pub viewport_texture: Option<egui::TextureHandle>,
    pub last_render_time_ms: f32,

    exit_requested: bool,
}

impl Session {
    pub fn new() -> Self {
        let i18n = I18n::load(DEFAULT_LANGUAGE).unwrap_or_else(|err| {
            log::warn!("Falling back to untranslated UI strings: {err:#}");
            I18n::fallback()
        });

        let mut renderer = Renderer::new();
        match load_settings() {
            Ok(Some(settings)) => {
                renderer.apply_settings_patch(SettingsPatch::from(settings));
                log::info!("Restored renderer settings from {SETTINGS_FILE}");
            }
            Ok(None) => {}
            Err(err) => log::warn!("Ignoring unreadable {SETTINGS_FILE}: {err:#}"),
        }

        let scene = glint_core::load_scene(scene_path(DEFAULT_SCENE_NAME)).unwrap_or_else(|err| {
            log::warn!("Default scene unavailable ({err}); using the built-in scene");
            built_in_default_scene()
        });

        Self {
            loaded_scene: scene.clone(),
            scene,
            camera: Camera::new(45.0, 0.1, 1000.0),
            renderer,
            i18n,
            modals: ModalState::default(),
            show_scene_panel: true,
            show_settings_panel: true,
            show_stats_panel: true,
            show_viewport_panel: true,
            viewport: ViewportState::default(),
            viewport_texture: None,
            last_render_time_ms: 0.0,
            exit_requested: false,
        }
    }

    /// Per-frame pre-UI update: feed the clock and the camera. A camera
    /// move invalidates accumulation.
    pub fn on_update(&mut self, input: &CameraInput, ts: f32, elapsed_seconds: f32) {
        self.renderer.set_time(elapsed_seconds);
        if self.camera.on_update(input, ts, self.viewport.focused) {
            self.renderer.reset_frame_index();
        }
    }

    /// Trace one frame at the size the viewport reported last pass and
    /// publish it as an egui texture.
    pub fn render_frame(&mut self, ctx: &egui::Context) {
        let start = Instant::now();

        self.renderer.on_resize(self.viewport.width, self.viewport.height);
        let (width, height) = self.renderer.render_size();
        self.camera.on_resize(width, height);

        self.renderer.render(&self.scene, &self.camera);

        self.last_render_time_ms = start.elapsed().as_secs_f32() * 1000.0;

        if width == 0 || height == 0 {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width as usize, height as usize],
            bytemuck::cast_slice(self.renderer.image_data()),
        );
        let options = egui::TextureOptions::LINEAR;
        match &mut self.viewport_texture {
            Some(texture) => texture.set(image, options),
            None => {
                self.viewport_texture = Some(ctx.load_texture("viewport", image, options));
            }
        }
    }

    pub fn viewport_focused(&self) -> bool {
        self.viewport.focused
    }

    pub fn unsaved_changes(&self) -> bool {
        self.scene != self.loaded_scene
    }

    pub fn new_scene(&mut self, name: String) {
        self.scene = Scene::new(name);
        self.loaded_scene = self.scene.clone();
        self.renderer.reset_frame_index();
    }

    pub fn save_scene(&mut self) {
        if let Err(err) = glint_core::save_scene(&self.scene, scene_path(&self.scene.name)) {
            log::warn!("Failed to save scene '{}': {err}", self.scene.name);
            return;
        }
        self.loaded_scene = self.scene.clone();
    }

    pub fn load_scene(&mut self, name: &str) {
        match glint_core::load_scene(scene_path(name)) {
            Ok(scene) => {
                self.loaded_scene = scene.clone();
                self.scene = scene;
                self.renderer.reset_frame_index();
            }
            Err(err) => log::warn!("Failed to load scene '{name}': {err}"),
        }
    }

    pub fn load_default_scene(&mut self) {
        self.load_scene(DEFAULT_SCENE_NAME);
    }

    /// Names of every saved scene besides the default, sorted.
    pub fn list_scenes(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(SCENES_DIR) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        if stem != DEFAULT_SCENE_NAME {
                            names.push(stem.to_string());
                        }
                    }
                }
            }
        }
        names.sort();
        names
    }

    pub fn export_image(&self) {
        let path = PathBuf::from(EXPORTS_DIR).join(format!("{}.png", self.scene.name));
        if let Err(err) = export::export_image(&self.renderer, &path) {
            log::warn!("Image export failed: {err:#}");
        }
    }

    pub fn save_settings(&self) {
        if let Err(err) = save_settings(self.renderer.settings()) {
            log::warn!("Failed to save renderer settings: {err:#}");
        }
    }

    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }
}

fn scene_path(name: &str) -> PathBuf {
    PathBuf::from(SCENES_DIR).join(format!("{name}.json"))
}

fn load_settings() -> Result<Option<Settings>> {
    let path = std::path::Path::new(SETTINGS_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path).context("reading settings file")?;
    let settings = serde_json::from_str(&json).context("parsing settings file")?;
    Ok(Some(settings))
}

fn save_settings(settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(SETTINGS_FILE, json).context("writing settings file")?;
    log::info!("Saved renderer settings to {SETTINGS_FILE}");
    Ok(())
}

/// Fallback scene when no default file exists: a diffuse ball on a large
/// ground sphere with an emissive companion.
fn built_in_default_scene() -> Scene {
    let mut scene = Scene::new(DEFAULT_SCENE_NAME);

    scene.materials.push(Material {
        name: "Pink".into(),
        albedo: color::MAGENTA,
        roughness: 0.0,
        ..Default::default()
    });
    scene.materials.push(Material {
        name: "Ground".into(),
        albedo: Vec3::new(0.2, 0.3, 1.0),
        roughness: 0.1,
        ..Default::default()
    });
    scene.materials.push(Material {
        name: "Sun".into(),
        albedo: color::ORANGE,
        roughness: 0.1,
        emission_color: color::ORANGE,
        emission_power: 2.0,
        ..Default::default()
    });

    scene.spheres.push(Sphere {
        position: Vec3::new(0.0, 0.0, 0.0),
        radius: 1.0,
        material_index: 0,
        ..Default::default()
    });
    scene.spheres.push(Sphere {
        position: Vec3::new(0.0, -101.0, 0.0),
        radius: 100.0,
        material_index: 1,
        ..Default::default()
    });
    scene.spheres.push(Sphere {
        position: Vec3::new(2.0, 0.0, 2.0),
        radius: 1.0,
        material_index: 2,
        ..Default::default()
    });

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_built_in_scene_references_are_valid() {
        let scene = built_in_default_scene();
        for sphere in &scene.spheres {
            assert!(scene.material_for(sphere.material_index).is_some());
            assert!(sphere.material_index < scene.materials.len());
        }
    }

    #[test]
    fn test_built_in_scene_renders() {
        let scene = built_in_default_scene();
        let mut renderer = Renderer::new();
        renderer.on_resize(8, 8);
        let (width, height) = renderer.render_size();
        let mut camera = Camera::new(45.0, 0.1, 1000.0);
        camera.on_resize(width, height);

        renderer.render(&scene, &camera);
        // Sky plus an emissive sphere: the frame cannot be fully black.
        assert!(renderer.image_data().iter().any(|&p| p & 0x00ff_ffff != 0));
    }
}
