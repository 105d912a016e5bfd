//! Scene file IO.
//!
//! Scenes are stored as pretty-printed JSON. Deserialization either
//! repopulates every field the renderer depends on or fails with an
//! explicit error; there is no partial state.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::scene::Scene;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("scene file IO failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Write a scene to disk, creating parent directories as needed.
pub fn save_scene(scene: &Scene, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(scene)?;
    fs::write(path, json)?;
    log::info!("Saved scene '{}' to {}", scene.name, path.display());
    Ok(())
}

pub fn load_scene(path: impl AsRef<Path>) -> Result<Scene, PersistenceError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let scene = serde_json::from_str(&json)?;
    log::info!("Loaded scene from {}", path.display());
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, Material, Sphere};
    use glam::Vec3;

    fn sample_scene() -> Scene {
        let mut scene = Scene::new("RoundTrip");
        scene.sky.enabled = false;
        scene.sky.color = Vec3::new(0.25, 0.5, 0.75);
        scene.lights.push(Light {
            enabled: false,
            position: Vec3::new(1.5, -2.0, 3.25),
        });
        scene.materials.push(Material {
            name: "Pink".into(),
            albedo: Vec3::new(1.0, 0.0, 1.0),
            roughness: 0.125,
            metallic: 0.5,
            emission_color: Vec3::new(0.9, 0.3, 0.1),
            emission_power: 2.5,
        });
        scene.spheres.push(Sphere {
            enabled: true,
            position: Vec3::new(0.0, -101.0, 0.0),
            radius: 100.0,
            material_index: 0,
        });
        scene
    }

    #[test]
    fn test_scene_round_trip_is_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let scene = sample_scene();
        save_scene(&scene, &path).unwrap();
        let loaded = load_scene(&path).unwrap();

        // Field-exact, including bit-exact floats that were never
        // arithmetically transformed.
        assert_eq!(scene, loaded);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_scene(dir.path().join("nope.json"));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ \"name\": \"x\"").unwrap();
        let result = load_scene(&path);
        assert!(matches!(result, Err(PersistenceError::Format(_))));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/scene.json");
        save_scene(&sample_scene(), &path).unwrap();
        assert!(path.exists());
    }
}
