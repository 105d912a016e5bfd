//! Scene description types.
//!
//! Everything here is plain data with value equality. The renderer reads
//! the scene by shared reference each frame; the editor panels mutate it
//! between frames through the owning session.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color;

/// Background sky. Rays that miss every sphere resolve to `color` when
/// enabled and to black otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sky {
    pub enabled: bool,
    pub color: Vec3,
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            enabled: true,
            color: color::SKY,
        }
    }
}

/// A point light placed in the scene.
///
/// Lights are editor/scene metadata only: the bounce loop is driven purely
/// by material emission and no direct-lighting term is evaluated. They are
/// kept in the model so scenes carry them through save/load and the editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub enabled: bool,
    pub position: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            enabled: true,
            position: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

/// Surface description referenced by spheres through `material_index`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Base reflected color, RGB in [0,1].
    pub albedo: Vec3,
    /// 0 = perfect mirror, 1 = fully diffuse scatter.
    pub roughness: f32,
    pub metallic: f32,
    pub emission_color: Vec3,
    pub emission_power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("Material"),
            albedo: color::WHITE,
            roughness: 1.0,
            metallic: 0.0,
            emission_color: color::BLACK,
            emission_power: 0.0,
        }
    }
}

impl Material {
    /// Radiance this material adds at a hit point.
    pub fn emission(&self) -> Vec3 {
        self.emission_color * self.emission_power
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub enabled: bool,
    pub position: Vec3,
    pub radius: f32,
    pub material_index: usize,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            enabled: true,
            position: Vec3::ZERO,
            radius: 0.5,
            material_index: 0,
        }
    }
}

/// A complete editable scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Used for save/export paths only.
    pub name: String,
    pub sky: Sky,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
    pub spheres: Vec<Sphere>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            name: String::from("Default"),
            sky: Sky::default(),
            lights: Vec::new(),
            materials: Vec::new(),
            spheres: Vec::new(),
        }
    }
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Resolve a sphere's material index.
    ///
    /// Out-of-range indices clamp to the last material, so a sphere whose
    /// material was deleted keeps rendering with a defined fallback.
    /// Returns `None` only when the scene has no materials at all, in which
    /// case spheres are not intersectable.
    pub fn material_for(&self, index: usize) -> Option<&Material> {
        match self.materials.len() {
            0 => None,
            len => Some(&self.materials[index.min(len - 1)]),
        }
    }

    /// Remove a material, keeping the surviving sphere references valid.
    ///
    /// Spheres referencing a later material have their index shifted down;
    /// spheres referencing the removed slot are left to the clamp policy of
    /// [`Scene::material_for`].
    pub fn remove_material(&mut self, index: usize) {
        if index >= self.materials.len() {
            return;
        }
        self.materials.remove(index);
        for sphere in &mut self.spheres {
            if sphere.material_index > index {
                sphere.material_index -= 1;
            }
        }
    }

    pub fn remove_sphere(&mut self, index: usize) {
        if index < self.spheres.len() {
            self.spheres.remove(index);
        }
    }

    pub fn remove_light(&mut self, index: usize) {
        if index < self.lights.len() {
            self.lights.remove(index);
        }
    }
}
