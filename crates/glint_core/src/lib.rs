//! Core scene types for Glint.
//!
//! This crate defines the plain-data scene description the renderer
//! consumes (spheres, materials, lights, sky) and its on-disk JSON form.
//! It has no rendering behavior of its own beyond value equality.

pub mod color;
mod persistence;
mod scene;

pub use persistence::{load_scene, save_scene, PersistenceError};
pub use scene::{Light, Material, Scene, Sky, Sphere};

/// Re-export the math types the data model is built from.
pub use glam::Vec3;
