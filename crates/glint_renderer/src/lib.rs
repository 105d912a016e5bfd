//! Glint CPU path tracer.
//!
//! Progressive, temporally accumulated sphere tracing with per-pixel
//! deterministic sampling and optional row-parallel dispatch.

mod camera;
mod ray;
pub mod rng;
mod renderer;
mod settings;

pub use camera::{Camera, CameraData, CameraInput};
pub use ray::Ray;
pub use renderer::{HitPayload, Renderer};
pub use settings::{Settings, SettingsPatch, MAX_RESOLUTION_SCALE, MIN_RAY_BOUNCES, MIN_RESOLUTION_SCALE};

/// Re-export the math types used throughout the renderer API.
pub use glam::{Vec2, Vec3, Vec4};
