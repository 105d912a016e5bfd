//! Named color constants shared by scene defaults and the editor UI.

use glam::Vec3;

pub const WHITE: Vec3 = Vec3::new(1.0, 1.0, 1.0);
pub const BLACK: Vec3 = Vec3::new(0.0, 0.0, 0.0);
pub const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
pub const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const MAGENTA: Vec3 = Vec3::new(1.0, 0.0, 1.0);
pub const ORANGE: Vec3 = Vec3::new(0.8, 0.5, 0.2);
pub const SKY: Vec3 = Vec3::new(0.6, 0.7, 0.9);
