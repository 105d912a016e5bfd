//! Interactive camera with a cached per-pixel ray-direction table.
//!
//! The camera never talks to the windowing layer; the host samples its
//! input devices into a [`CameraInput`] snapshot once per frame and hands
//! it to [`Camera::on_update`].

use glam::{Mat4, Quat, Vec2, Vec3, Vec4, Vec4Swizzles};

const MOUSE_SENSITIVITY: f32 = 0.002;

/// User-editable camera parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraData {
    pub position: Vec3,
    pub vertical_fov: f32,
    pub near_clip: f32,
    pub far_clip: f32,

    pub normal_movement_speed: f32,
    pub fast_movement_speed: f32,
    pub rotation_speed: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 6.0),
            vertical_fov: 45.0,
            near_clip: 0.1,
            far_clip: 100.0,
            normal_movement_speed: 5.0,
            fast_movement_speed: 10.0,
            rotation_speed: 0.3,
        }
    }
}

/// Per-frame input snapshot assembled by the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraInput {
    /// Raw mouse delta in pixels since the last frame.
    pub mouse_delta: Vec2,
    /// Secondary mouse button, the free-look trigger.
    pub look_held: bool,
    pub move_forward: bool,
    pub move_back: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Shift speed boost.
    pub boost: bool,
}

pub struct Camera {
    data: CameraData,

    projection: Mat4,
    view: Mat4,
    inverse_projection: Mat4,
    inverse_view: Mat4,

    forward_direction: Vec3,
    up_direction: Vec3,

    // Cached ray directions, one per pixel of the last-known viewport.
    ray_directions: Vec<Vec3>,

    viewport_width: u32,
    viewport_height: u32,
}

impl Camera {
    pub fn new(vertical_fov: f32, near_clip: f32, far_clip: f32) -> Self {
        let data = CameraData {
            vertical_fov,
            near_clip,
            far_clip,
            ..Default::default()
        };
        Self {
            data,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_projection: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            forward_direction: Vec3::NEG_Z,
            up_direction: Vec3::Y,
            ray_directions: Vec::new(),
            viewport_width: 0,
            viewport_height: 0,
        }
    }

    /// Consume one frame of input. Returns true iff the position or
    /// orientation changed, in which case the view matrix and the ray
    /// table were recomputed.
    ///
    /// Free look requires the look button; without it (or without viewport
    /// focus) the camera is inert and the host should release any pointer
    /// lock it holds.
    pub fn on_update(&mut self, input: &CameraInput, ts: f32, viewport_focused: bool) -> bool {
        if !input.look_held {
            return false;
        }
        if !viewport_focused {
            return false;
        }

        let mut moved = false;

        let right_direction = self.forward_direction.cross(self.up_direction);

        let speed = if input.boost {
            self.data.fast_movement_speed
        } else {
            self.data.normal_movement_speed
        };

        // Movement
        if input.move_forward {
            self.data.position += self.forward_direction * speed * ts;
            moved = true;
        } else if input.move_back {
            self.data.position -= self.forward_direction * speed * ts;
            moved = true;
        }

        if input.move_left {
            self.data.position -= right_direction * speed * ts;
            moved = true;
        } else if input.move_right {
            self.data.position += right_direction * speed * ts;
            moved = true;
        }

        if input.move_down {
            self.data.position -= self.up_direction * speed * ts;
            moved = true;
        } else if input.move_up {
            self.data.position += self.up_direction * speed * ts;
            moved = true;
        }

        // Rotation
        let delta = input.mouse_delta * MOUSE_SENSITIVITY;
        if delta != Vec2::ZERO {
            let pitch_delta = delta.y * self.data.rotation_speed;
            let yaw_delta = delta.x * self.data.rotation_speed;

            let q = (Quat::from_axis_angle(right_direction.normalize_or_zero(), -pitch_delta)
                * Quat::from_axis_angle(self.up_direction, -yaw_delta))
            .normalize();
            self.forward_direction = q * self.forward_direction;

            moved = true;
        }

        if moved {
            self.recalculate_view();
            self.recalculate_ray_directions();
        }

        moved
    }

    /// Adopt a new viewport size. No-op when unchanged; a zero-area
    /// viewport empties the ray table instead of dividing by zero.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.viewport_width && height == self.viewport_height {
            return;
        }

        self.viewport_width = width;
        self.viewport_height = height;

        if width == 0 || height == 0 {
            self.ray_directions.clear();
            return;
        }

        self.recalculate_projection();
        self.recalculate_view();
        self.recalculate_ray_directions();
    }

    pub fn position(&self) -> Vec3 {
        self.data.position
    }

    pub fn direction(&self) -> Vec3 {
        self.forward_direction
    }

    /// World-space ray direction per pixel, row-major, one per pixel of the
    /// current viewport.
    pub fn ray_directions(&self) -> &[Vec3] {
        &self.ray_directions
    }

    pub fn data(&self) -> &CameraData {
        &self.data
    }

    /// Replace the camera parameters. Returns true when the change affects
    /// rendered output (position, FOV, or clip planes), in which case the
    /// caches were recomputed and the host must reset accumulation.
    pub fn set_data(&mut self, data: CameraData) -> bool {
        let invalidating = data.position != self.data.position
            || data.vertical_fov != self.data.vertical_fov
            || data.near_clip != self.data.near_clip
            || data.far_clip != self.data.far_clip;

        self.data = data;

        if invalidating && self.viewport_width != 0 && self.viewport_height != 0 {
            self.recalculate_projection();
            self.recalculate_view();
            self.recalculate_ray_directions();
        }

        invalidating
    }

    fn recalculate_projection(&mut self) {
        let aspect = self.viewport_width as f32 / self.viewport_height as f32;
        self.projection = Mat4::perspective_rh_gl(
            self.data.vertical_fov.to_radians(),
            aspect,
            self.data.near_clip,
            self.data.far_clip,
        );
        self.inverse_projection = self.projection.inverse();
    }

    fn recalculate_view(&mut self) {
        self.view = Mat4::look_at_rh(
            self.data.position,
            self.data.position + self.forward_direction,
            self.up_direction,
        );
        self.inverse_view = self.view.inverse();
    }

    fn recalculate_ray_directions(&mut self) {
        let width = self.viewport_width;
        let height = self.viewport_height;
        if width == 0 || height == 0 {
            self.ray_directions.clear();
            return;
        }

        self.ray_directions
            .resize((width as usize) * (height as usize), Vec3::ZERO);

        for y in 0..height {
            for x in 0..width {
                let mut coord = Vec2::new(x as f32 / width as f32, y as f32 / height as f32);
                coord = coord * 2.0 - 1.0; // -1 -> 1

                let target = self.inverse_projection * Vec4::new(coord.x, coord.y, 1.0, 1.0);
                let direction_view = (target.xyz() / target.w).normalize();
                // World space; rotation-only effect on a direction.
                let direction = (self.inverse_view * direction_view.extend(0.0)).xyz();
                self.ray_directions[(x + y * width) as usize] = direction;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resized_camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(width, height);
        camera
    }

    fn look_input() -> CameraInput {
        CameraInput {
            look_held: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ray_table_matches_viewport() {
        let camera = resized_camera(16, 9);
        assert_eq!(camera.ray_directions().len(), 16 * 9);
        for direction in camera.ray_directions() {
            assert!((direction.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_center_ray_points_forward() {
        let camera = resized_camera(64, 64);
        let center = camera.ray_directions()[(32 + 32 * 64) as usize];
        assert!((center - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_zero_viewport_is_tolerated() {
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(0, 480);
        assert!(camera.ray_directions().is_empty());
        camera.on_resize(640, 0);
        assert!(camera.ray_directions().is_empty());
    }

    #[test]
    fn test_no_look_button_means_no_movement() {
        let mut camera = resized_camera(8, 8);
        let input = CameraInput {
            move_forward: true,
            ..Default::default()
        };
        let before = camera.position();
        assert!(!camera.on_update(&input, 0.016, true));
        assert_eq!(camera.position(), before);
    }

    #[test]
    fn test_unfocused_viewport_means_no_movement() {
        let mut camera = resized_camera(8, 8);
        let input = CameraInput {
            move_forward: true,
            ..look_input()
        };
        assert!(!camera.on_update(&input, 0.016, false));
    }

    #[test]
    fn test_forward_key_moves_along_view_direction() {
        let mut camera = resized_camera(8, 8);
        let input = CameraInput {
            move_forward: true,
            ..look_input()
        };
        let before = camera.position();
        assert!(camera.on_update(&input, 0.5, true));
        let expected = before + Vec3::NEG_Z * camera.data().normal_movement_speed * 0.5;
        assert!((camera.position() - expected).length() < 1e-5);
    }

    #[test]
    fn test_boost_uses_fast_speed() {
        let mut camera = resized_camera(8, 8);
        let input = CameraInput {
            move_forward: true,
            boost: true,
            ..look_input()
        };
        let before = camera.position();
        camera.on_update(&input, 1.0, true);
        let travelled = (camera.position() - before).length();
        assert!((travelled - camera.data().fast_movement_speed).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_delta_rotates_and_invalidates_rays() {
        let mut camera = resized_camera(8, 8);
        let first_ray_before = camera.ray_directions()[0];
        let input = CameraInput {
            mouse_delta: Vec2::new(40.0, 0.0),
            ..look_input()
        };
        assert!(camera.on_update(&input, 0.016, true));
        assert!((camera.direction().length() - 1.0).abs() < 1e-4);
        assert!(camera.direction() != Vec3::NEG_Z);
        assert!(camera.ray_directions()[0] != first_ray_before);
    }

    #[test]
    fn test_set_data_reports_invalidation() {
        let mut camera = resized_camera(8, 8);

        let mut data = camera.data().clone();
        data.normal_movement_speed = 2.0;
        assert!(!camera.set_data(data));

        let mut data = camera.data().clone();
        data.position.x += 1.0;
        assert!(camera.set_data(data));

        let mut data = camera.data().clone();
        data.vertical_fov = 60.0;
        assert!(camera.set_data(data));
    }
}
