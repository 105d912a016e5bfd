//! Progressive path tracing renderer.
//!
//! Per pixel: generate a ray from the camera's cached direction table,
//! bounce it through the sphere scene accumulating material emission, then
//! blend the result into a persistent accumulation buffer and quantize to
//! RGBA8. Rows are dispatched in parallel through rayon when enabled; the
//! sequential path produces bit-identical output.
//!
//! This is an emissive-only integrator: radiance comes from material
//! emission and the sky, attenuated by per-bounce albedo throughput. There
//! is no light sampling and no BRDF integral.

use glam::{Vec3, Vec4};
use glint_core::Scene;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::ray::Ray;
use crate::rng;
use crate::settings::{Settings, SettingsPatch};

/// Offset along the surface normal applied to secondary ray origins so a
/// bounce never re-intersects the surface it just left.
const SURFACE_OFFSET: f32 = 1e-4;

/// Result of a ray-scene intersection query.
#[derive(Debug, Clone, Copy)]
pub struct HitPayload {
    pub hit_distance: f32,
    pub world_position: Vec3,
    pub world_normal: Vec3,
    /// Index of the hit sphere in `Scene::spheres`.
    pub object_index: usize,
}

pub struct Renderer {
    settings: Settings,

    requested_width: u32,
    requested_height: u32,
    // Internal render size after applying the resolution scale.
    width: u32,
    height: u32,

    image_data: Vec<u32>,
    accumulation: Vec<Vec4>,

    frame_index: u32,
    time: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            requested_width: 0,
            requested_height: 0,
            width: 0,
            height: 0,
            image_data: Vec::new(),
            accumulation: Vec::new(),
            frame_index: 1,
            time: 0.0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Apply a partial settings update.
    ///
    /// Numeric fields are clamped into their valid ranges. When a field
    /// that changes rendered output was modified the frame index is reset
    /// here (and buffers reallocated for a resolution change); the return
    /// value tells the host whether that invalidation happened.
    /// `multithreading` is the only field that never invalidates.
    pub fn apply_settings_patch(&mut self, patch: SettingsPatch) -> bool {
        let previous = self.settings.clone();
        patch.apply_to(&mut self.settings);

        if self.settings.resolution_scale != previous.resolution_scale {
            self.reallocate();
        }

        let invalidating = {
            let s = &self.settings;
            s.accumulate != previous.accumulate
                || s.fast_random != previous.fast_random
                || s.use_clock_time != previous.use_clock_time
                || s.use_frame_index != previous.use_frame_index
                || s.use_ray_bounces != previous.use_ray_bounces
                || s.ray_bounces != previous.ray_bounces
                || s.resolution_scale != previous.resolution_scale
        };

        if invalidating {
            self.reset_frame_index();
        }

        invalidating
    }

    /// Adopt a new requested viewport size. No-op when unchanged.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == self.requested_width && height == self.requested_height {
            return;
        }

        self.requested_width = width;
        self.requested_height = height;
        self.reallocate();
    }

    /// Size the renderer actually renders at (viewport x resolution scale).
    /// The camera's ray table must be resized to this.
    pub fn render_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Quantized RGBA8 pixels of the last finished frame, packed
    /// little-endian (byte order r, g, b, a), row-major.
    pub fn image_data(&self) -> &[u32] {
        &self.image_data
    }

    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Restart accumulation. This is the only clear mechanism: the buffer
    /// is not zeroed because the next frame overwrites every slot at
    /// weight 1. Must be invoked whenever scene, camera, or any
    /// frame-invalidating setting changes.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    /// Wall-clock seconds mixed into per-pixel seeds when
    /// `use_clock_time` is set.
    pub fn set_time(&mut self, time: f32) {
        self.time = time;
    }

    /// Trace one frame and update the image buffer.
    ///
    /// Zero-area targets are a no-op, as is a camera whose ray table does
    /// not match the render size (the host resizes both together).
    pub fn render(&mut self, scene: &Scene, camera: &Camera) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let pixel_count = (self.width as usize) * (self.height as usize);
        if camera.ray_directions().len() != pixel_count {
            log::warn!(
                "camera ray table holds {} directions but the render target is {}x{}; skipping frame",
                camera.ray_directions().len(),
                self.width,
                self.height
            );
            return;
        }

        let frame = FrameContext {
            scene,
            camera,
            settings: &self.settings,
            frame_index: self.frame_index,
            time: self.time,
            width: self.width,
        };

        let width = self.width as usize;
        let accumulation = &mut self.accumulation;
        let image_data = &mut self.image_data;

        if self.settings.multithreading {
            accumulation
                .par_chunks_mut(width)
                .zip(image_data.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (accumulation_row, image_row))| {
                    frame.render_row(y as u32, accumulation_row, image_row);
                });
        } else {
            for (y, (accumulation_row, image_row)) in accumulation
                .chunks_mut(width)
                .zip(image_data.chunks_mut(width))
                .enumerate()
            {
                frame.render_row(y as u32, accumulation_row, image_row);
            }
        }

        if self.settings.accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }
    }

    fn reallocate(&mut self) {
        let (width, height) = scaled_size(
            self.requested_width,
            self.requested_height,
            self.settings.resolution_scale,
        );
        self.width = width;
        self.height = height;

        let pixel_count = (width as usize) * (height as usize);
        self.image_data = vec![0; pixel_count];
        self.accumulation = vec![Vec4::ZERO; pixel_count];
        self.reset_frame_index();
    }
}

fn scaled_size(width: u32, height: u32, resolution_scale: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }
    (
        (width * resolution_scale / 100).max(1),
        (height * resolution_scale / 100).max(1),
    )
}

/// Immutable per-frame state shared by every row worker.
struct FrameContext<'a> {
    scene: &'a Scene,
    camera: &'a Camera,
    settings: &'a Settings,
    frame_index: u32,
    time: f32,
    width: u32,
}

impl FrameContext<'_> {
    fn render_row(&self, y: u32, accumulation_row: &mut [Vec4], image_row: &mut [u32]) {
        for x in 0..self.width {
            let color = self.per_pixel(x, y);

            let slot = &mut accumulation_row[x as usize];
            if self.settings.accumulate && self.frame_index > 1 {
                *slot += color;
            } else {
                *slot = color;
            }

            let averaged = *slot / self.frame_index as f32;
            image_row[x as usize] = pack_rgba(averaged);
        }
    }

    /// Ray generation plus the bounce loop for one pixel.
    fn per_pixel(&self, x: u32, y: u32) -> Vec4 {
        let pixel_index = x + y * self.width;

        let mut ray = Ray::new(
            self.camera.position(),
            self.camera.ray_directions()[pixel_index as usize],
        );

        let mut seed = self.compose_seed(pixel_index);
        let mut slow_rng = (!self.settings.fast_random)
            .then(|| SmallRng::seed_from_u64(u64::from(seed)));

        let mut light = Vec3::ZERO;
        let mut throughput = Vec3::ONE;

        for bounce in 0..self.settings.ray_bounces {
            if self.settings.fast_random && self.settings.use_ray_bounces {
                seed = seed.wrapping_add(bounce);
            }

            let Some(payload) = trace_ray(self.scene, &ray) else {
                if self.scene.sky.enabled {
                    light += self.scene.sky.color * throughput;
                }
                break;
            };

            let sphere = &self.scene.spheres[payload.object_index];
            // trace_ray only reports hits while materials exist, so the
            // clamp policy always resolves here.
            let Some(material) = self.scene.material_for(sphere.material_index) else {
                break;
            };

            light += material.emission() * throughput;
            throughput *= material.albedo;

            let jitter = match slow_rng.as_mut() {
                Some(rng) => rng::in_unit_sphere_with(rng),
                None => rng::in_unit_sphere(&mut seed),
            };
            let diffuse = (payload.world_normal + jitter).normalize();
            let mirror = reflect(ray.direction(), payload.world_normal);

            ray = Ray::new(
                payload.world_position + payload.world_normal * SURFACE_OFFSET,
                mirror.lerp(diffuse, material.roughness).normalize(),
            );
        }

        light.extend(1.0)
    }

    /// Per-pixel seed from pixel index plus the sources enabled in the
    /// settings. With the clock flag off the seed is a pure function of
    /// pixel and frame, making renders reproducible across runs.
    fn compose_seed(&self, pixel_index: u32) -> u32 {
        let mut seed = pixel_index;
        if self.settings.use_clock_time {
            seed ^= self.time.to_bits();
        }
        if self.settings.use_frame_index {
            seed = seed.wrapping_mul(self.frame_index);
        }
        seed
    }
}

/// Nearest-hit query against every enabled sphere.
///
/// Brute-force linear scan with the analytic quadratic; the smallest
/// strictly-positive root wins, ties going to the lowest sphere index.
/// Returns `None` on a miss, and unconditionally when the scene has no
/// materials (spheres are then not intersectable).
fn trace_ray(scene: &Scene, ray: &Ray) -> Option<HitPayload> {
    if scene.materials.is_empty() {
        return None;
    }

    let mut nearest: Option<(usize, f32)> = None;

    for (index, sphere) in scene.spheres.iter().enumerate() {
        if !sphere.enabled {
            continue;
        }

        let origin = ray.origin() - sphere.position;

        let a = ray.direction().length_squared();
        let b = 2.0 * origin.dot(ray.direction());
        let c = origin.length_squared() - sphere.radius * sphere.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            continue;
        }

        let closest_t = (-b - discriminant.sqrt()) / (2.0 * a);
        if closest_t <= 0.0 {
            continue;
        }

        match nearest {
            Some((_, best)) if closest_t >= best => {}
            _ => nearest = Some((index, closest_t)),
        }
    }

    nearest.map(|(object_index, hit_distance)| closest_hit(scene, ray, hit_distance, object_index))
}

fn closest_hit(scene: &Scene, ray: &Ray, hit_distance: f32, object_index: usize) -> HitPayload {
    let sphere = &scene.spheres[object_index];

    let origin = ray.origin() - sphere.position;
    let hit_point = origin + ray.direction() * hit_distance;
    let world_normal = hit_point.normalize();

    HitPayload {
        hit_distance,
        world_position: hit_point + sphere.position,
        world_normal,
        object_index,
    }
}

#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Clamp to [0,1], quantize to 8 bits per channel, pack as r|g|b|a in
/// little-endian byte order.
#[inline]
fn pack_rgba(color: Vec4) -> u32 {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    (c.x as u32) | (c.y as u32) << 8 | (c.z as u32) << 16 | (c.w as u32) << 24
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsPatch;
    use glint_core::{Light, Material, Sphere};

    fn deterministic_settings() -> SettingsPatch {
        SettingsPatch {
            use_clock_time: Some(false),
            ..Default::default()
        }
    }

    fn emissive_scene() -> Scene {
        let mut scene = Scene::new("test");
        scene.sky.enabled = true;
        scene.sky.color = Vec3::new(0.6, 0.7, 0.9);
        scene.materials.push(Material {
            name: "Floor".into(),
            albedo: Vec3::new(0.8, 0.8, 0.8),
            roughness: 1.0,
            ..Default::default()
        });
        scene.materials.push(Material {
            name: "Lamp".into(),
            albedo: Vec3::new(1.0, 0.6, 0.2),
            roughness: 0.4,
            emission_color: Vec3::new(1.0, 0.6, 0.2),
            emission_power: 2.0,
            ..Default::default()
        });
        scene.spheres.push(Sphere {
            position: Vec3::new(0.0, -100.5, 0.0),
            radius: 100.0,
            material_index: 0,
            ..Default::default()
        });
        scene.spheres.push(Sphere {
            position: Vec3::new(0.0, 0.0, 0.0),
            radius: 0.5,
            material_index: 1,
            ..Default::default()
        });
        scene
    }

    fn renderer_at(width: u32, height: u32, patch: SettingsPatch) -> (Renderer, Camera) {
        let mut renderer = Renderer::new();
        renderer.apply_settings_patch(patch);
        renderer.on_resize(width, height);
        let (rw, rh) = renderer.render_size();
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(rw, rh);
        (renderer, camera)
    }

    #[test]
    fn test_empty_scene_is_sky_color() {
        let mut scene = Scene::new("empty");
        scene.sky.enabled = true;
        scene.sky.color = Vec3::new(0.2, 0.4, 0.6);

        for bounces in [1u32, 3, 8] {
            let (mut renderer, camera) = renderer_at(
                8,
                6,
                SettingsPatch {
                    ray_bounces: Some(bounces),
                    ..deterministic_settings()
                },
            );
            renderer.render(&scene, &camera);

            let expected = pack_rgba(Vec4::new(0.2, 0.4, 0.6, 1.0));
            assert!(renderer.image_data().iter().all(|&p| p == expected));
        }
    }

    #[test]
    fn test_empty_scene_with_sky_disabled_is_black() {
        let mut scene = Scene::new("empty");
        scene.sky.enabled = false;

        let (mut renderer, camera) = renderer_at(8, 6, deterministic_settings());
        renderer.render(&scene, &camera);

        let black = pack_rgba(Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!(renderer.image_data().iter().all(|&p| p == black));
    }

    #[test]
    fn test_forward_axis_hit_distance_and_normal() {
        let mut scene = Scene::new("single");
        scene.materials.push(Material::default());
        scene.spheres.push(Sphere {
            position: Vec3::new(0.0, 0.0, 0.0),
            radius: 0.5,
            ..Default::default()
        });

        // Camera default position is (0, 0, 6) looking down -Z.
        let ray = Ray::new(Vec3::new(0.0, 0.0, 6.0), Vec3::NEG_Z);
        let payload = trace_ray(&scene, &ray).expect("sphere on the axis must be hit");

        assert!((payload.hit_distance - 5.5).abs() < 1e-4);
        assert!((payload.world_normal - Vec3::Z).length() < 1e-4);
        assert!((payload.world_position - Vec3::new(0.0, 0.0, 0.5)).length() < 1e-4);
    }

    #[test]
    fn test_nearest_hit_wins() {
        let mut scene = Scene::new("two");
        scene.materials.push(Material::default());
        scene.spheres.push(Sphere {
            position: Vec3::new(0.0, 0.0, -4.0),
            ..Default::default()
        });
        scene.spheres.push(Sphere {
            position: Vec3::new(0.0, 0.0, -2.0),
            ..Default::default()
        });

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let payload = trace_ray(&scene, &ray).unwrap();
        assert_eq!(payload.object_index, 1);
    }

    #[test]
    fn test_disabled_spheres_are_skipped() {
        let mut scene = Scene::new("disabled");
        scene.materials.push(Material::default());
        scene.spheres.push(Sphere {
            enabled: false,
            position: Vec3::new(0.0, 0.0, -2.0),
            ..Default::default()
        });

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(trace_ray(&scene, &ray).is_none());
    }

    #[test]
    fn test_scene_without_materials_is_not_intersectable() {
        let mut scene = Scene::new("no-materials");
        scene.spheres.push(Sphere::default());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 6.0), Vec3::NEG_Z);
        assert!(trace_ray(&scene, &ray).is_none());
    }

    #[test]
    fn test_accumulate_off_is_idempotent() {
        let scene = emissive_scene();
        let (mut renderer, camera) = renderer_at(
            16,
            12,
            SettingsPatch {
                accumulate: Some(false),
                ..deterministic_settings()
            },
        );

        renderer.render(&scene, &camera);
        let first: Vec<u32> = renderer.image_data().to_vec();
        assert_eq!(renderer.frame_index(), 1);

        renderer.render(&scene, &camera);
        assert_eq!(renderer.image_data(), first.as_slice());
        assert_eq!(renderer.frame_index(), 1);
    }

    #[test]
    fn test_accumulation_converges() {
        let scene = emissive_scene();
        let (mut renderer, camera) = renderer_at(24, 18, deterministic_settings());

        renderer.render(&scene, &camera);
        let single_frame: Vec<u32> = renderer.image_data().to_vec();

        while renderer.frame_index() <= 16 {
            renderer.render(&scene, &camera);
        }
        let accumulated: Vec<u32> = renderer.image_data().to_vec();

        while renderer.frame_index() <= 64 {
            renderer.render(&scene, &camera);
        }
        let reference: Vec<u32> = renderer.image_data().to_vec();

        let distance = |a: &[u32], b: &[u32]| -> f64 {
            a.iter()
                .zip(b)
                .map(|(&x, &y)| {
                    x.to_le_bytes()
                        .iter()
                        .zip(y.to_le_bytes())
                        .map(|(&c, d)| (f64::from(c) - f64::from(d)).abs())
                        .sum::<f64>()
                })
                .sum()
        };

        // More accumulated frames sit closer to the long-run average.
        assert!(distance(&accumulated, &reference) < distance(&single_frame, &reference));
    }

    #[test]
    fn test_reset_behaves_like_fresh_start() {
        let scene = emissive_scene();

        let (mut accumulated, camera) = renderer_at(16, 12, deterministic_settings());
        for _ in 0..4 {
            accumulated.render(&scene, &camera);
        }
        accumulated.reset_frame_index();
        assert_eq!(accumulated.frame_index(), 1);
        accumulated.render(&scene, &camera);

        let (mut single, camera_single) = renderer_at(
            16,
            12,
            SettingsPatch {
                accumulate: Some(false),
                ..deterministic_settings()
            },
        );
        single.render(&scene, &camera_single);

        assert_eq!(accumulated.image_data(), single.image_data());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = emissive_scene();

        let (mut parallel, camera_a) = renderer_at(
            20,
            15,
            SettingsPatch {
                multithreading: Some(true),
                ..deterministic_settings()
            },
        );
        let (mut sequential, camera_b) = renderer_at(
            20,
            15,
            SettingsPatch {
                multithreading: Some(false),
                ..deterministic_settings()
            },
        );

        for _ in 0..3 {
            parallel.render(&scene, &camera_a);
            sequential.render(&scene, &camera_b);
        }

        assert_eq!(parallel.image_data(), sequential.image_data());
    }

    #[test]
    fn test_slow_random_path_is_deterministic_too() {
        let scene = emissive_scene();
        let patch = SettingsPatch {
            fast_random: Some(false),
            ..deterministic_settings()
        };

        let (mut parallel, camera_a) = renderer_at(12, 9, patch.clone());
        let (mut sequential, camera_b) = renderer_at(
            12,
            9,
            SettingsPatch {
                multithreading: Some(false),
                ..patch
            },
        );

        parallel.render(&scene, &camera_a);
        sequential.render(&scene, &camera_b);

        assert_eq!(parallel.image_data(), sequential.image_data());
    }

    #[test]
    fn test_deleting_referenced_material_falls_back_to_clamp() {
        let mut scene = emissive_scene();
        // Sphere 1 references material 1 ("Lamp"); deleting it leaves the
        // index dangling and the clamp policy resolves it to the last
        // surviving material.
        scene.remove_material(1);
        assert_eq!(scene.spheres[1].material_index, 1);
        assert_eq!(scene.material_for(1).unwrap().name, "Floor");

        let mut expected_scene = scene.clone();
        expected_scene.spheres[1].material_index = 0;

        let (mut renderer, camera) = renderer_at(16, 12, deterministic_settings());
        renderer.render(&scene, &camera);
        let with_dangling: Vec<u32> = renderer.image_data().to_vec();

        let (mut renderer, camera) = renderer_at(16, 12, deterministic_settings());
        renderer.render(&expected_scene, &camera);

        assert_eq!(with_dangling, renderer.image_data());
    }

    #[test]
    fn test_lights_are_inert_metadata() {
        let scene = emissive_scene();
        let mut with_lights = scene.clone();
        with_lights.lights.push(Light {
            enabled: true,
            position: Vec3::new(3.0, 5.0, -2.0),
        });

        let (mut renderer_a, camera_a) = renderer_at(16, 12, deterministic_settings());
        renderer_a.render(&scene, &camera_a);

        let (mut renderer_b, camera_b) = renderer_at(16, 12, deterministic_settings());
        renderer_b.render(&with_lights, &camera_b);

        assert_eq!(renderer_a.image_data(), renderer_b.image_data());
    }

    #[test]
    fn test_zero_viewport_is_a_noop() {
        let scene = emissive_scene();
        let mut renderer = Renderer::new();
        renderer.on_resize(0, 480);

        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(0, 480);

        renderer.render(&scene, &camera);
        assert!(renderer.image_data().is_empty());
        assert_eq!(renderer.render_size(), (0, 0));
    }

    #[test]
    fn test_resolution_scale_shrinks_render_target() {
        let mut renderer = Renderer::new();
        renderer.apply_settings_patch(SettingsPatch {
            resolution_scale: Some(50),
            ..Default::default()
        });
        renderer.on_resize(100, 50);
        assert_eq!(renderer.render_size(), (50, 25));

        // Never collapses below one pixel for a nonzero viewport.
        renderer.apply_settings_patch(SettingsPatch {
            resolution_scale: Some(1),
            ..Default::default()
        });
        renderer.on_resize(40, 40);
        assert_eq!(renderer.render_size(), (1, 1));
    }

    #[test]
    fn test_settings_patch_invalidation() {
        let scene = emissive_scene();
        let (mut renderer, camera) = renderer_at(8, 6, deterministic_settings());
        renderer.render(&scene, &camera);
        renderer.render(&scene, &camera);
        assert!(renderer.frame_index() > 1);

        // Multithreading never invalidates.
        let invalidated = renderer.apply_settings_patch(SettingsPatch {
            multithreading: Some(false),
            ..Default::default()
        });
        assert!(!invalidated);
        assert!(renderer.frame_index() > 1);

        // Bounce count does, and resets accumulation by itself.
        let invalidated = renderer.apply_settings_patch(SettingsPatch {
            ray_bounces: Some(2),
            ..Default::default()
        });
        assert!(invalidated);
        assert_eq!(renderer.frame_index(), 1);
    }

    #[test]
    fn test_mismatched_camera_skips_frame() {
        let scene = emissive_scene();
        let mut renderer = Renderer::new();
        renderer.on_resize(16, 12);

        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(8, 8);

        renderer.render(&scene, &camera);
        // Nothing was traced; the image is still cleared-to-zero and the
        // frame counter did not advance.
        assert!(renderer.image_data().iter().all(|&p| p == 0));
        assert_eq!(renderer.frame_index(), 1);
    }
}
