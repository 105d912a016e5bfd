//! Still-image export of the current viewport render.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use glint_renderer::Renderer;

/// Write the renderer's current image buffer as a PNG.
///
/// The buffer's row 0 is the bottom of the frame, so rows are flipped to
/// match what the viewport shows.
pub fn export_image(renderer: &Renderer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let (width, height) = renderer.render_size();
    ensure!(width > 0 && height > 0, "nothing has been rendered yet");

    let bytes: Vec<u8> = bytemuck::cast_slice(renderer.image_data()).to_vec();
    let mut image = image::RgbaImage::from_raw(width, height, bytes)
        .context("image buffer does not match the render size")?;
    image::imageops::flip_vertical_in_place(&mut image);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image
        .save(path)
        .with_context(|| format!("writing image to {}", path.display()))?;

    log::info!("Exported {width}x{height} image to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Material, Scene, Sphere};
    use glint_renderer::Camera;

    #[test]
    fn test_export_writes_readable_png() {
        let mut scene = Scene::new("export");
        scene.materials.push(Material::default());
        scene.spheres.push(Sphere::default());

        let mut renderer = Renderer::new();
        renderer.on_resize(16, 12);
        let (width, height) = renderer.render_size();
        let mut camera = Camera::new(45.0, 0.1, 100.0);
        camera.on_resize(width, height);
        renderer.render(&scene, &camera);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/test.png");
        export_image(&renderer, &path).unwrap();

        let read_back = image::open(&path).unwrap();
        assert_eq!(read_back.width(), width);
        assert_eq!(read_back.height(), height);
    }

    #[test]
    fn test_export_with_no_render_fails() {
        let renderer = Renderer::new();
        let dir = tempfile::tempdir().unwrap();
        assert!(export_image(&renderer, dir.path().join("x.png")).is_err());
    }
}
