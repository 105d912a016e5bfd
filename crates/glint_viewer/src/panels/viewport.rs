//! Viewport panel: blits the renderer's image and reports its size and
//! hover focus back to the session.

use crate::i18n::I18n;

#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
    pub focused: bool,
}

pub fn viewport_panel(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    i18n: &I18n,
) -> ViewportState {
    let available = ui.available_size();
    let width = available.x.max(0.0) as u32;
    let height = available.y.max(0.0) as u32;

    let mut focused = false;
    match texture {
        Some(texture) => {
            // Row 0 of the image buffer is the bottom of the frame;
            // flip the v axis when drawing.
            let image = egui::Image::new((texture.id(), available)).uv(egui::Rect::from_min_max(
                egui::pos2(0.0, 1.0),
                egui::pos2(1.0, 0.0),
            ));
            let response = ui.add(image);
            focused = response.hovered();
        }
        None => {
            ui.centered_and_justified(|ui| {
                ui.label(i18n.get("viewport.waiting"));
            });
        }
    }

    ViewportState {
        width,
        height,
        focused,
    }
}
