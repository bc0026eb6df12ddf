//! End-state banner text ("Game Over!", "You Win!") drawn over the scene.
//!
//! The sprite pipeline has no font support, so banners go through egui's
//! painter on a foreground layer. Coordinates are logical window points.

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    /// Top-left anchor in logical window coordinates.
    pub position: (f32, f32),
    pub font_size: f32,
    pub color: [u8; 4],
}

pub fn paint_banner(ctx: &egui::Context, banner: &Banner) {
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("end_state_banner"),
    ));
    let [r, g, b, a] = banner.color;
    painter.text(
        egui::pos2(banner.position.0, banner.position.1),
        egui::Align2::LEFT_TOP,
        &banner.text,
        egui::FontId::proportional(banner.font_size),
        egui::Color32::from_rgba_unmultiplied(r, g, b, a),
    );
}
