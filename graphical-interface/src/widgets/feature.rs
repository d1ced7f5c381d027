use egui::RichText;

use crate::{popup, types::Feature};

/// Popup window for the selected collision: one row per display attribute,
/// plus an HTML export of the same table.
pub struct WidgetFeature {
    pub selected_feature: Feature,
}

impl WidgetFeature {
    pub fn new(selected_feature: Feature) -> Self {
        Self { selected_feature }
    }

    /// Returns false once the user closes the window.
    pub fn show(&mut self, ctx: &egui::Context) -> bool {
        let mut open = true;

        egui::Window::new(format!(
            "Collision ({})",
            self.selected_feature.severity.as_str()
        ))
        .resizable(false)
        .collapsible(true)
        .open(&mut open)
        .fixed_pos([20.0, 20.0])
        .show(ctx, |ui| {
            ui.visuals_mut().override_text_color = Some(egui::Color32::WHITE);
            egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                egui::Grid::new("feature_properties")
                    .striped(true)
                    .show(ui, |ui| {
                        for (key, value) in popup::rows(&self.selected_feature) {
                            ui.label(format!("{}:", key));
                            ui.label(RichText::new(value).strong());
                            ui.end_row();
                        }
                    });
            });

            ui.add_space(10.0);
            if ui.button("Copy as HTML").clicked() {
                ctx.copy_text(popup::table_html(&self.selected_feature));
            }
        });

        open
    }
}
