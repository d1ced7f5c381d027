use std::{cell::RefCell, rc::Rc};

use egui::{include_image, Image, Rect, Response, Vec2};
use walkers::{Plugin, Projector};

use crate::{
    state::SelectionState,
    types::{Feature, Severity},
};

/// Draws one marker per collision feature, icon chosen by severity, and
/// routes clicks into the selection state.
pub struct Collisions<'a> {
    features: &'a Vec<Feature>,
    selection_state: Rc<RefCell<SelectionState>>,
}

impl<'a> Collisions<'a> {
    pub fn new(features: &'a Vec<Feature>, selection_state: Rc<RefCell<SelectionState>>) -> Self {
        Self {
            features,
            selection_state,
        }
    }
}

impl Plugin for Collisions<'_> {
    fn run(self: Box<Self>, ui: &mut egui::Ui, _response: &Response, projector: &Projector) {
        for feature in self.features {
            feature.draw(ui, projector, &mut self.selection_state.borrow_mut());
        }
    }
}

/// Fixed severity-to-icon mapping; the set is closed, features outside it
/// never reach the plugin.
fn severity_icon(severity: Severity) -> Image<'static> {
    match severity {
        Severity::Slight => Image::new(include_image!("../../icons/collision-slight.svg")),
        Severity::Serious => Image::new(include_image!("../../icons/collision-serious.svg")),
        Severity::Fatal => Image::new(include_image!("../../icons/collision-fatal.svg")),
    }
}

impl Feature {
    fn draw(
        &self,
        ui: &mut egui::Ui,
        projector: &Projector,
        selection_state: &mut SelectionState,
    ) {
        let screen_position = projector.project(self.position);

        let symbol_size = Vec2::new(26.0, 26.0);

        let clickable_area = Rect::from_center_size(screen_position.to_pos2(), symbol_size);

        let response = ui.allocate_rect(clickable_area, egui::Sense::click());

        let draw_size = if response.hovered() {
            symbol_size * 1.2
        } else {
            symbol_size
        };
        let rect = Rect::from_center_size(screen_position.to_pos2(), draw_size);

        let image = severity_icon(self.severity).fit_to_exact_size(draw_size);

        ui.put(rect, image);

        if response.clicked() {
            selection_state.toggle_feature_selection(self);
        }
    }
}
