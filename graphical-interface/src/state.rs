use crate::types::Feature;

/// Tracks which feature the popup window is showing.
pub struct SelectionState {
    pub feature: Option<Feature>,
}

impl SelectionState {
    pub fn new() -> SelectionState {
        Self { feature: None }
    }

    /// If the provided feature is already selected, it will be deselected.
    /// Otherwise, it will be selected.
    pub fn toggle_feature_selection(&mut self, feature: &Feature) {
        if let Some(selected) = &self.feature {
            if *selected == *feature {
                self.feature = None;
            } else {
                self.feature = Some(feature.clone());
            }
        } else {
            self.feature = Some(feature.clone());
        }
    }
}

/// The features currently displayed. Replaced wholesale on every successful
/// refresh; a failed refresh leaves the previous set untouched.
pub struct ViewState {
    pub features: Vec<Feature>,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn replace(&mut self, features: Vec<Feature>) {
        self.features = features;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;
    use walkers::Position;

    fn feature(lat: f64) -> Feature {
        Feature {
            position: Position::from_lat_lon(lat, 0.0),
            severity: Severity::Slight,
            properties: Vec::new(),
        }
    }

    #[test]
    fn test_toggle_selects_and_deselects() {
        let mut state = SelectionState::new();

        state.toggle_feature_selection(&feature(51.0));
        assert_eq!(state.feature, Some(feature(51.0)));

        state.toggle_feature_selection(&feature(51.0));
        assert_eq!(state.feature, None);
    }

    #[test]
    fn test_toggle_switches_to_other_feature() {
        let mut state = SelectionState::new();

        state.toggle_feature_selection(&feature(51.0));
        state.toggle_feature_selection(&feature(52.0));
        assert_eq!(state.feature, Some(feature(52.0)));
    }

    #[test]
    fn test_replace_discards_previous_layer_in_full() {
        let mut view = ViewState::new();
        view.replace(vec![feature(51.0), feature(52.0)]);
        view.replace(vec![feature(53.0)]);

        assert_eq!(view.features, vec![feature(53.0)]);
    }
}
