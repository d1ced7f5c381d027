use chrono::{NaiveDate, Utc};
use egui::RichText;
use egui_extras::DatePickerButton;

use crate::form::FormControl;

const SEVERITY_OPTIONS: [&str; 3] = ["slight", "serious", "fatal"];
const CASUALTY_OPTIONS: [&str; 3] = ["cyclist", "pedestrian", "motorcyclist"];
const LIMIT_OPTIONS: [&str; 3] = ["100", "200", "400"];

/// The filter form. Control state lives here as typed values; every refresh
/// re-reads it through `controls()`, which snapshots the form in panel
/// order for the encoder.
pub struct WidgetFilters {
    severities: [bool; 3],
    casualties: [bool; 3],
    date_from_enabled: bool,
    date_from: NaiveDate,
    date_to_enabled: bool,
    date_to: NaiveDate,
    limit: String,
}

impl WidgetFilters {
    pub fn new() -> Self {
        let today = Utc::now().date_naive();
        Self {
            severities: [true, true, true],
            casualties: [false, false, false],
            date_from_enabled: false,
            date_from: today,
            date_to_enabled: false,
            date_to: today,
            limit: String::new(),
        }
    }

    /// Renders the form; returns true when any control changed this frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let before = self.controls();

        ui.label(RichText::new("Severity").strong());
        for (index, option) in SEVERITY_OPTIONS.iter().enumerate() {
            ui.checkbox(&mut self.severities[index], *option);
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Casualties involved").strong());
        for (index, option) in CASUALTY_OPTIONS.iter().enumerate() {
            ui.checkbox(&mut self.casualties[index], *option);
        }

        ui.add_space(8.0);
        ui.label(RichText::new("Date range").strong());
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.date_from_enabled, "From:");
            if self.date_from_enabled {
                ui.add(DatePickerButton::new(&mut self.date_from).id_salt("date_from_picker"));
            }
        });
        ui.horizontal(|ui| {
            ui.checkbox(&mut self.date_to_enabled, "Until:");
            if self.date_to_enabled {
                ui.add(DatePickerButton::new(&mut self.date_to).id_salt("date_to_picker"));
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Limit:").strong());
            egui::ComboBox::from_id_salt("limit_combo")
                .selected_text(if self.limit.is_empty() {
                    "(default)"
                } else {
                    self.limit.as_str()
                })
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.limit, String::new(), "(default)");
                    for option in LIMIT_OPTIONS {
                        ui.selectable_value(&mut self.limit, option.to_string(), option);
                    }
                });
        });

        before != self.controls()
    }

    /// Control snapshot in panel order, ready for the encoder. Disabled
    /// date pickers contribute an empty value, so their keys stay absent.
    pub fn controls(&self) -> Vec<FormControl> {
        let mut controls = Vec::new();

        for (index, option) in SEVERITY_OPTIONS.iter().enumerate() {
            controls.push(FormControl::checkbox(
                "severity[]",
                option,
                self.severities[index],
            ));
        }
        for (index, option) in CASUALTY_OPTIONS.iter().enumerate() {
            controls.push(FormControl::checkbox(
                "casualties[]",
                option,
                self.casualties[index],
            ));
        }
        controls.push(FormControl::text(
            "date_from",
            &date_value(self.date_from_enabled, self.date_from),
        ));
        controls.push(FormControl::text(
            "date_to",
            &date_value(self.date_to_enabled, self.date_to),
        ));
        controls.push(FormControl::select("limit", &self.limit));

        controls
    }
}

fn date_value(enabled: bool, date: NaiveDate) -> String {
    if enabled {
        date.format("%Y-%m-%d").to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::encode_parameters;

    #[test]
    fn test_default_form_encodes_all_severities_only() {
        let widget = WidgetFilters::new();
        let parameters = encode_parameters(&widget.controls(), ",");

        assert_eq!(parameters.len(), 1);
        assert_eq!(
            parameters.get("severity"),
            Some(&"slight,serious,fatal".to_string())
        );
    }

    #[test]
    fn test_controls_follow_panel_order() {
        let widget = WidgetFilters::new();
        let names: Vec<String> = widget
            .controls()
            .iter()
            .map(|control| control.name.clone())
            .collect();

        assert_eq!(
            names,
            vec![
                "severity[]",
                "severity[]",
                "severity[]",
                "casualties[]",
                "casualties[]",
                "casualties[]",
                "date_from",
                "date_to",
                "limit",
            ]
        );
    }

    #[test]
    fn test_enabled_date_produces_iso_value() {
        let mut widget = WidgetFilters::new();
        widget.date_from_enabled = true;
        widget.date_from = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

        let parameters = encode_parameters(&widget.controls(), ",");

        assert_eq!(parameters.get("date_from"), Some(&"2020-01-01".to_string()));
        assert!(!parameters.contains_key("date_to"));
    }

    #[test]
    fn test_casualties_accumulate() {
        let mut widget = WidgetFilters::new();
        widget.casualties = [true, false, true];

        let parameters = encode_parameters(&widget.controls(), ",");

        assert_eq!(
            parameters.get("casualties"),
            Some(&"cyclist,motorcyclist".to_string())
        );
    }

    #[test]
    fn test_limit_selection_registers() {
        let mut widget = WidgetFilters::new();
        widget.limit = "400".to_string();

        let parameters = encode_parameters(&widget.controls(), ",");

        assert_eq!(parameters.get("limit"), Some(&"400".to_string()));
    }
}
