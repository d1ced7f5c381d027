use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use api_client::QueryError;
use egui::RichText;
use walkers::MapMemory;

use crate::api::{Place, Provider};

/// Location search box backed by the geocoder endpoint. Selecting a result
/// recenters the map on it; the next settled viewport then refreshes the
/// data as with any other pan.
pub struct WidgetSearch {
    query: String,
    results: Vec<Place>,
    error_message: Option<String>,
    searching: bool,
    tx: Sender<Result<Vec<Place>, QueryError>>,
    rx: Receiver<Result<Vec<Place>, QueryError>>,
}

impl WidgetSearch {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            query: String::new(),
            results: Vec::new(),
            error_message: None,
            searching: false,
            tx,
            rx,
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        provider: &Arc<dyn Provider>,
        map_memory: &mut MapMemory,
    ) {
        while let Ok(result) = self.rx.try_recv() {
            self.searching = false;
            match result {
                Ok(results) => {
                    if results.is_empty() {
                        self.error_message = Some("No places found.".to_string());
                    } else {
                        self.error_message = None;
                    }
                    self.results = results;
                }
                Err(error) => {
                    self.error_message = Some(error.to_string());
                    self.results.clear();
                }
            }
        }

        ui.label(RichText::new("Location").strong());
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.query);
            let submitted =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));

            if (ui.button("Search").clicked() || submitted)
                && !self.query.is_empty()
                && !self.searching
            {
                self.searching = true;
                self.error_message = None;
                let provider = Arc::clone(provider);
                let tx = self.tx.clone();
                let query = self.query.clone();
                thread::spawn(move || {
                    let _ = tx.send(provider.geocode(&query));
                });
            }
        });

        if self.searching {
            ui.label("Searching...");
        }
        if let Some(message) = &self.error_message {
            ui.colored_label(egui::Color32::RED, message);
        }

        let mut picked = None;
        for place in &self.results {
            if ui.link(&place.name).clicked() {
                picked = Some(place.position);
            }
        }
        if let Some(position) = picked {
            map_memory.center_at(position);
            self.results.clear();
        }
    }
}
