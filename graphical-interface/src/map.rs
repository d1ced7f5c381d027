use std::{
    cell::RefCell,
    rc::Rc,
    sync::Arc,
    time::{Duration, Instant},
};

use egui::Context;
use egui_extras::install_image_loaders;
use logger::{Color, Logger};
use walkers::{
    sources::{Attribution, TileSource},
    HttpOptions, HttpTiles, Map, MapMemory, Position, TileId, Tiles,
};

use crate::{
    api::Provider,
    config::Settings,
    form::encode_parameters,
    plugins,
    refresh::{RefreshController, RefreshOutcome, RefreshState},
    state::{SelectionState, ViewState},
    viewport::{Bbox, ViewportWatcher},
    widgets::{WidgetFeature, WidgetFilters, WidgetSearch},
};

const REPAINT_TICK_MS: u64 = 250;

/// Tile source built from the configured URL template.
struct ConfiguredTiles {
    url_template: String,
}

impl TileSource for ConfiguredTiles {
    fn tile_url(&self, tile_id: TileId) -> String {
        self.url_template
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "OpenStreetMap contributors",
            url: "https://www.openstreetmap.org/copyright",
            logo_light: None,
            logo_dark: None,
        }
    }
}

/// The main application struct: wires the filter form and the map viewport
/// into the refresh controller, and owns what is currently displayed.
pub struct App {
    settings: Settings,
    tiles: Box<dyn Tiles>,
    map_memory: MapMemory,
    selection_state: Rc<RefCell<SelectionState>>,
    view_state: ViewState,
    feature_widget: Option<WidgetFeature>,
    filters_widget: WidgetFilters,
    search_widget: WidgetSearch,
    provider: Arc<dyn Provider>,
    refresh: RefreshController,
    watcher: Option<ViewportWatcher>,
    error_message: Option<String>,
    logger: Logger,
}

impl App {
    pub fn new(
        egui_ctx: Context,
        settings: Settings,
        provider: Arc<dyn Provider>,
        logger: Logger,
    ) -> Self {
        install_image_loaders(&egui_ctx);
        let mut initial_map_memory = MapMemory::default();
        initial_map_memory.set_zoom(settings.initial_zoom).unwrap();

        Self {
            tiles: Box::new(HttpTiles::with_options(
                ConfiguredTiles {
                    url_template: settings.tile_url.clone(),
                },
                HttpOptions::default(),
                egui_ctx.to_owned(),
            )),
            map_memory: initial_map_memory,
            selection_state: Rc::new(RefCell::new(SelectionState::new())),
            view_state: ViewState::new(),
            feature_widget: None,
            filters_widget: WidgetFilters::new(),
            search_widget: WidgetSearch::new(),
            refresh: RefreshController::new(Arc::clone(&provider), logger.clone()),
            provider,
            watcher: None,
            error_message: None,
            settings,
            logger,
        }
    }

    fn home_position(&self) -> Position {
        Position::from_lat_lon(self.settings.initial_position.0, self.settings.initial_position.1)
    }

    fn current_center(&self) -> Position {
        self.map_memory.detached().unwrap_or(Position::from_lat_lon(
            self.settings.initial_position.0,
            self.settings.initial_position.1,
        ))
    }

    /// One refresh cycle: parameters re-encoded from the live form state,
    /// extent taken from the live viewport, one fetch started.
    fn trigger_refresh(&mut self, extent: Bbox) {
        let parameters = encode_parameters(
            &self.filters_widget.controls(),
            &self.settings.group_delimiter,
        );
        self.refresh.request(extent.to_query_string(), parameters);
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // keep polling in-flight fetches even when the user is idle
        ctx.request_repaint_after(Duration::from_millis(REPAINT_TICK_MS));

        let mut form_changed = false;
        egui::SidePanel::left("filters_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                self.search_widget
                    .show(ui, &self.provider, &mut self.map_memory);
                ui.separator();
                form_changed = self.filters_widget.show(ui);
            });

        let rimless = egui::Frame {
            fill: ctx.style().visuals.panel_fill,
            ..Default::default()
        };

        egui::CentralPanel::default()
            .frame(rimless)
            .show(ctx, |ui| {
                let map_size = ui.available_size();
                let extent = Bbox::from_view(
                    self.current_center(),
                    self.map_memory.zoom(),
                    map_size.x,
                    map_size.y,
                );
                let now = Instant::now();

                // the first frame establishes the watcher and the initial fetch
                let settled = match self.watcher.as_mut() {
                    Some(watcher) => watcher.observe(extent, now),
                    None => {
                        self.watcher = Some(ViewportWatcher::new(extent, now));
                        let _ = self
                            .logger
                            .info("initial viewport established", Color::Blue, false);
                        Some(extent)
                    }
                };

                if form_changed {
                    self.trigger_refresh(extent);
                } else if let Some(settled_extent) = settled {
                    self.trigger_refresh(settled_extent);
                }

                match self.refresh.poll() {
                    Some(RefreshOutcome::Features(features)) => {
                        let _ = self.logger.info(
                            &format!("rendering {} features", features.len()),
                            Color::Green,
                            false,
                        );
                        self.view_state.replace(features);
                    }
                    Some(RefreshOutcome::Error(message)) => {
                        self.error_message = Some(message);
                    }
                    None => {}
                }

                let home = self.home_position();
                let tiles = self.tiles.as_mut();
                let collisions_plugin =
                    plugins::Collisions::new(&self.view_state.features, self.selection_state.clone());

                let map = Map::new(Some(tiles), &mut self.map_memory, home)
                    .with_plugin(collisions_plugin);

                ui.add(map);

                let selected_feature = self.selection_state.borrow().feature.clone();
                if let Some(feature) = selected_feature {
                    match &mut self.feature_widget {
                        Some(widget) if widget.selected_feature == feature => {
                            if !widget.show(ctx) {
                                self.selection_state.borrow_mut().feature = None;
                                self.feature_widget = None;
                            }
                        }
                        _ => {
                            self.feature_widget = Some(WidgetFeature::new(feature));
                        }
                    }
                } else {
                    self.feature_widget = None;
                }

                // blocking notification; the previous layer stays on the map
                if let Some(message) = self.error_message.clone() {
                    egui::Window::new("Error")
                        .collapsible(false)
                        .resizable(false)
                        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                        .show(ctx, |ui| {
                            ui.label(format!("Error: {}", message));
                            if ui.button("Dismiss").clicked() {
                                self.error_message = None;
                            }
                        });
                }

                if self.refresh.state() == RefreshState::Fetching {
                    egui::Area::new(egui::Id::new("fetch_status"))
                        .anchor(egui::Align2::RIGHT_BOTTOM, [-10.0, -10.0])
                        .show(ctx, |ui| {
                            ui.label("Loading collisions...");
                        });
                }
            });
    }
}
