use std::sync::Arc;

pub mod api;
pub mod config;
pub mod form;
mod map;
mod plugins;
pub mod popup;
mod refresh;
mod state;
pub mod types;
pub mod viewport;
mod widgets;

use api::{Api, Provider};
use config::Settings;
use logger::Logger;
use map::App;

/// Builds the API client and hands the whole context to the app.
pub fn run(settings: Settings, logger: Logger) -> Result<(), eframe::Error> {
    eframe::run_native(
        "Collision Map",
        Default::default(),
        Box::new(move |cc| {
            let provider: Arc<dyn Provider> = Arc::new(Api::new(&settings, logger.clone())?);
            Ok(Box::new(App::new(
                cc.egui_ctx.clone(),
                settings,
                provider,
                logger,
            )))
        }),
    )
}
