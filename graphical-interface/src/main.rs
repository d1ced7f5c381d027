use std::path::Path;

use graphical_interface::{config::Settings, run};
use logger::Logger;

fn main() {
    let settings = Settings::from_env();

    let logger = match Logger::new(Path::new("."), "collision-map") {
        Ok(logger) => logger,
        Err(error) => {
            eprintln!("Failed to create logger: {}", error);
            return;
        }
    };

    if let Err(error) = run(settings, logger) {
        eprintln!("Application error: {}", error);
    }
}
