use std::f64::consts::PI;
use std::time::{Duration, Instant};

use walkers::Position;

const TILE_SIZE: f64 = 256.0;

/// How long the extent must hold still before a gesture counts as settled.
const SETTLE_DELAY: Duration = Duration::from_millis(400);

/// Visible geographic extent of the map panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bbox {
    /// Derives the visible extent from the map center, zoom level and panel
    /// size in pixels (inverse Web Mercator over 256 px tiles).
    pub fn from_view(center: Position, zoom: f64, width_px: f32, height_px: f32) -> Self {
        let world = TILE_SIZE * zoom.exp2();
        let center_x = (center.lon() + 180.0) / 360.0 * world;
        let center_y = mercator_y(center.lat()) * world;
        let half_width = f64::from(width_px) / 2.0;
        let half_height = f64::from(height_px) / 2.0;

        Bbox {
            west: x_to_lon(center_x - half_width, world),
            south: y_to_lat(center_y + half_height, world),
            east: x_to_lon(center_x + half_width, world),
            north: y_to_lat(center_y - half_height, world),
        }
    }

    /// `west,south,east,north` with four decimal places, no spaces, as the
    /// locations endpoint expects.
    pub fn to_query_string(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4},{:.4}",
            self.west, self.south, self.east, self.north
        )
    }
}

fn mercator_y(lat: f64) -> f64 {
    let lat = lat.to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

fn x_to_lon(x: f64, world: f64) -> f64 {
    (x / world).clamp(0.0, 1.0) * 360.0 - 180.0
}

fn y_to_lat(y: f64, world: f64) -> f64 {
    let n = PI * (1.0 - 2.0 * (y / world).clamp(0.0, 1.0));
    n.sinh().atan().to_degrees()
}

/// Immediate-mode replacement for a map widget's move-settled event.
///
/// Fed the current extent once per frame, it reports each discrete pan/zoom
/// gesture exactly once, after the extent has held still for the settle
/// delay and differs from the last settled extent.
pub struct ViewportWatcher {
    last_seen: Bbox,
    stable_since: Instant,
    settled: Bbox,
}

impl ViewportWatcher {
    /// The initial extent counts as already settled; the startup fetch is
    /// the caller's explicit first trigger.
    pub fn new(initial: Bbox, now: Instant) -> Self {
        Self {
            last_seen: initial,
            stable_since: now,
            settled: initial,
        }
    }

    pub fn observe(&mut self, bbox: Bbox, now: Instant) -> Option<Bbox> {
        if self.last_seen != bbox {
            self.last_seen = bbox;
            self.stable_since = now;
            return None;
        }
        if self.settled == bbox {
            return None;
        }
        if now.duration_since(self.stable_since) < SETTLE_DELAY {
            return None;
        }
        self.settled = bbox;
        Some(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(west: f64) -> Bbox {
        Bbox {
            west,
            south: 51.0,
            east: west + 1.0,
            north: 52.0,
        }
    }

    #[test]
    fn test_query_string_format() {
        let extent = Bbox {
            west: -0.56789,
            south: 51.3,
            east: 0.3,
            north: 51.71111,
        };
        assert_eq!(extent.to_query_string(), "-0.5679,51.3000,0.3000,51.7111");
    }

    #[test]
    fn test_from_view_is_centered() {
        let center = Position::from_lat_lon(51.505, -0.09);
        let extent = Bbox::from_view(center, 13.0, 800.0, 600.0);

        assert!(((extent.west + extent.east) / 2.0 + 0.09).abs() < 1e-9);
        assert!(extent.west < -0.09 && extent.east > -0.09);
        assert!(extent.south < 51.505 && extent.north > 51.505);
    }

    #[test]
    fn test_higher_zoom_shrinks_span() {
        let center = Position::from_lat_lon(51.505, -0.09);
        let wide = Bbox::from_view(center, 10.0, 800.0, 600.0);
        let narrow = Bbox::from_view(center, 13.0, 800.0, 600.0);

        assert!(narrow.east - narrow.west < wide.east - wide.west);
        assert!(narrow.north - narrow.south < wide.north - wide.south);
    }

    #[test]
    fn test_watcher_reports_nothing_while_moving() {
        let start = Instant::now();
        let mut watcher = ViewportWatcher::new(bbox(0.0), start);

        assert_eq!(watcher.observe(bbox(0.1), start), None);
        assert_eq!(
            watcher.observe(bbox(0.2), start + Duration::from_millis(600)),
            None
        );
    }

    #[test]
    fn test_watcher_settles_once_per_gesture() {
        let start = Instant::now();
        let mut watcher = ViewportWatcher::new(bbox(0.0), start);

        // gesture: extent changes, then holds still past the delay
        assert_eq!(watcher.observe(bbox(0.5), start), None);
        assert_eq!(
            watcher.observe(bbox(0.5), start + Duration::from_millis(100)),
            None
        );
        assert_eq!(
            watcher.observe(bbox(0.5), start + Duration::from_millis(500)),
            Some(bbox(0.5))
        );
        // still frames afterwards stay quiet
        assert_eq!(
            watcher.observe(bbox(0.5), start + Duration::from_millis(900)),
            None
        );
    }

    #[test]
    fn test_watcher_reports_second_gesture() {
        let start = Instant::now();
        let mut watcher = ViewportWatcher::new(bbox(0.0), start);

        watcher.observe(bbox(0.5), start);
        assert_eq!(
            watcher.observe(bbox(0.5), start + Duration::from_millis(500)),
            Some(bbox(0.5))
        );

        watcher.observe(bbox(1.5), start + Duration::from_millis(600));
        assert_eq!(
            watcher.observe(bbox(1.5), start + Duration::from_millis(1100)),
            Some(bbox(1.5))
        );
    }

    #[test]
    fn test_watcher_ignores_unchanged_initial_extent() {
        let start = Instant::now();
        let mut watcher = ViewportWatcher::new(bbox(0.0), start);

        assert_eq!(
            watcher.observe(bbox(0.0), start + Duration::from_secs(5)),
            None
        );
    }
}
