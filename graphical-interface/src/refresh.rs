use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use api_client::{ParameterSet, QueryError};
use logger::{Color, Logger};

use crate::api::Provider;
use crate::types::Feature;

/// Where the latest refresh cycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
    Rendered,
    Failed,
}

struct FetchMessage {
    seq: u64,
    result: Result<Vec<Feature>, QueryError>,
}

/// What the caller should do with a completed cycle: replace the displayed
/// features, or surface the error and leave the previous layer up.
#[derive(Debug, PartialEq)]
pub enum RefreshOutcome {
    Features(Vec<Feature>),
    Error(String),
}

/// Single writer of "what is currently displayed".
///
/// Every trigger starts a fetch on a background thread with freshly
/// computed parameters and the current extent. Responses carry a monotonic
/// sequence number and are applied only in order: a slow fetch can never
/// overwrite a newer one, and a failure of a superseded request is dropped
/// silently.
pub struct RefreshController {
    provider: Arc<dyn Provider>,
    logger: Logger,
    state: RefreshState,
    next_seq: u64,
    applied_seq: u64,
    tx: Sender<FetchMessage>,
    rx: Receiver<FetchMessage>,
}

impl RefreshController {
    pub fn new(provider: Arc<dyn Provider>, logger: Logger) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            provider,
            logger,
            state: RefreshState::Idle,
            next_seq: 0,
            applied_seq: 0,
            tx,
            rx,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// Starts one fetch for the given extent and parameters. Triggers while
    /// an older fetch is in flight simply start a newer one; ordering is
    /// resolved at `poll` time.
    pub fn request(&mut self, bbox: String, params: ParameterSet) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let _ = self.logger.info(
            &format!("fetch #{}: bbox={} params={:?}", seq, bbox, params),
            Color::Cyan,
            false,
        );

        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = provider.collisions(&bbox, &params);
            // Receiver gone means the app is shutting down.
            let _ = tx.send(FetchMessage { seq, result });
        });

        self.state = RefreshState::Fetching;
    }

    /// Drains completed fetches and returns the newest applicable outcome.
    pub fn poll(&mut self) -> Option<RefreshOutcome> {
        let mut outcome = None;

        while let Ok(message) = self.rx.try_recv() {
            if message.seq <= self.applied_seq {
                let _ = self
                    .logger
                    .warn(&format!("discarding stale fetch #{}", message.seq), false);
                continue;
            }

            match message.result {
                Ok(features) => {
                    self.applied_seq = message.seq;
                    if message.seq == self.next_seq {
                        self.state = RefreshState::Rendered;
                    }
                    outcome = Some(RefreshOutcome::Features(features));
                }
                Err(error) => {
                    if message.seq < self.next_seq {
                        let _ = self.logger.warn(
                            &format!("superseded fetch #{} failed: {}", message.seq, error),
                            false,
                        );
                        continue;
                    }
                    self.applied_seq = message.seq;
                    self.state = RefreshState::Failed;
                    let _ = self
                        .logger
                        .error(&format!("fetch #{} failed: {}", message.seq, error), true);
                    outcome = Some(RefreshOutcome::Error(error.to_string()));
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct NoopProvider;

    impl Provider for NoopProvider {
        fn collisions(
            &self,
            _bbox: &str,
            _params: &ParameterSet,
        ) -> Result<Vec<Feature>, QueryError> {
            Ok(Vec::new())
        }

        fn geocode(&self, _text: &str) -> Result<Vec<crate::api::Place>, QueryError> {
            Ok(Vec::new())
        }
    }

    fn test_logger() -> Logger {
        let log_dir = std::env::temp_dir().join("collision_map_refresh_test");
        fs::create_dir_all(&log_dir).expect("Failed to create test directory");
        Logger::new(&log_dir, "refresh-test").expect("Failed to create logger")
    }

    fn controller() -> RefreshController {
        RefreshController::new(Arc::new(NoopProvider), test_logger())
    }

    fn feature(lat: f64) -> Feature {
        Feature {
            position: walkers::Position::from_lat_lon(lat, 0.0),
            severity: crate::types::Severity::Slight,
            properties: Vec::new(),
        }
    }

    // Push a synthetic completion, as if a worker thread had finished.
    fn deliver(controller: &RefreshController, seq: u64, result: Result<Vec<Feature>, QueryError>) {
        controller
            .tx
            .send(FetchMessage { seq, result })
            .expect("receiver must be alive");
    }

    #[test]
    fn test_initial_state_is_idle() {
        let controller = controller();
        assert_eq!(controller.state(), RefreshState::Idle);
    }

    #[test]
    fn test_success_renders_and_failure_fails() {
        let mut controller = controller();
        controller.next_seq = 1;
        controller.state = RefreshState::Fetching;

        deliver(&controller, 1, Ok(vec![feature(51.0)]));
        assert_eq!(
            controller.poll(),
            Some(RefreshOutcome::Features(vec![feature(51.0)]))
        );
        assert_eq!(controller.state(), RefreshState::Rendered);

        controller.next_seq = 2;
        controller.state = RefreshState::Fetching;
        deliver(&controller, 2, Err(QueryError::Api("Bad bbox".to_string())));
        assert_eq!(
            controller.poll(),
            Some(RefreshOutcome::Error("Bad bbox".to_string()))
        );
        assert_eq!(controller.state(), RefreshState::Failed);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = controller();
        controller.next_seq = 2;
        controller.state = RefreshState::Fetching;

        // newer request completes first
        deliver(&controller, 2, Ok(vec![feature(52.0)]));
        assert_eq!(
            controller.poll(),
            Some(RefreshOutcome::Features(vec![feature(52.0)]))
        );

        // the older one arrives late and must not overwrite
        deliver(&controller, 1, Ok(vec![feature(51.0)]));
        assert_eq!(controller.poll(), None);
        assert_eq!(controller.state(), RefreshState::Rendered);
    }

    #[test]
    fn test_out_of_order_in_one_drain_applies_newest() {
        let mut controller = controller();
        controller.next_seq = 2;
        controller.state = RefreshState::Fetching;

        deliver(&controller, 1, Ok(vec![feature(51.0)]));
        deliver(&controller, 2, Ok(vec![feature(52.0)]));

        assert_eq!(
            controller.poll(),
            Some(RefreshOutcome::Features(vec![feature(52.0)]))
        );
    }

    #[test]
    fn test_superseded_failure_is_suppressed() {
        let mut controller = controller();
        controller.next_seq = 2;
        controller.state = RefreshState::Fetching;

        // request 1 fails while request 2 is still in flight
        deliver(&controller, 1, Err(QueryError::Transport("timeout".to_string())));
        assert_eq!(controller.poll(), None);
        assert_eq!(controller.state(), RefreshState::Fetching);

        deliver(&controller, 2, Ok(vec![feature(52.0)]));
        assert_eq!(
            controller.poll(),
            Some(RefreshOutcome::Features(vec![feature(52.0)]))
        );
        assert_eq!(controller.state(), RefreshState::Rendered);
    }

    #[test]
    fn test_request_spawns_and_completes() {
        let mut controller = controller();
        controller.request("0.0,0.0,1.0,1.0".to_string(), ParameterSet::new());
        assert_eq!(controller.state(), RefreshState::Fetching);

        // worker threads deliver through the channel; wait for this one
        let message = controller
            .rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("fetch must complete");
        assert_eq!(message.seq, 1);
        assert_eq!(message.result, Ok(Vec::new()));
    }
}
