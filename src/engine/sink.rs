//! Results sink shared by an engine and the discoverer.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use super::EngineTestCase;

/// A message from the engine.
#[derive(Debug)]
pub enum SinkMessage {
    TestCaseDiscovered(EngineTestCase),
    DiscoveryComplete,
    /// Anything else the engine wants to say; logged and otherwise ignored.
    Diagnostic(String),
}

#[derive(Debug, Default)]
struct SinkState {
    queue: VecDeque<EngineTestCase>,
    finished: bool,
    closed: bool,
}

/// Queue of discovered test cases plus a completion signal.
///
/// Producers call [`on_message`](Self::on_message) from any thread; the
/// consumer waits with [`wait_finished`](Self::wait_finished) and empties the
/// queue with [`drain`](Self::drain). Once [`close`](Self::close)d, the sink
/// drops everything and tells producers to stop.
#[derive(Debug, Default)]
pub struct DiscoverySink {
    state: Mutex<SinkState>,
    finished_signal: Condvar,
}

impl DiscoverySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a message. Returns `false` when the producer should stop.
    pub fn on_message(&self, message: SinkMessage) -> bool {
        let mut state = self.state.lock();
        if state.closed {
            trace!(?message, "dropping message after close");
            return false;
        }
        match message {
            SinkMessage::TestCaseDiscovered(test_case) => state.queue.push_back(test_case),
            SinkMessage::DiscoveryComplete => {
                state.finished = true;
                self.finished_signal.notify_all();
            }
            SinkMessage::Diagnostic(text) => debug!(%text, "engine diagnostic"),
        }
        true
    }

    /// Block until the engine signals completion or `timeout` elapses.
    ///
    /// Returns whether completion has been signalled.
    pub fn wait_finished(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        if !state.finished && !state.closed {
            let _ = self.finished_signal.wait_for(&mut state, timeout);
        }
        state.finished
    }

    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }

    /// Take every queued test case, in arrival order.
    pub fn drain(&self) -> Vec<EngineTestCase> {
        self.state.lock().queue.drain(..).collect()
    }

    /// Stop accepting messages and discard anything still queued.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        state.queue.clear();
        self.finished_signal.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use super::*;
    use crate::fixtures::sample_case;

    #[test]
    fn test_drain_preserves_arrival_order() {
        let sink = DiscoverySink::new();
        assert!(sink.on_message(SinkMessage::TestCaseDiscovered(sample_case("First"))));
        assert!(sink.on_message(SinkMessage::TestCaseDiscovered(sample_case("Second"))));
        assert_eq!(sink.len(), 2);

        let drained: Vec<_> = sink.drain().into_iter().map(|c| c.display_name).collect();
        assert_eq!(drained, vec!["First", "Second"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_wait_times_out_without_completion() {
        let sink = DiscoverySink::new();
        let started = Instant::now();
        assert!(!sink.wait_finished(Duration::from_millis(20)));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_completion_wakes_waiter() {
        let sink = Arc::new(DiscoverySink::new());
        let producer = Arc::clone(&sink);
        let handle = std::thread::spawn(move || {
            producer.on_message(SinkMessage::DiscoveryComplete);
        });

        let mut finished = false;
        for _ in 0..100 {
            if sink.wait_finished(Duration::from_millis(50)) {
                finished = true;
                break;
            }
        }
        handle.join().unwrap();
        assert!(finished);
        assert!(sink.is_finished());
    }

    #[test]
    fn test_closed_sink_rejects_late_messages() {
        let sink = DiscoverySink::new();
        sink.on_message(SinkMessage::TestCaseDiscovered(sample_case("Queued")));
        sink.close();

        assert!(sink.is_closed());
        assert!(sink.is_empty());
        assert!(!sink.on_message(SinkMessage::TestCaseDiscovered(sample_case("Late"))));
        assert!(!sink.on_message(SinkMessage::DiscoveryComplete));
        assert!(!sink.is_finished());
        assert!(sink.drain().is_empty());
    }

    #[test]
    fn test_diagnostics_are_not_queued() {
        let sink = DiscoverySink::new();
        assert!(sink.on_message(SinkMessage::Diagnostic("loading".into())));
        assert!(sink.is_empty());
    }
}
