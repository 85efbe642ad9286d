use std::sync::{Arc, Mutex};

use slswatch::feedback::{Feedback, Status};

/// One observable feedback action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackEvent {
    Clear,
    Show(Status),
}

/// Feedback surface that records what the runtime did to the terminal.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    events: Arc<Mutex<Vec<FeedbackEvent>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Only the status lines, in order.
    pub fn statuses(&self) -> Vec<Status> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FeedbackEvent::Show(status) => Some(status),
                FeedbackEvent::Clear => None,
            })
            .collect()
    }
}

impl Feedback for RecordingFeedback {
    fn clear(&mut self) {
        self.events.lock().unwrap().push(FeedbackEvent::Clear);
    }

    fn show(&mut self, status: &Status) {
        self.events
            .lock()
            .unwrap()
            .push(FeedbackEvent::Show(status.clone()));
    }
}
