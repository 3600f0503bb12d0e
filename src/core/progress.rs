// ─── Progress Scaling ───
// Download occupies 0–50 of the bar, extraction 50–100.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::core::events::EventSender;

pub const DOWNLOAD_END: u8 = 50;
pub const EXTRACT_END: u8 = 100;

/// Raw download percentage (0–100) from bytes received.
pub fn raw_percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    (done.min(total) * 100 / total) as u8
}

/// Maps a download percentage onto the lower half of the bar.
pub fn download_percent(raw: u8) -> u8 {
    raw.min(100) / 2
}

/// Maps entries processed onto the upper half of the bar.
pub fn extract_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return EXTRACT_END;
    }
    let done = done.min(total) as u64;
    DOWNLOAD_END + (done * u64::from(EXTRACT_END - DOWNLOAD_END) / total as u64) as u8
}

/// Forwards progress to the display, never letting the bar move backwards.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    events: EventSender,
    last: Arc<AtomicU8>,
}

impl ProgressReporter {
    pub fn new(events: EventSender) -> Self {
        Self {
            events,
            last: Arc::new(AtomicU8::new(0)),
        }
    }

    pub fn report(&self, percent: u8, message: impl Into<String>) {
        let percent = percent.min(EXTRACT_END);
        let previous = self.last.fetch_max(percent, Ordering::SeqCst);
        self.events.progress(previous.max(percent), message);
    }

    pub fn current(&self) -> u8 {
        self.last.load(Ordering::SeqCst)
    }
}
