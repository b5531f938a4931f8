// Status line
//
// Tells the user the dashboard data is live, or when and why the last refresh failed.
// Any component can report through `update_ok` / `update_failed`; the last report wins.

use crate::event::{Event, EventBus, EventKind};
use crate::page::{ElementId, Page};
use crate::Result;
use chrono::{NaiveTime, Timelike};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shown when an `update_failed` event carries no message
pub const UNKNOWN_ERROR: &str = "unknown error";

/// Wall-clock time source
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveTime;
}

/// Local time, no timezone conversion
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// `HH:MM:SS`, each component zero-padded to two digits
pub fn format_clock(hour: u32, minute: u32, second: u32) -> String {
    format!("{hour:02}:{minute:02}:{second:02}")
}

pub fn format_time(time: NaiveTime) -> String {
    format_clock(time.hour(), time.minute(), time.second())
}

/// `Failed at HH:MM:SS (<message>)`; empty or absent messages read "unknown error"
pub fn failure_text(time: NaiveTime, message: Option<&str>) -> String {
    let message = message.filter(|m| !m.is_empty()).unwrap_or(UNKNOWN_ERROR);
    format!("Failed at {} ({message})", format_time(time))
}

pub struct StatusLine {
    page: Arc<Page>,
    clock: Arc<dyn Clock>,
}

impl StatusLine {
    pub fn new(page: Arc<Page>, clock: Arc<dyn Clock>) -> Self {
        Self { page, clock }
    }

    /// Check the status element exists and start listening for status events
    pub fn init(self: &Arc<Self>, bus: &EventBus) -> Result<()> {
        self.page.require(ElementId::StatusMessage)?;

        let this = Arc::downgrade(self);
        bus.subscribe(EventKind::UpdateOk, move |_: &Event| {
            if let Some(status) = this.upgrade() {
                status.update_ok();
            }
        });

        let this = Arc::downgrade(self);
        bus.subscribe(EventKind::UpdateFailed, move |event: &Event| {
            if let (Some(status), Event::UpdateFailed { message }) = (this.upgrade(), event) {
                status.update_failed(message.as_deref());
            }
        });
        Ok(())
    }

    pub fn update_ok(&self) {
        self.show(format_time(self.clock.now()));
    }

    pub fn update_failed(&self, message: Option<&str>) {
        self.show(failure_text(self.clock.now(), message));
    }

    fn show(&self, text: String) {
        debug!(target: "status", status = %text, "Status changed");
        if let Err(e) = self.page.set_text(ElementId::StatusMessage, text) {
            warn!(target: "status", error = %e, "Failed to render status");
        }
    }
}
