// Recent activity widget
//
// Lists recent tasks across all entities. Fetches once on init, then again on every `update`
// tick while auto refresh is enabled.
//
// Overlapping fetches are neither merged nor cancelled: a slow response can overwrite a newer
// one that rendered first.

use crate::api::ConsoleApi;
use crate::event::{Event, EventBus, EventKind};
use crate::page::{Column, ElementId, Page, Table};
use crate::Result;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const RECENT_ACTIVITY_FAILURE: &str = "Could not obtain recent activity";

pub const ACTIVITY_COLUMNS: [Column; 5] = [
    Column {
        data_prop: "entityDisplayName",
        title: "Entity Name",
        width_percent: 20,
    },
    Column {
        data_prop: "displayName",
        title: "Task Name",
        width_percent: 20,
    },
    Column {
        data_prop: "submitTimeUtc",
        title: "Submit time",
        width_percent: 20,
    },
    Column {
        data_prop: "endTimeUtc",
        title: "End time",
        width_percent: 20,
    },
    Column {
        data_prop: "currentStatus",
        title: "Status",
        width_percent: 20,
    },
];

/// Auto refresh switch, read at tick time
#[derive(Debug, Clone, Default)]
pub struct RefreshToggle(Arc<AtomicBool>);

impl RefreshToggle {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }
}

pub struct ActivityWidget {
    api: Arc<dyn ConsoleApi>,
    bus: Arc<EventBus>,
    page: Arc<Page>,
    toggle: RefreshToggle,
    fetches: AtomicU64,
}

impl ActivityWidget {
    pub fn new(api: Arc<dyn ConsoleApi>, bus: Arc<EventBus>, page: Arc<Page>) -> Self {
        Self {
            api,
            bus,
            page,
            toggle: RefreshToggle::default(),
            fetches: AtomicU64::new(0),
        }
    }

    /// Validate the page, fetch immediately and follow `update` ticks.
    ///
    /// The toggle starts from the `updateCheck` checkbox.
    pub fn init(self: &Arc<Self>) -> Result<()> {
        let runtime = crate::runtime_handle()?;
        self.page.require(ElementId::RecentActivityTable)?;
        let auto_refresh = self.page.checked(ElementId::UpdateCheck)?;
        self.toggle.set(auto_refresh);
        info!(target: "activity", auto_refresh, "Activity widget initialised");

        self.spawn_fetch(&runtime);

        let this = Arc::downgrade(self);
        self.bus.subscribe(EventKind::Update, move |_: &Event| {
            if let Some(widget) = this.upgrade() {
                widget.on_update(&runtime);
            }
        });
        Ok(())
    }

    pub fn toggle(&self) -> RefreshToggle {
        self.toggle.clone()
    }

    pub fn auto_refresh(&self) -> bool {
        self.toggle.is_enabled()
    }

    /// Checkbox change handler
    pub fn set_auto_refresh(&self, enabled: bool) -> Result<()> {
        self.toggle.set(enabled);
        info!(target: "activity", auto_refresh = enabled, "Auto refresh changed");
        self.page.set_checked(ElementId::UpdateCheck, enabled)
    }

    /// Number of fetches issued so far
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn spawn_fetch(self: &Arc<Self>, runtime: &Handle) -> JoinHandle<()> {
        let this = Arc::clone(self);
        runtime.spawn(async move { this.fetch().await })
    }

    /// Fetch and render; failures go to `update_failed`, success to `update_ok`
    pub async fn fetch(&self) {
        let n = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(target: "activity", fetch = n, "Fetching recent activity");

        let result = self
            .api
            .all_activity()
            .await
            .and_then(|records| {
                let table = Table::from_records(&ACTIVITY_COLUMNS, &records)?;
                self.page.set_table(ElementId::RecentActivityTable, table)?;
                Ok(records.len())
            });

        match result {
            Ok(rows) => {
                debug!(target: "activity", fetch = n, rows, "Recent activity rendered");
                self.bus.publish(Event::UpdateOk);
            }
            Err(e) => {
                warn!(target: "activity", fetch = n, error = %e, "Failed to refresh recent activity");
                self.bus.publish(Event::update_failed(RECENT_ACTIVITY_FAILURE));
            }
        }
    }

    fn on_update(self: &Arc<Self>, runtime: &Handle) {
        if self.toggle.is_enabled() {
            self.spawn_fetch(runtime);
        } else {
            debug!(target: "activity", "Auto refresh off, tick ignored");
        }
    }
}
