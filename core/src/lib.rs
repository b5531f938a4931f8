// Brooklyn Console Core Library
// Event-driven dashboard runtime: event bus, refresh timer, widgets

pub mod api;
pub mod breadcrumbs;
pub mod config;
pub mod event;
pub mod page;
pub mod status;
pub mod timer;
pub mod widgets;

// Export core types
pub use api::{ActivityRecord, BreadcrumbEntry, ConsoleApi, EntityId, HttpConsoleApi};
pub use breadcrumbs::{BreadcrumbItem, BreadcrumbOrder, BreadcrumbRenderer, BusNodeSelector, NodeSelector};
pub use config::ConsoleConfig;
pub use event::{Event, EventBus, EventHandler, EventKind};
pub use page::{Column, Element, ElementId, ElementKind, Page, Table};
pub use status::{Clock, LocalClock, StatusLine};
pub use timer::{RefreshTimer, REFRESH_INTERVAL};
pub use widgets::{ActivityWidget, RefreshToggle};

use std::sync::Arc;

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Page has no element #{0}")]
    MissingElement(ElementId),

    #[error("Element #{id} is a {actual}, not a {expected}")]
    WrongElementKind {
        id: ElementId,
        expected: ElementKind,
        actual: ElementKind,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No breadcrumb at position {0}")]
    NoSuchBreadcrumb(usize),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Handle of the runtime the console components spawn their fetches on.
pub(crate) fn runtime_handle() -> Result<tokio::runtime::Handle> {
    tokio::runtime::Handle::try_current().map_err(|_| {
        ConsoleError::Config("console components must be started inside a tokio runtime".into())
    })
}

/// Console runtime
///
/// Owns one instance of every component and wires them to a shared event bus on `start`.
pub struct Console {
    pub config: ConsoleConfig,
    pub event_bus: Arc<EventBus>,
    pub page: Arc<Page>,
    pub activity: Arc<ActivityWidget>,
    pub status_line: Arc<StatusLine>,
    pub breadcrumbs: Arc<BreadcrumbRenderer>,
    api: Arc<dyn ConsoleApi>,
    timer: Option<RefreshTimer>,
}

impl Console {
    pub fn new(config: ConsoleConfig, api: Arc<dyn ConsoleApi>, page: Arc<Page>) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let selector: Arc<dyn NodeSelector> = Arc::new(BusNodeSelector::new(&event_bus));

        Self {
            activity: Arc::new(ActivityWidget::new(
                Arc::clone(&api),
                Arc::clone(&event_bus),
                Arc::clone(&page),
            )),
            status_line: Arc::new(StatusLine::new(Arc::clone(&page), Arc::new(LocalClock))),
            breadcrumbs: Arc::new(BreadcrumbRenderer::new(
                Arc::clone(&api),
                Arc::clone(&event_bus),
                Arc::clone(&page),
                selector,
                config.breadcrumb_order,
            )),
            config,
            event_bus,
            page,
            api,
            timer: None,
        }
    }

    /// Replace the callback invoked when a breadcrumb link is clicked
    pub fn with_node_selector(mut self, selector: Arc<dyn NodeSelector>) -> Self {
        self.breadcrumbs = Arc::new(BreadcrumbRenderer::new(
            Arc::clone(&self.api),
            Arc::clone(&self.event_bus),
            Arc::clone(&self.page),
            selector,
            self.config.breadcrumb_order,
        ));
        self
    }

    /// Replace the time source of the status line
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.status_line = Arc::new(StatusLine::new(Arc::clone(&self.page), clock));
        self
    }

    pub fn start(&mut self) -> Result<()> {
        if self.timer.is_some() {
            return Err(ConsoleError::Config("console already started".into()));
        }
        self.config.validate()?;
        runtime_handle()?;
        // Nothing subscribes or writes to the page until every element is known to exist
        for id in ElementId::ALL {
            self.page.require(id)?;
        }
        tracing::info!("Starting console...");

        self.page
            .set_checked(ElementId::UpdateCheck, self.config.auto_refresh)?;
        self.status_line.init(&self.event_bus)?;
        self.breadcrumbs.init()?;
        self.activity.init()?;
        self.timer = Some(RefreshTimer::start(
            Arc::clone(&self.event_bus),
            self.config.refresh_interval(),
        )?);

        tracing::info!(page_url = %self.config.page_url, "Console started successfully");
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            tracing::info!("Shutting down console...");
            timer.shutdown();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Announce that an entity was selected elsewhere in the UI
    pub fn select_entity(&self, id: impl Into<EntityId>) -> usize {
        self.event_bus.publish(Event::entity_selected(id))
    }
}
