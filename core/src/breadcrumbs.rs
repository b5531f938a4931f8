// Breadcrumb navigation
//
// Shows the ancestor trail of the selected entity: ancestors as links from the root down,
// the selected entity last and unlinked.

use crate::api::{BreadcrumbEntry, ConsoleApi, EntityId};
use crate::event::{Event, EventBus, EventKind};
use crate::page::{ElementId, Page};
use crate::{ConsoleError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub const BREADCRUMB_FAILURE: &str = "Could not get entity info to show in summary.";

/// Order of the path returned by the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreadcrumbOrder {
    /// Index 0 is the selected entity, the last entry is the root
    #[default]
    LeafFirst,
    /// Index 0 is the root, the last entry is the selected entity
    RootFirst,
}

impl FromStr for BreadcrumbOrder {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leaf_first" | "leaf-first" => Ok(BreadcrumbOrder::LeafFirst),
            "root_first" | "root-first" => Ok(BreadcrumbOrder::RootFirst),
            other => Err(ConsoleError::Config(format!(
                "unknown breadcrumb order '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbItem {
    pub label: String,
    /// Entity selected when the item is clicked; `None` for the current entity
    pub target: Option<EntityId>,
}

impl BreadcrumbItem {
    pub fn link(target: EntityId, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: Some(target),
        }
    }

    pub fn current(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: None,
        }
    }

    pub fn is_link(&self) -> bool {
        self.target.is_some()
    }
}

/// Build the root-to-leaf trail. Returns `None` for an empty path.
pub fn trail(path: &[BreadcrumbEntry], order: BreadcrumbOrder) -> Option<Vec<BreadcrumbItem>> {
    let (current, ancestors): (&BreadcrumbEntry, Vec<&BreadcrumbEntry>) = match order {
        BreadcrumbOrder::LeafFirst => {
            let (leaf, rest) = path.split_first()?;
            (leaf, rest.iter().rev().collect())
        }
        BreadcrumbOrder::RootFirst => {
            let (leaf, rest) = path.split_last()?;
            (leaf, rest.iter().collect())
        }
    };

    let mut items: Vec<BreadcrumbItem> = ancestors
        .into_iter()
        .map(|entry| BreadcrumbItem::link(entry.id.clone(), entry.display_name.clone()))
        .collect();
    items.push(BreadcrumbItem::current(current.display_name.clone()));
    Some(items)
}

/// Navigation callback invoked when a breadcrumb link is clicked
pub trait NodeSelector: Send + Sync {
    fn select_node(&self, id: &EntityId);
}

impl<F> NodeSelector for F
where
    F: Fn(&EntityId) + Send + Sync,
{
    fn select_node(&self, id: &EntityId) {
        self(id)
    }
}

/// Selects a node by announcing `entity_selected` on the bus
pub struct BusNodeSelector {
    bus: Weak<EventBus>,
}

impl BusNodeSelector {
    pub fn new(bus: &Arc<EventBus>) -> Self {
        Self {
            bus: Arc::downgrade(bus),
        }
    }
}

impl NodeSelector for BusNodeSelector {
    fn select_node(&self, id: &EntityId) {
        if let Some(bus) = self.bus.upgrade() {
            bus.publish(Event::entity_selected(id.clone()));
        }
    }
}

pub struct BreadcrumbRenderer {
    api: Arc<dyn ConsoleApi>,
    bus: Arc<EventBus>,
    page: Arc<Page>,
    selector: Arc<dyn NodeSelector>,
    order: BreadcrumbOrder,
}

impl BreadcrumbRenderer {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        bus: Arc<EventBus>,
        page: Arc<Page>,
        selector: Arc<dyn NodeSelector>,
        order: BreadcrumbOrder,
    ) -> Self {
        Self {
            api,
            bus,
            page,
            selector,
            order,
        }
    }

    /// Check the navigation element exists and follow entity selection
    pub fn init(self: &Arc<Self>) -> Result<()> {
        let runtime = crate::runtime_handle()?;
        self.page.require(ElementId::Navigation)?;

        let this = Arc::downgrade(self);
        self.bus
            .subscribe(EventKind::EntitySelected, move |event: &Event| {
                let Some(renderer) = this.upgrade() else {
                    return;
                };
                match event {
                    Event::EntitySelected { id: Some(id) } => {
                        renderer.spawn_load(&runtime, id.clone());
                    }
                    _ => debug!(target: "breadcrumbs", "Selection without entity id ignored"),
                }
            });

        info!(target: "breadcrumbs", order = ?self.order, "Breadcrumb renderer initialised");
        Ok(())
    }

    pub fn spawn_load(self: &Arc<Self>, runtime: &Handle, id: EntityId) -> JoinHandle<()> {
        let this = Arc::clone(self);
        runtime.spawn(async move { this.load(&id).await })
    }

    /// Fetch and render the trail of `id`; failures go to `update_failed`
    pub async fn load(&self, id: &EntityId) {
        let result = self.api.breadcrumbs(id).await.and_then(|path| {
            trail(&path, self.order)
                .ok_or_else(|| ConsoleError::MalformedResponse("empty breadcrumb path".into()))
        });

        match result.and_then(|items| self.page.set_list(ElementId::Navigation, items)) {
            Ok(()) => debug!(target: "breadcrumbs", entity = %id, "Breadcrumbs rendered"),
            Err(e) => {
                warn!(target: "breadcrumbs", entity = %id, error = %e, "Failed to load breadcrumbs");
                self.bus.publish(Event::update_failed(BREADCRUMB_FAILURE));
            }
        }
    }

    /// Click the breadcrumb at `position`; the unlinked current entity does nothing
    pub fn click(&self, position: usize) -> Result<()> {
        let items = self.page.list(ElementId::Navigation)?;
        let item = items
            .get(position)
            .ok_or(ConsoleError::NoSuchBreadcrumb(position))?;
        if let Some(target) = &item.target {
            debug!(target: "breadcrumbs", entity = %target, "Breadcrumb clicked");
            self.selector.select_node(target);
        }
        Ok(())
    }

    pub fn items(&self) -> Result<Vec<BreadcrumbItem>> {
        self.page.list(ElementId::Navigation)
    }
}
