// Event bus implementation
use crate::api::EntityId;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Named event channels shared by every console component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Periodic refresh tick, no payload
    Update,
    /// A component refreshed its data, no payload
    UpdateOk,
    /// A component failed to refresh; carries an optional human readable message
    UpdateFailed,
    /// An entity was selected somewhere in the UI; carries the entity id
    EntitySelected,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Update,
        EventKind::UpdateOk,
        EventKind::UpdateFailed,
        EventKind::EntitySelected,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EventKind::Update => "update",
            EventKind::UpdateOk => "update_ok",
            EventKind::UpdateFailed => "update_failed",
            EventKind::EntitySelected => "entity_selected",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Event together with its payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Update,
    UpdateOk,
    UpdateFailed { message: Option<String> },
    EntitySelected { id: Option<EntityId> },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Update => EventKind::Update,
            Event::UpdateOk => EventKind::UpdateOk,
            Event::UpdateFailed { .. } => EventKind::UpdateFailed,
            Event::EntitySelected { .. } => EventKind::EntitySelected,
        }
    }

    pub fn update_failed(message: impl Into<String>) -> Self {
        Event::UpdateFailed {
            message: Some(message.into()),
        }
    }

    pub fn entity_selected(id: impl Into<EntityId>) -> Self {
        Event::EntitySelected {
            id: Some(id.into()),
        }
    }
}

/// Event handler trait
///
/// Handlers run synchronously inside `publish` and must not block; anything slow is spawned.
pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle(&self, event: &Event) {
        self(event)
    }
}

/// Event bus statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventBusStats {
    pub total_published: u64,
    pub total_delivered: u64,
    pub active_subscriptions: usize,
}

/// Event bus core implementation
///
/// Pure fan-out: events are never queued or retained after `publish` returns.
pub struct EventBus {
    // Kind -> handlers in registration order
    subscriptions: DashMap<EventKind, Vec<Arc<dyn EventHandler>>>,

    // Statistics
    stats: DashMap<EventKind, EventBusStats>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: DashMap::new(),
            stats: DashMap::new(),
        }
    }

    /// Publish event to every handler of its kind, in registration order.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: Event) -> usize {
        let kind = event.kind();
        debug!(target: "event_bus", event = %kind, "Publishing event");

        // Snapshot so handlers may publish or subscribe without holding the map lock
        let handlers = self
            .subscriptions
            .get(&kind)
            .map(|subs| subs.value().clone())
            .unwrap_or_default();

        self.update_stats(kind, |stats| {
            stats.total_published += 1;
        });

        if handlers.is_empty() {
            debug!(target: "event_bus", event = %kind, "No subscriptions for event");
            return 0;
        }

        for handler in &handlers {
            handler.handle(&event);
        }

        self.update_stats(kind, |stats| {
            stats.total_delivered += handlers.len() as u64;
        });
        handlers.len()
    }

    /// Subscribe handler to an event kind
    pub fn subscribe<H>(&self, kind: EventKind, handler: H)
    where
        H: EventHandler + 'static,
    {
        self.subscriptions
            .entry(kind)
            .or_default()
            .push(Arc::new(handler));

        self.update_stats(kind, |stats| {
            stats.active_subscriptions += 1;
        });

        info!(target: "event_bus", event = %kind, "Created subscription");
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions
            .get(&kind)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Get stats
    pub fn get_stats(&self, kind: EventKind) -> Option<EventBusStats> {
        self.stats.get(&kind).map(|s| s.clone())
    }

    // Update stats helper function
    fn update_stats<F>(&self, kind: EventKind, f: F)
    where
        F: FnOnce(&mut EventBusStats),
    {
        self.stats.entry(kind).or_default().value_mut().apply(f);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Helper trait for chaining calls
trait Apply {
    fn apply<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self);
}

impl<T> Apply for T {
    fn apply<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        f(self)
    }
}
