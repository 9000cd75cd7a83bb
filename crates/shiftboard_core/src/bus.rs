//! Publish/subscribe channel that lets one view tell its siblings to refetch.
//!
//! The bus is an ordinary value handed to whoever needs it; there is no
//! process-wide instance. A subscription lives exactly as long as the
//! returned [`Subscription`] guard.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    VolunteerUpdated,
    ShiftUpdated,
    JobUpdated,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::VolunteerUpdated, Topic::ShiftUpdated, Topic::JobUpdated];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::VolunteerUpdated => "volunteer:updated",
            Topic::ShiftUpdated => "shift:updated",
            Topic::JobUpdated => "job:updated",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything that can announce a topic. Views depend on this rather than on
/// [`EventBus`] so tests can record emissions instead.
pub trait Notifier: Send + Sync {
    fn emit(&self, topic: Topic);
}

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: Vec<(u64, Topic, Handler)>,
}

#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`. Dropping the guard deregisters it.
    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.handlers.push((id, topic, Arc::new(handler)));
        Subscription {
            id,
            topic,
            registry: Arc::downgrade(&self.registry),
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        lock(&self.registry)
            .handlers
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .count()
    }
}

impl Notifier for EventBus {
    /// Invokes every handler registered for `topic`, synchronously and in
    /// registration order. Handlers run outside the registry lock so they may
    /// subscribe or drop subscriptions themselves.
    fn emit(&self, topic: Topic) {
        let handlers: Vec<Handler> = lock(&self.registry)
            .handlers
            .iter()
            .filter(|(_, t, _)| *t == topic)
            .map(|(_, _, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler();
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = lock(&self.registry);
        f.debug_struct("EventBus")
            .field("subscribers", &registry.handlers.len())
            .finish()
    }
}

#[must_use = "dropping a Subscription immediately deregisters its handler"]
pub struct Subscription {
    id: u64,
    topic: Topic,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            lock(&registry).handlers.retain(|(id, _, _)| *id != self.id);
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
