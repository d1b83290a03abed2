use std::sync::{Arc, Mutex, PoisonError, Weak};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Escape,
}

/// What a bound key asks the application to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Focus the search input and clear the query, unless it is already focused
    FocusSearch,
    /// Close the open detail view
    CloseDetail,
}

struct Binding {
    id: u64,
    key: Key,
    intent: Intent,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    bindings: Vec<Binding>,
}

/// Global key bindings whose lifetime is tied to a `Subscription`.
#[derive(Clone, Default)]
pub struct Shortcuts {
    registry: Arc<Mutex<Registry>>,
}

/// Keeps a binding alive; dropping it unbinds.
#[must_use = "the binding is removed as soon as the subscription is dropped"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Shortcuts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, key: Key, intent: Intent) -> Subscription {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.bindings.push(Binding { id, key, intent });
        trace!("Bound {:?} -> {:?} (#{})", key, intent, id);

        Subscription {
            registry: Arc::downgrade(&self.registry),
            id,
        }
    }

    /// Intents bound to `key`, most recently bound first
    pub fn dispatch(&self, key: Key) -> Vec<Intent> {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .bindings
            .iter()
            .rev()
            .filter(|b| b.key == key)
            .map(|b| b.intent)
            .collect()
    }

    pub fn is_bound(&self, key: Key) -> bool {
        !self.dispatch(key).is_empty()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.bindings.retain(|b| b.id != self.id);
            trace!("Unbound #{}", self.id);
        }
    }
}
