//! Change notification for state containers.
//!
//! Views that render derived state (cart drawer, badge, outfit preview)
//! register a callback with the container that owns the state. Every mutation
//! function on the container notifies the registered callbacks synchronously,
//! in registration order. The registry is bounded so a leaking caller fails
//! loudly instead of growing the list forever.

use std::fmt;
use std::sync::Arc;

/// Maximum number of callbacks a single container accepts.
pub const MAX_OBSERVERS: usize = 8;

/// Errors returned by [`Observers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    /// The registry already holds [`MAX_OBSERVERS`] callbacks.
    #[error("observer registry is full ({max} callbacks)")]
    CapacityExceeded {
        /// Registry capacity.
        max: usize,
    },
}

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A bounded set of callbacks notified with events of type `E`.
pub struct Observers<E> {
    callbacks: Vec<(SubscriptionId, Callback<E>)>,
    next_id: u64,
}

impl<E> Observers<E> {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::CapacityExceeded`] when [`MAX_OBSERVERS`]
    /// callbacks are already registered.
    pub fn subscribe<F>(&mut self, callback: F) -> Result<SubscriptionId, ObserverError>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        if self.callbacks.len() >= MAX_OBSERVERS {
            return Err(ObserverError::CapacityExceeded { max: MAX_OBSERVERS });
        }

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Arc::new(callback)));
        Ok(id)
    }

    /// Remove a callback. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() != before
    }

    /// Deliver `event` to every registered callback.
    pub fn notify(&self, event: &E) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Observers<E> {
    fn clone(&self) -> Self {
        Self {
            callbacks: self.callbacks.clone(),
            next_id: self.next_id,
        }
    }
}

impl<E> fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}
