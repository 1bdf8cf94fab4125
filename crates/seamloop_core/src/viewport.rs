//! Viewport resize notifications
//!
//! The viewport owns a registry of subscriptions. A resize raises every
//! subscriber's dirty flag; subscribers poll the flag from their own frame
//! tick, so no callback ever re-enters the component that owns the
//! subscription.
//!
//! Subscriptions hold a weak handle back to the viewport and remove
//! themselves when disposed or dropped.

use crate::geometry::Size;
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

new_key_type! {
    /// Handle to a registered resize subscription
    pub struct SubscriptionId;
}

/// Shared flag raised when a resize is pending
pub type DirtyFlag = Arc<AtomicBool>;

struct ViewportInner {
    size: Size,
    subscribers: SlotMap<SubscriptionId, DirtyFlag>,
}

fn lock(inner: &Mutex<ViewportInner>) -> MutexGuard<'_, ViewportInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The resize source
pub struct Viewport {
    inner: Arc<Mutex<ViewportInner>>,
}

impl Viewport {
    pub fn new(size: Size) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ViewportInner {
                size,
                subscribers: SlotMap::with_key(),
            })),
        }
    }

    pub fn size(&self) -> Size {
        lock(&self.inner).size
    }

    /// Record a new size and flag every subscriber
    ///
    /// A resize to the current size is still delivered, matching how hosts
    /// report resize events without diffing.
    pub fn resize(&self, size: Size) {
        let mut inner = lock(&self.inner);
        inner.size = size;
        for (_, flag) in inner.subscribers.iter() {
            flag.store(true, Ordering::Release);
        }
        tracing::debug!(
            "Viewport resized to {}x{} ({} subscribers)",
            size.width,
            size.height,
            inner.subscribers.len()
        );
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).subscribers.len()
    }

    /// Get a weak handle for passing to components
    pub fn handle(&self) -> ViewportHandle {
        ViewportHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A weak handle to the viewport
///
/// It won't keep the viewport alive.
#[derive(Clone)]
pub struct ViewportHandle {
    inner: Weak<Mutex<ViewportInner>>,
}

impl ViewportHandle {
    /// Register for resize notifications
    ///
    /// Returns `None` if the viewport has been dropped.
    pub fn subscribe(&self) -> Option<ResizeSubscription> {
        self.inner.upgrade().map(|inner| {
            let flag: DirtyFlag = Arc::new(AtomicBool::new(false));
            let id = lock(&inner).subscribers.insert(Arc::clone(&flag));
            ResizeSubscription {
                id,
                flag,
                handle: self.clone(),
            }
        })
    }

    /// Current viewport size, if the viewport is still alive
    pub fn size(&self) -> Option<Size> {
        let inner = self.inner.upgrade()?;
        let size = lock(&inner).size;
        Some(size)
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).subscribers.remove(id);
        }
    }
}

/// A live resize subscription
///
/// Removed from the viewport by [`ResizeSubscription::dispose`] or on drop.
pub struct ResizeSubscription {
    id: SubscriptionId,
    flag: DirtyFlag,
    handle: ViewportHandle,
}

impl ResizeSubscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Check and clear the pending-resize flag
    pub fn take_resized(&self) -> bool {
        self.flag.swap(false, Ordering::Acquire)
    }

    /// Remove this subscription from the viewport
    pub fn dispose(self) {
        // Drop does the work
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.handle.unsubscribe(self.id);
    }
}

impl std::fmt::Debug for ResizeSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResizeSubscription")
            .field("id", &self.id)
            .field("pending", &self.flag.load(Ordering::Relaxed))
            .finish()
    }
}
