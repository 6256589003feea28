use std::{
    fmt,
    future::Future,
    mem,
    pin::Pin,
    sync::atomic::{AtomicBool, Ordering},
};

use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use tokio::runtime;

use super::subscribe::{Subscription, Unsubscribeable};
use crate::ObservableError;

/// Cleanup returned from the producer function passed to [`Observable::new`].
///
/// The teardown of a subscription runs exactly once, when that subscription
/// terminates through `error`, `complete` or `unsubscribe`, whichever happens
/// first.
///
/// [`Observable::new`]: crate::Observable::new
#[derive(Default)]
pub enum Teardown {
    /// Nothing to release.
    #[default]
    Nil,

    /// Teardown defined by a function.
    Logic(Box<dyn FnOnce() + Send>),

    /// Unsubscribe from another subscription, typically one the producer made
    /// to an inner observable.
    Wrapped(Subscription),

    /// Asynchronous teardown. Spawned on the `Tokio` runtime that was current
    /// when the observable was subscribed to.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl Teardown {
    /// Wraps a closure as teardown logic.
    pub fn logic(f: impl FnOnce() + Send + 'static) -> Self {
        Teardown::Logic(Box::new(f))
    }

    fn run(self, runtime_handle: Option<&runtime::Handle>) {
        match self {
            Teardown::Nil => (),
            Teardown::Logic(fnc) => fnc(),
            Teardown::Wrapped(subscription) => subscription.unsubscribe(),
            Teardown::Future(future) => {
                if let Some(handle) = runtime_handle {
                    handle.spawn(watch_cancellation(future));
                } else if let Ok(handle) = runtime::Handle::try_current() {
                    handle.spawn(watch_cancellation(future));
                } else if let Err(e) = block_on_detached(future) {
                    tracing::error!(error = %e, "asynchronous teardown did not run");
                }
            }
        }
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Teardown::Nil => f.write_str("Nil"),
            Teardown::Logic(_) => f.write_str("Logic(..)"),
            Teardown::Wrapped(s) => f.debug_tuple("Wrapped").field(s).finish(),
            Teardown::Future(_) => f.write_str("Future(..)"),
        }
    }
}

struct CancelWatch {
    finished: bool,
}

impl Drop for CancelWatch {
    fn drop(&mut self) {
        if !self.finished {
            tracing::warn!("asynchronous teardown dropped before it finished");
        }
    }
}

// A runtime that has shut down drops spawned tasks without polling them.
fn watch_cancellation(
    future: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> impl Future<Output = ()> + Send {
    let mut watch = CancelWatch { finished: false };
    async move {
        future.await;
        watch.finished = true;
    }
}

// Only reached when no runtime is current, so `block_on` cannot nest.
fn block_on_detached(
    future: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> Result<(), ObservableError> {
    let rt = runtime::Builder::new_current_thread().enable_all().build()?;
    rt.block_on(future);
    Ok(())
}

enum Slot {
    // Producer has not returned yet.
    Pending,
    Armed(Teardown),
    Released,
}

/// Termination state shared between a `Subscriber` and its `Subscription`.
pub(crate) struct Lifecycle {
    closed: AtomicBool,
    // Held while a handler runs, so a close from another thread waits for it.
    emitting: ReentrantMutex<()>,
    slot: Mutex<Slot>,
    runtime_handle: Option<runtime::Handle>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        Lifecycle {
            closed: AtomicBool::new(false),
            emitting: ReentrantMutex::new(()),
            slot: Mutex::new(Slot::Pending),
            runtime_handle: runtime::Handle::try_current().ok(),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Serializes deliveries against termination. Reentrant, so a handler may
    /// unsubscribe its own subscription.
    pub(crate) fn emitting(&self) -> ReentrantMutexGuard<'_, ()> {
        self.emitting.lock()
    }

    /// Marks the subscription terminated. Returns `true` for the first caller
    /// only; the teardown is left to [`release`](Lifecycle::release).
    pub(crate) fn claim(&self) -> bool {
        let first = !self.closed.swap(true, Ordering::AcqRel);
        if first {
            tracing::trace!("subscription closed");
        }
        first
    }

    /// Runs the teardown if it is armed.
    ///
    /// The slot is released even when nothing is armed yet, so a teardown the
    /// producer returns afterwards runs as soon as it is registered.
    pub(crate) fn release(&self) {
        let previous = mem::replace(&mut *self.slot.lock(), Slot::Released);
        if let Slot::Armed(teardown) = previous {
            teardown.run(self.runtime_handle.as_ref());
        }
    }

    /// Guard that calls [`release`](Lifecycle::release) when dropped, including
    /// while unwinding out of a handler.
    pub(crate) fn release_on_drop(&self) -> ReleaseOnDrop<'_> {
        ReleaseOnDrop(self)
    }

    /// Marks the subscription terminated and runs its teardown.
    ///
    /// Waits for a handler running on another thread to return first.
    pub(crate) fn close(&self) {
        {
            let _emitting = self.emitting();
            self.claim();
        }
        self.release();
    }

    /// Registers the producer's teardown.
    pub(crate) fn arm(&self, teardown: Teardown) {
        let mut slot = self.slot.lock();
        if matches!(*slot, Slot::Pending) {
            *slot = Slot::Armed(teardown);
            return;
        }
        drop(slot);
        teardown.run(self.runtime_handle.as_ref());
    }
}

pub(crate) struct ReleaseOnDrop<'a>(&'a Lifecycle);

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        self.0.release();
    }
}
