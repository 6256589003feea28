use std::{error::Error, fmt, sync::Arc};

use parking_lot::Mutex;

use super::teardown::Lifecycle;
pub use super::teardown::Teardown;
use crate::observer::Observer;

/// A trait for types that can be subscribed to, allowing consumers to receive
/// values emitted by an observable stream.
pub trait Subscribeable {
    /// The type of items emitted by the observable stream.
    type ObsType;

    /// Subscribes to the observable stream with the given handler set.
    ///
    /// Every call starts an independent run of the stream. The returned
    /// `Subscription` stops further delivery when unsubscribed.
    fn subscribe(&self, handlers: Handlers<Self::ObsType>) -> Subscription;
}

/// A trait for types that can be unsubscribed, releasing the resources held by
/// a subscription and telling its producer to stop emitting.
pub trait Unsubscribeable {
    /// Terminates the subscription and runs its teardown.
    ///
    /// Calling it again, or after the stream already errored or completed, has
    /// no further effect.
    fn unsubscribe(&self);

    /// Returns `true` once the subscription has terminated.
    fn is_closed(&self) -> bool;
}

type NextFn<T> = Box<dyn FnMut(T) + Send>;
type CompleteFn = Box<dyn FnMut() + Send>;
type ErrorFn = Box<dyn FnMut(Arc<dyn Error + Send + Sync>) + Send>;

/// The consumer's handler set: up to three optional callbacks invoked for
/// `next`, `error` and `complete` emissions.
///
/// ```
/// use rxlite::subscribe::Handlers;
///
/// let handlers = Handlers::on_next(|v: i32| println!("Emitted {}", v))
///     .with_complete(|| println!("Completed"));
/// # drop(handlers);
/// ```
pub struct Handlers<T> {
    next_fn: Option<NextFn<T>>,
    error_fn: Option<ErrorFn>,
    complete_fn: Option<CompleteFn>,
}

impl<T> Handlers<T> {
    /// Creates a handler set with all three callbacks.
    pub fn new(
        next_fn: impl FnMut(T) + 'static + Send,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send,
        complete_fn: impl FnMut() + 'static + Send,
    ) -> Self {
        Handlers {
            next_fn: Some(Box::new(next_fn)),
            error_fn: Some(Box::new(error_fn)),
            complete_fn: Some(Box::new(complete_fn)),
        }
    }

    /// Creates a handler set with only a `next` callback.
    pub fn on_next(next_fn: impl FnMut(T) + 'static + Send) -> Self {
        Handlers {
            next_fn: Some(Box::new(next_fn)),
            error_fn: None,
            complete_fn: None,
        }
    }

    /// Sets the callback invoked for every value the stream emits.
    #[must_use]
    pub fn with_next(mut self, next_fn: impl FnMut(T) + 'static + Send) -> Self {
        self.next_fn = Some(Box::new(next_fn));
        self
    }

    /// Sets the callback invoked when the stream terminates with an error.
    #[must_use]
    pub fn with_error(
        mut self,
        error_fn: impl FnMut(Arc<dyn Error + Send + Sync>) + 'static + Send,
    ) -> Self {
        self.error_fn = Some(Box::new(error_fn));
        self
    }

    /// Sets the callback invoked when the stream completes.
    #[must_use]
    pub fn with_complete(mut self, complete_fn: impl FnMut() + 'static + Send) -> Self {
        self.complete_fn = Some(Box::new(complete_fn));
        self
    }
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Handlers {
            next_fn: None,
            error_fn: None,
            complete_fn: None,
        }
    }
}

impl<T> fmt::Debug for Handlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("next", &self.next_fn.is_some())
            .field("error", &self.error_fn.is_some())
            .field("complete", &self.complete_fn.is_some())
            .finish()
    }
}

/// The observer handed to a producer for the lifetime of one subscription.
///
/// `Subscriber` forwards emissions to the consumer's [`Handlers`] until the
/// subscription terminates. After an `error`, a `complete` or an unsubscribe,
/// every further emission is dropped and no handler is invoked again.
///
/// A `Subscriber` is `Send`, so producers may move it into a thread or a task
/// and poll [`is_closed`](Subscriber::is_closed) to stop early.
pub struct Subscriber<T> {
    handlers: Arc<Mutex<Handlers<T>>>,
    lifecycle: Arc<Lifecycle>,
}

impl<T> Subscriber<T> {
    pub(crate) fn new(handlers: Handlers<T>) -> Self {
        Subscriber {
            handlers: Arc::new(Mutex::new(handlers)),
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    // Second handle onto the same subscription, kept by `subscribe` to report
    // a producer panic after the producer's own handle has been dropped.
    pub(crate) fn twin(&self) -> Self {
        Subscriber {
            handlers: Arc::clone(&self.handlers),
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }

    pub(crate) fn subscription(&self) -> Subscription {
        Subscription {
            lifecycle: Arc::clone(&self.lifecycle),
        }
    }

    /// Returns `true` once the subscription has errored, completed or been
    /// unsubscribed. Long running producers should stop emitting when it does.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Terminates the subscription from the producer side and runs its
    /// teardown. No handler is invoked.
    pub fn unsubscribe(&mut self) {
        self.lifecycle.close();
    }
}

impl<T> Subscriber<T> {
    // The terminal transition is claimed before the handler runs, so a
    // panicking handler cannot be followed by a second terminal event.
    fn terminate(&self, invoke: impl FnOnce(&mut Handlers<T>)) {
        let _release = {
            let _emitting = self.lifecycle.emitting();
            if !self.lifecycle.claim() {
                return;
            }
            let release = self.lifecycle.release_on_drop();
            invoke(&mut self.handlers.lock());
            release
        };
    }
}

impl<T> Observer for Subscriber<T> {
    type Item = T;

    fn next(&mut self, v: Self::Item) {
        let _emitting = self.lifecycle.emitting();
        if self.lifecycle.is_closed() {
            return;
        }
        if let Some(nfn) = &mut self.handlers.lock().next_fn {
            (nfn)(v);
        }
    }

    fn complete(&mut self) {
        self.terminate(|handlers| {
            if let Some(cfn) = &mut handlers.complete_fn {
                (cfn)();
            }
        });
    }

    fn error(&mut self, observable_error: Arc<dyn Error + Send + Sync>) {
        self.terminate(|handlers| {
            if let Some(efn) = &mut handlers.error_fn {
                (efn)(observable_error);
            }
        });
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Handle returned from `subscribe`, used to cancel the subscription.
///
/// The handle shares the subscription's termination state but not the
/// consumer's handlers.
pub struct Subscription {
    pub(crate) lifecycle: Arc<Lifecycle>,
}

impl Unsubscribeable for Subscription {
    fn unsubscribe(&self) {
        self.lifecycle.close();
    }

    fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}
