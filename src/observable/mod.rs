//! The `observable` module provides [`Observable`], a cold, push-based source of
//! values for a single consumer per subscription.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use crate::observer::Observer;
use crate::subscription::subscribe::{Handlers, Subscribeable, Subscriber, Subscription, Teardown};
use crate::ObservableError;

type Producer<T> = dyn Fn(Subscriber<T>) -> Teardown + Send + Sync;

/// The `Observable` struct represents a source of values that can be observed.
///
/// An `Observable` wraps a producer function. Nothing happens until it is
/// subscribed to; each call to `subscribe` runs the producer again with a fresh
/// [`Subscriber`], so two subscriptions never share emissions or state.
///
/// # Example: basic synchronous `Observable`
///
/// The producer runs to completion inside `subscribe`, and the `Teardown` it
/// returns runs once the subscription terminates.
///
/// ```
/// use rxlite::subscribe::{Handlers, Teardown};
/// use rxlite::{Observable, Observer, Subscribeable};
///
/// let emit_10_observable = Observable::new(|mut subscriber| {
///     for i in 1..=10 {
///         subscriber.next(i);
///     }
///     subscriber.complete();
///
///     Teardown::logic(|| println!("Released"))
/// });
///
/// let handlers = Handlers::on_next(|v: i32| println!("Emitted {}", v))
///     .with_complete(|| println!("Completed"));
///
/// emit_10_observable.subscribe(handlers);
/// ```
///
/// # Example: `Observable` emitting from a thread
///
/// The `Subscriber` can move into another thread. The returned teardown flags
/// the thread to stop, and the producer also checks `is_closed()`.
///
/// ```no_run
/// use std::{sync::{atomic::{AtomicBool, Ordering}, Arc}, time::Duration};
///
/// use rxlite::subscribe::{Handlers, Teardown, Unsubscribeable};
/// use rxlite::{Observable, Observer, Subscribeable};
///
/// let observable = Observable::new(|mut o| {
///     let done = Arc::new(AtomicBool::new(false));
///     let done_c = Arc::clone(&done);
///
///     std::thread::spawn(move || {
///         for i in 0.. {
///             if done_c.load(Ordering::SeqCst) || o.is_closed() {
///                 break;
///             }
///             o.next(i);
///             std::thread::sleep(Duration::from_millis(1));
///         }
///     });
///
///     Teardown::logic(move || done.store(true, Ordering::SeqCst))
/// });
///
/// let subscription = observable.subscribe(Handlers::on_next(|v: u64| println!("{}", v)));
/// std::thread::sleep(Duration::from_millis(20));
/// subscription.unsubscribe();
/// ```
pub struct Observable<T> {
    producer: Arc<Producer<T>>,
    catch_unwind: bool,
}

impl<T: 'static> Observable<T> {
    /// Creates an `Observable` from a producer function.
    ///
    /// The producer receives the subscription's [`Subscriber`] and returns the
    /// [`Teardown`] to run when that subscription terminates.
    pub fn new(producer: impl Fn(Subscriber<T>) -> Teardown + Send + Sync + 'static) -> Self {
        Observable {
            producer: Arc::new(producer),
            catch_unwind: false,
        }
    }

    /// Creates an `Observable` that emits every value of `values` in order and
    /// then completes.
    ///
    /// Values are cloned for each subscription.
    ///
    /// ```
    /// use std::sync::{Arc, Mutex};
    ///
    /// use rxlite::subscribe::Handlers;
    /// use rxlite::{Observable, Subscribeable};
    ///
    /// let seen = Arc::new(Mutex::new(Vec::new()));
    /// let seen_c = Arc::clone(&seen);
    ///
    /// Observable::from([1, 2, 3]).subscribe(Handlers::on_next(move |v: i32| {
    ///     seen_c.lock().unwrap().push(v);
    /// }));
    ///
    /// assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn from<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Clone + Send + Sync,
    {
        let values: Vec<T> = values.into_iter().collect();
        Observable::new(move |mut o| {
            for v in &values {
                o.next(v.clone());
            }
            o.complete();

            let count = values.len();
            Teardown::logic(move || {
                tracing::debug!(values = count, "unsubscribed from sequence");
            })
        })
    }

    /// Runs the producer inside a panic boundary.
    ///
    /// A panic escaping the producer, including one raised by a consumer
    /// handler while the producer is emitting, is delivered to the consumer as
    /// a single `error` carrying [`ObservableError::ProducerPanicked`] instead
    /// of unwinding out of `subscribe`. If the subscription had already
    /// terminated, the panic is dropped.
    #[must_use]
    pub fn catch_unwind(mut self) -> Self {
        self.catch_unwind = true;
        self
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Observable {
            producer: Arc::clone(&self.producer),
            catch_unwind: self.catch_unwind,
        }
    }
}

impl<T: 'static> Subscribeable for Observable<T> {
    type ObsType = T;

    fn subscribe(&self, handlers: Handlers<Self::ObsType>) -> Subscription {
        tracing::trace!(?handlers, "subscribing");

        let subscriber = Subscriber::new(handlers);
        let subscription = subscriber.subscription();

        if !self.catch_unwind {
            let teardown = (self.producer)(subscriber);
            subscription.lifecycle.arm(teardown);
            return subscription;
        }

        let mut witness = subscriber.twin();
        match panic::catch_unwind(AssertUnwindSafe(|| (self.producer)(subscriber))) {
            Ok(teardown) => subscription.lifecycle.arm(teardown),
            Err(payload) => {
                let e = ObservableError::from_panic(payload);
                tracing::warn!(error = %e, "producer panicked during subscribe");
                witness.error(Arc::new(e));
            }
        }
        subscription
    }
}
