//! `rxlite` is a minimal implementation of the observable pattern: a producer
//! pushes values, then an error or a completion signal, to a single consumer,
//! and the consumer can unsubscribe to stop delivery and release resources.
//!
//! An [`Observable`] wraps a producer function. Subscribing runs the producer
//! with a fresh [`Subscriber`](subscribe::Subscriber) that forwards emissions to
//! the consumer's [`Handlers`](subscribe::Handlers). Once the subscription
//! errors, completes or is unsubscribed, it is closed for good: no handler
//! runs again and the producer's [`Teardown`](subscribe::Teardown) runs once.
//!
//! ```
//! use rxlite::subscribe::{Handlers, Unsubscribeable};
//! use rxlite::{Observable, Subscribeable};
//!
//! let subscription = Observable::from(vec!["a", "b"]).subscribe(
//!     Handlers::on_next(|v: &str| println!("{}", v)).with_complete(|| println!("done")),
//! );
//!
//! // Everything was delivered synchronously; this has no further effect.
//! subscription.unsubscribe();
//! assert!(subscription.is_closed());
//! ```

mod errors;
pub mod observable;
pub mod observer;
pub mod subscription;

pub use errors::*;
pub use observable::Observable;
pub use observer::Observer;
pub use subscription::subscribe;
pub use subscription::subscribe::{Subscribeable, Unsubscribeable};
