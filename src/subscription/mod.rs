//! Subscription management.
//!
//! This module holds the consumer side of an observable: the `Handlers` a
//! consumer subscribes with, the `Subscriber` a producer emits into, the
//! `Subscription` handle used to cancel, and the `Teardown` a producer returns
//! to release its resources once the subscription terminates.
pub mod subscribe;
mod teardown;
