use std::any::Any;
use std::io;

use thiserror::Error;

/// Errors raised by `rxlite` itself, as opposed to the errors producers emit
/// through `Observer::error`.
#[derive(Debug, Error)]
pub enum ObservableError {
    /// A producer panicked inside an observable created with
    /// [`Observable::catch_unwind`].
    ///
    /// [`Observable::catch_unwind`]: crate::Observable::catch_unwind
    #[error("observable producer panicked: {0}")]
    ProducerPanicked(String),

    /// The temporary runtime used to drive an asynchronous teardown outside of
    /// `Tokio` could not be built.
    #[error("failed to build runtime for asynchronous teardown: {0}")]
    TeardownRuntime(#[from] io::Error),
}

impl ObservableError {
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::ProducerPanicked(message)
    }
}
