use std::{error::Error, sync::Arc};

/// The receiving side of an emission sequence.
///
/// A sequence is zero or more `next` calls followed by at most one terminal
/// call, either `error` or `complete`.
pub trait Observer {
    type Item;

    fn next(&mut self, _: Self::Item);
    fn complete(&mut self);
    fn error(&mut self, _: Arc<dyn Error + Send + Sync>);
}
