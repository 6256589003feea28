use std::sync::{Arc, Mutex};

use rxlite::subscribe::Handlers;

pub type Register<T> = Arc<Mutex<Vec<T>>>;

/// Handlers that record every emission, plus the three registers they write to.
pub fn register_emissions_handlers<T: Send + 'static>(
) -> (Handlers<T>, Register<T>, Register<String>, Register<()>) {
    let nexts = Arc::new(Mutex::new(Vec::with_capacity(5)));
    let nexts_c = Arc::clone(&nexts);

    let errors = Arc::new(Mutex::new(Vec::with_capacity(1)));
    let errors_c = Arc::clone(&errors);

    let completes = Arc::new(Mutex::new(Vec::with_capacity(1)));
    let completes_c = Arc::clone(&completes);

    let handlers = Handlers::new(
        move |n| {
            // Track next() calls.
            nexts_c.lock().unwrap().push(n);
        },
        move |e| {
            // Track error() calls.
            errors_c.lock().unwrap().push(e.to_string());
        },
        move || {
            // Track complete() calls.
            completes_c.lock().unwrap().push(());
        },
    );
    (handlers, nexts, errors, completes)
}
