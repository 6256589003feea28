use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use rxlite::{
    subscribe::{Subscriber, Teardown},
    Observable, Observer,
};

/// Observable emitting `0..=end` from an OS thread, one value per millisecond.
///
/// Unsubscribing flips a stop flag the thread checks before every emission.
/// `teardowns` counts how often the teardown ran.
pub fn generate_u32_observable(end: u32, teardowns: Arc<AtomicUsize>) -> Observable<u32> {
    Observable::new(move |mut o: Subscriber<_>| {
        let done = Arc::new(AtomicBool::new(false));
        let done_c = Arc::clone(&done);

        std::thread::spawn(move || {
            for i in 0..=end {
                if done_c.load(Ordering::SeqCst) {
                    break;
                }
                o.next(i);
                std::thread::sleep(Duration::from_millis(1));
            }
            o.complete();
        });

        let teardowns = Arc::clone(&teardowns);
        Teardown::logic(move || {
            teardowns.fetch_add(1, Ordering::SeqCst);
            done.store(true, Ordering::SeqCst);
        })
    })
}
