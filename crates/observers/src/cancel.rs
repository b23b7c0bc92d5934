use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use shellfit_core::Observer;

use crate::traits::{CanStopEarly, HasIteration};

/// Requests cancellation of a running search from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests that the search stop at its next iteration boundary.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Stops a search at the first iteration boundary after cancellation.
///
/// The flag is only checked when an iteration completes, so an in-flight
/// oracle evaluation is never abandoned halfway and the solver always
/// reports a fully updated simplex.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    handle: CancelHandle,
}

impl Cancellation {
    /// Creates an observer and the handle that cancels it.
    #[must_use]
    pub fn new() -> (Self, CancelHandle) {
        let observer = Self::default();
        let handle = observer.handle.clone();
        (observer, handle)
    }

    /// Returns another handle to the same flag.
    #[must_use]
    pub fn handle(&self) -> CancelHandle {
        self.handle.clone()
    }
}

impl<E: HasIteration, A: CanStopEarly> Observer<E, A> for Cancellation {
    fn observe(&mut self, event: &E) -> Option<A> {
        let iter = event.iteration()?;
        if self.handle.is_cancelled() {
            tracing::info!(iter, "search cancelled");
            return Some(A::stop_early());
        }
        None
    }
}
