use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::Arc;

use super::Engine;

/// Shared, serialized access to one engine instance.
///
/// Engines expose no internal concurrency; the mutex keeps every call
/// against one instance strictly one at a time.
#[derive(Clone)]
pub(crate) struct EngineRef {
    inner: Arc<Mutex<Box<dyn Engine>>>,
    debug: bool,
}

impl EngineRef {
    pub fn new(engine: Box<dyn Engine>, debug: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
            debug,
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn Engine>> {
        self.inner.lock()
    }

    #[inline]
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl fmt::Debug for EngineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRef")
            .field("instance", &(Arc::as_ptr(&self.inner) as *const () as usize))
            .field("debug", &self.debug)
            .finish()
    }
}
