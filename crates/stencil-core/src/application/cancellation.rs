use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::ApplicationError;

/// Shared cancellation flag for a scaffold run.
///
/// Clones observe the same flag. Once cancelled a token stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once [`cancel`](Self::cancel) has been called.
    pub fn check(&self) -> Result<(), ApplicationError> {
        if self.is_cancelled() {
            Err(ApplicationError::Cancelled)
        } else {
            Ok(())
        }
    }
}
