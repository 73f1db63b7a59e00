//! Cooperative cancellation for quantization passes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag.
///
/// Clones share the same flag, so one handle can be given to a running
/// pass while another stays with the caller. A pass checks the flag at
/// every row boundary and fails with
/// [`QuantizeError::Canceled`](crate::QuantizeError::Canceled) once it is set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    canceled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not canceled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Returns true once [`cancel()`](Self::cancel) has been called on any clone.
    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let handle = token.clone();
        assert!(!handle.is_canceled());

        token.cancel();
        assert!(handle.is_canceled());

        token.cancel();
        assert!(token.is_canceled());
    }
}
