// src/export/in_flight.rs
//! Busy flag guarding an async action against re-entry

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct InFlight {
    flag: Arc<AtomicBool>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Claim the flag. `None` while another holder is active.
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| InFlightGuard {
                flag: Arc::clone(&self.flag),
            })
    }
}

/// Clears the flag when dropped, whichever way the action ends.
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_holder() {
        let busy = InFlight::new();
        let guard = busy.try_begin().unwrap();
        assert!(busy.is_active());
        assert!(busy.try_begin().is_none());

        drop(guard);
        assert!(!busy.is_active());
        assert!(busy.try_begin().is_some());
    }
}
