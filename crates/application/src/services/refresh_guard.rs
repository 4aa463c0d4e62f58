use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight flag: at most one refresh holds a permit at a time.
///
/// Callers that lose the race get `None` immediately; they never wait for
/// the refresh in progress.
#[derive(Debug, Default)]
pub struct RefreshGuard {
    in_progress: AtomicBool,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<RefreshPermit<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit { guard: self })
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }
}

/// Releases the flag when dropped, including on early error returns.
#[derive(Debug)]
pub struct RefreshPermit<'a> {
    guard: &'a RefreshGuard,
}

impl Drop for RefreshPermit<'_> {
    fn drop(&mut self) {
        self.guard.in_progress.store(false, Ordering::Release);
    }
}
