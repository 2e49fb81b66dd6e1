use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

/// Shared view of a long running operation. Cloning gives another handle to
/// the same counters, so a caller can watch (or cancel) work running on
/// another thread.
#[derive(Clone)]
pub struct Progress(Arc<ProgressInner>);

struct ProgressInner {
    complete: AtomicU64,
    total: AtomicU64,
    cancelled: AtomicBool,
}

impl Progress {
    pub fn new() -> Self {
        Self(Arc::new(ProgressInner {
            complete: AtomicU64::new(0),
            total: AtomicU64::new(0),
            cancelled: AtomicBool::new(false),
        }))
    }

    pub fn progress(&self) -> f32 {
        let total = self.0.total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }

        self.0.complete.load(Ordering::Relaxed) as f32 / total as f32
    }

    pub fn completed(&self) -> u64 {
        self.0.complete.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.0.total.load(Ordering::Relaxed)
    }

    pub fn complete(&self) -> bool {
        let total = self.total();
        total != 0 && self.completed() >= total
    }

    pub fn add_total(&self, total: u64) {
        self.0.total.fetch_add(total, Ordering::Relaxed);
    }

    pub fn add_complete(&self, complete: u64) {
        self.0.complete.fetch_add(complete, Ordering::Relaxed);
    }

    /// Asks the operation to stop. Work already in flight is finished, new
    /// work is not started.
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Progress;

    #[test]
    fn clones_share_counters() {
        let progress = Progress::new();
        let other = progress.clone();

        progress.add_total(4);
        other.add_complete(1);
        assert_eq!(progress.completed(), 1);
        assert!((progress.progress() - 0.25).abs() < f32::EPSILON);
        assert!(!progress.complete());

        other.add_complete(3);
        assert!(progress.complete());
    }

    #[test]
    fn cancel_is_visible_everywhere() {
        let progress = Progress::new();
        let other = progress.clone();
        assert!(!other.is_cancelled());
        progress.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn empty_progress_is_not_complete() {
        let progress = Progress::default();
        assert_eq!(progress.progress(), 0.0);
        assert!(!progress.complete());
    }
}
