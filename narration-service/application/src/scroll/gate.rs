use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(1_500);

/// Holds back automatic scroll-to-token while the user is scrolling by hand.
///
/// Every user scroll suppresses auto-scroll and restarts a debounce timer;
/// suppression lifts once the timer runs out with no further scrolls.
pub struct AutoScrollGate {
    delay: Duration,
    runtime: Handle,
    suppressed: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
    timer: Option<JoinHandle<()>>,
}

impl AutoScrollGate {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            suppressed: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
            timer: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn should_auto_scroll(&self) -> bool {
        !self.suppressed.load(Ordering::Acquire)
    }

    pub fn notify_user_scroll(&mut self) {
        self.suppressed.store(true, Ordering::Release);
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let suppressed = Arc::clone(&self.suppressed);
        let current = Arc::clone(&self.generation);
        let delay = self.delay;
        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // A newer scroll owns the flag now.
            if current.load(Ordering::Acquire) == generation {
                suppressed.store(false, Ordering::Release);
                tracing::trace!("auto-scroll resumed");
            }
        }));
    }

    /// Pairs an index change with the gate state at the same instant.
    /// Returns whether the caller should scroll that token into view.
    pub fn notify_active_index_changed(&self, index: usize) -> bool {
        let allowed = self.should_auto_scroll();
        tracing::trace!(active_index = index, auto_scroll = allowed, "active index observed");
        allowed
    }

    /// Cancels any pending timer. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.suppressed.store(false, Ordering::Release);
    }
}

impl Drop for AutoScrollGate {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn gate() -> AutoScrollGate {
        AutoScrollGate::new(DEFAULT_SCROLL_DEBOUNCE, Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_suppresses_until_idle() {
        let mut gate = gate();
        assert!(gate.should_auto_scroll());

        gate.notify_user_scroll();
        assert!(!gate.should_auto_scroll());

        sleep(Duration::from_millis(1_400)).await;
        assert!(!gate.should_auto_scroll());

        sleep(Duration::from_millis(200)).await;
        assert!(gate.should_auto_scroll());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_scrolls_restart_the_timer() {
        let mut gate = gate();
        gate.notify_user_scroll();
        sleep(Duration::from_millis(1_000)).await;
        gate.notify_user_scroll();

        sleep(Duration::from_millis(1_000)).await;
        assert!(!gate.should_auto_scroll());

        sleep(Duration::from_millis(600)).await;
        assert!(gate.should_auto_scroll());
    }

    #[tokio::test(start_paused = true)]
    async fn index_changes_do_not_reset_the_timer() {
        let mut gate = gate();
        gate.notify_user_scroll();
        sleep(Duration::from_millis(1_000)).await;
        assert!(!gate.notify_active_index_changed(4));

        sleep(Duration::from_millis(600)).await;
        assert!(gate.notify_active_index_changed(5));
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_timer() {
        let mut gate = gate();
        gate.notify_user_scroll();
        gate.dispose();
        assert!(gate.timer.is_none());
        assert!(gate.should_auto_scroll());

        sleep(Duration::from_millis(2_000)).await;
        assert!(gate.should_auto_scroll());
    }
}
