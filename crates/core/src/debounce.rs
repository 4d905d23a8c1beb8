use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::schedule::{Scheduler, TimerId};

/// Trailing-edge debounce.
///
/// Every [`trigger`](Self::trigger) restarts a timer of `delay`; the
/// callback runs once the timer elapses with no further trigger. Dropping
/// the debouncer cancels a pending run. If the scheduler refuses the timer,
/// the callback runs right away instead of being lost.
pub struct Debouncer {
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
    callback: Rc<dyn Fn()>,
    pending: Rc<Cell<Option<TimerId>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn Scheduler>, delay: Duration, callback: impl Fn() + 'static) -> Self {
        Self {
            scheduler,
            delay,
            callback: Rc::new(callback),
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    pub fn trigger(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
            tracing::trace!(timer = id.0, "debounce restarted");
        }
        let pending = self.pending.clone();
        let callback = self.callback.clone();
        let scheduled = self.scheduler.schedule(
            self.delay,
            Box::new(move || {
                pending.set(None);
                callback();
            }),
        );
        match scheduled {
            Some(id) => self.pending.set(Some(id)),
            None => {
                tracing::debug!("debounce timer refused, running now");
                (self.callback)();
            }
        }
    }

    /// Drop a pending run without calling back.
    pub fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Run a pending callback now instead of waiting. Returns whether
    /// anything was pending.
    pub fn flush(&self) -> bool {
        match self.pending.take() {
            Some(id) => {
                self.scheduler.cancel(id);
                (self.callback)();
                true
            }
            None => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;

    fn setup(delay_ms: u64) -> (ManualScheduler, Debouncer, Rc<Cell<u32>>) {
        let clock = ManualScheduler::new();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let debouncer = Debouncer::new(
            Rc::new(clock.clone()),
            Duration::from_millis(delay_ms),
            move || counter.set(counter.get() + 1),
        );
        (clock, debouncer, calls)
    }

    #[test]
    fn burst_runs_once_after_quiet_period() {
        let (clock, debouncer, calls) = setup(100);
        for _ in 0..10 {
            debouncer.trigger();
            clock.advance(Duration::from_millis(20));
        }
        assert_eq!(calls.get(), 0);
        assert!(debouncer.is_pending());

        clock.advance(Duration::from_millis(79));
        assert_eq!(calls.get(), 0);
        clock.advance(Duration::from_millis(1));
        assert_eq!(calls.get(), 1);
        assert!(!debouncer.is_pending());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn separate_bursts_run_separately() {
        let (clock, debouncer, calls) = setup(100);
        debouncer.trigger();
        clock.advance(Duration::from_millis(150));
        debouncer.trigger();
        clock.advance(Duration::from_millis(150));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn cancel_and_drop_leave_no_timer() {
        let (clock, debouncer, calls) = setup(100);
        debouncer.trigger();
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(clock.pending(), 0);

        debouncer.trigger();
        drop(debouncer);
        assert_eq!(clock.pending(), 0);
        clock.advance(Duration::from_secs(1));
        assert_eq!(calls.get(), 0);
    }

    struct RefusingScheduler;

    impl Scheduler for RefusingScheduler {
        fn schedule(&self, _delay: Duration, _task: Box<dyn FnOnce()>) -> Option<TimerId> {
            None
        }

        fn cancel(&self, _id: TimerId) {}
    }

    #[test]
    fn refused_timer_runs_callback_and_is_not_pending() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let debouncer = Debouncer::new(
            Rc::new(RefusingScheduler),
            Duration::from_millis(100),
            move || counter.set(counter.get() + 1),
        );
        debouncer.trigger();
        assert!(!debouncer.is_pending());
        assert_eq!(calls.get(), 1);
        assert!(!debouncer.flush());
    }

    #[test]
    fn flush_runs_immediately() {
        let (clock, debouncer, calls) = setup(100);
        assert!(!debouncer.flush());
        debouncer.trigger();
        assert!(debouncer.flush());
        assert_eq!(calls.get(), 1);
        clock.advance(Duration::from_secs(1));
        assert_eq!(calls.get(), 1);
    }
}
