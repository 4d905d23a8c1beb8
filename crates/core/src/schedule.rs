use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Handle to a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Runs a task once after a delay on the caller's own execution context.
///
/// Scheduling returns immediately. `None` means the host refused the timer
/// and the task was dropped without running. Cancelling a timer that
/// already fired or was already cancelled does nothing.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerId>;
    fn cancel(&self, id: TimerId);
}

struct Entry {
    id: TimerId,
    deadline: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_id: u64,
    // Kept in insertion order; ids are monotonic so they break deadline ties.
    queue: Vec<Entry>,
}

/// A simulated clock.
///
/// Time only moves when [`advance`](Self::advance) or
/// [`advance_to`](Self::advance_to) is called, which makes timing
/// behaviour deterministic in tests. The terminal host also drives it from
/// its event loop with real elapsed time.
///
/// Clones share the same clock.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ClockState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Deadline of the earliest waiting task.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state.borrow().queue.iter().map(|e| e.deadline).min()
    }

    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        self.advance_to(target);
    }

    /// Move the clock to `target`, running every task due at or before it
    /// in deadline order. Tasks scheduled while running are picked up in
    /// the same pass if they fall due. Moving backwards is ignored.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let entry = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.deadline <= target)
                    .min_by_key(|(_, e)| (e.deadline, e.id.0))
                    .map(|(i, _)| i);
                let Some(index) = due else {
                    break;
                };
                let entry = state.queue.remove(index);
                state.now = state.now.max(entry.deadline);
                entry
            };
            (entry.task)();
        }
        let mut state = self.state.borrow_mut();
        state.now = state.now.max(target);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerId> {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_id);
        state.next_id += 1;
        let deadline = state.now + delay;
        state.queue.push(Entry { id, deadline, task });
        Some(id)
    }

    fn cancel(&self, id: TimerId) {
        self.state.borrow_mut().queue.retain(|e| e.id != id);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn runs_in_deadline_order() {
        let clock = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let log = log.clone();
            clock.schedule(ms(delay), Box::new(move || log.borrow_mut().push(label)));
        }

        clock.advance(ms(15));
        assert_eq!(*log.borrow(), vec!["a", "a2"]);
        assert_eq!(clock.now(), ms(15));

        clock.advance(ms(100));
        assert_eq!(*log.borrow(), vec!["a", "a2", "b", "c"]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn cancelled_task_never_runs() {
        let clock = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let flag = fired.clone();
        let id = clock
            .schedule(ms(10), Box::new(move || *flag.borrow_mut() = true))
            .unwrap();
        clock.cancel(id);
        clock.cancel(id);
        clock.advance(ms(50));
        assert!(!*fired.borrow());
    }

    #[test]
    fn tasks_scheduled_while_running_fire_if_due() {
        let clock = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let inner_clock = clock.clone();
        let inner_log = log.clone();
        clock.schedule(
            ms(10),
            Box::new(move || {
                inner_log.borrow_mut().push(10);
                let log = inner_log.clone();
                inner_clock.schedule(ms(5), Box::new(move || log.borrow_mut().push(15)));
            }),
        );

        clock.advance(ms(20));
        assert_eq!(*log.borrow(), vec![10, 15]);
    }

    #[test]
    fn boundary_deadline_is_due() {
        let clock = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(0));
        let count = fired.clone();
        clock.schedule(ms(100), Box::new(move || *count.borrow_mut() += 1));
        clock.advance(ms(99));
        assert_eq!(*fired.borrow(), 0);
        assert_eq!(clock.next_deadline(), Some(ms(100)));
        clock.advance(ms(1));
        assert_eq!(*fired.borrow(), 1);
    }
}
