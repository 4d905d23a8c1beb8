use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use vantage_core::{Scheduler, TimerId};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

#[derive(Default)]
struct Timers {
    next_id: u64,
    live: HashMap<u64, (i32, Closure<dyn FnMut()>)>,
    // A closure cannot be freed while it runs; a fired one waits here until
    // the next timer callback starts. Timer callbacks never nest.
    spent: Vec<Closure<dyn FnMut()>>,
}

/// `setTimeout` / `clearTimeout` on the window.
pub struct TimeoutScheduler {
    window: Window,
    timers: Rc<RefCell<Timers>>,
}

impl TimeoutScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timers: Rc::new(RefCell::new(Timers::default())),
        }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Option<TimerId> {
        let id = {
            let mut timers = self.timers.borrow_mut();
            let id = timers.next_id;
            timers.next_id += 1;
            id
        };

        let timers = self.timers.clone();
        let task = Cell::new(Some(task));
        let closure = Closure::<dyn FnMut()>::new(move || {
            let (retired, fired) = {
                let mut state = timers.borrow_mut();
                (std::mem::take(&mut state.spent), state.live.remove(&id))
            };
            drop(retired);
            if let Some((_, closure)) = fired {
                timers.borrow_mut().spent.push(closure);
            }
            if let Some(task) = task.take() {
                task();
            }
        });

        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => {
                self.timers.borrow_mut().live.insert(id, (handle, closure));
                Some(TimerId(id))
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("setTimeout failed: {e:?}").into());
                None
            }
        }
    }

    fn cancel(&self, id: TimerId) {
        let removed = self.timers.borrow_mut().live.remove(&id.0);
        if let Some((handle, closure)) = removed {
            self.window.clear_timeout_with_handle(handle);
            drop(closure);
        }
    }
}

impl Drop for TimeoutScheduler {
    fn drop(&mut self) {
        let (live, spent) = {
            let mut timers = self.timers.borrow_mut();
            (std::mem::take(&mut timers.live), std::mem::take(&mut timers.spent))
        };
        for (handle, _) in live.values() {
            self.window.clear_timeout_with_handle(*handle);
        }
        drop(live);
        drop(spent);
    }
}
