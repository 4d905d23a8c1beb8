use std::cell::RefCell;
use std::rc::Rc;

use vantage_core::{EventSink, EventSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// `resize` / `orientationchange` listeners on the window.
///
/// The closures are created once and outlive every attach/detach cycle, so
/// detaching from inside a listener never frees the running closure.
pub struct WindowEvents {
    window: Window,
    sink: Rc<RefCell<Option<EventSink>>>,
    on_resize: Closure<dyn FnMut()>,
    on_orientation: Closure<dyn FnMut()>,
}

impl WindowEvents {
    pub fn new(window: Window) -> Self {
        let sink: Rc<RefCell<Option<EventSink>>> = Rc::new(RefCell::new(None));

        let resize_sink = sink.clone();
        let on_resize = Closure::<dyn FnMut()>::new(move || {
            let current = resize_sink.borrow().clone();
            if let Some(sink) = current {
                sink.resize();
            }
        });

        let orientation_sink = sink.clone();
        let on_orientation = Closure::<dyn FnMut()>::new(move || {
            let current = orientation_sink.borrow().clone();
            if let Some(sink) = current {
                sink.orientation_change();
            }
        });

        Self {
            window,
            sink,
            on_resize,
            on_orientation,
        }
    }

    fn listeners(&self) -> [(&'static str, &js_sys::Function); 2] {
        [
            ("resize", self.on_resize.as_ref().unchecked_ref()),
            ("orientationchange", self.on_orientation.as_ref().unchecked_ref()),
        ]
    }
}

impl EventSource for WindowEvents {
    fn attach(&self, sink: EventSink) {
        *self.sink.borrow_mut() = Some(sink);
        for (event, callback) in self.listeners() {
            if let Err(e) = self.window.add_event_listener_with_callback(event, callback) {
                web_sys::console::warn_1(&format!("failed to listen for {event}: {e:?}").into());
            }
        }
    }

    fn detach(&self) {
        for (event, callback) in self.listeners() {
            // Removing a listener that was never added is a no-op in the DOM.
            let _ = self.window.remove_event_listener_with_callback(event, callback);
        }
        self.sink.borrow_mut().take();
    }
}
