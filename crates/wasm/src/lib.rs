mod events;
mod provider;
mod registry;
mod timer;

use std::rc::Rc;

use vantage_core::{
    ClassifierConfig, DeviceObserver, FallbackProvider, ManualEvents, ManualScheduler,
};
use wasm_bindgen::prelude::*;

use crate::registry::SubscriptionTable;

pub use events::WindowEvents;
pub use provider::BrowserProvider;
pub use timer::TimeoutScheduler;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Build an observer on the live window, or on the fallback provider when
/// there is no window (workers, server-side rendering).
pub fn observe_window(config: ClassifierConfig) -> DeviceObserver {
    match web_sys::window() {
        Some(window) => DeviceObserver::new(
            BrowserProvider::new(window.clone()),
            WindowEvents::new(window.clone()),
            Rc::new(TimeoutScheduler::new(window)),
            config,
        ),
        None => DeviceObserver::new(
            FallbackProvider,
            ManualEvents::new(),
            Rc::new(ManualScheduler::new()),
            config,
        ),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

/// JavaScript handle to a device observer.
///
/// Snapshots cross the boundary as JSON strings with camelCase fields
/// (`screenWidth`, `isMobile`, ...).
#[wasm_bindgen]
pub struct DeviceWatcher {
    observer: DeviceObserver,
    subscriptions: SubscriptionTable,
}

#[wasm_bindgen]
impl DeviceWatcher {
    /// Create a watcher. `config` is an optional JSON classifier config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<DeviceWatcher, JsError> {
        let config = match config {
            Some(json) => {
                ClassifierConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string()))?
            }
            None => ClassifierConfig::default(),
        };
        Ok(Self {
            observer: observe_window(config),
            subscriptions: SubscriptionTable::default(),
        })
    }

    /// Device classification measured now, as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        to_json(&self.observer.snapshot())
    }

    /// Viewport dimensions measured now, as JSON.
    pub fn viewport(&self) -> Result<String, JsError> {
        to_json(&self.observer.viewport())
    }

    /// Effect gates for the current device, as JSON.
    pub fn hints(&self) -> Result<String, JsError> {
        to_json(&self.observer.hints())
    }

    pub fn vw(&self, percent: f64) -> f64 {
        self.observer.viewport().vw(percent)
    }

    pub fn vh(&self, percent: f64) -> f64 {
        self.observer.viewport().vh(percent)
    }

    pub fn vmin(&self, percent: f64) -> f64 {
        self.observer.viewport().vmin(percent)
    }

    pub fn vmax(&self, percent: f64) -> f64 {
        self.observer.viewport().vmax(percent)
    }

    /// Call `callback(json)` now and after every re-measurement. Returns an
    /// id for `unsubscribe`.
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let id = self.subscriptions.reserve();
        let subscription = self.observer.subscribe(move |snapshot| {
            let Ok(json) = serde_json::to_string(snapshot) else {
                return;
            };
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                web_sys::console::error_2(&"device listener threw".into(), &e);
            }
        });
        self.subscriptions.fill(id, subscription);
        id
    }

    pub fn unsubscribe(&self, id: u32) -> bool {
        self.subscriptions.remove(id)
    }

    /// Drop every listener and detach from the window.
    pub fn dispose(&self) {
        self.observer.dispose();
        self.subscriptions.clear();
    }

    #[wasm_bindgen(getter, js_name = isObserving)]
    pub fn is_observing(&self) -> bool {
        self.observer.state() == vantage_core::ObserverState::Observing
    }

    #[wasm_bindgen(getter, js_name = listenerCount)]
    pub fn listener_count(&self) -> usize {
        self.observer.listener_count()
    }
}
