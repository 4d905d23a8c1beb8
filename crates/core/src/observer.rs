//! Reactive device classification.
//!
//! A [`DeviceObserver`] owns a measurement provider and an event source.
//! While at least one listener is subscribed it keeps the event source
//! attached, re-measures on every orientation change and on the trailing
//! edge of each resize burst, and pushes a full [`Snapshot`] to every
//! listener.
//!
//! ```text
//!   host events ──▶ EventSink ──┬─ resize ──▶ Debouncer ──┐
//!                               └─ orientation ───────────┴─▶ measure ─▶ classify ─▶ listeners
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use vantage_protocol::{DeviceInfo, Measurement, PresentationHints, ViewportInfo};

use crate::classify::{classify_device, measure_viewport};
use crate::config::ClassifierConfig;
use crate::debounce::Debouncer;
use crate::provider::MeasurementProvider;
use crate::schedule::Scheduler;

/// Everything derived from one measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub device: DeviceInfo,
    pub viewport: ViewportInfo,
}

impl Snapshot {
    pub fn from_measurement(measurement: &Measurement, config: &ClassifierConfig) -> Self {
        Self {
            device: classify_device(measurement, config),
            viewport: measure_viewport(measurement.width, measurement.height),
        }
    }

    pub fn hints(&self) -> PresentationHints {
        PresentationHints::from_device(&self.device)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Unsubscribed,
    Observing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Where a host delivers raw display events.
///
/// Holds only a weak reference, so a sink kept by an event source never
/// keeps its observer alive. Events sent after the observer is gone are
/// ignored.
#[derive(Clone)]
pub struct EventSink {
    inner: Weak<Inner>,
}

impl EventSink {
    pub fn resize(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.on_resize();
        }
    }

    pub fn orientation_change(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.on_orientation_change();
        }
    }

    pub fn is_live(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("live", &self.is_live())
            .finish()
    }
}

/// Host hook for resize and orientation-change notifications.
///
/// `attach` is called when the first listener subscribes and `detach` when
/// the last one leaves, so they alternate. `detach` may be called from
/// inside a sink callback.
pub trait EventSource {
    fn attach(&self, sink: EventSink);
    fn detach(&self);
}

/// Event source driven by hand.
///
/// Clones share the attached sink. Used by tests and by hosts that receive
/// events through their own loop.
#[derive(Debug, Clone, Default)]
pub struct ManualEvents {
    sink: Rc<RefCell<Option<EventSink>>>,
    attaches: Rc<Cell<u32>>,
    detaches: Rc<Cell<u32>>,
}

impl ManualEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fire_resize(&self) {
        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            sink.resize();
        }
    }

    pub fn fire_orientation_change(&self) {
        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            sink.orientation_change();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.sink.borrow().is_some()
    }

    pub fn attach_count(&self) -> u32 {
        self.attaches.get()
    }

    pub fn detach_count(&self) -> u32 {
        self.detaches.get()
    }
}

impl EventSource for ManualEvents {
    fn attach(&self, sink: EventSink) {
        self.attaches.set(self.attaches.get() + 1);
        *self.sink.borrow_mut() = Some(sink);
    }

    fn detach(&self) {
        self.detaches.set(self.detaches.get() + 1);
        self.sink.borrow_mut().take();
    }
}

type Listener = Rc<dyn Fn(&Snapshot)>;

struct Inner {
    this: Weak<Inner>,
    provider: Box<dyn MeasurementProvider>,
    events: Box<dyn EventSource>,
    config: ClassifierConfig,
    debouncer: Debouncer,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_id: Cell<u64>,
    observing: Cell<bool>,
    latest: Cell<Snapshot>,
}

impl Inner {
    fn measure(&self) -> Snapshot {
        Snapshot::from_measurement(&self.provider.measure(), &self.config)
    }

    fn refresh(&self) -> Snapshot {
        let snapshot = self.measure();
        self.latest.set(snapshot);
        snapshot
    }

    fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow().iter().any(|(l, _)| *l == id)
    }

    fn refresh_and_notify(&self) {
        let snapshot = self.refresh();
        // Iterate a copy so listeners can subscribe or unsubscribe while
        // being called.
        let listeners: Vec<(SubscriptionId, Listener)> = self.listeners.borrow().clone();
        tracing::debug!(
            width = snapshot.device.screen_width,
            height = snapshot.device.screen_height,
            class = %snapshot.device.class(),
            listeners = listeners.len(),
            "device snapshot published"
        );
        for (id, listener) in listeners {
            if self.is_subscribed(id) {
                listener(&snapshot);
            }
        }
    }

    fn on_resize(&self) {
        if self.observing.get() {
            self.debouncer.trigger();
        }
    }

    fn on_orientation_change(&self) {
        if self.observing.get() {
            self.refresh_and_notify();
        }
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener.clone()));

        if !self.observing.get() {
            self.observing.set(true);
            self.events.attach(EventSink {
                inner: self.this.clone(),
            });
            tracing::debug!("display listeners attached");
        }

        let snapshot = self.refresh();
        listener(&snapshot);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let (removed, now_empty) = {
            let mut listeners = self.listeners.borrow_mut();
            let removed = listeners
                .iter()
                .position(|(l, _)| *l == id)
                .map(|index| listeners.remove(index));
            (removed, listeners.is_empty())
        };
        let Some(removed) = removed else {
            return false;
        };
        if now_empty {
            self.teardown();
        }
        // Dropped outside the borrow: a captured Subscription may unsubscribe
        // again from its own Drop.
        drop(removed);
        true
    }

    fn dispose(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        self.teardown();
        drop(listeners);
    }

    fn teardown(&self) {
        if !self.observing.replace(false) {
            return;
        }
        self.debouncer.cancel();
        self.events.detach();
        tracing::debug!("display listeners detached");
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Keeps a listener registered until dropped or explicitly unsubscribed.
#[must_use = "dropping a Subscription unsubscribes it immediately"]
pub struct Subscription {
    id: SubscriptionId,
    inner: Option<Weak<Inner>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    /// Leave the listener registered for the observer's lifetime. It can
    /// still be removed with [`DeviceObserver::unsubscribe`].
    pub fn forget(mut self) -> SubscriptionId {
        self.inner = None;
        self.id
    }

    fn release(&mut self) {
        if let Some(inner) = self.inner.take().and_then(|weak| weak.upgrade()) {
            inner.unsubscribe(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.inner.is_some())
            .finish()
    }
}

/// Always-current classification of the host display.
///
/// Cloning shares the same observer. The event source is attached while
/// any listener is subscribed and detached when the last one leaves or the
/// final handle is dropped.
#[derive(Clone)]
pub struct DeviceObserver {
    inner: Rc<Inner>,
}

impl DeviceObserver {
    pub fn new(
        provider: impl MeasurementProvider + 'static,
        events: impl EventSource + 'static,
        scheduler: Rc<dyn Scheduler>,
        config: ClassifierConfig,
    ) -> Self {
        let initial = Snapshot::from_measurement(&provider.measure(), &config);
        let delay = config.resize_debounce();
        let inner = Rc::new_cyclic(|this: &Weak<Inner>| {
            let target = this.clone();
            let debouncer = Debouncer::new(scheduler, delay, move || {
                if let Some(inner) = target.upgrade() {
                    inner.refresh_and_notify();
                }
            });
            Inner {
                this: this.clone(),
                provider: Box::new(provider),
                events: Box::new(events),
                config,
                debouncer,
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                observing: Cell::new(false),
                latest: Cell::new(initial),
            }
        });
        Self { inner }
    }

    /// Full snapshot measured now, without notifying anyone.
    pub fn current(&self) -> Snapshot {
        self.inner.measure()
    }

    /// Device classification measured now.
    pub fn snapshot(&self) -> DeviceInfo {
        self.inner.measure().device
    }

    /// Viewport dimensions measured now.
    pub fn viewport(&self) -> ViewportInfo {
        self.inner.measure().viewport
    }

    pub fn hints(&self) -> PresentationHints {
        self.inner.measure().hints()
    }

    /// The snapshot most recently measured for listeners.
    pub fn latest(&self) -> Snapshot {
        self.inner.latest.get()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ObserverState {
        if self.inner.observing.get() {
            ObserverState::Observing
        } else {
            ObserverState::Unsubscribed
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether a resize burst is waiting out its debounce delay.
    pub fn resize_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }

    /// Register a listener. It is called right away with a fresh snapshot
    /// and again after every re-measurement until unsubscribed.
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + 'static) -> Subscription {
        let id = self.inner.subscribe(Rc::new(listener));
        Subscription {
            id,
            inner: Some(Rc::downgrade(&self.inner)),
        }
    }

    /// Remove a listener by id. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    /// Remove every listener and detach from the host. The observer can be
    /// subscribed to again afterwards.
    pub fn dispose(&self) {
        self.inner.dispose();
    }
}

impl std::fmt::Debug for DeviceObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceObserver")
            .field("state", &self.state())
            .field("listeners", &self.listener_count())
            .field("latest", &self.latest())
            .finish()
    }
}
