pub mod classify;
pub mod config;
pub mod debounce;
pub mod observer;
pub mod provider;
pub mod schedule;

pub use classify::{classify_device, classify_width, measure_viewport};
pub use config::{Breakpoints, ClassifierConfig, ConfigError};
pub use debounce::Debouncer;
pub use observer::{
    DeviceObserver, EventSink, EventSource, ManualEvents, ObserverState, Snapshot, Subscription,
    SubscriptionId,
};
pub use provider::{FallbackProvider, ManualProvider, MeasurementProvider};
pub use schedule::{ManualScheduler, Scheduler, TimerId};
