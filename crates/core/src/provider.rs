use std::cell::Cell;
use std::rc::Rc;

use vantage_protocol::{Measurement, TouchSupport};

/// Source of display measurements.
///
/// A host picks one implementation when it builds its observer: a live
/// provider when a display surface exists, [`FallbackProvider`] otherwise.
/// Measuring cannot fail; a provider that loses its surface should report
/// [`Measurement::FALLBACK`].
pub trait MeasurementProvider {
    fn measure(&self) -> Measurement;
}

/// Always reports [`Measurement::FALLBACK`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl MeasurementProvider for FallbackProvider {
    fn measure(&self) -> Measurement {
        Measurement::FALLBACK
    }
}

/// A measurement set from outside.
///
/// Clones share the same reading, so one handle can live inside an
/// observer while another is updated by the host as events arrive.
#[derive(Debug, Clone, Default)]
pub struct ManualProvider {
    current: Rc<Cell<Measurement>>,
}

impl ManualProvider {
    pub fn new(initial: Measurement) -> Self {
        Self {
            current: Rc::new(Cell::new(initial)),
        }
    }

    pub fn set(&self, measurement: Measurement) {
        self.current.set(measurement);
    }

    pub fn set_size(&self, width: u32, height: u32) {
        let mut m = self.current.get();
        m.width = width;
        m.height = height;
        self.current.set(m);
    }

    pub fn set_touch(&self, touch: TouchSupport) {
        let mut m = self.current.get();
        m.touch = touch;
        self.current.set(m);
    }

    pub fn set_logical_cores(&self, cores: Option<u32>) {
        let mut m = self.current.get();
        m.logical_cores = cores;
        self.current.set(m);
    }
}

impl MeasurementProvider for ManualProvider {
    fn measure(&self) -> Measurement {
        self.current.get()
    }
}

impl<P: MeasurementProvider + ?Sized> MeasurementProvider for Box<P> {
    fn measure(&self) -> Measurement {
        (**self).measure()
    }
}
