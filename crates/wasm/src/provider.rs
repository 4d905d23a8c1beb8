use vantage_core::MeasurementProvider;
use vantage_protocol::{Measurement, TouchSupport};
use wasm_bindgen::JsValue;
use web_sys::Window;

/// Measures the live browser window.
pub struct BrowserProvider {
    window: Window,
}

impl BrowserProvider {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn touch(&self) -> TouchSupport {
        let touch_start_event =
            js_sys::Reflect::has(&self.window, &JsValue::from_str("ontouchstart")).unwrap_or(false);
        let max_touch_points = self.window.navigator().max_touch_points();
        TouchSupport {
            touch_start_event,
            max_touch_points: u32::try_from(max_touch_points).unwrap_or(0),
        }
    }
}

impl MeasurementProvider for BrowserProvider {
    fn measure(&self) -> Measurement {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        let (Some(width), Some(height)) = (width.and_then(pixels), height.and_then(pixels)) else {
            return Measurement::FALLBACK;
        };
        Measurement::new(width, height)
            .with_touch(self.touch())
            .with_logical_cores(logical_cores(self.window.navigator().hardware_concurrency()))
    }
}

/// CSS pixel dimension from a JS number. Rejects NaN and negatives.
pub(crate) fn pixels(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 {
        Some(value.round().min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}

/// `navigator.hardwareConcurrency` is 0 or undefined (NaN) when the
/// browser withholds it.
pub(crate) fn logical_cores(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 1.0 {
        Some(value.min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_conversion() {
        assert_eq!(pixels(1920.0), Some(1920));
        assert_eq!(pixels(0.0), Some(0));
        assert_eq!(pixels(767.6), Some(768));
        assert_eq!(pixels(-1.0), None);
        assert_eq!(pixels(f64::NAN), None);
        assert_eq!(pixels(f64::INFINITY), None);
    }

    #[test]
    fn core_count_conversion() {
        assert_eq!(logical_cores(8.0), Some(8));
        assert_eq!(logical_cores(0.0), None);
        assert_eq!(logical_cores(f64::NAN), None);
    }
}
