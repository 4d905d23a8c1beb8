use serde::{Deserialize, Serialize};

/// Raw touch signals reported by the host.
///
/// Browsers expose two independent hints: whether the window carries an
/// `ontouchstart` handler slot, and `navigator.maxTouchPoints`. Either one
/// is enough to count as touch-capable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSupport {
    pub touch_start_event: bool,
    pub max_touch_points: u32,
}

impl TouchSupport {
    /// No touch signal of either kind.
    pub const NONE: Self = Self {
        touch_start_event: false,
        max_touch_points: 0,
    };

    pub fn is_touch(&self) -> bool {
        self.touch_start_event || self.max_touch_points > 0
    }
}

/// One reading of the display surface: the two measured scalars plus the
/// two capability probes everything else is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub width: u32,
    pub height: u32,
    pub touch: TouchSupport,
    /// Logical processor count, `None` when the host does not report one.
    pub logical_cores: Option<u32>,
}

impl Measurement {
    /// Reading used whenever no display surface is available.
    ///
    /// Desktop-sized, non-touch, unknown core count: the richest assumption,
    /// safe for any layout decision.
    pub const FALLBACK: Self = Self {
        width: 1920,
        height: 1080,
        touch: TouchSupport::NONE,
        logical_cores: None,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            touch: TouchSupport::NONE,
            logical_cores: None,
        }
    }

    pub fn with_touch(mut self, touch: TouchSupport) -> Self {
        self.touch = touch;
        self
    }

    pub fn with_logical_cores(mut self, cores: Option<u32>) -> Self {
        self.logical_cores = cores;
        self
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Self::FALLBACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_from_either_signal() {
        assert!(!TouchSupport::NONE.is_touch());
        assert!(
            TouchSupport {
                touch_start_event: true,
                max_touch_points: 0,
            }
            .is_touch()
        );
        assert!(
            TouchSupport {
                touch_start_event: false,
                max_touch_points: 5,
            }
            .is_touch()
        );
    }

    #[test]
    fn fallback_is_desktop_sized() {
        let m = Measurement::default();
        assert_eq!((m.width, m.height), (1920, 1080));
        assert!(!m.touch.is_touch());
        assert_eq!(m.logical_cores, None);
    }

    #[test]
    fn serializes_camel_case() {
        let m = Measurement::new(800, 600).with_logical_cores(Some(8));
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"logicalCores\":8"));
        assert!(json.contains("\"maxTouchPoints\":0"));
    }
}
