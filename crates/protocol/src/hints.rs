use serde::{Deserialize, Serialize};

use crate::device::DeviceInfo;

/// Which optional effects a page should enable for a device.
///
/// Pointer-driven effects need a mouse, so touch devices skip them.
/// Scroll-pinned sections and staggered entrances only run on tablet and
/// desktop widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationHints {
    pub custom_cursor: bool,
    pub hover_effects: bool,
    pub scroll_choreography: bool,
    pub entrance_animations: bool,
    pub reduced_effects: bool,
}

impl PresentationHints {
    pub fn from_device(device: &DeviceInfo) -> Self {
        let pointer = !device.is_touch_device;
        let wide = !device.is_mobile;
        Self {
            custom_cursor: pointer,
            hover_effects: pointer,
            scroll_choreography: wide,
            entrance_animations: wide,
            reduced_effects: device.is_low_end_device,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceClass;

    #[test]
    fn touch_phone_gets_no_pointer_or_scroll_effects() {
        let phone = DeviceInfo::from_class(DeviceClass::SmallMobile, 375, 812, true, true);
        let hints = PresentationHints::from_device(&phone);
        assert!(!hints.custom_cursor);
        assert!(!hints.hover_effects);
        assert!(!hints.scroll_choreography);
        assert!(!hints.entrance_animations);
        assert!(hints.reduced_effects);
    }

    #[test]
    fn touch_tablet_keeps_scroll_effects() {
        let tablet = DeviceInfo::from_class(DeviceClass::Tablet, 820, 1180, true, false);
        let hints = PresentationHints::from_device(&tablet);
        assert!(!hints.custom_cursor);
        assert!(hints.scroll_choreography);
        assert!(hints.entrance_animations);
    }

    #[test]
    fn desktop_gets_everything() {
        let desktop = DeviceInfo::from_class(DeviceClass::Desktop, 1920, 1080, false, false);
        let hints = PresentationHints::from_device(&desktop);
        assert!(hints.custom_cursor && hints.hover_effects);
        assert!(hints.scroll_choreography && hints.entrance_animations);
        assert!(!hints.reduced_effects);
    }
}
