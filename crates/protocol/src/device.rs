use serde::{Deserialize, Serialize};

/// Mutually exclusive size buckets derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    SmallMobile,
    LargeMobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::SmallMobile | Self::LargeMobile)
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SmallMobile => write!(f, "small mobile"),
            Self::LargeMobile => write!(f, "large mobile"),
            Self::Tablet => write!(f, "tablet"),
            Self::Desktop => write!(f, "desktop"),
        }
    }
}

/// Classification of the host display at one moment.
///
/// Always derived in full from a single measurement, never patched field by
/// field. Exactly one of `is_small_mobile`, `is_large_mobile`, `is_tablet`,
/// `is_desktop` is set; `is_mobile` is the union of the two mobile buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub screen_width: u32,
    pub screen_height: u32,
    pub is_mobile: bool,
    pub is_tablet: bool,
    pub is_desktop: bool,
    pub is_small_mobile: bool,
    pub is_large_mobile: bool,
    pub is_touch_device: bool,
    pub is_low_end_device: bool,
}

impl DeviceInfo {
    /// Build the flag set for a size bucket.
    pub fn from_class(
        class: DeviceClass,
        screen_width: u32,
        screen_height: u32,
        is_touch_device: bool,
        is_low_end_device: bool,
    ) -> Self {
        Self {
            screen_width,
            screen_height,
            is_mobile: class.is_mobile(),
            is_tablet: class == DeviceClass::Tablet,
            is_desktop: class == DeviceClass::Desktop,
            is_small_mobile: class == DeviceClass::SmallMobile,
            is_large_mobile: class == DeviceClass::LargeMobile,
            is_touch_device,
            is_low_end_device,
        }
    }

    /// The size bucket whose flag is set.
    pub fn class(&self) -> DeviceClass {
        if self.is_small_mobile {
            DeviceClass::SmallMobile
        } else if self.is_large_mobile {
            DeviceClass::LargeMobile
        } else if self.is_tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_follow_class() {
        for class in [
            DeviceClass::SmallMobile,
            DeviceClass::LargeMobile,
            DeviceClass::Tablet,
            DeviceClass::Desktop,
        ] {
            let info = DeviceInfo::from_class(class, 100, 100, false, false);
            assert_eq!(info.class(), class);
            let buckets = [
                info.is_small_mobile,
                info.is_large_mobile,
                info.is_tablet,
                info.is_desktop,
            ];
            assert_eq!(buckets.iter().filter(|b| **b).count(), 1);
            assert_eq!(info.is_mobile, class.is_mobile());
        }
    }

    #[test]
    fn serializes_browser_field_names() {
        let info = DeviceInfo::from_class(DeviceClass::Tablet, 800, 1000, true, false);
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["screenWidth"], 800);
        assert_eq!(json["isTablet"], true);
        assert_eq!(json["isTouchDevice"], true);
        assert_eq!(json["isLowEndDevice"], false);
    }
}
