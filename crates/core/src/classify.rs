use vantage_protocol::{DeviceClass, DeviceInfo, Measurement, ViewportInfo};

use crate::config::{Breakpoints, ClassifierConfig};

/// Bucket a viewport width.
pub fn classify_width(width: u32, breakpoints: &Breakpoints) -> DeviceClass {
    if width < breakpoints.small_mobile {
        DeviceClass::SmallMobile
    } else if width < breakpoints.tablet {
        DeviceClass::LargeMobile
    } else if width < breakpoints.desktop {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

/// Derive the full device record from one measurement.
///
/// An unreported core count is never low-end.
pub fn classify_device(measurement: &Measurement, config: &ClassifierConfig) -> DeviceInfo {
    let class = classify_width(measurement.width, &config.breakpoints);
    let is_low_end = measurement
        .logical_cores
        .is_some_and(|cores| cores <= config.low_end_max_cores);
    DeviceInfo::from_class(
        class,
        measurement.width,
        measurement.height,
        measurement.touch.is_touch(),
        is_low_end,
    )
}

pub fn measure_viewport(width: u32, height: u32) -> ViewportInfo {
    ViewportInfo::from_size(width, height)
}

#[cfg(test)]
mod tests {
    use vantage_protocol::TouchSupport;

    use super::*;

    fn device(width: u32) -> DeviceInfo {
        classify_device(&Measurement::new(width, 800), &ClassifierConfig::default())
    }

    #[test]
    fn boundary_widths() {
        let cases = [
            (0, DeviceClass::SmallMobile),
            (479, DeviceClass::SmallMobile),
            (480, DeviceClass::LargeMobile),
            (767, DeviceClass::LargeMobile),
            (768, DeviceClass::Tablet),
            (1023, DeviceClass::Tablet),
            (1024, DeviceClass::Desktop),
            (10_000, DeviceClass::Desktop),
        ];
        for (width, expected) in cases {
            let info = device(width);
            assert_eq!(info.class(), expected, "width {width}");
            assert_eq!(info.screen_width, width);
        }
    }

    #[test]
    fn partition_holds_for_every_width() {
        for width in 0..=2048 {
            let info = device(width);
            let sizes = [info.is_mobile, info.is_tablet, info.is_desktop];
            assert_eq!(sizes.iter().filter(|f| **f).count(), 1, "width {width}");

            let buckets = [
                info.is_small_mobile,
                info.is_large_mobile,
                info.is_tablet,
                info.is_desktop,
            ];
            assert_eq!(buckets.iter().filter(|f| **f).count(), 1, "width {width}");
            assert_eq!(
                info.is_mobile,
                info.is_small_mobile || info.is_large_mobile,
                "width {width}"
            );
        }
    }

    #[test]
    fn low_end_probe() {
        let config = ClassifierConfig::default();
        let base = Measurement::new(1280, 720);

        let four = classify_device(&base.with_logical_cores(Some(4)), &config);
        assert!(four.is_low_end_device);

        let eight = classify_device(&base.with_logical_cores(Some(8)), &config);
        assert!(!eight.is_low_end_device);

        let unknown = classify_device(&base.with_logical_cores(None), &config);
        assert!(!unknown.is_low_end_device);
    }

    #[test]
    fn low_end_threshold_is_configurable() {
        let config = ClassifierConfig {
            low_end_max_cores: 2,
            ..ClassifierConfig::default()
        };
        let m = Measurement::new(1280, 720).with_logical_cores(Some(4));
        assert!(!classify_device(&m, &config).is_low_end_device);
    }

    #[test]
    fn touch_probe() {
        let config = ClassifierConfig::default();
        let base = Measurement::new(390, 844);
        assert!(!classify_device(&base, &config).is_touch_device);

        let by_event = base.with_touch(TouchSupport {
            touch_start_event: true,
            max_touch_points: 0,
        });
        assert!(classify_device(&by_event, &config).is_touch_device);

        let by_points = base.with_touch(TouchSupport {
            touch_start_event: false,
            max_touch_points: 10,
        });
        assert!(classify_device(&by_points, &config).is_touch_device);
    }

    #[test]
    fn custom_breakpoints() {
        let breakpoints = Breakpoints {
            small_mobile: 360,
            tablet: 600,
            desktop: 1280,
        };
        assert_eq!(classify_width(400, &breakpoints), DeviceClass::LargeMobile);
        assert_eq!(classify_width(1100, &breakpoints), DeviceClass::Tablet);
        assert_eq!(classify_width(1280, &breakpoints), DeviceClass::Desktop);
    }

    #[test]
    fn viewport_orientation_matches_dimensions() {
        for (w, h) in [(0, 0), (1, 0), (0, 1), (300, 300), (1024, 768), (768, 1024)] {
            let vp = measure_viewport(w, h);
            assert_eq!(vp.is_portrait, h > w);
            assert_eq!(vp.is_landscape, !vp.is_portrait);
            if h > 0 {
                assert!((vp.aspect_ratio - f64::from(w) / f64::from(h)).abs() < 1e-12);
            }
        }
    }
}
