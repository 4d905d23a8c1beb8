use serde::{Deserialize, Serialize};

/// Dimensions of the visible rendering surface plus orientation.
///
/// The `vw`/`vh`/`vmin`/`vmax` helpers mirror the CSS units of the same
/// name: `vw(50.0)` is half the width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub is_portrait: bool,
    pub is_landscape: bool,
}

impl ViewportInfo {
    /// Derive the full record from a width and height.
    ///
    /// A zero height divides by one so the ratio stays finite. Landscape
    /// wins ties.
    pub fn from_size(width: u32, height: u32) -> Self {
        let aspect_ratio = f64::from(width) / f64::from(height.max(1));
        let is_portrait = height > width;
        Self {
            width,
            height,
            aspect_ratio,
            is_portrait,
            is_landscape: !is_portrait,
        }
    }

    pub fn vw(&self, percent: f64) -> f64 {
        f64::from(self.width) * percent / 100.0
    }

    pub fn vh(&self, percent: f64) -> f64 {
        f64::from(self.height) * percent / 100.0
    }

    pub fn vmin(&self, percent: f64) -> f64 {
        f64::from(self.width.min(self.height)) * percent / 100.0
    }

    pub fn vmax(&self, percent: f64) -> f64 {
        f64::from(self.width.max(self.height)) * percent / 100.0
    }
}
