pub mod device;
pub mod hints;
pub mod types;
pub mod viewport;

pub use device::{DeviceClass, DeviceInfo};
pub use hints::PresentationHints;
pub use types::{Measurement, TouchSupport};
pub use viewport::ViewportInfo;
