/// Components used to calibrate a camera on the bench.
pub mod calibration {
    /// Step a camera through a fixed exposure schedule and
    /// report the average intensity of each frame.
    pub mod exposure_sweep;
}

/// Helpful prelude when working with components.
pub mod prelude {
    pub use crate::components::calibration::exposure_sweep::*;
    pub use crate::devices::hardware::camera::*;
    pub use crate::devices::hardware::simulated::*;
    pub use crate::devices::{CameraError, Result};
}
