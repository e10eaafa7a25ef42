/// Errors raised by the SDK abstraction and the backends.
pub mod error;
/// Devices are the atomic units that can be combined together
/// into components. Their core responsibilities do not change
/// based on which SDK backs them.
pub mod hardware {
    /// SDK and camera traits, the scoped runtime session and
    /// device acquisition.
    pub mod camera;
    /// Virtual cameras for bench runs without hardware.
    pub mod simulated;
    /// GenICam cameras through the aravis library.
    #[cfg(feature = "aravis")]
    pub mod aravis;
}

pub use error::{CameraError, Result};
