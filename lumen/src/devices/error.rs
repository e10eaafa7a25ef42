use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between us and the camera SDK.
///
/// Only `DeviceNotFound` and `NoDevices` are expected to be handled by a
/// caller (the CLI turns them into targeted messages). `MissingCapability`
/// is handled inside the packet size negotiation. The rest abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The SDK has no device registered under this identifier.
    #[error("camera '{0}' not found")]
    DeviceNotFound(String),
    /// The SDK enumerated zero devices.
    #[error("no cameras accessible")]
    NoDevices,
    /// A feature, control or command does not exist on this device.
    #[error("feature '{0}' is not available on this device")]
    MissingCapability(String),
    /// No frame arrived within the wait bound.
    #[error("no frame received within {0:?}")]
    Timeout(Duration),
    /// A started command never reported completion.
    #[error("'{command}' did not complete within {bound:?}")]
    NegotiationTimeout {
        /// Command that was polled.
        command: String,
        /// Poll bound that was exceeded.
        bound: Duration,
    },
    /// The device rejected a value outside its range.
    #[error("{value} is outside the range of '{control}' [{min}, {max}]")]
    OutOfRange {
        /// Control that rejected the value.
        control: String,
        /// Rejected value.
        value: f64,
        /// Device minimum.
        min: f64,
        /// Device maximum.
        max: f64,
    },
    /// The frame buffer does not match its advertised geometry.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    /// Any other failure reported by the underlying SDK.
    #[error("sdk error: {0}")]
    Sdk(String),
}

/// Result type for camera operations.
pub type Result<T> = std::result::Result<T, CameraError>;
