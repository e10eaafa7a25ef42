use crate::devices::{CameraError, Result};
use crate::utils::image::PixelFormat;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum_macros::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

/// GenICam SFNC name of the exposure control, in microseconds.
pub const EXPOSURE_TIME: &str = "ExposureTime";

/// Command that auto negotiates the GigE streaming packet size.
pub const GVSP_ADJUST_PACKET_SIZE: &str = "GVSPAdjustPacketSize";

/// How the device is attached. Only GigE devices negotiate a
/// streaming packet size.
#[derive(
    EnumString, IntoStaticStr, Display, Deserialize, Serialize, Copy, Clone, Debug, PartialEq, Eq,
)]
pub enum Transport {
    /// GigE Vision over ethernet.
    GigE,
    /// USB3 Vision.
    Usb,
    /// Simulated or fake devices provided by the SDK itself.
    Virtual,
}

/// What the SDK tells us about a device before it is opened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Identifier accepted by [`CameraSdk::open_camera`].
    pub id: String,
    /// Model name.
    pub model: String,
    /// Vendor name.
    pub vendor: String,
    /// Physical transport.
    pub transport: Transport,
}

/// A single captured image. Only lives for one step of a procedure.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw sample buffer as delivered by the SDK.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoding of `data`.
    pub pixel_format: PixelFormat,
    /// Exposure in effect when the frame was taken, in microseconds.
    pub exposure_us: f64,
    /// Host time the frame was received.
    pub captured_at: DateTime<Utc>,
}

/// GigE streaming packet size auto negotiation. Kicked off once,
/// then polled until the device reports it has finished.
pub trait PacketSizeNegotiator {
    /// Start the negotiation command.
    fn start(&mut self) -> Result<()>;

    /// Whether the negotiation has finished.
    fn is_done(&mut self) -> Result<bool>;
}

/// An opened camera. Closing happens when the value is dropped.
pub trait CameraDevice {
    /// Device description from enumeration.
    fn info(&self) -> &DeviceInfo;

    /// Names of the pixel encodings the device offers.
    fn pixel_formats(&self) -> Result<Vec<String>>;

    /// Fix the pixel encoding of subsequent frames.
    fn set_pixel_format(&mut self, format: PixelFormat) -> Result<()>;

    /// Read a float control by feature name.
    fn float_control(&self, name: &str) -> Result<f64>;

    /// Write a float control by feature name. Values outside the
    /// device range are rejected by the device, not clamped.
    fn set_float_control(&mut self, name: &str, value: f64) -> Result<()>;

    /// Minimum and maximum of a float control.
    fn float_control_bounds(&self, name: &str) -> Result<(f64, f64)>;

    /// Acquire exactly one frame, waiting at most `timeout`.
    fn acquire_frame(&mut self, timeout: Duration) -> Result<Frame>;

    /// Packet size negotiation if this transport offers it, `None` otherwise.
    fn packet_size_negotiator(&mut self) -> Option<&mut dyn PacketSizeNegotiator>;
}

/// Abstraction over a vendor SDK runtime.
pub trait CameraSdk {
    /// Camera type handed out by `open_camera`, borrowing the runtime.
    type Camera<'a>: CameraDevice
    where
        Self: 'a;

    /// Enumerate visible devices in SDK order.
    fn list_devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Open a device by identifier. Unknown identifiers are a
    /// [`CameraError::DeviceNotFound`].
    fn open_camera(&self, id: &str) -> Result<Self::Camera<'_>>;

    /// Tear the runtime down. Called once by [`Session`] on drop.
    fn shutdown(&mut self);
}

/// Scoped SDK runtime. Cameras borrow the session so they cannot
/// outlive it, and the runtime is shut down when the session drops,
/// whichever way the scope is left.
pub struct Session<S: CameraSdk> {
    /// The SDK runtime owned by this scope.
    sdk: S,
    /// Identifier used to tie log lines of one run together.
    run_id: Uuid,
}

impl<S: CameraSdk> Session<S> {
    /// Enter the runtime scope.
    ///
    /// * `sdk`: an initialised SDK runtime.
    pub fn open(sdk: S) -> Self {
        let run_id = Uuid::new_v4();
        info!("opened camera session {run_id}");
        Self { sdk, run_id }
    }

    /// Return the unique identifier of the session.
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Resolve a camera either by identifier or by taking the first
    /// device the SDK enumerates. An empty identifier counts as none.
    ///
    /// * `camera_id`: requested device, if any.
    pub fn acquire_camera(&self, camera_id: Option<&str>) -> Result<S::Camera<'_>> {
        match camera_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                debug!("looking up camera '{id}'");
                self.sdk.open_camera(id)
            }
            None => {
                let devices = self.sdk.list_devices()?;
                debug!("enumerated {} device(s)", devices.len());
                let first = devices.first().ok_or(CameraError::NoDevices)?;
                info!(
                    "using first device {} ({} {}, {})",
                    first.id, first.vendor, first.model, first.transport
                );
                self.sdk.open_camera(&first.id)
            }
        }
    }
}

impl<S: CameraSdk> Drop for Session<S> {
    fn drop(&mut self) {
        self.sdk.shutdown();
        info!("closed camera session {}", self.run_id);
    }
}
