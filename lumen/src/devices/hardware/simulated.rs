use crate::devices::hardware::camera::{
    CameraDevice, CameraSdk, DeviceInfo, Frame, PacketSizeNegotiator, Transport, EXPOSURE_TIME,
    GVSP_ADJUST_PACKET_SIZE,
};
use crate::devices::{CameraError, Result};
use crate::utils::image::{pack_samples, PixelFormat};
use chrono::Utc;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, rc::Rc, time::Duration};

/// How a simulated GigE device behaves when asked to negotiate
/// its streaming packet size.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketSizeBehaviour {
    /// Reports done on the given poll.
    Completes {
        /// Number of polls until done.
        polls: u32,
    },
    /// Starts but never reports done.
    Never,
    /// The command exists but fails when started.
    Fails,
}

/// Configuration for one virtual camera. Every field has a default so
/// config files only need to name what differs.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SimulatedCameraConfig {
    /// Identifier the camera is registered under.
    pub id: String,
    /// Model name reported on enumeration.
    pub model: String,
    /// Transport reported on enumeration.
    pub transport: Transport,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Encodings the camera accepts.
    pub pixel_formats: Vec<PixelFormat>,
    /// Float controls that exist on the device.
    pub float_controls: Vec<String>,
    /// Lower exposure bound in microseconds.
    pub exposure_min_us: f64,
    /// Upper exposure bound in microseconds.
    pub exposure_max_us: f64,
    /// Sensor output with no light and no exposure.
    pub dark_level: f64,
    /// Dark current accumulated per microsecond of exposure.
    pub response_per_us: f64,
    /// Packet size negotiation, only honoured on GigE transports.
    pub packet_size: Option<PacketSizeBehaviour>,
    /// One based capture number that times out.
    pub fail_capture_at: Option<u32>,
}

impl Default for SimulatedCameraConfig {
    fn default() -> Self {
        Self {
            id: String::from("SIM-0001"),
            model: String::from("Dark Frame Simulator"),
            transport: Transport::GigE,
            width: 64,
            height: 48,
            pixel_formats: vec![PixelFormat::Mono8, PixelFormat::Mono12, PixelFormat::Mono16],
            float_controls: vec![String::from(EXPOSURE_TIME)],
            exposure_min_us: 1.0,
            exposure_max_us: 10_000_000.0,
            dark_level: 64.0,
            response_per_us: 0.0004,
            packet_size: Some(PacketSizeBehaviour::Completes { polls: 3 }),
            fail_capture_at: None,
        }
    }
}

/// SDK calls observed by the simulator, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum SdkEvent {
    /// Devices were enumerated.
    ListDevices,
    /// A camera was opened.
    OpenCamera(String),
    /// Packet size negotiation was started.
    PacketSizeStart,
    /// Packet size negotiation was polled.
    PacketSizePoll,
    /// Pixel format was set.
    SetPixelFormat(PixelFormat),
    /// A float control was written.
    SetFloat(String, f64),
    /// A frame was requested.
    AcquireFrame,
    /// A camera was closed.
    CloseCamera(String),
    /// The runtime was shut down.
    Shutdown,
}

/// Shared, append only record of [`SdkEvent`]s. Clones see the same log.
#[derive(Clone, Debug, Default)]
pub struct EventLog(Rc<RefCell<Vec<SdkEvent>>>);

impl EventLog {
    /// Append an event.
    pub fn push(&self, event: SdkEvent) {
        trace!("sdk event {event:?}");
        self.0.borrow_mut().push(event);
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<SdkEvent> {
        self.0.borrow().clone()
    }
}

/// A camera registry that exists only in memory.
pub struct SimulatedSdk {
    /// Registered cameras in enumeration order.
    cameras: Vec<SimulatedCameraConfig>,
    /// Calls made against this runtime.
    events: EventLog,
}

impl SimulatedSdk {
    /// Create a registry from camera configs, enumerated in the order given.
    ///
    /// * `cameras`: virtual cameras to register.
    pub fn new(cameras: Vec<SimulatedCameraConfig>) -> Self {
        debug!("simulated sdk with {} camera(s)", cameras.len());
        Self {
            cameras,
            events: EventLog::default(),
        }
    }

    /// Handle on the call log, usable after the SDK has been moved.
    pub fn events(&self) -> EventLog {
        self.events.clone()
    }
}

impl CameraSdk for SimulatedSdk {
    type Camera<'a> = SimulatedCamera<'a>;

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        self.events.push(SdkEvent::ListDevices);
        Ok(self.cameras.iter().map(device_info).collect())
    }

    fn open_camera(&self, id: &str) -> Result<Self::Camera<'_>> {
        let config = self
            .cameras
            .iter()
            .find(|camera| camera.id == id)
            .ok_or_else(|| CameraError::DeviceNotFound(id.to_owned()))?;

        self.events.push(SdkEvent::OpenCamera(id.to_owned()));
        Ok(SimulatedCamera {
            events: &self.events,
            info: device_info(config),
            pixel_format: config
                .pixel_formats
                .first()
                .copied()
                .unwrap_or(PixelFormat::Mono8),
            exposure_us: config.exposure_min_us,
            captures: 0,
            negotiation_polls: None,
            config: config.clone(),
        })
    }

    fn shutdown(&mut self) {
        self.events.push(SdkEvent::Shutdown);
    }
}

fn device_info(config: &SimulatedCameraConfig) -> DeviceInfo {
    DeviceInfo {
        id: config.id.clone(),
        model: config.model.clone(),
        vendor: String::from("Lumen"),
        transport: config.transport,
    }
}

/// An opened virtual camera. Frames are flat fields whose level follows
/// the configured dark current model.
pub struct SimulatedCamera<'a> {
    /// Log of the runtime that opened this camera.
    events: &'a EventLog,
    /// Enumeration data.
    info: DeviceInfo,
    /// Behaviour of this camera.
    config: SimulatedCameraConfig,
    /// Current encoding.
    pixel_format: PixelFormat,
    /// Current exposure in microseconds.
    exposure_us: f64,
    /// Frames captured since opening.
    captures: u32,
    /// Polls made since negotiation started, `None` before it starts.
    negotiation_polls: Option<u32>,
}

impl SimulatedCamera<'_> {
    /// Sample level produced at the current exposure.
    fn level(&self) -> u16 {
        let level = self.config.dark_level + self.exposure_us * self.config.response_per_us;
        let max = f64::from(self.pixel_format.max_value());

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            level.round().clamp(0.0, max) as u16
        }
    }

    fn require_control(&self, name: &str) -> Result<()> {
        if self.config.float_controls.iter().any(|control| control == name) {
            Ok(())
        } else {
            Err(CameraError::MissingCapability(name.to_owned()))
        }
    }
}

impl CameraDevice for SimulatedCamera<'_> {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn pixel_formats(&self) -> Result<Vec<String>> {
        Ok(self
            .config
            .pixel_formats
            .iter()
            .map(ToString::to_string)
            .collect())
    }

    fn set_pixel_format(&mut self, format: PixelFormat) -> Result<()> {
        if !self.config.pixel_formats.contains(&format) {
            return Err(CameraError::Sdk(format!(
                "pixel format {format} not supported by {}",
                self.info.id
            )));
        }
        self.events.push(SdkEvent::SetPixelFormat(format));
        self.pixel_format = format;
        Ok(())
    }

    fn float_control(&self, name: &str) -> Result<f64> {
        self.require_control(name)?;
        Ok(self.exposure_us)
    }

    fn set_float_control(&mut self, name: &str, value: f64) -> Result<()> {
        self.require_control(name)?;
        let (min, max) = self.float_control_bounds(name)?;
        if !(min..=max).contains(&value) {
            return Err(CameraError::OutOfRange {
                control: name.to_owned(),
                value,
                min,
                max,
            });
        }
        self.events.push(SdkEvent::SetFloat(name.to_owned(), value));
        self.exposure_us = value;
        Ok(())
    }

    fn float_control_bounds(&self, name: &str) -> Result<(f64, f64)> {
        self.require_control(name)?;
        Ok((self.config.exposure_min_us, self.config.exposure_max_us))
    }

    fn acquire_frame(&mut self, timeout: Duration) -> Result<Frame> {
        self.events.push(SdkEvent::AcquireFrame);
        self.captures += 1;
        if self.config.fail_capture_at == Some(self.captures) {
            return Err(CameraError::Timeout(timeout));
        }

        let pixels = self.config.width as usize * self.config.height as usize;
        let samples = vec![self.level(); pixels];
        Ok(Frame {
            data: pack_samples(self.pixel_format, &samples),
            width: self.config.width,
            height: self.config.height,
            pixel_format: self.pixel_format,
            exposure_us: self.exposure_us,
            captured_at: Utc::now(),
        })
    }

    fn packet_size_negotiator(&mut self) -> Option<&mut dyn PacketSizeNegotiator> {
        if self.info.transport == Transport::GigE && self.config.packet_size.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl PacketSizeNegotiator for SimulatedCamera<'_> {
    fn start(&mut self) -> Result<()> {
        self.events.push(SdkEvent::PacketSizeStart);
        match self.config.packet_size {
            Some(PacketSizeBehaviour::Fails) => {
                Err(CameraError::Sdk(String::from("packet size negotiation failed")))
            }
            Some(_) => {
                self.negotiation_polls = Some(0);
                Ok(())
            }
            None => Err(CameraError::MissingCapability(String::from(
                GVSP_ADJUST_PACKET_SIZE,
            ))),
        }
    }

    fn is_done(&mut self) -> Result<bool> {
        self.events.push(SdkEvent::PacketSizePoll);
        let polls = self.negotiation_polls.map_or(1, |polls| polls + 1);
        self.negotiation_polls = Some(polls);
        Ok(match self.config.packet_size {
            Some(PacketSizeBehaviour::Completes { polls: needed }) => polls >= needed,
            _ => false,
        })
    }
}

impl Drop for SimulatedCamera<'_> {
    fn drop(&mut self) {
        self.events.push(SdkEvent::CloseCamera(self.info.id.clone()));
    }
}
