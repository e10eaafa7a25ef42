use crate::devices::hardware::camera::{
    CameraDevice, CameraSdk, DeviceInfo, Frame, PacketSizeNegotiator, Transport, EXPOSURE_TIME,
};
use crate::devices::{CameraError, Result};
use crate::utils::image::PixelFormat;
use aravis::{Aravis, BufferStatus, Camera, CameraExt};
use chrono::Utc;
use log::{debug, info};
use std::{marker::PhantomData, time::Duration};

impl From<PixelFormat> for aravis::PixelFormat {
    fn from(format: PixelFormat) -> Self {
        match format {
            PixelFormat::Mono8 => aravis::PixelFormat::MONO_8,
            PixelFormat::Mono10 => aravis::PixelFormat::MONO_10,
            PixelFormat::Mono12 => aravis::PixelFormat::MONO_12,
            PixelFormat::Mono16 => aravis::PixelFormat::MONO_16,
        }
    }
}

fn from_aravis_format(format: aravis::PixelFormat) -> Option<PixelFormat> {
    match format {
        aravis::PixelFormat::MONO_8 => Some(PixelFormat::Mono8),
        aravis::PixelFormat::MONO_10 => Some(PixelFormat::Mono10),
        aravis::PixelFormat::MONO_12 => Some(PixelFormat::Mono12),
        aravis::PixelFormat::MONO_16 => Some(PixelFormat::Mono16),
        _ => None,
    }
}

fn transport_from_protocol(protocol: Option<&str>) -> Transport {
    match protocol {
        Some("GigEVision") => Transport::GigE,
        Some("USB3Vision") => Transport::Usb,
        _ => Transport::Virtual,
    }
}

fn sdk_error(e: impl std::fmt::Display) -> CameraError {
    CameraError::Sdk(e.to_string())
}

/// The aravis runtime. Dropping the inner handle runs `arv_shutdown`,
/// so [`CameraSdk::shutdown`] simply releases it.
pub struct AravisSdk {
    /// Live runtime, `None` once shut down.
    runtime: Option<Aravis>,
}

impl AravisSdk {
    /// Initialise the aravis runtime. Fails if it is already initialised
    /// elsewhere in the process.
    pub fn initialize() -> Result<Self> {
        let runtime = Aravis::initialize().map_err(|e| CameraError::Sdk(format!("{e:?}")))?;
        info!("aravis runtime initialised");
        Ok(Self {
            runtime: Some(runtime),
        })
    }

    /// Make the aravis fake GigE camera visible to enumeration.
    pub fn enable_fake_interface(&self) {
        aravis::enable_interface("Fake");
    }
}

impl CameraSdk for AravisSdk {
    type Camera<'a> = AravisCamera<'a>;

    fn list_devices(&self) -> Result<Vec<DeviceInfo>> {
        aravis::update_device_list();
        let devices = (0..aravis::n_devices())
            .filter_map(|index| {
                let id = aravis::device_id(index)?;
                Some(DeviceInfo {
                    id: id.to_string(),
                    model: aravis::device_model(index)
                        .map(|model| model.to_string())
                        .unwrap_or_default(),
                    vendor: aravis::device_vendor(index)
                        .map(|vendor| vendor.to_string())
                        .unwrap_or_default(),
                    transport: transport_from_protocol(
                        aravis::device_protocol(index).as_deref(),
                    ),
                })
            })
            .collect();
        Ok(devices)
    }

    fn open_camera(&self, id: &str) -> Result<Self::Camera<'_>> {
        let camera = Camera::new(Some(id)).map_err(|e| {
            debug!("aravis could not open '{id}': {e}");
            CameraError::DeviceNotFound(id.to_owned())
        })?;

        let transport = if camera.is_gv_device() {
            Transport::GigE
        } else if camera.is_uv_device() {
            Transport::Usb
        } else {
            Transport::Virtual
        };
        let info = DeviceInfo {
            id: id.to_owned(),
            model: camera.model_name().map(|m| m.to_string()).unwrap_or_default(),
            vendor: camera
                .vendor_name()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            transport,
        };
        info!("opened {} {} ({transport})", info.vendor, info.model);

        Ok(AravisCamera {
            camera,
            info,
            negotiated: false,
            session: PhantomData,
        })
    }

    fn shutdown(&mut self) {
        if self.runtime.take().is_some() {
            info!("aravis runtime shut down");
        }
    }
}

/// An opened GenICam camera. The device is released when the aravis
/// object is dropped.
pub struct AravisCamera<'a> {
    /// aravis camera handle.
    camera: Camera,
    /// Enumeration data.
    info: DeviceInfo,
    /// Set once `gv_auto_packet_size` has returned.
    negotiated: bool,
    /// Ties the camera to the runtime that opened it.
    session: PhantomData<&'a AravisSdk>,
}

impl AravisCamera<'_> {
    fn require_feature(&self, name: &str) -> Result<()> {
        match self.camera.is_feature_available(name) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CameraError::MissingCapability(name.to_owned())),
            Err(e) => Err(sdk_error(e)),
        }
    }
}

impl CameraDevice for AravisCamera<'_> {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn pixel_formats(&self) -> Result<Vec<String>> {
        self.camera
            .dup_available_pixel_formats_as_strings()
            .map(|formats| formats.iter().map(ToString::to_string).collect())
            .map_err(sdk_error)
    }

    fn set_pixel_format(&mut self, format: PixelFormat) -> Result<()> {
        self.camera
            .set_pixel_format(format.into())
            .map_err(sdk_error)
    }

    fn float_control(&self, name: &str) -> Result<f64> {
        self.require_feature(name)?;
        self.camera.float(name).map_err(sdk_error)
    }

    fn set_float_control(&mut self, name: &str, value: f64) -> Result<()> {
        self.require_feature(name)?;
        self.camera.set_float(name, value).map_err(sdk_error)
    }

    fn float_control_bounds(&self, name: &str) -> Result<(f64, f64)> {
        self.require_feature(name)?;
        self.camera.float_bounds(name).map_err(sdk_error)
    }

    fn acquire_frame(&mut self, timeout: Duration) -> Result<Frame> {
        let timeout_us = u64::try_from(timeout.as_micros()).unwrap_or(u64::MAX);
        let buffer = self.camera.acquisition(timeout_us).map_err(sdk_error)?;

        match buffer.status() {
            BufferStatus::Success => {}
            BufferStatus::Timeout => return Err(CameraError::Timeout(timeout)),
            status => return Err(CameraError::Sdk(format!("buffer status {status:?}"))),
        }

        let pixel_format = from_aravis_format(buffer.image_pixel_format()).ok_or_else(|| {
            CameraError::MalformedFrame(String::from("frame is not a mono encoding"))
        })?;
        let width = u32::try_from(buffer.image_width())
            .map_err(|_| CameraError::MalformedFrame(String::from("negative width")))?;
        let height = u32::try_from(buffer.image_height())
            .map_err(|_| CameraError::MalformedFrame(String::from("negative height")))?;

        Ok(Frame {
            data: buffer.data().to_vec(),
            width,
            height,
            pixel_format,
            exposure_us: self.camera.float(EXPOSURE_TIME).unwrap_or(f64::NAN),
            captured_at: Utc::now(),
        })
    }

    fn packet_size_negotiator(&mut self) -> Option<&mut dyn PacketSizeNegotiator> {
        if self.camera.is_gv_device() {
            Some(self)
        } else {
            None
        }
    }
}

impl PacketSizeNegotiator for AravisCamera<'_> {
    fn start(&mut self) -> Result<()> {
        // aravis negotiates synchronously, so completion is known on return.
        let packet_size = self.camera.gv_auto_packet_size().map_err(sdk_error)?;
        debug!("{} packet size set to {packet_size}", self.info.id);
        self.negotiated = true;
        Ok(())
    }

    fn is_done(&mut self) -> Result<bool> {
        Ok(self.negotiated)
    }
}
