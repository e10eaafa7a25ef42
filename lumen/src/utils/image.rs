use crate::devices::{hardware::camera::Frame, CameraError, Result};
use image::{ImageBuffer, Luma};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Monochrome pixel encodings as named by the GenICam pixel format
/// naming convention. Only unpacked layouts are supported, every
/// sample above 8 bits sits in a little endian 16 bit container.
#[derive(
    EnumString, IntoStaticStr, Display, Deserialize, Serialize, Copy, Clone, Debug, PartialEq, Eq,
)]
pub enum PixelFormat {
    /// 8 bits per sample.
    Mono8,
    /// 10 significant bits in 16.
    Mono10,
    /// 12 significant bits in 16.
    Mono12,
    /// 16 bits per sample.
    Mono16,
}

impl PixelFormat {
    /// Number of significant bits in a sample.
    pub fn bit_depth(self) -> u32 {
        match self {
            PixelFormat::Mono8 => 8,
            PixelFormat::Mono10 => 10,
            PixelFormat::Mono12 => 12,
            PixelFormat::Mono16 => 16,
        }
    }

    /// Size of one sample container in the frame buffer.
    pub fn bytes_per_sample(self) -> usize {
        if self.bit_depth() <= 8 {
            1
        } else {
            2
        }
    }

    /// Largest value a sample can hold.
    pub fn max_value(self) -> u16 {
        // bit_depth is at most 16 so this cannot overflow.
        ((1_u32 << self.bit_depth()) - 1) as u16
    }
}

/// Lay samples out in the buffer format of `format`. Samples are clipped
/// to the encoding's maximum.
pub fn pack_samples(format: PixelFormat, samples: &[u16]) -> Vec<u8> {
    let max = format.max_value();
    match format.bytes_per_sample() {
        1 => samples.iter().map(|s| (*s).min(max) as u8).collect(),
        _ => samples
            .iter()
            .flat_map(|s| (*s).min(max).to_le_bytes())
            .collect(),
    }
}

/// View a frame as a two dimensional luma image.
///
/// * `frame`: frame whose buffer matches its width, height and pixel format.
pub fn frame_to_luma(frame: &Frame) -> Result<ImageBuffer<Luma<u16>, Vec<u16>>> {
    let pixels = frame.width as usize * frame.height as usize;
    if pixels == 0 {
        return Err(CameraError::MalformedFrame(format!(
            "{}x{} frame has no pixels",
            frame.width, frame.height
        )));
    }

    let needed = pixels * frame.pixel_format.bytes_per_sample();
    let Some(data) = frame.data.get(..needed) else {
        return Err(CameraError::MalformedFrame(format!(
            "{}x{} {} needs {needed} bytes, buffer holds {}",
            frame.width,
            frame.height,
            frame.pixel_format,
            frame.data.len()
        )));
    };

    let samples: Vec<u16> = match frame.pixel_format.bytes_per_sample() {
        1 => data.iter().map(|b| u16::from(*b)).collect(),
        _ => data
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    };

    ImageBuffer::from_raw(frame.width, frame.height, samples).ok_or_else(|| {
        CameraError::MalformedFrame(String::from("sample count does not match geometry"))
    })
}

/// Arithmetic mean of every sample in the frame.
pub fn frame_average(frame: &Frame) -> Result<f64> {
    let luma = frame_to_luma(frame)?;
    let count = u64::from(luma.width()) * u64::from(luma.height());
    let sum: u64 = luma.pixels().map(|p| u64::from(p.0[0])).sum();

    #[allow(clippy::cast_precision_loss)]
    Ok(sum as f64 / count as f64)
}
