use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Banner printed once at start up.
pub const PREAMBLE: &str = "\
//////////////////////////////////////////////////
/// Lumen Synchronous Grab                     ///
/// Capture Frames in different exposure time. ///
//////////////////////////////////////////////////
";

/// Result of one exposure step. The `Display` layout is fixed width so
/// columns line up across a run:
/// `Got Frame     1, exposure:      1000us, average:   64.40`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StepReport {
    /// One based index of the captured frame within the run.
    pub step: u32,
    /// Exposure read back from the device, in microseconds.
    pub exposure_us: f64,
    /// Mean sample value of the frame.
    pub average: f64,
}

impl Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Got Frame {:5}, exposure:{:10.0}us, average:{:8.2}",
            self.step, self.exposure_us, self.average
        )
    }
}

/// Line listing the encodings a device offers, printed before one
/// is fixed for the run.
pub fn formats_line(formats: &[String]) -> String {
    format!(
        "The Camera support following formats: ({})",
        formats.join(", ")
    )
}
