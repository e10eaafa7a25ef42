use crate::devices::hardware::camera::{
    CameraDevice, PacketSizeNegotiator, EXPOSURE_TIME, GVSP_ADJUST_PACKET_SIZE,
};
use crate::devices::hardware::simulated::SimulatedCameraConfig;
use crate::devices::CameraError;
use crate::messages::report::step::{formats_line, StepReport};
use crate::utils::image::{frame_average, PixelFormat};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    io::Write,
    path::Path,
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

/// Exposure times in milliseconds visited by a default run.
pub const DEFAULT_SCHEDULE_MS: [u32; 11] =
    [1, 10, 100, 500, 1000, 1500, 2000, 4000, 6000, 8000, 9900];

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "LUMEN_CONFIG";

/// Prefix for environment overrides, e.g. `LUMEN__SETTLE_MS=0`.
pub const ENV_PREFIX: &str = "LUMEN";

/// Ordered exposure times in milliseconds, consumed once per run.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ExposureSchedule(Vec<u32>);

impl Default for ExposureSchedule {
    fn default() -> Self {
        Self(DEFAULT_SCHEDULE_MS.to_vec())
    }
}

impl ExposureSchedule {
    /// Create a schedule from milliseconds, visited in the order given.
    pub fn new(milliseconds: Vec<u32>) -> Self {
        Self(milliseconds)
    }

    /// Exposure times in milliseconds.
    pub fn milliseconds(&self) -> &[u32] {
        &self.0
    }

    /// Exposure times in microseconds, the unit of the exposure control.
    pub fn microseconds(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().map(|ms| f64::from(*ms) * 1000.0)
    }

    /// Number of steps in the schedule.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the schedule has no steps.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Which SDK the binary drives.
#[derive(Deserialize, Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// GenICam cameras through aravis.
    Aravis,
    /// In memory virtual cameras.
    Simulated,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(feature = "aravis") {
            Backend::Aravis
        } else {
            Backend::Simulated
        }
    }
}

/// Bounds on the packet size negotiation poll.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct PacketSizeConfig {
    /// Sleep between completion polls.
    pub poll_interval_ms: u64,
    /// Give up after this long and carry on with the default packet size.
    pub timeout_ms: u64,
}

impl Default for PacketSizeConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            timeout_ms: 5000,
        }
    }
}

/// Everything the sweep needs, consumed to build an [`ExposureSweep`].
/// Every field defaults to the bench procedure so an empty config file
/// (or none at all) reproduces the standard run.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// Exposure times visited, in milliseconds.
    pub exposure_schedule_ms: ExposureSchedule,
    /// Wait after setting an exposure before capturing.
    pub settle_ms: u64,
    /// Bound on the wait for a single frame.
    pub frame_timeout_ms: u64,
    /// Encoding fixed for the run.
    pub pixel_format: PixelFormat,
    /// Name of the float control holding the exposure time.
    pub exposure_control: String,
    /// Check each exposure against the device bounds before setting it,
    /// instead of leaving the rejection to the device.
    pub validate_exposure_bounds: bool,
    /// Packet size negotiation poll bounds.
    pub packet_size: PacketSizeConfig,
    /// SDK to drive.
    pub backend: Backend,
    /// Cameras registered with the simulated backend.
    pub simulated_cameras: Vec<SimulatedCameraConfig>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            exposure_schedule_ms: ExposureSchedule::default(),
            settle_ms: 1000,
            frame_timeout_ms: 20_000,
            pixel_format: PixelFormat::Mono12,
            exposure_control: String::from(EXPOSURE_TIME),
            validate_exposure_bounds: false,
            packet_size: PacketSizeConfig::default(),
            backend: Backend::default(),
            simulated_cameras: vec![SimulatedCameraConfig::default()],
        }
    }
}

impl SweepConfig {
    /// Settle time as a duration.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Frame wait bound as a duration.
    pub fn frame_timeout(&self) -> Duration {
        Duration::from_millis(self.frame_timeout_ms)
    }

    /// Load the config from defaults, an optional YAML file and the
    /// `LUMEN__*` environment overrides, in increasing priority.
    ///
    /// * `filepath`: optional YAML file.
    pub fn load(filepath: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(filepath, None)
    }

    /// As [`SweepConfig::load`], reading overrides from `env` instead of
    /// the process environment when given.
    ///
    /// * `filepath`: optional YAML file.
    /// * `env`: replacement for the process environment.
    pub fn load_with_env(
        filepath: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(file) = filepath {
            debug!("reading sweep config {file:?}");
            builder = builder.add_source(config::File::new(
                &file.to_string_lossy(),
                config::FileFormat::Yaml,
            ));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("exposure_schedule_ms")
                    .source(env),
            )
            .build()?
            .try_deserialize::<SweepConfig>()
    }
}

/// Failures of the sweep procedure.
#[derive(Error, Debug)]
pub enum SweepError {
    /// The device or SDK failed.
    #[error(transparent)]
    Camera(#[from] CameraError),
    /// Writing to the operator failed.
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Outcome of the GigE packet size negotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketSizeOutcome {
    /// The device finished negotiating after this many polls.
    Adjusted {
        /// Completion polls made.
        polls: u32,
    },
    /// The transport does not negotiate packet sizes.
    Unsupported,
    /// Negotiation failed or did not finish in time, the run carries on.
    Failed(String),
}

/// Run the packet size negotiation if the device offers it. Never fails
/// the run: anything that goes wrong is reported as
/// [`PacketSizeOutcome::Failed`].
///
/// * `camera`: opened camera.
/// * `config`: poll bounds.
pub fn negotiate_packet_size<C>(camera: &mut C, config: &PacketSizeConfig) -> PacketSizeOutcome
where
    C: CameraDevice + ?Sized,
{
    let Some(negotiator) = camera.packet_size_negotiator() else {
        debug!("packet size negotiation not offered by this transport");
        return PacketSizeOutcome::Unsupported;
    };

    match poll_until_done(negotiator, config) {
        Ok(polls) => {
            info!("packet size negotiated after {polls} poll(s)");
            PacketSizeOutcome::Adjusted { polls }
        }
        Err(CameraError::MissingCapability(feature)) => {
            debug!("{feature} not present, skipping packet size negotiation");
            PacketSizeOutcome::Unsupported
        }
        Err(e) => {
            warn!("packet size negotiation failed, continuing: {e}");
            PacketSizeOutcome::Failed(e.to_string())
        }
    }
}

/// Start the negotiation then poll for completion, sleeping between
/// polls, until done or the bound passes.
fn poll_until_done(
    negotiator: &mut dyn PacketSizeNegotiator,
    config: &PacketSizeConfig,
) -> Result<u32, CameraError> {
    let bound = Duration::from_millis(config.timeout_ms);
    let interval = Duration::from_millis(config.poll_interval_ms);

    negotiator.start()?;
    // A bound too large to represent never expires.
    let deadline = Instant::now().checked_add(bound);
    let mut polls = 0;
    loop {
        polls += 1;
        if negotiator.is_done()? {
            return Ok(polls);
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(CameraError::NegotiationTimeout {
                command: String::from(GVSP_ADJUST_PACKET_SIZE),
                bound,
            });
        }
        thread::sleep(interval);
    }
}

/// Best effort configuration of an opened camera: negotiate the packet
/// size, print the offered encodings, fix the configured encoding.
/// Only the encoding can fail the setup.
///
/// * `camera`: opened camera.
/// * `config`: sweep config.
/// * `out`: operator output.
pub fn setup_camera<C, W>(
    camera: &mut C,
    config: &SweepConfig,
    out: &mut W,
) -> Result<PacketSizeOutcome, SweepError>
where
    C: CameraDevice + ?Sized,
    W: Write,
{
    let outcome = negotiate_packet_size(camera, &config.packet_size);

    let formats = camera.pixel_formats()?;
    writeln!(out, "{}", formats_line(&formats))?;
    camera.set_pixel_format(config.pixel_format)?;
    info!(
        "{} fixed to {}",
        camera.info().id,
        config.pixel_format
    );

    Ok(outcome)
}

/// Where a single step of the sweep is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SweepState {
    /// Nothing done yet.
    NotStarted,
    /// Exposure written to the device.
    ExposureSet,
    /// Waiting for the exposure to take effect.
    Settling,
    /// Waiting for the frame.
    Capturing,
    /// Computing the frame average.
    Averaging,
    /// Report line written.
    Reported,
    /// All steps finished.
    Done,
}

/// The exposure sweep procedure. Steps through the schedule once, one
/// frame per exposure, and stops at the first failure. Lines already
/// written stay written.
pub struct ExposureSweep {
    /// Parameters for the run.
    config: SweepConfig,
    /// Current state, for logging.
    state: SweepState,
}

impl ExposureSweep {
    /// Create the procedure by consuming a config.
    ///
    /// * `config`: sweep config.
    pub fn new(config: SweepConfig) -> Self {
        Self {
            config,
            state: SweepState::NotStarted,
        }
    }

    /// Current state of the procedure.
    pub fn state(&self) -> SweepState {
        self.state
    }

    fn transition(&mut self, step: u32, state: SweepState) {
        trace!("step {step}: {:?} -> {state:?}", self.state);
        self.state = state;
    }

    /// Run every step of the schedule against `camera`, printing each
    /// report to `out` as soon as it is known.
    ///
    /// * `camera`: opened and set up camera.
    /// * `out`: operator output.
    pub fn run<C, W>(&mut self, camera: &mut C, out: &mut W) -> Result<Vec<StepReport>, SweepError>
    where
        C: CameraDevice + ?Sized,
        W: Write,
    {
        let control = self.config.exposure_control.clone();
        let schedule = self.config.exposure_schedule_ms.clone();
        let mut reports = Vec::with_capacity(schedule.len());

        for (step, exposure_us) in (1_u32..).zip(schedule.microseconds()) {
            // Look the control up every step so a missing one fails loudly.
            camera.float_control(&control)?;

            if self.config.validate_exposure_bounds {
                let (min, max) = camera.float_control_bounds(&control)?;
                if !(min..=max).contains(&exposure_us) {
                    return Err(CameraError::OutOfRange {
                        control,
                        value: exposure_us,
                        min,
                        max,
                    }
                    .into());
                }
            }

            camera.set_float_control(&control, exposure_us)?;
            self.transition(step, SweepState::ExposureSet);

            self.transition(step, SweepState::Settling);
            thread::sleep(self.config.settle());

            self.transition(step, SweepState::Capturing);
            let frame = camera.acquire_frame(self.config.frame_timeout())?;

            self.transition(step, SweepState::Averaging);
            let average = frame_average(&frame)?;
            debug!(
                "step {step}: {}x{} {} captured at {}",
                frame.width, frame.height, frame.pixel_format, frame.captured_at
            );

            let report = StepReport {
                step,
                exposure_us: camera.float_control(&control)?,
                average,
            };
            writeln!(out, "{report}")?;
            out.flush()?;
            self.transition(step, SweepState::Reported);
            reports.push(report);
        }

        self.state = SweepState::Done;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::devices::hardware::camera::{CameraSdk, Session, Transport};
    use crate::devices::hardware::simulated::{
        PacketSizeBehaviour, SdkEvent, SimulatedCameraConfig, SimulatedSdk,
    };
    use crate::test_file_path;
    use serial_test::serial;
    use std::fs::OpenOptions;

    fn fast_config(schedule: Vec<u32>) -> SweepConfig {
        SweepConfig {
            exposure_schedule_ms: ExposureSchedule::new(schedule),
            settle_ms: 0,
            frame_timeout_ms: 100,
            packet_size: PacketSizeConfig {
                poll_interval_ms: 1,
                timeout_ms: 50,
            },
            ..Default::default()
        }
    }

    fn lines(out: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(out)
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_default_schedule() {
        let schedule = ExposureSchedule::default();
        assert_eq!(
            schedule.milliseconds(),
            &[1, 10, 100, 500, 1000, 1500, 2000, 4000, 6000, 8000, 9900]
        );
        let us: Vec<f64> = schedule.microseconds().collect();
        assert_eq!(us.first(), Some(&1000.0));
        assert_eq!(us.last(), Some(&9_900_000.0));
    }

    #[test]
    fn test_two_step_scenario() {
        let config = fast_config(vec![1, 10]);
        let session = Session::open(SimulatedSdk::new(vec![SimulatedCameraConfig::default()]));
        let mut camera = session.acquire_camera(None).expect("one camera registered");
        let mut out = Vec::new();

        setup_camera(&mut camera, &config, &mut out).expect("setup");
        let reports = ExposureSweep::new(config)
            .run(&mut camera, &mut out)
            .expect("sweep");

        let steps: Vec<(u32, f64)> = reports.iter().map(|r| (r.step, r.exposure_us)).collect();
        assert_eq!(steps, vec![(1, 1000.0), (2, 10_000.0)]);

        let printed = lines(&out);
        assert_eq!(printed.len(), 3);
        assert!(printed[0].starts_with("The Camera support following formats"));
        // 64 + 1000 * 0.0004 rounds to 64, 64 + 10000 * 0.0004 = 68
        assert_eq!(
            printed[1],
            "Got Frame     1, exposure:      1000us, average:   64.00"
        );
        assert_eq!(
            printed[2],
            "Got Frame     2, exposure:     10000us, average:   68.00"
        );
    }

    #[test]
    fn test_full_schedule_visits_every_step_in_order() {
        let config = fast_config(DEFAULT_SCHEDULE_MS.to_vec());
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let events = sdk.events();
        let session = Session::open(sdk);
        let mut camera = session.acquire_camera(None).expect("registered");
        let mut sweep = ExposureSweep::new(config);
        let reports = sweep.run(&mut camera, &mut Vec::new()).expect("sweep");

        assert_eq!(sweep.state(), SweepState::Done);
        assert_eq!(reports.len(), 11);
        for (report, ms) in reports.iter().zip(DEFAULT_SCHEDULE_MS) {
            assert!((report.exposure_us - f64::from(ms) * 1000.0).abs() < f64::EPSILON);
        }

        let written: Vec<f64> = events
            .snapshot()
            .into_iter()
            .filter_map(|event| match event {
                SdkEvent::SetFloat(_, value) => Some(value),
                _ => None,
            })
            .collect();
        let expected: Vec<f64> = ExposureSchedule::default().microseconds().collect();
        assert_eq!(written, expected);
    }

    #[test]
    fn test_abort_keeps_earlier_lines() {
        let config = fast_config(vec![1, 10, 100, 500]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig {
            fail_capture_at: Some(3),
            ..Default::default()
        }]);
        let events = sdk.events();
        let session = Session::open(sdk);
        let mut camera = session.acquire_camera(None).expect("registered");
        let mut out = Vec::new();

        let mut sweep = ExposureSweep::new(config);
        let result = sweep.run(&mut camera, &mut out);
        assert!(matches!(
            result,
            Err(SweepError::Camera(CameraError::Timeout(_)))
        ));
        assert_eq!(sweep.state(), SweepState::Capturing);

        let printed = lines(&out);
        assert_eq!(printed.len(), 2);
        assert!(printed[1].starts_with("Got Frame     2"));

        // Nothing is attempted after the failed capture.
        let captures = events
            .snapshot()
            .iter()
            .filter(|event| **event == SdkEvent::AcquireFrame)
            .count();
        assert_eq!(captures, 3);
    }

    #[test]
    fn test_missing_exposure_control_fails() {
        let config = fast_config(vec![1]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig {
            float_controls: Vec::new(),
            ..Default::default()
        }]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let result = ExposureSweep::new(config).run(&mut camera, &mut Vec::new());
        assert!(matches!(
            result,
            Err(SweepError::Camera(CameraError::MissingCapability(name))) if name == EXPOSURE_TIME
        ));
    }

    #[test]
    fn test_out_of_range_surfaces_device_rejection() {
        let config = fast_config(vec![1, 20_000]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let mut out = Vec::new();
        let result = ExposureSweep::new(config).run(&mut camera, &mut out);
        assert!(matches!(
            result,
            Err(SweepError::Camera(CameraError::OutOfRange { .. }))
        ));
        assert_eq!(lines(&out).len(), 1);
    }

    #[test]
    fn test_bounds_validated_before_set() {
        let mut config = fast_config(vec![20_000]);
        config.validate_exposure_bounds = true;
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let events = sdk.events();
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let result = ExposureSweep::new(config).run(&mut camera, &mut Vec::new());
        assert!(matches!(
            result,
            Err(SweepError::Camera(CameraError::OutOfRange { .. }))
        ));
        assert!(!events
            .snapshot()
            .iter()
            .any(|event| matches!(event, SdkEvent::SetFloat(..))));
    }

    #[test]
    fn test_setup_without_packet_size_capability() {
        let config = fast_config(vec![1]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig {
            transport: Transport::Usb,
            ..Default::default()
        }]);
        let events = sdk.events();
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let outcome = setup_camera(&mut camera, &config, &mut Vec::new()).expect("setup");
        assert_eq!(outcome, PacketSizeOutcome::Unsupported);
        assert!(events
            .snapshot()
            .contains(&SdkEvent::SetPixelFormat(PixelFormat::Mono12)));
    }

    #[test]
    fn test_setup_negotiates_packet_size() {
        let config = fast_config(vec![1]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let outcome = setup_camera(&mut camera, &config, &mut Vec::new()).expect("setup");
        assert_eq!(outcome, PacketSizeOutcome::Adjusted { polls: 3 });
    }

    #[test]
    fn test_negotiation_is_bounded() {
        let config = fast_config(vec![1]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig {
            packet_size: Some(PacketSizeBehaviour::Never),
            ..Default::default()
        }]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let started = Instant::now();
        let outcome = setup_camera(&mut camera, &config, &mut Vec::new()).expect("setup");
        assert!(matches!(outcome, PacketSizeOutcome::Failed(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_unrepresentable_negotiation_bound() {
        let mut config = fast_config(vec![1]);
        config.packet_size.timeout_ms = u64::MAX;
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let outcome = negotiate_packet_size(&mut camera, &config.packet_size);
        assert_eq!(outcome, PacketSizeOutcome::Adjusted { polls: 3 });
    }

    #[test]
    fn test_negotiation_failure_is_swallowed() {
        let config = fast_config(vec![1]);
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig {
            packet_size: Some(PacketSizeBehaviour::Fails),
            ..Default::default()
        }]);
        let events = sdk.events();
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let outcome = setup_camera(&mut camera, &config, &mut Vec::new()).expect("setup");
        assert!(matches!(outcome, PacketSizeOutcome::Failed(_)));
        assert!(events
            .snapshot()
            .contains(&SdkEvent::SetPixelFormat(PixelFormat::Mono12)));
    }

    #[test]
    fn test_unsupported_pixel_format_propagates() {
        let mut config = fast_config(vec![1]);
        config.pixel_format = PixelFormat::Mono10;
        let sdk = SimulatedSdk::new(vec![SimulatedCameraConfig::default()]);
        let mut camera = sdk.open_camera("SIM-0001").expect("registered");
        let result = setup_camera(&mut camera, &config, &mut Vec::new());
        assert!(matches!(result, Err(SweepError::Camera(CameraError::Sdk(_)))));
    }

    #[test]
    fn test_default_config_without_sources() {
        let config =
            SweepConfig::load_with_env(None, Some(HashMap::new())).expect("defaults load");
        assert_eq!(config, SweepConfig::default());
        assert_eq!(config.settle(), Duration::from_secs(1));
        assert_eq!(config.frame_timeout(), Duration::from_secs(20));
        assert_eq!(config.pixel_format, PixelFormat::Mono12);
    }

    #[test]
    fn test_env_overrides() {
        let env = HashMap::from([
            (String::from("LUMEN__SETTLE_MS"), String::from("0")),
            (String::from("LUMEN__PIXEL_FORMAT"), String::from("Mono16")),
            (
                String::from("LUMEN__EXPOSURE_SCHEDULE_MS"),
                String::from("1,10"),
            ),
        ]);
        let config = SweepConfig::load_with_env(None, Some(env)).expect("overrides load");
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.pixel_format, PixelFormat::Mono16);
        assert_eq!(config.exposure_schedule_ms.milliseconds(), &[1, 10]);
    }

    #[test]
    fn test_read_fixture_config() {
        let file = test_file_path!("/config/sweep/bench_usb.yaml");
        let config =
            SweepConfig::load_with_env(Some(Path::new(file)), Some(HashMap::new()))
                .expect("fixture parses");
        assert_eq!(config.backend, Backend::Simulated);
        assert_eq!(config.exposure_schedule_ms.milliseconds(), &[1, 10, 100]);
        assert_eq!(config.settle_ms, 0);
        assert_eq!(config.simulated_cameras.len(), 1);
        assert_eq!(config.simulated_cameras[0].transport, Transport::Usb);
        assert_eq!(config.simulated_cameras[0].packet_size, None);
        // Unnamed fields keep their defaults.
        assert_eq!(config.frame_timeout_ms, 20_000);
        assert_eq!(config.simulated_cameras[0].width, 64);
    }

    #[test]
    #[serial]
    /// Test writing a sweep configuration to a yaml file, and reading
    /// back to a type safe structure.
    fn test_read_write_config_to_file() {
        let write_config = SweepConfig {
            backend: Backend::Simulated,
            validate_exposure_bounds: true,
            simulated_cameras: vec![SimulatedCameraConfig {
                id: String::from("DEV_000F31024586"),
                packet_size: Some(PacketSizeBehaviour::Never),
                fail_capture_at: Some(4),
                ..Default::default()
            }],
            ..fast_config(vec![1, 2, 3])
        };

        let path = format!(
            "{}/config/sweep/generated_sweep.yaml",
            env!("CARGO_MANIFEST_DIR")
        );
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .expect("Failed to open file");
        serde_yaml::to_writer(file, &write_config).expect("Failed to write yaml");

        let read_config = SweepConfig::load_with_env(Some(Path::new(&path)), Some(HashMap::new()))
            .expect("Failed to read config");
        assert_eq!(write_config, read_config, "Failed to read write sweep config");
    }
}
