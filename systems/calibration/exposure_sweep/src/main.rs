//! Exposure sweep binary.
mod args;

use anyhow::{anyhow, Context};
use args::{resolve_args, usage, ArgError, Resolution};
use lumen::components::prelude::{
    setup_camera, Backend, CameraError, CameraSdk, ExposureSweep, Session, SimulatedSdk,
    SweepConfig, CONFIG_PATH_ENV,
};
use lumen::messages::report::step::PREAMBLE;
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

/// Why a run stopped early.
#[derive(Debug)]
enum Failure {
    /// Expected failure with a message for the operator.
    Abort(String),
    /// Anything else, printed with its full cause chain.
    Unexpected(anyhow::Error),
}

impl From<anyhow::Error> for Failure {
    fn from(e: anyhow::Error) -> Self {
        Failure::Unexpected(e)
    }
}

fn main() -> ExitCode {
    println!("{PREAMBLE}");

    let camera_id = match resolve_args(std::env::args().skip(1)) {
        Ok(Resolution::Help) => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Ok(Resolution::Camera(camera_id)) => camera_id,
        Err(e @ ArgError::InvalidCount(_)) => {
            println!("Invalid number of arguments. Abort.\n");
            println!("{}", usage());
            return ExitCode::from(e.exit_code());
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run(camera_id.as_deref(), &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Abort(reason)) => {
            // Best effort, stdout may be the thing that broke.
            let _ = writeln!(out, "{reason}\n");
            ExitCode::from(1)
        }
        Err(Failure::Unexpected(e)) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(1)
        }
    }
}

/// Load the config and drive the configured backend.
fn run<W: Write>(camera_id: Option<&str>, out: &mut W) -> Result<(), Failure> {
    let config_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let config = SweepConfig::load(config_path.as_deref()).context("failed to load config")?;
    log::debug!("sweep config {config:?}");

    match config.backend {
        Backend::Simulated => {
            let sdk = SimulatedSdk::new(config.simulated_cameras.clone());
            sweep_with(sdk, camera_id, &config, out)
        }
        #[cfg(feature = "aravis")]
        Backend::Aravis => {
            let sdk = lumen::devices::hardware::aravis::AravisSdk::initialize()
                .context("failed to initialise aravis")?;
            sweep_with(sdk, camera_id, &config, out)
        }
        #[cfg(not(feature = "aravis"))]
        Backend::Aravis => Err(Failure::Unexpected(anyhow!(
            "backend 'aravis' requested but this build has no aravis support"
        ))),
    }
}

/// Open a session on `sdk`, acquire the camera, set it up and sweep.
/// The camera and the session are released on every return path.
fn sweep_with<S, W>(
    sdk: S,
    camera_id: Option<&str>,
    config: &SweepConfig,
    out: &mut W,
) -> Result<(), Failure>
where
    S: CameraSdk,
    W: Write,
{
    let session = Session::open(sdk);
    let mut camera = match session.acquire_camera(camera_id) {
        Ok(camera) => camera,
        Err(CameraError::DeviceNotFound(id)) => {
            return Err(Failure::Abort(format!(
                "Failed to access Camera '{id}'. Abort."
            )))
        }
        Err(CameraError::NoDevices) => {
            return Err(Failure::Abort(String::from("No Cameras accessible. Abort.")))
        }
        Err(e) => return Err(anyhow!(e).context("device acquisition failed").into()),
    };

    setup_camera(&mut camera, config, out).context("camera setup failed")?;
    let reports = ExposureSweep::new(config.clone())
        .run(&mut camera, out)
        .context("exposure sweep aborted")?;
    log::info!(
        "session {} captured {} frame(s)",
        session.run_id(),
        reports.len()
    );
    Ok(())
}
