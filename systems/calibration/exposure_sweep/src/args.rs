use clap::{CommandFactory, Parser};

/// Capture one frame per exposure time and report the average intensity
/// of each.
#[derive(Parser, Debug)]
#[command(name = "exposure_sweep", disable_help_flag = true)]
pub struct Args {
    /// ID of the camera to use (using first camera if not specified).
    #[arg(allow_hyphen_values = true)]
    pub camera_id: Option<String>,
}

/// Arguments that ask for the usage text wherever they appear.
pub const HELP_FLAGS: [&str; 3] = ["-h", "/h", "--help"];

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Print usage and exit successfully.
    Help,
    /// Run against this camera, or the first enumerated one.
    Camera(Option<String>),
}

/// Command line that cannot be run.
#[derive(Debug, PartialEq, Eq)]
pub enum ArgError {
    /// More positional arguments than the single camera id.
    InvalidCount(usize),
}

impl ArgError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ArgError::InvalidCount(_) => 2,
        }
    }
}

/// Resolve the process arguments, program name excluded.
///
/// * `args`: arguments after the program name.
pub fn resolve_args<I, T>(args: I) -> Result<Resolution, ArgError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    if args.iter().any(|arg| HELP_FLAGS.contains(&arg.as_str())) {
        return Ok(Resolution::Help);
    }

    // Counted before any parsing, `--` is an identifier like any other.
    let count = args.len();
    if count > 1 {
        log::debug!("rejected command line {args:?}");
        return Err(ArgError::InvalidCount(count));
    }
    Ok(Resolution::Camera(args.into_iter().next()))
}

/// Usage text.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}
