//! # writer
//!
//! Writes a string to a file and records what it did in the system log.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use writer_config::{log_writer_error, log_writer_warn, Config};

mod writer;

use writer::{WriteError, WriteRequest};

/// Write a string to a file, logging to syslog (LOG_USER)
///
/// Arguments are taken literally. Only a first argument of -h, --help,
/// -V or --version is treated as an option.
#[derive(Parser, Debug)]
#[command(name = "writer")]
#[command(version, about, long_about = None)]
#[command(override_usage = "writer <TARGET_PATH> <PAYLOAD>")]
#[allow(dead_code)] // only the command definition is used; parse_args reads argv
struct Cli {
    /// File to create or overwrite; its directory must already exist
    #[arg(value_name = "TARGET_PATH")]
    target_path: PathBuf,

    /// Text to write into the file
    #[arg(value_name = "PAYLOAD")]
    payload: OsString,
}

/// What the command line asks for
#[derive(Debug)]
enum Invocation {
    /// Help or version text, rendered by clap
    Info(clap::Error),
    Write(WriteRequest),
}

const INFO_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

/// Split raw arguments (program name first) without letting clap near the
/// payload, so values such as `--help` or `--` are written verbatim.
fn parse_args<I>(args: I) -> Result<Invocation, WriteError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter().skip(1);
    let target_path = args.next();

    if let Some(flag) = target_path.as_deref().filter(|a| is_info_flag(a)) {
        if let Err(e) = Cli::command().try_get_matches_from([OsStr::new("writer"), flag]) {
            return Ok(Invocation::Info(e));
        }
    }

    let request = WriteRequest::from_args(target_path.map(PathBuf::from), args.next())?;
    if let Some(extra) = args.next() {
        return Err(WriteError::Usage(format!(
            "unexpected argument '{}'",
            extra.to_string_lossy()
        )));
    }
    Ok(Invocation::Write(request))
}

fn is_info_flag(arg: &OsStr) -> bool {
    INFO_FLAGS.iter().any(|flag| arg == OsStr::new(flag))
}

fn main() -> ExitCode {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = Config::default();
            config.apply_env_overrides();
            (config, Some(e))
        }
    };
    writer_config::logging::init_logging(&config.logging);
    if let Some(e) = config_error {
        log_writer_warn!(error = %e, "Ignoring unreadable config, using defaults");
    }

    match parse_args(std::env::args_os()).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log_writer_error!("Error: {}", err);
            println!("Error: {err}");
            if matches!(err, WriteError::MissingArgument(_) | WriteError::Usage(_)) {
                println!("{}", Cli::command().render_usage());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: Invocation) -> Result<(), WriteError> {
    match invocation {
        Invocation::Info(info) => info.print().map_err(WriteError::Output),
        Invocation::Write(request) => writer::write_payload(&request).map(|_| ()),
    }
}
