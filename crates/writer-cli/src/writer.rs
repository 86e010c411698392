//! Create-or-truncate the target, write the payload once, close it.

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::{IntoRawFd, RawFd};
use std::path::{Path, PathBuf};

use nix::sys::stat::Mode;
use thiserror::Error;
use writer_config::log_writer_debug;

/// rw-rw-r-- before umask
pub const FILE_MODE: Mode = Mode::S_IRUSR
    .union(Mode::S_IWUSR)
    .union(Mode::S_IRGRP)
    .union(Mode::S_IWGRP)
    .union(Mode::S_IROTH);

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("missing {0} argument")]
    MissingArgument(&'static str),

    #[error("invalid arguments: {0}")]
    Usage(String),

    #[error("failed to print help: {0}")]
    Output(#[source] io::Error),

    #[error("failed to open file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write to file '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write all content to file '{}' ({written} of {expected} bytes)", .path.display())]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("failed to close file '{}': {source}", .path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: nix::Error,
    },
}

pub type Result<T> = std::result::Result<T, WriteError>;

/// Both positional arguments, validated
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub target_path: PathBuf,
    pub payload: OsString,
}

impl WriteRequest {
    pub fn from_args(target_path: Option<PathBuf>, payload: Option<OsString>) -> Result<Self> {
        let target_path = target_path.ok_or(WriteError::MissingArgument("target_path"))?;
        let payload = payload.ok_or(WriteError::MissingArgument("payload"))?;
        Ok(Self {
            target_path,
            payload,
        })
    }
}

/// Run open -> log -> write -> close. Returns the number of bytes written.
///
/// The file is closed exactly once: explicitly on success, by drop on a
/// failed write.
pub fn write_payload(request: &WriteRequest) -> Result<usize> {
    let path = request.target_path.as_path();
    let mut file = open_target(path)?;

    log_writer_debug!(
        "Writing '{}' to '{}'",
        request.payload.to_string_lossy(),
        path.display()
    );

    let written = write_once(&mut file, path, request.payload.as_bytes())?;
    // File's Drop discards close errors, so take the fd and close it here.
    close(file.into_raw_fd(), path)?;
    Ok(written)
}

fn open_target(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(u32::from(FILE_MODE.bits()))
        .open(path)
        .map_err(|source| WriteError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// One `write` call; a partial write is an error, not a cue to retry.
fn write_once<W: Write>(writer: &mut W, path: &Path, bytes: &[u8]) -> Result<usize> {
    let written = loop {
        match writer.write(bytes) {
            Ok(n) => break n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(WriteError::Write {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    };

    if written != bytes.len() {
        return Err(WriteError::ShortWrite {
            path: path.to_path_buf(),
            written,
            expected: bytes.len(),
        });
    }
    Ok(written)
}

fn close(fd: RawFd, path: &Path) -> Result<()> {
    nix::unistd::close(fd).map_err(|source| WriteError::Close {
        path: path.to_path_buf(),
        source,
    })
}
