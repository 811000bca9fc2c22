use std::io;
use std::path::PathBuf;

/// Setup-time failures. Steady-state logging never returns these; it counts lost logs instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("sink name is empty")]
  EmptyName,

  #[error("format's mandatory \"{{MESSAGE}}\" field is missing")]
  MissingMessage,

  #[error("severity level {0} is not in the [0, 63] interval")]
  SeverityOutOfRange(u8),

  #[error("composed sink \"{0}\" has no child sinks")]
  NoChildren(String),

  #[error("stream \"{0}\" is not stdout or stderr")]
  InvalidStream(String),

  #[error("file path cannot be empty")]
  EmptyPath,

  #[error("failed to open log file {}", .path.display())]
  Open {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to spawn the worker thread")]
  Spawn(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
