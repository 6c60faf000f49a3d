use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::result::Result as StdResult;

/// Shorthand alias for `Result<T, Error>` using the `watermarkbuddy` error type.
pub type Result<T> = StdResult<T, Error>;

/// Broad category of a failure, used by callers to decide how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// A request was rejected before any subprocess was spawned.
  InvalidArgument,
  /// `ffprobe` failed, or its output could not be used.
  Probe,
  /// A subprocess exited with a non-zero status, or its output was not
  /// what the tool should print.
  Process,
  /// Spawning a process or touching the filesystem failed.
  Io,
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      ErrorKind::InvalidArgument => "invalid argument",
      ErrorKind::Probe => "probe error",
      ErrorKind::Process => "process error",
      ErrorKind::Io => "i/o error",
    };
    f.write_str(name)
  }
}

/// The error type for the `watermarkbuddy` crate.
#[derive(Debug)]
pub struct Error {
  pub kind: ErrorKind,
  pub message: String,
  /// The source file of a batch item that failed, if known.
  pub file: Option<PathBuf>,
  pub source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Display for Error {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.file {
      Some(file) => write!(f, "{}: {}", file.display(), self.message),
      None => write!(f, "{}", self.message),
    }
  }
}

impl StdError for Error {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    self
      .source
      .as_deref()
      .map(|e| e as &(dyn StdError + 'static))
  }
}

impl Error {
  /// Wrap any standard Error into a library Error of the given kind.
  pub fn from_std<E>(kind: ErrorKind, e: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    Error {
      kind,
      message: e.to_string(),
      file: None,
      source: Some(Box::new(e)),
    }
  }

  /// Create an error of the given kind from a message.
  pub fn msg<S: AsRef<str>>(kind: ErrorKind, message: S) -> Self {
    Error {
      kind,
      message: message.as_ref().to_string(),
      file: None,
      source: None,
    }
  }

  pub fn invalid_argument<S: AsRef<str>>(message: S) -> Self {
    Error::msg(ErrorKind::InvalidArgument, message)
  }

  pub fn probe<S: AsRef<str>>(message: S) -> Self {
    Error::msg(ErrorKind::Probe, message)
  }

  /// A non-zero exit. The captured output becomes the message body so it can
  /// be shown to the user verbatim.
  pub fn process<S: AsRef<str>>(output: S) -> Self {
    Error::msg(ErrorKind::Process, output)
  }

  /// Attach the batch item that caused this error.
  pub fn with_file<P: AsRef<Path>>(mut self, file: P) -> Self {
    self.file = Some(file.as_ref().to_path_buf());
    self
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn is_invalid_argument(&self) -> bool {
    self.kind == ErrorKind::InvalidArgument
  }
}

impl From<io::Error> for Error {
  fn from(e: io::Error) -> Self {
    Error::from_std(ErrorKind::Io, e)
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Error::from_std(ErrorKind::Probe, e)
  }
}
