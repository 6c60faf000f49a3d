//! Blocking execution of external tools.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Error, Result};

/// Runs a fully configured [`Command`] to completion.
///
/// Implementations block until the process exits, return its combined
/// standard output and error on success, and fail with
/// [`ErrorKind::Process`](crate::error::ErrorKind::Process) carrying that
/// same text on a non-zero exit. Nothing is retried.
pub trait Executor {
  fn execute(&mut self, command: &mut Command) -> Result<String>;
}

/// Spawns real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
  fn execute(&mut self, command: &mut Command) -> Result<String> {
    debug!(command = %command_line(command), "spawning");
    let program = command.get_program().to_string_lossy().into_owned();

    let output = command
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .output()
      .map_err(|e| {
        let mut err = Error::from(e);
        err.message = format!("Failed to run {program}: {}", err.message);
        err
      })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
      debug!(status = %output.status, "process failed");
      return Err(Error::process(combined));
    }
    Ok(combined)
  }
}

/// Render a command the way it could be pasted into a terminal.
pub fn command_line(command: &Command) -> String {
  std::iter::once(command.get_program())
    .chain(command.get_args())
    .map(|arg| {
      let arg = arg.to_string_lossy();
      match arg.contains(char::is_whitespace) || arg.contains(';') {
        true => format!("\"{arg}\""),
        false => arg.into_owned(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
