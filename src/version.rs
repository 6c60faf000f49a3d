use crate::{
  error::{Error, Result},
  process::{Executor, SystemExecutor},
};
use std::ffi::OsStr;
use std::process::Command;

/// Parse the version out of the first line of `<tool> -version`.
///
/// Lines may carry the `[info]` prefix added by `-loglevel level`.
///
/// ```rust
/// use watermarkbuddy::version::try_parse_version;
///
/// let line = "[info] ffmpeg version 2023-01-18-git-ba36e6ed52-full_build-www.gyan.dev Copyright (c) 2000-2023 the FFmpeg developers\n";
/// let version = try_parse_version("ffmpeg", line).unwrap();
/// assert!(version == "2023-01-18-git-ba36e6ed52-full_build-www.gyan.dev");
/// ```
pub fn try_parse_version(tool: &str, output: &str) -> Option<String> {
  output.lines().find_map(|line| {
    line
      .strip_prefix("[info]")
      .unwrap_or(line)
      .trim()
      .strip_prefix(tool)?
      .strip_prefix(" version ")?
      .split_whitespace()
      .next()
      .map(|s| s.to_string())
  })
}

/// Run `<path> -version` through `executor` and parse the reported version.
///
/// A tool that runs but does not identify itself as `tool` is reported as
/// [`ErrorKind::Process`](crate::error::ErrorKind::Process), with its output
/// kept in the message.
pub fn version_with_executor<E, S>(executor: &mut E, tool: &str, path: S) -> Result<String>
where
  E: Executor + ?Sized,
  S: AsRef<OsStr>,
{
  let mut command = Command::new(path);
  command.arg("-version");
  // ⚠ `-version` prints on stdout, not stderr
  let output = executor.execute(&mut command)?;
  try_parse_version(tool, &output)
    .ok_or_else(|| Error::process(format!("Failed to parse {tool} version:\n{output}")))
}

/// Run `<path> -version` for ffmpeg and return the reported version.
pub fn ffmpeg_version_with_path<S: AsRef<OsStr>>(path: S) -> Result<String> {
  version_with_executor(&mut SystemExecutor, "ffmpeg", path)
}

/// Run `<path> -version` for ffprobe and return the reported version.
pub fn ffprobe_version_with_path<S: AsRef<OsStr>>(path: S) -> Result<String> {
  version_with_executor(&mut SystemExecutor, "ffprobe", path)
}
