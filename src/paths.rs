use crate::error::{Error, ErrorKind, Result};
use std::{
  env::{current_exe, var_os},
  path::{Path, PathBuf},
};

/// Environment variable overriding the `ffmpeg` executable.
pub const FFMPEG_ENV: &str = "WATERMARKBUDDY_FFMPEG";
/// Environment variable overriding the `ffprobe` executable.
pub const FFPROBE_ENV: &str = "WATERMARKBUDDY_FFPROBE";

/// Returns the path of the FFmpeg executable, to be used as the argument to
/// `Command::new`.
///
/// Looks first at `WATERMARKBUDDY_FFMPEG`, then for a binary adjacent to the
/// Rust executable, and finally falls back to `ffmpeg` on the system path. A
/// missing binary is only reported when the command is actually run.
pub fn ffmpeg_path() -> PathBuf {
  resolve_tool(FFMPEG_ENV, "ffmpeg")
}

/// Same lookup as [`ffmpeg_path`] for `ffprobe`. Note that not all FFmpeg
/// distributions include FFprobe.
pub fn ffprobe_path() -> PathBuf {
  resolve_tool(FFPROBE_ENV, "ffprobe")
}

fn resolve_tool(env_var: &str, name: &str) -> PathBuf {
  if let Some(path) = var_os(env_var).filter(|p| !p.is_empty()) {
    return PathBuf::from(path);
  }
  let default = Path::new(name).to_path_buf();
  match sidecar_path(name) {
    Ok(sidecar_path) => match sidecar_path.exists() {
      true => sidecar_path,
      false => default,
    },
    Err(_) => default,
  }
}

/// The (expected) path to a tool binary adjacent to the Rust binary.
///
/// The extension differs between platforms, with Windows using `.exe`, while
/// Mac and Linux have no extension.
pub fn sidecar_path(name: &str) -> Result<PathBuf> {
  let mut path = current_exe()?
    .parent()
    .ok_or_else(|| Error::msg(ErrorKind::Io, "Can't get parent of current_exe"))?
    .join(name);
  if cfg!(windows) {
    path.set_extension("exe");
  }
  Ok(path)
}

/// The pair of executables a watermark run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
  pub ffmpeg: PathBuf,
  pub ffprobe: PathBuf,
}

impl ToolPaths {
  /// Resolve both tools, preferring explicitly given paths over the
  /// environment and sidecar lookup.
  pub fn resolve(ffmpeg: Option<PathBuf>, ffprobe: Option<PathBuf>) -> Self {
    Self {
      ffmpeg: ffmpeg.unwrap_or_else(ffmpeg_path),
      ffprobe: ffprobe.unwrap_or_else(ffprobe_path),
    }
  }
}

impl Default for ToolPaths {
  fn default() -> Self {
    Self::resolve(None, None)
  }
}
