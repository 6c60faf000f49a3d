//! Watermark requests, in their raw (text) and validated forms.

use std::path::{Path, PathBuf};

use crate::{
  error::{Error, Result},
  options::{BlendMode, Position},
};

/// Per-batch options, as a form or command line hands them over.
///
/// Offsets stay text until validation so that a bad value is reported as an
/// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
/// rather than silently defaulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkSettings {
  pub position: String,
  pub offset_x: String,
  pub offset_y: String,
  pub autoscale: bool,
  pub blend_mode: String,
}

impl Default for WatermarkSettings {
  fn default() -> Self {
    Self {
      position: Position::default().to_string(),
      offset_x: "0".to_string(),
      offset_y: "0".to_string(),
      autoscale: false,
      blend_mode: BlendMode::default().to_string(),
    }
  }
}

/// An unvalidated request for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
  pub input_path: PathBuf,
  pub watermark_path: PathBuf,
  pub output_path: PathBuf,
  pub settings: WatermarkSettings,
}

impl RawRequest {
  pub fn new<I, W, O>(input_path: I, watermark_path: W, output_path: O) -> Self
  where
    I: Into<PathBuf>,
    W: Into<PathBuf>,
    O: Into<PathBuf>,
  {
    Self {
      input_path: input_path.into(),
      watermark_path: watermark_path.into(),
      output_path: output_path.into(),
      settings: WatermarkSettings::default(),
    }
  }

  pub fn position<S: Into<String>>(mut self, position: S) -> Self {
    self.settings.position = position.into();
    self
  }

  pub fn offset<X: ToString, Y: ToString>(mut self, offset_x: X, offset_y: Y) -> Self {
    self.settings.offset_x = offset_x.to_string();
    self.settings.offset_y = offset_y.to_string();
    self
  }

  pub fn autoscale(mut self, autoscale: bool) -> Self {
    self.settings.autoscale = autoscale;
    self
  }

  pub fn blend_mode<S: Into<String>>(mut self, blend_mode: S) -> Self {
    self.settings.blend_mode = blend_mode.into();
    self
  }

  pub fn settings(mut self, settings: WatermarkSettings) -> Self {
    self.settings = settings;
    self
  }
}

/// How the watermark is laid onto the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
  /// Anchor to a corner, pushed inward by the offsets.
  Manual {
    position: Position,
    offset_x: i32,
    offset_y: i32,
  },
  /// Resize the watermark to the source width and place it at the origin.
  Autoscale,
}

/// A request that passed [`validate`]. Every path it names existed at the
/// time of validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatermarkRequest {
  pub input_path: PathBuf,
  pub watermark_path: PathBuf,
  pub output_path: PathBuf,
  pub placement: Placement,
  pub blend_mode: BlendMode,
}

fn parse_offset(axis: &str, value: &str) -> Result<i32> {
  value.trim().parse::<i32>().map_err(|_| {
    Error::invalid_argument(format!("Invalid {axis} offset \"{value}\", expected an integer"))
  })
}

fn require_file(what: &str, path: &Path) -> Result<()> {
  match path.exists() {
    true => Ok(()),
    false => Err(Error::invalid_argument(format!(
      "{what} does not exist: {}",
      path.display()
    ))),
  }
}

fn require_output_dir(output_path: &Path) -> Result<()> {
  // A bare file name has an empty parent, meaning the working directory.
  let parent = match output_path.parent() {
    Some(p) if !p.as_os_str().is_empty() => p,
    _ => Path::new("."),
  };
  match parent.is_dir() {
    true => Ok(()),
    false => Err(Error::invalid_argument(format!(
      "Output directory does not exist: {}",
      parent.display()
    ))),
  }
}

/// Check every field of a raw request and produce its typed form.
///
/// All checks run up front so that nothing is spawned for a request that is
/// going to be rejected. Offsets and position are checked even when
/// autoscaling, but are then discarded.
pub fn validate(raw: &RawRequest) -> Result<WatermarkRequest> {
  let settings = &raw.settings;
  let offset_x = parse_offset("x", &settings.offset_x)?;
  let offset_y = parse_offset("y", &settings.offset_y)?;
  let position: Position = settings.position.parse()?;
  let blend_mode: BlendMode = settings.blend_mode.parse()?;

  require_file("Input file", &raw.input_path)?;
  require_file("Watermark file", &raw.watermark_path)?;
  require_output_dir(&raw.output_path)?;

  let placement = match settings.autoscale {
    true => Placement::Autoscale,
    false => Placement::Manual {
      position,
      offset_x,
      offset_y,
    },
  };

  Ok(WatermarkRequest {
    input_path: raw.input_path.clone(),
    watermark_path: raw.watermark_path.clone(),
    output_path: raw.output_path.clone(),
    placement,
    blend_mode,
  })
}
