//! Source inspection with `ffprobe`.

use std::{ffi::OsStr, fmt, path::Path, process::Command, str::FromStr};

use serde::Deserialize;
use tracing::debug;

use crate::{
  error::{Error, ErrorKind, Result},
  process::Executor,
};

/// Pixel aspect ratio of a video stream, as `num:den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleAspectRatio {
  pub num: u32,
  pub den: u32,
}

impl SampleAspectRatio {
  pub const SQUARE: SampleAspectRatio = SampleAspectRatio { num: 1, den: 1 };

  pub fn new(num: u32, den: u32) -> Self {
    Self { num, den }
  }

  pub fn is_square(&self) -> bool {
    self.num == self.den
  }
}

impl fmt::Display for SampleAspectRatio {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.num, self.den)
  }
}

impl FromStr for SampleAspectRatio {
  type Err = Error;

  /// Parse `N:M`. ffprobe reports `0:1` (or `N/A`) when the container does
  /// not know the ratio; those are errors here, see [`parse_probe_output`]
  /// for the square-pixel fallback.
  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::probe(format!("Invalid sample aspect ratio \"{s}\""));
    let (num, den) = s.split_once(':').ok_or_else(invalid)?;
    let num: u32 = num.trim().parse().map_err(|_| invalid())?;
    let den: u32 = den.trim().parse().map_err(|_| invalid())?;
    if num == 0 || den == 0 {
      return Err(invalid());
    }
    Ok(Self { num, den })
  }
}

/// The properties of a source's first video stream that autoscale needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStream {
  pub width: u32,
  pub height: u32,
  pub sample_aspect_ratio: SampleAspectRatio,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
  #[serde(default)]
  streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
  width: Option<u32>,
  height: Option<u32>,
  sample_aspect_ratio: Option<String>,
}

/// Parse the JSON document printed by `ffprobe -print_format json
/// -show_streams`, returning the first stream.
///
/// Anything printed before the opening brace or after the document (stray
/// warnings on the merged output) is ignored. A missing, `N/A` or `0:1`
/// sample aspect ratio means square pixels; any other unparseable ratio is
/// an error.
///
/// ```rust
/// use watermarkbuddy::ffprobe::{parse_probe_output, SampleAspectRatio};
///
/// let json = r#"{"streams": [{"width": 720, "height": 576, "sample_aspect_ratio": "16:15"}]}"#;
/// let stream = parse_probe_output(json).unwrap();
/// assert_eq!(stream.width, 720);
/// assert_eq!(stream.sample_aspect_ratio, SampleAspectRatio::new(16, 15));
/// ```
pub fn parse_probe_output(output: &str) -> Result<VideoStream> {
  let start = output
    .find('{')
    .ok_or_else(|| Error::probe(format!("ffprobe printed no JSON document:\n{output}")))?;
  let document: ProbeOutput = serde_json::Deserializer::from_str(&output[start..])
    .into_iter::<ProbeOutput>()
    .next()
    .ok_or_else(|| Error::probe("ffprobe printed an empty document"))??;

  let stream = document
    .streams
    .into_iter()
    .next()
    .ok_or_else(|| Error::probe("No video stream found"))?;

  let (width, height) = match (stream.width, stream.height) {
    (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
    _ => return Err(Error::probe("Video stream has no resolution")),
  };

  let sample_aspect_ratio = match stream.sample_aspect_ratio.as_deref().map(str::trim) {
    None | Some("N/A") | Some("0:1") => SampleAspectRatio::SQUARE,
    Some(sar) => sar.parse()?,
  };

  Ok(VideoStream {
    width,
    height,
    sample_aspect_ratio,
  })
}

/// The `ffprobe` invocation that lists the first video stream as JSON.
pub fn probe_command<S: AsRef<OsStr>>(ffprobe: S, input: &Path) -> Command {
  let mut command = Command::new(ffprobe);
  command
    .args(["-v", "error"])
    .args(["-print_format", "json"])
    .arg("-show_streams")
    .arg("-hide_banner")
    .args(["-select_streams", "v:0"])
    .arg(input);
  command
}

/// Probe `input` for its first video stream.
///
/// Every failure, including a non-zero exit of `ffprobe`, is reported as
/// [`ErrorKind::Probe`] with the captured output kept in the message.
pub fn probe_video_stream<E, S>(executor: &mut E, ffprobe: S, input: &Path) -> Result<VideoStream>
where
  E: Executor + ?Sized,
  S: AsRef<OsStr>,
{
  let mut command = probe_command(ffprobe, input);
  let output = executor.execute(&mut command).map_err(|mut e| {
    if e.kind == ErrorKind::Process {
      e.kind = ErrorKind::Probe;
      e.message = format!("ffprobe failed on {}:\n{}", input.display(), e.message);
    }
    e
  })?;

  let stream = parse_probe_output(&output)?;
  debug!(
    input = %input.display(),
    width = stream.width,
    height = stream.height,
    sar = %stream.sample_aspect_ratio,
    "probed source"
  );
  Ok(stream)
}
