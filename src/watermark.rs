//! Running a watermark request against the external tools.
//!
//! A manual placement is a single `ffmpeg` call. Autoscale adds two calls in
//! front of it: `ffprobe` for the source width and pixel aspect ratio, then
//! `ffmpeg` to render a resized watermark into a temporary file that lives
//! exactly as long as the request.

use std::path::{Path, PathBuf};

use tempfile::TempPath;
use tracing::{debug, warn};

use crate::{
  command::FfmpegCommand,
  error::Result,
  ffprobe::{probe_video_stream, VideoStream},
  filter::{build_filter_graph, build_scale_filter},
  paths::ToolPaths,
  process::{Executor, SystemExecutor},
  request::{validate, Placement, RawRequest, WatermarkRequest},
};

/// The final compositing call: source first, watermark second, output last.
pub fn composite_command<S: AsRef<std::ffi::OsStr>>(
  ffmpeg: S,
  request: &WatermarkRequest,
  watermark: &Path,
  filter_graph: &str,
) -> FfmpegCommand {
  let mut command = FfmpegCommand::new_with_exe(ffmpeg);
  command
    .hide_banner()
    .overwrite()
    .input(&request.input_path)
    .input(watermark)
    .filter_complex(filter_graph)
    .output(&request.output_path);
  command
}

/// Render `watermark` resized for `source` into `destination`.
pub fn prescale_command<S: AsRef<std::ffi::OsStr>>(
  ffmpeg: S,
  watermark: &Path,
  source: &VideoStream,
  destination: &Path,
) -> FfmpegCommand {
  let mut command = FfmpegCommand::new_with_exe(ffmpeg);
  command
    .hide_banner()
    .overwrite()
    .input(watermark)
    .video_filter(build_scale_filter(source.width, source.sample_aspect_ratio))
    .output(destination);
  command
}

/// Allocate an empty temporary file with the watermark's extension, so that
/// `ffmpeg` picks the same image encoder for the resized copy.
fn allocate_scaled_path(watermark: &Path) -> Result<TempPath> {
  let suffix = watermark
    .extension()
    .map(|ext| format!(".{}", ext.to_string_lossy()))
    .unwrap_or_default();
  let file = tempfile::Builder::new()
    .prefix("watermarkbuddy-")
    .suffix(&suffix)
    .tempfile()?;
  Ok(file.into_temp_path())
}

/// Applies watermarks by driving `ffmpeg`/`ffprobe` through an [`Executor`].
pub struct Watermarker<E = SystemExecutor> {
  tools: ToolPaths,
  executor: E,
}

impl Watermarker<SystemExecutor> {
  /// Use tools found by the default lookup and spawn real processes.
  pub fn new() -> Self {
    Self::with_tools(ToolPaths::default())
  }

  pub fn with_tools(tools: ToolPaths) -> Self {
    Self::with_executor(tools, SystemExecutor)
  }
}

impl Default for Watermarker<SystemExecutor> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Executor> Watermarker<E> {
  pub fn with_executor(tools: ToolPaths, executor: E) -> Self {
    Self { tools, executor }
  }

  pub fn executor(&self) -> &E {
    &self.executor
  }

  /// Validate `raw` and apply it, returning the output path.
  ///
  /// Validation finishes before anything is spawned.
  pub fn add_watermark(&mut self, raw: &RawRequest) -> Result<PathBuf> {
    let request = validate(raw)?;
    self.apply(&request)
  }

  /// Apply an already validated request, returning the output path. An
  /// existing file at the output path is overwritten.
  pub fn apply(&mut self, request: &WatermarkRequest) -> Result<PathBuf> {
    match request.placement {
      Placement::Manual { .. } => {
        let graph = build_filter_graph(request, None);
        self.composite(request, &request.watermark_path, &graph)?;
      }
      Placement::Autoscale => {
        let source =
          probe_video_stream(&mut self.executor, &self.tools.ffprobe, &request.input_path)?;
        let scaled = self.prescale(&request.watermark_path, &source)?;
        let graph = build_filter_graph(request, Some(source.width));
        let composited = self.composite(request, &scaled, &graph);
        // dropping the handle also deletes; closing explicitly surfaces failures
        let scaled_display = scaled.display().to_string();
        if let Err(e) = scaled.close() {
          warn!(path = %scaled_display, error = %e, "failed to remove scaled watermark");
        }
        composited?;
      }
    }
    Ok(request.output_path.clone())
  }

  fn prescale(&mut self, watermark: &Path, source: &VideoStream) -> Result<TempPath> {
    let scaled = allocate_scaled_path(watermark)?;
    let mut command = prescale_command(&self.tools.ffmpeg, watermark, source, &scaled);
    debug!(width = source.width, scaled = %scaled.display(), "pre-scaling watermark");
    // on failure `scaled` is dropped here, which deletes it
    self.executor.execute(command.as_inner_mut())?;
    Ok(scaled)
  }

  fn composite(&mut self, request: &WatermarkRequest, watermark: &Path, graph: &str) -> Result<()> {
    let mut command = composite_command(&self.tools.ffmpeg, request, watermark, graph);
    debug!(output = %request.output_path.display(), "compositing");
    self.executor.execute(command.as_inner_mut())?;
    Ok(())
  }
}
