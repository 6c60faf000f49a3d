//! Watermarking a list of files with one set of settings.

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use tracing::info;

use crate::{
  error::{Error, Result},
  process::Executor,
  request::{RawRequest, WatermarkSettings},
  watermark::Watermarker,
};

/// Several sources sharing a watermark, settings and output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
  pub files: Vec<PathBuf>,
  pub watermark: PathBuf,
  pub output_dir: PathBuf,
  pub settings: WatermarkSettings,
}

/// Reported before each file of a batch is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress<'a> {
  /// Zero-based position of `file` in the batch.
  pub index: usize,
  pub total: usize,
  pub file: &'a Path,
}

impl Batch {
  /// Build a batch, dropping repeated files while keeping first-seen order.
  pub fn new<I, P>(files: I, watermark: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    let mut seen = HashSet::new();
    let files = files
      .into_iter()
      .map(Into::into)
      .filter(|f: &PathBuf| seen.insert(f.clone()))
      .collect();
    Self {
      files,
      watermark: watermark.into(),
      output_dir: output_dir.into(),
      settings: WatermarkSettings::default(),
    }
  }

  pub fn settings(mut self, settings: WatermarkSettings) -> Self {
    self.settings = settings;
    self
  }

  /// The request for one source file of this batch.
  pub fn request_for(&self, file: &Path) -> Result<RawRequest> {
    Ok(
      RawRequest::new(file, &self.watermark, output_path_for(&self.output_dir, file)?)
        .settings(self.settings.clone()),
    )
  }
}

/// Where a source's watermarked copy goes: same file name, in `output_dir`.
///
/// ```rust
/// use std::path::Path;
/// use watermarkbuddy::batch::output_path_for;
///
/// let out = output_path_for(Path::new("/tmp"), Path::new("/videos/clip.mp4")).unwrap();
/// assert_eq!(out, Path::new("/tmp/clip.mp4"));
/// ```
pub fn output_path_for(output_dir: &Path, input: &Path) -> Result<PathBuf> {
  let name = input.file_name().ok_or_else(|| {
    Error::invalid_argument(format!("Input has no file name: {}", input.display()))
  })?;
  Ok(output_dir.join(name))
}

impl<E: Executor> Watermarker<E> {
  /// Watermark every file of `batch` in order, returning the produced paths.
  ///
  /// Stops at the first failure; the error names the file that failed and
  /// outputs already written stay in place.
  pub fn run_batch<F>(&mut self, batch: &Batch, mut on_progress: F) -> Result<Vec<PathBuf>>
  where
    F: FnMut(Progress<'_>),
  {
    let total = batch.files.len();
    let mut produced = Vec::with_capacity(total);

    for (index, file) in batch.files.iter().enumerate() {
      on_progress(Progress { index, total, file });
      let output = batch
        .request_for(file)
        .and_then(|raw| self.add_watermark(&raw))
        .map_err(|e| e.with_file(file))?;
      info!(input = %file.display(), output = %output.display(), "watermarked");
      produced.push(output);
    }

    Ok(produced)
  }
}
