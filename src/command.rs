use std::{
  ffi::OsStr,
  fmt,
  path::Path,
  process::{Command, CommandArgs},
};

/// A wrapper around [`std::process::Command`] with aliases for the `ffmpeg`
/// arguments a watermark run needs.
///
/// The `rustdoc` on each method includes relevant information from the FFmpeg
/// documentation: <https://ffmpeg.org/ffmpeg.html>. Refer there for the
/// exhaustive list of possible arguments.
pub struct FfmpegCommand {
  inner: Command,
}

impl FfmpegCommand {
  //// Generic option aliases
  //// https://ffmpeg.org/ffmpeg.html#Generic-options

  /// alias for `-hide_banner` argument.
  ///
  /// Suppress printing banner, which keeps the captured diagnostics of a
  /// failed run down to the lines that matter.
  pub fn hide_banner(&mut self) -> &mut Self {
    self.arg("-hide_banner");
    self
  }

  //// Main option aliases
  //// https://ffmpeg.org/ffmpeg.html#Main-options

  /// Alias for `-i` argument, the input file path.
  ///
  /// Inputs are numbered in the order they are added; filter graphs refer to
  /// the first video stream of each as `[0:v]`, `[1:v]` and so on.
  pub fn input<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
    self.arg("-i");
    self.arg(path.as_ref());
    self
  }

  /// Alias for `-y` argument: overwrite output files without asking.
  pub fn overwrite(&mut self) -> &mut Self {
    self.arg("-y");
    self
  }

  /// Alias for `-vf` argument.
  ///
  /// Create the filtergraph specified by `filtergraph` and use it to filter the
  /// video stream. It must have a single input and a single output.
  pub fn video_filter<S: AsRef<str>>(&mut self, filtergraph: S) -> &mut Self {
    self.arg("-vf");
    self.arg(filtergraph.as_ref());
    self
  }

  /// Alias for `-filter_complex` argument.
  ///
  /// Define a complex filtergraph, i.e. one with arbitrary number of inputs
  /// and/or outputs. Input link labels refer to input streams using the
  /// `[file_index:stream_specifier]` syntax.
  pub fn filter_complex<S: AsRef<str>>(&mut self, filtergraph: S) -> &mut Self {
    self.arg("-filter_complex");
    self.arg(filtergraph.as_ref());
    self
  }

  /// The output file path. `ffmpeg` expects this last.
  pub fn output<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
    self.arg(path.as_ref());
    self
  }

  //// `std::process::Command` passthrough methods
  ///
  /// Adds an argument to pass to the program.
  ///
  /// Identical to `arg` in [`std::process::Command`].
  pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
    self.inner.arg(arg.as_ref());
    self
  }

  /// Returns an iterator of the arguments that will be passed to the program.
  ///
  /// Identical to `get_args` in [`std::process::Command`].
  pub fn get_args(&self) -> CommandArgs<'_> {
    self.inner.get_args()
  }

  //// Constructors
  pub fn new_with_exe<S: AsRef<OsStr>>(exe: S) -> Self {
    Self {
      inner: Command::new(exe),
    }
  }

  //// Escape hatches
  /// Escape hatch to mutably access the inner `Command`.
  pub fn as_inner_mut(&mut self) -> &mut Command {
    &mut self.inner
  }
}

impl fmt::Debug for FfmpegCommand {
  /// Format the program and arguments of a Command for display. Any
  /// non-utf8 data is lossily converted using the utf8 replacement
  /// character.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.inner.fmt(f)
  }
}
