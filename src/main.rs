//! watermarkbuddy CLI.
//!
//! Usage:
//!   watermarkbuddy apply <FILES>... --watermark <PATH>   Watermark files
//!   watermarkbuddy positions                             List positions
//!   watermarkbuddy blend-modes                           List blend modes
//!   watermarkbuddy check                                 Check ffmpeg/ffprobe

use std::path::PathBuf;

use anyhow::Context;
use clap::{builder::PossibleValuesParser, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use watermarkbuddy::{
  batch::Batch,
  options::{blend_modes, positions, BlendMode, Position},
  paths::ToolPaths,
  request::WatermarkSettings,
  version::{ffmpeg_version_with_path, ffprobe_version_with_path},
  watermark::Watermarker,
};

#[derive(Parser)]
#[command(
  name = "watermarkbuddy",
  about = "Watermarking tool using ffmpeg",
  version,
  author
)]
struct Cli {
  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the ffmpeg executable
  #[arg(long, global = true)]
  ffmpeg: Option<PathBuf>,

  /// Path to the ffprobe executable
  #[arg(long, global = true)]
  ffprobe: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Add a watermark to one or more files
  Apply {
    /// Files to add the watermark to
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// File to use as watermark
    #[arg(short, long)]
    watermark: PathBuf,

    /// Directory the watermarked files are written to [default: system temp dir]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Position of the watermark
    #[arg(
      long,
      default_value_t = Position::default().to_string(),
      value_parser = PossibleValuesParser::new(positions())
    )]
    position: String,

    /// X-axis offset of the watermark
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    offset_x: String,

    /// Y-axis offset of the watermark
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    offset_y: String,

    /// Resize the watermark to the source width, ignoring position and offsets
    #[arg(long)]
    autoscale: bool,

    /// Video filter to blend the watermark file with
    #[arg(
      long,
      default_value_t = BlendMode::default().to_string(),
      value_parser = PossibleValuesParser::new(blend_modes())
    )]
    blend_mode: String,
  },

  /// List the supported watermark positions
  Positions,

  /// List the supported blend modes
  BlendModes,

  /// Check that ffmpeg and ffprobe can be run
  Check,
}

fn init_logging(verbose: bool) {
  let level = if verbose { "debug" } else { "info" };
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  let subscriber = fmt::Subscriber::builder()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .finish();
  tracing::subscriber::set_global_default(subscriber).ok();
}

fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);
  let tools = ToolPaths::resolve(cli.ffmpeg, cli.ffprobe);

  match cli.command {
    Commands::Apply {
      files,
      watermark,
      output_dir,
      position,
      offset_x,
      offset_y,
      autoscale,
      blend_mode,
    } => {
      let settings = WatermarkSettings {
        position,
        offset_x,
        offset_y,
        autoscale,
        blend_mode,
      };
      let output_dir = output_dir.unwrap_or_else(std::env::temp_dir);
      let batch = Batch::new(files, watermark, output_dir).settings(settings);

      let produced = Watermarker::with_tools(tools)
        .run_batch(&batch, |p| {
          info!("[{}/{}] {}", p.index + 1, p.total, p.file.display());
        })
        .context("Watermarking failed")?;

      println!("Successfully created files.");
      for path in produced {
        println!("{}", path.display());
      }
      Ok(())
    }
    Commands::Positions => {
      positions().into_iter().for_each(|p| println!("{p}"));
      Ok(())
    }
    Commands::BlendModes => {
      blend_modes().into_iter().for_each(|m| println!("{m}"));
      Ok(())
    }
    Commands::Check => check(&tools),
  }
}

fn check(tools: &ToolPaths) -> anyhow::Result<()> {
  let ffmpeg = ffmpeg_version_with_path(&tools.ffmpeg);
  let ffprobe = ffprobe_version_with_path(&tools.ffprobe);

  for (name, path, result) in [
    ("ffmpeg", &tools.ffmpeg, &ffmpeg),
    ("ffprobe", &tools.ffprobe, &ffprobe),
  ] {
    match result {
      Ok(version) => println!("[OK] {name} {version} ({})", path.display()),
      Err(e) => println!("[MISSING] {name} ({}): {e}", path.display()),
    }
  }

  ffmpeg.context("ffmpeg is not usable")?;
  ffprobe.context("ffprobe is not usable")?;
  Ok(())
}
