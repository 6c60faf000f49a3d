//! Overlay a watermark image onto videos and images with a standalone FFmpeg
//! binary.
//!
//! ## Example
//!
//! ```rust,no_run
//! use watermarkbuddy::{error::Result, request::RawRequest, watermark::Watermarker};
//!
//! fn main() -> Result<()> {
//!   let request = RawRequest::new("clip.mp4", "logo.png", "/tmp/clip.mp4")
//!     .position("bottom-right") // <- one of `options::positions()`
//!     .offset(10, 10)
//!     .blend_mode("normal"); // <- one of `options::blend_modes()`
//!
//!   let output = Watermarker::new() // <- finds `ffmpeg`/`ffprobe` like a sidecar
//!     .add_watermark(&request)?; // <- validates, then runs `ffmpeg`
//!   println!("wrote {}", output.display());
//!   Ok(())
//! }
//! ```
//!

#[cfg(test)]
mod test;

pub mod batch;
pub mod command;
pub mod error;
pub mod ffprobe;
pub mod filter;
pub mod options;
pub mod paths;
pub mod process;
pub mod request;
pub mod version;
pub mod watermark;
