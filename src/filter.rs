//! Rendering of the ffmpeg filter graphs used to composite a watermark.
//!
//! Nothing here touches the filesystem or spawns a process; every function is
//! a pure function of its arguments.

use std::fmt;

use crate::{
  ffprobe::SampleAspectRatio,
  options::{BlendMode, Position},
  request::{Placement, WatermarkRequest},
};

/// Label of the watermark after it has been moved into place.
const MOVED: &str = "wm_moved";
/// Label of the watermark after the autoscale `scale` stage.
const SCALED: &str = "wm_scaled";

/// Where to place the watermark, as `overlay` filter options.
///
/// `W`/`H` are the source width and height and `w`/`h` those of the
/// watermark; ffmpeg resolves them, this type only carries the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayExpression {
  pub x: String,
  pub y: String,
}

impl OverlayExpression {
  /// Top-left corner with no offset.
  pub fn origin() -> Self {
    build_overlay_expression(Position::TopLeft, 0, 0)
  }
}

impl fmt::Display for OverlayExpression {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "x={}:y={}", self.x, self.y)
  }
}

/// Map a position and offsets to an overlay coordinate expression.
///
/// ```rust
/// use watermarkbuddy::{filter::build_overlay_expression, options::Position};
///
/// let expr = build_overlay_expression(Position::TopRight, 5, 10);
/// assert_eq!(expr.to_string(), "x=W-w-5:y=10");
/// ```
pub fn build_overlay_expression(
  position: Position,
  offset_x: i32,
  offset_y: i32,
) -> OverlayExpression {
  let (x, y) = match position {
    Position::TopLeft => (format!("{offset_x}"), format!("{offset_y}")),
    Position::TopRight => (format!("W-w-{offset_x}"), format!("{offset_y}")),
    Position::BottomLeft => (format!("{offset_x}"), format!("H-h-{offset_y}")),
    Position::BottomRight => (format!("W-w-{offset_x}"), format!("H-h-{offset_y}")),
  };
  OverlayExpression { x, y }
}

/// The overlay expression a request actually renders with.
///
/// Autoscale always lands at the origin; any position or offset the caller
/// supplied is dropped when the request is validated.
pub fn effective_overlay(placement: &Placement) -> OverlayExpression {
  match placement {
    Placement::Manual {
      position,
      offset_x,
      offset_y,
    } => build_overlay_expression(*position, *offset_x, *offset_y),
    Placement::Autoscale => OverlayExpression::origin(),
  }
}

/// Render the `-filter_complex` graph for a validated request.
///
/// Input `0` is the source media and input `1` the watermark. When the
/// request autoscales, `scaled_width` is the probed source width and a `scale`
/// stage is prepended; it is ignored otherwise.
///
/// The overlaid frame is then blended against the untouched source a second
/// time.
///
/// ```rust
/// use watermarkbuddy::filter::render_filter_graph;
/// use watermarkbuddy::options::{BlendMode, Position};
/// use watermarkbuddy::request::Placement;
///
/// let placement = Placement::Manual { position: Position::BottomRight, offset_x: 10, offset_y: 10 };
/// let graph = render_filter_graph(&placement, BlendMode::Normal, None);
/// assert_eq!(
///   graph,
///   "[0:v][1:v]overlay=x=W-w-10:y=H-h-10[wm_moved];[wm_moved][0:v]blend=all_mode=normal"
/// );
/// ```
pub fn render_filter_graph(
  placement: &Placement,
  blend_mode: BlendMode,
  scaled_width: Option<u32>,
) -> String {
  let overlay = effective_overlay(placement);
  let blend = format!("[{MOVED}][0:v]blend=all_mode={blend_mode}");

  match (placement, scaled_width) {
    (Placement::Autoscale, Some(width)) => format!(
      "[1:v]scale=w={width}:h=-1[{SCALED}];[0:v][{SCALED}]overlay={overlay}[{MOVED}];{blend}"
    ),
    _ => format!("[0:v][1:v]overlay={overlay}[{MOVED}];{blend}"),
  }
}

/// Convenience wrapper over [`render_filter_graph`] for a whole request.
pub fn build_filter_graph(request: &WatermarkRequest, scaled_width: Option<u32>) -> String {
  render_filter_graph(&request.placement, request.blend_mode, scaled_width)
}

/// The `-vf` chain used to pre-render a resized watermark.
///
/// Width becomes the source width. Height keeps the watermark's aspect ratio
/// (`a` is its width over height) and is then stretched by the inverse of the
/// source's sample aspect ratio, so the watermark looks undistorted once it is
/// laid on non-square source pixels.
///
/// ```rust
/// use watermarkbuddy::{filter::build_scale_filter, ffprobe::SampleAspectRatio};
///
/// assert_eq!(build_scale_filter(1920, SampleAspectRatio::SQUARE), "scale=w=1920:h=-1");
/// assert_eq!(
///   build_scale_filter(720, SampleAspectRatio::new(16, 15)),
///   "scale=w=720:h=trunc(ow/a*16/15)"
/// );
/// ```
pub fn build_scale_filter(width: u32, sar: SampleAspectRatio) -> String {
  if sar.is_square() {
    format!("scale=w={width}:h=-1")
  } else {
    format!("scale=w={width}:h=trunc(ow/a*{}/{})", sar.num, sar.den)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_overlay_templates() {
    let cases = [
      (Position::TopLeft, "x=3:y=7"),
      (Position::TopRight, "x=W-w-3:y=7"),
      (Position::BottomLeft, "x=3:y=H-h-7"),
      (Position::BottomRight, "x=W-w-3:y=H-h-7"),
    ];
    for (position, expected) in cases {
      assert_eq!(build_overlay_expression(position, 3, 7).to_string(), expected);
    }
  }

  #[test]
  fn test_offsets_substituted_verbatim() {
    let expr = build_overlay_expression(Position::BottomRight, -4, 120);
    assert_eq!(expr.x, "W-w--4");
    assert_eq!(expr.y, "H-h-120");
  }

  #[test]
  fn test_autoscale_graph_overlays_at_origin() {
    let graph = render_filter_graph(&Placement::Autoscale, BlendMode::Screen, Some(1280));
    assert_eq!(
      graph,
      "[1:v]scale=w=1280:h=-1[wm_scaled];[0:v][wm_scaled]overlay=x=0:y=0[wm_moved];[wm_moved][0:v]blend=all_mode=screen"
    );
  }

  #[test]
  fn test_autoscale_without_width_still_at_origin() {
    let graph = render_filter_graph(&Placement::Autoscale, BlendMode::Normal, None);
    assert!(graph.contains("overlay=x=0:y=0"));
    assert!(!graph.contains("scale="));
  }

  #[test]
  fn test_manual_placement_ignores_width() {
    let placement = Placement::Manual {
      position: Position::TopRight,
      offset_x: 5,
      offset_y: 10,
    };
    let graph = render_filter_graph(&placement, BlendMode::Multiply, Some(640));
    assert_eq!(
      graph,
      "[0:v][1:v]overlay=x=W-w-5:y=10[wm_moved];[wm_moved][0:v]blend=all_mode=multiply"
    );
  }
}
