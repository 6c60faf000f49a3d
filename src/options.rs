//! The closed vocabularies a caller may choose from.
//!
//! Both listings below are the exact sets [`crate::request::validate`] parses
//! against, so anything offered to a user is also accepted, and nothing else is.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// Corner of the source frame the watermark is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
  #[default]
  TopLeft,
  TopRight,
  BottomLeft,
  BottomRight,
}

impl Position {
  pub const ALL: [Position; 4] = [
    Position::TopLeft,
    Position::TopRight,
    Position::BottomLeft,
    Position::BottomRight,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Position::TopLeft => "top-left",
      Position::TopRight => "top-right",
      Position::BottomLeft => "bottom-left",
      Position::BottomRight => "bottom-right",
    }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Position {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Position::ALL
      .into_iter()
      .find(|p| p.as_str() == s)
      .ok_or_else(|| {
        Error::invalid_argument(format!(
          "Invalid position \"{s}\", expected one of: {}",
          positions().join(", ")
        ))
      })
  }
}

macro_rules! blend_modes {
  ($($variant:ident => $name:literal,)+) => {
    /// Pixel-combination function handed to ffmpeg's `blend` filter as
    /// `all_mode`.
    ///
    /// <https://ffmpeg.org/ffmpeg-filters.html#blend_002c-tblend>
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum BlendMode {
      $($variant,)+
    }

    impl BlendMode {
      pub const ALL: &'static [BlendMode] = &[$(BlendMode::$variant,)+];

      pub fn as_str(&self) -> &'static str {
        match self {
          $(BlendMode::$variant => $name,)+
        }
      }
    }
  };
}

blend_modes! {
  Addition => "addition",
  GrainMerge => "grainmerge",
  And => "and",
  Average => "average",
  Burn => "burn",
  Darken => "darken",
  Difference => "difference",
  GrainExtract => "grainextract",
  Divide => "divide",
  Dodge => "dodge",
  Freeze => "freeze",
  Exclusion => "exclusion",
  Extremity => "extremity",
  Glow => "glow",
  HardLight => "hardlight",
  HardMix => "hardmix",
  Heat => "heat",
  Lighten => "lighten",
  LinearLight => "linearlight",
  Multiply => "multiply",
  Multiply128 => "multiply128",
  Negation => "negation",
  Normal => "normal",
  Or => "or",
  Overlay => "overlay",
  Phoenix => "phoenix",
  PinLight => "pinlight",
  Reflect => "reflect",
  Screen => "screen",
  SoftLight => "softlight",
  Subtract => "subtract",
  VividLight => "vividlight",
  Xor => "xor",
}

impl Default for BlendMode {
  fn default() -> Self {
    BlendMode::Normal
  }
}

impl fmt::Display for BlendMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for BlendMode {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    BlendMode::ALL
      .iter()
      .copied()
      .find(|m| m.as_str() == s)
      .ok_or_else(|| Error::invalid_argument(format!("Invalid blend mode \"{s}\"")))
  }
}

/// Names of the supported watermark positions, in display order.
pub fn positions() -> Vec<&'static str> {
  Position::ALL.iter().map(Position::as_str).collect()
}

/// Names of the supported blend modes, in display order.
pub fn blend_modes() -> Vec<&'static str> {
  BlendMode::ALL.iter().map(BlendMode::as_str).collect()
}
