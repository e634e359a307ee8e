//! Branch and leaf colors.
//!
//! Colors are never stored on branches; the [`ColorPolicy`] is evaluated at
//! draw time from a branch's depth (and, for the random policies, the frame's
//! random source).

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::rng::RandomSource;

/// An opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Default trunk color, a dark brown.
    pub const BARK: Rgb = Rgb::new(0x65, 0x43, 0x21);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts an OKLCH color to sRGB, clipping out-of-gamut channels.
    ///
    /// ### Parameters
    /// - `l` - Perceptual lightness in `[0, 1]`.
    /// - `c` - Chroma; vivid sRGB colors stay below roughly `0.3`.
    /// - `hue_deg` - Hue angle in degrees.
    pub fn from_oklch(l: f64, c: f64, hue_deg: f64) -> Self {
        let h = hue_deg.to_radians();
        let (a, b) = (c * h.cos(), c * h.sin());

        let l_ = l + 0.396_337_777_4 * a + 0.215_803_757_3 * b;
        let m_ = l - 0.105_561_345_8 * a - 0.063_854_172_8 * b;
        let s_ = l - 0.089_484_177_5 * a - 1.291_485_548_0 * b;
        let (l3, m3, s3) = (l_ * l_ * l_, m_ * m_ * m_, s_ * s_ * s_);

        let r = 4.076_741_662_1 * l3 - 3.307_711_591_3 * m3 + 0.230_969_929_2 * s3;
        let g = -1.268_438_004_6 * l3 + 2.609_757_401_1 * m3 - 0.341_319_396_5 * s3;
        let b = -0.004_196_086_3 * l3 - 0.703_418_614_7 * m3 + 1.707_614_701_0 * s3;

        Self::new(encode_srgb(r), encode_srgb(g), encode_srgb(b))
    }
}

/// Linear light to a gamma-encoded 8-bit channel.
fn encode_srgb(linear: f64) -> u8 {
    let linear = linear.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseColorError {
    #[error("expected 6 hex digits, got {0}")]
    Length(usize),
    #[error("invalid hex digits in {0:?}")]
    Digit(String),
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parses `RRGGBB`, with or without a leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ParseColorError::Length(hex.len()));
        }
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .filter(|pair| pair.bytes().all(|b| b.is_ascii_hexdigit()))
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| ParseColorError::Digit(s.to_owned()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// How far towards white the deepest generation is pulled.
const GRADIENT_REACH: f64 = 0.75;

/// Rule for picking each branch's paint color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColorPolicy {
    /// Every branch in the same color.
    Fixed(Rgb),
    /// A vivid color with a random hue for each branch.
    RandomPerBranch,
    /// `base` at the trunk, lightening linearly towards white with depth.
    DepthGradient { base: Rgb },
}

impl Default for ColorPolicy {
    fn default() -> Self {
        ColorPolicy::DepthGradient { base: Rgb::BARK }
    }
}

impl ColorPolicy {
    /// Paint color for a branch at `depth` in a tree of `max_depth` generations.
    ///
    /// Only [`ColorPolicy::RandomPerBranch`] consumes a random draw.
    pub fn branch_color<R: RandomSource + ?Sized>(
        &self,
        depth: u32,
        max_depth: u32,
        rng: &mut R,
    ) -> Rgb {
        match *self {
            ColorPolicy::Fixed(rgb) => rgb,
            ColorPolicy::RandomPerBranch => random_hue(rng),
            ColorPolicy::DepthGradient { base } => depth_gradient(base, depth, max_depth),
        }
    }
}

/// Lightens `base` towards white as `depth` approaches `max_depth`.
///
/// Channels saturate at 255; depths past `max_depth` keep lightening but
/// never wrap.
pub fn depth_gradient(base: Rgb, depth: u32, max_depth: u32) -> Rgb {
    let t = f64::from(depth) / f64::from(max_depth.max(1)) * GRADIENT_REACH;
    let lighten = |c: u8| {
        let c = f64::from(c);
        (c + (255.0 - c) * t).round().clamp(0.0, 255.0) as u8
    };
    Rgb::new(lighten(base.r), lighten(base.g), lighten(base.b))
}

/// A vivid color at fixed lightness and chroma with a uniformly random hue.
pub fn random_hue<R: RandomSource + ?Sized>(rng: &mut R) -> Rgb {
    Rgb::from_oklch(0.7, 0.15, 360.0 * rng.float64())
}

/// A leaf green with small random variation in hue, lightness and chroma.
///
/// ### Random draws
/// Hue, lightness, chroma.
pub fn leaf_green<R: RandomSource + ?Sized>(rng: &mut R) -> Rgb {
    let hue = 135.0 + 30.0 * (rng.float64() - 0.5);
    let l = 0.55 + 0.15 * rng.float64();
    let c = 0.12 + 0.06 * rng.float64();
    Rgb::from_oklch(l, c, hue)
}
