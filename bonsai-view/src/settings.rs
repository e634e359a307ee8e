//! Command-line flags and the validated settings the viewer runs with.
//!
//! [`Args`] is what clap parses; [`Settings::from_args`] checks it once and
//! turns it into the [`TreeParams`] / [`Style`] pair the core consumes. The
//! side panel edits a [`Settings`] in place afterwards.

use bonsai_core::{
    color::{ColorPolicy, ParseColorError, Rgb},
    config::TreeParams,
    draw::{DrawMode, Style},
    leaves::LeafOptions,
};
use std::ops::RangeInclusive;

use clap::Parser;
use thiserror::Error;

/// Deepest tree the viewer accepts.
pub const MAX_DEPTH: u32 = 10;

/// Accepted auto-redraw intervals, in seconds.
pub const AUTO_RANGE: RangeInclusive<f64> = 0.1..=3600.0;

/// Draw a procedurally grown bonsai tree.
#[derive(Parser, Debug, Clone)]
#[command(name = "bonsai-view", version, about)]
pub struct Args {
    /// Number of branch generations below the trunk (0-10).
    #[arg(long, default_value_t = 6)]
    pub depth: u32,

    /// Multiplier on branch angles.
    #[arg(long, default_value_t = 1.0)]
    pub spread: f64,

    /// Trunk width, percent of the image width.
    #[arg(long, default_value_t = 7.0)]
    pub trunk_width: f64,

    /// Trunk height, percent of the image height.
    #[arg(long, default_value_t = 35.0)]
    pub trunk_height: f64,

    /// Trunk color as hex, with or without a leading '#'.
    #[arg(long, default_value = "654321")]
    pub color: String,

    /// Paint every branch in the trunk color.
    #[arg(long)]
    pub mono: bool,

    /// Random hue for every branch.
    #[arg(long)]
    pub rainbow: bool,

    /// Draw leaves on the outermost branches.
    #[arg(long)]
    pub leaves: bool,

    /// Leaf size multiplier.
    #[arg(long, default_value_t = 1.0)]
    pub leaf_size: f64,

    /// Leaves per qualifying branch, instead of the resolution default.
    #[arg(long)]
    pub leaf_density: Option<u32>,

    /// Draw 1px lines instead of tapered branches.
    #[arg(long)]
    pub lines: bool,

    /// Random seed; 0 picks a fresh one every run.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Grow a new tree every N seconds.
    #[arg(long, value_name = "SECONDS")]
    pub auto: Option<f64>,

    /// Fixed render width in pixels (defaults to the window size).
    #[arg(long)]
    pub width: Option<u32>,

    /// Fixed render height in pixels (defaults to the window size).
    #[arg(long)]
    pub height: Option<u32>,

    /// Render a single frame without opening a window, then exit.
    #[arg(long)]
    pub once: bool,
}

/// Reasons a set of flags is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("invalid --color: {0}")]
    Color(#[from] ParseColorError),
    #[error("--depth must be at most {max}, got {0}", max = MAX_DEPTH)]
    Depth(u32),
    #[error("--{flag} must be a positive number, got {value}")]
    NotPositive { flag: &'static str, value: f64 },
    #[error(
        "--auto must be between {min} and {max} seconds, got {0}",
        min = AUTO_RANGE.start(),
        max = AUTO_RANGE.end()
    )]
    AutoInterval(f64),
    #[error("--width and --height must both be positive")]
    EmptySize,
    #[error("--leaf-density must be at least 1")]
    ZeroDensity,
    #[error("--mono and --rainbow cannot be combined")]
    ConflictingPalette,
}

/// How branch colors relate to the base color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    /// Base color at the trunk, lighter towards the tips.
    #[default]
    Gradient,
    /// Base color everywhere.
    Mono,
    /// Ignore the base color, random hue per branch.
    Rainbow,
}

/// Everything the viewer needs to produce frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Shape parameters; the size is replaced per frame by the render size.
    pub tree: TreeParams,
    pub base_color: Rgb,
    pub palette: Palette,
    pub mode: DrawMode,
    pub leaves: LeafOptions,
    pub seed: u64,
    /// Seconds between automatic redraws.
    pub auto: Option<f64>,
    /// Fixed render resolution; `None` follows the window.
    pub fixed_size: Option<[u32; 2]>,
    pub once: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tree: TreeParams::default(),
            base_color: Rgb::BARK,
            palette: Palette::default(),
            mode: DrawMode::default(),
            leaves: LeafOptions::default(),
            seed: 0,
            auto: None,
            fixed_size: None,
            once: false,
        }
    }
}

fn positive(flag: &'static str, value: f64) -> Result<f64, SettingsError> {
    // Also rejects NaN.
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SettingsError::NotPositive { flag, value })
    }
}

impl Settings {
    /// Validates parsed flags.
    ///
    /// ### Errors
    /// The first [`SettingsError`] found; nothing is partially applied.
    pub fn from_args(args: &Args) -> Result<Self, SettingsError> {
        if args.depth > MAX_DEPTH {
            return Err(SettingsError::Depth(args.depth));
        }
        if args.mono && args.rainbow {
            return Err(SettingsError::ConflictingPalette);
        }
        if args.leaf_density == Some(0) {
            return Err(SettingsError::ZeroDensity);
        }
        if args.width == Some(0) || args.height == Some(0) {
            return Err(SettingsError::EmptySize);
        }

        let defaults = TreeParams::default();
        let fixed_size = match (args.width, args.height) {
            (None, None) => None,
            (w, h) => Some([w.unwrap_or(defaults.width), h.unwrap_or(defaults.height)]),
        };

        let tree = TreeParams {
            max_depth: args.depth,
            spread: positive("spread", args.spread)?,
            trunk_width_pct: positive("trunk-width", args.trunk_width)?,
            trunk_height_pct: positive("trunk-height", args.trunk_height)?,
            ..defaults
        };
        let leaves = LeafOptions {
            enabled: args.leaves,
            size: positive("leaf-size", args.leaf_size)?,
            density: args.leaf_density,
        };
        if let Some(interval) = args.auto
            && !AUTO_RANGE.contains(&interval)
        {
            return Err(SettingsError::AutoInterval(interval));
        }

        let palette = if args.mono {
            Palette::Mono
        } else if args.rainbow {
            Palette::Rainbow
        } else {
            Palette::Gradient
        };

        Ok(Self {
            tree,
            base_color: args.color.parse()?,
            palette,
            mode: if args.lines {
                DrawMode::Line
            } else {
                DrawMode::Polygon
            },
            leaves,
            seed: args.seed,
            auto: args.auto,
            fixed_size,
            once: args.once,
        })
    }

    pub fn color_policy(&self) -> ColorPolicy {
        match self.palette {
            Palette::Gradient => ColorPolicy::DepthGradient {
                base: self.base_color,
            },
            Palette::Mono => ColorPolicy::Fixed(self.base_color),
            Palette::Rainbow => ColorPolicy::RandomPerBranch,
        }
    }

    pub fn style(&self) -> Style {
        Style {
            mode: self.mode,
            colors: self.color_policy(),
            leaves: self.leaves,
        }
    }

    /// Tree parameters for a frame of `size` pixels.
    pub fn tree_params(&self, size: [u32; 2]) -> TreeParams {
        self.tree.with_size(size[0], size[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Result<Settings, SettingsError> {
        let args = Args::try_parse_from(std::iter::once("bonsai-view").chain(flags.iter().copied()))
            .expect("flags should parse");
        Settings::from_args(&args)
    }

    #[test]
    fn defaults_match_core_defaults() {
        let s = parse(&[]).expect("defaults are valid");
        assert_eq!(s.tree, TreeParams::default());
        assert_eq!(s.style(), Style::default());
        assert_eq!(s.seed, 0);
        assert_eq!(s.auto, None);
        assert_eq!(s.fixed_size, None);
        assert!(!s.once);
    }

    #[test]
    fn flags_map_onto_settings() {
        let s = parse(&[
            "--depth",
            "4",
            "--spread",
            "1.5",
            "--trunk-width",
            "10",
            "--trunk-height",
            "40",
            "--color",
            "#102030",
            "--mono",
            "--leaves",
            "--leaf-size",
            "2",
            "--leaf-density",
            "3",
            "--lines",
            "--seed",
            "99",
            "--auto",
            "2.5",
            "--width",
            "320",
            "--height",
            "200",
            "--once",
        ])
        .expect("valid flags");

        assert_eq!(s.tree.max_depth, 4);
        assert_eq!(s.tree.spread, 1.5);
        assert_eq!(s.tree.trunk_width_pct, 10.0);
        assert_eq!(s.tree.trunk_height_pct, 40.0);
        assert_eq!(s.color_policy(), ColorPolicy::Fixed(Rgb::new(0x10, 0x20, 0x30)));
        assert_eq!(s.mode, DrawMode::Line);
        assert_eq!(
            s.leaves,
            LeafOptions {
                enabled: true,
                size: 2.0,
                density: Some(3),
            }
        );
        assert_eq!(s.seed, 99);
        assert_eq!(s.auto, Some(2.5));
        assert_eq!(s.fixed_size, Some([320, 200]));
        assert!(s.once);
    }

    #[test]
    fn rainbow_ignores_base_color() {
        let s = parse(&["--rainbow", "--color", "ffffff"]).expect("valid flags");
        assert_eq!(s.color_policy(), ColorPolicy::RandomPerBranch);
    }

    #[test]
    fn one_fixed_dimension_fills_the_other_from_defaults() {
        let s = parse(&["--width", "640"]).expect("valid flags");
        assert_eq!(s.fixed_size, Some([640, 720]));
        assert_eq!(s.tree_params([640, 720]).width, 640);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(parse(&["--depth", "11"]), Err(SettingsError::Depth(11)));
        assert_eq!(
            parse(&["--mono", "--rainbow"]),
            Err(SettingsError::ConflictingPalette)
        );
        assert_eq!(
            parse(&["--leaf-density", "0"]),
            Err(SettingsError::ZeroDensity)
        );
        assert_eq!(parse(&["--width", "0"]), Err(SettingsError::EmptySize));
        assert_eq!(
            parse(&["--spread", "0"]),
            Err(SettingsError::NotPositive {
                flag: "spread",
                value: 0.0
            })
        );
        assert!(matches!(
            parse(&["--trunk-height=-5"]),
            Err(SettingsError::NotPositive {
                flag: "trunk-height",
                ..
            })
        ));
        assert_eq!(
            parse(&["--auto", "0"]),
            Err(SettingsError::AutoInterval(0.0))
        );
        assert!(matches!(
            parse(&["--color", "12345"]),
            Err(SettingsError::Color(_))
        ));
    }

    #[test]
    fn auto_interval_must_fit_the_panel_range() {
        let s = parse(&["--auto", "120"]).expect("two minutes is allowed");
        assert_eq!(s.auto, Some(120.0));
        assert_eq!(
            parse(&["--auto", "0.05"]),
            Err(SettingsError::AutoInterval(0.05))
        );
        assert_eq!(
            parse(&["--auto", "7200"]),
            Err(SettingsError::AutoInterval(7200.0))
        );
        assert!(matches!(
            parse(&["--auto", "NaN"]),
            Err(SettingsError::AutoInterval(v)) if v.is_nan()
        ));
    }

    #[test]
    fn max_depth_is_accepted() {
        let s = parse(&["--depth", "10"]).expect("depth 10 is allowed");
        assert_eq!(s.tree.max_depth, 10);
    }

    #[test]
    fn error_messages_name_the_flag() {
        let err = parse(&["--leaf-size=-1"]).expect_err("negative leaf size");
        assert!(err.to_string().contains("--leaf-size"), "{err}");
    }
}
