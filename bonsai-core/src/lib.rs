//! Procedural bonsai generation and software rasterization.
//!
//! Main components:
//! - [`growth`] - breadth-first branch synthesis from a trunk.
//! - [`tree`] - branches and the [`tree::Canvas`] that holds one generated tree.
//! - [`config`] - shape parameters for a tree.
//! - [`draw`] - paints a canvas in line or polygon mode.
//! - [`raster`] - coverage-based polygon filling and anti-aliased lines.
//! - [`leaves`] - leaf placement on the outermost generations.
//! - [`color`] - color policies, depth gradients and OKLCH conversion.
//! - [`surface`] - pixel sinks the rasterizer writes into.
//! - [`rng`] - the random source threaded through a frame.
//! - [`types`] - shared type aliases and IDs.
//!
//! A frame is one generate-then-draw pass:
//!
//! ```
//! use bonsai_core::{config::TreeParams, draw, rng, surface::RgbaImage, tree::Canvas};
//!
//! let params = TreeParams { width: 160, height: 120, ..TreeParams::default() };
//! let mut rng = rng::seeded(42);
//! let canvas = Canvas::generate(params, &mut rng);
//! let mut img = RgbaImage::new(160, 120);
//! draw::draw_tree(&mut img, &canvas, &draw::Style::default(), &mut rng);
//! assert!(img.painted() > 0);
//! ```

pub mod color;
pub mod config;
pub mod draw;
pub mod growth;
pub mod leaves;
pub mod raster;
pub mod rng;
pub mod surface;
pub mod tree;
pub mod types;
