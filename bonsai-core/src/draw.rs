//! Paints a generated [`Canvas`] onto a [`Surface`].
//!
//! [`draw_tree`] dispatches once on the [`DrawMode`], paints every branch in
//! breadth-first order, then lays leaves on top.

use crate::{
    color::{ColorPolicy, Rgb},
    leaves::{self, LeafOptions},
    raster::{Rasterizer, draw_aa_line},
    rng::RandomSource,
    surface::Surface,
    tree::{Branch, Canvas},
    types::Point,
};

/// How branches are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// One anti-aliased 1px line per branch. Pair with a straight-alpha surface.
    Line,
    /// One filled, tapered trapezoid per branch. Pair with a premultiplied surface.
    #[default]
    Polygon,
}

/// Everything about a frame's look that is not tree geometry.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    pub mode: DrawMode,
    pub colors: ColorPolicy,
    pub leaves: LeafOptions,
}

/// Inclusive-exclusive pixel rectangle `[x0, x1) x [y0, y1)` on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl PixelRect {
    pub fn width(&self) -> usize {
        (self.x1 - self.x0) as usize
    }

    pub fn height(&self) -> usize {
        (self.y1 - self.y0) as usize
    }
}

/// Tight pixel bounds of `points` grown by a 1px anti-aliasing margin and
/// clamped to a `width x height` surface.
///
/// Returns `None` when nothing of the shape can land on the surface.
pub fn bounding_box(points: &[Point], width: usize, height: usize) -> Option<PixelRect> {
    let (mut min, mut max) = (Point::splat(f64::INFINITY), Point::splat(f64::NEG_INFINITY));
    for p in points {
        min = min.min(*p);
        max = max.max(*p);
    }

    let x0 = (min.x - 1.0).max(0.0);
    let y0 = (min.y - 1.0).max(0.0);
    let x1 = (max.x + 1.0).min(width as f64);
    let y1 = (max.y + 1.0).min(height as f64);
    // Also false for NaN geometry.
    if !(x0 < x1 && y0 < y1) {
        return None;
    }

    Some(PixelRect {
        x0: x0.floor() as i32,
        y0: y0.floor() as i32,
        x1: x1.ceil() as i32,
        y1: y1.ceil() as i32,
    })
}

/// The four corners of a branch's trapezoid, in drawing order.
///
/// The trunk's base edge is horizontal so it sits flat on the ground; all
/// other edges are perpendicular to the branch. Returns `None` for a
/// zero-length branch.
pub fn trapezoid(branch: &Branch) -> Option<[Point; 4]> {
    let perp = branch.perpendicular()?;
    let start_half = branch.start_width / 2.0;
    let end_half = branch.end_width / 2.0;

    let base = if branch.is_trunk() {
        Point::X
    } else {
        perp
    };
    Some([
        branch.start + base * start_half,
        branch.end + perp * end_half,
        branch.end - perp * end_half,
        branch.start - base * start_half,
    ])
}

/// Fills `points` with `color`, scoping the rasterizer to the shape's bounds.
pub(crate) fn fill_shape<S: Surface + ?Sized>(
    surface: &mut S,
    rast: &mut Rasterizer,
    points: &[Point],
    color: Rgb,
) {
    let Some(rect) = bounding_box(points, surface.width(), surface.height()) else {
        log::trace!("skipping off-surface shape");
        return;
    };
    rast.reset(rect.x0, rect.y0, rect.width(), rect.height());
    rast.fill_polygon(points);
    rast.composite(surface, color);
}

/// Draws one branch as a filled trapezoid.
pub fn draw_branch_polygon<S: Surface + ?Sized>(
    surface: &mut S,
    branch: &Branch,
    color: Rgb,
    rast: &mut Rasterizer,
) {
    if let Some(corners) = trapezoid(branch) {
        fill_shape(surface, rast, &corners, color);
    }
}

/// Draws one branch as a 1px anti-aliased line from start to end.
pub fn draw_branch_line<S: Surface + ?Sized>(surface: &mut S, branch: &Branch, color: Rgb) {
    if branch.perpendicular().is_none() {
        return;
    }
    draw_aa_line(surface, branch.start, branch.end, color);
}

/// Paints the whole tree, then its leaves, onto `surface`.
///
/// Nothing here can fail: degenerate or off-surface geometry is skipped.
///
/// ### Parameters
/// - `surface` - Caller-owned target; only written, never resized.
/// - `canvas` - The generated tree.
/// - `style` - Draw mode, color policy and leaf options.
/// - `rng` - Frame random source; consumed by random colors and leaves only.
pub fn draw_tree<S, R>(surface: &mut S, canvas: &Canvas, style: &Style, rng: &mut R)
where
    S: Surface + ?Sized,
    R: RandomSource + ?Sized,
{
    let max_depth = canvas.max_depth();
    let mut rast = Rasterizer::new();

    match style.mode {
        DrawMode::Line => {
            for b in &canvas.branches {
                let color = style.colors.branch_color(b.depth, max_depth, rng);
                draw_branch_line(surface, b, color);
            }
        }
        DrawMode::Polygon => {
            for b in &canvas.branches {
                let color = style.colors.branch_color(b.depth, max_depth, rng);
                draw_branch_polygon(surface, b, color, &mut rast);
            }
        }
    }

    if style.leaves.enabled {
        let width = surface.width() as u32;
        let placed = leaves::place_leaves(canvas, &style.leaves, width, rng);
        log::trace!("placing {} leaves", placed.len());
        for leaf in &placed {
            fill_shape(surface, &mut rast, &leaf.triangle(), leaf.color);
        }
    }
}
