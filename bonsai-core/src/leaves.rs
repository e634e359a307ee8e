//! Leaf decoration on the outermost generations.
//!
//! Leaves go on branches in the last two generations only, scaled to the
//! output resolution, and are always drawn after every branch.

use std::f64::consts::TAU;

use crate::{
    color::{self, Rgb},
    rng::RandomSource,
    tree::{Branch, Canvas},
    types::Point,
};

/// Below this surface width leaves shrink and thin out.
pub const SMALL_WIDTH: u32 = 200;
/// From this surface width up leaves grow and multiply.
pub const LARGE_WIDTH: u32 = 800;

/// User-facing leaf settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafOptions {
    pub enabled: bool,
    /// Size multiplier on top of the automatic scale.
    pub size: f64,
    /// Leaves per qualifying branch, replacing the automatic counts.
    pub density: Option<u32>,
}

impl Default for LeafOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            size: 1.0,
            density: None,
        }
    }
}

/// Leaf counts and scale for one surface resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafLayout {
    pub scale: f64,
    /// Leaves on each branch of the second-to-last generation.
    pub inner: u32,
    /// Leaves on each branch of the last generation.
    pub outer: u32,
    /// Chance that an outer branch gets its leaves at all.
    pub outer_chance: f64,
}

impl LeafLayout {
    pub fn for_width(width: u32, options: &LeafOptions) -> Self {
        let mut layout = if width < SMALL_WIDTH {
            Self {
                scale: 0.6,
                inner: 1,
                outer: 1,
                outer_chance: 0.5,
            }
        } else if width < LARGE_WIDTH {
            Self {
                scale: 1.0,
                inner: 2,
                outer: 4,
                outer_chance: 1.0,
            }
        } else {
            Self {
                scale: 1.5,
                inner: 3,
                outer: 6,
                outer_chance: 1.0,
            }
        };
        if let Some(n) = options.density {
            layout.inner = n;
            layout.outer = n;
            layout.outer_chance = 1.0;
        }
        layout
    }
}

/// Whether a branch at `depth` carries leaves in a tree of `max_depth`.
///
/// Leaves need `depth >= max_depth - 1` and are never put on the trunk, so a
/// trunk-only tree stays bare whatever the leaf settings.
pub fn qualifies(depth: u32, max_depth: u32) -> bool {
    depth >= 1 && depth + 1 >= max_depth
}

/// One leaf triangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leaf {
    pub center: Point,
    /// Direction the tip points to, radians.
    pub angle: f64,
    pub size: f64,
    pub color: Rgb,
    /// Depth of the branch it hangs on.
    pub depth: u32,
}

impl Leaf {
    /// Tip first, then the two base corners.
    pub fn triangle(&self) -> [Point; 3] {
        let corner = |angle: f64, r: f64| {
            self.center + Point::new(angle.cos(), -angle.sin()) * (self.size * r)
        };
        [
            corner(self.angle, 1.0),
            corner(self.angle + 2.5, 0.6),
            corner(self.angle - 2.5, 0.6),
        ]
    }
}

/// Size factor in `[0.85, 1.15)` derived from a position.
///
/// Keeps leaf sizes varied without drawing from the random source.
pub fn position_jitter(p: Point) -> f64 {
    let h = (p.x * 12.9898 + p.y * 78.233).sin() * 43_758.545_3;
    0.85 + 0.3 * (h - h.floor())
}

/// Places every leaf of the frame.
///
/// ### Parameters
/// - `canvas` - The generated tree; branches are visited in order.
/// - `options` - Size multiplier and optional density override.
/// - `surface_width` - Output width in pixels, drives [`LeafLayout::for_width`].
/// - `rng` - Frame random source.
///
/// ### Returns
/// Leaves in drawing order.
pub fn place_leaves<R: RandomSource + ?Sized>(
    canvas: &Canvas,
    options: &LeafOptions,
    surface_width: u32,
    rng: &mut R,
) -> Vec<Leaf> {
    let max_depth = canvas.max_depth();
    let layout = LeafLayout::for_width(surface_width, options);
    let mut leaves = Vec::new();

    for b in canvas
        .branches
        .iter()
        .filter(|b| qualifies(b.depth, max_depth))
    {
        let outer = b.depth >= max_depth;
        let count = if !outer {
            layout.inner
        } else if layout.outer_chance >= 1.0 || rng.float64() < layout.outer_chance {
            layout.outer
        } else {
            0
        };
        for _ in 0..count {
            leaves.push(place_leaf(b, outer, layout.scale * options.size, rng));
        }
    }
    leaves
}

/// One leaf near the far end of `branch`.
///
/// ### Random draws
/// Position along the branch, sideways scatter, angle, then three for the color.
fn place_leaf<R: RandomSource + ?Sized>(
    branch: &Branch,
    outer: bool,
    scale: f64,
    rng: &mut R,
) -> Leaf {
    let reach = if outer { 0.3 } else { 0.6 };
    let along = branch.point_at(1.0 - reach * rng.float64());
    let base_size = (2.0 + 1.5 * branch.end_width) * scale;

    let normal = branch.perpendicular().unwrap_or(Point::ZERO);
    let scatter = (rng.float64() - 0.5) * (branch.end_width + base_size);
    let center = along + normal * scatter;

    let angle = TAU * rng.float64();
    let size = base_size * position_jitter(center);
    Leaf {
        center,
        angle,
        size,
        color: color::leaf_green(rng),
        depth: branch.depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::TreeParams, rng::seeded};

    fn canvas(max_depth: u32, seed: u64) -> Canvas {
        let params = TreeParams {
            width: 400,
            height: 400,
            max_depth,
            ..TreeParams::default()
        };
        Canvas::generate(params, &mut seeded(seed))
    }

    fn enabled() -> LeafOptions {
        LeafOptions {
            enabled: true,
            ..LeafOptions::default()
        }
    }

    #[test]
    fn qualification_boundaries() {
        // Trunk-only trees never get leaves.
        assert!(!qualifies(0, 0));
        // Max depth 1: the single child generation qualifies, the trunk does not.
        assert!(!qualifies(0, 1));
        assert!(qualifies(1, 1));
        // Max depth 2: both generations below the trunk qualify.
        assert!(!qualifies(0, 2));
        assert!(qualifies(1, 2));
        assert!(qualifies(2, 2));
        // Deeper trees: only the last two generations.
        assert!(!qualifies(3, 6));
        assert!(qualifies(5, 6));
        assert!(qualifies(6, 6));
    }

    #[test]
    fn trunk_only_tree_has_no_leaves() {
        let c = canvas(0, 1);
        assert!(place_leaves(&c, &enabled(), 400, &mut seeded(1)).is_empty());
    }

    #[test]
    fn leaves_only_on_the_last_two_generations() {
        for max_depth in 2..=6 {
            let c = canvas(max_depth, 10 + u64::from(max_depth));
            let leaves = place_leaves(&c, &enabled(), 400, &mut seeded(3));
            assert!(!leaves.is_empty(), "depth {max_depth} tree should have leaves");
            assert!(leaves.iter().all(|l| l.depth + 1 >= max_depth && l.depth >= 1));
        }
    }

    #[test]
    fn layout_scales_with_resolution() {
        let opts = enabled();
        let small = LeafLayout::for_width(120, &opts);
        let medium = LeafLayout::for_width(400, &opts);
        let large = LeafLayout::for_width(1280, &opts);

        assert!(small.scale < medium.scale && medium.scale < large.scale);
        assert_eq!((small.inner, small.outer), (1, 1));
        assert!(small.outer_chance < 1.0);
        assert!(large.outer > medium.outer);
    }

    #[test]
    fn density_override_replaces_counts() {
        let opts = LeafOptions {
            density: Some(5),
            ..enabled()
        };
        for width in [50, 400, 2000] {
            let layout = LeafLayout::for_width(width, &opts);
            assert_eq!((layout.inner, layout.outer), (5, 5));
            assert_eq!(layout.outer_chance, 1.0);
        }

        let c = canvas(1, 4);
        let qualifying = c.branches.iter().filter(|b| qualifies(b.depth, 1)).count();
        let leaves = place_leaves(&c, &opts, 400, &mut seeded(4));
        assert_eq!(leaves.len(), qualifying * 5);
    }

    #[test]
    fn leaves_cluster_near_branch_tips() {
        let c = canvas(3, 6);
        let leaves = place_leaves(&c, &enabled(), 400, &mut seeded(6));
        let deepest: Vec<&Branch> = c.branches.iter().filter(|b| b.depth == 3).collect();
        for leaf in leaves.iter().filter(|l| l.depth == 3) {
            let near = deepest.iter().any(|b| {
                let along = (leaf.center - b.start).dot(b.direction());
                along >= 0.7 * b.length - 1e-9 && along <= b.length + 1e-9
            });
            assert!(near, "leaf {leaf:?} not near any tip");
        }
    }

    #[test]
    fn jitter_is_deterministic_and_bounded() {
        let p = Point::new(12.5, 40.25);
        assert_eq!(position_jitter(p), position_jitter(p));
        for i in 0..200 {
            let j = position_jitter(Point::new(f64::from(i) * 1.7, f64::from(i) * 0.3));
            assert!((0.85..1.15).contains(&j));
        }
    }

    #[test]
    fn triangle_tip_points_along_angle() {
        let leaf = Leaf {
            center: Point::new(10.0, 10.0),
            angle: 0.0,
            size: 4.0,
            color: Rgb::WHITE,
            depth: 3,
        };
        let [tip, a, b] = leaf.triangle();
        assert!((tip - Point::new(14.0, 10.0)).length() < 1e-9);
        assert!(a.x < 10.0 && b.x < 10.0);
    }
}
