//! Breadth-first branch synthesis.
//!
//! A tree grows from the trunk outwards:
//! 1. [`trunk`] places the root at the bottom centre of the canvas.
//! 2. [`grow`] pops `(branch, remaining depth)` pairs from a FIFO queue and
//!    asks [`spawn_children`] for up to three children per branch.
//! 3. Children are appended to the canvas immediately, so every branch of a
//!    generation precedes every branch of the next one.

use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, FRAC_PI_8, PI};

use crate::{
    config::TreeParams,
    rng::RandomSource,
    tree::{Branch, BranchKind, Canvas},
    types::{BranchId, Point},
};

/// Branches shorter than this never get children.
pub const MIN_BRANCH_LENGTH: f64 = 2.0;

/// Total range of the random trunk lean, in radians.
const TRUNK_JITTER: f64 = 0.2;
/// Small per-child angle noise, before the spread multiplier.
const WIGGLE: f64 = PI / 40.0;

/// Builds the trunk for `params`.
///
/// The trunk starts on the bottom edge at the horizontal centre (with a
/// half-pixel offset so it is symmetric on even widths), leans up to
/// `±TRUNK_JITTER / 2` away from vertical and tapers by 10–20 %.
///
/// ### Random draws
/// Angle, start width, end width; in that order.
pub fn trunk<R: RandomSource + ?Sized>(params: &TreeParams, rng: &mut R) -> Branch {
    let width = f64::from(params.width);
    let height = f64::from(params.height);

    let start = Point::new(width / 2.0 - 0.5, height);
    let angle = FRAC_PI_2 + TRUNK_JITTER * (rng.float64() - 0.5);
    let length = height * params.trunk_height_pct / 100.0;

    let base = width * params.trunk_width_pct / 100.0;
    let start_width = base * (0.9 + 0.2 * rng.float64());
    let end_width = start_width * (0.8 + 0.1 * rng.float64());

    Branch::new(
        start,
        angle,
        length,
        (start_width, end_width),
        0,
        BranchKind::Trunk,
    )
}

/// Grows the whole tree into `canvas`, which must be empty.
///
/// Uses a work queue of `(branch id, remaining depth)` pairs seeded with the
/// trunk and `params.max_depth`. Each popped branch contributes its children
/// to both the canvas and the back of the queue.
pub fn grow<R: RandomSource + ?Sized>(canvas: &mut Canvas, rng: &mut R) {
    let params = canvas.params;
    let root = canvas.push(trunk(&params, rng));

    let mut queue: VecDeque<(BranchId, u32)> = VecDeque::with_capacity(32);
    queue.push_back((root, params.max_depth));

    while let Some((id, remaining)) = queue.pop_front() {
        let parent = canvas.branches[id];
        for child in spawn_children(&parent, remaining, params.spread, rng) {
            let child_id = canvas.push(child);
            queue.push_back((child_id, remaining - 1));
        }
    }
}

/// Proposes the children of `parent`.
///
/// Left and right children always come as a pair from the parent's end; a
/// mid child is added only when at least one more generation will follow
/// it, so it never ends up as a bare stub.
///
/// ### Parameters
/// - `parent` - The branch to grow from; passed by value-copy, no back reference is kept.
/// - `remaining` - Generations still allowed below `parent`.
/// - `spread` - Multiplier on all angle offsets.
/// - `rng` - Random source shared with the rest of the frame.
///
/// ### Returns
/// Zero to three branches, in the order left, right, mid.
pub fn spawn_children<R: RandomSource + ?Sized>(
    parent: &Branch,
    remaining: u32,
    spread: f64,
    rng: &mut R,
) -> Vec<Branch> {
    let mut children = Vec::with_capacity(3);
    if remaining == 0 || parent.length < MIN_BRANCH_LENGTH {
        return children;
    }

    children.push(terminal_child(parent, BranchKind::Left, spread, rng));
    children.push(terminal_child(parent, BranchKind::Right, spread, rng));
    // At least one generation must follow the mid child.
    if remaining >= 2 {
        children.push(mid_child(parent, spread, rng));
    }
    children
}

/// Length and widths shared by every kind of child.
///
/// ### Random draws
/// Length factor, start width factor, end width factor.
fn child_dimensions<R: RandomSource + ?Sized>(parent: &Branch, rng: &mut R) -> (f64, f64, f64) {
    let length = parent.length * (0.4 + 0.5 * rng.float64());
    let start_width = parent.end_width * (0.6 + 0.2 * rng.float64());
    let end_width = start_width * (0.6 + 0.2 * rng.float64());
    (length, start_width, end_width)
}

#[inline]
fn wiggle<R: RandomSource + ?Sized>(spread: f64, rng: &mut R) -> f64 {
    spread * WIGGLE * (2.0 * rng.float64() - 1.0)
}

/// A left or right child sprouting from the parent's end.
///
/// The start point is pulled back into the parent by `0.6 * start_width`
/// and slid sideways by half the width difference, so the child's outer
/// edge lines up with the parent's tapered tip.
fn terminal_child<R: RandomSource + ?Sized>(
    parent: &Branch,
    kind: BranchKind,
    spread: f64,
    rng: &mut R,
) -> Branch {
    let (length, start_width, end_width) = child_dimensions(parent, rng);
    let side = if kind == BranchKind::Left { 1.0 } else { -1.0 };
    let angle = parent.angle + side * spread * FRAC_PI_6 + wiggle(spread, rng);

    let dir = parent.direction();
    // Left of travel on screen (y down).
    let normal = Point::new(dir.y, -dir.x);
    let start = parent.end - dir * (0.6 * start_width)
        + normal * (side * (parent.end_width - start_width) / 2.0);

    Branch::new(
        start,
        angle,
        length,
        (start_width, end_width),
        parent.depth + 1,
        kind,
    )
}

/// A child sprouting from 30–60 % along the parent, turned either way.
fn mid_child<R: RandomSource + ?Sized>(parent: &Branch, spread: f64, rng: &mut R) -> Branch {
    let (length, start_width, end_width) = child_dimensions(parent, rng);
    let start = parent.point_at(0.3 + 0.3 * rng.float64());
    let side = if rng.float64() < 0.5 { -1.0 } else { 1.0 };
    let angle = parent.angle + side * spread * FRAC_PI_8 + wiggle(spread, rng);

    Branch::new(
        start,
        angle,
        length,
        (start_width, end_width),
        parent.depth + 1,
        BranchKind::Mid,
    )
}
