use crate::{
    config::TreeParams,
    growth,
    rng::RandomSource,
    types::{BranchId, Point},
};

/// Where a branch sits relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchKind {
    /// The root. Its base is drawn flat so it sits flush on the ground.
    Trunk,
    /// Sprouts from the parent's end, turned counter-clockwise.
    Left,
    /// Sprouts from the parent's end, turned clockwise.
    Right,
    /// Sprouts from an interior point of the parent.
    Mid,
}

/// One tapered limb of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub start: Point,
    pub end: Point,
    /// Radians from the horizontal, counter-clockwise as seen on screen.
    pub angle: f64,
    pub length: f64,
    pub start_width: f64,
    pub end_width: f64,
    /// Generation distance from the trunk (trunk = 0).
    pub depth: u32,
    pub kind: BranchKind,
}

impl Branch {
    /// Creates a branch and derives its `end` from `start`, `angle` and `length`.
    pub fn new(
        start: Point,
        angle: f64,
        length: f64,
        widths: (f64, f64),
        depth: u32,
        kind: BranchKind,
    ) -> Self {
        let mut b = Self {
            start,
            end: start,
            angle,
            length,
            start_width: widths.0,
            end_width: widths.1,
            depth,
            kind,
        };
        b.end = b.point_at(1.0);
        b
    }

    /// Unit vector pointing along the branch angle, in screen space.
    #[inline]
    pub fn direction(&self) -> Point {
        Point::new(self.angle.cos(), -self.angle.sin())
    }

    /// Point at fraction `t` of the branch length, measured from `start`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        self.start + self.direction() * (self.length * t)
    }

    /// Unit vector perpendicular to the segment `start -> end`.
    ///
    /// Returns `None` for a zero-length segment.
    pub fn perpendicular(&self) -> Option<Point> {
        (self.end - self.start).try_normalize().map(|d| d.perp())
    }

    #[inline]
    pub fn is_trunk(&self) -> bool {
        self.kind == BranchKind::Trunk
    }
}

/// One generated tree: its parameters and the branches, in breadth-first order.
///
/// `branches[0]` is the trunk, and every branch of depth `d` precedes every
/// branch of depth `d + 1`.
#[derive(Clone, Debug)]
pub struct Canvas {
    pub params: TreeParams,
    pub branches: Vec<Branch>,
}

impl Canvas {
    /// Generates a complete tree for `params`, drawing all randomness from `rng`.
    pub fn generate<R: RandomSource + ?Sized>(params: TreeParams, rng: &mut R) -> Self {
        let mut canvas = Self {
            params,
            branches: Vec::with_capacity(64),
        };
        growth::grow(&mut canvas, rng);
        log::debug!(
            "generated {} branches on a {}x{} canvas (max depth {})",
            canvas.branches.len(),
            params.width,
            params.height,
            params.max_depth
        );
        canvas
    }

    /// Appends a branch and returns its id.
    pub fn push(&mut self, branch: Branch) -> BranchId {
        let id = self.branches.len();
        self.branches.push(branch);
        id
    }

    pub fn trunk(&self) -> Option<&Branch> {
        self.branches.first()
    }

    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.params.max_depth
    }

    /// Deepest generation actually present; can be less than `max_depth`
    /// when every lineage ran below the minimum branch length.
    pub fn deepest(&self) -> u32 {
        self.branches.last().map_or(0, |b| b.depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn vertical(length: f64) -> Branch {
        Branch::new(
            Point::new(10.0, 100.0),
            FRAC_PI_2,
            length,
            (4.0, 3.0),
            0,
            BranchKind::Trunk,
        )
    }

    #[test]
    fn new_derives_end_from_angle_and_length() {
        let b = vertical(40.0);
        assert!((b.end.x - 10.0).abs() < 1e-9);
        assert!((b.end.y - 60.0).abs() < 1e-9, "up means decreasing y");
    }

    #[test]
    fn point_at_interpolates_along_the_branch() {
        let b = vertical(40.0);
        let mid = b.point_at(0.5);
        assert!((mid.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_is_unit_and_orthogonal() {
        let b = Branch::new(
            Point::new(0.0, 0.0),
            0.3,
            10.0,
            (2.0, 1.0),
            1,
            BranchKind::Left,
        );
        let perp = b.perpendicular().expect("non-degenerate branch");
        assert!((perp.length() - 1.0).abs() < 1e-9);
        assert!(perp.dot(b.end - b.start).abs() < 1e-9);
    }

    #[test]
    fn perpendicular_of_zero_length_branch_is_none() {
        assert!(vertical(0.0).perpendicular().is_none());
    }

    #[test]
    fn push_returns_sequential_ids() {
        let mut canvas = Canvas {
            params: TreeParams::default(),
            branches: Vec::new(),
        };
        assert_eq!(canvas.push(vertical(1.0)), 0);
        assert_eq!(canvas.push(vertical(2.0)), 1);
        assert_eq!(canvas.trunk().map(|b| b.length), Some(1.0));
    }
}
