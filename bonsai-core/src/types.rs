use glam::DVec2;

/// A 2-D position on the canvas, in pixels.
///
/// The x axis grows to the right and the y axis grows **downwards**, so a
/// branch pointing "up" (angle `π/2`) has a decreasing y coordinate.
pub type Point = DVec2;

/// Identifier for a branch in a [`crate::tree::Canvas`].
///
/// This is an index into `Canvas::branches`, and is only meaningful within
/// the lifetime of a given `Canvas` instance.
pub type BranchId = usize;
