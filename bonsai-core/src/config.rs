/// Shape parameters for one generated tree.
///
/// The core assumes these have already been validated: positive sizes,
/// positive spread and percentages. Bad values produce degenerate output,
/// not errors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeParams {
    pub width: u32,
    pub height: u32,
    /// Number of generations below the trunk. `0` draws the trunk only.
    pub max_depth: u32,
    /// Multiplier on every branch angle offset; `1.0` is the natural shape.
    pub spread: f64,
    /// Trunk base width as a percentage of `width`.
    pub trunk_width_pct: f64,
    /// Trunk length as a percentage of `height`.
    pub trunk_height_pct: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            max_depth: 6,
            spread: 1.0,
            trunk_width_pct: 7.0,
            trunk_height_pct: 35.0,
        }
    }
}

impl TreeParams {
    /// Same parameters at a different resolution.
    pub fn with_size(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }
}
