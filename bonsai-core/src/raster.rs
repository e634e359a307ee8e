//! Anti-aliased scan conversion.
//!
//! Two primitives:
//! - [`Rasterizer`] fills closed polygons by accumulating signed area per
//!   pixel into a [`CoverageBuffer`], then composites the resulting coverage
//!   onto a [`Surface`].
//! - [`draw_aa_line`] draws a 1px Xiaolin Wu line straight onto a surface.
//!
//! Both use the convention that pixel `(i, j)` covers `[i, i+1) x [j, j+1)`,
//! so its centre is at `(i + 0.5, j + 0.5)`.

use crate::{color::Rgb, surface::Surface, types::Point};

/// Coverage below half an 8-bit step is invisible and never written.
pub const MIN_COVERAGE: f32 = 0.5 / 255.0;

/// Per-pixel accumulator of signed area contributions.
///
/// Every polygon edge deposits, for each row it crosses, the signed area it
/// adds to the pixels on and to the right of it. A running sum over the
/// buffer then yields each pixel's winding coverage.
///
/// Two slack cells after the last row absorb deposits made exactly on the
/// right-hand border.
#[derive(Debug, Default)]
pub struct CoverageBuffer {
    width: usize,
    height: usize,
    acc: Vec<f32>,
}

impl CoverageBuffer {
    /// Creates a zeroed buffer for a `width x height` window.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            acc: vec![0.0; width * height + 2],
        }
    }

    /// Makes the buffer cover a `width x height` window and clears it.
    ///
    /// The allocation is reused whenever it is already large enough.
    pub fn ensure_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.acc.resize(width * height + 2, 0.0);
        self.clear();
    }

    /// Resets every cell to zero.
    pub fn clear(&mut self) {
        self.acc.fill(0.0);
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn add(&mut self, index: usize, value: f32) {
        if let Some(cell) = self.acc.get_mut(index) {
            *cell += value;
        }
    }

    /// Iterates over `(x, y, coverage)` for every cell of the window.
    ///
    /// Coverage is the absolute running sum, clamped to `1.0`.
    pub fn coverage(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let width = self.width.max(1);
        self.acc[..self.width * self.height]
            .iter()
            .scan(0.0f32, |sum, &a| {
                *sum += a;
                Some(sum.abs().min(1.0))
            })
            .enumerate()
            .map(move |(i, c)| (i % width, i / width, c))
    }
}

/// Polygon filler reused across every branch and leaf of a frame.
///
/// Call [`Rasterizer::reset`] with the pixel window of the next shape, fill
/// it, then [`Rasterizer::composite`] the coverage onto the target surface.
#[derive(Debug, Default)]
pub struct Rasterizer {
    buf: CoverageBuffer,
    /// Surface coordinates of the window's top-left pixel.
    left: i32,
    top: i32,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Targets a `width x height` window whose top-left pixel sits at
    /// `(left, top)` on the surface, and clears previous coverage.
    pub fn reset(&mut self, left: i32, top: i32, width: usize, height: usize) {
        self.left = left;
        self.top = top;
        self.buf.ensure_size(width, height);
    }

    pub fn coverage(&self) -> &CoverageBuffer {
        &self.buf
    }

    /// Accumulates the closed polygon through `points` (surface coordinates).
    pub fn fill_polygon(&mut self, points: &[Point]) {
        let origin = Point::new(f64::from(self.left), f64::from(self.top));
        for (i, &p) in points.iter().enumerate() {
            let q = points[(i + 1) % points.len()];
            let (a, b) = (p - origin, q - origin);
            self.edge((a.x as f32, a.y as f32), (b.x as f32, b.y as f32));
        }
    }

    /// Deposits one polygon edge, in window coordinates.
    ///
    /// Each row's slice of the edge is split where it crosses `x = 0` or
    /// `x = width`. Pieces left of the window deposit their whole area on
    /// column 0, pieces right of it on the slack cell past the row end, which
    /// the running sum cancels at the start of the next row.
    fn edge(&mut self, from: (f32, f32), to: (f32, f32)) {
        if from.1 == to.1 {
            return;
        }
        let (dir, p0, p1) = if from.1 < to.1 {
            (1.0, from, to)
        } else {
            (-1.0, to, from)
        };
        let width = self.buf.width;
        let w = width as f32;
        let dxdy = (p1.0 - p0.0) / (p1.1 - p0.1);

        let mut x = p0.0;
        if p0.1 < 0.0 {
            x -= p0.1 * dxdy;
        }
        // Float to usize casts saturate: negative starts begin at row 0.
        let y_start = p0.1 as usize;
        let y_end = self.buf.height.min(p1.1.ceil() as usize);

        for y in y_start..y_end {
            let row = y * width;
            let dy = ((y + 1) as f32).min(p1.1) - (y as f32).max(p0.1);
            let xnext = x + dxdy * dy;
            let d = dy * dir;

            // Fractions of the row slice at which it crosses a window border.
            let mut cuts = [0.0f32; 4];
            let mut n = 1;
            for border in [0.0, w] {
                let t = (border - x) / (xnext - x);
                if t > 0.0 && t < 1.0 {
                    cuts[n] = t;
                    n += 1;
                }
            }
            cuts[n] = 1.0;
            cuts[..=n].sort_by(f32::total_cmp);

            for piece in cuts[..=n].windows(2) {
                let (t0, t1) = (piece[0], piece[1]);
                let pd = d * (t1 - t0);
                let xa = x + (xnext - x) * t0;
                let xb = x + (xnext - x) * t1;
                let mid = 0.5 * (xa + xb);
                if mid <= 0.0 {
                    self.buf.add(row, pd);
                } else if mid >= w {
                    self.buf.add(row + width, pd);
                } else {
                    self.span(row, xa.clamp(0.0, w), xb.clamp(0.0, w), pd);
                }
            }
            x = xnext;
        }
    }

    /// Deposits a row slice lying inside the window, from `xa` to `xb`,
    /// carrying signed height `d`.
    fn span(&mut self, row: usize, xa: f32, xb: f32, d: f32) {
        let (x0, x1) = if xa < xb { (xa, xb) } else { (xb, xa) };
        let x0floor = x0.floor();
        let x0i = x0floor as usize;
        let x1ceil = x1.ceil();
        let x1i = x1ceil as usize;

        if x1i <= x0i + 1 {
            // The slice stays within one pixel column.
            let xmf = 0.5 * (xa + xb) - x0floor;
            self.buf.add(row + x0i, d - d * xmf);
            self.buf.add(row + x0i + 1, d * xmf);
        } else {
            let s = (x1 - x0).recip();
            let x0f = x0 - x0floor;
            let a0 = 0.5 * s * (1.0 - x0f) * (1.0 - x0f);
            let x1f = x1 - x1ceil + 1.0;
            let am = 0.5 * s * x1f * x1f;

            self.buf.add(row + x0i, d * a0);
            if x1i == x0i + 2 {
                self.buf.add(row + x0i + 1, d * (1.0 - a0 - am));
            } else {
                let a1 = s * (1.5 - x0f);
                self.buf.add(row + x0i + 1, d * (a1 - a0));
                for xi in x0i + 2..x1i - 1 {
                    self.buf.add(row + xi, d * s);
                }
                let a2 = a1 + (x1i - x0i - 3) as f32 * s;
                self.buf.add(row + x1i - 1, d * (1.0 - a2 - am));
            }
            self.buf.add(row + x1i, d * am);
        }
    }

    /// Paints `color` onto `surface` wherever the accumulated coverage is visible.
    pub fn composite<S: Surface + ?Sized>(&self, surface: &mut S, color: Rgb) {
        for (x, y, coverage) in self.buf.coverage() {
            if coverage >= MIN_COVERAGE {
                surface.blend(self.left + x as i32, self.top + y as i32, color, coverage);
            }
        }
    }
}

#[inline]
fn fpart(v: f64) -> f64 {
    v - v.floor()
}

/// Draws a 1px anti-aliased line using Xiaolin Wu's algorithm.
///
/// Endpoints are in surface coordinates with sub-pixel precision. Pixels
/// outside the surface are skipped, and the walk along the major axis is
/// clipped to the surface so very long off-screen lines stay cheap.
pub fn draw_aa_line<S: Surface + ?Sized>(surface: &mut S, from: Point, to: Point, color: Rgb) {
    // Shift so pixel centres land on integers.
    let (mut x0, mut y0) = (from.x - 0.5, from.y - 0.5);
    let (mut x1, mut y1) = (to.x - 0.5, to.y - 0.5);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }
    let dx = x1 - x0;
    let gradient = if dx.abs() < 1e-9 { 1.0 } else { (y1 - y0) / dx };

    let (width, height) = (surface.width() as i32, surface.height() as i32);
    let mut plot = |major: i32, minor: i32, c: f64| {
        let c = c as f32;
        let (x, y) = if steep { (minor, major) } else { (major, minor) };
        if c < MIN_COVERAGE || x < 0 || y < 0 || x >= width || y >= height {
            return;
        }
        surface.blend(x, y, color, c);
    };

    // First endpoint.
    let xend = x0.round();
    let yend1 = y0 + gradient * (xend - x0);
    let xgap = 1.0 - fpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl = yend1.floor() as i32;
    plot(xpxl1, ypxl, (1.0 - fpart(yend1)) * xgap);
    plot(xpxl1, ypxl + 1, fpart(yend1) * xgap);

    // Second endpoint.
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl = yend.floor() as i32;
    plot(xpxl2, ypxl, (1.0 - fpart(yend)) * xgap);
    plot(xpxl2, ypxl + 1, fpart(yend) * xgap);

    // Body, clipped to the surface along the major axis.
    let first = (xpxl1 + 1).max(-1);
    let major_len = if steep { height } else { width };
    let last = xpxl2.min(major_len + 1);
    for x in first..last {
        let intery = yend1 + gradient * f64::from(x - xpxl1);
        let ipart = intery.floor() as i32;
        let f = fpart(intery);
        plot(x, ipart, 1.0 - f);
        plot(x, ipart + 1, f);
    }
}
