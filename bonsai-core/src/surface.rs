//! Pixel sinks the rasterizer paints into.
//!
//! The core never owns the final image: callers allocate an [`NrgbaImage`]
//! (straight alpha, used by line mode) or an [`RgbaImage`] (premultiplied,
//! used by polygon mode so overlapping trapezoids composite cleanly), or
//! bring their own [`Surface`].

use std::marker::PhantomData;

use crate::color::Rgb;

/// Anything the rasterizer can paint into.
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Composites `color` over pixel `(x, y)` with opacity `coverage`.
    ///
    /// `coverage` is in `[0, 1]`. Out-of-bounds coordinates are ignored.
    fn blend(&mut self, x: i32, y: i32, color: Rgb, coverage: f32);
}

/// How an [`Image`] stores alpha and composites onto itself.
pub trait AlphaMode {
    /// Source-over of an opaque `color` at opacity `alpha` onto one RGBA pixel.
    fn over(dst: &mut [u8], color: Rgb, alpha: f32);
}

/// Color channels are independent of alpha.
#[derive(Clone, Copy, Debug)]
pub struct Straight;

/// Color channels are already multiplied by alpha.
#[derive(Clone, Copy, Debug)]
pub struct Premultiplied;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

impl AlphaMode for Straight {
    fn over(dst: &mut [u8], color: Rgb, alpha: f32) {
        let da = f32::from(dst[3]) / 255.0;
        let out_a = alpha + da * (1.0 - alpha);
        if out_a <= 0.0 {
            return;
        }
        let mix = |src: u8, dst: u8| {
            (f32::from(src) * alpha + f32::from(dst) * da * (1.0 - alpha)) / out_a
        };
        dst[0] = to_u8(mix(color.r, dst[0]));
        dst[1] = to_u8(mix(color.g, dst[1]));
        dst[2] = to_u8(mix(color.b, dst[2]));
        dst[3] = to_u8(out_a * 255.0);
    }
}

impl AlphaMode for Premultiplied {
    fn over(dst: &mut [u8], color: Rgb, alpha: f32) {
        let keep = 1.0 - alpha;
        let mix = |src: u8, dst: u8| f32::from(src) * alpha + f32::from(dst) * keep;
        dst[0] = to_u8(mix(color.r, dst[0]));
        dst[1] = to_u8(mix(color.g, dst[1]));
        dst[2] = to_u8(mix(color.b, dst[2]));
        dst[3] = to_u8(255.0 * alpha + f32::from(dst[3]) * keep);
    }
}

/// A width x height RGBA8 buffer, row-major, starting fully transparent.
#[derive(Clone, Debug)]
pub struct Image<A> {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    mode: PhantomData<A>,
}

/// Straight-alpha image, the line-mode target.
pub type NrgbaImage = Image<Straight>;
/// Premultiplied-alpha image, the polygon-mode target.
pub type RgbaImage = Image<Premultiplied>;

impl<A> Image<A> {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
            mode: PhantomData,
        }
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// The RGBA value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Alpha channel at `(x, y)`; `0` outside the image.
    pub fn alpha(&self, x: usize, y: usize) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    /// Number of pixels with non-zero alpha.
    pub fn painted(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|p| p[3] > 0).count()
    }
}

impl<A: AlphaMode> Surface for Image<A> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, color: Rgb, coverage: f32) {
        if x < 0 || y < 0 || coverage <= 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        A::over(&mut self.pixels[i..i + 4], color, coverage.min(1.0));
    }
}
