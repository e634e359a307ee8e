//! One generate-then-draw pass, packaged for egui.

use bonsai_core::{
    draw::{self, DrawMode},
    rng::RandomSource,
    surface::{NrgbaImage, RgbaImage},
    tree::Canvas,
};

use crate::settings::Settings;

/// A rendered tree ready to upload as a texture.
pub struct Frame {
    pub image: egui::ColorImage,
    pub size: [u32; 2],
    pub branches: usize,
    pub painted: usize,
}

/// Grows a tree for a `size` pixel frame and paints it.
///
/// Line mode paints into a straight-alpha image, polygon mode into a
/// premultiplied one; each is handed to egui with the matching constructor.
pub fn render<R: RandomSource + ?Sized>(
    settings: &Settings,
    size: [u32; 2],
    rng: &mut R,
) -> Frame {
    let canvas = Canvas::generate(settings.tree_params(size), rng);
    let style = settings.style();
    let dims = [size[0] as usize, size[1] as usize];

    let (image, painted) = match style.mode {
        DrawMode::Line => {
            let mut img = NrgbaImage::new(dims[0], dims[1]);
            draw::draw_tree(&mut img, &canvas, &style, rng);
            let painted = img.painted();
            (
                egui::ColorImage::from_rgba_unmultiplied(dims, img.as_raw()),
                painted,
            )
        }
        DrawMode::Polygon => {
            let mut img = RgbaImage::new(dims[0], dims[1]);
            draw::draw_tree(&mut img, &canvas, &style, rng);
            let painted = img.painted();
            (
                egui::ColorImage::from_rgba_premultiplied(dims, img.as_raw()),
                painted,
            )
        }
    };

    log::debug!(
        "frame {}x{}: {} branches, {} pixels painted",
        size[0],
        size[1],
        canvas.branches.len(),
        painted
    );
    Frame {
        image,
        size,
        branches: canvas.branches.len(),
        painted,
    }
}
