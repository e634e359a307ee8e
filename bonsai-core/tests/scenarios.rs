//! End-to-end generate-then-draw scenarios.

use bonsai_core::{
    color::{ColorPolicy, Rgb},
    config::TreeParams,
    draw::{self, DrawMode, Style},
    leaves::LeafOptions,
    raster::Rasterizer,
    rng::seeded,
    surface::{NrgbaImage, RgbaImage, Surface},
    tree::{Branch, BranchKind, Canvas},
    types::Point,
};

fn params(width: u32, height: u32, max_depth: u32) -> TreeParams {
    TreeParams {
        width,
        height,
        max_depth,
        spread: 1.0,
        ..TreeParams::default()
    }
}

#[test]
fn trunk_only_tree_matches_expected_geometry() {
    let p = TreeParams {
        trunk_height_pct: 40.0,
        ..params(100, 60, 0)
    };
    let canvas = Canvas::generate(p, &mut seeded(7));

    assert_eq!(canvas.branches.len(), 1);
    let trunk = &canvas.branches[0];
    assert_eq!(trunk.kind, BranchKind::Trunk);
    assert_eq!(trunk.start, Point::new(49.5, 60.0));
    assert!((trunk.length - 24.0).abs() < 1e-9);
}

#[test]
fn same_seed_reproduces_the_tree_bit_for_bit() {
    let p = params(200, 200, 4);
    let a = Canvas::generate(p, &mut seeded(42));
    let b = Canvas::generate(p, &mut seeded(42));

    assert_eq!(a.branches.len(), b.branches.len());
    for (x, y) in a.branches.iter().zip(&b.branches) {
        assert_eq!(x.start.x.to_bits(), y.start.x.to_bits());
        assert_eq!(x.start.y.to_bits(), y.start.y.to_bits());
        assert_eq!(x.end.x.to_bits(), y.end.x.to_bits());
        assert_eq!(x.end.y.to_bits(), y.end.y.to_bits());
        assert_eq!(x.angle.to_bits(), y.angle.to_bits());
        assert_eq!(x.start_width.to_bits(), y.start_width.to_bits());
        assert_eq!(x.end_width.to_bits(), y.end_width.to_bits());
        assert_eq!(x.depth, y.depth);
        assert_eq!(x.kind, y.kind);
    }
}

#[test]
fn different_seeds_give_different_trees() {
    let p = params(200, 200, 4);
    let a = Canvas::generate(p, &mut seeded(1));
    let b = Canvas::generate(p, &mut seeded(2));
    assert_ne!(a.branches, b.branches);
}

#[test]
fn depth_stays_within_bounds() {
    for max_depth in 0..=8 {
        let canvas = Canvas::generate(params(300, 300, max_depth), &mut seeded(99));
        assert!(canvas.branches.iter().all(|b| b.depth <= max_depth));
        assert_eq!(
            canvas.branches.iter().filter(|b| b.depth == 0).count(),
            1,
            "exactly one trunk"
        );
        assert!(canvas.deepest() <= max_depth);
    }
}

#[test]
fn widths_taper_from_parent_to_child() {
    let canvas = Canvas::generate(params(400, 400, 6), &mut seeded(5));
    for b in &canvas.branches {
        assert!(b.end_width <= b.start_width, "branch widens: {b:?}");
    }
    // Every child starts no wider than the widest tip of the previous generation.
    for depth in 1..=6 {
        let parent_max_end = canvas
            .branches
            .iter()
            .filter(|b| b.depth == depth - 1)
            .map(|b| b.end_width)
            .fold(0.0, f64::max);
        for child in canvas.branches.iter().filter(|b| b.depth == depth) {
            assert!(child.start_width <= parent_max_end);
        }
    }
}

#[test]
fn breadth_first_order_groups_generations() {
    let canvas = Canvas::generate(params(400, 400, 6), &mut seeded(17));
    let depths: Vec<u32> = canvas.branches.iter().map(|b| b.depth).collect();
    let mut sorted = depths.clone();
    sorted.sort_unstable();
    assert_eq!(depths, sorted);
}

#[test]
fn line_mode_stays_inside_polygon_mode() {
    let p = params(200, 200, 4);
    let canvas = Canvas::generate(p, &mut seeded(3));
    let style = Style {
        colors: ColorPolicy::Fixed(Rgb::WHITE),
        ..Style::default()
    };

    let mut poly = RgbaImage::new(200, 200);
    draw::draw_tree(&mut poly, &canvas, &style, &mut seeded(3));

    let line_style = Style {
        mode: DrawMode::Line,
        ..style
    };
    let mut lines = NrgbaImage::new(200, 200);
    draw::draw_tree(&mut lines, &canvas, &line_style, &mut seeded(3));
    assert!(lines.painted() > 0);
    assert!(poly.painted() > lines.painted());

    // Branch by branch, so overlapping fringes at joints do not add up.
    for (i, b) in canvas.branches.iter().enumerate() {
        let mut line = NrgbaImage::new(200, 200);
        draw::draw_branch_line(&mut line, b, Rgb::WHITE);
        for y in 0..200 {
            for x in 0..200 {
                // Ignore the anti-aliasing fringe of the line.
                if line.alpha(x, y) >= 200 {
                    assert!(
                        poly.alpha(x, y) > 0,
                        "branch {i}: line pixel ({x},{y}) outside polygons"
                    );
                }
            }
        }
    }
}

#[test]
fn offscreen_branch_writes_nothing() {
    let branch = Branch::new(
        Point::new(-60.0, 20.0),
        0.3,
        30.0,
        (8.0, 6.0),
        1,
        BranchKind::Left,
    );
    let mut img = RgbaImage::new(50, 50);
    let mut rast = Rasterizer::new();
    draw::draw_branch_polygon(&mut img, &branch, Rgb::WHITE, &mut rast);
    draw::draw_branch_line(&mut img, &branch, Rgb::WHITE);
    assert_eq!(img.painted(), 0);
}

#[test]
fn leaves_need_more_than_a_trunk() {
    let style = Style {
        leaves: LeafOptions {
            enabled: true,
            ..LeafOptions::default()
        },
        ..Style::default()
    };

    let bare = Canvas::generate(params(100, 100, 0), &mut seeded(8));
    let mut with_leaves = RgbaImage::new(100, 100);
    draw::draw_tree(&mut with_leaves, &bare, &style, &mut seeded(8));
    let mut without = RgbaImage::new(100, 100);
    draw::draw_tree(&mut without, &bare, &Style::default(), &mut seeded(8));
    assert_eq!(with_leaves.as_raw(), without.as_raw());
}

#[test]
fn leaves_are_drawn_on_top() {
    let canvas = Canvas::generate(params(400, 400, 4), &mut seeded(12));
    let style = Style {
        colors: ColorPolicy::Fixed(Rgb::new(0, 0, 255)),
        leaves: LeafOptions {
            enabled: true,
            ..LeafOptions::default()
        },
        ..Style::default()
    };
    let mut img = RgbaImage::new(400, 400);
    draw::draw_tree(&mut img, &canvas, &style, &mut seeded(12));

    let greenish = img
        .as_raw()
        .chunks_exact(4)
        .filter(|p| p[3] == 255 && p[1] > p[0] && p[1] > p[2])
        .count();
    assert!(greenish > 0, "some leaf pixels must be fully visible");
}

#[test]
fn surfaces_report_their_size() {
    let img = NrgbaImage::new(17, 9);
    assert_eq!((img.width(), img.height()), (17, 9));
}
