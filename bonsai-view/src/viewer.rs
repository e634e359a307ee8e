//! Interactive bonsai viewer built with eframe/egui.
//!
//! [`Viewer`] owns the settings and the frame random source, renders trees
//! on the CPU through [`crate::frame::render`] and shows the result as a
//! texture. A new tree is grown whenever the render size changes, a setting
//! is edited, "New tree" is pressed, or the auto interval elapses.

use std::time::Instant;

use bonsai_core::{color::Rgb, draw::DrawMode, rng};
use eframe::App;
use rand::rngs::StdRng;

use crate::{
    frame,
    settings::{AUTO_RANGE, MAX_DEPTH, Palette, Settings},
};

/// Main application state for the interactive viewer.
///
/// ### Fields
/// - `settings` - Tree shape and style, edited live from the side panel.
/// - `rng` - Frame random source, reseeded from `settings.seed`.
/// - `texture` - Last rendered tree, created on the first frame.
/// - `frame_size` - Pixel size of the last render.
/// - `dirty` - Whether the next frame must grow a new tree.
/// - `last_draw_time` - egui time of the last render, for the auto interval.
/// - `last_render_ms` - Wall-clock cost of the last render (display only).
pub struct Viewer {
    settings: Settings,
    rng: StdRng,

    texture: Option<egui::TextureHandle>,
    frame_size: [u32; 2],
    branches: usize,
    painted: usize,
    dirty: bool,

    last_draw_time: f64,
    last_render_ms: f64,
}

impl Viewer {
    pub fn new(settings: Settings) -> Self {
        let rng = rng::seeded(settings.seed);
        Self {
            settings,
            rng,
            texture: None,
            frame_size: [0, 0],
            branches: 0,
            painted: 0,
            dirty: true,
            last_draw_time: 0.0,
            last_render_ms: 0.0,
        }
    }

    /// Restarts the random stream so the next trees repeat from the seed.
    fn reseed(&mut self) {
        self.rng = rng::seeded(self.settings.seed);
        self.dirty = true;
    }

    /// Grows and paints a new tree at `size` and uploads it.
    fn redraw(&mut self, ctx: &egui::Context, size: [u32; 2], now: f64) {
        let started = Instant::now();
        let frame = frame::render(&self.settings, size, &mut self.rng);
        self.last_render_ms = started.elapsed().as_secs_f64() * 1000.0;

        self.frame_size = frame.size;
        self.branches = frame.branches;
        self.painted = frame.painted;
        match &mut self.texture {
            Some(tex) => tex.set(frame.image, egui::TextureOptions::LINEAR),
            None => {
                self.texture =
                    Some(ctx.load_texture("bonsai", frame.image, egui::TextureOptions::LINEAR));
            }
        }
        self.dirty = false;
        self.last_draw_time = now;
    }

    /// Whether the auto interval has elapsed at egui time `now`.
    fn auto_due(&self, now: f64) -> bool {
        self.settings
            .auto
            .is_some_and(|interval| now - self.last_draw_time >= interval)
    }

    /// Helper to draw a labeled `f64` [`egui::DragValue`]; returns whether it changed.
    fn labeled_drag_f64(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut f64,
        range: std::ops::RangeInclusive<f64>,
        speed: f64,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed)).changed()
        })
        .inner
    }

    /// Helper to draw a labeled `u32` [`egui::DragValue`]; returns whether it changed.
    fn labeled_drag_u32(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut u32,
        range: std::ops::RangeInclusive<u32>,
    ) -> bool {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(0.1)).changed()
        })
        .inner
    }

    /// Builds the top panel (new tree, auto-redraw).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("🌳 New tree").clicked() {
                    self.dirty = true;
                }

                let mut auto = self.settings.auto.is_some();
                if ui.checkbox(&mut auto, "Auto").changed() {
                    self.settings.auto = auto.then_some(5.0);
                }
                if let Some(interval) = &mut self.settings.auto {
                    ui.add(
                        egui::DragValue::new(interval)
                            .prefix("every ")
                            .suffix(" s")
                            .range(AUTO_RANGE)
                            .speed(0.1),
                    );
                }

                ui.separator();
                let mut lines = self.settings.mode == DrawMode::Line;
                if ui.checkbox(&mut lines, "Lines").changed() {
                    self.settings.mode = if lines {
                        DrawMode::Line
                    } else {
                        DrawMode::Polygon
                    };
                    self.dirty = true;
                }
            });
        });
    }

    /// Builds the bottom status bar (frame size, branch count, render time).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("render = {:.1} ms", self.last_render_ms));
                ui.separator();
                ui.label(format!("painted = {}", self.painted));
                ui.label(format!("branches = {}", self.branches));
                ui.separator();
                ui.label(format!("{} x {}", self.frame_size[0], self.frame_size[1]));
            });
        });
    }

    /// Builds the right-hand panel for tree and style settings.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        let mut changed = false;
        let mut reseed = false;
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                let s = &mut self.settings;
                ui.heading("Tree");

                ui.separator();
                changed |=
                    Self::labeled_drag_u32(ui, "depth:", &mut s.tree.max_depth, 0..=MAX_DEPTH);
                changed |=
                    Self::labeled_drag_f64(ui, "spread:", &mut s.tree.spread, 0.01..=10.0, 0.01);
                changed |= Self::labeled_drag_f64(
                    ui,
                    "trunk width %:",
                    &mut s.tree.trunk_width_pct,
                    0.1..=100.0,
                    0.1,
                );
                changed |= Self::labeled_drag_f64(
                    ui,
                    "trunk height %:",
                    &mut s.tree.trunk_height_pct,
                    1.0..=100.0,
                    0.5,
                );

                ui.separator();
                ui.label("Color");
                ui.horizontal(|ui| {
                    changed |= ui
                        .radio_value(&mut s.palette, Palette::Gradient, "Gradient")
                        .changed();
                    changed |= ui.radio_value(&mut s.palette, Palette::Mono, "Mono").changed();
                    changed |= ui
                        .radio_value(&mut s.palette, Palette::Rainbow, "Rainbow")
                        .changed();
                });
                let mut rgb = [s.base_color.r, s.base_color.g, s.base_color.b];
                ui.add_enabled_ui(s.palette != Palette::Rainbow, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("base:");
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            s.base_color = Rgb::new(rgb[0], rgb[1], rgb[2]);
                            changed = true;
                        }
                    });
                });

                ui.separator();
                ui.label("Leaves");
                changed |= ui.checkbox(&mut s.leaves.enabled, "enabled").changed();
                ui.add_enabled_ui(s.leaves.enabled, |ui| {
                    changed |=
                        Self::labeled_drag_f64(ui, "size:", &mut s.leaves.size, 0.05..=10.0, 0.05);
                    let mut fixed = s.leaves.density.is_some();
                    if ui.checkbox(&mut fixed, "fixed density").changed() {
                        s.leaves.density = fixed.then_some(2);
                        changed = true;
                    }
                    if let Some(density) = &mut s.leaves.density {
                        changed |= Self::labeled_drag_u32(ui, "per branch:", density, 1..=100);
                    }
                });

                ui.separator();
                ui.label("Seed (0 = random)");
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut s.seed).speed(1.0));
                    reseed = ui.button("Reseed").clicked();
                });

                ui.separator();
                if ui.button("Reset to defaults").clicked() {
                    let keep = (s.fixed_size, s.seed);
                    *s = Settings {
                        fixed_size: keep.0,
                        seed: keep.1,
                        ..Settings::default()
                    };
                    changed = true;
                }
            });
        if reseed {
            self.reseed();
        } else if changed {
            self.dirty = true;
        }
    }

    /// Builds the central panel showing the rendered tree.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            ui.allocate_rect(rect, egui::Sense::hover());

            let now = ctx.input(|i| i.time);
            let size = render_size(rect.size(), ctx.pixels_per_point(), self.settings.fixed_size);
            if self.dirty || size != self.frame_size || self.auto_due(now) {
                self.redraw(ctx, size, now);
            }

            if let Some(tex) = &self.texture {
                let dest = fit_rect(rect, self.frame_size);
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter_at(rect).image(tex.id(), dest, uv, egui::Color32::WHITE);
            }

            if let Some(interval) = self.settings.auto {
                let left = (self.last_draw_time + interval - now).max(0.0);
                ctx.request_repaint_after(std::time::Duration::from_secs_f64(left));
            }
        });
    }
}

/// Pixel size of the next render: the fixed size if set, otherwise the
/// panel size in physical pixels, never smaller than 1x1.
fn render_size(panel: egui::Vec2, pixels_per_point: f32, fixed: Option<[u32; 2]>) -> [u32; 2] {
    if let Some(size) = fixed {
        return size;
    }
    let px = panel * pixels_per_point;
    [
        (px.x.round() as u32).max(1),
        (px.y.round() as u32).max(1),
    ]
}

/// Largest rect with the aspect ratio of `size` centred in `container`.
fn fit_rect(container: egui::Rect, size: [u32; 2]) -> egui::Rect {
    if size[0] == 0 || size[1] == 0 {
        return container;
    }
    let aspect = size[0] as f32 / size[1] as f32;
    let mut fitted = container.size();
    if fitted.x / fitted.y > aspect {
        fitted.x = fitted.y * aspect;
    } else {
        fitted.y = fitted.x / aspect;
    }
    egui::Rect::from_center_size(container.center(), fitted)
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
