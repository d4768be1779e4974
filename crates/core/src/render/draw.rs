use std::f32::consts::PI;

use super::color::ColorStrategy;
use super::raster::{Canvas, WHITE};
use crate::config::VisStyle;

/// One geometric layout driven by a magnitude vector. Implementations are
/// pure: they only write into the canvas handed to them.
pub trait DrawStyle: Send + Sync {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy);
}

impl VisStyle {
    /// Closed dispatch table from style variant to its strategy.
    pub fn strategy(self) -> &'static dyn DrawStyle {
        match self {
            VisStyle::Bars => &Bars,
            VisStyle::Circular => &Circular,
            VisStyle::Wave => &Wave,
            VisStyle::Radial => &Radial,
            VisStyle::Line => &Line,
            VisStyle::Dots => &Dots,
            VisStyle::Mirror => &Mirror,
            VisStyle::Spiral => &Spiral,
        }
    }
}

/// Integer bar slot width, matching the historical column layout where the
/// rightmost columns absorb the rounding remainder as background.
fn bar_slot(canvas: &Canvas, bands: usize) -> f32 {
    ((canvas.width() as usize) / bands) as f32
}

/// Vertical bars rising from the bottom edge.
struct Bars;

impl DrawStyle for Bars {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let height = canvas.height();
        let slot = bar_slot(canvas, magnitudes.len());
        let bar_width = slot * 0.8;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            // Quiet bands keep a reduced-scale floor instead of vanishing,
            // with the colour lookup boosted to stay visible.
            let (bar_height, display) = if magnitude < 0.05 {
                (5.0 + magnitude * height * 0.2, magnitude * 2.0)
            } else {
                (5.0 + magnitude * height * 0.7, magnitude)
            };

            let x = i as f32 * slot;
            let y = height - bar_height;
            canvas.fill_rect(x, y, bar_width, bar_height, palette.color(display), 1.0);

            // Strictly greater-than: a band at exactly 0.5 stays plain.
            if magnitude > 0.5 {
                canvas.fill_rect(
                    x - 2.0,
                    y - 2.0,
                    bar_width + 4.0,
                    bar_height + 4.0,
                    WHITE,
                    0.3,
                );
            }
        }
    }
}

/// Radial lines from an inner ring outward.
struct Circular;

impl DrawStyle for Circular {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let cx = canvas.width() / 2.0;
        let cy = canvas.height() / 2.0;
        let angle_step = 2.0 * PI / magnitudes.len() as f32;
        let min_radius = 80.0;
        let max_radius = canvas.width().min(canvas.height()) / 2.0 - 50.0;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let angle = i as f32 * angle_step;
            let (radius, display) = if magnitude < 0.01 {
                (min_radius + 5.0, 0.1)
            } else {
                (min_radius + magnitude * (max_radius - min_radius), magnitude)
            };

            let x1 = cx + min_radius * angle.cos();
            let y1 = cy + min_radius * angle.sin();
            let x2 = cx + radius * angle.cos();
            let y2 = cy + radius * angle.sin();

            canvas.line(x1, y1, x2, y2, 8.0, palette.color(display), 1.0);

            if magnitude > 0.5 {
                canvas.line(x1, y1, x2, y2, 12.0, WHITE, 0.3);
            }
        }
    }
}

/// Symmetric vertical strokes around the horizontal midline.
struct Wave;

impl DrawStyle for Wave {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let y_center = canvas.height() / 2.0;
        let x_step = canvas.width() / magnitudes.len() as f32;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let x = i as f32 * x_step;
            let extent = 20.0 + magnitude * 150.0;
            canvas.line(
                x,
                y_center - extent,
                x,
                y_center + extent,
                3.0,
                palette.color(magnitude),
                1.0,
            );
        }
    }
}

/// Filled wedges bursting out of a centre ring.
struct Radial;

impl DrawStyle for Radial {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let cx = canvas.width() / 2.0;
        let cy = canvas.height() / 2.0;
        let angle_step = 2.0 * PI / magnitudes.len() as f32;
        let base_radius = 50.0;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let angle = i as f32 * angle_step;
            let (length, display) = if magnitude < 0.01 {
                (10.0, 0.1)
            } else {
                (10.0 + magnitude * 300.0, magnitude)
            };

            let half_width = angle_step * 0.8 / 2.0;
            let inner_a = angle - half_width;
            let inner_b = angle + half_width;
            let outer = base_radius + length;

            canvas.fill_polygon(
                &[
                    (cx + base_radius * inner_a.cos(), cy + base_radius * inner_a.sin()),
                    (cx + base_radius * inner_b.cos(), cy + base_radius * inner_b.sin()),
                    (cx + outer * inner_b.cos(), cy + outer * inner_b.sin()),
                    (cx + outer * inner_a.cos(), cy + outer * inner_a.sin()),
                ],
                palette.color(display),
                1.0,
            );
        }
    }
}

/// Polyline across per-band vertical offsets.
struct Line;

impl DrawStyle for Line {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let width = canvas.width();
        let height = canvas.height();
        let x_step = width / (magnitudes.len() - 1) as f32;
        let offset = |magnitude: f32| height - 50.0 - magnitude * (height - 100.0);

        let mut prev = (0.0, offset(magnitudes[0]));
        for (i, &magnitude) in magnitudes.iter().enumerate().skip(1) {
            let point = (i as f32 * x_step, offset(magnitude));
            canvas.line(
                prev.0,
                prev.1,
                point.0,
                point.1,
                5.0,
                palette.color(magnitude),
                1.0,
            );

            if magnitude > 0.5 {
                canvas.line(prev.0, prev.1, point.0, point.1, 8.0, WHITE, 0.3);
            }

            prev = point;
        }
    }
}

/// Stacked dot clusters, later dots dimmed.
struct Dots;

impl DrawStyle for Dots {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let height = canvas.height();
        let x_step = canvas.width() / magnitudes.len() as f32;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let x = i as f32 * x_step + x_step / 2.0;
            let count = (1.0 + magnitude * 10.0) as usize;

            for j in 0..count {
                let y = height - 20.0 - (j * 30) as f32 - magnitude * 300.0;
                if y < 20.0 {
                    break;
                }

                let faded = magnitude * (1.0 - j as f32 / 10.0);
                let radius = 3.0 + magnitude * 5.0;
                canvas.fill_circle(x, y, radius, palette.color(faded), 1.0);

                if magnitude > 0.5 {
                    canvas.stroke_circle(x, y, radius + 3.0, WHITE, 0.3);
                }
            }
        }
    }
}

/// Paired bars mirrored across the horizontal midline.
struct Mirror;

impl DrawStyle for Mirror {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        let height = canvas.height();
        let y_center = height / 2.0;
        let slot = bar_slot(canvas, magnitudes.len());
        let bar_width = slot * 0.8;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let (bar_height, display) = if magnitude < 0.01 {
                (5.0, 0.1)
            } else {
                (5.0 + magnitude * height * 0.35, magnitude)
            };

            let x = i as f32 * slot;
            let color = palette.color(display);
            canvas.fill_rect(x, y_center - bar_height, bar_width, bar_height, color, 1.0);
            canvas.fill_rect(x, y_center, bar_width, bar_height, color, 1.0);

            if magnitude > 0.5 {
                canvas.stroke_rect(
                    x - 2.0,
                    y_center - bar_height - 2.0,
                    bar_width + 4.0,
                    bar_height * 2.0 + 4.0,
                    WHITE,
                    0.3,
                );
            }
        }
    }
}

/// Two-turn spiral, one short segment run per band.
struct Spiral;

impl DrawStyle for Spiral {
    fn draw(&self, canvas: &mut Canvas, magnitudes: &[f32], palette: &dyn ColorStrategy) {
        const TURNS: f32 = 2.0;
        const SEGMENTS: usize = 10;

        let cx = canvas.width() / 2.0;
        let cy = canvas.height() / 2.0;
        let max_radius = canvas.width().min(canvas.height()) / 2.0 - 50.0;
        let bands = magnitudes.len() as f32;
        let full_sweep = 2.0 * PI * TURNS;

        for (i, &magnitude) in magnitudes.iter().enumerate() {
            let angle_start = i as f32 / bands * full_sweep;
            let angle_end = (i + 1) as f32 / bands * full_sweep;
            let color = palette.color(magnitude);
            let thickness = 2.0 + magnitude * 8.0;

            let mut prev: Option<(f32, f32)> = None;
            for j in 0..SEGMENTS {
                let t = j as f32 / (SEGMENTS - 1) as f32;
                let angle = angle_start + t * (angle_end - angle_start);
                let radius = 50.0 + angle / full_sweep * max_radius + magnitude * 50.0;
                let point = (cx + radius * angle.cos(), cy + radius * angle.sin());

                if let Some((px, py)) = prev {
                    canvas.line(px, py, point.0, point.1, thickness, color, 1.0);
                }
                prev = Some(point);
            }
        }
    }
}
