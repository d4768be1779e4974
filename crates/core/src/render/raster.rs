use image::{Rgb, RgbImage};

pub type Color = Rgb<u8>;

pub const WHITE: Color = Rgb([255, 255, 255]);

/// Minimal software canvas over an [`RgbImage`].
///
/// Shapes cover the pixels whose centre falls inside them, so identical
/// inputs always touch identical pixels. All methods take f32 geometry and
/// an alpha for translucent overlays (the glow strokes blend white at 30%).
pub struct Canvas {
    image: RgbImage,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background),
            width,
            height,
        }
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn width(&self) -> f32 {
        self.width as f32
    }

    pub fn height(&self) -> f32 {
        self.height as f32
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        if alpha >= 1.0 {
            *pixel = color;
            return;
        }
        for channel in 0..3 {
            let base = pixel.0[channel] as f32;
            let over = color.0[channel] as f32;
            pixel.0[channel] = (base * (1.0 - alpha) + over * alpha).round() as u8;
        }
    }

    /// Axis-aligned filled rectangle with top-left corner `(x, y)`.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, alpha: f32) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        let x_min = (x - 0.5).ceil() as i64;
        let x_max = (x + w - 0.5).ceil() as i64;
        let y_min = (y - 0.5).ceil() as i64;
        let y_max = (y + h - 0.5).ceil() as i64;
        for py in y_min..y_max {
            for px in x_min..x_max {
                self.blend(px, py, color, alpha);
            }
        }
    }

    /// One-pixel rectangle outline.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color, alpha: f32) {
        self.fill_rect(x, y, w, 1.0, color, alpha);
        self.fill_rect(x, y + h - 1.0, w, 1.0, color, alpha);
        self.fill_rect(x, y + 1.0, 1.0, h - 2.0, color, alpha);
        self.fill_rect(x + w - 1.0, y + 1.0, 1.0, h - 2.0, color, alpha);
    }

    /// Filled polygon via even-odd scanline coverage of pixel centres.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        let y_lo = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let y_hi = points.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let py_min = ((y_lo - 0.5).ceil() as i64).max(0);
        let py_max = ((y_hi - 0.5).ceil() as i64).min(self.height as i64);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for py in py_min..py_max {
            let yc = py as f32 + 0.5;
            crossings.clear();
            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
                    crossings.push(x0 + (yc - y0) * (x1 - x0) / (y1 - y0));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for pair in crossings.chunks_exact(2) {
                let px_min = (pair[0] - 0.5).ceil() as i64;
                let px_max = (pair[1] - 0.5).ceil() as i64;
                for px in px_min..px_max {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// Thick line segment rendered as a filled quad around the segment axis.
    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, color: Color, alpha: f32) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= f32::EPSILON {
            self.fill_circle(x0, y0, width * 0.5, color, alpha);
            return;
        }
        let half = width.max(1.0) * 0.5;
        // Unit normal to the segment direction.
        let nx = -dy / length * half;
        let ny = dx / length * half;
        self.fill_polygon(
            &[
                (x0 + nx, y0 + ny),
                (x1 + nx, y1 + ny),
                (x1 - nx, y1 - ny),
                (x0 - nx, y0 - ny),
            ],
            color,
            alpha,
        );
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let x_min = (cx - radius - 0.5).floor() as i64;
        let x_max = (cx + radius + 0.5).ceil() as i64;
        let y_min = (cy - radius - 0.5).floor() as i64;
        let y_max = (cy + radius + 0.5).ceil() as i64;
        let r2 = radius * radius;
        for py in y_min..y_max {
            for px in x_min..x_max {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }

    /// One-pixel circle outline.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let x_min = (cx - radius - 1.0).floor() as i64;
        let x_max = (cx + radius + 1.0).ceil() as i64;
        let y_min = (cy - radius - 1.0).floor() as i64;
        let y_max = (cy + radius + 1.0).ceil() as i64;
        for py in y_min..y_max {
            for px in x_min..x_max {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let distance = (dx * dx + dy * dy).sqrt();
                if (distance - radius).abs() <= 0.6 {
                    self.blend(px, py, color, alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const BLACK: Color = Rgb([0, 0, 0]);
    const RED: Color = Rgb([255, 0, 0]);

    #[test]
    fn fill_rect_covers_expected_pixels() {
        let mut canvas = Canvas::new(8, 8, BLACK);
        canvas.fill_rect(2.0, 2.0, 3.0, 3.0, RED, 1.0);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(2, 2), RED);
        assert_eq!(*image.get_pixel(4, 4), RED);
        assert_eq!(*image.get_pixel(5, 4), BLACK);
        assert_eq!(*image.get_pixel(1, 2), BLACK);
    }

    #[test]
    fn fill_rect_clips_to_canvas_bounds() {
        let mut canvas = Canvas::new(4, 4, BLACK);
        canvas.fill_rect(-10.0, -10.0, 100.0, 100.0, RED, 1.0);
        let image = canvas.into_image();
        assert!(image.pixels().all(|p| *p == RED));
    }

    #[test]
    fn alpha_blend_mixes_toward_overlay() {
        let mut canvas = Canvas::new(2, 2, BLACK);
        canvas.fill_rect(0.0, 0.0, 2.0, 2.0, WHITE, 0.3);
        let image = canvas.into_image();
        let pixel = image.get_pixel(0, 0);
        assert_eq!(pixel.0, [77, 77, 77]);
    }

    #[test]
    fn vertical_line_has_requested_width() {
        let mut canvas = Canvas::new(16, 16, BLACK);
        canvas.line(8.0, 2.0, 8.0, 14.0, 4.0, RED, 1.0);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(6, 8), RED);
        assert_eq!(*image.get_pixel(9, 8), RED);
        assert_eq!(*image.get_pixel(4, 8), BLACK);
        assert_eq!(*image.get_pixel(12, 8), BLACK);
    }

    #[test]
    fn circle_is_centred() {
        let mut canvas = Canvas::new(16, 16, BLACK);
        canvas.fill_circle(8.0, 8.0, 3.0, RED, 1.0);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(8, 8), RED);
        assert_eq!(*image.get_pixel(8, 5), RED);
        assert_eq!(*image.get_pixel(8, 3), BLACK);
        assert_eq!(*image.get_pixel(12, 12), BLACK);
    }
}
