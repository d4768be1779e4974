//! Deterministic per-frame rasterisation: a solid background, one geometric
//! draw strategy, one colour gradient strategy. Rendering is a pure function
//! of its inputs, which is what lets the parallel scheduler fan frames out
//! to a worker pool without any locking.

pub mod color;
pub mod draw;
pub mod raster;

use image::RgbImage;

pub use color::ColorStrategy;
pub use draw::DrawStyle;
pub use raster::Canvas;

use crate::config::Config;

/// Renders one magnitude vector into one raster image.
#[derive(Debug, Clone, Copy)]
pub struct FrameRenderer<'a> {
    config: &'a Config,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Pure: identical magnitudes produce byte-identical images.
    pub fn render(&self, magnitudes: &[f32]) -> RgbImage {
        let mut canvas = Canvas::new(
            self.config.width,
            self.config.height,
            self.config.background.rgb(),
        );
        self.config.style.strategy().draw(
            &mut canvas,
            magnitudes,
            self.config.color_scheme.strategy(),
        );
        canvas.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Background, ColorScheme, VisStyle};

    fn test_config(style: VisStyle) -> Config {
        Config {
            input: "song.mp3".into(),
            style,
            color_scheme: ColorScheme::White,
            background: Background::Black,
            width: 320,
            height: 240,
            bar_count: 8,
            ..Config::default()
        }
    }

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32 / (len - 1) as f32).collect()
    }

    #[test]
    fn render_is_pure() {
        for style in VisStyle::ALL {
            let config = test_config(style);
            let renderer = FrameRenderer::new(&config);
            let magnitudes = ramp(config.bar_count);

            let first = renderer.render(&magnitudes);
            let second = renderer.render(&magnitudes);
            assert_eq!(first.as_raw(), second.as_raw(), "style {style} not pure");
        }
    }

    #[test]
    fn all_zero_magnitudes_render_in_every_style() {
        let magnitudes = vec![0.0_f32; 8];
        for style in VisStyle::ALL {
            let config = test_config(style);
            let image = FrameRenderer::new(&config).render(&magnitudes);
            assert_eq!(image.width(), 320);
            assert_eq!(image.height(), 240);
            // Every style has a visible floor, so silence still draws
            // something on the black background.
            let lit = image.pixels().filter(|p| p.0 != [0, 0, 0]).count();
            assert!(lit > 0, "style {style} drew nothing for silence");
        }
    }

    #[test]
    fn silent_bars_keep_a_floor_height() {
        let config = test_config(VisStyle::Bars);
        let image = FrameRenderer::new(&config).render(&vec![0.0; 8]);
        // Floor bars are 5 px tall and 80% of the 40 px slot wide.
        assert_eq!(image.get_pixel(0, 239).0, [255, 255, 255]);
        assert_eq!(image.get_pixel(0, 234).0, [0, 0, 0]);
    }

    #[test]
    fn glow_threshold_is_strictly_greater_than_half() {
        let config = test_config(VisStyle::Bars);
        let renderer = FrameRenderer::new(&config);

        // Bar 0 occupies x 0..32; its glow overlay extends to x < 34.
        // Sample just right of the bar, inside the would-be glow region.
        let probe = |magnitude: f32| {
            let image = renderer.render(&vec![magnitude; 8]);
            image.get_pixel(33, 200).0
        };

        assert_eq!(probe(0.5), [0, 0, 0], "0.5 must not glow");
        assert_ne!(probe(0.500_000_1), [0, 0, 0], "just above 0.5 must glow");
    }

    #[test]
    fn background_color_fills_untouched_area() {
        let mut config = test_config(VisStyle::Bars);
        config.background = Background::Magenta;
        let image = FrameRenderer::new(&config).render(&vec![0.0; 8]);
        assert_eq!(image.get_pixel(319, 0).0, [255, 0, 255]);
    }
}
