use image::Rgb;

use super::raster::Color;
use crate::config::{Background, ColorScheme};

/// Maps a scalar band magnitude in [0, 1] to a colour. One implementation
/// per [`ColorScheme`] variant; the breakpoints below are contract values
/// that keep visual parity with earlier releases, so change none of them.
pub trait ColorStrategy: Send + Sync {
    fn color(&self, magnitude: f32) -> Color;
}

impl ColorScheme {
    /// Closed dispatch table from scheme variant to its strategy.
    pub fn strategy(self) -> &'static dyn ColorStrategy {
        match self {
            ColorScheme::Rainbow => &Rainbow,
            ColorScheme::Fire => &Fire,
            ColorScheme::Ocean => &Ocean,
            ColorScheme::Purple => &Purple,
            ColorScheme::Neon => &Neon,
            ColorScheme::Monochrome => &Monochrome,
            ColorScheme::Sunset => &Sunset,
            ColorScheme::Forest => &Forest,
            ColorScheme::White => &White,
        }
    }
}

impl Background {
    pub fn rgb(self) -> Color {
        match self {
            Background::Green => Rgb([0, 255, 0]),
            Background::Blue => Rgb([0, 0, 255]),
            Background::Magenta => Rgb([255, 0, 255]),
            Background::Black => Rgb([0, 0, 0]),
            Background::White => Rgb([255, 255, 255]),
            Background::Gray => Rgb([128, 128, 128]),
        }
    }
}

/// Hue sweep from green (quiet) to red (loud) through HSV space.
struct Rainbow;

impl ColorStrategy for Rainbow {
    fn color(&self, magnitude: f32) -> Color {
        let h = (1.0 - magnitude) * 120.0 / 360.0;
        let v = 0.8 + magnitude * 0.2;
        hsv_to_rgb(h, 1.0, v)
    }
}

/// Deep red -> bright red -> orange -> yellow -> yellow-green.
struct Fire;

impl ColorStrategy for Fire {
    fn color(&self, magnitude: f32) -> Color {
        if magnitude < 0.2 {
            let t = magnitude / 0.2;
            Rgb([channel(180.0 + t * 75.0), 0, 0])
        } else if magnitude < 0.4 {
            let t = (magnitude - 0.2) / 0.2;
            Rgb([255, channel(t * 100.0), 0])
        } else if magnitude < 0.6 {
            let t = (magnitude - 0.4) / 0.2;
            Rgb([255, channel(100.0 + t * 80.0), 0])
        } else if magnitude < 0.8 {
            let t = (magnitude - 0.6) / 0.2;
            Rgb([255, channel(180.0 + t * 75.0), 0])
        } else {
            let t = (magnitude - 0.8) / 0.2;
            Rgb([channel(255.0 - t * 55.0), 255, channel(t * 50.0)])
        }
    }
}

/// Dark blue to cyan.
struct Ocean;

impl ColorStrategy for Ocean {
    fn color(&self, magnitude: f32) -> Color {
        Rgb([
            0,
            channel(magnitude * 200.0),
            channel(150.0 + magnitude * 105.0),
        ])
    }
}

/// Purple to pink.
struct Purple;

impl ColorStrategy for Purple {
    fn color(&self, magnitude: f32) -> Color {
        Rgb([
            channel(180.0 + magnitude * 75.0),
            0,
            channel(255.0 - magnitude * 50.0),
        ])
    }
}

/// Cyan -> electric blue -> magenta -> hot pink -> electric green -> cyan.
struct Neon;

impl ColorStrategy for Neon {
    fn color(&self, magnitude: f32) -> Color {
        if magnitude < 0.2 {
            let t = magnitude / 0.2;
            Rgb([0, channel(255.0 - t * 155.0), 255])
        } else if magnitude < 0.4 {
            let t = (magnitude - 0.2) / 0.2;
            Rgb([channel(t * 255.0), channel(100.0 - t * 100.0), 255])
        } else if magnitude < 0.6 {
            let t = (magnitude - 0.4) / 0.2;
            Rgb([255, channel(t * 100.0), channel(255.0 - t * 55.0)])
        } else if magnitude < 0.8 {
            let t = (magnitude - 0.6) / 0.2;
            Rgb([
                channel(255.0 - t * 255.0),
                channel(100.0 + t * 155.0),
                channel(200.0 - t * 200.0),
            ])
        } else {
            let t = (magnitude - 0.8) / 0.2;
            Rgb([0, 255, channel(t * 255.0)])
        }
    }
}

/// Mid-grey to white.
struct Monochrome;

impl ColorStrategy for Monochrome {
    fn color(&self, magnitude: f32) -> Color {
        let value = channel(50.0 + magnitude * 205.0);
        Rgb([value, value, value])
    }
}

/// Purple through red into orange.
struct Sunset;

impl ColorStrategy for Sunset {
    fn color(&self, magnitude: f32) -> Color {
        if magnitude < 0.5 {
            Rgb([
                channel(magnitude * 2.0 * 255.0),
                0,
                channel(255.0 - magnitude * 2.0 * 255.0),
            ])
        } else {
            Rgb([255, channel((magnitude - 0.5) * 2.0 * 180.0), 0])
        }
    }
}

/// Dark green to yellow-green.
struct Forest;

impl ColorStrategy for Forest {
    fn color(&self, magnitude: f32) -> Color {
        Rgb([
            channel(magnitude * 150.0),
            channel(100.0 + magnitude * 155.0),
            0,
        ])
    }
}

/// Constant white, whatever the magnitude.
struct White;

impl ColorStrategy for White {
    fn color(&self, _magnitude: f32) -> Color {
        Rgb([255, 255, 255])
    }
}

/// Rounds a float channel into u8 so ramp endpoints land exactly on their
/// contract values (plain truncation turns 49.999996 into 49).
fn channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Color {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0).rem_euclid(2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as i32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb([
        channel((r + m) * 255.0),
        channel((g + m) * 255.0),
        channel((b + m) * 255.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_contract_endpoints() {
        let fire = ColorScheme::Fire.strategy();
        assert_eq!(fire.color(0.0).0, [180, 0, 0]);
        assert_eq!(fire.color(1.0).0, [200, 255, 50]);
    }

    #[test]
    fn white_ignores_magnitude() {
        let white = ColorScheme::White.strategy();
        assert_eq!(white.color(0.0).0, [255, 255, 255]);
        assert_eq!(white.color(0.37).0, [255, 255, 255]);
        assert_eq!(white.color(1.0).0, [255, 255, 255]);
    }

    #[test]
    fn monochrome_ramps_from_grey_to_white() {
        let mono = ColorScheme::Monochrome.strategy();
        assert_eq!(mono.color(0.0).0, [50, 50, 50]);
        assert_eq!(mono.color(1.0).0, [255, 255, 255]);
    }

    #[test]
    fn rainbow_sweeps_from_green_to_red() {
        let rainbow = ColorScheme::Rainbow.strategy();
        let quiet = rainbow.color(0.0).0;
        let loud = rainbow.color(1.0).0;
        assert_eq!(quiet, [0, 204, 0]);
        assert_eq!(loud, [255, 0, 0]);
    }

    #[test]
    fn piecewise_schemes_stay_in_gamut() {
        for scheme in ColorScheme::ALL {
            let strategy = scheme.strategy();
            for step in 0..=100 {
                // Just needs to not panic; channel() clamps into gamut.
                let _ = strategy.color(step as f32 / 100.0);
            }
        }
    }

    #[test]
    fn backgrounds_are_solid_contract_colors() {
        assert_eq!(Background::Green.rgb().0, [0, 255, 0]);
        assert_eq!(Background::Magenta.rgb().0, [255, 0, 255]);
        assert_eq!(Background::Gray.rgb().0, [128, 128, 128]);
    }
}
