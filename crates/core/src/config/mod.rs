use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Result, VizError};

/// Closed set of colour gradient strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Rainbow,
    Fire,
    Ocean,
    Purple,
    Neon,
    Monochrome,
    Sunset,
    Forest,
    White,
}

/// Closed set of geometric visualisation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisStyle {
    Bars,
    Circular,
    Wave,
    Radial,
    Line,
    Dots,
    Mirror,
    Spiral,
}

/// Solid background colours; green/blue/magenta double as chroma keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Green,
    Blue,
    Magenta,
    Black,
    White,
    Gray,
}

/// How frames are produced: one at a time, or via a worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Sequential,
    Parallel,
}

macro_rules! str_enum {
    ($ty:ty { $($name:literal => $variant:ident),+ $(,)? }, $what:literal) => {
        impl FromStr for $ty {
            type Err = VizError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(VizError::Config(format!(
                        concat!("unknown ", $what, ": '{}'"),
                        other
                    ))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $(Self::$variant => $name,)+
                };
                f.write_str(name)
            }
        }
    };
}

str_enum!(ColorScheme {
    "rainbow" => Rainbow,
    "fire" => Fire,
    "ocean" => Ocean,
    "purple" => Purple,
    "neon" => Neon,
    "monochrome" => Monochrome,
    "sunset" => Sunset,
    "forest" => Forest,
    "white" => White,
}, "color scheme");

str_enum!(VisStyle {
    "bars" => Bars,
    "circular" => Circular,
    "wave" => Wave,
    "radial" => Radial,
    "line" => Line,
    "dots" => Dots,
    "mirror" => Mirror,
    "spiral" => Spiral,
}, "visualisation style");

str_enum!(Background {
    "green" => Green,
    "blue" => Blue,
    "magenta" => Magenta,
    "black" => Black,
    "white" => White,
    "gray" => Gray,
}, "background color");

str_enum!(RunMode {
    "sequential" => Sequential,
    "parallel" => Parallel,
}, "run mode");

impl VisStyle {
    /// All styles, in declaration order. Used by tests and `--help` output.
    pub const ALL: [VisStyle; 8] = [
        VisStyle::Bars,
        VisStyle::Circular,
        VisStyle::Wave,
        VisStyle::Radial,
        VisStyle::Line,
        VisStyle::Dots,
        VisStyle::Mirror,
        VisStyle::Spiral,
    ];
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 9] = [
        ColorScheme::Rainbow,
        ColorScheme::Fire,
        ColorScheme::Ocean,
        ColorScheme::Purple,
        ColorScheme::Neon,
        ColorScheme::Monochrome,
        ColorScheme::Sunset,
        ColorScheme::Forest,
        ColorScheme::White,
    ];
}

/// Validated, immutable run configuration. Constructed once before any
/// processing starts; nothing downstream mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub fps: u32,
    /// Seconds of audio to visualise; 0 means the full file.
    pub duration: f64,
    pub bar_count: usize,
    pub color_scheme: ColorScheme,
    pub style: VisStyle,
    pub background: Background,
    pub width: u32,
    pub height: u32,
    pub mode: RunMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("spectrum_video.mp4"),
            fps: 30,
            duration: 0.0,
            bar_count: 32,
            color_scheme: ColorScheme::Rainbow,
            style: VisStyle::Bars,
            background: Background::Green,
            width: 1280,
            height: 720,
            mode: RunMode::Sequential,
        }
    }
}

impl Config {
    /// Checks every range constraint. The rest of the pipeline assumes a
    /// configuration that has passed this check.
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(VizError::Config("input file is required".into()));
        }
        if !(1..=120).contains(&self.fps) {
            return Err(VizError::Config(format!(
                "fps must be between 1 and 120, got {}",
                self.fps
            )));
        }
        if self.duration < 0.0 {
            return Err(VizError::Config("duration cannot be negative".into()));
        }
        if !(8..=256).contains(&self.bar_count) {
            return Err(VizError::Config(format!(
                "bar count must be between 8 and 256, got {}",
                self.bar_count
            )));
        }
        if self.width < 320 || self.height < 240 {
            return Err(VizError::Config("minimum resolution is 320x240".into()));
        }
        if self.width > 7680 || self.height > 4320 {
            return Err(VizError::Config("maximum resolution is 7680x4320".into()));
        }
        Ok(())
    }

    /// Loads a configuration preset from a JSON file. Missing fields fall
    /// back to defaults; unknown enum names are rejected by serde.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|err| VizError::Config(format!("bad preset '{}': {err}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            input: PathBuf::from("song.mp3"),
            ..Config::default()
        }
    }

    #[test]
    fn default_config_validates_once_input_is_set() {
        valid().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut cfg = valid();
        cfg.fps = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.fps = 121;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.bar_count = 7;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.bar_count = 257;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.width = 319;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.height = 4321;
        assert!(cfg.validate().is_err());

        let mut cfg = valid();
        cfg.duration = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn enum_parsing_rejects_unknown_names() {
        assert_eq!("fire".parse::<ColorScheme>().unwrap(), ColorScheme::Fire);
        assert_eq!("spiral".parse::<VisStyle>().unwrap(), VisStyle::Spiral);
        assert_eq!("gray".parse::<Background>().unwrap(), Background::Gray);
        assert_eq!("parallel".parse::<RunMode>().unwrap(), RunMode::Parallel);

        assert!("lava".parse::<ColorScheme>().is_err());
        assert!("cube".parse::<VisStyle>().is_err());
        assert!("Fire".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for scheme in ColorScheme::ALL {
            assert_eq!(scheme.to_string().parse::<ColorScheme>().unwrap(), scheme);
        }
        for style in VisStyle::ALL {
            assert_eq!(style.to_string().parse::<VisStyle>().unwrap(), style);
        }
    }

    #[test]
    fn preset_json_round_trip() {
        let cfg = valid();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bar_count, cfg.bar_count);
        assert_eq!(back.color_scheme, cfg.color_scheme);
        assert_eq!(back.mode, cfg.mode);
    }
}
