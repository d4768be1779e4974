use std::{path::PathBuf, str::FromStr, time::Instant};

use audiospectrum_core::{
    generate, Background, ColorScheme, Config, RunMode, VisStyle,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> audiospectrum_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.into_config()?;

    tracing::info!(
        input = %config.input.display(),
        style = %config.style,
        scheme = %config.color_scheme,
        mode = %config.mode,
        "generating spectrum video"
    );

    let started = Instant::now();
    let report = generate(&config)?;

    tracing::info!(
        output = %config.output.display(),
        frames = report.total_frames,
        elapsed_seconds = started.elapsed().as_secs_f64(),
        size_mb = report.output_bytes as f64 / (1024.0 * 1024.0),
        "video created"
    );
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Audio spectrum video generator", long_about = None)]
struct Cli {
    /// Audio file to visualise (mp3, wav, flac, ...).
    input: PathBuf,

    /// Output video file [default: spectrum_video.mp4]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Frames per second, 1-120 [default: 30]
    #[arg(short, long)]
    fps: Option<u32>,

    /// Seconds to visualise; 0 means the full audio [default: 0]
    #[arg(short, long)]
    duration: Option<f64>,

    /// Number of frequency bars, 8-256 [default: 32]
    #[arg(short, long)]
    bars: Option<usize>,

    /// Color scheme: rainbow, fire, ocean, purple, neon, monochrome,
    /// sunset, forest, white [default: rainbow]
    #[arg(short, long, value_parser = ColorScheme::from_str)]
    color_scheme: Option<ColorScheme>,

    /// Visualisation style: bars, circular, wave, radial, line, dots,
    /// mirror, spiral [default: bars]
    #[arg(short = 't', long, value_parser = VisStyle::from_str)]
    style: Option<VisStyle>,

    /// Background color: green, blue, magenta, black, white, gray
    /// [default: green]
    #[arg(long, value_parser = Background::from_str)]
    background: Option<Background>,

    /// Video width, 320-7680 [default: 1280]
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Video height, 240-4320 [default: 720]
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Execution mode: sequential, parallel [default: sequential]
    #[arg(long, value_parser = RunMode::from_str)]
    mode: Option<RunMode>,

    /// JSON preset file providing base settings; explicit flags override it.
    #[arg(long)]
    preset: Option<PathBuf>,
}

impl Cli {
    /// Builds the validated run configuration: preset (or defaults) as the
    /// base, explicit flags layered on top.
    fn into_config(self) -> audiospectrum_core::Result<Config> {
        let mut config = match &self.preset {
            Some(path) => Config::from_json_file(path)?,
            None => Config::default(),
        };

        config.input = self.input;
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(duration) = self.duration {
            config.duration = duration;
        }
        if let Some(bars) = self.bars {
            config.bar_count = bars;
        }
        if let Some(scheme) = self.color_scheme {
            config.color_scheme = scheme;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "audiospectrum",
            "song.mp3",
            "-t",
            "circular",
            "-c",
            "ocean",
            "--mode",
            "parallel",
            "-b",
            "64",
        ]);
        let config = cli.into_config().unwrap();
        assert_eq!(config.style, VisStyle::Circular);
        assert_eq!(config.color_scheme, ColorScheme::Ocean);
        assert_eq!(config.mode, RunMode::Parallel);
        assert_eq!(config.bar_count, 64);
        assert_eq!(config.fps, 30);
    }

    #[test]
    fn unknown_style_fails_at_parse_time() {
        let result = Cli::try_parse_from(["audiospectrum", "song.mp3", "-t", "cube"]);
        assert!(result.is_err());
    }

    #[test]
    fn out_of_range_bars_fail_validation() {
        let cli = Cli::parse_from(["audiospectrum", "song.mp3", "-b", "4"]);
        assert!(cli.into_config().is_err());
    }
}
