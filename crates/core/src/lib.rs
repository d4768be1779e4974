//! Core library for the audio spectrum video generator.
//!
//! The pipeline is split into one module per stage: [`media`] decodes the
//! input into raw samples and later muxes the rendered frames back with the
//! audio, [`analysis`] turns the sample buffer into one magnitude vector per
//! output frame, [`render`] rasterises a single vector deterministically,
//! and [`sched`] fans the frame indices out across a worker pool (or a plain
//! loop). [`generate`] wires the stages together end to end.

pub mod analysis;
pub mod config;
pub mod error;
pub mod media;
pub mod render;
pub mod sched;

pub use analysis::{SpectrumAnalyzer, SpectrumTable};
pub use config::{Background, ColorScheme, Config, RunMode, VisStyle};
pub use error::{Result, VizError};
pub use render::FrameRenderer;
pub use sched::{FrameScheduler, TempFrameDir};

/// Summary of a completed run.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    pub total_frames: usize,
    pub duration_seconds: f64,
    pub output_bytes: u64,
}

/// Runs the whole pipeline: validate, probe, decode, analyse, render,
/// encode. The temporary frame directory lives inside this function and is
/// removed on every exit path, so no partial output survives a failed run.
pub fn generate(config: &Config) -> Result<Report> {
    config.validate()?;

    std::fs::metadata(&config.input).map_err(|source| VizError::MediaAccess {
        path: config.input.clone(),
        source,
    })?;

    if !media::is_ffmpeg_on_path() || !media::is_ffprobe_on_path() {
        return Err(VizError::Decode(
            "ffmpeg and ffprobe are required on PATH".into(),
        ));
    }

    let file_duration = media::probe_duration(&config.input)?;
    let duration = if config.duration > 0.0 && config.duration < file_duration {
        config.duration
    } else {
        file_duration
    };
    let total_frames = (duration * config.fps as f64) as usize;
    tracing::info!(
        input = %config.input.display(),
        duration_seconds = duration,
        total_frames,
        "decoding audio"
    );

    let samples = media::decode_samples(&config.input, media::ANALYSIS_SAMPLE_RATE, duration)?;

    tracing::info!(samples = samples.len(), "precomputing spectrum table");
    let mut analyzer =
        SpectrumAnalyzer::new(media::ANALYSIS_SAMPLE_RATE, config.fps, config.bar_count);
    let table = analyzer.compute_all(&samples, total_frames)?;

    let frames_dir = TempFrameDir::create()?;
    FrameScheduler::new(config, &table).run(frames_dir.path())?;

    tracing::info!(output = %config.output.display(), "assembling video");
    media::encode_video(frames_dir.path(), config.fps, &config.input, &config.output)?;

    let output_bytes = std::fs::metadata(&config.output)?.len();
    Ok(Report {
        total_frames,
        duration_seconds: duration,
        output_bytes,
    })
}
