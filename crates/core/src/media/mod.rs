//! Decoder and encoder collaborators, both backed by the system ffmpeg
//! binaries rather than in-process codecs. Decoding turns the input file
//! into mono f32 PCM at the analysis sample rate; encoding muxes the
//! rendered frame sequence with the original audio into one video file.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use crate::{Result, VizError};

/// Mono sample rate used for analysis. 22.05 kHz comfortably covers the
/// 80 Hz - 8 kHz band range while keeping FFT windows cheap.
pub const ANALYSIS_SAMPLE_RATE: u32 = 22_050;

pub fn is_ffmpeg_on_path() -> bool {
    tool_responds("ffmpeg")
}

pub fn is_ffprobe_on_path() -> bool {
    tool_responds("ffprobe")
}

fn tool_responds(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Container duration of the input file, in seconds.
pub fn probe_duration(input: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .map_err(|err| VizError::Decode(format!("failed to run ffprobe: {err}")))?;

    if !output.status.success() {
        return Err(VizError::Decode(format!(
            "ffprobe failed for '{}': {}",
            input.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    parse_duration(&String::from_utf8_lossy(&output.stdout))
}

fn parse_duration(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| VizError::Decode(format!("unparseable duration '{}'", text.trim())))
}

/// Decodes `duration` seconds of the input into mono little-endian f32
/// samples at `sample_rate`, streamed over the child's stdout.
pub fn decode_samples(input: &Path, sample_rate: u32, duration: f64) -> Result<Vec<f32>> {
    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args([
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "-t",
            &format!("{duration:.2}"),
            "-loglevel",
            "error",
            "pipe:1",
        ])
        .stdin(Stdio::null())
        .output()
        .map_err(|err| VizError::Decode(format!("failed to run ffmpeg: {err}")))?;

    if !output.status.success() {
        return Err(VizError::Decode(format!(
            "ffmpeg decode failed for '{}': {}",
            input.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(samples_from_f32le(&output.stdout))
}

/// Reinterprets raw little-endian f32 PCM bytes as samples. A trailing
/// partial sample is dropped.
pub fn samples_from_f32le(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Assembles the frame sequence and the original audio into the output
/// video: H.264 at the configured frame rate, AAC audio, stopping at the
/// shorter stream.
pub fn encode_video(frame_dir: &Path, fps: u32, audio: &Path, output_path: &Path) -> Result<()> {
    let output = Command::new("ffmpeg")
        .args(["-framerate", &fps.to_string(), "-i"])
        .arg(frame_dir.join("frame_%06d.png"))
        .arg("-i")
        .arg(audio)
        .args([
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-pix_fmt",
            "yuv420p",
            "-c:a",
            "aac",
            "-b:a",
            "192k",
            "-shortest",
            "-loglevel",
            "error",
            "-y",
        ])
        .arg(output_path)
        .stdin(Stdio::null())
        .output()
        .map_err(|err| VizError::Encode(format!("failed to run ffmpeg: {err}")))?;

    if !output.status.success() {
        return Err(VizError::Encode(format!(
            "ffmpeg encode failed for '{}': {}",
            output_path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f32le_bytes_round_trip() {
        let values = [0.0_f32, 1.0, -0.5, 0.25];
        let mut bytes = Vec::new();
        for value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        assert_eq!(samples_from_f32le(&bytes), values);
    }

    #[test]
    fn trailing_partial_sample_is_dropped() {
        let mut bytes = 1.0_f32.to_le_bytes().to_vec();
        bytes.push(0xFF);
        assert_eq!(samples_from_f32le(&bytes), vec![1.0]);
    }

    #[test]
    fn duration_parsing() {
        assert_eq!(parse_duration("187.432\n").unwrap(), 187.432);
        assert!(parse_duration("N/A").is_err());
        assert!(parse_duration("").is_err());
    }
}
