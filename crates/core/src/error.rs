use std::path::PathBuf;

/// Result alias that carries the custom [`VizError`] type.
pub type Result<T> = std::result::Result<T, VizError>;

/// Common error type for the core crate. Every variant names the pipeline
/// stage that produced it; nothing in this crate retries automatically.
#[derive(Debug, thiserror::Error)]
pub enum VizError {
    /// A configuration value fell outside its allowed range, or a strategy
    /// name did not match any known variant.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The input media file is missing or unreadable.
    #[error("cannot access input file '{}': {source}", path.display())]
    MediaAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decoder collaborator (ffmpeg/ffprobe) failed to produce samples.
    #[error("audio decode failed: {0}")]
    Decode(String),

    /// A single frame failed to render or to be written to disk.
    #[error("frame {frame} failed: {message}")]
    Render { frame: usize, message: String },

    /// The encoder collaborator failed to assemble the final video.
    #[error("video encode failed: {0}")]
    Encode(String),

    /// Wrapper around standard IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Forward-transform failure surfaced by the FFT backend.
    #[error(transparent)]
    Fft(#[from] realfft::FftError),

    /// Image encode/write failure surfaced by the raster backend.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl VizError {
    /// Creates a render-stage error for the given frame index.
    pub fn render<T: Into<String>>(frame: usize, message: T) -> Self {
        Self::Render {
            frame,
            message: message.into(),
        }
    }
}
