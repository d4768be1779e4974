use std::{f32::consts::PI, fmt, sync::Arc};

use realfft::{RealFftPlanner, RealToComplex};

use crate::Result;

/// Analysis window length in samples. 2048 at 22.05 kHz gives a bin width of
/// roughly 10.8 Hz, enough to resolve the 80 Hz lower band edge.
pub const DEFAULT_WINDOW_SIZE: usize = 2048;

/// Lower edge of the binned frequency range, in Hz.
const MIN_FREQ: f64 = 80.0;
/// Upper edge of the binned frequency range, in Hz.
const MAX_FREQ: f64 = 8000.0;

/// Blend factor for temporal smoothing: how much of the current frame
/// survives versus the previous (already smoothed) frame.
const SMOOTHING_CURRENT: f32 = 0.85;
const SMOOTHING_PREVIOUS: f32 = 0.15;

/// Ordered table of per-frame band magnitudes. Row index is the output frame
/// number; every row has exactly `bar_count` values in `[0, 1]`. Produced
/// once, then shared read-only with every renderer invocation.
#[derive(Debug, Clone, Default)]
pub struct SpectrumTable {
    frames: Vec<Vec<f32>>,
    bar_count: usize,
}

impl SpectrumTable {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn bar_count(&self) -> usize {
        self.bar_count
    }

    /// Magnitude vector for one output frame.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f32]> {
        self.frames.iter().map(Vec::as_slice)
    }
}

/// Turns a flat mono sample buffer into one magnitude vector per output
/// frame: Hamming-tapered short-time FFT, log-spaced perceptual band
/// averaging, log compression, then in-order temporal smoothing.
pub struct SpectrumAnalyzer {
    sample_rate: u32,
    fps: u32,
    bar_count: usize,
    window_size: usize,
    planner: RealFftPlanner<f32>,
}

impl SpectrumAnalyzer {
    pub fn new(sample_rate: u32, fps: u32, bar_count: usize) -> Self {
        Self::with_window_size(sample_rate, fps, bar_count, DEFAULT_WINDOW_SIZE)
    }

    pub fn with_window_size(
        sample_rate: u32,
        fps: u32,
        bar_count: usize,
        window_size: usize,
    ) -> Self {
        Self {
            sample_rate,
            fps,
            bar_count,
            window_size,
            planner: RealFftPlanner::new(),
        }
    }

    /// Logarithmically spaced band edges in Hz, `bar_count + 1` entries
    /// spanning [`MIN_FREQ`], [`MAX_FREQ`].
    pub fn band_edges(&self) -> Vec<f64> {
        (0..=self.bar_count)
            .map(|i| MIN_FREQ * (MAX_FREQ / MIN_FREQ).powf(i as f64 / self.bar_count as f64))
            .collect()
    }

    /// Computes the whole table in frame order. Smoothing makes row `f`
    /// depend on the already smoothed row `f - 1`, so this loop is the one
    /// place in the pipeline where frame order matters.
    pub fn compute_all(&mut self, samples: &[f32], total_frames: usize) -> Result<SpectrumTable> {
        let plan: Arc<dyn RealToComplex<f32>> = self.planner.plan_fft_forward(self.window_size);
        let mut input = plan.make_input_vec();
        let mut spectrum = plan.make_output_vec();
        let mut scratch = plan.make_scratch_vec();

        let hop = (self.sample_rate / self.fps) as usize;
        let half = self.window_size / 2;
        let band_ranges = self.band_bin_ranges(half);

        let mut frames: Vec<Vec<f32>> = Vec::with_capacity(total_frames);
        let mut magnitudes = vec![0.0_f32; half];

        for frame in 0..total_frames {
            self.fill_window(&mut input, samples, frame * hop);
            plan.process_with_scratch(&mut input, &mut spectrum, &mut scratch)?;

            // realfft yields half + 1 bins; the trailing Nyquist bin is
            // outside the 8 kHz band range and is dropped.
            for (slot, bin) in magnitudes.iter_mut().zip(spectrum.iter()) {
                *slot = bin.norm();
            }

            let mut bands = self.bin_bands(&magnitudes, &band_ranges);

            if let Some(previous) = frames.last() {
                for (value, prev) in bands.iter_mut().zip(previous.iter()) {
                    *value = *value * SMOOTHING_CURRENT + prev * SMOOTHING_PREVIOUS;
                }
            }

            frames.push(bands);
        }

        Ok(SpectrumTable {
            frames,
            bar_count: self.bar_count,
        })
    }

    /// Copies one hop-aligned window out of the sample buffer, zero padding
    /// past the end.
    fn fill_window(&self, window: &mut [f32], samples: &[f32], start: usize) {
        window.fill(0.0);
        if start < samples.len() {
            let end = (start + self.window_size).min(samples.len());
            window[..end - start].copy_from_slice(&samples[start..end]);
        }

        let denom = (self.window_size - 1) as f32;
        for (i, value) in window.iter_mut().enumerate() {
            *value *= 0.54 - 0.46 * (2.0 * PI * i as f32 / denom).cos();
        }
    }

    /// FFT bin index range (inclusive, clamped) covered by each band.
    fn band_bin_ranges(&self, bin_count: usize) -> Vec<(usize, usize)> {
        let edges = self.band_edges();
        let bin_width = self.sample_rate as f64 / self.window_size as f64;
        let clamp = |freq: f64| ((freq / bin_width) as usize).min(bin_count - 1);
        edges
            .windows(2)
            .map(|pair| (clamp(pair[0]), clamp(pair[1])))
            .collect()
    }

    /// Averages FFT magnitudes into perceptual bands, then normalises and
    /// log-compresses each band into [0, 1]. A band whose frequency range
    /// covers no FFT bin stays 0.
    fn bin_bands(&self, magnitudes: &[f32], ranges: &[(usize, usize)]) -> Vec<f32> {
        ranges
            .iter()
            .map(|&(start, end)| {
                let slice = &magnitudes[start..=end];
                let mean = slice.iter().sum::<f32>() / slice.len() as f32;
                let normalised = mean / self.window_size as f32;
                if normalised > 0.0 {
                    ((normalised * 1000.0 + 1.0).log10() / 3.0).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

impl fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("sample_rate", &self.sample_rate)
            .field("fps", &self.fps)
            .field("bar_count", &self.bar_count)
            .field("window_size", &self.window_size)
            .finish()
    }
}
