//! Frame scheduling: drives the renderer across every frame index, either
//! one at a time or through a worker pool. Filenames embed the zero-padded
//! frame index, so completion order never affects the encoded result; the
//! only obligations are "every index exactly once" and surfacing the first
//! failure after in-flight work drains.

use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use rayon::prelude::*;

use crate::{
    analysis::SpectrumTable,
    config::{Config, RunMode},
    render::FrameRenderer,
    Result, VizError,
};

/// How often (in frames) progress is reported.
const PROGRESS_EVERY: usize = 30;

/// Output path for one frame index: sortable, zero padded to six digits.
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:06}.png"))
}

/// Process-private scratch directory for rendered frames. Removed on drop,
/// whatever the outcome of the run, so partial frame sets never leak.
#[derive(Debug)]
pub struct TempFrameDir {
    path: PathBuf,
}

impl TempFrameDir {
    pub fn create() -> Result<Self> {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let path = std::env::temp_dir().join(format!(
            "spectrum_frames_{}_{}",
            std::process::id(),
            nanos
        ));
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFrameDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Drives [`FrameRenderer`] over the closed index range `[0, table.len())`.
/// The spectrum table and configuration are frozen before scheduling starts,
/// so workers share them read-only and need no locks.
pub struct FrameScheduler<'a> {
    config: &'a Config,
    table: &'a SpectrumTable,
}

impl<'a> FrameScheduler<'a> {
    pub fn new(config: &'a Config, table: &'a SpectrumTable) -> Self {
        Self { config, table }
    }

    /// Renders and writes every frame into `dir`.
    pub fn run(&self, dir: &Path) -> Result<()> {
        match self.config.mode {
            RunMode::Sequential => self.run_sequential(dir),
            RunMode::Parallel => self.run_parallel(dir),
        }
    }

    fn run_sequential(&self, dir: &Path) -> Result<()> {
        let total = self.table.len();
        for index in 0..total {
            if index % PROGRESS_EVERY == 0 {
                tracing::info!(frame = index, total, "rendering frames");
            }
            self.render_and_write(index, dir)?;
        }
        Ok(())
    }

    fn run_parallel(&self, dir: &Path) -> Result<()> {
        let total = self.table.len();
        tracing::info!(
            workers = rayon::current_num_threads(),
            total,
            "rendering frames in parallel"
        );

        let completed = AtomicUsize::new(0);
        (0..total).into_par_iter().try_for_each(|index| {
            self.render_and_write(index, dir)?;
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_EVERY == 0 {
                tracing::info!(frames = done, total, "rendered");
            }
            Ok(())
        })
    }

    fn render_and_write(&self, index: usize, dir: &Path) -> Result<()> {
        let magnitudes = self
            .table
            .frame(index)
            .ok_or_else(|| VizError::render(index, "no spectrum column for frame"))?;

        let image = FrameRenderer::new(self.config).render(magnitudes);
        image
            .save(frame_path(dir, index))
            .map_err(|err| VizError::render(index, err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SpectrumAnalyzer;
    use crate::config::{ColorScheme, VisStyle};

    fn table(frames: usize, bars: usize) -> SpectrumTable {
        let samples: Vec<f32> = (0..22_050)
            .map(|i| (i as f32 * 0.1).sin() * 0.5 + (i as f32 * 0.013).sin() * 0.3)
            .collect();
        SpectrumAnalyzer::new(22_050, 30, bars)
            .compute_all(&samples, frames)
            .unwrap()
    }

    fn config(mode: RunMode) -> Config {
        Config {
            input: "song.mp3".into(),
            width: 320,
            height: 240,
            bar_count: 16,
            style: VisStyle::Mirror,
            color_scheme: ColorScheme::Fire,
            mode,
            ..Config::default()
        }
    }

    #[test]
    fn frame_paths_are_zero_padded_and_sortable() {
        let dir = Path::new("/tmp/frames");
        assert_eq!(
            frame_path(dir, 7),
            Path::new("/tmp/frames/frame_000007.png")
        );
        let early = frame_path(dir, 99);
        let late = frame_path(dir, 100);
        assert!(early < late);
    }

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let dir = TempFrameDir::create().unwrap();
        let path = dir.path().to_path_buf();
        assert!(path.is_dir());
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn temp_dir_removal_survives_leftover_files() {
        let dir = TempFrameDir::create().unwrap();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("frame_000000.png"), b"partial").unwrap();
        drop(dir);
        assert!(!path.exists());
    }

    #[test]
    fn sequential_and_parallel_runs_are_byte_identical() {
        let table = table(8, 16);

        let seq_cfg = config(RunMode::Sequential);
        let seq_dir = TempFrameDir::create().unwrap();
        FrameScheduler::new(&seq_cfg, &table)
            .run(seq_dir.path())
            .unwrap();

        let par_cfg = config(RunMode::Parallel);
        let par_dir = TempFrameDir::create().unwrap();
        FrameScheduler::new(&par_cfg, &table)
            .run(par_dir.path())
            .unwrap();

        for index in 0..table.len() {
            let seq_bytes = std::fs::read(frame_path(seq_dir.path(), index)).unwrap();
            let par_bytes = std::fs::read(frame_path(par_dir.path(), index)).unwrap();
            assert_eq!(seq_bytes, par_bytes, "frame {index} differs between modes");
        }
    }

    #[test]
    fn every_index_is_written_exactly_once() {
        let table = table(5, 16);
        let cfg = config(RunMode::Parallel);
        let dir = TempFrameDir::create().unwrap();
        FrameScheduler::new(&cfg, &table).run(dir.path()).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        assert_eq!(
            names,
            (0..5).map(|i| format!("frame_{i:06}.png")).collect::<Vec<_>>()
        );
    }
}
