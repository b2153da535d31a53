use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;

use crate::foundation::error::{StickerError, StickerResult};

/// Opaque per-job identifier. Every file a job writes is named after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(uuid::Uuid);

impl JobId {
    /// Fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// Zero-pad width for frame indices: `max(3, digits(count - 1))`.
pub fn frame_pad_width(count: u64) -> usize {
    count.saturating_sub(1).to_string().len().max(3)
}

/// Directory shared by all jobs; names inside it never collide across jobs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    /// Directory at `root`. Nothing is created until [`ArtifactDir::ensure`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory (recursively) if it does not exist.
    pub fn ensure(&self) -> StickerResult<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            StickerError::io(format!(
                "failed to create output directory '{}': {e}",
                self.root.display()
            ))
        })
    }

    /// `sticker_<job>.png`
    pub fn still_path(&self, job: &JobId) -> PathBuf {
        self.root.join(format!("sticker_{job}.png"))
    }

    /// `video_<job>.mp4`
    pub fn video_path(&self, job: &JobId) -> PathBuf {
        self.root.join(format!("video_{job}.mp4"))
    }

    /// `sticker_<job>.webp`
    pub fn sticker_path(&self, job: &JobId) -> PathBuf {
        self.root.join(format!("sticker_{job}.webp"))
    }

    /// `frame_<job>_<NNN>.png`
    pub fn frame_path(&self, job: &JobId, idx: u64, pad: usize) -> PathBuf {
        self.root.join(format!("frame_{job}_{idx:0pad$}.png"))
    }

    /// printf-style input pattern matching [`ArtifactDir::frame_path`], e.g. `frame_<job>_%03d.png`.
    pub fn frame_pattern(&self, job: &JobId, pad: usize) -> PathBuf {
        self.root.join(format!("frame_{job}_%0{pad}d.png"))
    }

    /// Entries of the directory whose file name contains `job`, sorted.
    pub fn files_for(&self, job: &JobId) -> StickerResult<Vec<PathBuf>> {
        let needle = job.to_string();
        let mut out = Vec::new();
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("read output dir '{}'", self.root.display()))?;
        for entry in entries {
            let path = entry
                .with_context(|| format!("read output dir '{}'", self.root.display()))?
                .path();
            let hit = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(&needle));
            if hit {
                out.push(path);
            }
        }
        out.sort();
        Ok(out)
    }
}

/// Delete `path`, logging instead of failing. A missing file is not an error.
pub fn remove_quietly(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "cleanup failed"),
    }
}

/// Fail with [`StickerError::Cancelled`] once `deadline` has passed.
pub fn check_deadline(deadline: Option<Instant>, stage: &str) -> StickerResult<()> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(StickerError::cancelled(format!(
            "deadline exceeded during {stage}"
        ))),
        _ => Ok(()),
    }
}

/// Frame files of one job. All of them are deleted when the guard drops.
#[derive(Debug, Default)]
pub struct FrameFiles {
    paths: Vec<PathBuf>,
}

impl FrameFiles {
    /// Empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `path` for deletion. Call before writing the file so a failed write is covered too.
    pub fn track(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    /// Tracked paths in index order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of tracked paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Return `true` when nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Drop for FrameFiles {
    fn drop(&mut self) {
        for p in &self.paths {
            remove_quietly(p);
        }
        if !self.paths.is_empty() {
            tracing::debug!(count = self.paths.len(), "frame files removed");
        }
    }
}

/// A single intermediate file deleted on drop unless [`TempFile::keep`] is called.
#[derive(Debug)]
pub struct TempFile {
    path: Option<PathBuf>,
}

impl TempFile {
    /// Guard for `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Guarded path.
    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Disarm the guard and hand the path to the caller.
    pub fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Some(p) = self.path.take() {
            remove_quietly(&p);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/artifacts.rs"]
mod tests;
