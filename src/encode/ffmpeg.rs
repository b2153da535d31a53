use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::encode::encoder::{Encoder, StickerEncodeOpts};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{StickerError, StickerResult};
use crate::lifecycle::artifacts::TempFile;
use crate::render::frames::FrameSequence;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

type StderrDrain = std::thread::JoinHandle<std::io::Result<Vec<u8>>>;

/// [`Encoder`] that runs the system `ffmpeg` once per call.
#[derive(Clone, Debug)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegEncoder {
    /// Encoder invoking `program` (a bare name is looked up on `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executable this encoder runs.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Return `true` when `<program> -version` runs successfully.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn run(&self, args: Vec<OsString>, out: &Path, deadline: Option<Instant>) -> StickerResult<()> {
        ensure_parent_dir(out)?;
        // Removes a partial output unless the run succeeds.
        let output = TempFile::new(out.to_path_buf());

        tracing::debug!(
            program = %self.program.display(),
            args = ?args,
            "spawning encoder"
        );
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                StickerError::encode(format!(
                    "failed to spawn '{}' (is it installed and on PATH?): {e}",
                    self.program.display()
                ))
            })?;

        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| StickerError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let drain: StderrDrain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        let status = wait_until(&mut child, deadline);
        let stderr_bytes = join_drain(drain)?;
        let status = status?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(StickerError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        if !out.exists() {
            return Err(StickerError::encode(format!(
                "ffmpeg reported success but '{}' was not written",
                out.display()
            )));
        }

        output.keep();
        Ok(())
    }
}

impl Encoder for FfmpegEncoder {
    #[tracing::instrument(skip_all, fields(job = %frames.job(), frames = frames.len()))]
    fn encode_frames(
        &self,
        frames: &FrameSequence,
        out: &Path,
        deadline: Option<Instant>,
    ) -> StickerResult<()> {
        if frames.is_empty() {
            return Err(StickerError::validation("frame sequence is empty"));
        }
        let args = frames_args(frames.pattern(), frames.fps(), frames.canvas(), out)?;
        self.run(args, out, deadline)
    }

    #[tracing::instrument(skip_all, fields(video = %video.display()))]
    fn encode_sticker(
        &self,
        video: &Path,
        out: &Path,
        opts: &StickerEncodeOpts,
        deadline: Option<Instant>,
    ) -> StickerResult<()> {
        let args = sticker_args(video, out, opts)?;
        self.run(args, out, deadline)
    }
}

/// Wait for `child`, killing it once `deadline` passes.
fn wait_until(child: &mut Child, deadline: Option<Instant>) -> StickerResult<ExitStatus> {
    loop {
        let polled = child
            .try_wait()
            .map_err(|e| StickerError::encode(format!("failed to wait for ffmpeg: {e}")))?;
        if let Some(status) = polled {
            return Ok(status);
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "failed to kill ffmpeg");
            }
            if let Err(e) = child.wait() {
                tracing::warn!(error = %e, "failed to reap killed ffmpeg");
            }
            return Err(StickerError::cancelled("deadline exceeded while encoding"));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn join_drain(drain: StderrDrain) -> StickerResult<Vec<u8>> {
    drain
        .join()
        .map_err(|_| StickerError::encode("ffmpeg stderr drain thread panicked"))?
        .map_err(|e| StickerError::encode(format!("ffmpeg stderr read failed: {e}")))
}

fn square_size(canvas: Canvas) -> StickerResult<u32> {
    if canvas.width == 0 || canvas.width != canvas.height {
        return Err(StickerError::validation(format!(
            "encoder canvas must be a non-empty square, got {}x{}",
            canvas.width, canvas.height
        )));
    }
    if !canvas.width.is_multiple_of(2) {
        return Err(StickerError::validation(
            "encoder canvas size must be even (required for yuv420p output)",
        ));
    }
    Ok(canvas.width)
}

/// Arguments for encoding numbered PNG frames into an H.264 MP4.
pub fn frames_args(
    pattern: &Path,
    fps: Fps,
    canvas: Canvas,
    out: &Path,
) -> StickerResult<Vec<OsString>> {
    let size = square_size(canvas)?;
    let rate = fps.ffmpeg_rate();
    let mut args: Vec<OsString> = ["-loglevel", "error", "-y", "-framerate", rate.as_str(), "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(pattern.as_os_str().to_owned());
    args.extend(
        [
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-r",
            rate.as_str(),
            "-preset",
            "veryfast",
            "-s",
            format!("{size}x{size}").as_str(),
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    Ok(args)
}

/// Arguments for re-encoding a video into a looping lossy WebP sticker.
pub fn sticker_args(
    video: &Path,
    out: &Path,
    opts: &StickerEncodeOpts,
) -> StickerResult<Vec<OsString>> {
    let size = square_size(opts.canvas)?;
    if opts.quality > 100 {
        return Err(StickerError::validation("sticker quality must be in 0..=100"));
    }
    if !opts.max_duration_secs.is_finite() || opts.max_duration_secs <= 0.0 {
        return Err(StickerError::validation(
            "sticker max duration must be finite and > 0",
        ));
    }
    let filter = format!(
        "scale={size}:{size}:force_original_aspect_ratio=decrease,\
         pad={size}:{size}:(ow-iw)/2:(oh-ih)/2:color=0x00000000,\
         fps={},format=rgba",
        opts.fps.ffmpeg_rate()
    );

    let mut args: Vec<OsString> = ["-loglevel", "error", "-y", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(video.as_os_str().to_owned());
    args.extend(
        [
            "-vf",
            filter.as_str(),
            "-vcodec",
            "libwebp",
            "-lossless",
            "0",
            "-q:v",
            opts.quality.to_string().as_str(),
            "-preset",
            "default",
            "-loop",
            "0",
            "-an",
            "-vsync",
            "0",
            "-t",
            opts.max_duration_secs.to_string().as_str(),
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    Ok(args)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> StickerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    FfmpegEncoder::default().is_available()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
