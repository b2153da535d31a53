use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::assets::background::{Background, BackgroundPool, Gradient};
use crate::config::{StudioConfig, validate_duration};
use crate::encode::encoder::{Encoder, StickerEncodeOpts};
use crate::encode::ffmpeg::FfmpegEncoder;
use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::StickerResult;
use crate::glyph::cache::CachedGlyphProvider;
use crate::glyph::provider::{GlyphProvider, RemoteGlyphProvider, http_agent};
use crate::layout::compositor::{LayoutTrace, TextStyle};
use crate::lifecycle::artifacts::{ArtifactDir, JobId, TempFile, check_deadline};
use crate::render::canvas::FrameRGBA;
use crate::render::frames::synthesize_frames;
use crate::render::still::{Scene, render_still};
use crate::text::font::FontEngine;

/// Per-call overrides for an animated job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct JobOptions {
    /// Clip length in seconds; the config default when `None`.
    pub duration_secs: Option<f64>,
    /// Frames per second; the config default when `None`.
    pub fps: Option<u32>,
    /// Point in time after which the job is cancelled.
    pub deadline: Option<Instant>,
}

impl JobOptions {
    /// Cancel the job once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }
}

/// Entry point for sticker synthesis. Each call is one render job that returns one artifact path.
///
/// `Studio` is `Send + Sync`; jobs on different threads share the output directory without
/// colliding because every file name carries the job's [`JobId`]. Jobs share one font engine,
/// locked per shaped run; glyph fetches and rasterization run unlocked.
pub struct Studio {
    cfg: StudioConfig,
    style: TextStyle,
    artifacts: ArtifactDir,
    pool: BackgroundPool,
    agent: ureq::Agent,
    fonts: Mutex<FontEngine>,
    glyphs: Box<dyn GlyphProvider>,
    encoder: Box<dyn Encoder>,
}

impl Studio {
    /// Studio with the remote glyph provider and the system `ffmpeg`.
    pub fn new(cfg: StudioConfig) -> StickerResult<Self> {
        cfg.validate()?;
        let agent = http_agent(cfg.http_timeout());
        let remote = RemoteGlyphProvider::new(agent.clone(), cfg.glyph_url_template.clone())?;
        let glyphs: Box<dyn GlyphProvider> = match NonZeroUsize::new(cfg.glyph_cache_capacity) {
            Some(cap) => Box::new(CachedGlyphProvider::new(remote, cap)),
            None => Box::new(remote),
        };
        let encoder = Box::new(FfmpegEncoder::new(cfg.ffmpeg_path.clone()));
        Self::assemble(cfg, agent, glyphs, encoder)
    }

    /// Studio over caller-supplied glyph and encoder capabilities.
    pub fn with_parts(
        cfg: StudioConfig,
        glyphs: Box<dyn GlyphProvider>,
        encoder: Box<dyn Encoder>,
    ) -> StickerResult<Self> {
        cfg.validate()?;
        let agent = http_agent(cfg.http_timeout());
        Self::assemble(cfg, agent, glyphs, encoder)
    }

    fn assemble(
        cfg: StudioConfig,
        agent: ureq::Agent,
        glyphs: Box<dyn GlyphProvider>,
        encoder: Box<dyn Encoder>,
    ) -> StickerResult<Self> {
        let fonts = match &cfg.font_path {
            Some(path) => FontEngine::from_path(path)?,
            None => FontEngine::bundled()?,
        };
        let style = TextStyle {
            font_size_px: cfg.font_size_px,
            line_height: cfg.line_height_px,
            color: Rgba8::from_hex(&cfg.text_color)?,
        };
        Ok(Self {
            style,
            artifacts: ArtifactDir::new(cfg.out_dir.clone()),
            pool: BackgroundPool::new(cfg.background_pool.clone()),
            agent,
            fonts: Mutex::new(fonts),
            glyphs,
            encoder,
            cfg,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.cfg
    }

    /// Output directory.
    pub fn artifacts(&self) -> &ArtifactDir {
        &self.artifacts
    }

    fn canvas(&self) -> Canvas {
        self.cfg.canvas()
    }

    fn still_background(&self) -> StickerResult<Background> {
        self.pool
            .select(&mut rand::thread_rng(), &self.agent, self.canvas())
    }

    /// Animated jobs without a usable image always get the dark teal gradient.
    fn animated_background(&self) -> StickerResult<Background> {
        self.pool.select_or(
            &mut rand::thread_rng(),
            &self.agent,
            self.canvas(),
            Gradient::LOAD_FAILURE,
        )
    }

    fn scene<'a>(&'a self, background: &'a Background) -> Scene<'a> {
        Scene {
            canvas: self.canvas(),
            background,
            fonts: &self.fonts,
            glyphs: self.glyphs.as_ref(),
            glyph_separator: &self.cfg.glyph_separator,
            style: self.style,
        }
    }

    /// Render the still sticker in memory without touching the output directory.
    pub fn render_still(&self, text: &str) -> StickerResult<(FrameRGBA, LayoutTrace)> {
        let background = self.still_background()?;
        render_still(&self.scene(&background), text)
    }

    /// Render a still sticker to `sticker_<job>.png` and return its path.
    #[tracing::instrument(skip_all, fields(job = tracing::field::Empty))]
    pub fn image_sticker(&self, text: &str) -> StickerResult<PathBuf> {
        let job = JobId::new();
        tracing::Span::current().record("job", tracing::field::display(&job));

        self.artifacts.ensure()?;
        let (frame, trace) = self.render_still(text)?;
        tracing::debug!(units = trace.units.len(), lines = trace.line_count(), "still laid out");

        let out = TempFile::new(self.artifacts.still_path(&job));
        frame.write_png(out.path())?;
        Ok(out.keep())
    }

    /// Render an animated clip to `video_<job>.mp4` and return its path.
    #[tracing::instrument(skip_all, fields(job = tracing::field::Empty))]
    pub fn video(&self, text: &str, opts: JobOptions) -> StickerResult<PathBuf> {
        let job = JobId::new();
        tracing::Span::current().record("job", tracing::field::display(&job));

        let (video, _) = self.encode_video(job, text, opts)?;
        Ok(video.keep())
    }

    /// Render an animated clip and re-encode it to a looping `sticker_<job>.webp`.
    ///
    /// The intermediate video is deleted whether or not the re-encode succeeds.
    #[tracing::instrument(skip_all, fields(job = tracing::field::Empty))]
    pub fn animated_sticker(&self, text: &str, opts: JobOptions) -> StickerResult<PathBuf> {
        let job = JobId::new();
        tracing::Span::current().record("job", tracing::field::display(&job));

        let (video, fps) = self.encode_video(job, text, opts)?;
        check_deadline(opts.deadline, "sticker encode")?;

        let out = TempFile::new(self.artifacts.sticker_path(&job));
        let sticker = StickerEncodeOpts {
            canvas: self.canvas(),
            fps,
            quality: self.cfg.sticker.quality,
            max_duration_secs: self.cfg.sticker.max_duration_secs,
        };
        self.encoder
            .encode_sticker(video.path(), out.path(), &sticker, opts.deadline)?;
        drop(video);
        Ok(out.keep())
    }

    /// Frames, then video. Frame files are gone by the time this returns, on every path.
    fn encode_video(
        &self,
        job: JobId,
        text: &str,
        opts: JobOptions,
    ) -> StickerResult<(TempFile, Fps)> {
        let duration = opts.duration_secs.unwrap_or(self.cfg.video.duration_secs);
        validate_duration(duration, "duration")?;
        let fps = Fps::whole(opts.fps.unwrap_or(self.cfg.video.fps))?;
        check_deadline(opts.deadline, "job start")?;

        self.artifacts.ensure()?;
        let background = self.animated_background()?;
        let frames = synthesize_frames(
            &self.scene(&background),
            text,
            &self.artifacts,
            job,
            duration,
            fps,
            opts.deadline,
        )?;
        check_deadline(opts.deadline, "video encode")?;

        let video = TempFile::new(self.artifacts.video_path(&job));
        tracing::debug!(frames = frames.len(), out = %video.path().display(), "encoding video");
        self.encoder
            .encode_frames(&frames, video.path(), opts.deadline)?;
        drop(frames);
        Ok((video, fps))
    }
}

#[cfg(test)]
#[path = "../tests/unit/studio/studio.rs"]
mod tests;
