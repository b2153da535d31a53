use super::*;

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn opts() -> StickerEncodeOpts {
    StickerEncodeOpts {
        canvas: Canvas::square(512),
        fps: Fps::whole(15).unwrap(),
        quality: 50,
        max_duration_secs: 3.0,
    }
}

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_ffmpeg").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn frames_args_read_numbered_pngs_at_rate() {
    let args = frames_args(
        Path::new("out/frame_x_%03d.png"),
        Fps::whole(15).unwrap(),
        Canvas::square(512),
        Path::new("out/video_x.mp4"),
    )
    .unwrap();
    let a = strings(&args);
    let pos = |s: &str| a.iter().position(|x| x == s).unwrap();

    assert_eq!(a[pos("-framerate") + 1], "15/1");
    assert!(pos("-framerate") < pos("-i"));
    assert_eq!(a[pos("-i") + 1], "out/frame_x_%03d.png");
    assert_eq!(a[pos("-c:v") + 1], "libx264");
    assert_eq!(a[pos("-pix_fmt") + 1], "yuv420p");
    assert_eq!(a[pos("-r") + 1], "15/1");
    assert_eq!(a[pos("-preset") + 1], "veryfast");
    assert_eq!(a[pos("-s") + 1], "512x512");
    assert!(a.contains(&"-y".to_string()));
    assert_eq!(a.last().unwrap(), "out/video_x.mp4");
}

#[test]
fn sticker_args_loop_forever_without_audio() {
    let args = sticker_args(Path::new("v.mp4"), Path::new("s.webp"), &opts()).unwrap();
    let a = strings(&args);
    let pos = |s: &str| a.iter().position(|x| x == s).unwrap();

    let vf = &a[pos("-vf") + 1];
    assert!(vf.starts_with("scale=512:512:force_original_aspect_ratio=decrease,pad=512:512"));
    assert!(vf.ends_with("fps=15/1,format=rgba"));
    assert_eq!(a[pos("-vcodec") + 1], "libwebp");
    assert_eq!(a[pos("-lossless") + 1], "0");
    assert_eq!(a[pos("-q:v") + 1], "50");
    assert_eq!(a[pos("-loop") + 1], "0");
    assert_eq!(a[pos("-vsync") + 1], "0");
    assert_eq!(a[pos("-t") + 1], "3");
    assert!(a.contains(&"-an".to_string()));
    assert_eq!(a.last().unwrap(), "s.webp");
}

#[test]
fn args_reject_unusable_canvas() {
    let out = Path::new("o.mp4");
    let pat = Path::new("f_%03d.png");
    let fps = Fps::whole(15).unwrap();
    let bad = [
        Canvas::square(0),
        Canvas::square(511),
        Canvas {
            width: 512,
            height: 256,
        },
    ];
    for canvas in bad {
        assert!(matches!(
            frames_args(pat, fps, canvas, out),
            Err(StickerError::Validation(_))
        ));
    }

    let mut o = opts();
    o.quality = 101;
    assert!(sticker_args(out, out, &o).is_err());
    let mut o = opts();
    o.max_duration_secs = f64::NAN;
    assert!(sticker_args(out, out, &o).is_err());
}

#[test]
fn missing_program_is_an_encode_error_and_leaves_no_output() {
    let dir = scratch("missing");
    let out = dir.join("s.webp");
    let enc = FfmpegEncoder::new(dir.join("no-such-ffmpeg"));
    assert!(!enc.is_available());
    let err = enc
        .encode_sticker(&dir.join("v.mp4"), &out, &opts(), None)
        .unwrap_err();
    assert!(matches!(err, StickerError::Encode(_)));
    assert!(!out.exists());
}

#[cfg(unix)]
#[test]
fn scripted_encoder_outcomes() {
    use std::os::unix::fs::PermissionsExt as _;

    let dir = scratch("scripted");
    let script = |name: &str, body: &str| -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&p, std::fs::Permissions::from_mode(0o755)).unwrap();
        p
    };
    // Write every script before spawning any of them.
    let fails = script("fails.sh", "echo boom >&2\nfor last; do :; done\necho partial > \"$last\"\nexit 3");
    let silent = script("silent.sh", "exit 0");
    let writes = script("writes.sh", "for last; do :; done\necho ok > \"$last\"");
    let slow = script("slow.sh", "for last; do :; done\necho partial > \"$last\"\nexec sleep 5");
    let video = dir.join("v.mp4");

    let out = dir.join("fails.webp");
    let err = FfmpegEncoder::new(&fails)
        .encode_sticker(&video, &out, &opts(), None)
        .unwrap_err();
    assert!(matches!(err, StickerError::Encode(_)));
    assert!(err.to_string().contains("boom"));
    assert!(!out.exists());

    let out = dir.join("silent.webp");
    let err = FfmpegEncoder::new(&silent)
        .encode_sticker(&video, &out, &opts(), None)
        .unwrap_err();
    assert!(matches!(err, StickerError::Encode(_)));

    let out = dir.join("writes.webp");
    FfmpegEncoder::new(&writes)
        .encode_sticker(&video, &out, &opts(), None)
        .unwrap();
    assert!(out.exists());

    let out = dir.join("slow.webp");
    let started = Instant::now();
    let err = FfmpegEncoder::new(&slow)
        .encode_sticker(
            &video,
            &out,
            &opts(),
            Some(Instant::now() + Duration::from_millis(300)),
        )
        .unwrap_err();
    assert!(matches!(err, StickerError::Cancelled(_)));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(!out.exists());
}
