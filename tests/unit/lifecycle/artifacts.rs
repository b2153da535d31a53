use std::time::Duration;

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_artifacts").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn job_ids_are_unique_and_compact() {
    let a = JobId::new();
    let b = JobId::new();
    assert_ne!(a, b);
    let s = a.to_string();
    assert_eq!(s.len(), 32);
    assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn pad_width_grows_past_three_digits() {
    assert_eq!(frame_pad_width(1), 3);
    assert_eq!(frame_pad_width(45), 3);
    assert_eq!(frame_pad_width(1000), 3);
    assert_eq!(frame_pad_width(1001), 4);
}

#[test]
fn names_derive_from_job_id() {
    let dir = ArtifactDir::new("out");
    let job = JobId::new();
    assert_eq!(
        dir.still_path(&job),
        PathBuf::from(format!("out/sticker_{job}.png"))
    );
    assert_eq!(
        dir.video_path(&job),
        PathBuf::from(format!("out/video_{job}.mp4"))
    );
    assert_eq!(
        dir.sticker_path(&job),
        PathBuf::from(format!("out/sticker_{job}.webp"))
    );
    assert_eq!(
        dir.frame_path(&job, 7, 3),
        PathBuf::from(format!("out/frame_{job}_007.png"))
    );
    assert_eq!(
        dir.frame_pattern(&job, 4),
        PathBuf::from(format!("out/frame_{job}_%04d.png"))
    );
}

#[test]
fn ensure_creates_nested_directory() {
    let root = scratch("nested").join("a").join("b");
    let dir = ArtifactDir::new(&root);
    dir.ensure().unwrap();
    assert!(root.is_dir());
    dir.ensure().unwrap();
}

#[test]
fn frame_files_are_removed_on_drop() {
    let dir = ArtifactDir::new(scratch("frames"));
    dir.ensure().unwrap();
    let job = JobId::new();
    {
        let mut files = FrameFiles::new();
        for i in 0..3 {
            let p = dir.frame_path(&job, i, 3);
            std::fs::write(&p, b"x").unwrap();
            files.track(p);
        }
        // Tracked but never written.
        files.track(dir.frame_path(&job, 3, 3));
        assert_eq!(dir.files_for(&job).unwrap().len(), 3);
        assert_eq!(files.len(), 4);
    }
    assert!(dir.files_for(&job).unwrap().is_empty());
}

#[test]
fn temp_file_keep_disarms_guard() {
    let dir = ArtifactDir::new(scratch("temp"));
    dir.ensure().unwrap();
    let job = JobId::new();

    let dropped = dir.video_path(&job);
    std::fs::write(&dropped, b"x").unwrap();
    drop(TempFile::new(dropped.clone()));
    assert!(!dropped.exists());

    let kept = dir.still_path(&job);
    std::fs::write(&kept, b"x").unwrap();
    let guard = TempFile::new(kept.clone());
    assert_eq!(guard.path(), kept.as_path());
    assert_eq!(guard.keep(), kept);
    assert!(kept.exists());
}

#[test]
fn remove_quietly_ignores_missing_files() {
    remove_quietly(Path::new("target/unit_artifacts/definitely_missing.png"));
}

#[test]
fn deadline_check() {
    assert!(check_deadline(None, "test").is_ok());
    let later = Instant::now() + Duration::from_secs(3600);
    assert!(check_deadline(Some(later), "test").is_ok());
    let past = Instant::now();
    let err = check_deadline(Some(past), "frames").unwrap_err();
    assert!(matches!(err, StickerError::Cancelled(_)));
    assert!(err.to_string().contains("frames"));
}
