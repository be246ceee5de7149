//! Run Binding Tests
//!
//! Relocation into the run tree, destination naming, and run serialization.

use crate::*;
use mediabind::{Audio, Error, Image, Media, Run, Video};
use mediabind_core::sha256_bytes;
use serde_json::json;

// =============================================================================
// DESTINATION NAMING
// =============================================================================

#[test]
fn test_end_to_end_bind_and_serialize() {
    let (_tmp, run) = create_run();
    let mut media = Media::<Image>::from_bytes(b"0123456789", "png").unwrap();
    let staged = media.path().unwrap().to_path_buf();
    let hash = sha256_bytes(b"0123456789");
    let expected = format!("media/images/img_0_{}.png", hash.prefix(20));

    media.bind_to_run(&run, "img", 0, None).unwrap();

    assert!(run.directory().join(&expected).is_file());
    assert!(!staged.exists(), "staged file should have been moved");
    assert!(!media.is_tmp());
    assert_eq!(run.tracked_files(), vec![expected.clone()]);

    let desc = media.serialize_for_run(&run).unwrap();
    assert_eq!(
        serde_json::to_value(&desc).unwrap(),
        json!({
            "_type": "file",
            "path": expected,
            "sha256": hash.as_str(),
            "size": 10,
        })
    );
}

#[test]
fn test_explicit_id_and_step_in_filename() {
    let (tmp, run) = create_run();
    let src = write_file(tmp.path(), "clip.mp4", b"frames");
    let mut media = Media::<Video>::from_path(&src).unwrap();

    media.bind_to_run(&run, "rollout", "final", Some("7")).unwrap();

    assert_eq!(run.tracked_files(), vec!["media/videos/rollout_final_7.mp4"]);
    assert!(run
        .directory()
        .join("media/videos/rollout_final_7.mp4")
        .is_file());
}

#[test]
fn test_caller_owned_file_is_copied() {
    let (tmp, run) = create_run();
    let src = write_file(tmp.path(), "voice.wav", b"samples");
    let mut media = Media::<Audio>::from_path(&src).unwrap();

    media.bind_to_run(&run, "voice", 2, Some("a")).unwrap();

    let dest = run.directory().join("media/audio/voice_2_a.wav");
    assert!(src.is_file(), "original must stay in place");
    assert!(dest.is_file());
    assert_eq!(fs::read(&dest).unwrap(), b"samples");
    assert_eq!(media.path(), Some(dest.as_path()));
}

#[test]
fn test_file_without_extension() {
    let (tmp, run) = create_run();
    let src = write_file(tmp.path(), "raw", b"bytes");
    let mut media = Media::<Image>::from_path(&src).unwrap();

    media.bind_to_run(&run, "raw", 1, Some("x")).unwrap();
    assert_eq!(run.tracked_files(), vec!["media/images/raw_1_x"]);
}

// =============================================================================
// PRECONDITIONS
// =============================================================================

#[test]
fn test_bind_unattached_fails_not_staged() {
    let (_tmp, run) = create_run();
    let mut media = Media::<Image>::new();
    let err = media.bind_to_run(&run, "img", 0, None).unwrap_err();
    assert!(err.is_not_staged());
    assert!(run.tracked_files().is_empty());
}

#[test]
fn test_bind_to_second_run_is_rejected() {
    let (tmp, first) = create_run();
    let second = LocalRun::create(tmp.path()).unwrap();
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let mut media = Media::<Image>::from_path(&src).unwrap();

    media.bind_to_run(&first, "img", 0, None).unwrap();
    let bound_path = media.path().unwrap().to_path_buf();

    let err = media.bind_to_run(&second, "img", 0, None).unwrap_err();
    assert!(err.is_run_mismatch());
    assert_eq!(media.path(), Some(bound_path.as_path()));
    assert!(second.tracked_files().is_empty());
}

#[test]
fn test_serialize_for_run_requires_binding() {
    let (tmp, run) = create_run();
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let media = Media::<Image>::from_path(&src).unwrap();

    let err = media.serialize_for_run(&run).unwrap_err();
    assert!(matches!(err, Error::NotBound));
}

#[test]
fn test_serialize_for_other_run_is_rejected() {
    let (tmp, run) = create_run();
    let other = LocalRun::create(tmp.path()).unwrap();
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let mut media = Media::<Image>::from_path(&src).unwrap();
    media.bind_to_run(&run, "img", 0, None).unwrap();

    let err = media.serialize_for_run(&other).unwrap_err();
    assert!(matches!(
        err,
        Error::RunMismatch { bound, requested } if bound == run.id() && requested == other.id()
    ));
}

// =============================================================================
// ARTIFACT LINKS
// =============================================================================

#[test]
fn test_run_descriptor_links_to_logged_artifact_entry() {
    let (tmp, run) = create_run();
    let artifact = Arc::new(
        LocalArtifact::create_in_sequence("table:v0", "table", tmp.path().join("art")).unwrap(),
    );
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let mut media = Media::<Image>::from_path(&src).unwrap();
    media.bind_to_run(&run, "img", 0, None).unwrap();
    media.set_artifact_target(as_dyn(&artifact), "samples/row0");

    // Not addressable until finalized
    let desc = media.serialize_for_run(&run).unwrap();
    assert!(desc.artifact_path.is_none());
    assert!(desc.latest_artifact_path.is_none());

    artifact.finalize().unwrap();
    let desc = media.serialize_for_run(&run).unwrap();
    assert_eq!(
        desc.artifact_path.as_deref(),
        Some(
            format!(
                "artifact://{}/samples/row0.image-file.json",
                artifact.id().simple()
            )
            .as_str()
        )
    );
    assert_eq!(
        desc.latest_artifact_path.as_deref(),
        Some("artifact://table:latest/samples/row0.image-file.json")
    );
}

#[test]
fn test_run_descriptor_skips_dropped_artifact() {
    let (tmp, run) = create_run();
    let artifact = create_artifact(tmp.path(), "gone");
    artifact.finalize().unwrap();
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let mut media = Media::<Image>::from_path(&src).unwrap();
    media.bind_to_run(&run, "img", 0, None).unwrap();
    media.set_artifact_target(as_dyn(&artifact), "row");

    drop(artifact);
    let desc = media.serialize_for_run(&run).unwrap();
    assert!(desc.artifact_path.is_none());
}
