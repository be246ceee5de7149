//! Reconstruct Tests
//!
//! Rebuilding media from artifact descriptors, and logging reconstructed
//! media into another artifact as a reference.

use crate::*;
use mediabind::bundle::{ArtifactBundleReader, ArtifactBundleWriter, BUNDLE_EXTENSION};
use mediabind::{ArtifactDescriptor, Audio, Image, Media, PublicArtifact};
use mediabind_core::sha256_bytes;

#[test]
fn test_reconstruct_from_descriptor() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let src = write_file(tmp.path(), "Photo.PNG", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();
    artifact.finalize().unwrap();

    let media = Media::<Image>::reconstruct(&desc, as_dyn(&artifact)).unwrap();
    assert_eq!(media.sha256(), desc.sha256.as_ref());
    assert_eq!(media.kind().format.as_deref(), Some("png"));
    assert!(media.path().unwrap().starts_with(artifact.root()));
    assert!(!media.is_tmp());

    let source = media.artifact_source().unwrap();
    assert_eq!(Some(source.name()), desc.path.as_deref());
    assert!(source.artifact().is_some());
}

#[test]
fn test_reconstruct_rejects_wrong_type() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();

    let err = Media::<Audio>::reconstruct(&desc, as_dyn(&artifact)).unwrap_err();
    assert!(err.is_precondition());
}

#[test]
fn test_reconstruct_missing_entry_is_source_unavailable() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let desc = ArtifactDescriptor {
        path: Some("media/images/missing.png".to_string()),
        sha256: None,
        type_tag: "image-file".to_string(),
    };

    let err = Media::<Image>::reconstruct(&desc, as_dyn(&artifact)).unwrap_err();
    assert!(err.is_source_unavailable());
}

#[test]
fn test_reconstruct_detects_content_mismatch() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let mut desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();
    desc.sha256 = Some(sha256_bytes(b"something else"));

    let err = Media::<Image>::reconstruct(&desc, as_dyn(&artifact)).unwrap_err();
    assert!(err.is_source_unavailable());
}

#[test]
fn test_reconstructed_media_logged_as_reference() {
    let tmp = TempDir::new().unwrap();
    let source = create_artifact(tmp.path(), "source");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*source)
        .unwrap();
    source.finalize().unwrap();

    let media = Media::<Image>::reconstruct(&desc, as_dyn(&source)).unwrap();
    let derived = create_artifact(tmp.path(), "derived");
    let derived_desc = media.serialize_for_artifact(&*derived).unwrap();

    let name = desc.path.clone().unwrap();
    assert_eq!(derived_desc.path.as_deref(), Some(name.as_str()));
    assert_eq!(derived_desc.sha256, desc.sha256);

    let entry = derived.entry(&name).unwrap();
    let expected_url = source.get_path(&name).unwrap().ref_url();
    assert_eq!(entry.ref_uri.as_deref(), Some(expected_url.as_str()));
}

#[test]
fn test_logging_after_source_dropped_is_source_unavailable() {
    let tmp = TempDir::new().unwrap();
    let source = create_artifact(tmp.path(), "source");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*source)
        .unwrap();
    source.finalize().unwrap();

    let media = Media::<Image>::reconstruct(&desc, as_dyn(&source)).unwrap();
    drop(source);

    let derived = create_artifact(tmp.path(), "derived");
    let err = media.serialize_for_artifact(&*derived).unwrap_err();
    assert!(err.is_source_unavailable());
}

#[test]
fn test_reconstruct_from_unpacked_bundle() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "portable");
    let clip = Media::<Audio>::from_bytes(b"RIFF....WAVE", "wav").unwrap();
    let desc = clip.serialize_for_artifact(&*artifact).unwrap();
    artifact.finalize().unwrap();

    let bundle = tmp.path().join(format!("portable{}", BUNDLE_EXTENSION));
    ArtifactBundleWriter::export(&artifact, &bundle).unwrap();
    let unpacked =
        Arc::new(ArtifactBundleReader::unpack(&bundle, &tmp.path().join("restored")).unwrap());

    let restored = Media::<Audio>::reconstruct(&desc, as_dyn(&unpacked)).unwrap();
    assert_eq!(restored, clip);
    assert_eq!(fs::read(restored.path().unwrap()).unwrap(), b"RIFF....WAVE");
}

#[test]
fn test_reconstruct_from_derived_artifact() {
    let tmp = TempDir::new().unwrap();
    let source = create_artifact(tmp.path(), "source");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*source)
        .unwrap();
    source.finalize().unwrap();

    let media = Media::<Image>::reconstruct(&desc, as_dyn(&source)).unwrap();
    let derived = create_artifact(tmp.path(), "derived");
    let derived_desc = media.serialize_for_artifact(&*derived).unwrap();
    derived.finalize().unwrap();

    let restored = Media::<Image>::reconstruct(&derived_desc, as_dyn(&derived)).unwrap();
    assert_eq!(restored, media);
    assert!(restored.path().unwrap().starts_with(derived.root()));
    assert_eq!(fs::read(restored.path().unwrap()).unwrap(), b"pixels");
}

#[test]
fn test_bound_media_logged_under_source_entry_name() {
    let (tmp, run) = create_run();
    let source = create_artifact(tmp.path(), "source");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let desc = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*source)
        .unwrap();
    source.finalize().unwrap();
    let name = desc.path.clone().unwrap();

    let mut media = Media::<Image>::reconstruct(&desc, as_dyn(&source)).unwrap();
    media.bind_to_run(&run, "img", 0, None).unwrap();
    assert!(!media.path().unwrap().starts_with(source.root()));

    let derived = create_artifact(tmp.path(), "derived");
    let derived_desc = media.serialize_for_artifact(&*derived).unwrap();
    assert_eq!(derived_desc.path.as_deref(), Some(name.as_str()));

    let entry = derived.entry(&name).unwrap();
    let expected_url = source.get_path(&name).unwrap().ref_url();
    assert_eq!(entry.ref_uri.as_deref(), Some(expected_url.as_str()));
}
