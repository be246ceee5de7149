//! Artifact Serialization Tests
//!
//! Entry naming, deduplication by source path, and references.

use crate::*;
use mediabind::{ArtifactDescriptor, Audio, Error, Html, Image, Media, PublicArtifact};
use mediabind_core::sha256_bytes;
use serde_json::json;

// =============================================================================
// ENTRY NAMING
// =============================================================================

#[test]
fn test_caller_owned_file_named_by_hash_prefix() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let media = Media::<Image>::from_path(&src).unwrap();

    let desc = media.serialize_for_artifact(&*artifact).unwrap();
    let hash = sha256_bytes(b"pixels");
    let expected = format!("media/images/{}/a.png", hash.prefix(20));

    assert_eq!(
        serde_json::to_value(&desc).unwrap(),
        json!({"path": expected, "sha256": hash.as_str(), "_type": "image-file"})
    );
    let entry = artifact.entry(&expected).unwrap();
    assert_eq!(entry.digest, hash);
    assert!(src.exists());
}

#[test]
fn test_same_basename_different_content_gets_distinct_names() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let a = write_file(tmp.path(), "left/a.png", b"left pixels");
    let b = write_file(tmp.path(), "right/a.png", b"right pixels");

    let first = Media::<Image>::from_path(&a)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();
    let second = Media::<Image>::from_path(&b)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();

    let first = first.path.unwrap();
    let second = second.path.unwrap();
    assert_ne!(first, second);

    let first_parts: Vec<&str> = first.split('/').collect();
    let second_parts: Vec<&str> = second.split('/').collect();
    assert_eq!(first_parts.len(), 4);
    assert_eq!(first_parts[..2], second_parts[..2]);
    assert_eq!(first_parts[3], second_parts[3]);
    assert_ne!(first_parts[2], second_parts[2]);
}

#[test]
fn test_staged_file_named_by_artifact() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let media = Media::<Image>::from_bytes(b"staged pixels", ".png").unwrap();

    let desc = media.serialize_for_artifact(&*artifact).unwrap();
    let expected = format!(
        "media/images/{}.png",
        sha256_bytes(b"staged pixels").prefix(20)
    );
    assert_eq!(desc.path.as_deref(), Some(expected.as_str()));
    assert!(artifact.entry(&expected).is_some());
}

#[test]
fn test_unattached_media_serializes_type_only() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let desc = Media::<Html>::new()
        .serialize_for_artifact(&*artifact)
        .unwrap();
    assert_eq!(desc, ArtifactDescriptor::type_only("html-file"));
    assert!(artifact.manifest().entries.is_empty());
}

// =============================================================================
// DEDUPLICATION
// =============================================================================

#[test]
fn test_same_path_twice_resolves_to_same_name() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let src = write_file(tmp.path(), "a.png", b"pixels");

    let first = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();
    let second = Media::<Image>::from_path(&src)
        .unwrap()
        .serialize_for_artifact(&*artifact)
        .unwrap();

    assert_eq!(first.path, second.path);
    assert_eq!(artifact.manifest().entries.len(), 1);
}

#[test]
fn test_staged_media_twice_resolves_to_same_name() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "samples");
    let media = Media::<Image>::from_bytes(b"twice", "png").unwrap();

    let first = media.serialize_for_artifact(&*artifact).unwrap();
    let second = media.serialize_for_artifact(&*artifact).unwrap();
    assert_eq!(first, second);
    assert_eq!(artifact.manifest().entries.len(), 1);
}

#[test]
fn test_same_media_into_two_artifacts() {
    let tmp = TempDir::new().unwrap();
    let first = create_artifact(tmp.path(), "first");
    let second = create_artifact(tmp.path(), "second");
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let media = Media::<Image>::from_path(&src).unwrap();

    let a = media.serialize_for_artifact(&*first).unwrap();
    let b = media.serialize_for_artifact(&*second).unwrap();
    assert_eq!(a, b);
    assert!(first.entry(a.path.as_deref().unwrap()).is_some());
    assert!(second.entry(b.path.as_deref().unwrap()).is_some());
}

// =============================================================================
// REFERENCES
// =============================================================================

#[test]
fn test_reference_audio_added_as_reference_entry() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "clips");
    let uri = "s3://bucket/clips/a.wav";
    let media = Media::<Audio>::from_reference(uri).unwrap();

    let desc = media.serialize_for_artifact(&*artifact).unwrap();
    let name = desc.path.unwrap();
    assert!(name.starts_with("media/audio/"));
    assert!(name.ends_with("/a.wav"));
    assert_eq!(desc.sha256.unwrap(), sha256_bytes(uri.as_bytes()));

    let entry = artifact.entry(&name).unwrap();
    assert_eq!(entry.ref_uri.as_deref(), Some(uri));
}

#[test]
fn test_finalized_artifact_rejects_media() {
    let tmp = TempDir::new().unwrap();
    let artifact = create_artifact(tmp.path(), "frozen");
    artifact.finalize().unwrap();
    let src = write_file(tmp.path(), "a.png", b"pixels");
    let media = Media::<Image>::from_path(&src).unwrap();

    let err = media.serialize_for_artifact(&*artifact).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(artifact.get_path("media/images/a.png").is_err());
}
