//! Equality Tests
//!
//! Equality is content identity only.

use crate::*;
use mediabind::{Image, Media};

#[test]
fn test_same_content_different_paths_and_captions_are_equal() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "a.png", b"pixels");
    let b = write_file(tmp.path(), "nested/b.png", b"pixels");

    let left = Media::<Image>::from_path(&a).unwrap().with_caption("left");
    let right = Media::<Image>::from_path(&b).unwrap().with_caption("right");
    assert_eq!(left, right);
}

#[test]
fn test_different_content_is_never_equal() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "a.png", b"pixels");
    let b = write_file(tmp.path(), "a2.png", b"other pixels");

    let left = Media::<Image>::from_path(&a).unwrap();
    let right = Media::<Image>::from_path(&b).unwrap();
    assert_ne!(left, right);
}

#[test]
fn test_unattached_is_never_equal() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "a.png", b"pixels");
    let attached = Media::<Image>::from_path(&a).unwrap();
    let empty = Media::<Image>::new();

    assert_ne!(empty, Media::<Image>::new());
    assert_ne!(empty, attached);
    assert_ne!(attached, empty);
}

#[test]
fn test_equality_survives_binding() {
    let (tmp, run) = create_run();
    let a = write_file(tmp.path(), "a.png", b"pixels");
    let mut bound = Media::<Image>::from_path(&a).unwrap();
    let unbound = Media::<Image>::from_path(&a).unwrap();

    bound.bind_to_run(&run, "img", 0, None).unwrap();
    assert_eq!(bound, unbound);
}

#[test]
fn test_staged_and_caller_owned_with_same_bytes_are_equal() {
    let tmp = TempDir::new().unwrap();
    let a = write_file(tmp.path(), "a.png", b"pixels");
    let staged = Media::<Image>::from_bytes(b"pixels", "png").unwrap();
    assert_eq!(staged, Media::<Image>::from_path(&a).unwrap());
}
