//! Concrete media kinds
//!
//! | Kind       | Stored under      | Descriptor type  |
//! |------------|-------------------|------------------|
//! | [`Image`]    | `media/images`    | `image-file`     |
//! | [`Audio`]    | `media/audio`     | `audio-file`     |
//! | [`Video`]    | `media/videos`    | `video-file`     |
//! | [`Html`]     | `media/html`      | `html-file`      |
//! | [`Object3D`] | `media/object3D`  | `object3D-file`  |

use mediabind_core::filename::extension_of;
use mediabind_core::MediaKind;
use std::path::Path;

/// URI schemes audio accepts as references to external storage
pub const AUDIO_REFERENCE_SCHEMES: &[&str] = &["s3://", "gs://", "http://", "https://"];

fn format_of(path: &Path) -> Option<String> {
    let ext = extension_of(path);
    let format = ext.trim_start_matches('.').to_ascii_lowercase();
    if format.is_empty() {
        None
    } else {
        Some(format)
    }
}

/// Still image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    /// Lowercase file format (`png`, `jpg`, ...) when known
    pub format: Option<String>,
}

impl MediaKind for Image {
    const LOG_TYPE: &'static str = "image-file";

    fn media_subdir() -> &'static str {
        "media/images"
    }

    fn from_local_file(path: &Path) -> Self {
        Image {
            format: format_of(path),
        }
    }
}

/// Audio clip, local or referenced by URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Audio;

impl MediaKind for Audio {
    const LOG_TYPE: &'static str = "audio-file";

    fn media_subdir() -> &'static str {
        "media/audio"
    }

    fn is_reference_path(path: &str) -> bool {
        AUDIO_REFERENCE_SCHEMES
            .iter()
            .any(|scheme| path.starts_with(scheme))
    }
}

/// Video clip
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Video {
    /// Lowercase container format (`mp4`, `gif`, ...) when known
    pub format: Option<String>,
}

impl MediaKind for Video {
    const LOG_TYPE: &'static str = "video-file";

    fn media_subdir() -> &'static str {
        "media/videos"
    }

    fn from_local_file(path: &Path) -> Self {
        Video {
            format: format_of(path),
        }
    }
}

/// HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Html;

impl MediaKind for Html {
    const LOG_TYPE: &'static str = "html-file";

    fn media_subdir() -> &'static str {
        "media/html"
    }
}

/// 3D scene or point cloud
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Object3D;

impl MediaKind for Object3D {
    const LOG_TYPE: &'static str = "object3D-file";

    fn media_subdir() -> &'static str {
        "media/object3D"
    }
}
