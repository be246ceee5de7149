//! Filename derivation and validation
//!
//! Destination names inside a run are derived deterministically from
//! `(key, step, id, extension)`. Names inside runs and artifacts are always
//! `/`-separated regardless of host platform.

use std::fmt::Display;
use std::path::{Component, Path};

/// Characters that cannot appear in a filename on case-insensitive
/// filesystem targets.
const RESERVED_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Build the run-binding filename `"{key}_{step}_{id}{extension}"`.
///
/// # Examples
///
/// ```
/// use mediabind_core::filename::wb_filename;
///
/// assert_eq!(wb_filename("img", 0, "abc", ".png"), "img_0_abc.png");
/// assert_eq!(wb_filename("loss", "final", 7, ""), "loss_final_7");
/// ```
pub fn wb_filename(
    key: impl Display,
    step: impl Display,
    id: impl Display,
    extension: &str,
) -> String {
    format!("{}_{}_{}{}", key, step, id, extension)
}

/// Check whether `name` is usable as a single filename component on
/// case-insensitive filesystem targets.
pub fn is_valid_filename(name: &str) -> bool {
    if name.chars().any(|c| RESERVED_CHARS.contains(&c) || c.is_control()) {
        return false;
    }
    let stem = name.split('.').next().unwrap_or(name);
    !RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(stem))
}

/// Render a relative path with `/` separators.
pub fn to_forward_slash_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Path of `path` relative to `base`, `/`-separated, or `None` when `path`
/// does not lie under `base`.
pub fn relative_to(path: &Path, base: &Path) -> Option<String> {
    path.strip_prefix(base).ok().map(to_forward_slash_path)
}

/// Final component of a path as a string (empty when there is none).
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Suffix of the final component including the dot (`".png"`), or an empty
/// string when the name has no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
