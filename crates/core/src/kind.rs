//! Capability trait for concrete media kinds
//!
//! Each concrete kind (image, audio, ...) supplies the namespace it is stored
//! under and how its type is tagged in descriptors. Binding and serialization
//! logic is written once against this trait.

use std::path::Path;

/// A concrete media kind.
///
/// # Example
///
/// ```
/// use mediabind_core::MediaKind;
///
/// #[derive(Debug, Clone, Default)]
/// struct Plot;
///
/// impl MediaKind for Plot {
///     const LOG_TYPE: &'static str = "plot-file";
///
///     fn media_subdir() -> &'static str {
///         "media/plots"
///     }
/// }
///
/// assert_eq!(Plot::with_suffix("loss"), "loss.plot-file.json");
/// assert!(!Plot::is_reference_path("s3://bucket/x"));
/// ```
pub trait MediaKind: std::fmt::Debug + Clone + Default + Send + Sync + 'static {
    /// Type tag written to the `_type` field of artifact descriptors
    const LOG_TYPE: &'static str;

    /// Namespace prefix under run and artifact storage (e.g. `media/images`)
    fn media_subdir() -> &'static str;

    /// Whether `path` is an external reference (a URI) rather than a local file
    fn is_reference_path(_path: &str) -> bool {
        false
    }

    /// Name of this object's own JSON entry inside an artifact
    fn with_suffix(name: &str) -> String {
        let suffix = format!(".{}.json", Self::LOG_TYPE);
        if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, suffix)
        }
    }

    /// Rebuild the kind value for a file restored from an artifact
    fn from_local_file(_path: &Path) -> Self {
        Self::default()
    }
}
