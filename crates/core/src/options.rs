//! Options for binding media into a run

/// When to validate a media key as a filename component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilenameCheck {
    /// Validate only when targeting a case-insensitive filesystem platform
    #[default]
    Auto,
    /// Always validate
    Always,
    /// Never validate
    Never,
}

impl FilenameCheck {
    /// Whether the check applies on the current build target
    pub fn applies(self) -> bool {
        match self {
            FilenameCheck::Auto => cfg!(windows),
            FilenameCheck::Always => true,
            FilenameCheck::Never => false,
        }
    }
}

/// Run-binding options
#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Key validation policy
    pub filename_check: FilenameCheck,
}

impl BindOptions {
    /// Validate keys on every platform
    pub fn strict() -> Self {
        BindOptions {
            filename_check: FilenameCheck::Always,
        }
    }

    /// Never validate keys
    pub fn permissive() -> Self {
        BindOptions {
            filename_check: FilenameCheck::Never,
        }
    }
}
