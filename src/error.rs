use std::path::PathBuf;

/// Errors caused by invalid configuration: unknown strategy names, malformed versioning style
/// strings, and unparseable settings attributes.
///
/// These are never recovered from. A style that cannot be resolved is surfaced to the caller
/// instead of being replaced by a default.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum ConfigError {
    /// No incrementor with this name is registered.
    #[error("Unknown incrementor `{name}`")]
    UnknownIncrementor {
        /// The name that failed to resolve.
        name: String,
    },

    /// No post-processor with this name is registered.
    #[error("Unknown post-processor `{name}`")]
    UnknownPostProcessor {
        /// The name that failed to resolve.
        name: String,
    },

    /// A versioning style string did not contain 4 or 12 `.`-separated tokens.
    #[error("Invalid versioning style `{value}`: expected 4 or 12 tokens, found {tokens}")]
    InvalidVersioningStyle {
        /// The offending style string.
        value: String,
        /// How many tokens it split into.
        tokens: usize,
    },

    /// A build action filter token inside a versioning style was not `Both`, `Build` or
    /// `Testing`.
    #[error("Unknown build action type `{value}`")]
    UnknownBuildActionType {
        /// The offending token.
        value: String,
    },

    /// Strategy names must be non-empty and must not contain `.`, which separates tokens in a
    /// serialized versioning style.
    #[error("Invalid strategy name `{name}`: names must be non-empty and must not contain `.`")]
    InvalidStrategyName {
        /// The rejected name.
        name: String,
    },

    /// A strategy with this name was already registered.
    #[error("A strategy named `{name}` is already registered")]
    DuplicateStrategy {
        /// The duplicated name.
        name: String,
    },

    /// The `startDate` attribute is not a recognized date-time.
    #[error("Invalid start date `{value}`")]
    InvalidStartDate {
        /// The attribute value.
        value: String,
    },

    /// A boolean attribute held something other than `true`/`false`.
    #[error("Attribute `{attribute}` should be a boolean, found `{value}`")]
    InvalidBool {
        /// The attribute name.
        attribute: &'static str,
        /// The attribute value.
        value: String,
    },

    /// An enumerated attribute held an unknown variant name.
    #[error("Attribute `{attribute}` has unknown value `{value}`")]
    UnknownVariant {
        /// The attribute name.
        attribute: &'static str,
        /// The attribute value.
        value: String,
    },
}

/// The error type of operations that touch the file system: loading and saving settings,
/// version files and AIR descriptors.
#[derive(thiserror::Error, Debug)]
pub enum AutoVersionError {
    /// A configuration error, see [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Reading or writing a file failed.
    #[error("Could not access `{}`: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// An XML document could not be parsed or written.
    #[error("Malformed XML in `{}`: {source}", path.display())]
    Xml {
        /// The document being processed.
        path: PathBuf,
        /// The underlying error.
        source: quick_xml::Error,
    },
}

impl AutoVersionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AutoVersionError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn xml(path: impl Into<PathBuf>, source: impl Into<quick_xml::Error>) -> Self {
        AutoVersionError::Xml {
            path: path.into(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidVersioningStyle {
            value: "None.None".to_string(),
            tokens: 2,
        };
        assert_eq!(
            err.to_string(),
            "Invalid versioning style `None.None`: expected 4 or 12 tokens, found 2"
        );
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: AutoVersionError = ConfigError::UnknownIncrementor {
            name: "Bogus".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown incrementor `Bogus`");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = AutoVersionError::io(
            "/tmp/Version.as",
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(err.to_string().contains("/tmp/Version.as"));
    }
}
