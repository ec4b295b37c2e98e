use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// One of the four fields of a [`Version`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VersionPart {
    /// The most significant field.
    Major,
    /// The second field.
    Minor,
    /// The third field.
    Build,
    /// The least significant field.
    Revision,
}

impl VersionPart {
    /// All parts, most significant first. This is also the display order.
    pub const ALL: [VersionPart; 4] = [
        VersionPart::Major,
        VersionPart::Minor,
        VersionPart::Build,
        VersionPart::Revision,
    ];

    /// The order in which post-processors run: least significant first, so that a carry made
    /// while processing one field is visible to the next more significant one.
    pub const PROCESSING_ORDER: [VersionPart; 4] = [
        VersionPart::Revision,
        VersionPart::Build,
        VersionPart::Minor,
        VersionPart::Major,
    ];

    /// The field name, as used in template placeholders.
    pub fn name(&self) -> &'static str {
        match self {
            VersionPart::Major => "Major",
            VersionPart::Minor => "Minor",
            VersionPart::Build => "Build",
            VersionPart::Revision => "Revision",
        }
    }

    /// The template placeholder for this field, e.g. `$(Major)`.
    pub fn placeholder(&self) -> &'static str {
        match self {
            VersionPart::Major => "$(Major)",
            VersionPart::Minor => "$(Minor)",
            VersionPart::Build => "$(Build)",
            VersionPart::Revision => "$(Revision)",
        }
    }

    /// The next less significant part, if any.
    pub fn less_significant(&self) -> Option<VersionPart> {
        match self {
            VersionPart::Major => Some(VersionPart::Minor),
            VersionPart::Minor => Some(VersionPart::Build),
            VersionPart::Build => Some(VersionPart::Revision),
            VersionPart::Revision => None,
        }
    }
}

impl Display for VersionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A four-part version number, `Major.Minor.Build.Revision`.
///
/// Versions are values: every increment produces a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Version {
    /// The major field.
    pub major: u32,
    /// The minor field.
    pub minor: u32,
    /// The build field.
    pub build: u32,
    /// The revision field.
    pub revision: u32,
}

impl Version {
    /// The version assumed when a project has no version file yet.
    pub const INITIAL: Version = Version::new(1, 0, 0, 0);

    /// Creates a version from its four fields.
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Returns the value of one field.
    pub fn get(&self, part: VersionPart) -> u32 {
        match part {
            VersionPart::Major => self.major,
            VersionPart::Minor => self.minor,
            VersionPart::Build => self.build,
            VersionPart::Revision => self.revision,
        }
    }

    /// Returns a copy of this version with one field replaced.
    #[must_use]
    pub fn with(mut self, part: VersionPart, value: u32) -> Self {
        match part {
            VersionPart::Major => self.major = value,
            VersionPart::Minor => self.minor = value,
            VersionPart::Build => self.build = value,
            VersionPart::Revision => self.revision = value,
        }
        self
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Error returned when parsing a version string that is not four dot-separated integers.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("`{0}` is not a version of the form Major.Minor.Build.Revision")]
pub struct ParseVersionError(String);

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_owned());
        let mut fields = s.trim().split('.').map(|field| field.parse::<u32>());

        let mut next = || fields.next().ok_or_else(err)?.map_err(|_| err());
        let version = Version::new(next()?, next()?, next()?, next()?);

        if fields.next().is_some() {
            return Err(err());
        }
        Ok(version)
    }
}
