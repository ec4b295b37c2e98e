//! Version file templates.
//!
//! A template is the text of a version file with `$(Name)` placeholders. It is used two ways:
//!
//! - [`Template::render`] substitutes every placeholder and produces a complete file.
//! - [`Template::extract_version`] and [`Template::patch_version`] turn each template line that
//!   holds a numeric placeholder into a regular expression matching the same line with digits in
//!   place of the placeholder. This reads the current values out of an existing file, or rewrites
//!   only those digits and leaves everything else in the file untouched ("smart update").

use crate::{
    error::AutoVersionError,
    version::{Version, VersionPart},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{borrow::Cow, collections::BTreeMap, fs, path::Path};

/// Any `$(Name)` placeholder.
#[allow(clippy::unwrap_used)] // constant pattern
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\(([A-Za-z]+)\)").unwrap());

/// Matches what an unknown placeholder expanded to. Line breaks are included for placeholders
/// at the end of a line.
const WILDCARD: &str = r"(?:.+|\r|\r\n)";

/// Snippet markers that have no meaning in a version file and are removed on render.
const MARKERS: [&str; 3] = ["$(Boundary)", "$(EntryPoint)", "$(ExitPoint)"];

pub(crate) const UTF8_BOM: &str = "\u{feff}";

/// Values substituted into a template on a full render, besides the version fields.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    /// The version file's name without extension, for `$(FileName)`.
    pub file_name: String,
    /// The dotted package of the version file, for `$(Package)`. May be empty.
    pub package: String,
    /// Additional `$(Name)` arguments, keyed by `Name`, substituted first.
    pub common: BTreeMap<String, String>,
}

impl TemplateArgs {
    /// `package.FileName`, or just the file name when there is no package.
    pub fn file_name_with_package(&self) -> String {
        if self.package.is_empty() {
            self.file_name.clone()
        } else {
            format!("{}.{}", self.package, self.file_name)
        }
    }
}

/// The text of a version file template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Wraps template text.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let text = match text.strip_prefix(UTF8_BOM) {
            Some(stripped) => stripped.to_owned(),
            None => text,
        };
        Template { text }
    }

    /// Reads a template file.
    ///
    /// # Errors
    ///
    /// [`AutoVersionError::Io`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, AutoVersionError> {
        let text = fs::read_to_string(path).map_err(|e| AutoVersionError::io(path, e))?;
        Ok(Template::new(text))
    }

    /// The template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Produces a complete version file.
    pub fn render(&self, args: &TemplateArgs, version: Version) -> String {
        let mut content = self.text.clone();

        for (name, value) in &args.common {
            content = content.replace(&format!("$({name})"), value);
        }

        content = content.replace("$(FileName)", &args.file_name);
        content = content.replace("$(FileNameWithPackage)", &args.file_name_with_package());
        content = content.replace("$(Package)", &args.package);

        for marker in MARKERS {
            content = content.replace(marker, "");
        }

        for part in VersionPart::ALL {
            content = content.replace(part.placeholder(), &version.get(part).to_string());
        }
        content
    }

    /// Patterns for every template line holding `part`'s placeholder.
    pub fn field_patterns(&self, part: VersionPart) -> Vec<FieldPattern> {
        self.text
            .lines()
            .filter(|line| line.contains(part.placeholder()))
            .filter_map(|line| FieldPattern::from_line(line, part))
            .collect()
    }

    /// The pattern for the first template line holding `part`'s placeholder.
    pub fn first_field_pattern(&self, part: VersionPart) -> Option<FieldPattern> {
        self.text
            .lines()
            .find(|line| line.contains(part.placeholder()))
            .and_then(|line| FieldPattern::from_line(line, part))
    }

    /// Reads the version out of a file previously rendered from this template.
    ///
    /// A field whose line cannot be found is 0.
    pub fn extract_version(&self, content: &str) -> Version {
        VersionPart::ALL
            .into_iter()
            .fold(Version::default(), |version, part| {
                let value = match self.first_field_pattern(part) {
                    Some(pattern) => pattern.extract(content).unwrap_or_else(|| {
                        log::warn!("No value for {part} found in version file, using 0");
                        0
                    }),
                    None => {
                        log::debug!("Template has no {} placeholder", part.placeholder());
                        0
                    }
                };
                version.with(part, value)
            })
    }

    /// Rewrites the numeric fields of `content` in place, leaving all other text as is.
    pub fn patch_version<'c>(&self, content: &'c str, version: Version) -> Cow<'c, str> {
        let mut patched: Option<String> = None;
        for part in VersionPart::ALL {
            for pattern in self.field_patterns(part) {
                let current = patched.as_deref().unwrap_or(content);
                let replaced = match pattern.replace(current, version.get(part)) {
                    Cow::Owned(text) => Some(text),
                    Cow::Borrowed(_) => None,
                };
                if replaced.is_some() {
                    patched = replaced;
                }
            }
        }
        patched.map_or(Cow::Borrowed(content), Cow::Owned)
    }
}

/// A regular expression locating one field's digits in a version file.
///
/// Built from a template line: the literal text around the placeholder must match exactly, and
/// any other placeholder on the line matches anything.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    regex: Regex,
}

impl FieldPattern {
    /// Builds the pattern for `part` from a template line. Returns `None` if the line does not
    /// contain the placeholder.
    pub fn from_line(line: &str, part: VersionPart) -> Option<Self> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut found = false;
        let mut last = 0;

        for token in PLACEHOLDER.find_iter(line) {
            let out = if found { &mut suffix } else { &mut prefix };
            out.push_str(&regex::escape(&line[last..token.start()]));
            last = token.end();

            if token.as_str() != part.placeholder() {
                out.push_str(WILDCARD);
            } else if found {
                out.push_str(r"\d+");
            } else {
                found = true;
            }
        }
        if !found {
            return None;
        }
        suffix.push_str(&regex::escape(&line[last..]));

        let source = format!(r"(?P<pre>{prefix})(?P<value>\d+)(?P<post>{suffix})");
        match Regex::new(&source) {
            Ok(regex) => {
                log::debug!("Pattern for {part}: {source}");
                Some(FieldPattern { regex })
            }
            Err(e) => {
                log::warn!("Could not build pattern for {part} from `{line}`: {e}");
                None
            }
        }
    }

    /// The pattern's source.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The value at the first match, if any.
    pub fn extract(&self, content: &str) -> Option<u32> {
        let captures = self.regex.captures(content)?;
        captures["value"].parse().ok()
    }

    /// Replaces the digits of every match with `value`.
    ///
    /// Matches may overlap in their surrounding text: each search resumes right after the
    /// previous digits, so one match's suffix can be the next one's prefix.
    pub fn replace<'c>(&self, content: &'c str, value: u32) -> Cow<'c, str> {
        let value = value.to_string();
        let mut patched = String::new();
        let mut copied = 0;

        while let Some(digits) = self
            .regex
            .captures_at(content, copied)
            .and_then(|caps| caps.name("value"))
        {
            patched.push_str(&content[copied..digits.start()]);
            patched.push_str(&value);
            copied = digits.end();
        }

        if copied == 0 {
            Cow::Borrowed(content)
        } else {
            patched.push_str(&content[copied..]);
            Cow::Owned(patched)
        }
    }
}
