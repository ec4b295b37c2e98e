use crate::{
    air,
    error::AutoVersionError,
    settings::ProjectSettings,
    template::{Template, TemplateArgs, UTF8_BOM},
    version::Version,
};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Component, Path, PathBuf},
};

/// The language of a project, which selects the built-in template and the version file
/// extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageType {
    /// ActionScript 2.
    ActionScript2,
    /// ActionScript 3.
    #[default]
    ActionScript3,
    /// haXe.
    Haxe,
}

impl LanguageType {
    /// Maps a project language identifier (`as2`, `as3`, `haxe`). Anything unknown is
    /// ActionScript 3.
    pub fn from_id(id: &str) -> Self {
        match id {
            "as2" => LanguageType::ActionScript2,
            "haxe" => LanguageType::Haxe,
            _ => LanguageType::ActionScript3,
        }
    }

    /// The file extension of generated version files.
    pub fn version_extension(&self) -> &'static str {
        match self {
            LanguageType::Haxe => "hx",
            LanguageType::ActionScript2 | LanguageType::ActionScript3 => "as",
        }
    }

    /// The template used when a project does not configure one.
    pub fn builtin_template(&self) -> Template {
        Template::new(match self {
            LanguageType::ActionScript2 => include_str!("../templates/actionscript2.fdt"),
            LanguageType::ActionScript3 => include_str!("../templates/actionscript3.fdt"),
            LanguageType::Haxe => include_str!("../templates/haxe.fdt"),
        })
    }
}

/// What the versioning engine needs to know about the project being built.
pub trait ProjectContext {
    /// Path of the project file.
    fn project_path(&self) -> &Path;

    /// Source (class) paths, relative to the project directory or absolute. Paths read from
    /// project files should go through [`portable_path`].
    fn source_paths(&self) -> &[PathBuf];

    /// The project language.
    fn language(&self) -> LanguageType;

    /// Whether the project is built with trace (debug) output enabled.
    fn trace_enabled(&self) -> bool;

    /// Whether the project targets Adobe AIR.
    fn is_air_project(&self) -> bool;

    /// Additional `$(Name)` template arguments.
    fn common_args(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// The directory holding the project file.
    fn project_dir(&self) -> &Path {
        self.project_path()
            .parent()
            .unwrap_or_else(|| Path::new("."))
    }

    /// Resolves a project-relative path. Absolute paths are returned as is.
    fn absolute_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir().join(path)
        }
    }
}

/// A project's version, settings and version file, loaded for one build event.
#[derive(Debug, Clone)]
pub struct ProjectItem {
    /// The version, as read from the version file and later replaced by increments.
    pub version: Version,
    /// The project's effective settings.
    pub settings: ProjectSettings,
    language: LanguageType,
    version_file: PathBuf,
    template: Template,
}

impl ProjectItem {
    /// Locates the version file and template and reads the current version.
    ///
    /// A missing version file means version `1.0.0.0`.
    ///
    /// # Errors
    ///
    /// Fails if a configured template or the existing version file cannot be read.
    pub fn load<P>(project: &P, settings: ProjectSettings) -> Result<Self, AutoVersionError>
    where
        P: ProjectContext + ?Sized,
    {
        let language = project.language();
        let version_file = version_file_path(project, &settings);
        let template = if settings.version_template_filename.is_empty() {
            language.builtin_template()
        } else {
            let path = portable_path(&settings.version_template_filename);
            Template::load(&project.absolute_path(&path))?
        };

        let version = match TextFile::read(&version_file)? {
            Some(file) => template.extract_version(&file.text),
            None => {
                log::debug!(
                    "No version file at {}, starting at {}",
                    version_file.display(),
                    Version::INITIAL
                );
                Version::INITIAL
            }
        };

        Ok(ProjectItem {
            version,
            settings,
            language,
            version_file,
            template,
        })
    }

    /// The project language.
    pub fn language(&self) -> LanguageType {
        self.language
    }

    /// Where the version is stored.
    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    /// The template describing the version file.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Writes [`ProjectItem::version`] to the version file.
    ///
    /// With smart update on and an existing file, only the numbers are patched. Otherwise the
    /// whole file is rendered from the template. The existing file's encoding and byte-order
    /// mark are kept.
    ///
    /// # Errors
    ///
    /// Fails if the version file cannot be read or written.
    pub fn save_version<P>(&self, project: &P) -> Result<(), AutoVersionError>
    where
        P: ProjectContext + ?Sized,
    {
        let existing = TextFile::read(&self.version_file)?;

        let content = match &existing {
            Some(file) if self.settings.increment.smart_update => self
                .template
                .patch_version(&file.text, self.version)
                .into_owned(),
            _ => self
                .template
                .render(&self.template_args(project), self.version),
        };
        let bytes = match &existing {
            Some(file) => file.encode(&content),
            None => content.into_bytes(),
        };

        if let Some(dir) = self.version_file.parent() {
            fs::create_dir_all(dir).map_err(|e| AutoVersionError::io(dir, e))?;
        }
        fs::write(&self.version_file, bytes)
            .map_err(|e| AutoVersionError::io(&self.version_file, e))?;

        log::info!(
            "Wrote version {} to {}",
            self.version,
            self.version_file.display()
        );
        Ok(())
    }

    /// The values substituted into the template on a full render.
    pub fn template_args<P>(&self, project: &P) -> TemplateArgs
    where
        P: ProjectContext + ?Sized,
    {
        let package = if self.settings.version_file_package.is_empty() {
            derive_package(project, &self.version_file)
        } else {
            self.settings.version_file_package.clone()
        };

        TemplateArgs {
            file_name: self
                .version_file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            package,
            common: project.common_args(),
        }
    }

    /// The configured AIR descriptor, or `application.xml` beside the project file.
    pub fn air_descriptor_path<P>(&self, project: &P) -> PathBuf
    where
        P: ProjectContext + ?Sized,
    {
        if self.settings.air_descriptor_file.is_empty() {
            project.project_dir().join("application.xml")
        } else {
            project.absolute_path(&portable_path(&self.settings.air_descriptor_file))
        }
    }

    /// Mirrors the version into the AIR descriptor. Failures are logged and otherwise ignored.
    pub fn update_air_version<P>(&self, project: &P)
    where
        P: ProjectContext + ?Sized,
    {
        let path = self.air_descriptor_path(project);
        if let Err(e) = air::update_descriptor(&path, self.version) {
            log::warn!("Could not update AIR descriptor: {e}");
        }
    }
}

/// The configured version file, or `Version.as`/`Version.hx` in the base source path.
fn version_file_path<P>(project: &P, settings: &ProjectSettings) -> PathBuf
where
    P: ProjectContext + ?Sized,
{
    if !settings.version_filename.is_empty() {
        return project.absolute_path(&portable_path(&settings.version_filename));
    }
    let file_name = format!("Version.{}", project.language().version_extension());
    match base_source_path(project.source_paths()) {
        Some(base) => project.absolute_path(base).join(file_name),
        None => project.project_dir().join(file_name),
    }
}

/// The first source path inside the project directory, else the first source path.
fn base_source_path(paths: &[PathBuf]) -> Option<&Path> {
    paths
        .iter()
        .find(|path| {
            path.is_relative() && !matches!(path.components().next(), Some(Component::ParentDir))
        })
        .or_else(|| paths.first())
        .map(PathBuf::as_path)
}

/// The package of `file`: its directory relative to the closest enclosing source path, with
/// `.` separators. Empty if no source path encloses it.
fn derive_package<P>(project: &P, file: &Path) -> String
where
    P: ProjectContext + ?Sized,
{
    let Some(dir) = file.parent() else {
        return String::new();
    };

    project
        .source_paths()
        .iter()
        .map(|path| project.absolute_path(path))
        .filter(|root| dir.starts_with(root))
        .max_by_key(|root| root.components().count())
        .and_then(|root| {
            dir.strip_prefix(&root).ok().map(|relative| {
                relative
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(".")
            })
        })
        .unwrap_or_default()
}

/// Reads a path as written in a project or settings file. FlashDevelop writes `\` separators,
/// which are turned into `/` so the path splits into components on every platform.
pub fn portable_path(value: &str) -> PathBuf {
    PathBuf::from(value.replace('\\', "/"))
}

/// A version file's text and the encoding it is stored in.
#[derive(Debug)]
struct TextFile {
    text: String,
    encoding: &'static Encoding,
    bom: bool,
}

impl TextFile {
    /// `None` if the file does not exist. Files that are not UTF-8 are read as Windows-1252,
    /// which maps every byte.
    fn read(path: &Path) -> Result<Option<Self>, AutoVersionError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AutoVersionError::io(path, e)),
        };

        if let Some(rest) = bytes.strip_prefix(UTF8_BOM.as_bytes()) {
            let (text, _) = UTF_8.decode_without_bom_handling(rest);
            return Ok(Some(TextFile {
                text: text.into_owned(),
                encoding: UTF_8,
                bom: true,
            }));
        }

        Ok(Some(match String::from_utf8(bytes) {
            Ok(text) => TextFile {
                text,
                encoding: UTF_8,
                bom: false,
            },
            Err(e) => {
                log::warn!(
                    "{} is not UTF-8, reading it as {}",
                    path.display(),
                    WINDOWS_1252.name()
                );
                let (text, _) = WINDOWS_1252.decode_without_bom_handling(e.as_bytes());
                TextFile {
                    text: text.into_owned(),
                    encoding: WINDOWS_1252,
                    bom: false,
                }
            }
        }))
    }

    /// Encodes `text` the way this file was stored.
    fn encode(&self, text: &str) -> Vec<u8> {
        let (encoded, _, unmappable) = self.encoding.encode(text);
        if unmappable {
            log::warn!(
                "Some characters cannot be written as {} and were escaped",
                self.encoding.name()
            );
        }

        let mut bytes = Vec::with_capacity(encoded.len() + UTF8_BOM.len());
        if self.bom {
            bytes.extend_from_slice(UTF8_BOM.as_bytes());
        }
        bytes.extend_from_slice(&encoded);
        bytes
    }
}
