//! FlashDevelop project files (`.as2proj`, `.as3proj`, `.hxproj`).

use crate::{
    error::AutoVersionError,
    project::{portable_path, LanguageType, ProjectContext},
};
use quick_xml::{events::Event, Reader};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Compiler option marking an ActionScript 3 project as an AIR application.
const AIR_CONFIG_OPTION: &str = "+configname=air";

/// A project read from a FlashDevelop project file.
#[derive(Debug, Clone)]
pub struct FlashDevelopProject {
    path: PathBuf,
    language: LanguageType,
    source_paths: Vec<PathBuf>,
    air: bool,
    trace_enabled: bool,
}

impl FlashDevelopProject {
    /// Reads the project file at `path`. Trace is initially disabled.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not well-formed XML.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AutoVersionError> {
        let path = path.into();
        let xml = fs::read_to_string(&path).map_err(|e| AutoVersionError::io(&path, e))?;
        let language = language_of(&path);
        let scan = scan(&xml).map_err(|e| AutoVersionError::xml(&path, e))?;

        let air = match language {
            LanguageType::ActionScript2 => false,
            LanguageType::ActionScript3 => scan.air_config_option,
            LanguageType::Haxe => scan.air_haxelib,
        };
        log::debug!(
            "Opened {} ({language:?}, {} source paths, air: {air})",
            path.display(),
            scan.source_paths.len()
        );

        Ok(FlashDevelopProject {
            path,
            language,
            source_paths: scan.source_paths,
            air,
            trace_enabled: false,
        })
    }

    /// Sets whether the build has trace output enabled.
    #[must_use]
    pub fn with_trace(mut self, trace_enabled: bool) -> Self {
        self.trace_enabled = trace_enabled;
        self
    }
}

impl ProjectContext for FlashDevelopProject {
    fn project_path(&self) -> &Path {
        &self.path
    }

    fn source_paths(&self) -> &[PathBuf] {
        &self.source_paths
    }

    fn language(&self) -> LanguageType {
        self.language
    }

    fn trace_enabled(&self) -> bool {
        self.trace_enabled
    }

    fn is_air_project(&self) -> bool {
        self.air
    }

    fn common_args(&self) -> BTreeMap<String, String> {
        let name = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        BTreeMap::from([
            ("ProjectName".to_string(), name),
            (
                "ProjectDir".to_string(),
                self.project_dir().display().to_string(),
            ),
            ("ProjectPath".to_string(), self.path.display().to_string()),
        ])
    }
}

fn language_of(path: &Path) -> LanguageType {
    let id = match path.extension().and_then(|ext| ext.to_str()) {
        Some("as2proj") => "as2",
        Some("hxproj") => "haxe",
        _ => "as3",
    };
    LanguageType::from_id(id)
}

#[derive(Debug, Default)]
struct Scan {
    source_paths: Vec<PathBuf>,
    air_config_option: bool,
    air_haxelib: bool,
}

/// Collects the parts of a project document the engine cares about.
fn scan(xml: &str) -> Result<Scan, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut scan = Scan::default();
    let mut stack: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                stack.push(element.local_name().as_ref().to_vec());
            }
            Event::Empty(element) => {
                let parent = stack.last().map(Vec::as_slice);
                let name = element.local_name();
                for attr in element.attributes() {
                    let attr = attr?;
                    let value = attr.unescape_value()?;
                    match (parent, name.as_ref(), attr.key.as_ref()) {
                        (Some(b"classpaths"), b"class", b"path") => {
                            scan.source_paths.push(portable_path(&value));
                        }
                        (Some(b"build"), b"option", b"additional") => {
                            if value.lines().any(|line| line.trim() == AIR_CONFIG_OPTION) {
                                scan.air_config_option = true;
                            }
                        }
                        (Some(b"haxelib"), b"library", b"name") => {
                            if value == "air" {
                                scan.air_haxelib = true;
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => return Ok(scan),
            _ => {}
        }
    }
}
