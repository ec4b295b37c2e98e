use crate::{
    action::{BuildActionType, BuildConfiguration},
    error::{AutoVersionError, ConfigError},
    strategy::Strategies,
    style::VersioningStyle,
};
use chrono::{NaiveDate, NaiveDateTime};
use quick_xml::{
    events::{BytesDecl, BytesStart, Event},
    Reader, Writer,
};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

/// Name of the root element of every settings document.
const ROOT: &str = "autoVersion";

/// The date format of the `startDate` attribute.
const START_DATE_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

const DATE_TIME_FORMATS: [&str; 4] = [
    START_DATE_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: [&str; 3] = ["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"];

/// When global settings replace a project's own settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyGlobalSettings {
    /// Only for projects whose `useGlobalSettings` flag is set.
    #[default]
    OnlyWhenChosen,
    /// Like `OnlyWhenChosen`, but new projects have the flag set.
    AsDefault,
    /// For every project, regardless of its flag.
    Always,
}

impl ApplyGlobalSettings {
    /// The token used in settings files.
    pub fn name(&self) -> &'static str {
        match self {
            ApplyGlobalSettings::OnlyWhenChosen => "OnlyWhenChosen",
            ApplyGlobalSettings::AsDefault => "AsDefault",
            ApplyGlobalSettings::Always => "Always",
        }
    }
}

impl FromStr for ApplyGlobalSettings {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OnlyWhenChosen" => Ok(ApplyGlobalSettings::OnlyWhenChosen),
            "AsDefault" => Ok(ApplyGlobalSettings::AsDefault),
            "Always" => Ok(ApplyGlobalSettings::Always),
            _ => Err(ConfigError::UnknownVariant {
                attribute: "apply",
                value: s.to_owned(),
            }),
        }
    }
}

/// Settings shared by the global and the per-project documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementSettings {
    /// How each field is incremented.
    pub versioning_style: VersioningStyle,
    /// The project start date, for the delta-based incrementors.
    pub start_date: NaiveDateTime,
    /// Use UTC instead of local time for the build start.
    pub is_universal_time: bool,
    /// Update the version data automatically on build events.
    pub auto_update_version_data: bool,
    /// Increment when the build starts rather than when it completes.
    pub increment_before_build: bool,
    /// Patch the numbers of an existing version file instead of rewriting it.
    pub smart_update: bool,
    /// The build actions that trigger an increment.
    pub build_action: BuildActionType,
    /// The build configurations that trigger an increment.
    pub configuration: BuildConfiguration,
    /// Restore the previous version when the build fails.
    pub revert_on_error: bool,
    /// Mirror the version into the AIR application descriptor.
    pub update_air_version: bool,
}

/// `10/21/1975 00:00:00`.
pub fn default_start_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1975, 10, 21)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl Default for IncrementSettings {
    fn default() -> Self {
        IncrementSettings {
            versioning_style: VersioningStyle::default(),
            start_date: default_start_date(),
            is_universal_time: false,
            auto_update_version_data: false,
            increment_before_build: true,
            smart_update: false,
            build_action: BuildActionType::Both,
            configuration: BuildConfiguration::Any,
            revert_on_error: false,
            update_air_version: false,
        }
    }
}

impl IncrementSettings {
    fn read(attrs: &Attributes, strategies: &Strategies) -> Result<Self, ConfigError> {
        let defaults = IncrementSettings::default();

        let build_action = match attrs.get("buildAction") {
            None => BuildActionType::Both,
            Some(value) => value.parse().unwrap_or_else(|_| {
                log::warn!("Unknown build action `{value}`, using Both");
                BuildActionType::Both
            }),
        };

        Ok(IncrementSettings {
            versioning_style: VersioningStyle::parse(
                attrs.get("versioningStyle").unwrap_or_default(),
                strategies,
            )?,
            start_date: match attrs.get("startDate") {
                Some(value) => parse_start_date(value)?,
                None => defaults.start_date,
            },
            is_universal_time: attrs.bool("universalTime", defaults.is_universal_time)?,
            auto_update_version_data: attrs
                .bool("autoUpdateVersionData", defaults.auto_update_version_data)?,
            increment_before_build: attrs
                .bool("incrementBeforeBuild", defaults.increment_before_build)?,
            smart_update: attrs.bool("smartUpdate", defaults.smart_update)?,
            build_action,
            configuration: attrs.parse("configuration", defaults.configuration)?,
            revert_on_error: attrs.bool("revertOnError", defaults.revert_on_error)?,
            update_air_version: attrs.bool("updateAirVersion", defaults.update_air_version)?,
        })
    }

    fn write(&self, element: &mut BytesStart<'_>) {
        push_bool(element, "autoUpdateVersionData", self.auto_update_version_data);
        element.push_attribute(("versioningStyle", self.versioning_style.to_string().as_str()));
        if self.build_action != BuildActionType::Both {
            element.push_attribute(("buildAction", self.build_action.name()));
        }
        if self.configuration != BuildConfiguration::Any {
            element.push_attribute(("configuration", self.configuration.name()));
        }
        element.push_attribute((
            "startDate",
            self.start_date.format(START_DATE_FORMAT).to_string().as_str(),
        ));
        push_bool(element, "incrementBeforeBuild", self.increment_before_build);
        push_bool(element, "smartUpdate", self.smart_update);
        push_bool(element, "universalTime", self.is_universal_time);
        push_bool(element, "revertOnError", self.revert_on_error);
        push_bool(element, "updateAirVersion", self.update_air_version);
    }
}

/// The global settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalSettings {
    /// When these settings override a project's own.
    pub apply: ApplyGlobalSettings,
    /// The settings themselves.
    pub increment: IncrementSettings,
}

/// A project's settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    /// The increment settings, possibly replaced by the global ones.
    pub increment: IncrementSettings,
    /// The version file, relative to the project directory. Empty for the default location.
    pub version_filename: String,
    /// The version file template, relative to the project directory. Empty for the built-in
    /// template of the project's language.
    pub version_template_filename: String,
    /// The AIR application descriptor. Empty for `application.xml` beside the project file.
    pub air_descriptor_file: String,
    /// The package written into the version file. Empty to derive it from the source paths.
    pub version_file_package: String,
    /// Use the global increment settings instead of [`ProjectSettings::increment`].
    pub use_global_settings: bool,
}

impl ProjectSettings {
    /// Default settings for a project without a settings document.
    pub fn new(global: &GlobalSettings) -> Self {
        ProjectSettings {
            use_global_settings: global.apply == ApplyGlobalSettings::AsDefault,
            ..ProjectSettings::default()
        }
    }

    /// Replaces the increment settings with the global ones. File locations stay.
    pub fn apply_global(&mut self, global: &GlobalSettings) {
        self.increment = global.increment.clone();
    }

    /// Applies the global settings if `global` forces them or this project opted in.
    /// Returns whether they were applied.
    pub fn resolve(&mut self, global: &GlobalSettings) -> bool {
        let apply = global.apply == ApplyGlobalSettings::Always || self.use_global_settings;
        if apply {
            log::debug!("Using global settings");
            self.apply_global(global);
        }
        apply
    }
}

/// Loads and saves settings.
pub trait SettingsStore {
    /// Loads the global settings, or defaults if there are none yet.
    ///
    /// # Errors
    ///
    /// Fails if the settings exist but cannot be read or contain invalid values.
    fn load_global(&self, strategies: &Strategies) -> Result<GlobalSettings, AutoVersionError>;

    /// Saves the global settings.
    ///
    /// # Errors
    ///
    /// Fails if the settings cannot be written.
    fn save_global(&self, settings: &GlobalSettings) -> Result<(), AutoVersionError>;

    /// Loads the settings of the project whose project file is `project`, or defaults derived
    /// from `global` if there are none yet.
    ///
    /// # Errors
    ///
    /// Fails if the settings exist but cannot be read or contain invalid values.
    fn load_project(
        &self,
        project: &Path,
        global: &GlobalSettings,
        strategies: &Strategies,
    ) -> Result<ProjectSettings, AutoVersionError>;

    /// Saves a project's settings.
    ///
    /// # Errors
    ///
    /// Fails if the settings cannot be written.
    fn save_project(&self, project: &Path, settings: &ProjectSettings)
        -> Result<(), AutoVersionError>;
}

/// Settings kept in XML files: one global file, and one `<project>.version` file beside each
/// project file.
#[derive(Debug, Clone)]
pub struct XmlSettingsStore {
    global_path: PathBuf,
}

impl XmlSettingsStore {
    /// A store whose global settings live at `global_path`.
    pub fn new(global_path: impl Into<PathBuf>) -> Self {
        XmlSettingsStore {
            global_path: global_path.into(),
        }
    }

    /// `<config dir>/autoversion/Settings.fdb`, if the platform has a config directory.
    pub fn default_global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("autoversion").join("Settings.fdb"))
    }

    /// Path of the global settings file.
    pub fn global_path(&self) -> &Path {
        &self.global_path
    }

    /// Path of a project's settings file: the project file with a `.version` extension.
    pub fn project_path(project: &Path) -> PathBuf {
        project.with_extension("version")
    }
}

impl SettingsStore for XmlSettingsStore {
    fn load_global(&self, strategies: &Strategies) -> Result<GlobalSettings, AutoVersionError> {
        let Some(attrs) = Attributes::load(&self.global_path)? else {
            return Ok(GlobalSettings::default());
        };
        Ok(GlobalSettings {
            apply: attrs.parse("apply", ApplyGlobalSettings::default())?,
            increment: IncrementSettings::read(&attrs, strategies)?,
        })
    }

    fn save_global(&self, settings: &GlobalSettings) -> Result<(), AutoVersionError> {
        let mut element = BytesStart::new(ROOT);
        element.push_attribute(("apply", settings.apply.name()));
        settings.increment.write(&mut element);
        save(&self.global_path, element)
    }

    fn load_project(
        &self,
        project: &Path,
        global: &GlobalSettings,
        strategies: &Strategies,
    ) -> Result<ProjectSettings, AutoVersionError> {
        let path = Self::project_path(project);
        let Some(attrs) = Attributes::load(&path)? else {
            return Ok(ProjectSettings::new(global));
        };

        let defaults = ProjectSettings::new(global);
        Ok(ProjectSettings {
            increment: IncrementSettings::read(&attrs, strategies)?,
            version_filename: attrs.string("versionFilename"),
            version_template_filename: attrs.string("versionTemplateFilename"),
            air_descriptor_file: attrs.string("airDescriptorFile"),
            version_file_package: attrs.string("versionFilePackage"),
            use_global_settings: attrs.bool("useGlobalSettings", defaults.use_global_settings)?,
        })
    }

    fn save_project(
        &self,
        project: &Path,
        settings: &ProjectSettings,
    ) -> Result<(), AutoVersionError> {
        let mut element = BytesStart::new(ROOT);
        settings.increment.write(&mut element);
        for (name, value) in [
            ("versionFilename", &settings.version_filename),
            ("versionTemplateFilename", &settings.version_template_filename),
            ("airDescriptorFile", &settings.air_descriptor_file),
            ("versionFilePackage", &settings.version_file_package),
        ] {
            if !value.is_empty() {
                element.push_attribute((name, value.as_str()));
            }
        }
        push_bool(&mut element, "useGlobalSettings", settings.use_global_settings);
        save(&Self::project_path(project), element)
    }
}

/// The attributes of a settings document's root element.
#[derive(Debug, Default)]
struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Reads the root attributes of the document at `path`. `None` if the file does not exist.
    fn load(path: &Path) -> Result<Option<Self>, AutoVersionError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                return Ok(None);
            }
            Err(e) => return Err(AutoVersionError::io(path, e)),
        };
        Self::parse_document(&text)
            .map(Some)
            .map_err(|e| AutoVersionError::xml(path, e))
    }

    fn parse_document(text: &str) -> Result<Self, quick_xml::Error> {
        let mut reader = Reader::from_str(text);
        loop {
            match reader.read_event()? {
                Event::Start(element) | Event::Empty(element) => {
                    if element.name().as_ref() != ROOT.as_bytes() {
                        log::warn!(
                            "Unexpected root element `{}`, using defaults",
                            String::from_utf8_lossy(element.name().as_ref())
                        );
                        return Ok(Attributes::default());
                    }
                    let mut attrs = BTreeMap::new();
                    for attr in element.attributes() {
                        let attr = attr?;
                        attrs.insert(
                            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                            attr.unescape_value()?.into_owned(),
                        );
                    }
                    return Ok(Attributes(attrs));
                }
                Event::Eof => return Ok(Attributes::default()),
                _ => {}
            }
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    fn string(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().to_owned()
    }

    fn bool(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) if value.eq_ignore_ascii_case("true") => Ok(true),
            Some(value) if value.eq_ignore_ascii_case("false") => Ok(false),
            Some(value) => Err(ConfigError::InvalidBool {
                attribute: name,
                value: value.to_owned(),
            }),
        }
    }

    fn parse<T>(&self, name: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = ConfigError>,
    {
        self.get(name).map_or(Ok(default), str::parse)
    }
}

/// Parses a `startDate` attribute.
///
/// # Errors
///
/// [`ConfigError::InvalidStartDate`] if no supported format matches.
pub fn parse_start_date(value: &str) -> Result<NaiveDateTime, ConfigError> {
    let value = value.trim();
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ConfigError::InvalidStartDate {
            value: value.to_owned(),
        })
}

fn push_bool(element: &mut BytesStart<'_>, name: &str, value: bool) {
    element.push_attribute((name, if value { "True" } else { "False" }));
}

fn save(path: &Path, element: BytesStart<'_>) -> Result<(), AutoVersionError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .and_then(|()| writer.write_event(Event::Empty(element)))
        .map_err(|e| AutoVersionError::xml(path, e))?;

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| AutoVersionError::io(dir, e))?;
    }
    fs::write(path, writer.into_inner()).map_err(|e| AutoVersionError::io(path, e))?;
    log::debug!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionPart;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn strategies() -> Strategies {
        Strategies::default()
    }

    fn store(dir: &TempDir) -> XmlSettingsStore {
        XmlSettingsStore::new(dir.path().join("global").join("Settings.fdb"))
    }

    #[rstest]
    fn test_missing_files_give_defaults(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let global = store.load_global(&strategies).unwrap();
        assert_eq!(global, GlobalSettings::default());
        assert!(global.increment.increment_before_build);
        assert_eq!(global.increment.start_date, default_start_date());

        let project = store
            .load_project(&dir.path().join("app.as3proj"), &global, &strategies)
            .unwrap();
        assert_eq!(project, ProjectSettings::default());
    }

    #[rstest]
    #[case(ApplyGlobalSettings::OnlyWhenChosen, false)]
    #[case(ApplyGlobalSettings::AsDefault, true)]
    #[case(ApplyGlobalSettings::Always, false)]
    fn test_use_global_default(
        strategies: Strategies,
        #[case] apply: ApplyGlobalSettings,
        #[case] expected: bool,
    ) {
        let dir = TempDir::new().unwrap();
        let global = GlobalSettings {
            apply,
            ..GlobalSettings::default()
        };
        let project = store(&dir)
            .load_project(&dir.path().join("app.as3proj"), &global, &strategies)
            .unwrap();
        assert_eq!(project.use_global_settings, expected);
    }

    #[rstest]
    fn test_read_project_document(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("app.as3proj");
        fs::write(
            dir.path().join("app.version"),
            r#"<?xml version="1.0" encoding="utf-8" standalone="yes"?>
<autoVersion autoUpdateVersionData="true" versioningStyle="None.None.None.Increment"
    versionFilename="src/com/app/Version.as" buildAction="Testing" startDate="01/15/2020 08:30:00"
    incrementBeforeBuild="false" smartUpdate="TRUE" useGlobalSettings="False" />"#,
        )
        .unwrap();

        let settings = store(&dir)
            .load_project(&project, &GlobalSettings::default(), &strategies)
            .unwrap();

        assert!(settings.increment.auto_update_version_data);
        assert!(!settings.increment.increment_before_build);
        assert!(settings.increment.smart_update);
        assert_eq!(settings.increment.build_action, BuildActionType::Testing);
        assert_eq!(
            settings.increment.start_date,
            NaiveDate::from_ymd_opt(2020, 1, 15)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap()
        );
        assert_eq!(
            settings
                .increment
                .versioning_style
                .field(VersionPart::Revision)
                .incrementor
                .name(),
            "Increment"
        );
        assert_eq!(settings.version_filename, "src/com/app/Version.as");
        assert_eq!(settings.version_template_filename, "");
        assert!(!settings.use_global_settings);
    }

    #[rstest]
    fn test_unknown_build_action_falls_back(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("app.hxproj");
        fs::write(
            dir.path().join("app.version"),
            r#"<autoVersion buildAction="Sometimes" />"#,
        )
        .unwrap();
        let settings = store(&dir)
            .load_project(&project, &GlobalSettings::default(), &strategies)
            .unwrap();
        assert_eq!(settings.increment.build_action, BuildActionType::Both);
    }

    #[rstest]
    #[case(
        r#"<autoVersion smartUpdate="yes" />"#,
        ConfigError::InvalidBool { attribute: "smartUpdate", value: "yes".to_string() }
    )]
    #[case(
        r#"<autoVersion startDate="someday" />"#,
        ConfigError::InvalidStartDate { value: "someday".to_string() }
    )]
    #[case(
        r#"<autoVersion versioningStyle="None.None" />"#,
        ConfigError::InvalidVersioningStyle { value: "None.None".to_string(), tokens: 2 }
    )]
    #[case(
        r#"<autoVersion configuration="Release" />"#,
        ConfigError::UnknownVariant { attribute: "configuration", value: "Release".to_string() }
    )]
    fn test_invalid_values_fail(
        strategies: Strategies,
        #[case] document: &str,
        #[case] expected: ConfigError,
    ) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("app.as3proj");
        fs::write(dir.path().join("app.version"), document).unwrap();

        match store(&dir).load_project(&project, &GlobalSettings::default(), &strategies) {
            Err(AutoVersionError::Config(err)) => assert_eq!(err, expected),
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }

    #[rstest]
    fn test_malformed_xml_fails(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("app.as3proj");
        fs::write(dir.path().join("app.version"), r#"<autoVersion smartUpdate="#).unwrap();
        assert!(matches!(
            store(&dir).load_project(&project, &GlobalSettings::default(), &strategies),
            Err(AutoVersionError::Xml { .. })
        ));
    }

    #[rstest]
    fn test_project_round_trip(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let project = dir.path().join("app.as3proj");

        let settings = ProjectSettings {
            increment: IncrementSettings {
                versioning_style: VersioningStyle::parse(
                    "None.None.YearDayOfYear.TimeStamp.Both.Both.Build.Both.None.None.ReleaseReset.None",
                    &strategies,
                )
                .unwrap(),
                start_date: NaiveDate::from_ymd_opt(2010, 5, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                is_universal_time: true,
                smart_update: true,
                build_action: BuildActionType::Build,
                configuration: BuildConfiguration::Debug,
                revert_on_error: true,
                update_air_version: true,
                ..IncrementSettings::default()
            },
            version_filename: "src/Version.as".to_string(),
            version_template_filename: "templates/Version & Co.fdt".to_string(),
            air_descriptor_file: String::new(),
            version_file_package: "com.example".to_string(),
            use_global_settings: true,
        };

        store.save_project(&project, &settings).unwrap();
        let written = fs::read_to_string(dir.path().join("app.version")).unwrap();
        assert!(written.contains(r#"startDate="05/01/2010 00:00:00""#));
        assert!(written.contains(r#"smartUpdate="True""#));
        assert!(!written.contains("airDescriptorFile"));

        let loaded = store
            .load_project(&project, &GlobalSettings::default(), &strategies)
            .unwrap();
        assert_eq!(loaded, settings);
    }

    #[rstest]
    fn test_global_round_trip(strategies: Strategies) {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let settings = GlobalSettings {
            apply: ApplyGlobalSettings::Always,
            increment: IncrementSettings {
                versioning_style: VersioningStyle::parse(
                    "None.None.None.Increment",
                    &strategies,
                )
                .unwrap(),
                ..IncrementSettings::default()
            },
        };

        store.save_global(&settings).unwrap();
        let written = fs::read_to_string(store.global_path()).unwrap();
        assert!(written.contains(r#"apply="Always""#));
        assert!(!written.contains("buildAction"));
        assert_eq!(store.load_global(&strategies).unwrap(), settings);
    }

    #[rstest]
    #[case("10/21/1975 00:00:00", (1975, 10, 21, 0, 0))]
    #[case("2021-06-30T17:45:00", (2021, 6, 30, 17, 45))]
    #[case("2021-06-30 17:45:00", (2021, 6, 30, 17, 45))]
    #[case("12/01/2001", (2001, 12, 1, 0, 0))]
    #[case(" 2001/12/01 ", (2001, 12, 1, 0, 0))]
    fn test_parse_start_date(#[case] value: &str, #[case] expected: (i32, u32, u32, u32, u32)) {
        let (y, m, d, h, min) = expected;
        assert_eq!(
            parse_start_date(value).unwrap(),
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_apply_global_keeps_file_locations() {
        let mut project = ProjectSettings {
            version_filename: "src/Version.as".to_string(),
            ..ProjectSettings::default()
        };
        let global = GlobalSettings {
            increment: IncrementSettings {
                smart_update: true,
                ..IncrementSettings::default()
            },
            ..GlobalSettings::default()
        };
        project.apply_global(&global);
        assert!(project.increment.smart_update);
        assert_eq!(project.version_filename, "src/Version.as");
    }

    #[rstest]
    #[case(ApplyGlobalSettings::OnlyWhenChosen, false, false)]
    #[case(ApplyGlobalSettings::OnlyWhenChosen, true, true)]
    #[case(ApplyGlobalSettings::AsDefault, false, false)]
    #[case(ApplyGlobalSettings::Always, false, true)]
    fn test_resolve(
        #[case] apply: ApplyGlobalSettings,
        #[case] use_global_settings: bool,
        #[case] applied: bool,
    ) {
        let global = GlobalSettings {
            apply,
            increment: IncrementSettings {
                revert_on_error: true,
                ..IncrementSettings::default()
            },
        };
        let mut project = ProjectSettings {
            use_global_settings,
            ..ProjectSettings::default()
        };
        assert_eq!(project.resolve(&global), applied);
        assert_eq!(project.increment.revert_on_error, applied);
    }

    #[test]
    fn test_project_settings_path() {
        assert_eq!(
            XmlSettingsStore::project_path(Path::new("/work/app/app.as3proj")),
            PathBuf::from("/work/app/app.version")
        );
    }
}
