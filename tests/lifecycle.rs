use autoversion::prelude::*;
use autoversion::{LifecycleState, ProjectSettings, SkipReason};
use rstest::{fixture, rstest};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<project version="2">
  <classpaths>
    <class path="src" />
  </classpaths>
  <build>
    <option additional="+configname=air" />
  </build>
</project>"#;

const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<application xmlns="http://ns.adobe.com/air/application/2.0">
  <id>com.example.app</id>
  <version>1.0.0.5</version>
</application>"#;

const VERSION_FILE: &str = "package com.example
{
\tpublic final class Version
\t{
\t\tstatic public const Major:int = 1;
\t\tstatic public const Minor:int = 0;
\t\tstatic public const Build:int = 0;
\t\tstatic public const Revision:int = 5;
\t}
}
";

struct Sandbox {
    dir: TempDir,
    project: PathBuf,
    store: XmlSettingsStore,
}

impl Sandbox {
    fn version_file(&self) -> PathBuf {
        self.dir.path().join("src").join("Version.as")
    }

    fn configure(&self, style: &str, edit: impl FnOnce(&mut ProjectSettings)) {
        let strategies = Strategies::default();
        let mut settings = ProjectSettings::default();
        settings.increment.versioning_style = VersioningStyle::parse(style, &strategies).unwrap();
        edit(&mut settings);
        self.store.save_project(&self.project, &settings).unwrap();
    }

    fn incrementor(&self) -> BuildVersionIncrementor<FlashDevelopProject, XmlSettingsStore> {
        let project = FlashDevelopProject::open(&self.project).unwrap();
        BuildVersionIncrementor::new(self.store.clone(), Strategies::default(), Some(project))
            .unwrap()
    }

    fn read_version(&self) -> String {
        fs::read_to_string(self.version_file()).unwrap()
    }
}

#[fixture]
fn sandbox() -> Sandbox {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("app.as3proj");
    fs::write(&project, PROJECT).unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("Version.as"), VERSION_FILE).unwrap();
    fs::write(dir.path().join("application.xml"), DESCRIPTOR).unwrap();
    let store = XmlSettingsStore::new(dir.path().join("Settings.fdb"));
    Sandbox {
        dir,
        project,
        store,
    }
}

#[rstest]
fn test_failed_build_reverts(sandbox: Sandbox) {
    sandbox.configure("None.None.None.Increment", |s| {
        s.increment.revert_on_error = true;
        s.increment.smart_update = true;
    });
    let mut incrementor = sandbox.incrementor();

    assert_eq!(
        incrementor.on_building(BuildAction::Building).unwrap(),
        IncrementOutcome::Updated {
            previous: Version::new(1, 0, 0, 5),
            current: Version::new(1, 0, 0, 6),
        }
    );
    assert_eq!(incrementor.state(), LifecycleState::BuildInProgress);
    assert!(sandbox.read_version().contains("Revision:int = 6;"));

    assert_eq!(
        incrementor.on_build_failed().unwrap(),
        IncrementOutcome::Reverted {
            from: Version::new(1, 0, 0, 6),
            to: Version::new(1, 0, 0, 5),
        }
    );
    assert_eq!(incrementor.state(), LifecycleState::BuildFailed);
    assert_eq!(sandbox.read_version(), VERSION_FILE);
}

#[rstest]
fn test_successive_builds(sandbox: Sandbox) {
    sandbox.configure("None.None.None.Increment", |s| s.increment.smart_update = true);

    for revision in 6..=8 {
        let mut incrementor = sandbox.incrementor();
        incrementor.on_building(BuildAction::Testing).unwrap();
        assert_eq!(
            incrementor.on_build_complete().unwrap(),
            IncrementOutcome::Skipped(SkipReason::Timing)
        );
        assert!(sandbox
            .read_version()
            .contains(&format!("Revision:int = {revision};")));
    }
}

#[rstest]
fn test_increment_after_build(sandbox: Sandbox) {
    sandbox.configure(
        "None.None.None.Increment.Both.Both.Both.Build.None.None.None.None",
        |s| {
            s.increment.increment_before_build = false;
            s.increment.smart_update = true;
        },
    );

    let mut incrementor = sandbox.incrementor();
    assert_eq!(
        incrementor.on_building(BuildAction::Building).unwrap(),
        IncrementOutcome::Skipped(SkipReason::Timing)
    );
    assert_eq!(
        incrementor.on_build_complete().unwrap(),
        IncrementOutcome::Updated {
            previous: Version::new(1, 0, 0, 5),
            current: Version::new(1, 0, 0, 6),
        }
    );

    // The revision only reacts to production builds.
    let mut incrementor = sandbox.incrementor();
    incrementor.on_building(BuildAction::Testing).unwrap();
    assert_eq!(
        incrementor.on_build_complete().unwrap(),
        IncrementOutcome::Updated {
            previous: Version::new(1, 0, 0, 6),
            current: Version::new(1, 0, 0, 6),
        }
    );
}

#[rstest]
fn test_air_descriptor_follows(sandbox: Sandbox) {
    sandbox.configure("None.None.None.Increment", |s| {
        s.increment.update_air_version = true;
        s.increment.smart_update = true;
    });

    sandbox
        .incrementor()
        .on_building(BuildAction::Building)
        .unwrap();

    let descriptor = fs::read_to_string(sandbox.dir.path().join("application.xml")).unwrap();
    assert!(descriptor.contains("<version>1.0.0.6</version>"));
    assert!(descriptor.contains("<id>com.example.app</id>"));
}

#[rstest]
fn test_full_rewrite_without_smart_update(sandbox: Sandbox) {
    sandbox.configure("None.None.None.Increment", |_| {});

    sandbox
        .incrementor()
        .on_building(BuildAction::Building)
        .unwrap();

    let content = sandbox.read_version();
    assert!(content.contains("\t\tstatic public const Revision:int = 6;"));
    assert!(content.contains("\tpublic final class Version\n"));
    assert!(!content.contains("com.example"));
}
