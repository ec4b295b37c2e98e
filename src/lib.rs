//! # autoversion
//!
//! A library for keeping a four-part version number (`Major.Minor.Build.Revision`) in a source
//! file up to date as a project is built.
//!
//! Each field is assigned an *incrementor*, which computes its new value from the current one
//! and the build date, and a *post-processor*, which adjusts the whole version afterwards (for
//! example carrying into the next field). Together they form a [`VersioningStyle`]. The version
//! is stored in a file generated from a [`Template`], and can be updated in place so that hand
//! edits to the file survive.
//!
//! ## Examples
//!
//! Compute the next version directly:
//!
//! ```
//! use autoversion::prelude::*;
//! use chrono::NaiveDate;
//! use std::path::Path;
//!
//! let strategies = Strategies::default();
//! let style = VersioningStyle::parse(
//!     "None.None.YearDayOfYear.Increment.Both.Both.Both.Both.None.None.None.None",
//!     &strategies,
//! ).unwrap();
//!
//! let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let ctx = BuildContext {
//!     build_start: now,
//!     project_start: now,
//!     project_path: Path::new("app.as3proj"),
//!     build_action: BuildAction::Building,
//!     build_state: BuildState::BuildInProgress,
//!     trace_enabled: false,
//! };
//! let next = style.increment(Version::new(1, 0, 0, 41), &ctx);
//! assert_eq!(next, Version::new(1, 0, 24001, 42));
//! ```
//!
//! Patch the numbers of an existing file without touching anything else:
//!
//! ```
//! use autoversion::prelude::*;
//!
//! let template = Template::new("static public const Major:int = $(Major);");
//! let file = "// my notes\nstatic public const Major:int = 7;\n";
//!
//! assert_eq!(template.extract_version(file).major, 7);
//! assert_eq!(
//!     template.patch_version(file, Version::new(8, 0, 0, 0)),
//!     "// my notes\nstatic public const Major:int = 8;\n"
//! );
//! ```
//!
//! Or let a [`BuildVersionIncrementor`] handle a whole build:
//!
//! ```no_run
//! use autoversion::prelude::*;
//!
//! let store = XmlSettingsStore::new("Settings.fdb");
//! let project = FlashDevelopProject::open("app.as3proj").unwrap();
//! let mut incrementor =
//!     BuildVersionIncrementor::new(store, Strategies::default(), Some(project)).unwrap();
//!
//! println!("{}", incrementor.on_building(BuildAction::Building).unwrap());
//! // ... build ...
//! println!("{}", incrementor.on_build_complete().unwrap());
//! ```
//!
//! ## Versioning Styles
//!
//! A style is written as 12 `.`-separated tokens: the incrementor of each field, the build
//! action each incrementor runs on (`Both`, `Build` or `Testing`), and the post-processor of each
//! field, every group in Major/Minor/Build/Revision order. The legacy form of only the 4
//! incrementor names is also accepted.
//!
//! ### Incrementors
//!
//! In the "Example" column below, the build starts on `2024-03-07 09:05` and the project started
//! on `1975-10-21`.
//!
//! | Name | Example | Description |
//! |---|---|---|
//! | `None` | unchanged | Keeps the current value. |
//! | `Increment` | `41` → `42` | Adds one. |
//! | `TimeStamp` | `905` | Hour and minute, `hhmm`. |
//! | `YearStamp` | `2024` | Four-digit year. |
//! | `DeltaBaseDate` | `58015` | Months since the project start, then the remaining days as two digits. |
//! | `YearDayOfYear` | `24067` | Two-digit year, then the three-digit day of the year. |
//! | `DeltaBaseYearDayOfYear` | `49067` | Years since the project start, then the three-digit day of the year. |
//! | `DeltaBaseYear` | `49` | Years since the project start. |
//! | `YearDecadeStamp` | `24` | Two-digit year. |
//! | `MonthStamp` | `3` | Month. |
//! | `DayStamp` | `7` | Day of the month. |
//! | `MonthAndDayStamp` | `37` | Month, then day, without padding. |
//!
//! ### Post-processors
//!
//! Post-processors run after all incrementors, from Revision up to Major.
//!
//! | Name | Description |
//! |---|---|
//! | `None` | Leaves the version unchanged. |
//! | `ReleaseReset` | Resets the field to 0 on production (non-test) builds. |
//! | `PreviousPartIncrements` | When the next less significant field reaches 100, increments this field and resets that one to 0. |
//!
//! Custom strategies are added with a [`StrategyProvider`].
//!
//! ## Templates
//!
//! Templates are version files with placeholders: `$(Major)`, `$(Minor)`, `$(Build)`,
//! `$(Revision)`, `$(FileName)`, `$(Package)`, `$(FileNameWithPackage)`, and any arguments the
//! [`ProjectContext`] supplies. Built-in templates exist for ActionScript 2, ActionScript 3 and
//! haXe.
//!
//! ## Prelude
//!
//! autoversion provides a prelude module for convenience. It contains everything needed to
//! interact with the library.
//!
//! Use it with:
//!
//! ```
//! use autoversion::prelude::*;
//! ```
#![warn(missing_docs)]

mod action;
pub mod air;
mod error;
mod flashdevelop;
mod incrementor;
mod orchestrator;
mod processor;
mod project;
mod settings;
mod strategy;
mod style;
mod template;
mod version;

pub use crate::action::{BuildAction, BuildActionType, BuildConfiguration, BuildState};
pub use crate::error::{AutoVersionError, ConfigError};
pub use crate::flashdevelop::FlashDevelopProject;
pub use crate::incrementor::{BuiltInIncrementor, Incrementor};
pub use crate::orchestrator::{
    BuildVersionIncrementor, IncrementOutcome, LifecycleState, SkipReason,
};
pub use crate::processor::{BuiltInPostProcessor, PostProcessor};
pub use crate::project::{portable_path, LanguageType, ProjectContext, ProjectItem};
pub use crate::settings::{
    default_start_date, parse_start_date, ApplyGlobalSettings, GlobalSettings, IncrementSettings,
    ProjectSettings, SettingsStore, XmlSettingsStore,
};
pub use crate::strategy::{
    BuildContext, IncrementorRegistry, PostProcessorRegistry, Registry, Strategies, Strategy,
    StrategyProvider,
};
pub use crate::style::{FieldStyle, VersioningStyle};
pub use crate::template::{FieldPattern, Template, TemplateArgs};
pub use crate::version::{ParseVersionError, Version, VersionPart};

/// A convenience module appropriate for glob imports (`use autoversion::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::AutoVersionError;
    #[doc(no_inline)]
    pub use crate::BuildAction;
    #[doc(no_inline)]
    pub use crate::BuildActionType;
    #[doc(no_inline)]
    pub use crate::BuildConfiguration;
    #[doc(no_inline)]
    pub use crate::BuildContext;
    #[doc(no_inline)]
    pub use crate::BuildState;
    #[doc(no_inline)]
    pub use crate::BuildVersionIncrementor;
    #[doc(no_inline)]
    pub use crate::ConfigError;
    #[doc(no_inline)]
    pub use crate::FlashDevelopProject;
    #[doc(no_inline)]
    pub use crate::IncrementOutcome;
    #[doc(no_inline)]
    pub use crate::Incrementor;
    #[doc(no_inline)]
    pub use crate::PostProcessor;
    #[doc(no_inline)]
    pub use crate::ProjectContext;
    #[doc(no_inline)]
    pub use crate::SettingsStore;
    #[doc(no_inline)]
    pub use crate::Strategies;
    #[doc(no_inline)]
    pub use crate::Strategy;
    #[doc(no_inline)]
    pub use crate::StrategyProvider;
    #[doc(no_inline)]
    pub use crate::Template;
    #[doc(no_inline)]
    pub use crate::Version;
    #[doc(no_inline)]
    pub use crate::VersionPart;
    #[doc(no_inline)]
    pub use crate::VersioningStyle;
    #[doc(no_inline)]
    pub use crate::XmlSettingsStore;
}
