use crate::{
    action::{BuildAction, BuildState},
    error::AutoVersionError,
    project::{ProjectContext, ProjectItem},
    settings::{GlobalSettings, SettingsStore},
    strategy::{BuildContext, Strategies},
    version::Version,
};
use chrono::{DateTime, Local};
use core::fmt::{self, Display};

/// Where the incrementor is in the build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No build has started since the project was opened.
    #[default]
    Idle,
    /// A build has started.
    BuildInProgress,
    /// The last build succeeded.
    BuildDone,
    /// The last build failed.
    BuildFailed,
}

/// Why a lifecycle event left the version alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No project is open.
    NoProject,
    /// The settings do not react to this build action.
    BuildAction,
    /// The settings do not react to this build configuration.
    Configuration,
    /// The settings increment at the other end of the build.
    Timing,
    /// Reverting is disabled, or nothing was incremented before the build.
    RevertDisabled,
    /// No increment pass ran during this build.
    NothingToRevert,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SkipReason::NoProject => "no project is open",
            SkipReason::BuildAction => "build action not selected",
            SkipReason::Configuration => "build configuration not selected",
            SkipReason::Timing => "increments at the other end of the build",
            SkipReason::RevertDisabled => "reverting is disabled",
            SkipReason::NothingToRevert => "nothing to revert",
        })
    }
}

/// What a lifecycle event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// Nothing was written.
    Skipped(SkipReason),
    /// A new version was written.
    Updated {
        /// The version before the increment.
        previous: Version,
        /// The version written.
        current: Version,
    },
    /// The version from before the failed build was restored.
    Reverted {
        /// The version the failed build had written.
        from: Version,
        /// The restored version.
        to: Version,
    },
}

impl Display for IncrementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrementOutcome::Skipped(reason) => write!(f, "skipped: {reason}"),
            IncrementOutcome::Updated { previous, current } => {
                write!(f, "updated {previous} -> {current}")
            }
            IncrementOutcome::Reverted { from, to } => write!(f, "reverted {from} -> {to}"),
        }
    }
}

/// Drives version increments from build lifecycle events.
///
/// The host calls [`on_building`](Self::on_building) when a build or test starts, then
/// [`on_build_complete`](Self::on_build_complete) or [`on_build_failed`](Self::on_build_failed),
/// and [`on_project`](Self::on_project) when the open project changes. Every call returns what
/// it did.
#[derive(Debug)]
pub struct BuildVersionIncrementor<P, S> {
    store: S,
    strategies: Strategies,
    global: GlobalSettings,
    project: Option<P>,
    state: LifecycleState,
    action: BuildAction,
    build_start: DateTime<Local>,
    project_item: Option<ProjectItem>,
    previous: Option<Version>,
}

impl<P: ProjectContext, S: SettingsStore> BuildVersionIncrementor<P, S> {
    /// Creates an incrementor, loading the global settings from `store`.
    ///
    /// # Errors
    ///
    /// Fails if the global settings cannot be loaded.
    pub fn new(
        store: S,
        strategies: Strategies,
        project: Option<P>,
    ) -> Result<Self, AutoVersionError> {
        let global = store.load_global(&strategies)?;
        Ok(BuildVersionIncrementor {
            store,
            strategies,
            global,
            project,
            state: LifecycleState::Idle,
            action: BuildAction::Building,
            build_start: Local::now(),
            project_item: None,
            previous: None,
        })
    }

    /// The current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The open project, if any.
    pub fn project(&self) -> Option<&P> {
        self.project.as_ref()
    }

    /// The project item of the last increment pass.
    pub fn project_item(&self) -> Option<&ProjectItem> {
        self.project_item.as_ref()
    }

    /// The version cached when the build started. A later pass replaces it only if it ran.
    pub fn previous_version(&self) -> Option<Version> {
        self.previous
    }

    /// The global settings.
    pub fn global_settings(&self) -> &GlobalSettings {
        &self.global
    }

    /// The strategies used to resolve versioning styles.
    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }

    /// The settings store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// A build or test run starts now.
    ///
    /// # Errors
    ///
    /// See [`on_building_at`](Self::on_building_at).
    pub fn on_building(&mut self, action: BuildAction) -> Result<IncrementOutcome, AutoVersionError> {
        self.on_building_at(action, Local::now())
    }

    /// A build or test run started at `build_start`. Increments if the settings say to increment
    /// before the build.
    ///
    /// # Errors
    ///
    /// Fails if the project settings, template or version file cannot be read, if the versioning
    /// style is invalid, or if the version file cannot be written.
    pub fn on_building_at(
        &mut self,
        action: BuildAction,
        build_start: DateTime<Local>,
    ) -> Result<IncrementOutcome, AutoVersionError> {
        self.action = action;
        self.state = LifecycleState::BuildInProgress;
        self.build_start = build_start;
        self.project_item = None;
        self.previous = None;
        self.execute_increment()
    }

    /// The build succeeded. Increments if the settings say to increment after the build.
    ///
    /// # Errors
    ///
    /// See [`on_building_at`](Self::on_building_at).
    pub fn on_build_complete(&mut self) -> Result<IncrementOutcome, AutoVersionError> {
        self.state = LifecycleState::BuildDone;
        self.execute_increment()
    }

    /// The build failed. Restores the version from before the build if it was incremented
    /// before the build and the settings ask to revert.
    ///
    /// # Errors
    ///
    /// Fails if the version file cannot be written.
    pub fn on_build_failed(&mut self) -> Result<IncrementOutcome, AutoVersionError> {
        self.state = LifecycleState::BuildFailed;

        let (Some(project), Some(item), Some(previous)) =
            (self.project.as_ref(), self.project_item.as_mut(), self.previous)
        else {
            return Ok(IncrementOutcome::Skipped(SkipReason::NothingToRevert));
        };

        let settings = &item.settings.increment;
        if !(settings.increment_before_build && settings.revert_on_error) {
            return Ok(IncrementOutcome::Skipped(SkipReason::RevertDisabled));
        }

        let from = item.version;
        item.version = previous;
        item.save_version(project)?;
        if item.settings.increment.update_air_version && project.is_air_project() {
            item.update_air_version(project);
        }

        log::info!("Build failed, reverted version {from} to {previous}");
        Ok(IncrementOutcome::Reverted { from, to: previous })
    }

    /// The open project changed. Cached state from the previous project is dropped.
    pub fn on_project(&mut self, project: Option<P>) {
        self.project = project;
        self.project_item = None;
        self.previous = None;
        self.state = LifecycleState::Idle;
    }

    fn execute_increment(&mut self) -> Result<IncrementOutcome, AutoVersionError> {
        let Some(project) = self.project.as_ref() else {
            return Ok(IncrementOutcome::Skipped(SkipReason::NoProject));
        };

        let settings =
            self.store
                .load_project(project.project_path(), &self.global, &self.strategies)?;
        let mut item = ProjectItem::load(project, settings)?;
        let previous = item.version;

        item.settings.resolve(&self.global);

        let outcome = self.update_project(project, &mut item)?;
        // a skipped pass keeps the version cached when the build started
        if self.previous.is_none() || !matches!(outcome, IncrementOutcome::Skipped(_)) {
            self.previous = Some(previous);
            self.project_item = Some(item);
        }
        Ok(outcome)
    }

    fn update_project(
        &self,
        project: &P,
        item: &mut ProjectItem,
    ) -> Result<IncrementOutcome, AutoVersionError> {
        let settings = &item.settings.increment;

        if !settings.build_action.matches(self.action) {
            return Ok(IncrementOutcome::Skipped(SkipReason::BuildAction));
        }
        if !settings.configuration.matches_trace(project.trace_enabled()) {
            return Ok(IncrementOutcome::Skipped(SkipReason::Configuration));
        }

        let build_state = match self.state {
            LifecycleState::BuildInProgress => BuildState::BuildInProgress,
            _ => BuildState::BuildDone,
        };
        if settings.increment_before_build != (build_state == BuildState::BuildInProgress) {
            return Ok(IncrementOutcome::Skipped(SkipReason::Timing));
        }

        let build_start = if settings.is_universal_time {
            self.build_start.naive_utc()
        } else {
            self.build_start.naive_local()
        };
        let ctx = BuildContext {
            build_start,
            project_start: settings.start_date,
            project_path: project.project_path(),
            build_action: self.action,
            build_state,
            trace_enabled: project.trace_enabled(),
        };

        let previous = item.version;
        item.version = settings.versioning_style.increment(previous, &ctx);
        item.save_version(project)?;

        if item.settings.increment.update_air_version && project.is_air_project() {
            item.update_air_version(project);
        }

        Ok(IncrementOutcome::Updated {
            previous,
            current: item.version,
        })
    }
}
