use crate::error::ConfigError;
use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// The lifecycle event that triggered an increment pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildAction {
    /// A regular (production) build.
    #[default]
    Building,
    /// A test build.
    Testing,
}

/// Which build actions a setting or a version field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildActionType {
    /// Any build action.
    #[default]
    Both,
    /// Only [`BuildAction::Building`].
    Build,
    /// Only [`BuildAction::Testing`].
    Testing,
}

impl BuildActionType {
    /// Returns true if `action` passes this filter. [`BuildActionType::Both`] always does.
    pub fn matches(&self, action: BuildAction) -> bool {
        matches!(
            (self, action),
            (BuildActionType::Both, _)
                | (BuildActionType::Build, BuildAction::Building)
                | (BuildActionType::Testing, BuildAction::Testing)
        )
    }

    /// The token used in settings files and versioning style strings.
    pub fn name(&self) -> &'static str {
        match self {
            BuildActionType::Both => "Both",
            BuildActionType::Build => "Build",
            BuildActionType::Testing => "Testing",
        }
    }
}

impl Display for BuildActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuildActionType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Both" => Ok(BuildActionType::Both),
            "Build" => Ok(BuildActionType::Build),
            "Testing" => Ok(BuildActionType::Testing),
            _ => Err(ConfigError::UnknownBuildActionType {
                value: s.to_owned(),
            }),
        }
    }
}

/// Whether the build that triggered a pass is still running or has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    /// The build has started and not finished yet.
    #[default]
    BuildInProgress,
    /// The build completed successfully.
    BuildDone,
}

/// Which build configuration (trace/debug or release) increments apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildConfiguration {
    /// Any configuration.
    #[default]
    Any,
    /// Release builds only, i.e. trace disabled.
    Build,
    /// Debug builds only, i.e. trace enabled.
    Debug,
}

impl BuildConfiguration {
    /// Returns true if a build with the given trace flag passes this filter.
    pub fn matches_trace(&self, trace_enabled: bool) -> bool {
        match self {
            BuildConfiguration::Any => true,
            BuildConfiguration::Build => !trace_enabled,
            BuildConfiguration::Debug => trace_enabled,
        }
    }

    /// The token used in settings files.
    pub fn name(&self) -> &'static str {
        match self {
            BuildConfiguration::Any => "Any",
            BuildConfiguration::Build => "Build",
            BuildConfiguration::Debug => "Debug",
        }
    }
}

impl FromStr for BuildConfiguration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Any" => Ok(BuildConfiguration::Any),
            "Build" => Ok(BuildConfiguration::Build),
            "Debug" => Ok(BuildConfiguration::Debug),
            _ => Err(ConfigError::UnknownVariant {
                attribute: "configuration",
                value: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(BuildActionType::Both, BuildAction::Building, true)]
    #[case(BuildActionType::Both, BuildAction::Testing, true)]
    #[case(BuildActionType::Build, BuildAction::Building, true)]
    #[case(BuildActionType::Build, BuildAction::Testing, false)]
    #[case(BuildActionType::Testing, BuildAction::Building, false)]
    #[case(BuildActionType::Testing, BuildAction::Testing, true)]
    fn test_action_filter(
        #[case] filter: BuildActionType,
        #[case] action: BuildAction,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.matches(action), expected);
    }

    #[rstest]
    #[case(BuildConfiguration::Any, false, true)]
    #[case(BuildConfiguration::Any, true, true)]
    #[case(BuildConfiguration::Build, false, true)]
    #[case(BuildConfiguration::Build, true, false)]
    #[case(BuildConfiguration::Debug, false, false)]
    #[case(BuildConfiguration::Debug, true, true)]
    fn test_configuration_filter(
        #[case] config: BuildConfiguration,
        #[case] trace: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(config.matches_trace(trace), expected);
    }

    #[test]
    fn test_action_type_tokens() {
        for filter in [
            BuildActionType::Both,
            BuildActionType::Build,
            BuildActionType::Testing,
        ] {
            assert_eq!(filter.name().parse::<BuildActionType>(), Ok(filter));
        }
        assert!("both".parse::<BuildActionType>().is_err());
    }
}
