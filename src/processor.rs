use crate::{
    action::BuildAction,
    strategy::{BuildContext, Strategy},
    version::{Version, VersionPart},
};

/// Adjusts a version after all incrementors have run.
///
/// A post-processor is attached to one field and is handed the whole version, so it can carry
/// into or reset other fields.
pub trait PostProcessor: Strategy {
    /// Returns the adjusted version. `part` is the field this processor is attached to.
    fn process(&self, version: Version, part: VersionPart, ctx: &BuildContext<'_>) -> Version;
}

/// The post-processors that ship with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltInPostProcessor {
    /// Leaves the version unchanged.
    None,
    /// Resets the field to 0 on production builds.
    ReleaseReset,
    /// Carries into the field when the next less significant one reaches 100.
    PreviousPartIncrements,
}

/// The value at which [`BuiltInPostProcessor::PreviousPartIncrements`] carries.
const CARRY_THRESHOLD: u32 = 100;

impl BuiltInPostProcessor {
    /// Every built-in post-processor.
    pub const ALL: [BuiltInPostProcessor; 3] = [
        BuiltInPostProcessor::None,
        BuiltInPostProcessor::ReleaseReset,
        BuiltInPostProcessor::PreviousPartIncrements,
    ];
}

impl Strategy for BuiltInPostProcessor {
    fn name(&self) -> &str {
        match self {
            BuiltInPostProcessor::None => "None",
            BuiltInPostProcessor::ReleaseReset => "ReleaseReset",
            BuiltInPostProcessor::PreviousPartIncrements => "PreviousPartIncrements",
        }
    }

    fn description(&self) -> &str {
        match self {
            BuiltInPostProcessor::None => "No post processing",
            BuiltInPostProcessor::ReleaseReset => "Reset on release build",
            BuiltInPostProcessor::PreviousPartIncrements => {
                "Increment when the previous part reaches 100"
            }
        }
    }
}

impl PostProcessor for BuiltInPostProcessor {
    fn process(&self, version: Version, part: VersionPart, ctx: &BuildContext<'_>) -> Version {
        match self {
            BuiltInPostProcessor::None => version,
            BuiltInPostProcessor::ReleaseReset => match ctx.build_action {
                BuildAction::Building => version.with(part, 0),
                BuildAction::Testing => version,
            },
            BuiltInPostProcessor::PreviousPartIncrements => match part.less_significant() {
                Some(lower) if version.get(lower) >= CARRY_THRESHOLD => version
                    .with(part, version.get(part).saturating_add(1))
                    .with(lower, 0),
                _ => version,
            },
        }
    }
}
