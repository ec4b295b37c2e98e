use crate::{
    action::BuildActionType,
    error::ConfigError,
    incrementor::{BuiltInIncrementor, Incrementor},
    processor::{BuiltInPostProcessor, PostProcessor},
    strategy::{BuildContext, Strategies},
    version::{Version, VersionPart},
};
use core::fmt::{self, Display};
use std::sync::Arc;

/// The increment rule for one version field.
#[derive(Debug, Clone)]
pub struct FieldStyle {
    /// Computes the field's new value.
    pub incrementor: Arc<dyn Incrementor>,
    /// The build actions on which the incrementor runs.
    pub action_type: BuildActionType,
    /// Runs after all incrementors, in [`VersionPart::PROCESSING_ORDER`].
    pub processor: Arc<dyn PostProcessor>,
}

impl Default for FieldStyle {
    fn default() -> Self {
        FieldStyle {
            incrementor: Arc::new(BuiltInIncrementor::None),
            action_type: BuildActionType::Both,
            processor: Arc::new(BuiltInPostProcessor::None),
        }
    }
}

impl PartialEq for FieldStyle {
    // strategies are identified by name
    fn eq(&self, other: &Self) -> bool {
        self.incrementor.name() == other.incrementor.name()
            && self.action_type == other.action_type
            && self.processor.name() == other.processor.name()
    }
}

impl Eq for FieldStyle {}

/// How each of the four version fields is incremented.
///
/// A style is written to settings files as 12 `.`-separated tokens: the four incrementor names,
/// the four build action filters, and the four post-processor names, each group in
/// Major/Minor/Build/Revision order.
///
/// ```
/// use autoversion::prelude::*;
///
/// let strategies = Strategies::default();
/// let style = VersioningStyle::parse("None.None.Increment.TimeStamp", &strategies).unwrap();
/// assert_eq!(
///     style.to_string(),
///     "None.None.Increment.TimeStamp.Both.Both.Both.Both.None.None.None.None"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersioningStyle {
    fields: [FieldStyle; 4],
}

impl VersioningStyle {
    /// The rule for one field.
    pub fn field(&self, part: VersionPart) -> &FieldStyle {
        &self.fields[Self::index(part)]
    }

    /// Mutable access to the rule for one field.
    pub fn field_mut(&mut self, part: VersionPart) -> &mut FieldStyle {
        &mut self.fields[Self::index(part)]
    }

    /// Returns this style with `part` incremented by `incrementor` on `action_type` builds.
    #[must_use]
    pub fn with_incrementor(
        mut self,
        part: VersionPart,
        incrementor: Arc<dyn Incrementor>,
        action_type: BuildActionType,
    ) -> Self {
        let field = self.field_mut(part);
        field.incrementor = incrementor;
        field.action_type = action_type;
        self
    }

    /// Returns this style with `processor` attached to `part`.
    #[must_use]
    pub fn with_processor(mut self, part: VersionPart, processor: Arc<dyn PostProcessor>) -> Self {
        self.field_mut(part).processor = processor;
        self
    }

    fn index(part: VersionPart) -> usize {
        match part {
            VersionPart::Major => 0,
            VersionPart::Minor => 1,
            VersionPart::Build => 2,
            VersionPart::Revision => 3,
        }
    }

    /// Parses a serialized style, resolving strategy names against `strategies`.
    ///
    /// Both the 12-token form and the legacy 4-token form (incrementor names only) are accepted.
    /// In the legacy form every filter is [`BuildActionType::Both`] and every post-processor is
    /// `None`. An empty string is the default style.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidVersioningStyle`] if the token count is neither 4 nor 12.
    /// - [`ConfigError::UnknownIncrementor`], [`ConfigError::UnknownPostProcessor`] or
    ///   [`ConfigError::UnknownBuildActionType`] if a token does not resolve.
    pub fn parse(value: &str, strategies: &Strategies) -> Result<Self, ConfigError> {
        if value.is_empty() {
            return Ok(VersioningStyle::default());
        }

        let tokens: Vec<&str> = value.split('.').collect();
        if tokens.len() != 4 && tokens.len() != 12 {
            return Err(ConfigError::InvalidVersioningStyle {
                value: value.to_owned(),
                tokens: tokens.len(),
            });
        }

        let mut style = VersioningStyle::default();
        for (i, part) in VersionPart::ALL.into_iter().enumerate() {
            let field = style.field_mut(part);
            field.incrementor = strategies.incrementors.get(tokens[i])?;

            if tokens.len() == 12 {
                field.action_type = tokens[4 + i].parse()?;
                field.processor = strategies.post_processors.get(tokens[8 + i])?;
            }
        }

        log::debug!("Parsed versioning style `{style}`");
        Ok(style)
    }

    /// Computes the next version.
    ///
    /// Each field whose filter matches the build action is replaced by its incrementor's result.
    /// The post-processors then run from the least significant field to the most significant one.
    pub fn increment(&self, current: Version, ctx: &BuildContext<'_>) -> Version {
        let mut next = current;
        for part in VersionPart::ALL {
            let field = self.field(part);
            if field.action_type.matches(ctx.build_action) {
                let value = field.incrementor.increment(current.get(part).into(), ctx);
                next = next.with(part, value);
            }
        }

        VersionPart::PROCESSING_ORDER
            .into_iter()
            .fold(next, |version, part| {
                self.field(part).processor.process(version, part, ctx)
            })
    }
}

impl Display for VersioningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let incrementors = self.fields.iter().map(|field| field.incrementor.name());
        let filters = self.fields.iter().map(|field| field.action_type.name());
        let processors = self.fields.iter().map(|field| field.processor.name());

        let mut tokens = incrementors.chain(filters).chain(processors);
        if let Some(first) = tokens.next() {
            f.write_str(first)?;
        }
        for token in tokens {
            write!(f, ".{token}")?;
        }
        Ok(())
    }
}
