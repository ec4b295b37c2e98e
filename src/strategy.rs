use crate::{
    action::{BuildAction, BuildState},
    error::ConfigError,
    incrementor::{BuiltInIncrementor, Incrementor},
    processor::{BuiltInPostProcessor, PostProcessor},
};
use chrono::NaiveDateTime;
use std::{collections::BTreeMap, fmt, path::Path, sync::Arc};

/// Everything a strategy may consult when computing a new value.
///
/// Incrementors only look at the two timestamps and the project path. Post-processors may also
/// inspect the build action, state and trace flag.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// When the build started, already converted to UTC if the settings ask for it.
    pub build_start: NaiveDateTime,
    /// The configured project start date.
    pub project_start: NaiveDateTime,
    /// Path of the project file.
    pub project_path: &'a Path,
    /// The lifecycle event being handled.
    pub build_action: BuildAction,
    /// Whether the build is still running.
    pub build_state: BuildState,
    /// Whether the project is built with trace (debug) enabled.
    pub trace_enabled: bool,
}

/// Common behavior of named strategies kept in a [`Registry`].
pub trait Strategy: fmt::Debug + Send + Sync {
    /// The unique name of this strategy, as it appears in serialized versioning styles. Must be
    /// non-empty and must not contain `.`.
    fn name(&self) -> &str;

    /// A short human-readable description.
    fn description(&self) -> &str;
}

/// Returns true if `name` can be written into a versioning style string.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('.')
}

/// A name-indexed table of strategies of one kind, which always contains a no-op `None` entry.
#[derive(Debug)]
pub struct Registry<S: ?Sized + Strategy> {
    none: Arc<S>,
    entries: BTreeMap<String, Arc<S>>,
    unknown: fn(String) -> ConfigError,
}

impl<S: ?Sized + Strategy> Clone for Registry<S> {
    // manual impl: the derive would require `S: Clone`, which trait objects are not
    fn clone(&self) -> Self {
        Registry {
            none: Arc::clone(&self.none),
            entries: self.entries.clone(),
            unknown: self.unknown,
        }
    }
}

impl<S: ?Sized + Strategy> Registry<S> {
    fn with_none(none: Arc<S>, unknown: fn(String) -> ConfigError) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(none.name().to_owned(), Arc::clone(&none));
        Registry {
            none,
            entries,
            unknown,
        }
    }

    /// Adds a strategy under its own name.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidStrategyName`] if the name is empty or contains `.`.
    /// - [`ConfigError::DuplicateStrategy`] if the name is taken.
    pub fn register(&mut self, strategy: Arc<S>) -> Result<(), ConfigError> {
        let name = strategy.name().to_owned();
        if !is_valid_name(&name) {
            return Err(ConfigError::InvalidStrategyName { name });
        }
        if self.entries.contains_key(&name) {
            return Err(ConfigError::DuplicateStrategy { name });
        }
        log::debug!("Registered strategy `{name}`");
        self.entries.insert(name, strategy);
        Ok(())
    }

    /// Looks a strategy up by name.
    ///
    /// # Errors
    ///
    /// Returns the registry's "unknown name" error ([`ConfigError::UnknownIncrementor`] or
    /// [`ConfigError::UnknownPostProcessor`]) when nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<S>, ConfigError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| (self.unknown)(name.to_owned()))
    }

    /// The no-op sentinel.
    pub fn none(&self) -> Arc<S> {
        Arc::clone(&self.none)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Registered strategies, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<S>> {
        self.entries.values()
    }

    /// Number of registered strategies, the sentinel included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the sentinel is always present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of incrementors.
pub type IncrementorRegistry = Registry<dyn Incrementor>;

/// Registry of post-processors.
pub type PostProcessorRegistry = Registry<dyn PostProcessor>;

impl Registry<dyn Incrementor> {
    /// A registry holding every [`BuiltInIncrementor`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::with_none(Arc::new(BuiltInIncrementor::None), |name| {
            ConfigError::UnknownIncrementor { name }
        });
        for builtin in BuiltInIncrementor::ALL {
            if builtin != BuiltInIncrementor::None {
                registry
                    .entries
                    .insert(builtin.name().to_owned(), Arc::new(builtin));
            }
        }
        registry
    }
}

impl Registry<dyn PostProcessor> {
    /// A registry holding every [`BuiltInPostProcessor`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::with_none(Arc::new(BuiltInPostProcessor::None), |name| {
            ConfigError::UnknownPostProcessor { name }
        });
        for builtin in BuiltInPostProcessor::ALL {
            if builtin != BuiltInPostProcessor::None {
                registry
                    .entries
                    .insert(builtin.name().to_owned(), Arc::new(builtin));
            }
        }
        registry
    }
}

/// Source of additional strategies, e.g. a plugin bundling custom incrementors.
pub trait StrategyProvider {
    /// Incrementors to register.
    fn incrementors(&self) -> Vec<Arc<dyn Incrementor>> {
        Vec::new()
    }

    /// Post-processors to register.
    fn post_processors(&self) -> Vec<Arc<dyn PostProcessor>> {
        Vec::new()
    }
}

/// The incrementor and post-processor registries used to resolve versioning styles.
#[derive(Debug, Clone)]
pub struct Strategies {
    /// Incrementors by name.
    pub incrementors: IncrementorRegistry,
    /// Post-processors by name.
    pub post_processors: PostProcessorRegistry,
}

impl Strategies {
    /// Registers everything `provider` offers.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicate name; strategies registered before it stay.
    pub fn extend_from(&mut self, provider: &dyn StrategyProvider) -> Result<(), ConfigError> {
        for incrementor in provider.incrementors() {
            self.incrementors.register(incrementor)?;
        }
        for processor in provider.post_processors() {
            self.post_processors.register(processor)?;
        }
        Ok(())
    }
}

impl Default for Strategies {
    fn default() -> Self {
        Strategies {
            incrementors: IncrementorRegistry::with_builtins(),
            post_processors: PostProcessorRegistry::with_builtins(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{Version, VersionPart};

    #[derive(Debug)]
    struct Constant(&'static str, u32);

    impl Strategy for Constant {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Always the same value"
        }
    }

    impl Incrementor for Constant {
        fn increment(&self, _value: i64, _ctx: &BuildContext<'_>) -> u32 {
            self.1
        }
    }

    #[derive(Debug)]
    struct Zeroing;

    impl Strategy for Zeroing {
        fn name(&self) -> &str {
            "Zeroing"
        }

        fn description(&self) -> &str {
            "Zeroes the field"
        }
    }

    impl PostProcessor for Zeroing {
        fn process(&self, version: Version, part: VersionPart, _ctx: &BuildContext<'_>) -> Version {
            version.with(part, 0)
        }
    }

    struct Plugin;

    impl StrategyProvider for Plugin {
        fn incrementors(&self) -> Vec<Arc<dyn Incrementor>> {
            vec![Arc::new(Constant("FortyTwo", 42))]
        }

        fn post_processors(&self) -> Vec<Arc<dyn PostProcessor>> {
            vec![Arc::new(Zeroing)]
        }
    }

    #[test]
    fn test_builtins_registered() {
        let strategies = Strategies::default();
        assert_eq!(
            strategies.incrementors.len(),
            BuiltInIncrementor::ALL.len()
        );
        assert_eq!(
            strategies.post_processors.len(),
            BuiltInPostProcessor::ALL.len()
        );
        assert_eq!(strategies.incrementors.none().name(), "None");
        assert_eq!(strategies.post_processors.none().name(), "None");
        assert!(strategies.incrementors.get("YearDayOfYear").is_ok());
        assert!(strategies
            .post_processors
            .get("PreviousPartIncrements")
            .is_ok());
    }

    #[test]
    fn test_unknown_names_fail() {
        let strategies = Strategies::default();
        assert_eq!(
            strategies.incrementors.get("Bogus").unwrap_err(),
            ConfigError::UnknownIncrementor {
                name: "Bogus".to_string()
            }
        );
        assert_eq!(
            strategies.post_processors.get("Bogus").unwrap_err(),
            ConfigError::UnknownPostProcessor {
                name: "Bogus".to_string()
            }
        );
    }

    #[test]
    fn test_provider_extends_registries() {
        let mut strategies = Strategies::default();
        strategies.extend_from(&Plugin).unwrap();
        assert_eq!(
            strategies.incrementors.get("FortyTwo").unwrap().name(),
            "FortyTwo"
        );
        assert_eq!(
            strategies.post_processors.get("Zeroing").unwrap().name(),
            "Zeroing"
        );
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut strategies = Strategies::default();
        strategies.extend_from(&Plugin).unwrap();
        assert_eq!(
            strategies.extend_from(&Plugin),
            Err(ConfigError::DuplicateStrategy {
                name: "FortyTwo".to_string()
            })
        );
        assert_eq!(
            strategies
                .incrementors
                .register(Arc::new(BuiltInIncrementor::Increment)),
            Err(ConfigError::DuplicateStrategy {
                name: "Increment".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut registry = IncrementorRegistry::with_builtins();
        assert_eq!(
            registry.register(Arc::new(Constant("Dotted.Name", 1))),
            Err(ConfigError::InvalidStrategyName {
                name: "Dotted.Name".to_string()
            })
        );
        assert!(registry.register(Arc::new(Constant("", 1))).is_err());
    }
}
