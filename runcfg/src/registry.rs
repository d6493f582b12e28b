//! Collaborator registry for staged option registration.
//!
//! Instead of importing modules by string path at runtime, collaborators
//! are registered in a named-lookup table at startup. The set of loadable
//! collaborators is therefore enumerable, and a mistyped module name is a
//! descriptive error rather than a load failure deep inside a parse.

use std::collections::BTreeMap;

use crate::defaults::{DefaultSource, Defaults};
use crate::error::{Error, Result};

/// A collaborator module exposing named default sources.
///
/// Each export plays the role of a top-level attribute of the original
/// module: a provider function or a type describing its constructor.
///
/// # Examples
///
/// ```
/// use runcfg::{Collaborator, DefaultSource, Defaults};
///
/// fn default_args() -> Defaults {
///     Defaults::new().with("v1", 12)
/// }
///
/// let collab = Collaborator::new().export("default_args", DefaultSource::Provider(default_args));
/// assert!(collab.get("default_args").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Collaborator {
    exports: BTreeMap<String, DefaultSource>,
}

impl Collaborator {
    /// Creates a collaborator with no exports.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named export, builder style.
    #[must_use]
    pub fn export(mut self, name: impl Into<String>, source: DefaultSource) -> Self {
        self.exports.insert(name.into(), source);
        self
    }

    /// Looks up an export by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DefaultSource> {
        self.exports.get(name)
    }
}

/// Named-lookup table of collaborators, populated at startup.
///
/// # Examples
///
/// ```
/// use runcfg::{Collaborator, DefaultSource, Defaults, ModuleRegistry};
///
/// fn default_args() -> Defaults {
///     Defaults::new().with("v1", 12)
/// }
///
/// let mut registry = ModuleRegistry::new();
/// registry.register(
///     "example_lib",
///     Collaborator::new().export("default_args", DefaultSource::Provider(default_args)),
/// );
///
/// let defaults = registry.resolve("example_lib", "default_args").unwrap();
/// assert_eq!(defaults.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<String, Collaborator>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collaborator under a module name.
    ///
    /// Re-registering a name replaces the previous collaborator.
    pub fn register(&mut self, name: impl Into<String>, collaborator: Collaborator) {
        let name = name.into();
        log::debug!("registering collaborator `{name}`");
        self.modules.insert(name, collaborator);
    }

    /// Returns true when a collaborator is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Resolve a collaborator export into its Default Specification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCollaborator`] when no collaborator is
    /// registered under `module`, [`Error::UnknownExport`] when the
    /// collaborator has no export named `export`, and any extraction error
    /// from the source itself.
    pub fn resolve(&self, module: &str, export: &str) -> Result<Defaults> {
        let collaborator = self
            .modules
            .get(module)
            .ok_or_else(|| Error::UnknownCollaborator {
                name: module.to_string(),
            })?;
        let source = collaborator
            .get(export)
            .ok_or_else(|| Error::UnknownExport {
                module: module.to_string(),
                export: export.to_string(),
            })?;
        source.defaults()
    }
}
