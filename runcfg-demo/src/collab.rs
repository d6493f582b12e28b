//! The demo collaborator module.
//!
//! Plays the role of a library that other programs configure through the
//! registry: it exposes a `default_args` provider and a model type that
//! describes its own constructor options.

use runcfg::{Collaborator, Configurable, DefaultSource, Defaults, Signature, DEFAULT_EXPORT};

/// Defaults the collaborator contributes when pulled in via `--lib`.
pub fn default_args() -> Defaults {
    Defaults::new().with("v1", 12).with("name", "demo_lib")
}

/// A model constructed from a single defaulted argument.
pub struct Model {
    /// The argument the model stores.
    pub only_arg: String,
}

impl Configurable for Model {
    fn signature() -> Signature {
        Signature::new().param("only_arg", "Lonely arg")
    }
}

impl Model {
    /// Build the model from a parsed configuration subtree value.
    pub fn new(only_arg: &str) -> Self {
        Self {
            only_arg: only_arg.to_string(),
        }
    }
}

/// The collaborator as registered in the demo's module registry.
pub fn collaborator() -> Collaborator {
    Collaborator::new()
        .export(DEFAULT_EXPORT, DefaultSource::Provider(default_args))
        .export("Model", DefaultSource::of::<Model>())
}
