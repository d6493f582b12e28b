//! Default Specifications and the sources they are extracted from.
//!
//! A [`Defaults`] is the named set of option defaults used to seed a
//! parser. Collaborating code hands one over in one of three forms,
//! captured by [`DefaultSource`]: a plain mapping, a zero-argument
//! provider function, or a declared [`Signature`] whose every parameter
//! must carry a default.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::value::ConfigValue;

/// A named set of option defaults (a Default Specification).
///
/// Names are unique within their registration scope; ordering is stable
/// and sorted. A `Defaults` is built once per registration call and
/// immediately consumed by the registrar.
///
/// # Examples
///
/// ```
/// use runcfg::{ConfigValue, Defaults};
///
/// let defaults = Defaults::new().with("arg1", 12).with("arg2", 43);
/// assert_eq!(defaults.get("arg1"), Some(&ConfigValue::Int(12)));
/// assert_eq!(defaults.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults(BTreeMap<String, ConfigValue>);

impl Defaults {
    /// Creates an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named default, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds a named default in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Looks up a default by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.0.get(name)
    }

    /// Number of defaults in the specification.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the specification holds no defaults.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, default)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, ConfigValue)> for Defaults {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Defaults {
    type Item = (String, ConfigValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A single declared parameter of a [`Signature`].
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Declared default, or `None` for a parameter lacking one.
    pub default: Option<ConfigValue>,
}

/// A declared parameter list standing in for a callable's signature.
///
/// Collaborators state their parameters explicitly instead of being
/// introspected; extraction then requires a default on every parameter.
///
/// # Examples
///
/// ```
/// use runcfg::Signature;
///
/// let defaults = Signature::new()
///     .param("arg1", 12)
///     .param("arg2", 43)
///     .defaults()
///     .unwrap();
/// assert_eq!(defaults.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a parameter with a default value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
        });
        self
    }

    /// Declares a parameter without a default value.
    ///
    /// Extraction over a signature containing such parameters fails with
    /// an error naming all of them.
    #[must_use]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(Param {
            name: name.into(),
            default: None,
        });
        self
    }

    /// Borrow the declared parameters.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Extract the defaults declared by this signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDefaults`] enumerating every parameter that
    /// lacks a default, if any exist.
    pub fn defaults(&self) -> Result<Defaults> {
        let mut defaults = Defaults::new();
        let mut missing = Vec::new();

        for param in &self.params {
            match &param.default {
                Some(value) => defaults.insert(param.name.clone(), value.clone()),
                None => missing.push(param.name.clone()),
            }
        }

        if missing.is_empty() {
            Ok(defaults)
        } else {
            Err(Error::MissingDefaults(missing))
        }
    }
}

/// Capability for a type to describe its own configuration options.
///
/// The implementing type publishes the signature of its constructor; the
/// contract is static and checked at compile time rather than recovered
/// by runtime introspection.
///
/// # Examples
///
/// ```
/// use runcfg::{Configurable, DefaultSource, Signature};
///
/// struct Model;
///
/// impl Configurable for Model {
///     fn signature() -> Signature {
///         Signature::new().param("only_arg", "Lonely arg")
///     }
/// }
///
/// let defaults = DefaultSource::of::<Model>().defaults().unwrap();
/// assert_eq!(defaults.len(), 1);
/// ```
pub trait Configurable {
    /// The declared constructor signature of the implementing type.
    fn signature() -> Signature;
}

/// One of the three forms a Default Specification can be sourced from.
///
/// The set of forms is closed at compile time; there is no runtime
/// "unsupported source" case to reject.
#[derive(Debug, Clone)]
pub enum DefaultSource {
    /// An already-assembled mapping, used unchanged.
    Map(Defaults),
    /// A zero-argument provider trusted to return a Default Specification.
    Provider(fn() -> Defaults),
    /// A declared parameter list whose defaults are extracted.
    Signature(Signature),
}

impl DefaultSource {
    /// Wraps a [`Configurable`] type's signature as a source.
    #[must_use]
    pub fn of<T: Configurable>() -> Self {
        Self::Signature(T::signature())
    }

    /// Extract the Default Specification from this source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDefaults`] when a signature parameter lacks
    /// a default.
    pub fn defaults(&self) -> Result<Defaults> {
        match self {
            Self::Map(defaults) => Ok(defaults.clone()),
            Self::Provider(provider) => Ok(provider()),
            Self::Signature(signature) => signature.defaults(),
        }
    }
}
