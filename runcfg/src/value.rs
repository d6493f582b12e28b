//! Configuration values and the kind inference used at registration time.
//!
//! Every registered option samples its default value once to pick a
//! [`ValueKind`], which fixes both the help-text label and the coercion
//! applied to strings supplied on the command line.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single configuration value.
///
/// Values are serialized untagged, so the YAML representation is the
/// natural one (`null`, `12`, `true`, nested mappings, ...). Mappings are
/// ordered so serialized output is stable and sorted by key.
///
/// # Examples
///
/// ```
/// use runcfg::ConfigValue;
///
/// let value: ConfigValue = serde_yaml::from_str("12").unwrap();
/// assert_eq!(value, ConfigValue::Int(12));
///
/// let value: ConfigValue = serde_yaml::from_str("[1, 2]").unwrap();
/// assert_eq!(
///     value,
///     ConfigValue::List(vec![ConfigValue::Int(1), ConfigValue::Int(2)])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// The null value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A sequence of values.
    List(Vec<ConfigValue>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Returns true for [`ConfigValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the string payload, if this value is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer payload, if this value is an integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload, if this value is a float.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// The boolean payload, if this value is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow the nested mapping, if this value is a mapping.
    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(value: Vec<ConfigValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(value: BTreeMap<String, ConfigValue>) -> Self {
        Self::Map(value)
    }
}

/// The kind tag sampled from a default value.
///
/// A kind is chosen once, at registration, and fixes both the display
/// label in generated help text and the coercion applied to raw command
/// line strings. A null sample cannot reconstruct its original type, so
/// null-kinded options coerce their input as strings.
///
/// # Examples
///
/// ```
/// use runcfg::{ConfigValue, ValueKind};
///
/// let kind = ValueKind::of(&ConfigValue::Int(12));
/// assert_eq!(kind, ValueKind::Int);
/// assert_eq!(kind.label(), "Integer");
/// assert_eq!(kind.coerce("seed", "7").unwrap(), ConfigValue::Int(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Sampled from a null default.
    Null,
    /// Sampled from a boolean default.
    Bool,
    /// Sampled from an integer default.
    Int,
    /// Sampled from a float default.
    Float,
    /// Sampled from a string default.
    Str,
    /// Sampled from a list default.
    List,
    /// Sampled from a mapping default.
    Map,
}

impl ValueKind {
    /// Sample the kind of a default value.
    #[must_use]
    pub fn of(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Self::Null,
            ConfigValue::Bool(_) => Self::Bool,
            ConfigValue::Int(_) => Self::Int,
            ConfigValue::Float(_) => Self::Float,
            ConfigValue::Str(_) => Self::Str,
            ConfigValue::List(_) => Self::List,
            ConfigValue::Map(_) => Self::Map,
        }
    }

    /// Human-readable label used in generated help text.
    ///
    /// The label table is total; every representable kind has a label, so
    /// help generation cannot fail.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Null => "NoneType",
            Self::Bool => "Boolean",
            Self::Int => "Integer",
            Self::Float => "Float",
            Self::Str => "String",
            Self::List => "List",
            Self::Map => "Dictionary",
        }
    }

    /// Coerce a raw command line string into a value of this kind.
    ///
    /// `flag` is the option name, used only for error reporting.
    /// Container kinds parse the raw string as a YAML fragment and require
    /// the matching shape.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BooleanParse`] for unrecognized boolean tokens and
    /// [`Error::Coercion`] for all other mismatches.
    pub fn coerce(self, flag: &str, raw: &str) -> Result<ConfigValue> {
        match self {
            Self::Null | Self::Str => Ok(ConfigValue::Str(raw.to_string())),
            Self::Bool => parse_bool(raw).map(ConfigValue::Bool),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(ConfigValue::Int)
                .map_err(|_| Error::Coercion {
                    flag: flag.to_string(),
                    input: raw.to_string(),
                    expected: "an integer",
                }),
            Self::Float => raw
                .trim()
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|_| Error::Coercion {
                    flag: flag.to_string(),
                    input: raw.to_string(),
                    expected: "a float",
                }),
            Self::List => match serde_yaml::from_str::<ConfigValue>(raw) {
                Ok(value @ ConfigValue::List(_)) => Ok(value),
                _ => Err(Error::Coercion {
                    flag: flag.to_string(),
                    input: raw.to_string(),
                    expected: "a YAML list",
                }),
            },
            Self::Map => match serde_yaml::from_str::<ConfigValue>(raw) {
                Ok(value @ ConfigValue::Map(_)) => Ok(value),
                _ => Err(Error::Coercion {
                    flag: flag.to_string(),
                    input: raw.to_string(),
                    expected: "a YAML mapping",
                }),
            },
        }
    }
}

/// Parse a boolean from its recognized string tokens.
///
/// Accepts case-insensitive `yes`, `true`, `t`, `y`, `1` for true and
/// `no`, `false`, `f`, `n`, `0` for false.
///
/// # Errors
///
/// Returns [`Error::BooleanParse`] for any other input.
///
/// # Examples
///
/// ```
/// use runcfg::value::parse_bool;
///
/// assert!(parse_bool("Yes").unwrap());
/// assert!(!parse_bool("0").unwrap());
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "true" | "t" | "y" | "1" => Ok(true),
        "no" | "false" | "f" | "n" | "0" => Ok(false),
        _ => Err(Error::BooleanParse {
            input: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_roundtrip_scalars() {
        let value: ConfigValue = serde_yaml::from_str("null").unwrap();
        assert_eq!(value, ConfigValue::Null);

        let value: ConfigValue = serde_yaml::from_str("true").unwrap();
        assert_eq!(value, ConfigValue::Bool(true));

        let value: ConfigValue = serde_yaml::from_str("12").unwrap();
        assert_eq!(value, ConfigValue::Int(12));

        let value: ConfigValue = serde_yaml::from_str("12.5").unwrap();
        assert_eq!(value, ConfigValue::Float(12.5));

        let value: ConfigValue = serde_yaml::from_str("hello").unwrap();
        assert_eq!(value, ConfigValue::Str("hello".to_string()));
    }

    #[test]
    fn test_yaml_nested_mapping() {
        let yaml = "a:\n  b: 1\n";
        let value: ConfigValue = serde_yaml::from_str(yaml).unwrap();
        let map = value.as_map().unwrap();
        let inner = map.get("a").unwrap().as_map().unwrap();
        assert_eq!(inner.get("b"), Some(&ConfigValue::Int(1)));
    }

    #[test]
    fn test_kind_sampling() {
        assert_eq!(ValueKind::of(&ConfigValue::Null), ValueKind::Null);
        assert_eq!(ValueKind::of(&ConfigValue::Bool(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&ConfigValue::Int(1)), ValueKind::Int);
        assert_eq!(ValueKind::of(&ConfigValue::Float(1.5)), ValueKind::Float);
        assert_eq!(
            ValueKind::of(&ConfigValue::Str("x".into())),
            ValueKind::Str
        );
        assert_eq!(ValueKind::of(&ConfigValue::List(vec![])), ValueKind::List);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ValueKind::Null.label(), "NoneType");
        assert_eq!(ValueKind::Bool.label(), "Boolean");
        assert_eq!(ValueKind::Int.label(), "Integer");
        assert_eq!(ValueKind::Float.label(), "Float");
        assert_eq!(ValueKind::Str.label(), "String");
        assert_eq!(ValueKind::List.label(), "List");
        assert_eq!(ValueKind::Map.label(), "Dictionary");
    }

    #[test]
    fn test_bool_true_tokens() {
        for token in ["yes", "true", "T", "Y", "1", "TRUE"] {
            assert!(parse_bool(token).unwrap(), "token {token} should be true");
        }
    }

    #[test]
    fn test_bool_false_tokens() {
        for token in ["no", "false", "F", "N", "0", "FALSE"] {
            assert!(!parse_bool(token).unwrap(), "token {token} should be false");
        }
    }

    #[test]
    fn test_bool_rejects_unrecognized_token() {
        let err = parse_bool("maybe").unwrap_err();
        assert!(matches!(err, Error::BooleanParse { .. }));
    }

    #[test]
    fn test_null_kind_coerces_as_string() {
        let value = ValueKind::Null.coerce("cfg_from", "some/path.yaml").unwrap();
        assert_eq!(value, ConfigValue::Str("some/path.yaml".to_string()));
    }

    #[test]
    fn test_int_coercion_failure() {
        let err = ValueKind::Int.coerce("seed", "abc").unwrap_err();
        assert!(matches!(err, Error::Coercion { .. }));
        assert!(format!("{err}").contains("--seed"));
    }

    #[test]
    fn test_list_coercion_parses_yaml_fragment() {
        let value = ValueKind::List.coerce("xs", "[1, 2, 3]").unwrap();
        assert_eq!(
            value,
            ConfigValue::List(vec![
                ConfigValue::Int(1),
                ConfigValue::Int(2),
                ConfigValue::Int(3)
            ])
        );
    }

    #[test]
    fn test_list_coercion_rejects_scalar() {
        assert!(ValueKind::List.coerce("xs", "7").is_err());
    }

    #[test]
    fn test_map_coercion() {
        let value = ValueKind::Map.coerce("m", "{a: 1}").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a"), Some(&ConfigValue::Int(1)));
        assert!(ValueKind::Map.coerce("m", "[1]").is_err());
    }

    #[test]
    fn test_display_for_help_text() {
        assert_eq!(format!("{}", ConfigValue::Null), "null");
        assert_eq!(format!("{}", ConfigValue::Int(12)), "12");
        assert_eq!(
            format!(
                "{}",
                ConfigValue::List(vec![ConfigValue::Int(1), ConfigValue::Int(2)])
            ),
            "[1, 2]"
        );
    }
}
