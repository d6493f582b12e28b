//! Nested configuration trees and the flatten/unflatten transforms.
//!
//! A [`ConfigTree`] is the nested mapping handed back by a parse. The
//! dotted-path flattening used internally by the merge engine lives here
//! as well; [`flatten`] and [`unflatten`] are mutual inverses for any
//! mapping whose leaf keys never contain the separator and whose mapping
//! values are never empty.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::value::ConfigValue;

/// File name used when persisting a resolved configuration.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Flatten a nested mapping into dotted-path keys.
///
/// Every mapping value is descended into, joining parent and child keys
/// with `sep`; non-mapping values are copied as-is at their full joined
/// path.
///
/// # Examples
///
/// ```
/// use runcfg::tree::flatten;
/// use runcfg::ConfigValue;
/// use std::collections::BTreeMap;
///
/// let inner = BTreeMap::from([("b".to_string(), ConfigValue::Int(1))]);
/// let nested = BTreeMap::from([("a".to_string(), ConfigValue::Map(inner))]);
///
/// let flat = flatten(&nested, ".");
/// assert_eq!(flat.get("a.b"), Some(&ConfigValue::Int(1)));
/// ```
#[must_use]
pub fn flatten(map: &BTreeMap<String, ConfigValue>, sep: &str) -> BTreeMap<String, ConfigValue> {
    let mut flat = BTreeMap::new();
    flatten_into(map, sep, "", &mut flat);
    flat
}

fn flatten_into(
    map: &BTreeMap<String, ConfigValue>,
    sep: &str,
    prefix: &str,
    out: &mut BTreeMap<String, ConfigValue>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{sep}{key}")
        };
        match value {
            ConfigValue::Map(inner) => flatten_into(inner, sep, &path, out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Reverse the [`flatten`] operation.
///
/// Each flat key is split on `sep` and nested mappings are created along
/// the path. An existing non-mapping entry on an intermediate segment is
/// replaced by a mapping.
#[must_use]
pub fn unflatten(flat: &BTreeMap<String, ConfigValue>, sep: &str) -> BTreeMap<String, ConfigValue> {
    let mut root = BTreeMap::new();
    for (key, value) in flat {
        let segments: Vec<&str> = key.split(sep).collect();
        insert_path(&mut root, &segments, value.clone());
    }
    root
}

fn insert_path(root: &mut BTreeMap<String, ConfigValue>, path: &[&str], value: ConfigValue) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        root.insert((*head).to_string(), value);
        return;
    }
    let entry = root
        .entry((*head).to_string())
        .or_insert_with(|| ConfigValue::Map(BTreeMap::new()));
    if !matches!(entry, ConfigValue::Map(_)) {
        *entry = ConfigValue::Map(BTreeMap::new());
    }
    if let ConfigValue::Map(inner) = entry {
        insert_path(inner, rest, value);
    }
}

/// A parsed, nested configuration.
///
/// Built once per invocation by the merge engine and owned by the
/// invoking program for its entire run. Keys are addressed with dotted
/// paths (`test_fn.arg1`); serialization is sorted YAML.
///
/// # Examples
///
/// ```
/// use runcfg::{ConfigTree, ConfigValue};
///
/// let mut tree = ConfigTree::new();
/// tree.set("model.layers", 4);
/// assert_eq!(tree.get_int("model.layers"), Some(4));
/// assert_eq!(tree.get("model.missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree {
    root: BTreeMap<String, ConfigValue>,
}

impl ConfigTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from an already-nested mapping.
    #[must_use]
    pub fn from_map(root: BTreeMap<String, ConfigValue>) -> Self {
        Self { root }
    }

    /// Builds a tree by unflattening a dotted-path mapping.
    #[must_use]
    pub fn from_flat(flat: &BTreeMap<String, ConfigValue>, sep: &str) -> Self {
        Self {
            root: unflatten(flat, sep),
        }
    }

    /// Borrow the underlying nested mapping.
    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, ConfigValue> {
        &self.root
    }

    /// Flatten the tree into dotted-path keys.
    #[must_use]
    pub fn flatten(&self, sep: &str) -> BTreeMap<String, ConfigValue> {
        flatten(&self.root, sep)
    }

    /// Look up a value by dotted path.
    ///
    /// Each dot descends into a nested mapping. Returns `None` when a
    /// segment is absent or an intermediate value is not a mapping.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ConfigValue> {
        let mut segments = path.split('.');
        let mut current = self.root.get(segments.next()?)?;
        for segment in segments {
            match current {
                ConfigValue::Map(inner) => current = inner.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Look up a value by dotted path, falling back to a default.
    #[must_use]
    pub fn get_or<'a>(&'a self, path: &str, default: &'a ConfigValue) -> &'a ConfigValue {
        self.get(path).unwrap_or(default)
    }

    /// String accessor for a dotted path.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(ConfigValue::as_str)
    }

    /// Integer accessor for a dotted path.
    #[must_use]
    pub fn get_int(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(ConfigValue::as_int)
    }

    /// Float accessor for a dotted path.
    #[must_use]
    pub fn get_float(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(ConfigValue::as_float)
    }

    /// Boolean accessor for a dotted path.
    #[must_use]
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(ConfigValue::as_bool)
    }

    /// Set a value at a dotted path, creating intermediate mappings.
    pub fn set(&mut self, path: &str, value: impl Into<ConfigValue>) {
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut self.root, &segments, value.into());
    }

    /// Serialize the tree as a YAML document with sorted keys.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.root)?)
    }

    /// Persist the tree to `{workdir}/config.yaml` for reproducibility.
    ///
    /// The workdir is read from the tree's own `workdir` field. Directory
    /// creation is idempotent; an existing workdir is reused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the `workdir` field is unset and
    /// [`Error::InvalidPath`] when the directory or file cannot be written.
    pub fn persist(&self) -> Result<PathBuf> {
        let Some(workdir) = self.get_str("workdir") else {
            return Err(Error::Validation {
                field: "workdir".to_string(),
                message: "must be set before persisting the configuration".to_string(),
            });
        };
        let dir = PathBuf::from(workdir);
        fs::create_dir_all(&dir).map_err(|e| Error::InvalidPath {
            path: dir.clone(),
            reason: format!("failed to create workdir: {e}"),
        })?;

        let out_path = dir.join(CONFIG_FILE_NAME);
        let yaml = self.to_yaml()?;
        fs::write(&out_path, yaml).map_err(|e| Error::InvalidPath {
            path: out_path.clone(),
            reason: format!("failed to write configuration: {e}"),
        })?;
        log::debug!("persisted configuration to {}", out_path.display());
        Ok(out_path)
    }
}
