#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # runcfg
//!
//! A library for assembling run configurations from heterogeneous default
//! sources, command line flags and YAML config files.
//!
//! A parser is seeded with Default Specifications (plain mappings,
//! provider functions, declared signatures or collaborator-module
//! exports); every default becomes a typed `--name` or `--prefix.name`
//! flag. Parsing merges the command line with an optional config file
//! (explicitly typed flags win, file values otherwise), validates the key
//! set against the declared schema, and materializes a nested
//! configuration with a resolved working directory.
//!
//! ## Core Types
//!
//! - [`ConfigValue`] and [`ValueKind`]: tagged option values and kind
//!   inference
//! - [`Defaults`], [`Signature`] and [`DefaultSource`]: default
//!   extraction
//! - [`ConfigParser`]: argument registration, merging and validation
//! - [`ConfigTree`]: the parsed, nested configuration
//! - [`ModuleRegistry`] and [`Collaborator`]: staged option registration
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use runcfg::{ConfigParser, Defaults};
//!
//! let mut parser = ConfigParser::new("example");
//! parser.add_args(&Defaults::new().with("arg1", 12).with("arg2", 43), "test_fn");
//!
//! let args = parser.parse_from(["example", "--test_fn.arg1", "99"]).unwrap();
//! assert_eq!(args.get_int("test_fn.arg1"), Some(99));
//! assert_eq!(args.get_int("test_fn.arg2"), Some(43));
//! ```

pub mod defaults;
pub mod error;
pub mod logging;
pub mod parser;
pub mod registry;
pub mod tree;
pub mod value;
pub mod workdir;

#[cfg(test)]
mod proptests;

// Re-export key types at crate root for convenience
pub use defaults::{Configurable, DefaultSource, Defaults, Param, Signature};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use parser::{
    load_config_file, reserved_defaults, ArgSpec, ConfigParser, CFG_FROM_KEY, DEFAULT_EXPORT,
    SEED_KEY, WORKDIR_KEY,
};
pub use registry::{Collaborator, ModuleRegistry};
pub use tree::{flatten, unflatten, ConfigTree, CONFIG_FILE_NAME};
pub use value::{ConfigValue, ValueKind};
pub use workdir::{resolve_workdir, resolve_workdir_in, WORKDIR_ROOT};
