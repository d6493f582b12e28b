//! Dynamic argument registration and the merge & validate engine.
//!
//! [`ConfigParser`] owns the declared option schema: every registered
//! default becomes a typed `--name` (or `--prefix.name`) flag on a
//! dynamically built [`clap::Command`]. Parsing merges command line input
//! with an optional YAML config file, with explicitly typed CLI flags
//! taking precedence over file values, and validates the merged key set
//! against the declared schema.

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};

use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::registry::ModuleRegistry;
use crate::tree::{flatten, ConfigTree};
use crate::value::{ConfigValue, ValueKind};
use crate::workdir::resolve_workdir;

/// Reserved integer option seeding random number generators.
pub const SEED_KEY: &str = "seed";
/// Reserved option naming the YAML file to merge the command line with.
pub const CFG_FROM_KEY: &str = "cfg_from";
/// Reserved option naming the run's output directory.
pub const WORKDIR_KEY: &str = "workdir";

/// Export name conventionally used by collaborator modules.
pub const DEFAULT_EXPORT: &str = "default_args";

/// The defaults injected into every parser at construction.
///
/// `seed` is 0, `cfg_from` and `workdir` are null until supplied or, for
/// the workdir, resolved after the parse.
#[must_use]
pub fn reserved_defaults() -> Defaults {
    Defaults::new()
        .with(SEED_KEY, 0)
        .with(CFG_FROM_KEY, ConfigValue::Null)
        .with(WORKDIR_KEY, ConfigValue::Null)
}

/// A registered option: name, inferred kind, default and help text.
///
/// Created at registration time and immutable afterward.
#[derive(Debug, Clone)]
pub struct ArgSpec {
    /// Fully prefixed option name, doubling as the long flag.
    pub name: String,
    /// Kind sampled from the default value.
    pub kind: ValueKind,
    /// Value used when the flag is not supplied on the command line.
    pub default: ConfigValue,
    /// Generated help text.
    pub help: String,
}

/// Whether a parse is strict about unknown flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    /// Unknown flags are a fatal error; the merged result is validated.
    Full,
    /// Only known flags are read; unknown input is ignored.
    KnownOnly,
}

/// Argument parser assembled from Default Specifications.
///
/// # Examples
///
/// ```
/// use runcfg::{ConfigParser, Defaults};
///
/// let mut parser = ConfigParser::new("example");
/// parser.add_args(&Defaults::new().with("arg1", 12).with("arg2", 43), "test_fn");
///
/// let args = parser.parse_from(["example", "--test_fn.arg1", "99"]).unwrap();
/// assert_eq!(args.get_int("test_fn.arg1"), Some(99));
/// assert_eq!(args.get_int("test_fn.arg2"), Some(43));
/// ```
#[derive(Debug, Clone)]
pub struct ConfigParser {
    program: String,
    specs: Vec<ArgSpec>,
}

impl ConfigParser {
    /// Creates a parser for `program` with the reserved options
    /// registered.
    ///
    /// The program name is also used by the workdir resolver.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        let mut parser = Self {
            program: program.into(),
            specs: Vec::new(),
        };
        parser.add_args(&reserved_defaults(), "");
        parser
    }

    /// The program name the parser was created with.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The registered options, in registration order.
    #[must_use]
    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    /// Register every entry of a Default Specification as a typed option.
    ///
    /// The flag is `--{prefix}.{name}` when `prefix` is non-empty and
    /// `--{name}` otherwise; the kind and coercion are inferred from the
    /// default value; the help text reports the default and its kind
    /// label. No uniqueness check is performed here: registering the same
    /// flag twice is a caller error surfaced by the underlying parsing
    /// library as a startup failure.
    pub fn add_args(&mut self, defaults: &Defaults, prefix: &str) {
        for (name, value) in defaults.iter() {
            let name = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{prefix}.{name}")
            };
            let kind = ValueKind::of(value);
            let help = format!("Default: `{value}`. Type: {}", kind.label());
            log::debug!("registering option --{name}");
            self.specs.push(ArgSpec {
                name,
                kind,
                default: value.clone(),
                help,
            });
        }
    }

    /// Register options exported by the collaborator a previously
    /// registered option points at.
    ///
    /// Performs a partial parse of the process arguments to read the
    /// value at `module_key`. A null value is a no-op, allowing staged
    /// and optional collaborator registration. Otherwise the named
    /// collaborator is looked up in `registry`, its `export` is run
    /// through default extraction, and the result is registered under
    /// `prefix`. Only options registered before this call are visible to
    /// the partial parse it performs.
    ///
    /// # Errors
    ///
    /// Returns registry lookup and default extraction errors, plus any
    /// partial-parse failure.
    pub fn add_module_args(
        &mut self,
        registry: &ModuleRegistry,
        module_key: &str,
        prefix: &str,
        export: &str,
    ) -> Result<()> {
        self.add_module_args_impl(
            registry,
            module_key,
            prefix,
            export,
            std::env::args_os().collect(),
        )
    }

    /// [`ConfigParser::add_module_args`] with an explicit argument list.
    ///
    /// The first element of `argv` is the program name, as the process
    /// argument list would have it.
    ///
    /// # Errors
    ///
    /// See [`ConfigParser::add_module_args`].
    pub fn add_module_args_from<I, T>(
        &mut self,
        registry: &ModuleRegistry,
        module_key: &str,
        prefix: &str,
        export: &str,
        argv: I,
    ) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.add_module_args_impl(
            registry,
            module_key,
            prefix,
            export,
            argv.into_iter().map(Into::into).collect(),
        )
    }

    fn add_module_args_impl(
        &mut self,
        registry: &ModuleRegistry,
        module_key: &str,
        prefix: &str,
        export: &str,
        argv: Vec<OsString>,
    ) -> Result<()> {
        let probe = self.resolve(argv, ParseMode::KnownOnly)?;
        match probe.get(module_key) {
            None | Some(ConfigValue::Null) => {
                log::debug!("module key `{module_key}` is unset, skipping registration");
                Ok(())
            }
            Some(ConfigValue::Str(module)) => {
                let module = module.clone();
                let defaults = registry.resolve(&module, export)?;
                log::debug!(
                    "registering {} option(s) from `{module}` export `{export}` under `{prefix}`",
                    defaults.len()
                );
                self.add_args(&defaults, prefix);
                Ok(())
            }
            Some(other) => Err(Error::Validation {
                field: module_key.to_string(),
                message: format!(
                    "expected a module name string, got {}",
                    ValueKind::of(other).label()
                ),
            }),
        }
    }

    /// Parse the process arguments strictly and return the merged,
    /// validated configuration.
    ///
    /// # Errors
    ///
    /// Fails on unknown flags, coercion failures, config file problems
    /// and schema mismatches.
    pub fn parse(&self) -> Result<ConfigTree> {
        self.resolve(std::env::args_os().collect(), ParseMode::Full)
    }

    /// [`ConfigParser::parse`] with an explicit argument list.
    ///
    /// The first element of `argv` is the program name.
    ///
    /// # Errors
    ///
    /// See [`ConfigParser::parse`].
    pub fn parse_from<I, T>(&self, argv: I) -> Result<ConfigTree>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.resolve(argv.into_iter().map(Into::into).collect(), ParseMode::Full)
    }

    /// Parse only the known flags out of the process arguments.
    ///
    /// Unknown input is ignored and no schema validation runs; the result
    /// is restricted to already-registered keys.
    ///
    /// # Errors
    ///
    /// Fails on coercion failures and config file problems.
    pub fn parse_known(&self) -> Result<ConfigTree> {
        self.resolve(std::env::args_os().collect(), ParseMode::KnownOnly)
    }

    /// [`ConfigParser::parse_known`] with an explicit argument list.
    ///
    /// # Errors
    ///
    /// See [`ConfigParser::parse_known`].
    pub fn parse_known_from<I, T>(&self, argv: I) -> Result<ConfigTree>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.resolve(
            argv.into_iter().map(Into::into).collect(),
            ParseMode::KnownOnly,
        )
    }

    /// Build the clap command from the registered specs.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program.clone());
        for spec in &self.specs {
            command = command.arg(
                Arg::new(spec.name.clone())
                    .long(spec.name.clone())
                    .help(spec.help.clone())
                    .action(ArgAction::Set),
            );
        }
        command
    }

    fn resolve(&self, argv: Vec<OsString>, mode: ParseMode) -> Result<ConfigTree> {
        let command = self.build_command();
        let matches = match mode {
            ParseMode::Full => command.try_get_matches_from(argv)?,
            ParseMode::KnownOnly => command.ignore_errors(true).try_get_matches_from(argv)?,
        };

        // Materialize every known option, recording which ones the user
        // explicitly typed. The parsing layer itself reports provenance,
        // so no raw argv scanning is needed.
        let mut flat = BTreeMap::new();
        let mut cli_passed = BTreeSet::new();
        for spec in &self.specs {
            let explicit = matches.value_source(&spec.name) == Some(ValueSource::CommandLine);
            let value = if explicit {
                match matches.get_one::<String>(&spec.name) {
                    Some(raw) => spec.kind.coerce(&spec.name, raw)?,
                    None => spec.default.clone(),
                }
            } else {
                spec.default.clone()
            };
            if explicit && spec.name != CFG_FROM_KEY {
                cli_passed.insert(spec.name.clone());
            }
            flat.insert(spec.name.clone(), value);
        }

        let cfg_from = flat.get(CFG_FROM_KEY).cloned().unwrap_or(ConfigValue::Null);
        let merged = if let ConfigValue::Str(path) = &cfg_from {
            self.merge_with_file(Path::new(path), &flat, &cli_passed, mode)?
        } else {
            flat
        };

        let mut args = ConfigTree::from_flat(&merged, ".");
        if mode == ParseMode::Full {
            self.check_keys(&args)?;
        }

        if matches!(args.get(WORKDIR_KEY), Some(ConfigValue::Null)) {
            let workdir = resolve_workdir(&self.program);
            let workdir = workdir.to_string_lossy().to_string();
            log::debug!("workdir unset, resolved to {workdir}");
            args.set(WORKDIR_KEY, workdir);
        }

        Ok(args)
    }

    /// Merge flat CLI values over a config file's flattened contents.
    ///
    /// File values are the base; only keys the user explicitly typed
    /// overwrite them. Options left at their registered default never
    /// shadow a file value.
    fn merge_with_file(
        &self,
        path: &Path,
        cli_flat: &BTreeMap<String, ConfigValue>,
        cli_passed: &BTreeSet<String>,
        mode: ParseMode,
    ) -> Result<BTreeMap<String, ConfigValue>> {
        let file_map = load_config_file(path)?;
        let mut merged = flatten(&file_map, ".");

        let known: BTreeSet<&str> = self.specs.iter().map(|spec| spec.name.as_str()).collect();
        for key in cli_passed {
            // The passed set is derived from the parser's own matches, so
            // it is always a subset of the known keys; guard the
            // invariant anyway.
            if !known.contains(key.as_str()) {
                return Err(Error::UnknownCliArgument { name: key.clone() });
            }
            if let Some(value) = cli_flat.get(key) {
                merged.insert(key.clone(), value.clone());
            }
        }

        if mode == ParseMode::KnownOnly {
            merged.retain(|key, _| known.contains(key.as_str()));
        }

        Ok(merged)
    }

    /// Validate the merged configuration against the declared schema.
    ///
    /// Missing keys and unexpected keys each produce an error listing
    /// every offender.
    fn check_keys(&self, args: &ConfigTree) -> Result<()> {
        let declared: BTreeSet<String> = self.specs.iter().map(|spec| spec.name.clone()).collect();
        let actual: BTreeSet<String> = args.flatten(".").keys().cloned().collect();

        let missing: Vec<String> = declared.difference(&actual).cloned().collect();
        if !missing.is_empty() {
            return Err(Error::MissingKeys(missing));
        }

        let unexpected: Vec<String> = actual.difference(&declared).cloned().collect();
        if !unexpected.is_empty() {
            return Err(Error::UnexpectedKeys(unexpected));
        }

        Ok(())
    }
}

/// Load a YAML config file into a nested mapping.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when the file cannot be read and
/// [`Error::Validation`] when it is not valid YAML or its top level is
/// not a mapping.
pub fn load_config_file(path: &Path) -> Result<BTreeMap<String, ConfigValue>> {
    let contents = fs::read_to_string(path).map_err(|e| Error::InvalidPath {
        path: path.to_path_buf(),
        reason: format!("failed to read configuration file: {e}"),
    })?;

    let value: ConfigValue = serde_yaml::from_str(&contents).map_err(|e| Error::Validation {
        field: path.display().to_string(),
        message: format!("invalid YAML: {e}"),
    })?;

    match value {
        ConfigValue::Map(map) => Ok(map),
        other => Err(Error::Validation {
            field: path.display().to_string(),
            message: format!(
                "expected a top-level mapping, got {}",
                ValueKind::of(&other).label()
            ),
        }),
    }
}
