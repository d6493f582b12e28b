//! Demo entry point for the runcfg configuration assembly library.
//!
//! Builds a parser from several default sources, merges CLI input with an
//! optional config file, creates the run's working directory, persists the
//! resolved configuration and prints it as YAML:
//! - plain dictionary defaults (`lib`)
//! - signature defaults under the `test_fn` prefix
//! - staged collaborator defaults under `sub_class_args` and `sub_lib`,
//!   pulled from whichever module `--lib` names

mod collab;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use runcfg::{ConfigParser, Defaults, ModuleRegistry, Signature, DEFAULT_EXPORT};

fn main() -> anyhow::Result<()> {
    let logger = runcfg::init_logger(false, false);

    let mut registry = ModuleRegistry::new();
    registry.register("demo_lib", collab::collaborator());

    let mut parser = ConfigParser::new("demo");
    // Defaults from a plain dictionary.
    parser.add_args(&Defaults::new().with("lib", "demo_lib"), "");
    // Defaults from a declared function signature.
    parser.add_args(
        &Signature::new()
            .param("arg1", 12)
            .param("arg2", 43)
            .defaults()?,
        "test_fn",
    );
    // Defaults from the collaborator the `lib` option points at.
    parser.add_module_args(&registry, "lib", "sub_class_args", "Model")?;
    parser.add_module_args(&registry, "lib", "sub_lib", DEFAULT_EXPORT)?;

    let args = parser.parse()?;

    // Refuse to reuse a previous run's outputs.
    let workdir = args
        .get_str("workdir")
        .context("workdir missing from parsed configuration")?
        .to_string();
    if Path::new(&workdir).exists() {
        bail!("workdir `{workdir}` already exists; refusing to overwrite a previous run");
    }
    fs::create_dir_all(&workdir).with_context(|| format!("creating workdir `{workdir}`"))?;

    let saved = args.persist()?;
    logger.info(&format!("configuration saved to {}", saved.display()));

    println!("### Arguments for the run: ###");
    print!("{}", args.to_yaml()?);
    println!("-----");

    let only_arg = args
        .get_str("sub_class_args.only_arg")
        .context("sub_class_args.only_arg missing from parsed configuration")?;
    let model = collab::Model::new(only_arg);
    println!("Constructed model with `{}`.", model.only_arg);

    Ok(())
}
