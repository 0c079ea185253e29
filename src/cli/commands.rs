//! cli::commands
//!
//! Command handlers: translate parsed arguments into engine calls.

use anyhow::{anyhow, Context as _, Result};
use clap::CommandFactory;
use std::path::Path;

use crate::config;
use crate::core::types::{LanguageTag, NodeId};
use crate::engine::{self, MissingBaselinePolicy, ProvisionRequest};
use crate::repo::{seed, Repository};
use crate::ui::{output, ConsoleNotifier, Verbosity};

use super::args::{Cli, Command};

/// Dispatch a parsed command.
pub fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Seed { snapshot, config } => run_seed(&snapshot, &config, verbosity),
        Command::Provision {
            snapshot,
            config,
            parent,
            name,
            host_names,
            languages,
            baseline,
            principal,
            skip_missing_baseline,
        } => run_provision(ProvisionArgs {
            snapshot,
            config,
            parent,
            name,
            host_names,
            languages,
            baseline,
            principal,
            skip_missing_baseline,
            verbosity,
        }),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_seed(snapshot: &Path, config_path: &Path, verbosity: Verbosity) -> Result<()> {
    let seeded = seed::starter();
    seeded
        .repo
        .save(snapshot)
        .with_context(|| format!("writing snapshot to {}", snapshot.display()))?;
    config::save(&seeded.config, config_path)
        .with_context(|| format!("writing config to {}", config_path.display()))?;

    output::print(
        format!("seeded repository at {}", snapshot.display()),
        verbosity,
    );
    output::print(format!("content parent: {}", seeded.content), verbosity);
    output::print(format!("sites folder:   {}", seeded.sites), verbosity);
    output::print(format!("language catalog: {}", seeded.catalog), verbosity);
    Ok(())
}

struct ProvisionArgs {
    snapshot: std::path::PathBuf,
    config: std::path::PathBuf,
    parent: String,
    name: String,
    host_names: String,
    languages: String,
    baseline: String,
    principal: String,
    skip_missing_baseline: bool,
    verbosity: Verbosity,
}

fn run_provision(args: ProvisionArgs) -> Result<()> {
    let repo = Repository::load(&args.snapshot)
        .with_context(|| format!("loading snapshot from {}", args.snapshot.display()))?;
    let config = config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;

    let parent = NodeId::parse(&args.parent)
        .map_err(|e| anyhow!("invalid --parent identifier: {e}"))?;
    let baseline = LanguageTag::new(args.baseline.as_str())
        .map_err(|e| anyhow!("invalid --baseline language: {e}"))?;

    let request = ProvisionRequest {
        parent,
        site_name: args.name,
        host_names: args.host_names,
        languages: args.languages,
        baseline,
        principal: args.principal,
        missing_baseline: if args.skip_missing_baseline {
            MissingBaselinePolicy::Skip
        } else {
            MissingBaselinePolicy::Halt
        },
    };

    output::debug(
        format!("provisioning \"{}\" under {}", request.site_name, parent),
        args.verbosity,
    );

    let root = engine::provision(&repo, &config, &ConsoleNotifier, &request)?;

    repo.save(&args.snapshot)
        .with_context(|| format!("saving snapshot to {}", args.snapshot.display()))?;

    output::print(root, args.verbosity);
    Ok(())
}
