//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Sitewright - site provisioning for hierarchical content repositories
#[derive(Parser, Debug)]
#[command(name = "sw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter repository snapshot and matching engine config
    Seed {
        /// Where to write the repository snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Where to write the engine configuration (TOML)
        #[arg(long)]
        config: PathBuf,
    },

    /// Provision a new site into an existing repository snapshot
    Provision {
        /// Repository snapshot to load and save back (JSON)
        #[arg(long)]
        snapshot: PathBuf,

        /// Engine configuration (TOML)
        #[arg(long)]
        config: PathBuf,

        /// Identifier of the parent node to create the site under
        #[arg(long)]
        parent: String,

        /// Name of the new site
        #[arg(long)]
        name: String,

        /// Host names for the site definition
        #[arg(long, default_value = "")]
        host_names: String,

        /// Delimiter-separated language list, e.g. "en|es-US"
        #[arg(long)]
        languages: String,

        /// Baseline language whose versions are replicated
        #[arg(long, default_value = "en")]
        baseline: String,

        /// Acting principal recorded in the audit trail
        #[arg(long, default_value = "admin")]
        principal: String,

        /// Skip nodes without a baseline instead of halting the walk
        #[arg(long)]
        skip_missing_baseline: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn provision_args_parse() {
        let cli = Cli::try_parse_from([
            "sw",
            "provision",
            "--snapshot",
            "repo.json",
            "--config",
            "engine.toml",
            "--parent",
            "{04D330F9-7B12-4A65-B4FD-55FDDCDF8F6B}",
            "--name",
            "Website A",
            "--languages",
            "en|es-US",
        ])
        .unwrap();
        match cli.command {
            Command::Provision {
                languages,
                baseline,
                skip_missing_baseline,
                ..
            } => {
                assert_eq!(languages, "en|es-US");
                assert_eq!(baseline, "en");
                assert!(!skip_missing_baseline);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
