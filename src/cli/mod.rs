//! cli
//!
//! Command-line interface layer for ghpub.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Build the [`commands::Context`] the handlers share
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, gathers any input a
//! human must supply, and hands plain values to [`crate::publish`]. The
//! workflow itself never prompts.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::forge::ForgeOptions;
use crate::git::GitCli;
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = commands::Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: cli.interactive(),
        config_path: cli.config.clone(),
        forge: ForgeOptions {
            api_base: cli.api_url.clone(),
            timeout: None,
        },
        git: GitCli::new(),
    };

    commands::dispatch(cli.command, cli.folder, cli.upload, &ctx)
}
