//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads what it needs from the [`Context`] (config store, forge options)
//! 2. Collects missing input through prompts when the session is interactive
//! 3. Calls into the library and formats the result
//!
//! Handlers return `anyhow::Result`; `main` prints the single `error:` line.
//!
//! # Async Commands
//!
//! Commands that talk to GitHub build a tokio runtime and block on the
//! async work, so every command runs start to finish on the calling thread.

mod completion;
mod config_cmd;
mod menu;
mod setup;
mod status;
mod upload;

pub use completion::completion;
pub use config_cmd::{get as config_get, list as config_list, set as config_set};
pub use menu::menu;
pub use setup::{setup, SetupArgs};
pub use status::status;
pub use upload::upload;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction, UploadOptions};
use crate::core::config::FileConfigStore;
use crate::forge::ForgeOptions;
use crate::git::GitCli;
use crate::ui::output::Verbosity;

/// Settings shared by every command, taken from the global flags.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output verbosity.
    pub verbosity: Verbosity,
    /// Interactive mode enabled.
    pub interactive: bool,
    /// Config file override.
    pub config_path: Option<PathBuf>,
    /// How to reach GitHub.
    pub forge: ForgeOptions,
    /// Git executable for local steps.
    pub git: GitCli,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            interactive: false,
            config_path: None,
            forge: ForgeOptions::default(),
            git: GitCli::new(),
        }
    }
}

impl Context {
    /// The config store selected by `--config` or the standard search.
    pub fn store(&self) -> Result<FileConfigStore> {
        match &self.config_path {
            Some(path) => Ok(FileConfigStore::with_path(path.clone())),
            None => FileConfigStore::discover().context("Failed to locate config file"),
        }
    }

    /// Build a runtime for async work.
    fn runtime(&self) -> Result<tokio::runtime::Runtime> {
        tokio::runtime::Runtime::new().context("Failed to start async runtime")
    }
}

/// Dispatch a command to its handler.
///
/// With no subcommand, a bare folder argument uploads it and no argument at
/// all opens the menu.
pub fn dispatch(
    command: Option<Command>,
    folder: Option<PathBuf>,
    options: UploadOptions,
    ctx: &Context,
) -> Result<()> {
    match command {
        Some(Command::Setup {
            username,
            token,
            private,
            public,
            description,
        }) => setup(
            ctx,
            SetupArgs {
                username,
                token,
                private: visibility(private, public),
                description,
            },
        ),
        Some(Command::Upload { folder, options }) => upload(ctx, folder, &options),
        Some(Command::Status) => status(ctx),
        Some(Command::Config { action }) => match action {
            ConfigAction::Get { key } => config_get(ctx, &key),
            ConfigAction::Set { key, value } => config_set(ctx, &key, &value),
            ConfigAction::List => config_list(ctx),
        },
        Some(Command::Completion { shell }) => completion(shell),
        None => match folder {
            Some(folder) => upload(ctx, Some(folder), &options),
            None => menu(ctx),
        },
    }
}

fn visibility(private: bool, public: bool) -> Option<bool> {
    UploadOptions {
        private,
        public,
        ..Default::default()
    }
    .visibility()
}
