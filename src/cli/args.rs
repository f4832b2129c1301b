//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Trace every step on stderr
//! - `--interactive` / `--no-interactive`: Control prompts
//! - `--quiet` / `-q`: Minimal output
//! - `--config <path>`: Use this config file
//! - `--api-url <url>`: Talk to another GitHub API endpoint

use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// ghpub - Publish a local folder as a GitHub repository
#[derive(Parser, Debug)]
#[command(name = "ghpub")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # First run: store your username and a personal access token
    ghpub setup

    # Upload a folder (repository named after the folder)
    ghpub ./demo1

    # Pick the name and visibility explicitly
    ghpub upload ./demo1 --name my-demo --private

    # No arguments: interactive menu
    ghpub")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; implies --no-interactive
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable interactive prompts
    #[arg(long = "interactive", global = true, conflicts_with = "no_interactive")]
    pub interactive_flag: bool,

    /// Disable interactive prompts
    #[arg(long, global = true)]
    pub no_interactive: bool,

    /// Config file to use instead of the standard locations
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Folder to upload (same as `ghpub upload <FOLDER>`)
    pub folder: Option<PathBuf>,

    #[command(flatten)]
    pub upload: UploadOptions,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Determine if interactive mode is enabled.
    ///
    /// Returns true if:
    /// - `--interactive` was explicitly set, OR
    /// - Neither `--no-interactive` nor `--quiet` was set AND stdin is a TTY
    pub fn interactive(&self) -> bool {
        if self.interactive_flag {
            true
        } else if self.no_interactive || self.quiet {
            false
        } else {
            std::io::stdin().is_terminal()
        }
    }
}

/// Per-upload options.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOptions {
    /// Repository name (default: the folder name)
    #[arg(long, short = 'n', value_name = "NAME")]
    pub name: Option<String>,

    /// Create the repository as private
    #[arg(long, conflicts_with = "public")]
    pub private: bool,

    /// Create the repository as public
    #[arg(long)]
    pub public: bool,

    /// Repository description (default: the stored description)
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Branch to create and push
    #[arg(long, value_name = "BRANCH", default_value = "main")]
    pub branch: String,

    /// Open the repository in a browser after uploading
    #[arg(long)]
    pub open: bool,
}

impl UploadOptions {
    /// Visibility override, if either flag was given.
    pub fn visibility(&self) -> Option<bool> {
        match (self.private, self.public) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store and validate GitHub credentials
    #[command(
        name = "setup",
        long_about = "Store and validate GitHub credentials.\n\n\
            Prompts for anything not given on the command line, checks the token \
            against GitHub, and saves the settings only if the token is accepted.",
        after_help = "\
EXAMPLES:
    # Interactive
    ghpub setup

    # Non-interactive
    ghpub setup --username octocat --token ghp_xxxx --private"
    )]
    Setup {
        /// GitHub username (default: the token's account)
        #[arg(long, value_name = "USER")]
        username: Option<String>,

        /// Personal access token with the `repo` scope
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,

        /// Create repositories as private by default
        #[arg(long, conflicts_with = "public")]
        private: bool,

        /// Create repositories as public by default
        #[arg(long)]
        public: bool,

        /// Description for new repositories
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,
    },

    /// Upload a folder to GitHub
    #[command(
        name = "upload",
        long_about = "Upload a folder to GitHub as a single commit.\n\n\
            Creates the repository if it does not exist, or reuses it if it does, \
            then pushes the folder's contents (without any .git entries) as one \
            commit on a fresh branch.",
        after_help = "\
EXAMPLES:
    ghpub upload ./demo1
    ghpub upload ./demo1 --name my-demo --public --open"
    )]
    Upload {
        /// Folder to upload (prompted for when omitted)
        folder: Option<PathBuf>,

        #[command(flatten)]
        options: UploadOptions,
    },

    /// Show whether credentials are configured
    Status,

    /// Get, set, or list configuration values
    #[command(
        name = "config",
        after_help = "\
KEYS:
    username     GitHub username
    token        Personal access token (never displayed)
    private      Create repositories as private (true/false)
    description  Description for new repositories"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },
    /// List all configuration values
    List,
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
