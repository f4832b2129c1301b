//! cli::commands::setup
//!
//! Store and validate GitHub credentials.
//!
//! # Design
//!
//! - Values given as flags are used as-is; anything missing is prompted
//!   for in interactive mode, or is an error otherwise
//! - The token is validated against `GET /user` before anything is saved
//! - The token is NEVER printed; its prompt does not echo
//!
//! # Example
//!
//! ```bash
//! # Interactive (prompts for token)
//! ghpub setup
//!
//! # Non-interactive
//! ghpub setup --username octocat --token ghp_xxxx --private
//! ```

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::auth::{complete_setup, SetupError, SetupRequest};
use crate::core::config::{ConfigStore, StoredConfig};
use crate::core::types::Credentials;
use crate::forge::create_forge;
use crate::publish::PublishError;
use crate::ui::output;
use crate::ui::prompts::Prompter;

/// Setup values supplied on the command line.
#[derive(Default)]
pub struct SetupArgs {
    /// GitHub username
    pub username: Option<String>,
    /// Personal access token
    pub token: Option<String>,
    /// Default visibility override
    pub private: Option<bool>,
    /// Default description
    pub description: Option<String>,
}

/// Run the setup command.
pub fn setup(ctx: &Context, args: SetupArgs) -> Result<()> {
    let store = ctx.store()?;
    let creds = configure(ctx, &store, args)?;

    output::success(
        format!(
            "Configured for {} (saved to {})",
            creds.username,
            store.path().display()
        ),
        ctx.verbosity,
    );
    Ok(())
}

/// Collect, validate and save credentials.
///
/// Existing stored values are offered as defaults.
pub(crate) fn configure(
    ctx: &Context,
    store: &dyn ConfigStore,
    args: SetupArgs,
) -> Result<Credentials> {
    let existing = store.load_raw().unwrap_or_default();
    let request = collect(ctx, args, &existing)?;

    output::debug("validating token", ctx.verbosity);
    let forge = create_forge(&request.token, &ctx.forge.for_validation());

    let rt = ctx.runtime()?;
    match rt.block_on(complete_setup(store, forge.as_ref(), request)) {
        Ok(creds) => Ok(creds),
        Err(SetupError::InvalidToken(reason)) => {
            output::debug(reason, ctx.verbosity);
            Err(PublishError::AuthInvalid).context("Token validation failed; nothing was saved")
        }
        Err(e @ SetupError::SaveFailed) => Err(e).context("Failed to write configuration"),
    }
}

fn collect(
    ctx: &Context,
    args: SetupArgs,
    existing: &StoredConfig,
) -> Result<SetupRequest> {
    let complete = args.token.is_some();
    if !ctx.interactive {
        let Some(token) = args.token else {
            bail!("Token required. Use --token <TOKEN> or run interactively.");
        };
        return Ok(SetupRequest {
            username: args
                .username
                .or_else(|| Some(existing.github_username.clone())),
            token,
            default_private: args.private.unwrap_or(existing.default_private),
            default_description: args
                .description
                .unwrap_or_else(|| existing.default_description.clone()),
        });
    }

    let mut prompter = Prompter::stdio();

    let username = match args.username {
        Some(u) => u,
        None if complete => existing.github_username.clone(),
        None => prompter.input(
            "GitHub username (empty to use the token's account)",
            Some(existing.github_username.as_str()),
        )?,
    };

    let token = match args.token {
        Some(t) => t,
        None => {
            let t = prompter.password("GitHub Personal Access Token")?;
            if t.is_empty() {
                bail!("Token cannot be empty.");
            }
            t
        }
    };

    let default_private = match args.private {
        Some(p) => p,
        None if complete => existing.default_private,
        None => prompter.confirm("Create repositories as private?", existing.default_private)?,
    };

    let default_description = match args.description {
        Some(d) => d,
        None if complete => existing.default_description.clone(),
        None => prompter.input(
            "Default repository description",
            Some(existing.default_description.as_str()),
        )?,
    };

    Ok(SetupRequest {
        username: Some(username),
        token,
        default_private,
        default_description,
    })
}
