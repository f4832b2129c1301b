//! cli::commands::upload
//!
//! Upload a folder to GitHub.
//!
//! # Design
//!
//! With a folder argument and stored credentials the upload runs without
//! any prompt. Missing credentials trigger setup first in interactive mode
//! and fail with "not configured" otherwise.
//!
//! # Example
//!
//! ```bash
//! ghpub upload ./demo1
//! ghpub ./demo1 --name my-demo --private --open
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use super::setup::{configure, SetupArgs};
use super::Context;
use crate::cli::args::UploadOptions;
use crate::core::config::ConfigStore;
use crate::core::types::{BranchName, Credentials, RepoName};
use crate::forge::create_forge;
use crate::publish::{PublishError, Publisher, UploadOutcome, UploadRequest};
use crate::ui::output;
use crate::ui::prompts::{Interaction, PromptError, Prompter};

/// Run the upload command.
///
/// The outcome is always reported on stdout: `Uploaded: <url>` or
/// `Upload failed: <reason>`. Failures are also returned for `main`.
pub fn upload(ctx: &Context, folder: Option<PathBuf>, options: &UploadOptions) -> Result<()> {
    match attempt(ctx, folder, options) {
        Ok(outcome) => {
            report(ctx, &outcome);
            if options.open {
                open_in_browser(ctx, &outcome.handle.web_url);
            }
            Ok(())
        }
        Err(err) => {
            println!("Upload failed: {:#}", err);
            Err(err)
        }
    }
}

fn attempt(ctx: &Context, folder: Option<PathBuf>, options: &UploadOptions) -> Result<UploadOutcome> {
    let store = ctx.store()?;
    let creds = credentials_or_setup(ctx, &store)?;

    let mut prompter = ctx.interactive.then(Prompter::stdio);
    let (folder, name) = match folder {
        Some(folder) => (folder, options.name.clone()),
        None => {
            let Some(prompter) = prompter.as_mut() else {
                bail!("No folder given. Use 'ghpub upload <FOLDER>' or run interactively.");
            };
            let folder = prompter.ask_folder().map_err(cancellable)?;
            let name = match &options.name {
                Some(name) => name.clone(),
                None => prompter
                    .ask_repo_name(&suggested_name(&folder))
                    .map_err(cancellable)?,
            };
            (folder, Some(name))
        }
    };

    let request = build_request(folder, name, options)?;
    perform(ctx, &creds, &request).map_err(|err| {
        if err.leaves_remote() {
            output::warn(
                "the repository was created or reused but may be empty; rerunning the upload is safe",
                ctx.verbosity,
            );
        }
        anyhow::Error::from(err)
    })
}

/// A cancelled prompt ends the upload as [`PublishError::Cancelled`].
fn cancellable(err: PromptError) -> anyhow::Error {
    match err {
        PromptError::Cancelled => PublishError::Cancelled.into(),
        other => other.into(),
    }
}

/// Stored credentials, running setup first when interactive.
pub(crate) fn credentials_or_setup(ctx: &Context, store: &dyn ConfigStore) -> Result<Credentials> {
    if let Some(creds) = store.load() {
        return Ok(creds);
    }
    if !ctx.interactive {
        return Err(PublishError::ConfigurationMissing.into());
    }
    output::print("No credentials configured yet.", ctx.verbosity);
    configure(ctx, store, SetupArgs::default())
}

/// Publish one request and wait for it.
pub(crate) fn perform(
    ctx: &Context,
    creds: &Credentials,
    request: &UploadRequest,
) -> Result<UploadOutcome, PublishError> {
    let rt = ctx
        .runtime()
        .map_err(|e| PublishError::local_tool("runtime", e.to_string()))?;
    let forge = create_forge(&creds.token, &ctx.forge);
    let publisher = Publisher::new(forge.as_ref(), ctx.git.clone(), ctx.verbosity);
    rt.block_on(publisher.publish(creds, request))
}

/// Name offered for a folder when none was given.
pub(crate) fn suggested_name(folder: &Path) -> String {
    let resolved = folder.canonicalize().unwrap_or_else(|_| folder.to_path_buf());
    RepoName::suggest_for(&resolved)
        .map(|n| n.to_string())
        .unwrap_or_default()
}

fn build_request(
    folder: PathBuf,
    name: Option<String>,
    options: &UploadOptions,
) -> Result<UploadRequest> {
    let branch = BranchName::new(options.branch.clone()).context("Invalid --branch")?;
    Ok(UploadRequest {
        source: folder,
        name,
        private: options.visibility(),
        description: options.description.clone(),
        branch,
    })
}

fn report(ctx: &Context, outcome: &UploadOutcome) {
    // The URL line is the scripting contract, shown even in quiet mode
    println!("Uploaded: {}", outcome.handle.web_url);
    output::success(
        format!(
            "{} repository '{}' with commit {}",
            if outcome.created { "Created" } else { "Updated" },
            outcome.handle.name,
            outcome.commit.short_oid()
        ),
        ctx.verbosity,
    );
}

fn open_in_browser(ctx: &Context, url: &str) {
    output::debug(format!("opening {}", url), ctx.verbosity);
    if let Err(e) = open::that(url) {
        output::warn(format!("Could not open browser: {}", e), ctx.verbosity);
    }
}
