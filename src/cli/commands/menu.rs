//! cli::commands::menu
//!
//! The interactive menu shown when `ghpub` runs without arguments.
//!
//! Loops over Settings / Upload folder / Exit until the user exits. A
//! failed upload is reported and the menu comes back.

use anyhow::{bail, Result};

use super::setup::{configure, SetupArgs};
use super::upload::{perform, suggested_name};
use super::Context;
use crate::core::config::ConfigStore;
use crate::core::types::BranchName;
use crate::publish::UploadRequest;
use crate::ui::output;
use crate::ui::prompts::{Interaction, PromptError, Prompter};

const MENU: [&str; 3] = ["Settings", "Upload folder", "Exit"];

/// Run the interactive menu.
pub fn menu(ctx: &Context) -> Result<()> {
    if !ctx.interactive {
        bail!("No folder given. Use 'ghpub <FOLDER>' or run in a terminal for the menu.");
    }

    let store = ctx.store()?;
    let mut prompter = Prompter::stdio();

    loop {
        prompter.say("")?;
        prompter.say(&status_line(&store))?;

        let choice = match prompter.select("What would you like to do?", &MENU, Some(1)) {
            Ok(choice) => choice,
            Err(PromptError::Cancelled) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        match choice {
            0 => {
                if let Err(e) = configure(ctx, &store, SetupArgs::default()) {
                    output::error(format!("{:#}", e));
                }
            }
            1 => upload_once(ctx, &store, &mut prompter)?,
            _ => return Ok(()),
        }
    }
}

fn status_line(store: &dyn ConfigStore) -> String {
    match store.load() {
        Some(creds) => format!("GitHub user: {}", creds.username),
        None => "GitHub user: not configured".to_string(),
    }
}

/// One pass of the upload entry. Only prompt I/O failures end the menu.
fn upload_once<I: Interaction>(
    ctx: &Context,
    store: &dyn ConfigStore,
    surface: &mut I,
) -> Result<()> {
    let Some(creds) = store.load() else {
        surface.report_failure("not configured: choose Settings first")?;
        return Ok(());
    };

    let folder = match surface.ask_folder() {
        Ok(folder) => folder,
        Err(PromptError::Cancelled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let name = match surface.ask_repo_name(&suggested_name(&folder)) {
        Ok(name) => name,
        Err(PromptError::Cancelled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let request = UploadRequest {
        source: folder,
        name: Some(name),
        private: None,
        description: None,
        branch: BranchName::main(),
    };

    match perform(ctx, &creds, &request) {
        Ok(outcome) => surface.report_success(&outcome.handle.web_url)?,
        Err(e) if e.needs_setup() => {
            surface.report_failure(&format!("{}; choose Settings to update them", e))?
        }
        Err(e) => surface.report_failure(&e.to_string())?,
    }
    Ok(())
}
