//! cli::commands::status
//!
//! Show whether credentials are configured. Never prints the token.

use anyhow::Result;

use super::Context;
use crate::core::config::ConfigStore;
use crate::ui::output;

/// Run the status command.
pub fn status(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    output::debug(
        format!("config file: {}", store.path().display()),
        ctx.verbosity,
    );

    let creds = store.load();
    if ctx.verbosity == output::Verbosity::Quiet {
        // Machine-readable output
        println!(
            "{}",
            if creds.is_some() {
                "configured"
            } else {
                "not_configured"
            }
        );
        return Ok(());
    }

    match creds {
        Some(creds) => {
            println!("Configured for {}.", creds.username);
            println!(
                "New repositories are {} by default.",
                if creds.default_private {
                    "private"
                } else {
                    "public"
                }
            );
            if !store.verify_permissions().unwrap_or(true) {
                output::warn(
                    format!(
                        "{} is readable by other users; it should be 0600",
                        store.path().display()
                    ),
                    ctx.verbosity,
                );
            }
        }
        None => {
            println!("Not configured.");
            println!("Run 'ghpub setup' to store a GitHub username and token.");
        }
    }

    Ok(())
}
