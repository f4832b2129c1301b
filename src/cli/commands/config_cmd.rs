//! config command - Get, set, or list configuration values

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::core::config::{ConfigStore, StoredConfig};
use crate::ui::output;

/// Keys accepted by `config get|set`.
const KEYS: [&str; 4] = ["username", "token", "private", "description"];

/// Get a configuration value.
pub fn get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.store()?.load_raw().context("Failed to load config")?;
    let value = read_key(&config, key)?;

    if !value.is_empty() {
        println!("{}", value);
    }
    Ok(())
}

/// Set a configuration value.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let store = ctx.store()?;
    let mut config = store.load_raw().context("Failed to load config")?;
    write_key(&mut config, key, value)?;
    store
        .save_raw(&config)
        .context("Failed to write config")?;

    if key == "token" {
        output::success("Set token (not validated; run 'ghpub setup' to check it)", ctx.verbosity);
    } else {
        output::success(format!("Set {} = {}", key, value.trim()), ctx.verbosity);
    }
    Ok(())
}

/// List all configuration values.
pub fn list(ctx: &Context) -> Result<()> {
    let store = ctx.store()?;
    let config = store.load_raw().context("Failed to load config")?;

    output::print(format!("# {}", store.path().display()), ctx.verbosity);
    for key in KEYS {
        let value = read_key(&config, key)?;
        println!(
            "{} = {}",
            key,
            if value.is_empty() { "(not set)" } else { value.as_str() }
        );
    }
    Ok(())
}

fn read_key(config: &StoredConfig, key: &str) -> Result<String> {
    Ok(match key {
        "username" => config.github_username.clone(),
        "token" => output::presence(&config.github_token).to_string(),
        "private" => config.default_private.to_string(),
        "description" => config.default_description.clone(),
        _ => bail!(unknown_key(key)),
    })
}

fn write_key(config: &mut StoredConfig, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key {
        "username" => config.github_username = value.to_string(),
        "token" => config.github_token = value.to_string(),
        "private" => {
            config.default_private = match value.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => bail!("Invalid value for private: '{}' (expected true or false)", value),
            }
        }
        "description" => config.default_description = value.to_string(),
        _ => bail!(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown configuration key: {} (expected one of: {})",
        key,
        KEYS.join(", ")
    )
}
