//! Command implementations

pub mod check;
pub mod completions;
pub mod configure;
pub mod domains;
pub mod query;

use anyhow::{Context, Result};

use osconfig::util::config::{global_config_path, load_config, project_config_path};
use osconfig::util::Config;

/// Load the merged global and project configuration.
pub fn load_settings() -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    let global = global_config_path();

    Ok(load_config(global.as_deref(), &project_config_path(&cwd)))
}
