use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its subdirectories, an initial `config.json` with default settings
/// and the local SQLite database.
///
/// # Arguments
/// - `saoke_home` - The directory that will be the root of data directory, e.g. `$HOME/saoke`
///
/// # Errors
/// - Returns an error if any file operations fail or if the directory is already initialized.
pub async fn init(saoke_home: &Path) -> Result<Out<()>> {
    let config = Config::create(saoke_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the saoke directory at {}",
        config.root().display()
    )
    .into())
}
