//! Command implementations for mirror-cli

pub mod diff;
pub mod sync;

pub use diff::run_diff;
pub use sync::{run_download, run_sync, run_upload};

use std::path::Path;
use std::sync::Arc;

use mirror_core::{MirrorConfig, Reconciler};

use crate::console::ConsoleObserver;
use crate::error::{CliError, Result};

/// Load the config at `path`, mapping failures to [`CliError::Config`].
pub fn load_config(path: &Path) -> Result<MirrorConfig> {
    let config = MirrorConfig::load(path).map_err(|e| CliError::config(path, e))?;
    tracing::debug!(
        directory = %config.directory.display(),
        bucket = %config.bucket,
        "loaded config"
    );
    Ok(config)
}

/// Reconciler for the config at `path`, reporting progress to the console.
pub fn console_reconciler(path: &Path) -> Result<Reconciler> {
    Ok(load_config(path)?
        .reconciler()
        .with_observer(Arc::new(ConsoleObserver)))
}
