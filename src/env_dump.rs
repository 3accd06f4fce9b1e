//! Environment dump for troubleshooting plugin invocations
//!
//! Argo CD builds the plugin environment from several sources (repo-server
//! env, Application plugin env, build env). With `--env` the whole environment
//! is written as a JSON object so an operator can see what the plugin saw.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// Writes the environment snapshot to a file
pub struct EnvDump {
    path: PathBuf,
}

impl EnvDump {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write the given variables, sorted by name
    ///
    /// Failures are logged and dropped; a missing dump never blocks a render.
    pub async fn write<I>(&self, vars: I)
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let snapshot: BTreeMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| {
                (
                    k.to_string_lossy().into_owned(),
                    v.to_string_lossy().into_owned(),
                )
            })
            .collect();

        let mut content = match serde_json::to_string_pretty(&snapshot) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize environment: {}", e);
                return;
            }
        };
        content.push('\n');

        match fs::write(&self.path, content).await {
            Ok(()) => info!("Environment written to {}", self.path.display()),
            Err(e) => warn!("Failed to write {}: {}", self.path.display(), e),
        }
    }
}
