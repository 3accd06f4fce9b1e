//! `helm template` invocation

use crate::config::{ChartRef, PluginConfig};
use crate::error::{PluginError, PluginResult};
use crate::values::OverrideMap;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// A fully resolved `helm template` command
#[derive(Debug, Clone)]
pub struct HelmTemplate {
    binary: String,
    chart: ChartRef,
    revision: String,
    args: Vec<String>,
}

impl HelmTemplate {
    /// Build the command for a render
    ///
    /// Value files that do not exist are left out.
    pub fn new(config: &PluginConfig, overrides: &OverrideMap) -> Self {
        let mut args = vec![
            "template".to_string(),
            config.app.name.clone(),
            config.chart.name.clone(),
            "--repo".to_string(),
            config.chart.repo_url.clone(),
            "--version".to_string(),
            config.chart.version.clone(),
        ];

        if config.include_crds {
            args.push("--include-crds".to_string());
        }

        for file in config.existing_value_files() {
            args.push("-f".to_string());
            args.push(file.display().to_string());
        }

        args.extend(overrides.to_set_args());

        Self {
            binary: config.helm_binary.clone(),
            chart: config.chart.clone(),
            revision: config.app.revision.clone(),
            args,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Command line as logged
    pub fn command_line(&self) -> String {
        format!("{} {}", self.binary, self.args.join(" "))
    }

    /// Run helm and return the rendered manifest
    ///
    /// No timeout is applied; a hung helm hangs the plugin.
    pub async fn run(&self) -> PluginResult<Vec<u8>> {
        info!("Execute({}): {}", self.revision, self.command_line());

        let output = Command::new(&self.binary)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.failed(format!("failed to run {}: {}", self.binary, e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            return Err(self.failed(format!("{}: {}", output.status, stderr.trim())));
        }
        if !stderr.trim().is_empty() {
            warn!("helm stderr: {}", stderr.trim());
        }

        debug!("helm rendered {} bytes", output.stdout.len());
        Ok(output.stdout)
    }

    fn failed(&self, reason: String) -> PluginError {
        PluginError::render(&self.chart.name, &self.chart.version, reason)
    }
}

/// Write the manifest to the file the controller inspects, replacing it
pub async fn write_manifest(path: &Path, manifest: &[u8]) -> PluginResult<()> {
    tokio::fs::write(path, manifest)
        .await
        .map_err(|e| PluginError::output_write(path, e))?;
    debug!("Manifest written to {}", path.display());
    Ok(())
}
