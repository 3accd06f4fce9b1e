//! Render command - template the chart and print the manifest

use crate::cache::{active_overrides, open_store};
use crate::cli::args::Cli;
use crate::config::{AppIdentity, EnvSource, Paths, PluginConfig};
use crate::env_dump::EnvDump;
use crate::error::{PluginError, PluginResult};
use crate::helm::{write_manifest, HelmTemplate};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Execute a render
///
/// Stdout receives the manifest and nothing else.
pub async fn execute(args: Cli, env: &impl EnvSource) -> PluginResult<()> {
    if args.env {
        let app = AppIdentity::from_env_lenient(env);
        EnvDump::new(Paths::env_dump_file(&app))
            .write(std::env::vars_os())
            .await;
    }

    let mut config = PluginConfig::resolve(env)?;
    config.include_crds |= args.include_crds;
    debug!(
        "Rendering {} with chart {} v{} ({} cache)",
        config.app,
        config.chart.name,
        config.chart.version,
        config.cache_backend.name()
    );

    let store = open_store(config.cache_backend, env).await?;
    let overrides = active_overrides(
        store.as_ref(),
        &config.app,
        config.inline_values.as_deref(),
    )
    .await?;

    let manifest = HelmTemplate::new(&config, &overrides).run().await?;

    write_manifest(&Paths::manifest_file(&config.app), &manifest).await?;

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(&manifest)
        .await
        .map_err(|e| PluginError::io("writing manifest to stdout", e))?;
    stdout
        .flush()
        .await
        .map_err(|e| PluginError::io("flushing stdout", e))?;

    Ok(())
}
