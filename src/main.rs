//! argocd-helm-ext-plugin - Argo CD config management plugin
//!
//! CLI entry point. Argo CD runs this in the `generate` step of the plugin.

use argocd_helm_ext_plugin::cli::{commands, Cli};
use argocd_helm_ext_plugin::config::{schema, AppIdentity, EnvSource, ProcessEnv};
use argocd_helm_ext_plugin::error::PluginResult;
use argocd_helm_ext_plugin::logging::{self, LogTarget};
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[Error]: {}", e);
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PluginResult<()> {
    let cli = Cli::parse();
    let env = ProcessEnv;

    let debug = cli.debug || env.flag(schema::DEBUG);
    let app = AppIdentity::from_env_lenient(&env);
    logging::init(&LogTarget::for_app(debug, &app), debug)?;

    commands::render(cli, &env).await
}
