//! CLI argument definitions using clap derive

use clap::Parser;

/// Argo CD config management plugin for Helm charts
///
/// Reads the chart and Application from the environment, renders it with
/// `helm template` and prints the manifest to stdout. Value overrides from
/// HELM_VALUES are remembered and reused when it is not set.
#[derive(Parser, Debug)]
#[command(name = "argocd-helm-ext-plugin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Debug mode: log to stderr instead of the log file
    #[arg(short, long)]
    pub debug: bool,

    /// Include custom resource definitions in the manifest
    #[arg(short = 'c', long)]
    pub include_crds: bool,

    /// Dump the process environment to a file before rendering
    #[arg(short, long)]
    pub env: bool,
}
