//! argocd-helm-ext-plugin - Helm rendering for Argo CD
//!
//! Renders a Helm chart described by environment variables and remembers
//! the last value overrides per Application.

pub mod cache;
pub mod cli;
pub mod config;
pub mod env_dump;
pub mod error;
pub mod helm;
pub mod logging;
pub mod values;

pub use error::{PluginError, PluginResult};
