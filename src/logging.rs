//! Logging setup
//!
//! Stdout carries the manifest, so logs never go there: they go to a per
//! Application file, or to stderr in debug mode.

use crate::config::{AppIdentity, Paths};
use crate::error::{PluginError, PluginResult};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(std::path::PathBuf),
}

impl LogTarget {
    /// Pick the target for an invocation
    pub fn for_app(debug: bool, app: &AppIdentity) -> Self {
        if debug {
            LogTarget::Stderr
        } else {
            LogTarget::File(Paths::log_file(app))
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the default filter.
pub fn init(target: &LogTarget, debug: bool) -> PluginResult<()> {
    let default = if debug {
        "argocd_helm_ext_plugin=debug"
    } else {
        "argocd_helm_ext_plugin=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| PluginError::output_write(path, e))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppIdentity {
        AppIdentity {
            namespace: "apps".to_string(),
            name: "web".to_string(),
            revision: String::new(),
        }
    }

    #[test]
    fn debug_logs_to_stderr() {
        assert_eq!(LogTarget::for_app(true, &app()), LogTarget::Stderr);
    }

    #[test]
    fn default_logs_to_app_file() {
        match LogTarget::for_app(false, &app()) {
            LogTarget::File(path) => assert!(path.ends_with("plugin-apps-web.log")),
            LogTarget::Stderr => panic!("expected file target"),
        }
    }
}
