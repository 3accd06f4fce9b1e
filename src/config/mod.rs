//! Configuration for the plugin
//!
//! Flags come from clap; everything describing the Application comes from
//! the environment.

pub mod env;
pub mod schema;

pub use env::{EnvSource, ProcessEnv};
pub use schema::{AppIdentity, CacheBackend, ChartRef, PluginConfig};

use std::path::PathBuf;

/// Output and state paths
///
/// All paths live under the system temp dir, so `TMPDIR` relocates them.
pub struct Paths;

impl Paths {
    /// Log file for one Application
    pub fn log_file(app: &AppIdentity) -> PathBuf {
        std::env::temp_dir().join(format!("plugin-{}-{}.log", app.namespace, app.name))
    }

    /// Rendered manifest for one Application
    pub fn manifest_file(app: &AppIdentity) -> PathBuf {
        std::env::temp_dir().join(format!("manifest-{}-{}.yaml", app.namespace, app.name))
    }

    /// Environment dump written with `--env`
    pub fn env_dump_file(app: &AppIdentity) -> PathBuf {
        std::env::temp_dir().join(format!("env-{}-{}.log", app.namespace, app.name))
    }

    /// Directory holding file-backed value cache entries
    pub fn values_cache_dir() -> PathBuf {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> AppIdentity {
        AppIdentity {
            namespace: "argocd".to_string(),
            name: "guestbook".to_string(),
            revision: "abc123".to_string(),
        }
    }

    #[test]
    fn paths_include_identity() {
        let app = app();
        assert!(Paths::log_file(&app).ends_with("plugin-argocd-guestbook.log"));
        assert!(Paths::manifest_file(&app).ends_with("manifest-argocd-guestbook.yaml"));
        assert!(Paths::env_dump_file(&app).ends_with("env-argocd-guestbook.log"));
    }
}
