//! Plugin configuration resolved from the environment
//!
//! Argo CD describes the Application and chart entirely through env vars.

use crate::config::env::EnvSource;
use crate::error::{PluginError, PluginResult};
use crate::values::OverrideMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub const APP_NAMESPACE: &str = "ARGOCD_APP_NAMESPACE";
pub const APP_NAME: &str = "ARGOCD_APP_NAME";
pub const APP_REVISION: &str = "ARGOCD_APP_REVISION";
pub const REPO_URL: &str = "HELM_REPO_URL";
pub const CHART: &str = "HELM_CHART";
pub const CHART_VERSION: &str = "HELM_CHART_VERSION";
pub const VALUE_FILES: &str = "HELM_VALUE_FILES";
pub const VALUES: &str = "HELM_VALUES";
pub const INCLUDE_CRDS: &str = "HELM_INCLUDE_CRDS";
pub const DEBUG: &str = "HELM_DEBUG";
pub const VALUES_CACHE: &str = "HELM_VALUES_CACHE";
pub const HELM_BINARY: &str = "HELM_BINARY";

/// Identity of the Application being rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    /// Empty when the controller does not provide one
    pub namespace: String,
    pub name: String,
    /// Only used to key the file-backed value cache
    pub revision: String,
}

impl AppIdentity {
    /// Resolve the identity from the environment
    ///
    /// The `ARGOCD_APP_*` variables are set by Argo CD and read without the
    /// `ARGOCD_ENV_` override.
    pub fn resolve(env: &impl EnvSource) -> PluginResult<Self> {
        Ok(Self {
            namespace: env.bare(APP_NAMESPACE).unwrap_or_default(),
            name: env
                .bare(APP_NAME)
                .ok_or(PluginError::MissingConfiguration { name: APP_NAME })?,
            revision: env.bare(APP_REVISION).unwrap_or_default(),
        })
    }

    /// Read namespace and name without validation
    ///
    /// Used to name the log file before full resolution can fail.
    pub fn from_env_lenient(env: &impl EnvSource) -> Self {
        Self {
            namespace: env.bare(APP_NAMESPACE).unwrap_or_default(),
            name: env.bare(APP_NAME).unwrap_or_default(),
            revision: env.bare(APP_REVISION).unwrap_or_default(),
        }
    }
}

impl fmt::Display for AppIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// The chart to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRef {
    pub repo_url: String,
    pub name: String,
    pub version: String,
}

/// Which store keeps the last applied overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Argo CD's Redis, shared by every repo-server replica
    #[default]
    Redis,
    /// Local file per revision
    File,
}

impl CacheBackend {
    fn parse(raw: &str) -> PluginResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "file" => Ok(CacheBackend::File),
            _ => Err(PluginError::InvalidSetting {
                name: VALUES_CACHE,
                value: raw.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CacheBackend::Redis => "redis",
            CacheBackend::File => "file",
        }
    }
}

/// Everything a render needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub app: AppIdentity,
    pub chart: ChartRef,
    /// Candidate value files, filtered to existing ones at render time
    pub value_files: Vec<PathBuf>,
    /// Raw `HELM_VALUES`, `None` when unset or empty
    pub inline_values: Option<String>,
    pub include_crds: bool,
    pub cache_backend: CacheBackend,
    pub helm_binary: String,
}

impl PluginConfig {
    /// Resolve the configuration
    ///
    /// Required variables are checked in a fixed order and the first missing
    /// one is reported.
    pub fn resolve(env: &impl EnvSource) -> PluginResult<Self> {
        let app = AppIdentity::resolve(env)?;
        let chart = ChartRef {
            repo_url: require(env, REPO_URL)?,
            name: require(env, CHART)?,
            version: require(env, CHART_VERSION)?,
        };

        let cache_backend = match env.get(VALUES_CACHE) {
            Some(raw) => CacheBackend::parse(&raw)?,
            None => CacheBackend::default(),
        };

        Ok(Self {
            app,
            chart,
            value_files: split_value_files(&env.get_or_empty(VALUE_FILES)),
            inline_values: env.get(VALUES),
            include_crds: env.flag(INCLUDE_CRDS),
            cache_backend,
            helm_binary: env.get(HELM_BINARY).unwrap_or_else(|| "helm".to_string()),
        })
    }

    /// Parsed inline overrides, if any were supplied
    pub fn inline_overrides(&self) -> Option<OverrideMap> {
        self.inline_values.as_deref().map(OverrideMap::parse)
    }

    /// Value files that exist right now
    pub fn existing_value_files(&self) -> Vec<&Path> {
        self.value_files
            .iter()
            .map(PathBuf::as_path)
            .filter(|p| p.exists())
            .collect()
    }
}

fn require(env: &impl EnvSource, name: &'static str) -> PluginResult<String> {
    env.get(name)
        .ok_or(PluginError::MissingConfiguration { name })
}

fn split_value_files(raw: &str) -> Vec<PathBuf> {
    raw.split_whitespace().map(PathBuf::from).collect()
}
