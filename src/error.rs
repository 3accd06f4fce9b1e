//! Error types for the plugin
//!
//! All modules use `PluginResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// All errors that can abort a plugin invocation
#[derive(Error, Debug)]
pub enum PluginError {
    // Configuration errors
    #[error("{name} is empty")]
    MissingConfiguration { name: &'static str },

    #[error("Invalid value for {name}: {value}")]
    InvalidSetting { name: &'static str, value: String },

    // Cache errors
    #[error("Value cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Set helm values to cache failed ({key}): {reason}")]
    CacheWrite { key: String, reason: String },

    // Render errors
    #[error("Generate {chart} v{version} template fail: {reason}")]
    Render {
        chart: String,
        version: String,
        reason: String,
    },

    // Output errors
    #[error("Can't open output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PluginError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create an output write error for a file the controller depends on
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a render error for a chart
    pub fn render(
        chart: impl Into<String>,
        version: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Render {
            chart: chart.into(),
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingConfiguration { .. } => {
                Some("Set the variable in the Application's plugin env (ARGOCD_ENV_ prefix is optional)")
            }
            Self::CacheUnavailable(_) => Some(
                "Check ARGOCD_REDIS_SERVICE_HOST/PORT, or set HELM_VALUES_CACHE=file",
            ),
            Self::InvalidSetting { name: "HELM_VALUES_CACHE", .. } => {
                Some("Use HELM_VALUES_CACHE=redis or HELM_VALUES_CACHE=file")
            }
            _ => None,
        }
    }
}
