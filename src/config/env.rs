//! Environment variable lookup with the Argo CD plugin prefix
//!
//! Argo CD passes Application-level plugin env as `ARGOCD_ENV_<NAME>`. A
//! prefixed variable wins over the bare one when it is set and non-empty.

/// Prefix Argo CD adds to plugin env entries
pub const PLUGIN_ENV_PREFIX: &str = "ARGOCD_ENV_";

/// Source of environment variables
///
/// Implemented for any `Fn(&str) -> Option<String>` so tests can resolve
/// from a map instead of the process environment.
pub trait EnvSource {
    /// Raw lookup of a single variable
    fn var(&self, name: &str) -> Option<String>;

    /// Lookup honouring the `ARGOCD_ENV_` override, empty values count as unset
    fn get(&self, name: &str) -> Option<String> {
        self.var(&format!("{}{}", PLUGIN_ENV_PREFIX, name))
            .filter(|v| !v.is_empty())
            .or_else(|| self.var(name).filter(|v| !v.is_empty()))
    }

    /// Lookup ignoring the `ARGOCD_ENV_` override
    ///
    /// For variables the controller sets itself, which Application env must
    /// not be able to replace.
    fn bare(&self, name: &str) -> Option<String> {
        self.var(name).filter(|v| !v.is_empty())
    }

    /// Lookup returning an empty string when unset
    fn get_or_empty(&self, name: &str) -> String {
        self.get(name).unwrap_or_default()
    }

    /// Boolean lookup: `1`, `true`, `yes` and `on` are true
    fn flag(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
