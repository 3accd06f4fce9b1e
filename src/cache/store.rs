//! Value store abstraction
//!
//! Provides a trait for persisting the last applied overrides that can be
//! implemented by different backends (Argo CD's Redis, a local file).

use crate::config::AppIdentity;
use crate::error::PluginResult;
use crate::values::OverrideMap;
use async_trait::async_trait;
use std::time::Duration;

/// Upper bound for a single cache round trip
pub const CACHE_TIMEOUT: Duration = Duration::from_secs(5);

/// Abstract value store interface
#[async_trait]
pub trait ValueStore: Send + Sync {
    /// Load the last saved overrides
    ///
    /// Misses, backend errors and timeouts all yield an empty map.
    async fn load(&self, app: &AppIdentity) -> OverrideMap;

    /// Replace the saved overrides
    async fn save(&self, app: &AppIdentity, values: &OverrideMap) -> PluginResult<()>;

    /// Human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}
