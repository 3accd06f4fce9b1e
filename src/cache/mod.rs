//! Persistent cache of the last applied value overrides
//!
//! Argo CD re-renders an Application on every refresh, but `HELM_VALUES` is
//! usually only supplied when a deploy changes something (an image tag bump).
//! The cache keeps the most recent overrides so later renders reuse them.
//!
//! # Policy
//!
//! | `HELM_VALUES` | Active overrides | Cache |
//! |---------------|------------------|-------|
//! | non-empty | parsed inline value | overwritten with it |
//! | unset/empty | last saved map | untouched |
//! | unset/empty, nothing saved | empty | untouched |
//!
//! Inline overrides replace the saved map wholesale; keys are never merged.

mod factory;
pub mod file;
pub mod redis_store;
mod store;

pub use factory::open_store;
pub use file::FileValueStore;
pub use redis_store::{RedisEndpoint, RedisValueStore};
pub use store::{ValueStore, CACHE_TIMEOUT};

use crate::config::AppIdentity;
use crate::error::PluginResult;
use crate::values::OverrideMap;
use tracing::info;

/// Decide the overrides for this render
///
/// A failed save aborts the render: rendering with overrides that were not
/// recorded would let a later refresh silently roll them back.
pub async fn active_overrides(
    store: &dyn ValueStore,
    app: &AppIdentity,
    inline: Option<&str>,
) -> PluginResult<OverrideMap> {
    match inline.filter(|raw| !raw.is_empty()) {
        Some(raw) => {
            info!("load helm values from env.: {}", raw);
            let values = OverrideMap::parse(raw);
            store.save(app, &values).await?;
            info!(
                "update helm values to {}: {}",
                store.backend_name(),
                values
            );
            Ok(values)
        }
        None => {
            let values = store.load(app).await;
            if values.is_empty() {
                info!("helm values in {} is empty", store.backend_name());
            } else {
                info!(
                    "load previous helm values from {}: {}",
                    store.backend_name(),
                    values
                );
            }
            Ok(values)
        }
    }
}
