//! Value store factory
//!
//! The backend is chosen once per invocation and never switched.

use crate::cache::file::FileValueStore;
use crate::cache::redis_store::{RedisEndpoint, RedisValueStore};
use crate::cache::store::ValueStore;
use crate::config::{CacheBackend, EnvSource, Paths};
use crate::error::PluginResult;

/// Open the configured value store
///
/// For Redis this connects and probes the server; an unreachable server is an
/// error rather than a fallback to the file backend.
pub async fn open_store(
    backend: CacheBackend,
    env: &impl EnvSource,
) -> PluginResult<Box<dyn ValueStore>> {
    match backend {
        CacheBackend::Redis => {
            let endpoint = RedisEndpoint::discover(env)?;
            Ok(Box::new(RedisValueStore::connect(endpoint).await?))
        }
        CacheBackend::File => Ok(Box::new(FileValueStore::new(Paths::values_cache_dir()))),
    }
}
