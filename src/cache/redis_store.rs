//! Redis-backed value store
//!
//! Uses the Redis instance Argo CD already runs, so every repo-server replica
//! sees the same overrides.

use crate::cache::store::{ValueStore, CACHE_TIMEOUT};
use crate::config::{AppIdentity, EnvSource};
use crate::error::{PluginError, PluginResult};
use crate::values::OverrideMap;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const HA_HOST: &str = "ARGOCD_REDIS_HA_HAPROXY_SERVICE_HOST";
const HA_PORT: &str = "ARGOCD_REDIS_HA_HAPROXY_SERVICE_PORT";
const HOST: &str = "ARGOCD_REDIS_SERVICE_HOST";
const PORT: &str = "ARGOCD_REDIS_SERVICE_PORT";

/// Payload of the liveness probe
const PROBE_MESSAGE: &str = "test message";

/// Namespace segment of every cache key
const KEY_NAMESPACE: &str = "argocd_helm_ext_plugin";

/// Address of the Redis service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisEndpoint {
    pub host: String,
    pub port: String,
}

impl RedisEndpoint {
    /// Discover the endpoint from Kubernetes service variables
    ///
    /// The HA proxy service is preferred; the plain service is used only when
    /// the HA host is absent.
    pub fn discover(env: &impl EnvSource) -> PluginResult<Self> {
        let var = |name: &str| env.var(name).filter(|v| !v.is_empty());

        let (host, port) = match var(HA_HOST) {
            Some(host) => (Some(host), var(HA_PORT)),
            None => (var(HOST), var(PORT)),
        };

        match (host, port) {
            (Some(host), Some(port)) => Ok(Self { host, port }),
            _ => Err(PluginError::CacheUnavailable(
                "redis host or port environment variable doesn't exist".to_string(),
            )),
        }
    }

    fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

impl fmt::Display for RedisEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Cache key for an Application's overrides
pub fn cache_key(app: &AppIdentity) -> String {
    format!(
        "{}/{}/{}/helm_values",
        app.namespace, app.name, KEY_NAMESPACE
    )
}

/// Value store on a live Redis connection
pub struct RedisValueStore {
    endpoint: RedisEndpoint,
    conn: MultiplexedConnection,
    /// Bound on every round trip, connect included
    timeout: Duration,
}

impl RedisValueStore {
    /// Connect and verify the server answers an ECHO
    ///
    /// Any failure here is fatal for the invocation.
    pub async fn connect(endpoint: RedisEndpoint) -> PluginResult<Self> {
        Self::connect_with_timeout(endpoint, CACHE_TIMEOUT).await
    }

    /// [`connect`](Self::connect) with a custom per-operation timeout
    pub async fn connect_with_timeout(
        endpoint: RedisEndpoint,
        limit: Duration,
    ) -> PluginResult<Self> {
        let unavailable =
            |reason: String| PluginError::CacheUnavailable(format!("{}: {}", endpoint, reason));

        let client =
            redis::Client::open(endpoint.url()).map_err(|e| unavailable(e.to_string()))?;

        let mut conn = timeout(limit, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| unavailable("connect timed out".to_string()))?
            .map_err(|e| unavailable(e.to_string()))?;

        let reply: String = timeout(
            limit,
            redis::cmd("ECHO").arg(PROBE_MESSAGE).query_async(&mut conn),
        )
        .await
        .map_err(|_| unavailable("echo timed out".to_string()))?
        .map_err(|e| unavailable(e.to_string()))?;

        if reply != PROBE_MESSAGE {
            return Err(unavailable(format!("unexpected echo reply {:?}", reply)));
        }

        info!("Redis server {} connected", endpoint);
        Ok(Self {
            endpoint,
            conn,
            timeout: limit,
        })
    }
}

#[async_trait]
impl ValueStore for RedisValueStore {
    async fn load(&self, app: &AppIdentity) -> OverrideMap {
        let key = cache_key(app);
        let mut conn = self.conn.clone();

        let result: Result<redis::RedisResult<Option<String>>, _> =
            timeout(self.timeout, conn.get(&key)).await;

        match result {
            Ok(Ok(Some(raw))) => {
                debug!("Loaded {} from redis {}", key, self.endpoint);
                OverrideMap::parse(&raw)
            }
            Ok(Ok(None)) => OverrideMap::new(),
            Ok(Err(e)) => {
                warn!("Reading {} from redis failed: {}", key, e);
                OverrideMap::new()
            }
            Err(_) => {
                warn!("Reading {} from redis timed out", key);
                OverrideMap::new()
            }
        }
    }

    async fn save(&self, app: &AppIdentity, values: &OverrideMap) -> PluginResult<()> {
        let key = cache_key(app);
        let mut conn = self.conn.clone();
        let write_failed = |reason: String| PluginError::CacheWrite {
            key: key.clone(),
            reason,
        };

        let result: redis::RedisResult<()> =
            timeout(self.timeout, conn.set(&key, values.to_string()))
                .await
                .map_err(|_| write_failed("timed out".to_string()))?;
        result.map_err(|e| write_failed(e.to_string()))?;

        debug!("Saved {} to redis {}", key, self.endpoint);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
