//! File-backed value store
//!
//! One file per Application revision, local to the machine. Entries are never
//! removed.

use crate::cache::store::{ValueStore, CACHE_TIMEOUT};
use crate::config::AppIdentity;
use crate::error::{PluginError, PluginResult};
use crate::values::OverrideMap;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::time::timeout;
use tracing::{debug, warn};

/// File name prefix of every entry
const FILE_PREFIX: &str = "helm-values-";

/// Stand-in revision when the controller sends none
const DEFAULT_REVISION: &str = "default";

/// Value store writing plain files under a directory
pub struct FileValueStore {
    dir: PathBuf,
}

impl FileValueStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the entry for an Application revision
    ///
    /// The entry always lands directly inside the store directory, whatever
    /// the revision contains.
    pub fn entry_path(&self, app: &AppIdentity) -> PathBuf {
        let revision = if app.revision.is_empty() {
            DEFAULT_REVISION.to_string()
        } else {
            file_safe(&app.revision)
        };
        self.dir.join(format!("{}{}", FILE_PREFIX, revision))
    }
}

/// Replace everything but `[A-Za-z0-9._-]` with `_`
///
/// Branch revisions such as `feature/x` would otherwise name a subdirectory.
fn file_safe(revision: &str) -> String {
    revision
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[async_trait]
impl ValueStore for FileValueStore {
    async fn load(&self, app: &AppIdentity) -> OverrideMap {
        let path = self.entry_path(app);

        match timeout(CACHE_TIMEOUT, fs::read_to_string(&path)).await {
            Ok(Ok(raw)) => {
                debug!("Loaded helm values from {}", path.display());
                OverrideMap::parse(&raw)
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => OverrideMap::new(),
            Ok(Err(e)) => {
                warn!("Reading {} failed: {}", path.display(), e);
                OverrideMap::new()
            }
            Err(_) => {
                warn!("Reading {} timed out", path.display());
                OverrideMap::new()
            }
        }
    }

    async fn save(&self, app: &AppIdentity, values: &OverrideMap) -> PluginResult<()> {
        let path = self.entry_path(app);
        let write_failed = |reason: String| PluginError::CacheWrite {
            key: path.display().to_string(),
            reason,
        };

        timeout(CACHE_TIMEOUT, fs::write(&path, values.to_string()))
            .await
            .map_err(|_| write_failed("timed out".to_string()))?
            .map_err(|e| write_failed(e.to_string()))?;

        debug!("Saved helm values to {}", path.display());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
