//! Storage manager: picks the configured object store provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use gabb_core::config::StorageConfig;
use gabb_core::error::AppError;
use gabb_core::result::AppResult;
use gabb_core::traits::{HealthCheck, ObjectStore};

use crate::providers::LocalObjectStore;

/// Holds the registered object stores and the one selected by
/// configuration.
#[derive(Debug, Clone)]
pub struct StorageManager {
    providers: HashMap<String, Arc<dyn ObjectStore>>,
    default_provider: String,
}

impl StorageManager {
    /// Create a manager with a single provider registered as the default.
    pub fn with_default(provider: Arc<dyn ObjectStore>) -> Self {
        let name = provider.provider_type().to_string();
        let mut providers = HashMap::new();
        providers.insert(name.clone(), provider);
        Self {
            providers,
            default_provider: name,
        }
    }

    /// Build the provider named by `storage.provider`.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let provider: Arc<dyn ObjectStore> = match config.provider.as_str() {
            "local" => Arc::new(LocalObjectStore::new(&config.local.root_path).await?),
            #[cfg(feature = "s3")]
            "s3" => Arc::new(crate::providers::S3ObjectStore::new(&config.s3).await?),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown storage provider: {other}"
                )));
            }
        };
        info!(provider = provider.provider_type(), "Object storage ready");
        Ok(Self::with_default(provider))
    }

    /// Register an additional provider under its type name.
    pub fn register(&mut self, provider: Arc<dyn ObjectStore>) {
        self.providers
            .insert(provider.provider_type().to_string(), provider);
    }

    /// Get a provider by type name.
    pub fn get(&self, name: &str) -> AppResult<Arc<dyn ObjectStore>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Storage provider {name} not found")))
    }

    /// Get the configured default provider.
    pub fn default_store(&self) -> AppResult<Arc<dyn ObjectStore>> {
        self.get(&self.default_provider)
    }

    /// Check whether every registered provider can reach `bucket`.
    pub async fn health_check_all(&self, bucket: &str) -> HashMap<String, bool> {
        let mut results = HashMap::new();
        for (name, provider) in &self.providers {
            let healthy = provider.health_check(bucket).await.unwrap_or(false);
            results.insert(name.clone(), healthy);
        }
        results
    }
}

/// Reports whether every registered provider can reach one bucket.
#[derive(Debug, Clone)]
pub struct BucketHealth {
    manager: StorageManager,
    bucket: String,
}

impl BucketHealth {
    /// Check `bucket` through every provider of `manager`.
    pub fn new(manager: StorageManager, bucket: impl Into<String>) -> Self {
        Self {
            manager,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl HealthCheck for BucketHealth {
    fn component(&self) -> &str {
        "storage"
    }

    async fn check(&self) -> AppResult<bool> {
        let results = self.manager.health_check_all(&self.bucket).await;
        Ok(results.values().all(|healthy| *healthy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gabb_core::config::LocalStorageConfig;
    use gabb_core::error::ErrorKind;

    fn local_config(root: &str) -> StorageConfig {
        StorageConfig {
            provider: "local".to_string(),
            local: LocalStorageConfig {
                root_path: root.to_string(),
            },
            ..StorageConfig::default()
        }
    }

    #[tokio::test]
    async fn test_from_config_local() {
        let dir = tempfile::tempdir().unwrap();
        let manager = StorageManager::from_config(&local_config(dir.path().to_str().unwrap()))
            .await
            .unwrap();

        let store = manager.default_store().unwrap();
        assert_eq!(store.provider_type(), "local");
        assert_eq!(
            manager.health_check_all("certs").await.get("local"),
            Some(&false)
        );
    }

    #[tokio::test]
    async fn test_bucket_health_follows_bucket_presence() {
        let dir = tempfile::tempdir().unwrap();
        let manager = StorageManager::from_config(&local_config(dir.path().to_str().unwrap()))
            .await
            .unwrap();
        let health = BucketHealth::new(manager, "gabb-certificates");
        assert_eq!(health.component(), "storage");
        assert!(!health.check().await.unwrap());

        std::fs::create_dir(dir.path().join("gabb-certificates")).unwrap();
        assert!(health.check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let mut config = local_config("/tmp");
        config.provider = "ftp".to_string();
        let err = StorageManager::from_config(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_get_unregistered_provider() {
        let dir = tempfile::tempdir().unwrap();
        let manager = StorageManager::from_config(&local_config(dir.path().to_str().unwrap()))
            .await
            .unwrap();
        assert_eq!(manager.get("s3").unwrap_err().kind, ErrorKind::NotFound);
    }
}
