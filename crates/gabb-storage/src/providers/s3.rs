//! S3-compatible object store.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use tracing::{info, warn};

use gabb_core::config::S3StorageConfig;
use gabb_core::error::{AppError, ErrorKind};
use gabb_core::result::AppResult;
use gabb_core::traits::ObjectStore;

/// Object store backed by the AWS SDK.
///
/// Empty configuration values fall back to the SDK's default provider
/// chains (environment, profile, instance metadata).
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Build a client from configuration.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            "Initializing S3 object store"
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if !config.region.is_empty() {
            loader = loader.region(Region::new(config.region.clone()));
        }
        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "gabb-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            builder = builder
                .endpoint_url(config.endpoint.clone())
                .force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self, bucket: &str) -> AppResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket, error = %DisplayErrorContext(&e), "S3 bucket unreachable");
                Ok(false)
            }
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    AppError::not_found(format!("Object not found: {bucket}/{key}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!(
                            "Failed to fetch {bucket}/{key}: {}",
                            DisplayErrorContext(&e)
                        ),
                        e,
                    )
                }
            })?;

        let body = output.body.collect().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read body of {bucket}/{key}"),
                e,
            )
        })?;
        Ok(body.into_bytes())
    }
}
