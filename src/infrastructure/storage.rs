// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::settings::StorageSettings;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

/// S3 对象存储实现
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Storage {
    /// 按配置创建
    ///
    /// 同时配置了 access key 和 secret key 时使用静态凭证，否则走默认凭证链
    /// （环境变量、配置文件、实例角色）
    pub async fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        let bucket = settings
            .s3_bucket
            .clone()
            .ok_or_else(|| StorageError::Other("storage.s3_bucket is required".to_string()))?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.s3_region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let (Some(access_key), Some(secret_key)) =
            (&settings.s3_access_key, &settings.s3_secret_key)
        {
            loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
                access_key.as_str(),
                secret_key.as_str(),
                None,
                None,
                "deck-harvester-settings",
            ));
        }

        let shared = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.s3_endpoint {
            // MinIO and other S3-compatible stores need path-style addressing
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!("Using S3 storage in bucket {}", bucket);
        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket,
        })
    }
}

#[async_trait]
impl StorageRepository for S3Storage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Other(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => {
                let data = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::Other(e.to_string()))?
                    .into_bytes();
                Ok(Some(data.to_vec()))
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::Other(service_error.to_string()))
                }
            }
        }
    }
}

/// 本地文件系统存储实现
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, key: &str) -> PathBuf {
        self.base_path.join(key)
    }
}

#[async_trait]
impl StorageRepository for LocalStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.full_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(self.full_path(key)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// 内存存储实现（用于测试和一次性的本地运行）
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前保存的所有键，按字典序
    pub async fn keys(&self) -> Vec<String> {
        let map = self.data.read().await;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl StorageRepository for InMemoryStorage {
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let mut map = self.data.write().await;
        map.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let map = self.data.read().await;
        Ok(map.get(key).cloned())
    }
}

/// 存储工厂函数
pub async fn create_storage_repository(
    settings: &StorageSettings,
) -> Result<Arc<dyn StorageRepository>, StorageError> {
    match settings.storage_type.as_str() {
        "local" => {
            let base_path = settings
                .local_path
                .clone()
                .unwrap_or_else(|| "./storage".to_string());
            info!("Using local storage at {}", base_path);
            Ok(Arc::new(LocalStorage::new(base_path)))
        }
        "s3" => Ok(Arc::new(S3Storage::from_settings(settings).await?)),
        "memory" => Ok(Arc::new(InMemoryStorage::new())),
        other => Err(StorageError::Other(format!(
            "Unsupported storage type: {}",
            other
        ))),
    }
}
