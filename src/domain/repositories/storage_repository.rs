// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// 内容不是合法的UTF-8
    #[error("Object {key} is not valid UTF-8")]
    InvalidUtf8 { key: String },
    /// 存储错误
    #[error("Storage error: {0}")]
    Other(String),
}

/// 存储仓库特质
///
/// 本地文件系统和对象存储的统一读写接口
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 以UTF-8文本读取
    async fn get_text(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.get(key).await? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::InvalidUtf8 {
                    key: key.to_string(),
                }),
            None => Ok(None),
        }
    }
}
