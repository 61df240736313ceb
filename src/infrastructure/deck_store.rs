// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::debug;

use crate::domain::models::deck::DeckRecord;
use crate::domain::repositories::storage_repository::{StorageError, StorageRepository};

/// 卡组对象键
pub fn deck_key(deck_id: &str) -> String {
    format!("decks/{}.json", deck_id)
}

/// 卡组归档
///
/// 每个卡组以格式化的JSON保存为一个对象，相同标识的卡组会被覆盖
#[derive(Clone)]
pub struct DeckStore {
    storage: Arc<dyn StorageRepository>,
}

impl DeckStore {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self { storage }
    }

    /// 保存卡组，返回对象键
    pub async fn save(&self, deck: &DeckRecord) -> Result<String, StorageError> {
        let key = deck_key(&deck.deck_id);
        let json = serde_json::to_vec_pretty(deck)?;
        self.storage.save(&key, &json).await?;
        debug!("Archived deck {} to {}", deck.deck_id, key);
        Ok(key)
    }

    pub async fn load(&self, deck_id: &str) -> Result<Option<DeckRecord>, StorageError> {
        match self.storage.get(&deck_key(deck_id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
