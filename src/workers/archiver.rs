// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::domain::models::deck::DeckRecord;
use crate::domain::models::message::{MessageType, QueueMessage};
use crate::infrastructure::deck_store::DeckStore;
use crate::queue::message_queue::MessageQueue;
use crate::utils::errors::WorkerError;
use crate::workers::worker::{QueueListener, Worker, QUEUE_RETRY_DELAY};

/// 卡组归档器
///
/// 将 `full_deck` 消息中的卡组写入对象存储
pub struct DeckArchiver {
    store: DeckStore,
    listener: QueueListener,
}

impl DeckArchiver {
    pub fn new(
        store: DeckStore,
        queue: Arc<dyn MessageQueue>,
        deck_queue: impl Into<String>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            store,
            listener: QueueListener::new(queue, deck_queue, poll_timeout),
        }
    }

    /// 保存一条卡组消息，返回对象键
    #[instrument(skip_all)]
    pub async fn handle(&self, message: &QueueMessage) -> Result<String, WorkerError> {
        if message.msg_type() != MessageType::FullDeck {
            return Err(WorkerError::UnexpectedMessage {
                expected: MessageType::FullDeck.to_string(),
                found: message.msg_type().to_string(),
            });
        }

        let deck: DeckRecord = message.decode()?;
        Ok(self.store.save(&deck).await?)
    }

    pub async fn run_once(&self) -> Result<bool, WorkerError> {
        self.listener
            .poll(|message| async move { self.handle(&message).await.map(|_| ()) })
            .await
    }
}

#[async_trait]
impl Worker for DeckArchiver {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Deck archiver listening on {}", self.listener.name());
        loop {
            if let Err(e) = self.run_once().await {
                error!("Deck archiver failed to poll {}: {}", self.listener.name(), e);
                tokio::time::sleep(QUEUE_RETRY_DELAY).await;
            }
        }
    }

    fn name(&self) -> &str {
        "deck-archiver"
    }
}
