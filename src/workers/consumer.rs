// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::application::use_cases::run_query::JobOrchestrator;
use crate::domain::models::message::{MessageType, QueueMessage};
use crate::domain::models::query::PageQuery;
use crate::infrastructure::metrics::MESSAGES_SENT;
use crate::queue::message_queue::MessageQueue;
use crate::utils::errors::WorkerError;
use crate::workers::worker::{QueueListener, Worker, QUEUE_RETRY_DELAY};

/// 搜索消费者
///
/// 每条 `deck_search_payload` 消息执行一次单页查询，
/// 并为每个补全后的卡组发送一条 `full_deck` 消息
pub struct DeckConsumer {
    orchestrator: JobOrchestrator,
    queue: Arc<dyn MessageQueue>,
    listener: QueueListener,
    deck_queue: String,
}

impl DeckConsumer {
    pub fn new(
        orchestrator: JobOrchestrator,
        queue: Arc<dyn MessageQueue>,
        search_queue: impl Into<String>,
        deck_queue: impl Into<String>,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            orchestrator,
            listener: QueueListener::new(queue.clone(), search_queue, poll_timeout),
            queue,
            deck_queue: deck_queue.into(),
        }
    }

    /// 处理一条搜索消息
    ///
    /// 整页补全完成后才开始发送，失败的页不会产生任何卡组消息
    ///
    /// # 返回值
    ///
    /// 发送的卡组消息数
    #[instrument(skip_all, fields(date_added = %message.attributes.date_added))]
    pub async fn handle(&self, message: &QueueMessage) -> Result<usize, WorkerError> {
        if message.msg_type() != MessageType::DeckSearchPayload {
            return Err(WorkerError::UnexpectedMessage {
                expected: MessageType::DeckSearchPayload.to_string(),
                found: message.msg_type().to_string(),
            });
        }

        let query: PageQuery = message.decode()?;
        let Some(batch) = self.orchestrator.run_query(&query).await? else {
            info!("Nothing to download for {}", query);
            return Ok(0);
        };

        let now = Utc::now();
        let messages = batch
            .iter()
            .map(|deck| QueueMessage::full_deck(deck, now))
            .collect::<Result<Vec<_>, _>>()?;

        for message in &messages {
            self.queue.send(&self.deck_queue, message).await?;
            counter!(MESSAGES_SENT, "queue" => self.deck_queue.clone()).increment(1);
        }

        info!("Sent {} decks from {}", messages.len(), query);
        Ok(messages.len())
    }

    /// 接收并处理一条消息，没有消息时返回 `Ok(false)`
    pub async fn run_once(&self) -> Result<bool, WorkerError> {
        self.listener
            .poll(|message| async move { self.handle(&message).await.map(|_| ()) })
            .await
    }
}

#[async_trait]
impl Worker for DeckConsumer {
    async fn run(&self) -> Result<(), WorkerError> {
        info!("Deck consumer listening on {}", self.listener.name());
        loop {
            if let Err(e) = self.run_once().await {
                error!("Deck consumer failed to poll {}: {}", self.listener.name(), e);
                tokio::time::sleep(QUEUE_RETRY_DELAY).await;
            }
        }
    }

    fn name(&self) -> &str {
        "deck-consumer"
    }
}
