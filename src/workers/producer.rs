// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{NaiveDate, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::models::message::QueueMessage;
use crate::domain::models::query::SearchTemplate;
use crate::domain::models::registry::{RegistryEntry, RunMode};
use crate::domain::services::pagination_service::PaginationService;
use crate::domain::services::search_service::SearchPageSource;
use crate::infrastructure::metrics::MESSAGES_SENT;
use crate::infrastructure::query_registry::QueryRegistry;
use crate::queue::message_queue::MessageQueue;
use crate::utils::errors::WorkerError;

/// 搜索生产者
///
/// 探测模板的结果页数，为每一页发送一条 `deck_search_payload` 消息，全部发送成功后登记模板
pub struct DeckProducer {
    pagination: PaginationService<dyn SearchPageSource>,
    registry: QueryRegistry,
    queue: Arc<dyn MessageQueue>,
    search_queue: String,
}

impl DeckProducer {
    pub fn new(
        pagination: PaginationService<dyn SearchPageSource>,
        registry: QueryRegistry,
        queue: Arc<dyn MessageQueue>,
        search_queue: impl Into<String>,
    ) -> Self {
        Self {
            pagination,
            registry,
            queue,
            search_queue: search_queue.into(),
        }
    }

    /// 提交一个搜索模板
    ///
    /// # 返回值
    ///
    /// 发送的消息数，等于模板的结果页数
    #[instrument(skip_all, fields(template = %template, mode = %mode))]
    pub async fn produce(
        &self,
        template: &SearchTemplate,
        mode: RunMode,
    ) -> Result<usize, WorkerError> {
        let queries = self.pagination.discover_queries(template).await?;

        let now = Utc::now();
        let messages = queries
            .iter()
            .map(|query| QueueMessage::search_payload(query, now))
            .collect::<Result<Vec<_>, _>>()?;
        for message in &messages {
            self.queue.send(&self.search_queue, message).await?;
            counter!(MESSAGES_SENT, "queue" => self.search_queue.clone()).increment(1);
        }

        // The registry only records ranges whose pages are all queued
        self.registry
            .append(&RegistryEntry::new(template.clone(), now, mode))
            .await?;

        info!(
            "Queued {} search pages for {} ({})",
            queries.len(),
            template,
            mode
        );
        Ok(queries.len())
    }

    /// 根据登记表推算下一次查询并提交
    pub async fn produce_automated(&self, today: NaiveDate) -> Result<usize, WorkerError> {
        let template = self.registry.next_template(today).await?;
        info!("Automated search resumes from {}", template);
        self.produce(&template, RunMode::Automated).await
    }
}
