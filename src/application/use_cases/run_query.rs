// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::deck::DeckRecord;
use crate::domain::models::query::PageQuery;
use crate::domain::services::enrichment_service::Enrich;
use crate::domain::services::search_service::SearchPageSource;
use crate::utils::errors::ScrapeError;

/// 单页查询编排
///
/// 抓取一页搜索结果，为每个卡组分配标识并依次补全
pub struct JobOrchestrator {
    source: Arc<dyn SearchPageSource>,
    enricher: Arc<dyn Enrich>,
}

impl JobOrchestrator {
    pub fn new(source: Arc<dyn SearchPageSource>, enricher: Arc<dyn Enrich>) -> Self {
        Self { source, enricher }
    }

    /// 执行单页查询
    ///
    /// # 返回值
    ///
    /// * `Ok(None)` - 该页没有结果
    /// * `Ok(Some(batch))` - 全部补全完成的卡组
    ///
    /// 任一卡组补全失败时整批放弃，错误原样返回
    pub async fn run_query(
        &self,
        query: &PageQuery,
    ) -> Result<Option<Vec<DeckRecord>>, ScrapeError> {
        let summaries = self.source.fetch_page(query).await?;
        if summaries.is_empty() {
            info!("No decks on {}", query);
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(summaries.len());
        for deck in summaries.into_iter().map(DeckRecord::from) {
            debug!("Enriching deck {} ({})", deck.deck_id, deck.summary.deck_name);
            batch.push(self.enricher.enrich(deck).await?);
        }

        info!("Collected {} decks from {}", batch.len(), query);
        Ok(Some(batch))
    }
}
