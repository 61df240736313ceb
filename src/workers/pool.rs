// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::application::use_cases::run_query::JobOrchestrator;
use crate::application::use_cases::scrape_context::ScrapeContext;
use crate::domain::models::deck::DeckRecord;
use crate::domain::models::query::{PageQuery, SearchTemplate};
use crate::utils::errors::{ScrapeError, WorkerError};

/// 本地并行执行器
///
/// 不经过消息队列，直接在进程内并行执行全部结果页
pub struct LocalPool {
    context: ScrapeContext,
    parallelism: usize,
}

impl LocalPool {
    pub fn new(context: ScrapeContext, parallelism: usize) -> Self {
        Self {
            context,
            parallelism: parallelism.max(1),
        }
    }

    /// 探测模板的全部结果页并执行
    pub async fn collect(&self, template: &SearchTemplate) -> Result<Vec<DeckRecord>, WorkerError> {
        let queries = self.context.pagination().discover_queries(template).await?;
        self.run(queries).await
    }

    /// 并行执行查询
    ///
    /// 结果按页码顺序拼接。任一页失败时，等待其余页结束后返回第一个错误
    pub async fn run(&self, queries: Vec<PageQuery>) -> Result<Vec<DeckRecord>, WorkerError> {
        let total = queries.len();
        let orchestrator = Arc::new(self.context.orchestrator());
        let semaphore = Arc::new(Semaphore::new(self.parallelism));
        let mut join_set = JoinSet::new();

        for (index, query) in queries.into_iter().enumerate() {
            let orchestrator: Arc<JobOrchestrator> = orchestrator.clone();
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, orchestrator.run_query(&query).await)
            });
        }

        let mut pages: Vec<Option<Vec<DeckRecord>>> = vec![None; total];
        let mut first_error: Option<ScrapeError> = None;

        while let Some(joined) = join_set.join_next().await {
            let (index, result) = joined?;
            match result {
                Ok(batch) => pages[index] = batch,
                Err(e) => {
                    warn!("Page {} of {} failed: {}", index + 1, total, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e.into());
        }

        let decks: Vec<DeckRecord> = pages.into_iter().flatten().flatten().collect();
        info!("Collected {} decks from {} pages", decks.len(), total);
        Ok(decks)
    }
}
