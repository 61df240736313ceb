// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::models::query::{PageQuery, SearchTemplate};
use crate::domain::services::search_service::SearchPageSource;
use crate::infrastructure::metrics::PAGES_PROBED;
use crate::utils::errors::ScrapeError;

/// 分页探测服务
///
/// 先指数倍增找到第一个空页，再二分收敛到最后一个非空页，
/// 探测次数为 O(log n)
pub struct PaginationService<S: ?Sized> {
    source: Arc<S>,
}

impl<S: SearchPageSource + ?Sized> PaginationService<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// 生成查询模板的全部结果页
    ///
    /// # 返回值
    ///
    /// 按页码升序的 `[1, 最后一个非空页]`
    ///
    /// # 错误
    ///
    /// * `ScrapeError::EmptySearch` - 第一页为空
    /// * 其余抓取错误原样返回，不做重试
    pub async fn discover_queries(
        &self,
        template: &SearchTemplate,
    ) -> Result<Vec<PageQuery>, ScrapeError> {
        if self.is_empty(template, 1).await? {
            return Err(ScrapeError::EmptySearch);
        }

        let mut page: u32 = 1;
        loop {
            page = page.checked_mul(2).ok_or(ScrapeError::PageLimitExceeded)?;
            if self.is_empty(template, page).await? {
                break;
            }
        }

        // nmin is always non-empty, nmax always empty
        let mut nmax = page;
        let mut nmin = page / 2;
        while nmax != nmin + 1 {
            let mid = nmin + (nmax - nmin) / 2;
            if self.is_empty(template, mid).await? {
                nmax = mid;
            } else {
                nmin = mid;
            }
        }

        info!("Search {} spans {} result pages", template, nmin);

        (1..nmax)
            .map(|page| PageQuery::new(template.clone(), page))
            .collect::<Result<Vec<_>, _>>()
            .map_err(ScrapeError::from)
    }

    async fn is_empty(&self, template: &SearchTemplate, page: u32) -> Result<bool, ScrapeError> {
        let query = PageQuery::new(template.clone(), page)?;
        let decks = self.source.fetch_page(&query).await?;
        counter!(PAGES_PROBED).increment(1);
        debug!("Probed page {}: {} decks", page, decks.len());
        Ok(decks.is_empty())
    }
}

#[cfg(test)]
#[path = "pagination_service_test.rs"]
mod tests;
