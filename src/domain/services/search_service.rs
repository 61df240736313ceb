// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::models::deck::DeckSummary;
use crate::domain::models::query::PageQuery;
use crate::engines::traits::HttpEngine;
use crate::infrastructure::mtgtop8::search_page::parse_search_page;
use crate::infrastructure::mtgtop8::SiteEndpoints;
use crate::utils::errors::ScrapeError;

/// 搜索结果页数据源
///
/// 超出范围的页返回空列表，而不是错误
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchPageSource: Send + Sync {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<DeckSummary>, ScrapeError>;
}

/// 通过HTTP引擎提交搜索表单的数据源
pub struct PageFetcher<E: ?Sized> {
    engine: Arc<E>,
    site: SiteEndpoints,
}

impl<E: HttpEngine + ?Sized> PageFetcher<E> {
    pub fn new(engine: Arc<E>, site: SiteEndpoints) -> Self {
        Self { engine, site }
    }
}

#[async_trait]
impl<E: HttpEngine + ?Sized> SearchPageSource for PageFetcher<E> {
    async fn fetch_page(&self, query: &PageQuery) -> Result<Vec<DeckSummary>, ScrapeError> {
        let html = self
            .engine
            .post_form(self.site.search_url(), &query.form_fields())
            .await?;

        let decks = parse_search_page(&html, &self.site)?;
        debug!("Search page {} returned {} decks", query, decks.len());
        Ok(decks)
    }
}
