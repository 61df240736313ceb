// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::application::use_cases::run_query::JobOrchestrator;
use crate::config::settings::SiteSettings;
use crate::domain::services::enrichment_service::{DeckEnricher, Enrich};
use crate::domain::services::pagination_service::PaginationService;
use crate::domain::services::search_service::{PageFetcher, SearchPageSource};
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, HttpEngine};
use crate::infrastructure::mtgtop8::SiteEndpoints;

/// 抓取组件集合
///
/// 同一个HTTP引擎（共享cookie）供搜索与补全使用
#[derive(Clone)]
pub struct ScrapeContext {
    source: Arc<dyn SearchPageSource>,
    enricher: Arc<dyn Enrich>,
}

impl ScrapeContext {
    pub fn new(source: Arc<dyn SearchPageSource>, enricher: Arc<dyn Enrich>) -> Self {
        Self { source, enricher }
    }

    pub fn from_engine(engine: Arc<dyn HttpEngine>, site: SiteEndpoints) -> Self {
        Self {
            source: Arc::new(PageFetcher::new(engine.clone(), site.clone())),
            enricher: Arc::new(DeckEnricher::new(engine, site)),
        }
    }

    pub fn from_settings(settings: &SiteSettings) -> Result<Self, EngineError> {
        let engine = Arc::new(ReqwestEngine::new(settings)?);
        Ok(Self::from_engine(engine, SiteEndpoints::from_settings(settings)?))
    }

    pub fn pagination(&self) -> PaginationService<dyn SearchPageSource> {
        PaginationService::new(self.source.clone())
    }

    pub fn orchestrator(&self) -> JobOrchestrator {
        JobOrchestrator::new(self.source.clone(), self.enricher.clone())
    }
}
