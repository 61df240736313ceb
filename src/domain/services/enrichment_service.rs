// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::models::deck::{DeckComposition, DeckRecord, DeckType};
use crate::engines::traits::HttpEngine;
use crate::infrastructure::metrics::{DECKS_ENRICHED, DECKS_UNKNOWN_TYPE};
use crate::infrastructure::mtgtop8::deck_page::{normalize_card_list, parse_deck_page};
use crate::infrastructure::mtgtop8::SiteEndpoints;
use crate::utils::errors::ScrapeError;

/// 卡组补全
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Enrich: Send + Sync {
    /// 下载卡表与卡组类型并附加到记录上
    async fn enrich(&self, deck: DeckRecord) -> Result<DeckRecord, ScrapeError>;
}

/// 基于卡组详情页的补全实现
pub struct DeckEnricher<E: ?Sized> {
    engine: Arc<E>,
    site: SiteEndpoints,
}

impl<E: HttpEngine + ?Sized> DeckEnricher<E> {
    pub fn new(engine: Arc<E>, site: SiteEndpoints) -> Self {
        Self { engine, site }
    }
}

#[async_trait]
impl<E: HttpEngine + ?Sized> Enrich for DeckEnricher<E> {
    async fn enrich(&self, deck: DeckRecord) -> Result<DeckRecord, ScrapeError> {
        let link = deck.summary.link.clone();
        let html = self.engine.get(&link).await?;
        let page = parse_deck_page(&html, &link)?;

        let download = self
            .site
            .resolve(&page.download_href)
            .map_err(|e| ScrapeError::Parse(e.to_string()))?;
        let raw_cards = self.engine.get(download.as_str()).await?;

        let deck_type = match page.deck_type {
            Some(name) => DeckType::Named(name),
            None => {
                // Seen when the site renders the archetype as mana symbols
                error!(
                    "Deck type section missing for deck {} ({}), storing as unknown",
                    deck.deck_id, link
                );
                counter!(DECKS_UNKNOWN_TYPE).increment(1);
                DeckType::Unknown
            }
        };

        counter!(DECKS_ENRICHED).increment(1);
        debug!("Enriched deck {} as {}", deck.deck_id, deck_type);

        Ok(deck.with_composition(DeckComposition {
            cards: normalize_card_list(&raw_cards),
            deck_type,
        }))
    }
}

#[cfg(test)]
#[path = "enrichment_service_test.rs"]
mod tests;
