// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use deck_harvester::application::use_cases::scrape_context::ScrapeContext;
use deck_harvester::engines::traits::{EngineError, HttpEngine};
use deck_harvester::infrastructure::mtgtop8::SiteEndpoints;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://www.mtgtop8.com/";
pub const SEARCH_URL: &str = "http://mtgtop8.com/search";

/// 模拟的站点：前 `pages` 页每页 `decks_per_page` 个卡组
pub struct FixtureSite {
    pages: u32,
    decks_per_page: u32,
    delay: Duration,
    broken_deck: Option<String>,
    fail_search: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    searched_pages: Mutex<Vec<u32>>,
}

impl FixtureSite {
    pub fn new(pages: u32, decks_per_page: u32) -> Self {
        Self {
            pages,
            decks_per_page,
            delay: Duration::ZERO,
            broken_deck: None,
            fail_search: false,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            searched_pages: Mutex::new(Vec::new()),
        }
    }

    /// 每次搜索请求的耗时
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 该卡组的详情页缺少下载标记
    pub fn with_broken_deck(mut self, deck: &str) -> Self {
        self.broken_deck = Some(deck.to_string());
        self
    }

    /// 搜索接口返回 500
    pub fn failing(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn searched_pages(&self) -> Vec<u32> {
        self.searched_pages.lock().unwrap().clone()
    }

    pub fn context(self: &Arc<Self>) -> ScrapeContext {
        ScrapeContext::from_engine(self.clone(), site())
    }

    fn search_page(&self, page: u32) -> String {
        let mut rows = String::new();
        if page <= self.pages {
            for i in 0..self.decks_per_page {
                let deck = deck_number(page, i);
                rows.push_str(&format!(
                    r#"<tr class="hover_tr">
  <td><input type="checkbox" value="{deck}"></td>
  <td class="S12"><a href="event?e={page}&amp;d={deck}&amp;f=MO">Deck {deck}</a></td>
  <td class="G12"><a href="search?player=p{deck}">player-{deck}</a></td>
  <td class="S12">{rank}</td>
  <td class="S11">Fixture Event {page}</td>
  <td class="S11">25/09/21</td>
</tr>
"#,
                    rank = i + 1,
                ));
            }
        }
        format!(r#"<html><body><table class="Stable">{}</table></body></html>"#, rows)
    }

    fn deck_page(&self, deck: &str) -> String {
        if self.broken_deck.as_deref() == Some(deck) {
            return r#"<div class="S14"><a href="format?f=MO">Modern</a></div>"#.to_string();
        }
        format!(
            r#"<html><body>
<div class="S14"><a href="format?f=MO">Modern</a></div>
<div class="S14">Export : <a href="mtgo?d={deck}&amp;f=MTGO">MTGO</a></div>
<div class="S14"><a href="archetype?a={deck}">Archetype {deck} decks</a></div>
</body></html>"#
        )
    }
}

pub fn deck_number(page: u32, index: u32) -> String {
    (page * 100 + index).to_string()
}

pub fn site() -> SiteEndpoints {
    SiteEndpoints::new(BASE_URL, SEARCH_URL).unwrap()
}

fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

#[async_trait]
impl HttpEngine for FixtureSite {
    async fn get(&self, url: &str) -> Result<String, EngineError> {
        let deck = query_param(url, "d").ok_or_else(|| EngineError::Status {
            status: 404,
            url: url.to_string(),
        })?;

        if url.contains("/event?") {
            Ok(self.deck_page(&deck))
        } else if url.contains("/mtgo?") {
            Ok(format!("4 Card {deck}\n1 Fire/Ice\n"))
        } else {
            Err(EngineError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String, EngineError> {
        if self.fail_search {
            return Err(EngineError::Status {
                status: 500,
                url: url.to_string(),
            });
        }

        let page: u32 = form
            .iter()
            .find(|(k, _)| k == "current_page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(1);
        self.searched_pages.lock().unwrap().push(page);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        Ok(self.search_page(page))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
