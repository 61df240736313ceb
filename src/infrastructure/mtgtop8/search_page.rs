// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::domain::models::deck::DeckSummary;
use crate::infrastructure::mtgtop8::SiteEndpoints;
use crate::utils::errors::ScrapeError;

static RESULT_ROW: Lazy<Selector> = Lazy::new(|| css("tr.hover_tr"));
static S12_CELL: Lazy<Selector> = Lazy::new(|| css("td.S12"));
static S11_CELL: Lazy<Selector> = Lazy::new(|| css("td.S11"));
static PLAYER_CELL: Lazy<Selector> = Lazy::new(|| css("td.G12"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| css("a"));

pub(crate) fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must be valid CSS")
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// 解析搜索结果页
///
/// 每个 `tr.hover_tr` 是一个卡组；没有结果行时返回空列表
///
/// # 参数
///
/// * `html` - 搜索结果页HTML
/// * `site` - 用于拼接卡组详情页绝对地址
pub fn parse_search_page(html: &str, site: &SiteEndpoints) -> Result<Vec<DeckSummary>, ScrapeError> {
    let document = Html::parse_document(html);
    let mut decks = Vec::new();

    for (index, row) in document.select(&RESULT_ROW).enumerate() {
        let malformed = |what: &str| ScrapeError::Parse(format!("result row {}: missing {}", index, what));

        let s12: Vec<ElementRef> = row.select(&S12_CELL).collect();
        let s11: Vec<ElementRef> = row.select(&S11_CELL).collect();

        let anchor = s12
            .first()
            .and_then(|cell| cell.select(&ANCHOR).next())
            .ok_or_else(|| malformed("deck link"))?;
        let href = anchor
            .value()
            .attr("href")
            .ok_or_else(|| malformed("deck href"))?;
        let link = site
            .resolve(href)
            .map_err(|e| ScrapeError::Parse(format!("result row {}: {}", index, e)))?;

        let result = s12.get(1).copied().map(text_of).ok_or_else(|| malformed("result"))?;
        let player = row
            .select(&PLAYER_CELL)
            .next()
            .map(text_of)
            .ok_or_else(|| malformed("player"))?;
        let event = s11.first().copied().map(text_of).ok_or_else(|| malformed("event"))?;
        let date = s11.get(1).copied().map(text_of).ok_or_else(|| malformed("date"))?;

        decks.push(DeckSummary::new(
            link.as_str(),
            result,
            date,
            player,
            event,
            text_of(anchor),
        )?);
    }

    Ok(decks)
}
