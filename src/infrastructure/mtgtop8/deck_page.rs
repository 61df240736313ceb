// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::infrastructure::mtgtop8::search_page::{css, text_of};
use crate::utils::errors::ScrapeError;

/// 标记卡表下载区块的文本
pub const DOWNLOAD_MARKER: &str = " MTGO";

const TYPE_SUFFIX: &str = " decks";

static SECTION: Lazy<Selector> = Lazy::new(|| css("div.S14"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| css("a"));

/// 卡组详情页中提取出的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckPage {
    /// 卡表下载的相对链接
    pub download_href: String,
    /// 紧随下载区块的类型区块，缺失时为 None
    pub deck_type: Option<String>,
}

/// 解析卡组详情页
///
/// 在所有 `div.S14` 区块中找到第一个文本包含 [`DOWNLOAD_MARKER`] 的区块，
/// 取其链接作为下载地址；下一个区块的链接文本（去掉 " decks"）是卡组类型。
pub fn parse_deck_page(html: &str, page_url: &str) -> Result<DeckPage, ScrapeError> {
    let document = Html::parse_document(html);
    let sections: Vec<_> = document.select(&SECTION).collect();

    let marker_not_found = || ScrapeError::MarkerNotFound {
        url: page_url.to_string(),
    };

    let position = sections
        .iter()
        .position(|section| text_of(*section).contains(DOWNLOAD_MARKER))
        .ok_or_else(marker_not_found)?;

    let download_href = sections[position]
        .select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(marker_not_found)?
        .to_string();

    let deck_type = sections
        .get(position + 1)
        .and_then(|section| section.select(&ANCHOR).next())
        .map(|a| text_of(a).replace(TYPE_SUFFIX, ""));

    Ok(DeckPage {
        download_href,
        deck_type,
    })
}

/// 卡表文本后处理：每行以 `;` 结尾，`/` 替换为 `//`
pub fn normalize_card_list(raw: &str) -> String {
    raw.replace('\n', ";\n").replace('/', "//")
}
