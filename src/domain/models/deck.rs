// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::domain::identity;
use crate::utils::errors::ValidationError;

/// 搜索结果中的一行卡组摘要
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSummary {
    /// 卡组详情页的绝对地址
    pub link: String,
    /// 比赛名次
    pub result: String,
    /// 比赛日期，保留站点原始文本
    pub date: String,
    pub player: String,
    pub event: String,
    pub deck_name: String,
}

impl DeckSummary {
    /// 创建卡组摘要
    ///
    /// `link` 必须是绝对地址，其余字段保持站点给出的原始文本
    pub fn new(
        link: impl Into<String>,
        result: impl Into<String>,
        date: impl Into<String>,
        player: impl Into<String>,
        event: impl Into<String>,
        deck_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let link = link.into();
        if Url::parse(&link).is_err() {
            return Err(ValidationError::InvalidLink(link));
        }

        Ok(Self {
            link,
            result: result.into(),
            date: date.into(),
            player: player.into(),
            event: event.into(),
            deck_name: deck_name.into(),
        })
    }

    /// 由选手、日期、赛事计算的卡组标识
    pub fn deck_id(&self) -> String {
        identity::deck_id(&self.player, &self.date, &self.event)
    }
}

/// 卡组类型
///
/// 类型缺失时为 `Unknown`，序列化为字符串 `"unknown"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeckType {
    Named(String),
    Unknown,
}

impl DeckType {
    pub const UNKNOWN: &'static str = "unknown";

    pub fn is_unknown(&self) -> bool {
        matches!(self, DeckType::Unknown)
    }
}

impl From<String> for DeckType {
    fn from(value: String) -> Self {
        if value == DeckType::UNKNOWN {
            DeckType::Unknown
        } else {
            DeckType::Named(value)
        }
    }
}

impl From<DeckType> for String {
    fn from(value: DeckType) -> Self {
        match value {
            DeckType::Named(name) => name,
            DeckType::Unknown => DeckType::UNKNOWN.to_string(),
        }
    }
}

impl fmt::Display for DeckType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeckType::Named(name) => f.write_str(name),
            DeckType::Unknown => f.write_str(DeckType::UNKNOWN),
        }
    }
}

/// 卡组详情页得到的补全数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckComposition {
    /// 以 `;` 结尾的逐行卡表
    pub cards: String,
    pub deck_type: DeckType,
}

/// 卡组记录
///
/// 创建时即带有 `deck_id`，补全后才带有 `cards` 和 `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    #[serde(flatten)]
    pub summary: DeckSummary,
    pub deck_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub deck_type: Option<DeckType>,
}

impl DeckRecord {
    pub fn new(summary: DeckSummary) -> Self {
        let deck_id = summary.deck_id();
        Self {
            summary,
            deck_id,
            cards: None,
            deck_type: None,
        }
    }

    pub fn with_composition(mut self, composition: DeckComposition) -> Self {
        self.cards = Some(composition.cards);
        self.deck_type = Some(composition.deck_type);
        self
    }

    pub fn is_enriched(&self) -> bool {
        self.cards.is_some() && self.deck_type.is_some()
    }
}

impl From<DeckSummary> for DeckRecord {
    fn from(summary: DeckSummary) -> Self {
        DeckRecord::new(summary)
    }
}
