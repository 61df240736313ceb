// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::models::deck::DeckRecord;
use crate::domain::models::query::PageQuery;

/// `date_added` 属性使用的日期格式
pub const DATE_ADDED_FORMAT: &str = "%d/%m/%y";

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// 单页搜索查询
    DeckSearchPayload,
    /// 补全后的卡组记录
    FullDeck,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MessageType::DeckSearchPayload => write!(f, "deck_search_payload"),
            MessageType::FullDeck => write!(f, "full_deck"),
        }
    }
}

/// 消息属性
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttributes {
    pub msg_type: MessageType,
    /// `dd/mm/yy`
    pub date_added: String,
}

/// 队列消息
///
/// 消息体为 JSON 序列化的查询或卡组记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub body: String,
    pub attributes: MessageAttributes,
}

impl QueueMessage {
    fn new<T: Serialize>(
        payload: &T,
        msg_type: MessageType,
        now: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            body: serde_json::to_string(payload)?,
            attributes: MessageAttributes {
                msg_type,
                date_added: now.format(DATE_ADDED_FORMAT).to_string(),
            },
        })
    }

    pub fn search_payload(query: &PageQuery, now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Self::new(query, MessageType::DeckSearchPayload, now)
    }

    pub fn full_deck(deck: &DeckRecord, now: DateTime<Utc>) -> Result<Self, serde_json::Error> {
        Self::new(deck, MessageType::FullDeck, now)
    }

    pub fn msg_type(&self) -> MessageType {
        self.attributes.msg_type
    }

    /// 解码消息体
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
