// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::repositories::storage_repository::StorageError;
use crate::engines::traits::EngineError;
use crate::queue::message_queue::QueueError;

/// 模型校验错误
///
/// 在构造查询、卡组等结构化记录时产生
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown format code: {0}")]
    UnknownFormat(String),

    #[error("invalid date '{value}' for {field}, expected dd/mm/yyyy")]
    InvalidDate { field: &'static str, value: String },

    #[error("date_start {start} is after date_end {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("current_page must be >= 1")]
    InvalidPage,

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("'{0}' is a reserved search field and cannot be used as a filter")]
    ReservedFilter(String),

    #[error("invalid deck link '{0}'")]
    InvalidLink(String),
}

/// 抓取错误类型
///
/// 覆盖分页探测、页面抓取和卡组补全三个阶段
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 传输层或状态码错误，不在进程内重试
    #[error("HTTP error: {0}")]
    Http(#[from] EngineError),

    /// 第一页为空，说明查询模板有误
    #[error("first results page is empty, the search template is probably malformed")]
    EmptySearch,

    /// 卡组页面缺少下载标记
    #[error("card download marker not found on deck page {url}")]
    MarkerNotFound { url: String },

    /// 搜索结果行结构不完整
    #[error("malformed page: {0}")]
    Parse(String),

    #[error("page number overflowed while probing for the last results page")]
    PageLimitExceeded,

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// 查询登记表错误
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("query registry is empty, submit a manual search first")]
    Empty,

    #[error("last registered search ends on {date_end}, after today ({today})")]
    NotDue { date_end: String, today: String },

    #[error("malformed registry row {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("invalid registry entry: {0}")]
    Validation(#[from] ValidationError),
}

/// Worker错误类型
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("抓取错误: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("登记表错误: {0}")]
    Registry(#[from] RegistryError),

    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),

    #[error("消息解码错误: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("消息类型不匹配: 期望 {expected}, 实际 {found}")]
    UnexpectedMessage { expected: String, found: String },

    #[error("任务执行失败: {0}")]
    Join(#[from] tokio::task::JoinError),
}
