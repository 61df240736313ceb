// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 定义搜索查询、卡组记录、队列消息和登记表条目
pub mod deck;
pub mod message;
pub mod query;
pub mod registry;
