// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 用例模块
///
/// - 单页查询编排（run_query）
/// - 抓取组件装配（scrape_context）
pub mod run_query;
pub mod scrape_context;
