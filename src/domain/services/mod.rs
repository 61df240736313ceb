// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 搜索服务（search_service）：提交搜索表单并解析结果页
/// - 分页服务（pagination_service）：探测查询的结果页数
/// - 补全服务（enrichment_service）：下载卡表与卡组类型
pub mod enrichment_service;
pub mod pagination_service;
pub mod search_service;
