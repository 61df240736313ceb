// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 卡组归档（deck_store）：卡组JSON对象的读写
/// - 指标（metrics）：计数器名称与Prometheus导出
/// - 站点适配（mtgtop8）：搜索页与卡组页解析
/// - 查询登记表（query_registry）：CSV格式的提交记录
/// - Redis客户端（redis_client）：消息队列使用的列表操作
/// - 存储（storage）：本地文件、S3和内存存储
pub mod deck_store;
pub mod metrics;
pub mod mtgtop8;
pub mod query_registry;
pub mod redis_client;
pub mod storage;
