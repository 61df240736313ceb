// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：查询、卡组、消息与登记记录
/// - 卡组标识（identity）：由选手、日期、赛事派生的短哈希
/// - 仓库接口（repositories）：对象存储抽象接口
/// - 服务（services）：分页探测与卡组补全
pub mod identity;
pub mod models;
pub mod repositories;
pub mod services;
