// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// - 生产者（producer）：把搜索模板拆成逐页消息
/// - 消费者（consumer）：执行单页查询并发送卡组
/// - 归档器（archiver）：保存卡组到对象存储
/// - 本地执行器（pool）：不经队列并行执行
/// - 管理器（manager）：启动与关闭后台工作器
pub mod archiver;
pub mod consumer;
pub mod manager;
pub mod pool;
pub mod producer;
pub mod worker;
