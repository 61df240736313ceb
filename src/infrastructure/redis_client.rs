// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use redis::{AsyncCommands, FromRedisValue, RedisResult, Script};

/// Redis客户端
///
/// 提供列表操作和 Lua 脚本执行的异步接口
#[derive(Clone)]
pub struct RedisClient {
    /// Redis客户端
    client: redis::Client,
}

impl RedisClient {
    /// 创建新的Redis客户端实例
    ///
    /// # 参数
    ///
    /// * `redis_url` - Redis连接URL
    pub fn new(redis_url: &str) -> RedisResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }

    /// 从列表左侧压入元素
    ///
    /// # 返回值
    ///
    /// * `Ok(usize)` - 压入后的列表长度
    pub async fn lpush(&self, key: &str, value: &str) -> RedisResult<usize> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.lpush(key, value).await
    }

    /// 原子地执行一段 Lua 脚本
    ///
    /// # 参数
    ///
    /// * `keys` - 依次作为 `KEYS[1..]`
    /// * `args` - 依次作为 `ARGV[1..]`
    pub async fn eval<T: FromRedisValue>(
        &self,
        script: &Script,
        keys: &[&str],
        args: &[String],
    ) -> RedisResult<T> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        let mut invocation = script.prepare_invoke();
        for key in keys {
            invocation.key(*key);
        }
        for arg in args {
            invocation.arg(arg.as_str());
        }
        invocation.invoke_async(&mut con).await
    }
}
