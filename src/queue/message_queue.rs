// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use redis::Script;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::models::message::QueueMessage;
use crate::infrastructure::redis_client::RedisClient;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// 内存队列默认的可见性超时
pub const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(600);

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 消息编码错误
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// 已接收但尚未确认的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message: QueueMessage,
    /// 确认消息时使用的回执，每次投递都不同
    pub receipt: String,
}

/// 消息队列特质
///
/// 接收后的消息在可见性超时内对其他消费者不可见。超时前未确认的消息
/// 由 `requeue_expired` 重新投递，仍在处理中的消息不受影响
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// 发送消息
    async fn send(&self, queue: &str, message: &QueueMessage) -> Result<(), QueueError>;

    /// 接收一条消息，最多等待 `wait`
    async fn receive(
        &self,
        queue: &str,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError>;

    /// 确认消息已处理
    ///
    /// 回执所属的投递已经超时并被重新投递时，确认不产生任何效果
    async fn ack(&self, queue: &str, received: &ReceivedMessage) -> Result<(), QueueError>;

    /// 将可见性超时已过且未确认的消息放回队列
    ///
    /// # 返回值
    ///
    /// 重新投递的消息数
    async fn requeue_expired(&self, queue: &str) -> Result<usize, QueueError>;
}

/// 队列中保存的消息信封
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    id: Uuid,
    message: QueueMessage,
}

// KEYS: queue, processing, deadlines. ARGV: visibility deadline (ms)
static CLAIM_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local raw = redis.call("LMOVE", KEYS[1], KEYS[2], "RIGHT", "LEFT")
        if raw then
            redis.call("ZADD", KEYS[3], ARGV[1], raw)
        end
        return raw
        "#,
    )
});

// KEYS: processing, deadlines. ARGV: raw envelope, deadline of this delivery
static ACK_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local score = redis.call("ZSCORE", KEYS[2], ARGV[1])
        if not score or tonumber(score) ~= tonumber(ARGV[2]) then
            return 0
        end
        redis.call("ZREM", KEYS[2], ARGV[1])
        return redis.call("LREM", KEYS[1], 1, ARGV[1])
        "#,
    )
});

// KEYS: queue, processing, deadlines. ARGV: now (ms)
static REQUEUE_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
        local expired = redis.call("ZRANGEBYSCORE", KEYS[3], "-inf", ARGV[1])
        local moved = 0
        for _, raw in ipairs(expired) do
            redis.call("ZREM", KEYS[3], raw)
            if redis.call("LREM", KEYS[2], 1, raw) > 0 then
                redis.call("RPUSH", KEYS[1], raw)
                moved = moved + 1
            end
        end
        return moved
        "#,
    )
});

/// 基于Redis列表的消息队列
///
/// 发送为 LPUSH。接收时原子地把消息移动到 `<queue>:processing`，
/// 同时在有序集合 `<queue>:deadlines` 中记录可见性截止时间
#[derive(Clone)]
pub struct RedisMessageQueue {
    client: RedisClient,
    visibility_timeout: Duration,
}

impl RedisMessageQueue {
    pub fn new(client: RedisClient, visibility_timeout: Duration) -> Self {
        Self {
            client,
            visibility_timeout,
        }
    }

    fn processing_list(queue: &str) -> String {
        format!("{}:processing", queue)
    }

    fn deadline_set(queue: &str) -> String {
        format!("{}:deadlines", queue)
    }

    fn now_millis() -> i64 {
        Utc::now().timestamp_millis()
    }

    fn receipt(deadline: i64, raw: &str) -> String {
        format!("{}|{}", deadline, raw)
    }

    /// 拆出回执中的截止时间和原始信封
    fn split_receipt(receipt: &str) -> Option<(&str, &str)> {
        receipt.split_once('|')
    }

    async fn release(&self, queue: &str, raw: &str, deadline: &str) -> Result<bool, QueueError> {
        let removed: i64 = self
            .client
            .eval(
                &ACK_SCRIPT,
                &[&Self::processing_list(queue), &Self::deadline_set(queue)],
                &[raw.to_string(), deadline.to_string()],
            )
            .await?;
        Ok(removed > 0)
    }
}

#[async_trait]
impl MessageQueue for RedisMessageQueue {
    async fn send(&self, queue: &str, message: &QueueMessage) -> Result<(), QueueError> {
        let envelope = Envelope {
            id: Uuid::new_v4(),
            message: message.clone(),
        };
        let raw = serde_json::to_string(&envelope)?;
        self.client.lpush(queue, &raw).await?;
        Ok(())
    }

    async fn receive(
        &self,
        queue: &str,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError> {
        let keys = [
            queue.to_string(),
            Self::processing_list(queue),
            Self::deadline_set(queue),
        ];
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let wait_until = Instant::now() + wait;

        loop {
            let deadline = Self::now_millis() + self.visibility_timeout.as_millis() as i64;
            let claimed: Option<String> = self
                .client
                .eval(&CLAIM_SCRIPT, &keys, &[deadline.to_string()])
                .await?;

            if let Some(raw) = claimed {
                return match serde_json::from_str::<Envelope>(&raw) {
                    Ok(envelope) => Ok(Some(ReceivedMessage {
                        message: envelope.message,
                        receipt: Self::receipt(deadline, &raw),
                    })),
                    Err(e) => {
                        // Undecodable entries would be redelivered forever
                        error!("Dropping malformed message from {}: {}", queue, e);
                        self.release(queue, &raw, &deadline.to_string()).await?;
                        Err(QueueError::Encoding(e))
                    }
                };
            }

            if Instant::now() >= wait_until {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn ack(&self, queue: &str, received: &ReceivedMessage) -> Result<(), QueueError> {
        let Some((deadline, raw)) = Self::split_receipt(&received.receipt) else {
            warn!("Ignoring malformed receipt for {}", queue);
            return Ok(());
        };
        if !self.release(queue, raw, deadline).await? {
            warn!("Late ack on {}: the message was already redelivered", queue);
        }
        Ok(())
    }

    async fn requeue_expired(&self, queue: &str) -> Result<usize, QueueError> {
        let moved: usize = self
            .client
            .eval(
                &REQUEUE_SCRIPT,
                &[
                    queue,
                    &Self::processing_list(queue),
                    &Self::deadline_set(queue),
                ],
                &[Self::now_millis().to_string()],
            )
            .await?;
        if moved > 0 {
            info!("Requeued {} expired messages into {}", moved, queue);
        }
        Ok(moved)
    }
}

/// 内存队列中正在处理的一次投递
#[derive(Debug)]
struct InFlight {
    received: ReceivedMessage,
    visible_at: Instant,
}

#[derive(Default)]
struct MemoryQueueState {
    ready: HashMap<String, VecDeque<QueueMessage>>,
    in_flight: HashMap<String, Vec<InFlight>>,
}

/// 内存消息队列，用于本地运行和测试
#[derive(Clone)]
pub struct InMemoryMessageQueue {
    state: Arc<Mutex<MemoryQueueState>>,
    notify: Arc<Notify>,
    visibility_timeout: Duration,
}

impl Default for InMemoryMessageQueue {
    fn default() -> Self {
        Self::with_visibility_timeout(DEFAULT_VISIBILITY_TIMEOUT)
    }
}

impl InMemoryMessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility_timeout(visibility_timeout: Duration) -> Self {
        Self {
            state: Arc::default(),
            notify: Arc::default(),
            visibility_timeout,
        }
    }

    /// 等待接收的消息
    pub async fn pending(&self, queue: &str) -> Vec<QueueMessage> {
        let state = self.state.lock().await;
        state
            .ready
            .get(queue)
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// 已接收但未确认的消息数
    pub async fn in_flight(&self, queue: &str) -> usize {
        let state = self.state.lock().await;
        state.in_flight.get(queue).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl MessageQueue for InMemoryMessageQueue {
    async fn send(&self, queue: &str, message: &QueueMessage) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        state
            .ready
            .entry(queue.to_string())
            .or_default()
            .push_back(message.clone());
        self.notify.notify_one();
        Ok(())
    }

    async fn receive(
        &self,
        queue: &str,
        wait: Duration,
    ) -> Result<Option<ReceivedMessage>, QueueError> {
        let deadline = Instant::now() + wait;

        loop {
            {
                let mut state = self.state.lock().await;
                if let Some(message) = state.ready.get_mut(queue).and_then(VecDeque::pop_front) {
                    let received = ReceivedMessage {
                        message,
                        receipt: Uuid::new_v4().to_string(),
                    };
                    state
                        .in_flight
                        .entry(queue.to_string())
                        .or_default()
                        .push(InFlight {
                            received: received.clone(),
                            visible_at: Instant::now() + self.visibility_timeout,
                        });
                    return Ok(Some(received));
                }
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let _ = tokio::time::timeout(deadline - now, self.notify.notified()).await;
        }
    }

    async fn ack(&self, queue: &str, received: &ReceivedMessage) -> Result<(), QueueError> {
        let mut state = self.state.lock().await;
        if let Some(in_flight) = state.in_flight.get_mut(queue) {
            in_flight.retain(|m| m.received.receipt != received.receipt);
        }
        Ok(())
    }

    async fn requeue_expired(&self, queue: &str) -> Result<usize, QueueError> {
        let now = Instant::now();
        let mut state = self.state.lock().await;
        let Some(in_flight) = state.in_flight.get_mut(queue) else {
            return Ok(0);
        };

        let (expired, waiting): (Vec<InFlight>, Vec<InFlight>) = std::mem::take(in_flight)
            .into_iter()
            .partition(|m| m.visible_at <= now);
        *in_flight = waiting;

        let count = expired.len();
        let ready = state.ready.entry(queue.to_string()).or_default();
        for entry in expired.into_iter().rev() {
            ready.push_front(entry.received.message);
        }
        for _ in 0..count {
            self.notify.notify_one();
        }
        Ok(count)
    }
}

#[cfg(test)]
#[path = "message_queue_test.rs"]
mod tests;
