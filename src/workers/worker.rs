// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use metrics::counter;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::domain::models::message::QueueMessage;
use crate::infrastructure::metrics::MESSAGES_FAILED;
use crate::queue::message_queue::MessageQueue;
use crate::utils::errors::WorkerError;

/// 队列不可用时的重试间隔
pub const QUEUE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// 两次检查超时未确认消息之间的最小间隔
pub const REQUEUE_INTERVAL: Duration = Duration::from_secs(5);

/// Worker trait定义
///
/// 所有后台工作器都必须实现此trait
#[async_trait]
pub trait Worker: Send + Sync {
    /// 运行工作器
    async fn run(&self) -> Result<(), WorkerError>;

    /// 获取工作器名称
    fn name(&self) -> &str;
}

/// 单个队列的监听器
///
/// 处理成功才确认消息。失败的消息保持不可见，直到可见性超时后
/// 由某个监听器的定期检查重新投递
#[derive(Clone)]
pub struct QueueListener {
    queue: Arc<dyn MessageQueue>,
    name: String,
    wait: Duration,
    last_requeue: Arc<Mutex<Option<Instant>>>,
}

impl QueueListener {
    pub fn new(queue: Arc<dyn MessageQueue>, name: impl Into<String>, wait: Duration) -> Self {
        Self {
            queue,
            name: name.into(),
            wait,
            last_requeue: Arc::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 接收并处理一条消息
    ///
    /// # 返回值
    ///
    /// * `Ok(false)` - 等待超时，没有消息
    /// * `Ok(true)` - 处理了一条消息（无论成功与否）
    pub async fn poll<F, Fut>(&self, handle: F) -> Result<bool, WorkerError>
    where
        F: FnOnce(QueueMessage) -> Fut + Send,
        Fut: Future<Output = Result<(), WorkerError>> + Send,
    {
        self.requeue_expired().await?;

        let Some(received) = self.queue.receive(&self.name, self.wait).await? else {
            return Ok(false);
        };

        match handle(received.message.clone()).await {
            Ok(()) => {
                self.queue.ack(&self.name, &received).await?;
                debug!("Acknowledged message from {}", self.name);
            }
            Err(e) => {
                counter!(MESSAGES_FAILED, "queue" => self.name.clone()).increment(1);
                error!("Failed to process message from {}: {}", self.name, e);
            }
        }
        Ok(true)
    }

    /// 每隔 `REQUEUE_INTERVAL` 把超时未确认的消息放回队列
    async fn requeue_expired(&self) -> Result<(), WorkerError> {
        {
            let mut last = self.last_requeue.lock().await;
            if last.is_some_and(|at| at.elapsed() < REQUEUE_INTERVAL) {
                return Ok(());
            }
            *last = Some(Instant::now());
        }

        let requeued = self.queue.requeue_expired(&self.name).await?;
        if requeued > 0 {
            warn!("Redelivering {} expired messages on {}", requeued, self.name);
        }
        Ok(())
    }
}
