// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::workers::worker::Worker;

/// 工作管理器
#[derive(Default)]
pub struct WorkerManager {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 启动工作进程
    ///
    /// # 参数
    ///
    /// * `worker` - 要启动的工作器
    /// * `count` - 并行运行的副本数
    pub fn start_workers(&mut self, worker: Arc<dyn Worker>, count: usize) {
        for _ in 0..count {
            let worker = worker.clone();
            let handle = tokio::spawn(async move {
                if let Err(e) = worker.run().await {
                    error!("Worker {} stopped: {}", worker.name(), e);
                }
            });
            self.handles.push(handle);
        }
        info!("Started {} x {}", count, worker.name());
    }

    pub fn running(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// 停止全部工作进程
    pub fn shutdown(&mut self) {
        info!("Shutting down workers...");
        for handle in self.handles.drain(..) {
            handle.abort();
        }
        info!("Workers shut down successfully");
    }

    /// 等待关闭信号并关闭工作进程
    pub async fn wait_for_shutdown(&mut self) {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(err) => error!("Unable to listen for shutdown signal: {}", err),
        }

        self.shutdown();
    }
}
