// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 分页探测时请求的搜索页数
pub const PAGES_PROBED: &str = "pages_probed_total";
/// 补全完成的卡组数
pub const DECKS_ENRICHED: &str = "decks_enriched_total";
/// 类型缺失的卡组数
pub const DECKS_UNKNOWN_TYPE: &str = "decks_unknown_type_total";
/// 发送到队列的消息数
pub const MESSAGES_SENT: &str = "messages_sent_total";
/// 处理失败的消息数
pub const MESSAGES_FAILED: &str = "messages_failed_total";

pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!(
            "Failed to install Prometheus recorder: {}. This might happen if the port is already in use.",
            e
        );
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}
