// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::presentation::handlers::search_handler;
use crate::workers::producer::DeckProducer;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub producer: Arc<DeckProducer>,
}

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/searches", post(search_handler::submit_search))
        .route(
            "/v1/searches/automated",
            post(search_handler::submit_automated_search),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 健康检查端点
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
