// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Local;
use serde_json::json;

use crate::domain::models::query::SearchTemplate;
use crate::domain::models::registry::RunMode;
use crate::presentation::errors::AppError;
use crate::presentation::routes::AppState;

/// 提交搜索模板
///
/// 探测结果页数并为每一页排队一条消息
///
/// # 返回值
///
/// `202 Accepted`，响应体为 `{"queued": n}`
///
/// # 错误
///
/// - 模板无效或第一页为空：`400`
/// - 站点请求失败：`502`
pub async fn submit_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchTemplate>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(template) = payload?;
    let queued = state.producer.produce(&template, RunMode::Manual).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "queued": queued }))))
}

/// 根据登记表触发一次自动搜索
///
/// 登记表为空时返回 `409`
pub async fn submit_automated_search(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let queued = state.producer.produce_automated(today).await?;
    Ok((StatusCode::ACCEPTED, Json(json!({ "queued": queued }))))
}
