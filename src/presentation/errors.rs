// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::utils::errors::{RegistryError, ScrapeError, WorkerError};

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<JsonRejection>().is_some() {
            return StatusCode::BAD_REQUEST;
        }

        match self.0.downcast_ref::<WorkerError>() {
            Some(WorkerError::Scrape(e)) => scrape_status(e),
            Some(WorkerError::Validation(_)) => StatusCode::BAD_REQUEST,
            Some(WorkerError::Registry(RegistryError::Empty | RegistryError::NotDue { .. })) => {
                StatusCode::CONFLICT
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn scrape_status(err: &ScrapeError) -> StatusCode {
    match err {
        ScrapeError::EmptySearch | ScrapeError::Validation(_) => StatusCode::BAD_REQUEST,
        ScrapeError::Http(_) | ScrapeError::MarkerNotFound { .. } | ScrapeError::Parse(_) => {
            StatusCode::BAD_GATEWAY
        }
        ScrapeError::PageLimitExceeded => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
