// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败（连接、超时、读取响应）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 状态码
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 对应的 HTTP 状态码（如果有）
    pub fn status(&self) -> Option<u16> {
        match self {
            EngineError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            EngineError::Status { status, .. } => Some(*status),
            EngineError::Other(_) => None,
        }
    }
}

/// HTTP 引擎特质
///
/// 同一个引擎实例共享一个会话（cookie），每次流水线运行创建一个
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpEngine: Send + Sync {
    /// GET 请求，返回响应文本
    async fn get(&self, url: &str) -> Result<String, EngineError>;

    /// 以 urlencoded 表单 POST，返回响应文本
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
