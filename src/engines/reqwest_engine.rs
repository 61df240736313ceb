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

use crate::config::settings::SiteSettings;
use crate::engines::traits::{EngineError, HttpEngine};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::debug;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP引擎，内部客户端带cookie存储，相当于一个会话
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的引擎实例
    ///
    /// # 参数
    ///
    /// * `settings` - 站点配置，提供User-Agent和超时时间
    pub fn new(settings: &SiteSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self { client })
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<String, EngineError> {
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl HttpEngine for ReqwestEngine {
    async fn get(&self, url: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let body = Self::read_body(url, response).await?;
        debug!(
            url,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "GET completed"
        );
        Ok(body)
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String, EngineError> {
        let start = Instant::now();
        let response = self.client.post(url).form(form).send().await?;
        let body = Self::read_body(url, response).await?;
        debug!(
            url,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "POST completed"
        );
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
