// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! mtgtop8 站点适配
//!
//! 站点地址和页面标记解析。解析只依赖表格/区块的 class，不尝试适应改版。

pub mod deck_page;
pub mod search_page;

use url::Url;

use crate::config::settings::SiteSettings;
use crate::engines::traits::EngineError;

/// 站点地址
#[derive(Debug, Clone)]
pub struct SiteEndpoints {
    base: Url,
    search: Url,
}

impl SiteEndpoints {
    pub fn new(base_url: &str, search_url: &str) -> Result<Self, EngineError> {
        let base = Url::parse(base_url)
            .map_err(|e| EngineError::Other(format!("invalid base url {}: {}", base_url, e)))?;
        let search = Url::parse(search_url)
            .map_err(|e| EngineError::Other(format!("invalid search url {}: {}", search_url, e)))?;
        Ok(Self { base, search })
    }

    pub fn from_settings(settings: &SiteSettings) -> Result<Self, EngineError> {
        Self::new(&settings.base_url, &settings.search_url)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn search_url(&self) -> &str {
        self.search.as_str()
    }

    /// 将页面中的相对链接转换为绝对地址
    pub fn resolve(&self, href: &str) -> Result<Url, EngineError> {
        self.base
            .join(href)
            .map_err(|e| EngineError::Other(format!("invalid link {}: {}", href, e)))
    }
}
