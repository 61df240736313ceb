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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "DECK_HARVESTER";

/// 应用程序配置设置
///
/// 包含站点、队列、存储、登记表、工作器、服务器和遥测等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 站点配置
    pub site: SiteSettings,
    /// 队列配置
    pub queue: QueueSettings,
    /// 存储配置
    pub storage: StorageSettings,
    /// 查询登记表配置
    pub registry: RegistrySettings,
    /// 工作器配置
    pub workers: WorkerSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 日志配置
    pub telemetry: TelemetrySettings,
    /// 指标配置
    pub metrics: MetricsSettings,
}

/// 站点配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// 相对链接的基准地址
    pub base_url: String,
    /// 搜索表单提交地址
    pub search_url: String,
    pub user_agent: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.mtgtop8.com/".to_string(),
            search_url: "http://mtgtop8.com/search".to_string(),
            user_agent: "Mozilla/5.0 (compatible; deck-harvester/0.1)".to_string(),
            timeout_secs: 30,
        }
    }
}

/// 队列配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    /// Redis连接URL
    pub redis_url: String,
    /// 逐页查询所在的队列
    pub search_queue: String,
    /// 补全后卡组所在的队列
    pub deck_queue: String,
    /// 阻塞读取的超时时间（秒）
    pub poll_timeout_secs: u64,
    /// 已接收消息在未确认时重新可见前的时间（秒）
    pub visibility_timeout_secs: u64,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, s3, memory)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
    /// S3 区域
    pub s3_region: Option<String>,
    /// S3 存储桶名称
    pub s3_bucket: Option<String>,
    /// S3 访问密钥，缺省时使用默认凭证链
    pub s3_access_key: Option<String>,
    /// S3 密钥
    pub s3_secret_key: Option<String>,
    /// S3 端点 (可选，用于 MinIO 等兼容服务)
    pub s3_endpoint: Option<String>,
}

/// 查询登记表配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    /// 登记表在存储中的键
    pub key: String,
}

/// 工作器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSettings {
    /// 本地模式下并行处理的查询数
    pub local_parallelism: usize,
    /// 队列模式下的消费者数量
    pub consumers: usize,
    /// 队列模式下的归档者数量
    pub archivers: usize,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 日志配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    /// 是否输出JSON格式日志
    pub json: bool,
}

/// 指标配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub listen_addr: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// 只包含默认值的配置构建器
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let site = SiteSettings::default();
        Config::builder()
            // Site
            .set_default("site.base_url", site.base_url)?
            .set_default("site.search_url", site.search_url)?
            .set_default("site.user_agent", site.user_agent)?
            .set_default("site.timeout_secs", site.timeout_secs)?
            // Queue
            .set_default("queue.redis_url", "redis://127.0.0.1:6379")?
            .set_default("queue.search_queue", "deck-search-payloads-queue")?
            .set_default("queue.deck_queue", "downloaded-decks-queue")?
            .set_default("queue.poll_timeout_secs", 5)?
            .set_default("queue.visibility_timeout_secs", 600)?
            // Storage
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            // Registry
            .set_default("registry.key", "registry/queries.csv")?
            // Workers
            .set_default("workers.local_parallelism", 4)?
            .set_default("workers.consumers", 2)?
            .set_default("workers.archivers", 1)?
            // Server
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Telemetry
            .set_default("telemetry.json", false)?
            .set_default("metrics.enabled", false)?
            .set_default("metrics.listen_addr", "0.0.0.0:9000")
    }
}
