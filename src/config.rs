//! 全局配置管理,存储所有可配置项

use std::env;

use crate::error::{RegionPickError, RpResult};

/// 推荐服务地址的环境变量名
pub const ENV_API_BASE_URL: &str = "REGIONPICK_API_BASE_URL";
/// 请求超时（秒）的环境变量名
pub const ENV_HTTP_TIMEOUT: &str = "REGIONPICK_HTTP_TIMEOUT";

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // 推荐服务根地址（不含末尾斜杠，可为空，首次请求时校验）
    pub api_base_url: String,
    // 超时配置（单位：秒）
    pub http_timeout: u64,
    // 请求 User-Agent
    pub user_agent: String,
    // 是否启用详细日志
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            http_timeout: 30,
            user_agent: format!("regionpick/{}", env!("CARGO_PKG_VERSION")),
            verbose: false,
        }
    }
}

impl ClientConfig {
    /// 校验并返回服务根地址
    pub fn require_base_url(&self) -> RpResult<&str> {
        if self.api_base_url.is_empty() {
            return Err(RegionPickError::ConfigError(format!(
                "未设置推荐服务地址（环境变量 {}）",
                ENV_API_BASE_URL
            )));
        }
        Ok(&self.api_base_url)
    }
}

/// 去掉根地址末尾的斜杠
pub(crate) fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> ClientConfig {
        ClientConfig::default()
    }

    /// 从环境变量读取配置，未设置的项保持默认值
    pub fn from_env() -> ClientConfig {
        let mut builder = CustomConfigBuilder::new();
        if let Ok(url) = env::var(ENV_API_BASE_URL) {
            builder = builder.api_base_url(url);
        }
        if let Some(timeout) = env::var(ENV_HTTP_TIMEOUT)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            builder = builder.http_timeout(timeout);
        }
        builder.build()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: ClientConfig,
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
        }
    }

    pub fn api_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.config.api_base_url = trim_base_url(url.as_ref());
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
