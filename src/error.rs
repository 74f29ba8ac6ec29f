//! 全局错误类型定义

use std::fmt;
use std::sync::Arc;

use csv::Error as CsvError;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum RegionPickError {
    // 远程服务返回的非2xx响应
    #[error("{0}")]
    Api(ApiError),

    // 配置相关错误
    #[error("配置错误：{0}")]
    ConfigError(String),

    // 网络相关错误
    #[error("网络请求失败：{0}")]
    HttpError(#[from] reqwest::Error),

    // 合并请求中由首个请求方带回的失败
    #[error("共享请求失败：{0}")]
    SharedFetchError(Arc<RegionPickError>),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("CSV解析失败：{0}")]
    CsvError(#[from] CsvError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

impl RegionPickError {
    /// 取出远程服务错误（含合并请求转发的错误）
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            RegionPickError::Api(api) => Some(api),
            RegionPickError::SharedFetchError(inner) => inner.as_api(),
            _ => None,
        }
    }

    /// 服务端建议的重试等待秒数（仅限流时存在）
    pub fn retry_after_secs(&self) -> Option<u64> {
        self.as_api().and_then(|api| api.retry_after_secs)
    }
}

impl From<ApiError> for RegionPickError {
    fn from(err: ApiError) -> Self {
        RegionPickError::Api(err)
    }
}

/// 服务端错误体 `{code?, message?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// 远程服务的HTTP错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
    pub retry_after_secs: Option<u64>,
    pub payload: Option<ErrorPayload>,
}

impl ApiError {
    pub const DEFAULT_MESSAGE: &'static str = "요청 처리에 실패했습니다.";

    /// 由状态码、可选错误体和 Retry-After 组装错误
    pub fn from_response(
        status: u16,
        payload: Option<ErrorPayload>,
        retry_after_secs: Option<u64>,
    ) -> Self {
        let server_message = payload
            .as_ref()
            .and_then(|p| p.message.as_deref())
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let message = match (server_message, payload.is_some(), retry_after_secs) {
            (Some(m), _, _) => m,
            // 错误体无法解析时才使用限流提示
            (None, false, Some(secs)) if status == 429 && secs > 0 => {
                format!("요청 한도를 초과했습니다. {}초 뒤 다시 시도해 주세요.", secs)
            }
            _ => Self::DEFAULT_MESSAGE.to_string(),
        };

        Self {
            status,
            code: payload.as_ref().and_then(|p| p.code.clone()),
            message,
            retry_after_secs,
            payload,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "[{} {}] {}", self.status, code, self.message),
            None => write!(f, "[{}] {}", self.status, self.message),
        }
    }
}

impl std::error::Error for ApiError {}

// 全局Result类型
pub type RpResult<T> = Result<T, RegionPickError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wins() {
        let payload = ErrorPayload {
            code: Some("E_SIGUNGU".to_string()),
            message: Some("존재하지 않는 시군구입니다.".to_string()),
        };
        let err = ApiError::from_response(404, Some(payload), None);
        assert_eq!(err.message, "존재하지 않는 시군구입니다.");
        assert_eq!(err.code.as_deref(), Some("E_SIGUNGU"));
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_rate_limit_message_without_body() {
        let err = ApiError::from_response(429, None, Some(30));
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after_secs, Some(30));
        assert_eq!(err.message, "요청 한도를 초과했습니다. 30초 뒤 다시 시도해 주세요.");
    }

    #[test]
    fn test_user_facing_messages_are_korean() {
        assert_eq!(ApiError::from_response(502, None, None).message, "요청 처리에 실패했습니다.");
        // 错误体可解析时不使用限流提示
        let parsed = ApiError::from_response(429, Some(ErrorPayload::default()), Some(10));
        assert_eq!(parsed.message, ApiError::DEFAULT_MESSAGE);
    }

    #[test]
    fn test_default_message() {
        let err = ApiError::from_response(500, None, None);
        assert_eq!(err.message, ApiError::DEFAULT_MESSAGE);
        assert_eq!(err.to_string(), format!("[500] {}", ApiError::DEFAULT_MESSAGE));
    }

    #[test]
    fn test_retry_hint_through_shared_error() {
        let inner = RegionPickError::from(ApiError::from_response(429, None, Some(5)));
        let shared = RegionPickError::SharedFetchError(Arc::new(inner));
        assert_eq!(shared.retry_after_secs(), Some(5));
    }
}
