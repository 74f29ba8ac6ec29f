//! 外部链接整理

use once_cell::sync::Lazy;
use regex::Regex;

static HTTP_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://").unwrap()
});

/// 去首尾空白，缺少 http(s) 协议头时补 https://；空值返回 None
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if HTTP_SCHEME.is_match(trimmed) {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url(" www.work24.go.kr ").as_deref(), Some("https://www.work24.go.kr"));
        assert_eq!(normalize_url("HTTP://example.com/a").as_deref(), Some("HTTP://example.com/a"));
        assert_eq!(normalize_url("https://example.com").as_deref(), Some("https://example.com"));
        assert_eq!(normalize_url("   "), None);
    }
}
