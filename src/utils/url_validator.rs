//! URL 校验与规范化
//!
//! 用户填写的网址、社交链接、按钮链接与评价牌跳转地址都经过这里。

use url::Url;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => {
                write!(f, "Dangerous protocol blocked: {}", proto)
            }
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 是否以 http:// 或 https:// 开头（不区分大小写）
pub fn has_http_scheme(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 验证 URL 安全性：非空、非危险协议、必须是 http(s)、格式有效
pub fn validate_url(url: &str) -> Result<(), UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();

    for proto in DANGEROUS_PROTOCOLS {
        if url_lower.starts_with(proto) {
            return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
        }
    }

    if !has_http_scheme(url) {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(())
}

/// 缺少协议时补上 https://
///
/// `example.com/me` -> `https://example.com/me`
pub fn ensure_scheme(input: &str) -> String {
    let trimmed = input.trim();
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// 规范化可选的网址字段：空白视为清空，否则补全协议并校验
pub fn normalize_optional_url(
    input: Option<&str>,
) -> Result<Option<String>, UrlValidationError> {
    match input.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => {
            let url = ensure_scheme(value);
            validate_url(&url)?;
            Ok(Some(url))
        }
    }
}

/// 获取 URL 验证错误的用户友好消息
pub fn validation_error_message(error: &UrlValidationError) -> &'static str {
    match error {
        UrlValidationError::EmptyUrl => "URL cannot be empty",
        UrlValidationError::InvalidProtocol(_) => "URL must start with http:// or https://",
        UrlValidationError::DangerousProtocol(_) => "This URL protocol is not allowed",
        UrlValidationError::InvalidFormat(_) => "Invalid URL format",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("https://g.page/r/review?x=1").is_ok());
        assert!(validate_url("HTTP://localhost:8080").is_ok());
    }

    #[test]
    fn test_rejected_urls() {
        assert!(matches!(
            validate_url("javascript:alert(1)"),
            Err(UrlValidationError::DangerousProtocol(_))
        ));
        assert!(matches!(
            validate_url("ftp://example.com"),
            Err(UrlValidationError::InvalidProtocol(_))
        ));
        assert_eq!(validate_url("   "), Err(UrlValidationError::EmptyUrl));
    }

    #[test]
    fn test_ensure_scheme() {
        assert_eq!(ensure_scheme("example.com"), "https://example.com");
        assert_eq!(ensure_scheme(" http://example.com "), "http://example.com");
        assert_eq!(
            ensure_scheme("linkedin.com/in/ada"),
            "https://linkedin.com/in/ada"
        );
    }

    #[test]
    fn test_normalize_optional_url() {
        assert_eq!(normalize_optional_url(None), Ok(None));
        assert_eq!(normalize_optional_url(Some("  ")), Ok(None));
        assert_eq!(
            normalize_optional_url(Some("instagram.com/ada")),
            Ok(Some("https://instagram.com/ada".to_string()))
        );
        assert!(normalize_optional_url(Some("javascript:alert(1)")).is_err());
    }
}
