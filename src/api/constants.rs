//! API 模块常量定义

/// 会话 Cookie 名称
pub const SESSION_COOKIE_NAME: &str = "tappio_session";

/// JSON API 前缀
pub const API_PREFIX: &str = "/api/v1";

/// JSON 请求体上限
pub const JSON_LIMIT_BYTES: usize = 64 * 1024;
