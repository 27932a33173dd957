//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::TappioError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 码与资料错误
/// - 4000-4099: 上传导出错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    RateLimitExceeded = 2004,

    // 码与资料错误 3000-3099
    CodeAlreadyAssigned = 3001,

    // 上传导出错误 4000-4099
    ExportFailed = 4001,
    InvalidMultipartData = 4002,
    FileTooLarge = 4003,
}

impl From<&TappioError> for ErrorCode {
    fn from(err: &TappioError) -> Self {
        match err {
            TappioError::Validation(_) => ErrorCode::BadRequest,
            TappioError::NotFound(_) => ErrorCode::NotFound,
            TappioError::AlreadyAssigned(_) => ErrorCode::CodeAlreadyAssigned,
            TappioError::Unauthorized(_) => ErrorCode::Unauthorized,
            TappioError::Forbidden(_) => ErrorCode::Forbidden,
            TappioError::Export(_) => ErrorCode::ExportFailed,
            TappioError::DatabaseConfig(_)
            | TappioError::DatabaseConnection(_)
            | TappioError::DatabaseOperation(_)
            | TappioError::FileOperation(_)
            | TappioError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&TappioError::already_assigned("x")),
            ErrorCode::CodeAlreadyAssigned
        );
        assert_eq!(
            ErrorCode::from(&TappioError::validation("x")),
            ErrorCode::BadRequest
        );
        assert_eq!(
            ErrorCode::from(&TappioError::database_operation("x")),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(
            serde_json::to_string(&ErrorCode::CodeAlreadyAssigned).unwrap(),
            "3001"
        );
    }

    #[test]
    fn export_typescript_types() {
        ErrorCode::export_all(&ts_rs::Config::from_env()).expect("Failed to export ErrorCode");
    }
}
