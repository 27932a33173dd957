use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum TappioError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    AlreadyAssigned(String),
    Unauthorized(String),
    Forbidden(String),
    Serialization(String),
    Export(String),
}

impl TappioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TappioError::DatabaseConfig(_) => "E001",
            TappioError::DatabaseConnection(_) => "E002",
            TappioError::DatabaseOperation(_) => "E003",
            TappioError::FileOperation(_) => "E004",
            TappioError::Validation(_) => "E005",
            TappioError::NotFound(_) => "E006",
            TappioError::AlreadyAssigned(_) => "E007",
            TappioError::Unauthorized(_) => "E008",
            TappioError::Forbidden(_) => "E009",
            TappioError::Serialization(_) => "E010",
            TappioError::Export(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TappioError::DatabaseConfig(_) => "Database Configuration Error",
            TappioError::DatabaseConnection(_) => "Database Connection Error",
            TappioError::DatabaseOperation(_) => "Database Operation Error",
            TappioError::FileOperation(_) => "File Operation Error",
            TappioError::Validation(_) => "Validation Error",
            TappioError::NotFound(_) => "Resource Not Found",
            TappioError::AlreadyAssigned(_) => "Already Assigned",
            TappioError::Unauthorized(_) => "Unauthorized",
            TappioError::Forbidden(_) => "Forbidden",
            TappioError::Serialization(_) => "Serialization Error",
            TappioError::Export(_) => "Export Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TappioError::DatabaseConfig(msg)
            | TappioError::DatabaseConnection(msg)
            | TappioError::DatabaseOperation(msg)
            | TappioError::FileOperation(msg)
            | TappioError::Validation(msg)
            | TappioError::NotFound(msg)
            | TappioError::AlreadyAssigned(msg)
            | TappioError::Unauthorized(msg)
            | TappioError::Forbidden(msg)
            | TappioError::Serialization(msg)
            | TappioError::Export(msg) => msg,
        }
    }

    /// HTTP 状态码映射
    pub fn http_status(&self) -> StatusCode {
        match self {
            TappioError::Validation(_) => StatusCode::BAD_REQUEST,
            TappioError::NotFound(_) => StatusCode::NOT_FOUND,
            TappioError::AlreadyAssigned(_) => StatusCode::CONFLICT,
            TappioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TappioError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于服务端内部错误（需要隐藏细节）
    pub fn is_internal(&self) -> bool {
        self.http_status().is_server_error()
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TappioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TappioError {}

// 便捷的构造函数
impl TappioError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        TappioError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        TappioError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        TappioError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TappioError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        TappioError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        TappioError::NotFound(msg.into())
    }

    pub fn already_assigned<T: Into<String>>(msg: T) -> Self {
        TappioError::AlreadyAssigned(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        TappioError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        TappioError::Forbidden(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TappioError::Serialization(msg.into())
    }

    pub fn export<T: Into<String>>(msg: T) -> Self {
        TappioError::Export(msg.into())
    }
}

impl From<sea_orm::DbErr> for TappioError {
    fn from(err: sea_orm::DbErr) -> Self {
        TappioError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for TappioError {
    fn from(err: std::io::Error) -> Self {
        TappioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TappioError {
    fn from(err: serde_json::Error) -> Self {
        TappioError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TappioError {
    fn from(err: csv::Error) -> Self {
        TappioError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TappioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            TappioError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TappioError::already_assigned("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TappioError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert!(TappioError::database_operation("x").is_internal());
        assert!(!TappioError::forbidden("x").is_internal());
    }

    #[test]
    fn test_format_simple() {
        let err = TappioError::already_assigned("Code AB12CD is already assigned");
        assert_eq!(
            err.format_simple(),
            "Already Assigned: Code AB12CD is already assigned"
        );
        assert_eq!(err.code(), "E007");
    }
}
