//! API 请求与响应类型定义

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::services::SessionUser;
use crate::storage::{CodeFilter, CodeType, FeedbackStatus};

/// 统一响应信封
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub message: String,
}

/// 登录 / 注册成功
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthSuccessResponse {
    pub user: SessionUser,
    /// 同时写入 HttpOnly Cookie；非浏览器客户端用作 Bearer token
    pub access_token: String,
    /// 秒
    pub expires_in: u64,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClaimRequest {
    pub code: String,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ReorderButtonsRequest {
    pub button_ids: Vec<String>,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GenerateCodesRequest {
    pub count: usize,
    pub code_type: CodeType,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GenerateCodesResponse {
    pub generated: usize,
    pub codes: Vec<String>,
}

/// 库存列表查询参数
#[derive(Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct CodeListQuery {
    #[ts(optional)]
    pub code_type: Option<CodeType>,
    #[ts(optional)]
    pub available: Option<bool>,
}

impl From<CodeListQuery> for CodeFilter {
    fn from(query: CodeListQuery) -> Self {
        CodeFilter {
            code_type: query.code_type,
            available: query.available,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ExportCodesQuery {
    #[ts(optional)]
    pub code_type: Option<CodeType>,
}

#[derive(Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeedbackStatusRequest {
    pub status: FeedbackStatus,
}

/// 访客点击按钮后拿到的跳转地址
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ButtonClickResponse {
    pub href: String,
}

/// 首页信息
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HomeResponse {
    pub name: String,
    pub version: String,
    pub login_path: String,
    pub signup_path: String,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[ts(optional)]
    pub codes_count: Option<u64>,
    #[ts(optional)]
    pub error: Option<String>,
}

#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// 秒
    pub uptime: u32,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_list_query_into_filter() {
        let query: CodeListQuery =
            serde_json::from_str(r#"{"code_type":"review","available":true}"#).unwrap();
        let filter: CodeFilter = query.into();
        assert_eq!(filter.code_type, Some(CodeType::Review));
        assert_eq!(filter.available, Some(true));
    }

    #[test]
    fn export_typescript_types() {
        MessageResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export MessageResponse");
        AuthSuccessResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export AuthSuccessResponse");
        ClaimRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export ClaimRequest");
        ReorderButtonsRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export ReorderButtonsRequest");
        GenerateCodesRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export GenerateCodesRequest");
        GenerateCodesResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export GenerateCodesResponse");
        CodeListQuery::export_all(&ts_rs::Config::from_env()).expect("Failed to export CodeListQuery");
        ExportCodesQuery::export_all(&ts_rs::Config::from_env()).expect("Failed to export ExportCodesQuery");
        FeedbackStatusRequest::export_all(&ts_rs::Config::from_env()).expect("Failed to export FeedbackStatusRequest");
        ButtonClickResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export ButtonClickResponse");
        HomeResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export HomeResponse");
        HealthResponse::export_all(&ts_rs::Config::from_env()).expect("Failed to export HealthResponse");
    }
}
