//! Code inventory service
//!
//! 扫码解析、认领、激活页信息，以及管理员的批量生成与导出。
//! HTTP 处理器与 CLI 共用这里的业务逻辑。

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::{Result, TappioError};
use crate::services::resolver::{self, Navigation};
use crate::storage::{ClaimRecord, CodeFilter, CodeType, NfcCode, SeaOrmStorage};
use crate::utils::csv_handler::{codes_to_csv_bytes, scan_url};
use crate::utils::{generate_random_code, normalize_code, qr};

/// 单次批量生成的上限
pub const MAX_GENERATE_COUNT: usize = 500;

/// 管理后台“最近认领”的条数
pub const RECENT_CLAIMED_LIMIT: u64 = 5;

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const SIGNUP_PATH: &str = "/api/v1/auth/signup";

/// 生成时碰撞重试的轮数
const GENERATE_ROUNDS: usize = 10;

/// 激活页根据码长度推断的实物类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Card,
    Plaque,
    Unknown,
}

impl ActivationKind {
    pub fn from_code(code: &str) -> Self {
        match code.chars().count() {
            6 => ActivationKind::Card,
            8 => ActivationKind::Plaque,
            _ => ActivationKind::Unknown,
        }
    }
}

/// 激活页数据
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ActivationInfo {
    pub code: String,
    /// 码是否存在于库存中
    pub exists: bool,
    /// 是否已被认领
    pub claimed: bool,
    pub kind: ActivationKind,
    pub login_path: String,
    pub signup_path: String,
}

/// 认领结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ClaimResult {
    pub code: NfcCode,
    /// 名片类型认领时创建的资料
    pub profile_id: Option<String>,
}

impl From<ClaimRecord> for ClaimResult {
    fn from(record: ClaimRecord) -> Self {
        Self {
            code: record.code,
            profile_id: record.profile_id,
        }
    }
}

pub struct CodeService {
    storage: Arc<SeaOrmStorage>,
    base_url: String,
}

impl CodeService {
    pub fn new(storage: Arc<SeaOrmStorage>, base_url: impl Into<String>) -> Self {
        Self {
            storage,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 解析扫码并记录评价牌访问
    ///
    /// 访问记录失败只记日志，不影响跳转。
    pub async fn scan(&self, code: &str) -> Navigation {
        let resolution = resolver::resolve_with_record(code, self.storage.as_ref()).await;

        if let Some(record) = &resolution.record
            && record.code_type == CodeType::Review
            && resolution.navigation.is_external()
            && let Err(e) = self.storage.record_visit(&record.id).await
        {
            warn!("Failed to record plaque visit for {}: {}", record.code, e);
        }

        resolution.navigation
    }

    /// 激活页信息
    pub async fn activation_info(&self, code: &str) -> Result<ActivationInfo> {
        let record = self.storage.find_code(code).await?;

        Ok(ActivationInfo {
            code: code.to_string(),
            exists: record.is_some(),
            claimed: record.as_ref().is_some_and(NfcCode::is_claimed),
            kind: ActivationKind::from_code(code),
            login_path: LOGIN_PATH.to_string(),
            signup_path: SIGNUP_PATH.to_string(),
        })
    }

    /// 认领一个码
    pub async fn claim(&self, raw_code: &str, user_id: &str) -> Result<ClaimResult> {
        let code = normalize_code(raw_code);
        if code.is_empty() {
            return Err(TappioError::validation("Code is required"));
        }

        let record = self
            .storage
            .find_code(&code)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Code not found: {}", code)))?;

        if record.is_claimed() {
            return Err(TappioError::already_assigned(format!(
                "Code {} is already assigned",
                code
            )));
        }

        let base_url = self.base_url.clone();
        let claimed = self
            .storage
            .claim_code(&record.id, user_id, move |profile_id| {
                resolver::profile_view_url(&base_url, profile_id)
            })
            .await?;

        match claimed {
            Some(record) => Ok(record.into()),
            None => Err(TappioError::already_assigned(format!(
                "Code {} is already assigned",
                code
            ))),
        }
    }

    /// 批量生成新码，保证与库存不重复
    pub async fn generate(
        &self,
        count: usize,
        code_type: CodeType,
        created_by: Option<&str>,
    ) -> Result<Vec<NfcCode>> {
        if count == 0 || count > MAX_GENERATE_COUNT {
            return Err(TappioError::validation(format!(
                "Count must be between 1 and {}",
                MAX_GENERATE_COUNT
            )));
        }

        let length = code_type.code_length();
        let mut accepted: HashSet<String> = HashSet::with_capacity(count);

        for _ in 0..GENERATE_ROUNDS {
            let mut candidates: HashSet<String> = HashSet::new();
            while accepted.len() + candidates.len() < count {
                let candidate = generate_random_code(length);
                if !accepted.contains(&candidate) {
                    candidates.insert(candidate);
                }
            }

            let candidates: Vec<String> = candidates.into_iter().collect();
            let taken = self.storage.existing_codes(&candidates).await?;
            accepted.extend(candidates.into_iter().filter(|c| !taken.contains(c)));

            if accepted.len() == count {
                break;
            }
        }

        if accepted.len() < count {
            return Err(TappioError::database_operation(
                "Could not generate enough unique codes",
            ));
        }

        let mut codes: Vec<String> = accepted.into_iter().collect();
        codes.sort();
        let inserted = self
            .storage
            .insert_codes(&codes, code_type, created_by)
            .await?;

        info!(
            "Generated {} {} codes (created_by={:?})",
            inserted.len(),
            code_type,
            created_by
        );
        Ok(inserted)
    }

    pub async fn list(&self, filter: &CodeFilter) -> Result<Vec<NfcCode>> {
        self.storage.list_codes(filter).await
    }

    pub async fn recent_claimed(&self) -> Result<Vec<NfcCode>> {
        self.storage.recent_claimed(RECENT_CLAIMED_LIMIT).await
    }

    /// 未认领的码，供打印与导出
    pub async fn unclaimed(&self, code_type: Option<CodeType>) -> Result<Vec<NfcCode>> {
        self.storage
            .list_codes(&CodeFilter {
                code_type,
                available: Some(true),
            })
            .await
    }

    /// 未认领码的 CSV
    pub async fn export_csv(&self, code_type: Option<CodeType>) -> Result<Vec<u8>> {
        let codes = self.unclaimed(code_type).await?;
        info!("Exporting {} unclaimed codes", codes.len());
        codes_to_csv_bytes(&codes, &self.base_url)
    }

    pub fn scan_url(&self, code: &str) -> String {
        scan_url(&self.base_url, code)
    }

    /// 码的扫码地址二维码
    pub async fn qr_svg(&self, code: &str) -> Result<String> {
        let record = self
            .storage
            .find_code(code)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Code not found: {}", code)))?;
        qr::render_svg(&self.scan_url(&record.code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_kind_from_length() {
        assert_eq!(ActivationKind::from_code("AB12CD"), ActivationKind::Card);
        assert_eq!(ActivationKind::from_code("REV12345"), ActivationKind::Plaque);
        assert_eq!(ActivationKind::from_code("X"), ActivationKind::Unknown);
    }

    #[test]
    fn export_typescript_types() {
        ActivationKind::export_all(&ts_rs::Config::from_env()).expect("Failed to export ActivationKind");
        ActivationInfo::export_all(&ts_rs::Config::from_env()).expect("Failed to export ActivationInfo");
        ClaimResult::export_all(&ts_rs::Config::from_env()).expect("Failed to export ClaimResult");
    }
}
