//! 扫码跳转决策
//!
//! `resolve` 只依赖注入的 [`CodeLookup`]，本身不做任何 I/O，
//! 可以在没有数据库的情况下单元测试。HTTP 层负责把 [`Navigation`]
//! 渲染成 307/302 响应。

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::errors::Result;
use crate::storage::{CodeType, NfcCode, SeaOrmStorage};

/// 跳转目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Navigation {
    /// 整页跳转到外部地址
    External(String),
    /// 站内路由
    Internal(String),
}

impl Navigation {
    pub fn activate(code: &str) -> Self {
        Navigation::Internal(activate_path(code))
    }

    pub fn home() -> Self {
        Navigation::Internal("/".to_string())
    }

    pub fn location(&self) -> &str {
        match self {
            Navigation::External(url) | Navigation::Internal(url) => url,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Navigation::External(_))
    }
}

/// 激活页路径，码原样放入路径段（做百分号编码）
pub fn activate_path(code: &str) -> String {
    format!("/activate/{}", urlencoding::encode(code))
}

pub fn profile_view_path(profile_id: &str) -> String {
    format!("/profile/{}/view", profile_id)
}

/// 资料公开页的完整地址；未配置对外地址时退化为站内路径
pub fn profile_view_url(base_url: &str, profile_id: &str) -> String {
    format!(
        "{}{}",
        base_url.trim_end_matches('/'),
        profile_view_path(profile_id)
    )
}

/// 决策所需的两次查询
#[async_trait]
pub trait CodeLookup: Send + Sync {
    async fn find_code(&self, code: &str) -> Result<Option<NfcCode>>;

    /// 码下关联的资料 id，按创建时间升序
    async fn profile_ids_for_code(&self, code_id: &str) -> Result<Vec<String>>;
}

#[async_trait]
impl CodeLookup for SeaOrmStorage {
    async fn find_code(&self, code: &str) -> Result<Option<NfcCode>> {
        SeaOrmStorage::find_code(self, code).await
    }

    async fn profile_ids_for_code(&self, code_id: &str) -> Result<Vec<String>> {
        Ok(self
            .profiles_for_code(code_id)
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_profile_id(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// 把已存储的目标地址转换成跳转；无法识别时返回 None
fn classify_target(target: &str) -> Option<Navigation> {
    let lower = target.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(Navigation::External(target.to_string()));
    }
    // `//host` 是协议相对地址，不当作站内路径
    if target.starts_with('/') && !target.starts_with("//") {
        return Some(Navigation::Internal(target.to_string()));
    }
    if is_profile_id(target) {
        return Some(Navigation::Internal(profile_view_path(target)));
    }
    None
}

/// 一次解析的完整结果
#[derive(Debug, Clone)]
pub struct Resolution {
    pub navigation: Navigation,
    /// 查到的码记录（查询失败或不存在时为空）
    pub record: Option<NfcCode>,
}

/// 根据码决定访客去向
///
/// 任何查询错误都回到首页；缺字段时回到激活页。
pub async fn resolve<L>(code: &str, lookup: &L) -> Navigation
where
    L: CodeLookup + ?Sized,
{
    resolve_with_record(code, lookup).await.navigation
}

/// 与 [`resolve`] 相同，同时带回码记录供调用方记录访问
pub async fn resolve_with_record<L>(code: &str, lookup: &L) -> Resolution
where
    L: CodeLookup + ?Sized,
{
    let record = match lookup.find_code(code).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("Code {:?} not found, sending to activation", code);
            return Resolution {
                navigation: Navigation::activate(code),
                record: None,
            };
        }
        Err(e) => {
            error!("Code lookup failed for {:?}: {}", code, e);
            return Resolution {
                navigation: Navigation::home(),
                record: None,
            };
        }
    };

    let navigation = decide(code, &record, lookup).await;
    Resolution {
        navigation,
        record: Some(record),
    }
}

async fn decide<L>(code: &str, record: &NfcCode, lookup: &L) -> Navigation
where
    L: CodeLookup + ?Sized,
{
    if !record.is_claimed() || !record.is_active {
        debug!(
            "Code {} unclaimed or inactive (claimed={}, active={})",
            record.code,
            record.is_claimed(),
            record.is_active
        );
        return Navigation::activate(code);
    }

    match record.code_type {
        CodeType::Review => match non_empty(&record.redirect_url) {
            Some(url) => {
                debug!("Review code {} redirects to {}", record.code, url);
                Navigation::External(url.to_string())
            }
            None => {
                debug!("Review code {} has no redirect URL", record.code);
                Navigation::activate(code)
            }
        },
        CodeType::Profile => {
            if let Some(nav) = non_empty(&record.url).and_then(classify_target) {
                debug!("Profile code {} resolved to {}", record.code, nav.location());
                return nav;
            }

            match lookup.profile_ids_for_code(&record.id).await {
                Ok(ids) => match ids.first() {
                    Some(first) => {
                        if ids.len() > 1 {
                            warn!(
                                "Code {} has {} profiles, using the oldest ({})",
                                record.code,
                                ids.len(),
                                first
                            );
                        }
                        Navigation::Internal(profile_view_path(first))
                    }
                    None => {
                        debug!("Profile code {} has no profile yet", record.code);
                        Navigation::activate(code)
                    }
                },
                Err(e) => {
                    error!("Profile lookup failed for code {}: {}", record.code, e);
                    Navigation::home()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::TappioError;
    use chrono::Utc;

    #[derive(Default)]
    struct FakeLookup {
        code: Option<NfcCode>,
        profiles: Vec<String>,
        fail_code: bool,
        fail_profiles: bool,
    }

    #[async_trait]
    impl CodeLookup for FakeLookup {
        async fn find_code(&self, code: &str) -> Result<Option<NfcCode>> {
            if self.fail_code {
                return Err(TappioError::database_connection("down"));
            }
            Ok(self.code.clone().filter(|c| c.code == code))
        }

        async fn profile_ids_for_code(&self, _code_id: &str) -> Result<Vec<String>> {
            if self.fail_profiles {
                return Err(TappioError::database_operation("boom"));
            }
            Ok(self.profiles.clone())
        }
    }

    fn code(code: &str, code_type: CodeType) -> NfcCode {
        NfcCode {
            id: format!("id-{}", code),
            code: code.to_string(),
            code_type,
            assigned_to: None,
            assigned_at: None,
            is_active: true,
            url: None,
            redirect_url: None,
            title: None,
            description: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    fn claimed(mut c: NfcCode) -> NfcCode {
        c.assigned_to = Some("user-1".into());
        c.assigned_at = Some(Utc::now());
        c
    }

    fn lookup_with(c: NfcCode) -> FakeLookup {
        FakeLookup {
            code: Some(c),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_code_goes_to_activation() {
        let nav = resolve("ZZ99ZZ", &FakeLookup::default()).await;
        assert_eq!(nav, Navigation::Internal("/activate/ZZ99ZZ".into()));
    }

    #[tokio::test]
    async fn test_unclaimed_code_goes_to_activation() {
        let lookup = lookup_with(code("AB12CD", CodeType::Profile));
        let nav = resolve("AB12CD", &lookup).await;
        assert_eq!(nav.location(), "/activate/AB12CD");
        assert!(!nav.is_external());
    }

    #[tokio::test]
    async fn test_inactive_code_goes_to_activation() {
        let mut c = claimed(code("REV12345", CodeType::Review));
        c.redirect_url = Some("https://example.com".into());
        c.is_active = false;
        let nav = resolve("REV12345", &lookup_with(c)).await;
        assert_eq!(nav, Navigation::activate("REV12345"));
    }

    #[tokio::test]
    async fn test_review_code_redirects_externally() {
        let mut c = claimed(code("REV12345", CodeType::Review));
        c.redirect_url = Some("https://example.com".into());
        let nav = resolve("REV12345", &lookup_with(c)).await;
        assert_eq!(nav, Navigation::External("https://example.com".into()));
    }

    #[tokio::test]
    async fn test_review_code_without_redirect_goes_to_activation() {
        let mut c = claimed(code("REV12345", CodeType::Review));
        c.redirect_url = Some("   ".into());
        let nav = resolve("REV12345", &lookup_with(c)).await;
        assert_eq!(nav, Navigation::activate("REV12345"));
    }

    #[tokio::test]
    async fn test_profile_code_with_bare_id_target() {
        let mut c = claimed(code("AB12CD", CodeType::Profile));
        c.url = Some("00000000-0000-0000-0000-000000000000".into());
        let nav = resolve("AB12CD", &lookup_with(c)).await;
        assert_eq!(
            nav,
            Navigation::Internal("/profile/00000000-0000-0000-0000-000000000000/view".into())
        );
    }

    #[tokio::test]
    async fn test_profile_code_with_absolute_and_path_targets() {
        let mut c = claimed(code("AB12CD", CodeType::Profile));
        c.url = Some("https://tap.example.com/profile/p1/view".into());
        let nav = resolve("AB12CD", &lookup_with(c.clone())).await;
        assert!(nav.is_external());

        c.url = Some("/profile/p1/view".into());
        let nav = resolve("AB12CD", &lookup_with(c)).await;
        assert_eq!(nav, Navigation::Internal("/profile/p1/view".into()));
    }

    #[tokio::test]
    async fn test_unusable_target_falls_back_to_profile_lookup() {
        let mut c = claimed(code("AB12CD", CodeType::Profile));
        c.url = Some("//evil.example.com".into());
        let lookup = FakeLookup {
            code: Some(c),
            profiles: vec!["p-old".into(), "p-new".into()],
            ..Default::default()
        };
        let nav = resolve("AB12CD", &lookup).await;
        assert_eq!(nav, Navigation::Internal("/profile/p-old/view".into()));
    }

    #[tokio::test]
    async fn test_profile_code_without_target_or_profile() {
        let c = claimed(code("AB12CD", CodeType::Profile));
        let nav = resolve("AB12CD", &lookup_with(c)).await;
        assert_eq!(nav, Navigation::activate("AB12CD"));
    }

    #[tokio::test]
    async fn test_backend_errors_go_home() {
        let lookup = FakeLookup {
            fail_code: true,
            ..Default::default()
        };
        assert_eq!(resolve("AB12CD", &lookup).await, Navigation::home());

        let lookup = FakeLookup {
            code: Some(claimed(code("AB12CD", CodeType::Profile))),
            fail_profiles: true,
            ..Default::default()
        };
        assert_eq!(resolve("AB12CD", &lookup).await, Navigation::home());
    }

    #[tokio::test]
    async fn test_raw_code_is_encoded_in_activation_path() {
        let nav = resolve("a b/c", &FakeLookup::default()).await;
        assert_eq!(nav.location(), "/activate/a%20b%2Fc");
    }

    #[tokio::test]
    async fn test_resolution_carries_record() {
        let mut c = claimed(code("REV12345", CodeType::Review));
        c.redirect_url = Some("https://example.com".into());
        let resolution = resolve_with_record("REV12345", &lookup_with(c)).await;
        assert!(resolution.navigation.is_external());
        assert_eq!(resolution.record.map(|r| r.id), Some("id-REV12345".into()));

        let resolution = resolve_with_record("NOPE", &FakeLookup::default()).await;
        assert!(resolution.record.is_none());
    }

    #[test]
    fn test_profile_view_url() {
        assert_eq!(profile_view_url("", "p1"), "/profile/p1/view");
        assert_eq!(
            profile_view_url("https://tap.example.com/", "p1"),
            "https://tap.example.com/profile/p1/view"
        );
    }
}
