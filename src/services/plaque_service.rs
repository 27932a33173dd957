//! Review plaque service
//!
//! 评价牌是只做跳转的码：所有者填写标题、说明与跳转地址，
//! 访客扫码后直接去往该地址。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::{Result, TappioError};
use crate::storage::{CodeType, NfcCode, SeaOrmStorage};
use crate::utils::csv_handler::scan_url;
use crate::utils::url_validator::{validate_url, validation_error_message};

/// 评价牌编辑请求，三个字段都必填
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PlaqueUpdate {
    pub title: String,
    pub description: String,
    pub redirect_url: String,
}

/// 评价牌及其访问次数
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PlaqueView {
    pub code: NfcCode,
    pub visits: u64,
    pub scan_url: String,
}

impl PlaqueUpdate {
    fn validated(&self) -> Result<(String, String, String)> {
        let title = self.title.trim();
        let description = self.description.trim();
        let redirect_url = self.redirect_url.trim();

        if title.is_empty() || description.is_empty() || redirect_url.is_empty() {
            return Err(TappioError::validation(
                "Title, description and redirect URL are all required",
            ));
        }
        validate_url(redirect_url)
            .map_err(|e| TappioError::validation(validation_error_message(&e).to_string()))?;

        Ok((
            title.to_string(),
            description.to_string(),
            redirect_url.to_string(),
        ))
    }
}

pub struct PlaqueService {
    storage: Arc<SeaOrmStorage>,
    base_url: String,
}

impl PlaqueService {
    pub fn new(storage: Arc<SeaOrmStorage>, base_url: impl Into<String>) -> Self {
        Self {
            storage,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// 取调用者拥有的评价牌
    async fn owned_plaque(&self, code: &str, user_id: &str) -> Result<NfcCode> {
        let record = self
            .storage
            .find_code(code)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Code not found: {}", code)))?;

        if !record.is_owned_by(user_id) {
            return Err(TappioError::forbidden("You do not own this code"));
        }
        if record.code_type != CodeType::Review {
            return Err(TappioError::validation(format!(
                "Code {} is not a review plaque",
                record.code
            )));
        }
        Ok(record)
    }

    async fn view(&self, code: NfcCode) -> Result<PlaqueView> {
        let visits = self.storage.count_visits(&code.id).await?;
        Ok(PlaqueView {
            scan_url: scan_url(&self.base_url, &code.code),
            code,
            visits,
        })
    }

    pub async fn get(&self, code: &str, user_id: &str) -> Result<PlaqueView> {
        let record = self.owned_plaque(code, user_id).await?;
        self.view(record).await
    }

    /// 保存评价牌并重新激活
    pub async fn update(
        &self,
        code: &str,
        user_id: &str,
        update: &PlaqueUpdate,
    ) -> Result<PlaqueView> {
        let (title, description, redirect_url) = update.validated()?;
        let record = self.owned_plaque(code, user_id).await?;

        let saved = self
            .storage
            .update_plaque(&record.id, &title, &description, &redirect_url)
            .await?;
        info!("Plaque {} now redirects to {}", saved.code, redirect_url);
        self.view(saved).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(title: &str, description: &str, url: &str) -> PlaqueUpdate {
        PlaqueUpdate {
            title: title.into(),
            description: description.into(),
            redirect_url: url.into(),
        }
    }

    #[test]
    fn test_plaque_requires_all_fields() {
        assert!(update("", "Leave a review", "https://g.page/r/x").validated().is_err());
        assert!(update("Cafe", " ", "https://g.page/r/x").validated().is_err());
        assert!(update("Cafe", "Leave a review", "").validated().is_err());
    }

    #[test]
    fn test_plaque_rejects_unsafe_urls() {
        let err = update("Cafe", "Review", "javascript:alert(1)")
            .validated()
            .unwrap_err();
        assert!(matches!(err, TappioError::Validation(_)));
        assert!(update("Cafe", "Review", "g.page/r/x").validated().is_err());
    }

    #[test]
    fn test_plaque_trims_fields() {
        let (title, description, url) = update(" Cafe ", " Review us ", " https://example.com ")
            .validated()
            .unwrap();
        assert_eq!(title, "Cafe");
        assert_eq!(description, "Review us");
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn export_typescript_types() {
        PlaqueUpdate::export_all(&ts_rs::Config::from_env()).expect("Failed to export PlaqueUpdate");
        PlaqueView::export_all(&ts_rs::Config::from_env()).expect("Failed to export PlaqueView");
    }
}
