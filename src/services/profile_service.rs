//! Profile service
//!
//! 资料的编辑、按钮管理、Logo 上传，以及访客看到的公开页与 vCard。

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::config::{StaticConfig, TS_EXPORT_PATH};
use crate::errors::{Result, TappioError};
use crate::services::resolver::profile_view_url;
use crate::storage::{ButtonAction, Profile, ProfileButton, ProfileChanges, SeaOrmStorage};
use crate::utils::colors::{self, is_hex_color};
use crate::utils::url_validator::{
    ensure_scheme, normalize_optional_url, validate_url, validation_error_message,
};
use crate::utils::vcard;

/// 允许上传的 Logo 类型及扩展名
const LOGO_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// 资料编辑请求
///
/// 字段缺省表示不修改，空字符串表示清空。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(default)]
pub struct ProfileUpdate {
    #[ts(optional)]
    pub full_name: Option<String>,
    #[ts(optional)]
    pub job_title: Option<String>,
    #[ts(optional)]
    pub company: Option<String>,
    #[ts(optional)]
    pub email: Option<String>,
    #[ts(optional)]
    pub phone: Option<String>,
    #[ts(optional)]
    pub website: Option<String>,
    #[ts(optional)]
    pub bio: Option<String>,
    #[ts(optional)]
    pub background_color: Option<String>,
    #[ts(optional)]
    pub text_color: Option<String>,
    #[ts(optional)]
    pub button_color: Option<String>,
    #[ts(optional)]
    pub button_text_color: Option<String>,
    #[ts(optional)]
    pub facebook_url: Option<String>,
    #[ts(optional)]
    pub instagram_url: Option<String>,
    #[ts(optional)]
    pub linkedin_url: Option<String>,
    #[ts(optional)]
    pub twitter_url: Option<String>,
    #[ts(optional)]
    pub youtube_url: Option<String>,
}

/// 新增按钮请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct NewButton {
    pub label: String,
    pub action_type: ButtonAction,
    pub action_value: String,
}

/// 资料所有者看到的详情
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProfileDetail {
    pub profile: Profile,
    pub buttons: Vec<ProfileButton>,
    /// 每个按钮的点击次数
    #[ts(type = "Record<string, number>")]
    pub clicks: HashMap<String, u64>,
}

/// 公开页上的按钮
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PublicButton {
    pub id: String,
    pub label: String,
    pub action_type: ButtonAction,
    pub href: String,
}

impl From<&ProfileButton> for PublicButton {
    fn from(button: &ProfileButton) -> Self {
        Self {
            id: button.id.clone(),
            label: button.label.clone(),
            action_type: button.action_type,
            href: button.href(),
        }
    }
}

/// 访客看到的公开页，颜色已填入默认值
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PublicProfile {
    pub id: String,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub logo_url: Option<String>,
    pub background_color: String,
    pub text_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub youtube_url: Option<String>,
    pub buttons: Vec<PublicButton>,
    pub vcard_path: String,
}

impl PublicProfile {
    pub fn new(profile: Profile, buttons: &[ProfileButton]) -> Self {
        Self {
            vcard_path: format!("/profile/{}/vcard", profile.id),
            background_color: colors::or_default(
                profile.background_color.as_deref(),
                colors::DEFAULT_BACKGROUND,
            ),
            text_color: colors::or_default(profile.text_color.as_deref(), colors::DEFAULT_TEXT),
            button_color: colors::or_default(
                profile.button_color.as_deref(),
                colors::DEFAULT_BUTTON,
            ),
            button_text_color: colors::or_default(
                profile.button_text_color.as_deref(),
                colors::DEFAULT_BUTTON_TEXT,
            ),
            buttons: buttons.iter().map(PublicButton::from).collect(),
            id: profile.id,
            full_name: profile.full_name,
            job_title: profile.job_title,
            company: profile.company,
            email: profile.email,
            phone: profile.phone,
            website: profile.website,
            bio: profile.bio,
            logo_url: profile.logo_url,
            facebook_url: profile.facebook_url,
            instagram_url: profile.instagram_url,
            linkedin_url: profile.linkedin_url,
            twitter_url: profile.twitter_url,
            youtube_url: profile.youtube_url,
        }
    }
}

/// 生成好的 vCard
#[derive(Debug, Clone)]
pub struct VCardFile {
    pub filename: String,
    pub body: String,
}

fn text_field(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| {
        let v = v.trim();
        (!v.is_empty()).then(|| v.to_string())
    })
}

fn url_field(name: &str, value: Option<String>) -> Result<Option<Option<String>>> {
    value
        .map(|v| {
            normalize_optional_url(Some(&v)).map_err(|e| {
                TappioError::validation(format!("{}: {}", name, validation_error_message(&e)))
            })
        })
        .transpose()
}

fn color_field(name: &str, value: Option<String>) -> Result<Option<Option<String>>> {
    match text_field(value) {
        Some(Some(color)) if !is_hex_color(&color) => Err(TappioError::validation(format!(
            "{} must be a hex color like #1A2B3C",
            name
        ))),
        other => Ok(other),
    }
}

fn email_field(value: Option<String>) -> Result<Option<Option<String>>> {
    match text_field(value) {
        Some(Some(email)) if !looks_like_email(&email) => {
            Err(TappioError::validation("email is not a valid address"))
        }
        other => Ok(other),
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

impl ProfileUpdate {
    /// 校验并转换为存储层的部分更新
    pub fn into_changes(self) -> Result<ProfileChanges> {
        Ok(ProfileChanges {
            full_name: text_field(self.full_name),
            job_title: text_field(self.job_title),
            company: text_field(self.company),
            email: email_field(self.email)?,
            phone: text_field(self.phone),
            website: url_field("website", self.website)?,
            bio: text_field(self.bio),
            background_color: color_field("background_color", self.background_color)?,
            text_color: color_field("text_color", self.text_color)?,
            button_color: color_field("button_color", self.button_color)?,
            button_text_color: color_field("button_text_color", self.button_text_color)?,
            facebook_url: url_field("facebook_url", self.facebook_url)?,
            instagram_url: url_field("instagram_url", self.instagram_url)?,
            linkedin_url: url_field("linkedin_url", self.linkedin_url)?,
            twitter_url: url_field("twitter_url", self.twitter_url)?,
            youtube_url: url_field("youtube_url", self.youtube_url)?,
        })
    }
}

impl NewButton {
    /// 校验后返回 (label, action, value)
    fn validated(self) -> Result<(String, ButtonAction, String)> {
        let label = self.label.trim().to_string();
        let value = self.action_value.trim().to_string();
        if label.is_empty() {
            return Err(TappioError::validation("Button label is required"));
        }
        if value.is_empty() {
            return Err(TappioError::validation("Button action value is required"));
        }

        let value = match self.action_type {
            ButtonAction::Link => {
                let url = ensure_scheme(&value);
                validate_url(&url).map_err(|e| {
                    TappioError::validation(validation_error_message(&e).to_string())
                })?;
                url
            }
            ButtonAction::Email if !looks_like_email(&value) => {
                return Err(TappioError::validation("Button email is not a valid address"));
            }
            _ => value,
        };

        Ok((label, self.action_type, value))
    }
}

pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
    base_url: String,
    upload_dir: PathBuf,
    upload_max_bytes: usize,
}

impl ProfileService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        base_url: impl Into<String>,
        upload_dir: impl Into<PathBuf>,
        upload_max_bytes: usize,
    ) -> Self {
        Self {
            storage,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_dir: upload_dir.into(),
            upload_max_bytes,
        }
    }

    pub fn from_config(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        Self::new(
            storage,
            config.server.base_url(),
            &config.uploads.dir,
            config.uploads.max_bytes,
        )
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    pub fn upload_max_bytes(&self) -> usize {
        self.upload_max_bytes
    }

    /// 取资料并确认调用者是所有者
    async fn owned_profile(&self, profile_id: &str, user_id: &str) -> Result<Profile> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Profile not found: {}", profile_id)))?;

        if profile.user_id != user_id {
            return Err(TappioError::forbidden("You do not own this profile"));
        }
        Ok(profile)
    }

    pub async fn detail(&self, profile_id: &str, user_id: &str) -> Result<ProfileDetail> {
        let profile = self.owned_profile(profile_id, user_id).await?;
        let buttons = self.storage.list_buttons(&profile.id).await?;
        let clicks = self.storage.click_counts(&profile.id).await?;
        Ok(ProfileDetail {
            profile,
            buttons,
            clicks,
        })
    }

    /// 保存资料编辑，并回填码的目标地址
    pub async fn update(
        &self,
        profile_id: &str,
        user_id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile> {
        let changes = update.into_changes()?;
        let current = self.owned_profile(profile_id, user_id).await?;

        let profile = self.storage.update_profile(&current.id, changes).await?;
        self.storage
            .set_code_url(
                &profile.code_id,
                &profile_view_url(&self.base_url, &profile.id),
            )
            .await?;

        info!("Profile {} updated by {}", profile.id, user_id);
        Ok(profile)
    }

    /// 保存上传的 Logo 并更新 logo_url
    pub async fn save_logo(
        &self,
        profile_id: &str,
        user_id: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<Profile> {
        let profile = self.owned_profile(profile_id, user_id).await?;

        let ext = LOGO_TYPES
            .iter()
            .find(|(mime, _)| content_type.eq_ignore_ascii_case(mime))
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                TappioError::validation(format!("Unsupported image type: {}", content_type))
            })?;

        if bytes.is_empty() {
            return Err(TappioError::validation("Uploaded file is empty"));
        }
        if bytes.len() > self.upload_max_bytes {
            return Err(TappioError::validation(format!(
                "Logo must be at most {} bytes",
                self.upload_max_bytes
            )));
        }

        let relative = format!(
            "{}/{}/{}.{}",
            profile.user_id,
            profile.id,
            uuid::Uuid::new_v4(),
            ext
        );
        let path = self.upload_dir.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored logo at {}", path.display());

        let logo_url = format!("{}/uploads/{}", self.base_url, relative);
        self.storage.set_logo_url(&profile.id, &logo_url).await
    }

    pub async fn buttons(&self, profile_id: &str, user_id: &str) -> Result<Vec<ProfileButton>> {
        let profile = self.owned_profile(profile_id, user_id).await?;
        self.storage.list_buttons(&profile.id).await
    }

    pub async fn add_button(
        &self,
        profile_id: &str,
        user_id: &str,
        button: NewButton,
    ) -> Result<ProfileButton> {
        let (label, action, value) = button.validated()?;
        let profile = self.owned_profile(profile_id, user_id).await?;
        self.storage
            .insert_button(&profile.id, &label, action, &value)
            .await
    }

    pub async fn delete_button(
        &self,
        profile_id: &str,
        user_id: &str,
        button_id: &str,
    ) -> Result<()> {
        let profile = self.owned_profile(profile_id, user_id).await?;
        self.storage.delete_button(&profile.id, button_id).await
    }

    pub async fn reorder_buttons(
        &self,
        profile_id: &str,
        user_id: &str,
        button_ids: &[String],
    ) -> Result<Vec<ProfileButton>> {
        let profile = self.owned_profile(profile_id, user_id).await?;
        self.storage.reorder_buttons(&profile.id, button_ids).await?;
        self.storage.list_buttons(&profile.id).await
    }

    /// 访客打开公开页；访问记录失败不影响展示
    pub async fn public_view(&self, profile_id: &str) -> Result<PublicProfile> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Profile not found: {}", profile_id)))?;
        let buttons = self.storage.list_buttons(&profile.id).await?;

        if let Err(e) = self.storage.record_visit(&profile.id).await {
            warn!("Failed to record visit for profile {}: {}", profile.id, e);
        }

        Ok(PublicProfile::new(profile, &buttons))
    }

    /// 访客点击按钮，返回要打开的 href
    pub async fn click(&self, profile_id: &str, button_id: &str) -> Result<String> {
        let button = self
            .storage
            .get_button(profile_id, button_id)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Button not found: {}", button_id)))?;

        self.storage.record_click(&button.id, profile_id).await?;
        Ok(button.href())
    }

    pub async fn vcard(&self, profile_id: &str) -> Result<VCardFile> {
        let profile = self
            .storage
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("Profile not found: {}", profile_id)))?;

        Ok(VCardFile {
            filename: vcard::vcard_filename(&profile),
            body: vcard::render_vcard(&profile),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_normalizes_urls_and_clears_empty() {
        let update = ProfileUpdate {
            full_name: Some("  Ada Lovelace ".into()),
            bio: Some("".into()),
            website: Some("ada.dev".into()),
            linkedin_url: Some("https://linkedin.com/in/ada".into()),
            twitter_url: Some("  ".into()),
            ..Default::default()
        };
        let changes = update.into_changes().unwrap();

        assert_eq!(changes.full_name, Some(Some("Ada Lovelace".into())));
        assert_eq!(changes.bio, Some(None));
        assert_eq!(changes.website, Some(Some("https://ada.dev".into())));
        assert_eq!(
            changes.linkedin_url,
            Some(Some("https://linkedin.com/in/ada".into()))
        );
        assert_eq!(changes.twitter_url, Some(None));
        assert_eq!(changes.company, None);
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let bad_color = ProfileUpdate {
            text_color: Some("red".into()),
            ..Default::default()
        };
        assert!(matches!(
            bad_color.into_changes(),
            Err(TappioError::Validation(_))
        ));

        let bad_url = ProfileUpdate {
            facebook_url: Some("javascript:alert(1)".into()),
            ..Default::default()
        };
        assert!(bad_url.into_changes().is_err());

        let bad_email = ProfileUpdate {
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(bad_email.into_changes().is_err());
    }

    #[test]
    fn test_new_button_validation() {
        let button = NewButton {
            label: "Website".into(),
            action_type: ButtonAction::Link,
            action_value: "example.com".into(),
        };
        let (_, _, value) = button.validated().unwrap();
        assert_eq!(value, "https://example.com");

        let missing_label = NewButton {
            label: " ".into(),
            action_type: ButtonAction::Call,
            action_value: "+3161234".into(),
        };
        assert!(missing_label.validated().is_err());

        let bad_email = NewButton {
            label: "Mail".into(),
            action_type: ButtonAction::Email,
            action_value: "nobody".into(),
        };
        assert!(bad_email.validated().is_err());
    }

    #[test]
    fn test_public_profile_applies_color_defaults() {
        let profile = Profile {
            id: "p1".into(),
            button_color: Some("#123456".into()),
            ..Default::default()
        };
        let view = PublicProfile::new(profile, &[]);
        assert_eq!(view.background_color, colors::DEFAULT_BACKGROUND);
        assert_eq!(view.text_color, colors::DEFAULT_TEXT);
        assert_eq!(view.button_color, "#123456");
        assert_eq!(view.button_text_color, colors::DEFAULT_BUTTON_TEXT);
        assert_eq!(view.vcard_path, "/profile/p1/vcard");
    }

    #[test]
    fn export_typescript_types() {
        ProfileUpdate::export_all(&ts_rs::Config::from_env()).expect("Failed to export ProfileUpdate");
        NewButton::export_all(&ts_rs::Config::from_env()).expect("Failed to export NewButton");
        ProfileDetail::export_all(&ts_rs::Config::from_env()).expect("Failed to export ProfileDetail");
        PublicButton::export_all(&ts_rs::Config::from_env()).expect("Failed to export PublicButton");
        PublicProfile::export_all(&ts_rs::Config::from_env()).expect("Failed to export PublicProfile");
    }
}
