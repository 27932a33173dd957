//! Typed records for every stored entity
//!
//! Rows are converted from SeaORM models at the storage boundary
//! (see `backend::converters`), so the rest of the crate never handles
//! raw `String` enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;

/// 码的类型：名片或评价牌
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CodeType {
    Profile,
    Review,
}

impl CodeType {
    /// 批量生成时的码长度
    pub fn code_length(self) -> usize {
        match self {
            CodeType::Profile => 6,
            CodeType::Review => 8,
        }
    }
}

/// 按钮动作类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ButtonAction {
    Link,
    Email,
    Call,
}

/// 反馈处理状态
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
    Default,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    New,
    InConsideration,
    InProduction,
    Done,
}

/// 用户角色
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
    Default,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Admin,
    #[default]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct NfcCode {
    pub id: String,
    pub code: String,
    pub code_type: CodeType,
    pub assigned_to: Option<String>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub url: Option<String>,
    pub redirect_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NfcCode {
    pub fn is_claimed(&self) -> bool {
        self.assigned_to.is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Profile {
    pub id: String,
    pub code_id: String,
    pub user_id: String,
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub button_color: Option<String>,
    pub button_text_color: Option<String>,
    pub logo_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    pub youtube_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 资料的部分更新
///
/// 外层 `None` 表示不修改，`Some(None)` 表示清空该字段。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub full_name: Option<Option<String>>,
    pub job_title: Option<Option<String>>,
    pub company: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub website: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub background_color: Option<Option<String>>,
    pub text_color: Option<Option<String>>,
    pub button_color: Option<Option<String>>,
    pub button_text_color: Option<Option<String>>,
    pub facebook_url: Option<Option<String>>,
    pub instagram_url: Option<Option<String>>,
    pub linkedin_url: Option<Option<String>>,
    pub twitter_url: Option<Option<String>>,
    pub youtube_url: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ProfileButton {
    pub id: String,
    pub profile_id: String,
    pub label: String,
    pub action_type: ButtonAction,
    pub action_value: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl ProfileButton {
    /// 访客点击后跳转的 href
    pub fn href(&self) -> String {
        match self.action_type {
            ButtonAction::Link => self.action_value.clone(),
            ButtonAction::Email => format!("mailto:{}", self.action_value),
            ButtonAction::Call => format!("tel:{}", self.action_value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Feedback {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub status: FeedbackStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 账号（含密码哈希，仅在存储层与认证服务之间流转）
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// 带角色的账号概要，供管理后台展示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// 码库存列表的过滤条件
#[derive(Debug, Clone, Default)]
pub struct CodeFilter {
    pub code_type: Option<CodeType>,
    /// Some(true) 只看未认领，Some(false) 只看已认领
    pub available: Option<bool>,
}
