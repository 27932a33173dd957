use std::str::FromStr;

use sea_orm::ActiveValue::Set;

use crate::errors::{Result, TappioError};
use crate::storage::models::{
    ButtonAction, CodeType, Feedback, FeedbackStatus, NfcCode, Profile, ProfileButton,
    ProfileChanges, UserAccount,
};
use migration::entities::{feedback, nfc_code, nfc_profile, profile_button, user_account};

fn parse_column<T: FromStr>(table: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        TappioError::database_operation(format!("{} 中存在无法识别的值: {}", table, value))
    })
}

pub fn model_to_code(model: nfc_code::Model) -> Result<NfcCode> {
    Ok(NfcCode {
        code_type: parse_column::<CodeType>("nfc_codes.code_type", &model.code_type)?,
        id: model.id,
        code: model.code,
        assigned_to: model.assigned_to,
        assigned_at: model.assigned_at,
        is_active: model.is_active,
        url: model.url,
        redirect_url: model.redirect_url,
        title: model.title,
        description: model.description,
        created_by: model.created_by,
        created_at: model.created_at,
    })
}

pub fn model_to_profile(model: nfc_profile::Model) -> Profile {
    Profile {
        id: model.id,
        code_id: model.code_id,
        user_id: model.user_id,
        full_name: model.full_name,
        job_title: model.job_title,
        company: model.company,
        email: model.email,
        phone: model.phone,
        website: model.website,
        bio: model.bio,
        background_color: model.background_color,
        text_color: model.text_color,
        button_color: model.button_color,
        button_text_color: model.button_text_color,
        logo_url: model.logo_url,
        facebook_url: model.facebook_url,
        instagram_url: model.instagram_url,
        linkedin_url: model.linkedin_url,
        twitter_url: model.twitter_url,
        youtube_url: model.youtube_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 把部分更新写入 ActiveModel，未出现的字段保持 NotSet
pub fn apply_profile_changes(changes: ProfileChanges, active: &mut nfc_profile::ActiveModel) {
    macro_rules! apply {
        ($($field:ident),+ $(,)?) => {
            $(
                if let Some(value) = changes.$field {
                    active.$field = Set(value);
                }
            )+
        };
    }

    apply!(
        full_name,
        job_title,
        company,
        email,
        phone,
        website,
        bio,
        background_color,
        text_color,
        button_color,
        button_text_color,
        facebook_url,
        instagram_url,
        linkedin_url,
        twitter_url,
        youtube_url,
    );
}

/// 认领时创建的空白资料
pub fn new_profile_active_model(
    id: &str,
    code_id: &str,
    user_id: &str,
    now: chrono::DateTime<chrono::Utc>,
) -> nfc_profile::ActiveModel {
    nfc_profile::ActiveModel {
        id: Set(id.to_string()),
        code_id: Set(code_id.to_string()),
        user_id: Set(user_id.to_string()),
        full_name: Set(None),
        job_title: Set(None),
        company: Set(None),
        email: Set(None),
        phone: Set(None),
        website: Set(None),
        bio: Set(None),
        background_color: Set(None),
        text_color: Set(None),
        button_color: Set(None),
        button_text_color: Set(None),
        logo_url: Set(None),
        facebook_url: Set(None),
        instagram_url: Set(None),
        linkedin_url: Set(None),
        twitter_url: Set(None),
        youtube_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn model_to_button(model: profile_button::Model) -> Result<ProfileButton> {
    Ok(ProfileButton {
        action_type: parse_column::<ButtonAction>(
            "profile_buttons.action_type",
            &model.action_type,
        )?,
        id: model.id,
        profile_id: model.profile_id,
        label: model.label,
        action_value: model.action_value,
        sort_order: model.sort_order,
        created_at: model.created_at,
    })
}

pub fn model_to_feedback(model: feedback::Model) -> Result<Feedback> {
    Ok(Feedback {
        status: parse_column::<FeedbackStatus>("feedback.status", &model.status)?,
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_account(model: user_account::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        email: model.email,
        password_hash: model.password_hash,
        created_at: model.created_at,
    }
}

/// 生成新码的 ActiveModel
pub fn new_code_active_model(
    code: &str,
    code_type: CodeType,
    created_by: Option<&str>,
    now: chrono::DateTime<chrono::Utc>,
) -> nfc_code::ActiveModel {
    nfc_code::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        code: Set(code.to_string()),
        code_type: Set(code_type.as_ref().to_string()),
        assigned_to: Set(None),
        assigned_at: Set(None),
        is_active: Set(true),
        url: Set(None),
        redirect_url: Set(None),
        title: Set(None),
        description: Set(None),
        created_by: Set(created_by.map(str::to_string)),
        created_at: Set(now),
    }
}

/// 只更新 updated_at 的资料 ActiveModel
pub fn touched_profile(id: &str, now: chrono::DateTime<chrono::Utc>) -> nfc_profile::ActiveModel {
    nfc_profile::ActiveModel {
        id: Set(id.to_string()),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn code_model(code_type: &str) -> nfc_code::Model {
        nfc_code::Model {
            id: "c1".to_string(),
            code: "AB12CD".to_string(),
            code_type: code_type.to_string(),
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

    #[test]
    fn test_model_to_code_parses_type() {
        let code = model_to_code(code_model("review")).unwrap();
        assert_eq!(code.code_type, CodeType::Review);
        assert_eq!(code.code, "AB12CD");
        assert!(!code.is_claimed());
    }

    #[test]
    fn test_model_to_code_rejects_unknown_type() {
        let err = model_to_code(code_model("sticker")).unwrap_err();
        assert!(matches!(err, TappioError::DatabaseOperation(_)));
    }

    #[test]
    fn test_apply_profile_changes_only_touches_present_fields() {
        let mut active = touched_profile("p1", Utc::now());
        let changes = ProfileChanges {
            full_name: Some(Some("Ada".to_string())),
            bio: Some(None),
            ..Default::default()
        };

        apply_profile_changes(changes, &mut active);

        assert_eq!(active.full_name, ActiveValue::Set(Some("Ada".to_string())));
        assert_eq!(active.bio, ActiveValue::Set(None));
        assert!(matches!(active.company, ActiveValue::NotSet));
        assert!(matches!(active.logo_url, ActiveValue::NotSet));
    }

    #[test]
    fn test_new_code_active_model_is_unclaimed() {
        let active = new_code_active_model("REV12345", CodeType::Review, Some("admin"), Utc::now());
        assert_eq!(active.code_type, ActiveValue::Set("review".to_string()));
        assert_eq!(active.assigned_to, ActiveValue::Set(None));
        assert_eq!(active.is_active, ActiveValue::Set(true));
        assert_eq!(active.created_by, ActiveValue::Set(Some("admin".to_string())));
    }
}
