use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

use super::SeaOrmStorage;
use super::converters::{apply_profile_changes, model_to_profile, touched_profile};
use crate::errors::{Result, TappioError};
use crate::storage::models::{Profile, ProfileChanges};

use migration::entities::nfc_profile;

impl SeaOrmStorage {
    pub async fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        Ok(nfc_profile::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(model_to_profile))
    }

    /// 码下的全部资料，最早创建的在前
    pub async fn profiles_for_code(&self, code_id: &str) -> Result<Vec<Profile>> {
        Ok(nfc_profile::Entity::find()
            .filter(nfc_profile::Column::CodeId.eq(code_id))
            .order_by_asc(nfc_profile::Column::CreatedAt)
            .order_by_asc(nfc_profile::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_profile)
            .collect())
    }

    pub async fn profiles_owned_by(&self, user_id: &str) -> Result<Vec<Profile>> {
        Ok(nfc_profile::Entity::find()
            .filter(nfc_profile::Column::UserId.eq(user_id))
            .order_by_desc(nfc_profile::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_profile)
            .collect())
    }

    /// 部分更新资料，返回更新后的记录
    pub async fn update_profile(&self, id: &str, changes: ProfileChanges) -> Result<Profile> {
        let mut active = touched_profile(id, Utc::now());
        apply_profile_changes(changes, &mut active);

        let model = active.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                TappioError::not_found(format!("资料不存在: {}", id))
            }
            other => TappioError::database_operation(format!("更新资料失败: {}", other)),
        })?;

        Ok(model_to_profile(model))
    }

    pub async fn set_logo_url(&self, id: &str, logo_url: &str) -> Result<Profile> {
        let model = nfc_profile::ActiveModel {
            id: Set(id.to_string()),
            logo_url: Set(Some(logo_url.to_string())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| TappioError::database_operation(format!("保存 Logo 失败: {}", e)))?;

        Ok(model_to_profile(model))
    }
}
