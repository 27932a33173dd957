use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::Expr,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::model_to_button;
use crate::errors::{Result, TappioError};
use crate::storage::models::{ButtonAction, ProfileButton};

use migration::entities::profile_button;

impl SeaOrmStorage {
    /// 资料的按钮，按 sort_order 排序
    pub async fn list_buttons(&self, profile_id: &str) -> Result<Vec<ProfileButton>> {
        profile_button::Entity::find()
            .filter(profile_button::Column::ProfileId.eq(profile_id))
            .order_by_asc(profile_button::Column::SortOrder)
            .order_by_asc(profile_button::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_button)
            .collect()
    }

    pub async fn get_button(
        &self,
        profile_id: &str,
        button_id: &str,
    ) -> Result<Option<ProfileButton>> {
        profile_button::Entity::find_by_id(button_id.to_string())
            .filter(profile_button::Column::ProfileId.eq(profile_id))
            .one(&self.db)
            .await?
            .map(model_to_button)
            .transpose()
    }

    /// 追加按钮，排在现有按钮之后（最大 sort_order + 1）
    pub async fn insert_button(
        &self,
        profile_id: &str,
        label: &str,
        action_type: ButtonAction,
        action_value: &str,
    ) -> Result<ProfileButton> {
        // 删除按钮不会压缩序号，不能用按钮数
        let next_order = profile_button::Entity::find()
            .filter(profile_button::Column::ProfileId.eq(profile_id))
            .order_by_desc(profile_button::Column::SortOrder)
            .one(&self.db)
            .await?
            .map_or(0, |last| last.sort_order + 1);

        let model = profile_button::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            profile_id: Set(profile_id.to_string()),
            label: Set(label.to_string()),
            action_type: Set(action_type.as_ref().to_string()),
            action_value: Set(action_value.to_string()),
            sort_order: Set(next_order),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| TappioError::database_operation(format!("添加按钮失败: {}", e)))?;

        model_to_button(model)
    }

    pub async fn delete_button(&self, profile_id: &str, button_id: &str) -> Result<()> {
        let result = profile_button::Entity::delete_many()
            .filter(profile_button::Column::Id.eq(button_id))
            .filter(profile_button::Column::ProfileId.eq(profile_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TappioError::not_found(format!("按钮不存在: {}", button_id)));
        }
        debug!("Button {} removed from profile {}", button_id, profile_id);
        Ok(())
    }

    /// 按给定顺序重排按钮（使用事务）
    ///
    /// `ordered_ids` 必须恰好是该资料全部按钮的一个排列。
    pub async fn reorder_buttons(&self, profile_id: &str, ordered_ids: &[String]) -> Result<()> {
        let txn = self.db.begin().await.map_err(|e| {
            TappioError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let current: HashSet<String> = profile_button::Entity::find()
            .filter(profile_button::Column::ProfileId.eq(profile_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        let requested: HashSet<&String> = ordered_ids.iter().collect();

        if requested.len() != ordered_ids.len()
            || current.len() != ordered_ids.len()
            || !ordered_ids.iter().all(|id| current.contains(id))
        {
            return Err(TappioError::validation(
                "button_ids must list every button of the profile exactly once",
            ));
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            profile_button::Entity::update_many()
                .col_expr(profile_button::Column::SortOrder, Expr::value(index as i32))
                .filter(profile_button::Column::Id.eq(id.as_str()))
                .filter(profile_button::Column::ProfileId.eq(profile_id))
                .exec(&txn)
                .await
                .map_err(|e| TappioError::database_operation(format!("排序失败: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| TappioError::database_operation(format!("提交事务失败: {}", e)))?;
        Ok(())
    }
}
