use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};

use super::SeaOrmStorage;
use super::converters::model_to_feedback;
use crate::errors::{Result, TappioError};
use crate::storage::models::{Feedback, FeedbackStatus};

use migration::entities::feedback;

impl SeaOrmStorage {
    pub async fn insert_feedback(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
    ) -> Result<Feedback> {
        let now = Utc::now();
        let model = feedback::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            status: Set(FeedbackStatus::New.as_ref().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| TappioError::database_operation(format!("保存反馈失败: {}", e)))?;

        model_to_feedback(model)
    }

    /// 反馈列表，最新的在前；`user_id` 为空时返回全部
    pub async fn list_feedback(&self, user_id: Option<&str>) -> Result<Vec<Feedback>> {
        let mut query = feedback::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(feedback::Column::UserId.eq(user_id));
        }

        query
            .order_by_desc(feedback::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_feedback)
            .collect()
    }

    pub async fn update_feedback_status(
        &self,
        id: &str,
        status: FeedbackStatus,
    ) -> Result<Feedback> {
        let model = feedback::ActiveModel {
            id: Set(id.to_string()),
            status: Set(status.as_ref().to_string()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => {
                TappioError::not_found(format!("反馈不存在: {}", id))
            }
            other => TappioError::database_operation(format!("更新反馈失败: {}", other)),
        })?;

        model_to_feedback(model)
    }
}
