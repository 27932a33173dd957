//! Visit and click records

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QuerySelect,
};

use super::SeaOrmStorage;
use crate::errors::Result;

use migration::entities::{button_click, profile_visit};

/// 分组计数结果行
#[derive(Debug, FromQueryResult)]
struct CountRow {
    target: String,
    total: i64,
}

impl SeaOrmStorage {
    /// 记录一次访问；`target_id` 是资料 id 或评价牌的码 id
    pub async fn record_visit(&self, target_id: &str) -> Result<()> {
        profile_visit::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            profile_id: Set(target_id.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn record_click(&self, button_id: &str, profile_id: &str) -> Result<()> {
        button_click::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            button_id: Set(button_id.to_string()),
            profile_id: Set(profile_id.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    pub async fn count_visits(&self, target_id: &str) -> Result<u64> {
        Ok(profile_visit::Entity::find()
            .filter(profile_visit::Column::ProfileId.eq(target_id))
            .count(&self.db)
            .await?)
    }

    /// 按目标 id 分组统计访问次数，缺失的 id 计为 0
    pub async fn visit_counts(&self, target_ids: &[String]) -> Result<HashMap<String, u64>> {
        let mut counts: HashMap<String, u64> =
            target_ids.iter().map(|id| (id.clone(), 0)).collect();
        if target_ids.is_empty() {
            return Ok(counts);
        }

        let rows = profile_visit::Entity::find()
            .select_only()
            .column_as(profile_visit::Column::ProfileId, "target")
            .column_as(profile_visit::Column::Id.count(), "total")
            .filter(profile_visit::Column::ProfileId.is_in(target_ids.iter().cloned()))
            .group_by(profile_visit::Column::ProfileId)
            .into_model::<CountRow>()
            .all(&self.db)
            .await?;

        for row in rows {
            counts.insert(row.target, row.total.max(0) as u64);
        }
        Ok(counts)
    }

    /// 资料下每个按钮的点击次数
    pub async fn click_counts(&self, profile_id: &str) -> Result<HashMap<String, u64>> {
        let rows = button_click::Entity::find()
            .select_only()
            .column_as(button_click::Column::ButtonId, "target")
            .column_as(button_click::Column::Id.count(), "total")
            .filter(button_click::Column::ProfileId.eq(profile_id))
            .group_by(button_click::Column::ButtonId)
            .into_model::<CountRow>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.target, row.total.max(0) as u64))
            .collect())
    }
}
