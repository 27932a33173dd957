//! Accounts and roles

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    SqlErr, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::SeaOrmStorage;
use super::converters::model_to_account;
use crate::errors::{Result, TappioError};
use crate::storage::models::{Role, UserAccount, UserSummary};

use migration::entities::{user_account, user_role};

/// 邮箱唯一索引冲突（并发注册）按校验错误返回
fn account_insert_error(e: DbErr) -> TappioError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            TappioError::validation("An account with this email already exists")
        }
        _ => TappioError::database_operation(format!("创建账号失败: {}", e)),
    }
}

impl SeaOrmStorage {
    pub async fn find_account_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(user_account::Entity::find()
            .filter(user_account::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(model_to_account))
    }

    pub async fn find_account(&self, id: &str) -> Result<Option<UserAccount>> {
        Ok(user_account::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(model_to_account))
    }

    /// 创建账号及其角色（使用事务）
    pub async fn insert_account(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserAccount> {
        let txn = self.db.begin().await.map_err(|e| {
            TappioError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let model = user_account::ActiveModel {
            id: Set(id.clone()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(account_insert_error)?;

        user_role::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(id),
            role: Set(role.as_ref().to_string()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| TappioError::database_operation(format!("写入角色失败: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| TappioError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Account created: {} ({})", email, role);
        Ok(model_to_account(model))
    }

    /// 用户角色，没有记录时视为普通用户
    pub async fn role_for(&self, user_id: &str) -> Result<Role> {
        let row = user_role::Entity::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        Ok(row
            .and_then(|r| r.role.parse().ok())
            .unwrap_or_default())
    }

    /// 设置角色（仅运维 CLI 使用）
    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<()> {
        let active = user_role::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(role.as_ref().to_string()),
            created_at: Set(Utc::now()),
        };

        user_role::Entity::insert(active)
            .on_conflict(
                OnConflict::column(user_role::Column::UserId)
                    .update_column(user_role::Column::Role)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| TappioError::database_operation(format!("设置角色失败: {}", e)))?;
        Ok(())
    }

    /// 全部账号及角色，按注册时间倒序
    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let accounts = user_account::Entity::find()
            .order_by_desc(user_account::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let roles: HashMap<String, Role> = user_role::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|r| r.role.parse().ok().map(|role| (r.user_id, role)))
            .collect();

        Ok(accounts
            .into_iter()
            .map(|a| UserSummary {
                role: roles.get(&a.id).copied().unwrap_or_default(),
                id: a.id,
                email: a.email,
                created_at: a.created_at,
            })
            .collect())
    }

    /// 按 id 批量查询邮箱
    pub async fn emails_for(&self, user_ids: &[String]) -> Result<HashMap<String, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        Ok(user_account::Entity::find()
            .filter(user_account::Column::Id.is_in(user_ids.iter().cloned()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|a| (a.id, a.email))
            .collect())
    }
}
