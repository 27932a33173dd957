//! Code inventory: lookup, claim, plaque edits and bulk insert

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_code, new_code_active_model, new_profile_active_model};
use crate::errors::{Result, TappioError};
use crate::storage::models::{CodeFilter, CodeType, NfcCode};

use migration::entities::nfc_code;

/// 认领成功后的结果
#[derive(Debug, Clone)]
pub struct ClaimRecord {
    pub code: NfcCode,
    pub profile_id: Option<String>,
}

impl SeaOrmStorage {
    /// 按码精确查找
    pub async fn find_code(&self, code: &str) -> Result<Option<NfcCode>> {
        nfc_code::Entity::find()
            .filter(nfc_code::Column::Code.eq(code))
            .one(&self.db)
            .await?
            .map(model_to_code)
            .transpose()
    }

    /// 认领一个码
    ///
    /// 在一个事务中完成：条件更新（仅当 assigned_to 为空）、
    /// 名片类型创建空白资料并回填 url。
    /// 条件更新未命中（被并发认领）时返回 `Ok(None)`。
    pub async fn claim_code<F>(
        &self,
        code_id: &str,
        user_id: &str,
        profile_view_url: F,
    ) -> Result<Option<ClaimRecord>>
    where
        F: FnOnce(&str) -> String,
    {
        let txn = self.db.begin().await.map_err(|e| {
            TappioError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let now = Utc::now();
        let result = nfc_code::Entity::update_many()
            .col_expr(nfc_code::Column::AssignedTo, Expr::value(user_id))
            .col_expr(nfc_code::Column::AssignedAt, Expr::value(now))
            .col_expr(nfc_code::Column::IsActive, Expr::value(true))
            .filter(nfc_code::Column::Id.eq(code_id))
            .filter(nfc_code::Column::AssignedTo.is_null())
            .exec(&txn)
            .await
            .map_err(|e| TappioError::database_operation(format!("认领失败: {}", e)))?;

        if result.rows_affected == 0 {
            // 没有写入任何内容，回滚即可
            txn.rollback().await.map_err(|e| {
                TappioError::database_operation(format!("回滚事务失败: {}", e))
            })?;
            debug!("Claim of code id {} lost the race", code_id);
            return Ok(None);
        }

        let model = nfc_code::Entity::find_by_id(code_id.to_string())
            .one(&txn)
            .await?
            .ok_or_else(|| TappioError::not_found(format!("码不存在: {}", code_id)))?;
        let mut code = model_to_code(model)?;

        let mut profile_id = None;
        if code.code_type == CodeType::Profile {
            let id = uuid::Uuid::new_v4().to_string();
            new_profile_active_model(&id, code_id, user_id, now)
                .insert(&txn)
                .await
                .map_err(|e| TappioError::database_operation(format!("创建资料失败: {}", e)))?;

            let url = profile_view_url(&id);
            nfc_code::ActiveModel {
                id: Set(code_id.to_string()),
                url: Set(Some(url.clone())),
                ..Default::default()
            }
            .update(&txn)
            .await?;

            code.url = Some(url);
            profile_id = Some(id);
        }

        txn.commit()
            .await
            .map_err(|e| TappioError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Code {} claimed by {}", code.code, user_id);
        Ok(Some(ClaimRecord { code, profile_id }))
    }

    /// 回填码的目标地址
    pub async fn set_code_url(&self, code_id: &str, url: &str) -> Result<()> {
        let result = nfc_code::Entity::update_many()
            .col_expr(nfc_code::Column::Url, Expr::value(url))
            .filter(nfc_code::Column::Id.eq(code_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TappioError::not_found(format!("码不存在: {}", code_id)));
        }
        Ok(())
    }

    /// 保存评价牌内容并重新激活
    pub async fn update_plaque(
        &self,
        code_id: &str,
        title: &str,
        description: &str,
        redirect_url: &str,
    ) -> Result<NfcCode> {
        let model = nfc_code::ActiveModel {
            id: Set(code_id.to_string()),
            title: Set(Some(title.to_string())),
            description: Set(Some(description.to_string())),
            redirect_url: Set(Some(redirect_url.to_string())),
            is_active: Set(true),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| TappioError::database_operation(format!("保存评价牌失败: {}", e)))?;

        model_to_code(model)
    }

    /// 某用户认领的码，按认领时间倒序
    pub async fn codes_owned_by(
        &self,
        user_id: &str,
        code_type: Option<CodeType>,
    ) -> Result<Vec<NfcCode>> {
        let mut query = nfc_code::Entity::find().filter(nfc_code::Column::AssignedTo.eq(user_id));
        if let Some(code_type) = code_type {
            query = query.filter(nfc_code::Column::CodeType.eq(code_type.as_ref()));
        }

        query
            .order_by_desc(nfc_code::Column::AssignedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_code)
            .collect()
    }

    /// 库存列表，按创建时间倒序
    pub async fn list_codes(&self, filter: &CodeFilter) -> Result<Vec<NfcCode>> {
        let mut query = nfc_code::Entity::find();
        if let Some(code_type) = filter.code_type {
            query = query.filter(nfc_code::Column::CodeType.eq(code_type.as_ref()));
        }
        match filter.available {
            Some(true) => query = query.filter(nfc_code::Column::AssignedTo.is_null()),
            Some(false) => query = query.filter(nfc_code::Column::AssignedTo.is_not_null()),
            None => {}
        }

        query
            .order_by_desc(nfc_code::Column::CreatedAt)
            .order_by_asc(nfc_code::Column::Code)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_code)
            .collect()
    }

    /// 最近被认领的码
    pub async fn recent_claimed(&self, limit: u64) -> Result<Vec<NfcCode>> {
        nfc_code::Entity::find()
            .filter(nfc_code::Column::AssignedTo.is_not_null())
            .order_by_desc(nfc_code::Column::AssignedAt)
            .limit(limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(model_to_code)
            .collect()
    }

    /// 返回候选中已存在的码
    pub async fn existing_codes(&self, candidates: &[String]) -> Result<HashSet<String>> {
        if candidates.is_empty() {
            return Ok(HashSet::new());
        }

        let existing: Vec<String> = nfc_code::Entity::find()
            .select_only()
            .column(nfc_code::Column::Code)
            .filter(nfc_code::Column::Code.is_in(candidates.iter().cloned()))
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(existing.into_iter().collect())
    }

    /// 批量插入新码（使用事务）
    pub async fn insert_codes(
        &self,
        codes: &[String],
        code_type: CodeType,
        created_by: Option<&str>,
    ) -> Result<Vec<NfcCode>> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        let txn = self.db.begin().await.map_err(|e| {
            TappioError::database_operation(format!("开始事务失败: {}", e))
        })?;

        let now = Utc::now();
        let active_models: Vec<nfc_code::ActiveModel> = codes
            .iter()
            .map(|code| new_code_active_model(code, code_type, created_by, now))
            .collect();

        nfc_code::Entity::insert_many(active_models)
            .exec(&txn)
            .await
            .map_err(|e| TappioError::database_operation(format!("批量插入失败: {}", e)))?;

        let inserted = nfc_code::Entity::find()
            .filter(nfc_code::Column::Code.is_in(codes.iter().cloned()))
            .order_by_asc(nfc_code::Column::Code)
            .all(&txn)
            .await?;

        txn.commit()
            .await
            .map_err(|e| TappioError::database_operation(format!("提交事务失败: {}", e)))?;

        info!("Batch inserted {} {} codes", codes.len(), code_type);
        inserted.into_iter().map(model_to_code).collect()
    }

    pub async fn count_codes(&self) -> Result<u64> {
        Ok(nfc_code::Entity::find().count(&self.db).await?)
    }
}
