//! Account service
//!
//! 注册、凭据校验、角色查询。签发令牌与会话事件由
//! `api::session::SessionProvider` 负责。

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use ts_rs::TS;

use crate::config::TS_EXPORT_PATH;
use crate::errors::{Result, TappioError};
use crate::storage::{Role, SeaOrmStorage, UserAccount, UserSummary};
use crate::utils::password::{MIN_PASSWORD_LENGTH, hash_password, meets_policy, verify_password};

/// 登录与注册请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 当前会话的用户
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// 邮箱统一转为小写并去掉空白
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(TappioError::validation("A valid email address is required"))
    }
}

pub struct AccountService {
    storage: Arc<SeaOrmStorage>,
}

impl AccountService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    fn hash(password: &str) -> Result<String> {
        if !meets_policy(password) {
            return Err(TappioError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        hash_password(password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            TappioError::validation("Password could not be processed")
        })
    }

    async fn to_session_user(&self, account: UserAccount) -> Result<SessionUser> {
        let role = self.storage.role_for(&account.id).await?;
        Ok(SessionUser {
            user_id: account.id,
            email: account.email,
            role,
        })
    }

    /// 注册新账号，角色为普通用户
    pub async fn signup(&self, credentials: &Credentials) -> Result<SessionUser> {
        let email = normalize_email(&credentials.email);
        validate_email(&email)?;
        let password_hash = Self::hash(&credentials.password)?;

        if self.storage.find_account_by_email(&email).await?.is_some() {
            return Err(TappioError::validation("An account with this email already exists"));
        }

        let account = self
            .storage
            .insert_account(&email, &password_hash, Role::User)
            .await?;
        info!("New account signed up: {}", account.email);

        Ok(SessionUser {
            user_id: account.id,
            email: account.email,
            role: Role::User,
        })
    }

    /// 校验邮箱与密码
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<SessionUser> {
        let email = normalize_email(&credentials.email);
        let invalid = || TappioError::unauthorized("Invalid email or password");

        let Some(account) = self.storage.find_account_by_email(&email).await? else {
            warn!("Login failed: unknown account {}", email);
            return Err(invalid());
        };

        let valid = verify_password(&credentials.password, &account.password_hash).map_err(|e| {
            error!("Password verification error for {}: {}", email, e);
            invalid()
        })?;
        if !valid {
            warn!("Login failed: wrong password for {}", email);
            return Err(invalid());
        }

        self.to_session_user(account).await
    }

    /// 按用户 id 取会话信息；账号已删除时返回 None
    pub async fn session_user(&self, user_id: &str) -> Result<Option<SessionUser>> {
        match self.storage.find_account(user_id).await? {
            Some(account) => Ok(Some(self.to_session_user(account).await?)),
            None => Ok(None),
        }
    }

    /// 创建管理员；账号已存在时只提升角色，不改密码
    pub async fn create_admin(&self, email: &str, password: &str) -> Result<SessionUser> {
        let email = normalize_email(email);
        validate_email(&email)?;

        if let Some(account) = self.storage.find_account_by_email(&email).await? {
            self.storage.set_role(&account.id, Role::Admin).await?;
            info!("Existing account {} promoted to admin", email);
            return Ok(SessionUser {
                user_id: account.id,
                email: account.email,
                role: Role::Admin,
            });
        }

        let password_hash = Self::hash(password)?;
        let account = self
            .storage
            .insert_account(&email, &password_hash, Role::Admin)
            .await?;
        info!("Admin account created: {}", email);
        Ok(SessionUser {
            user_id: account.id,
            email: account.email,
            role: Role::Admin,
        })
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.storage.list_users().await
    }
}
