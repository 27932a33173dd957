//! 会话提供者与请求提取器
//!
//! `SessionProvider` 是唯一的会话入口：解析请求携带的令牌、签发新令牌、
//! 并通过 [`SessionBus`] 广播登录 / 登出事件。受保护的处理器使用
//! [`AuthSession`] / [`AdminSession`] 提取器拿到当前用户。

use std::ops::Deref;
use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, trace};

use crate::api::constants;
use crate::api::jwt::JwtService;
use crate::errors::{Result, TappioError};
use crate::services::{AccountService, Credentials, SessionUser};
use crate::system::event::{SessionBus, SessionEvent, SessionSubscription};

/// 新签发的会话
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub user: SessionUser,
    pub token: String,
}

pub struct SessionProvider {
    jwt: JwtService,
    accounts: Arc<AccountService>,
    bus: SessionBus,
}

impl SessionProvider {
    pub fn new(jwt: JwtService, accounts: Arc<AccountService>, bus: SessionBus) -> Self {
        Self { jwt, accounts, bus }
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.jwt.access_token_minutes()
    }

    /// 从 Authorization header 提取 Bearer token
    fn bearer_token(req: &HttpRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn cookie_token(req: &HttpRequest) -> Option<String> {
        req.cookie(constants::SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|s| !s.is_empty())
    }

    /// 令牌对应的用户；令牌无效或账号不存在时返回 None
    pub async fn from_token(&self, token: &str) -> Result<Option<SessionUser>> {
        match self.jwt.validate_access_token(token) {
            Ok(claims) => self.accounts.session_user(&claims.sub).await,
            Err(e) => {
                debug!("Session token rejected: {}", e);
                Ok(None)
            }
        }
    }

    /// 当前请求的会话：先 Bearer，再 Cookie
    pub async fn current(&self, req: &HttpRequest) -> Result<Option<SessionUser>> {
        if let Some(token) = Self::bearer_token(req)
            && let Some(user) = self.from_token(&token).await?
        {
            trace!("Session resolved via Bearer token");
            return Ok(Some(user));
        }

        if let Some(token) = Self::cookie_token(req)
            && let Some(user) = self.from_token(&token).await?
        {
            trace!("Session resolved via cookie");
            return Ok(Some(user));
        }

        Ok(None)
    }

    fn issue(&self, user: SessionUser) -> Result<IssuedSession> {
        let token = self.jwt.generate_access_token(&user.user_id).map_err(|e| {
            error!("Failed to generate access token: {}", e);
            TappioError::unauthorized("Failed to generate token")
        })?;

        self.bus.publish(SessionEvent::SignedIn {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
        });
        Ok(IssuedSession { user, token })
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<IssuedSession> {
        let user = self.accounts.authenticate(credentials).await?;
        info!("User signed in: {}", user.email);
        self.issue(user)
    }

    /// 注册后直接登录
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<IssuedSession> {
        let user = self.accounts.signup(credentials).await?;
        self.issue(user)
    }

    pub fn sign_out(&self, user: &SessionUser) {
        info!("User signed out: {}", user.email);
        self.bus.publish(SessionEvent::SignedOut {
            user_id: user.user_id.clone(),
        });
    }

    /// 订阅会话变化，返回的句柄被 drop 时退订
    pub fn on_change<F>(&self, callback: F) -> SessionSubscription
    where
        F: Fn(SessionEvent) + Send + 'static,
    {
        self.bus.on_change(callback)
    }

    pub fn events(&self) -> &SessionBus {
        &self.bus
    }
}

async fn session_from_request(req: HttpRequest) -> Result<SessionUser> {
    let provider = req
        .app_data::<web::Data<SessionProvider>>()
        .cloned()
        .ok_or_else(|| {
            error!("SessionProvider is not registered as app data");
            TappioError::database_config("Session provider unavailable")
        })?;

    provider
        .current(&req)
        .await?
        .ok_or_else(|| TappioError::unauthorized("Sign in required"))
}

/// 已登录用户
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionUser);

impl Deref for AuthSession {
    type Target = SessionUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthSession {
    type Error = TappioError;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { session_from_request(req).await.map(AuthSession) })
    }
}

/// 持有 admin 角色的已登录用户
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionUser);

impl Deref for AdminSession {
    type Target = SessionUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminSession {
    type Error = TappioError;
    type Future = LocalBoxFuture<'static, std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let user = session_from_request(req).await?;
            if !user.is_admin() {
                debug!("Non-admin {} denied admin access", user.email);
                return Err(TappioError::forbidden("Admin role required"));
            }
            Ok(AdminSession(user))
        })
    }
}
