//! 注册 / 登录 / 登出 / 当前会话

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::{HttpResponse, Responder, web};
use governor::middleware::NoOpMiddleware;
use tracing::{error, info, trace};

use crate::api::session::{AuthSession, IssuedSession, SessionProvider};
use crate::config::AuthConfig;
use crate::services::Credentials;
use crate::utils::ip;

use super::helpers::{CookieBuilder, created_response, error_from_tappio, success_response};
use super::types::{AuthSuccessResponse, MessageResponse};

/// 登录限流的 key 提取器
///
/// 仅当直连地址属于受信代理时才采用 X-Forwarded-For / X-Real-IP。
#[derive(Clone, Debug, Default)]
pub struct LoginKeyExtractor {
    trusted_proxies: Vec<String>,
}

impl LoginKeyExtractor {
    pub fn new(trusted_proxies: Vec<String>) -> Self {
        Self { trusted_proxies }
    }
}

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let peer = req.peer_addr().map(|addr| addr.ip().to_string());
        let key = ip::client_key(
            peer.as_deref(),
            ip::forwarded_ip(req.headers()),
            &self.trusted_proxies,
        )
        .unwrap_or_else(|| "unknown".to_string());

        trace!("Login rate limit key: {}", key);
        Ok(key)
    }
}

/// 登录接口限流中间件
pub fn login_rate_limiter(auth: &AuthConfig) -> Governor<LoginKeyExtractor, NoOpMiddleware> {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(auth.login_period_secs.max(1))
        .burst_size(auth.login_burst.max(1))
        .key_extractor(LoginKeyExtractor::new(auth.trusted_proxies.clone()))
        .finish()
        .expect("Invalid login rate limiter configuration");

    Governor::new(&config)
}

pub struct AuthService;

impl AuthService {
    fn session_response(
        issued: IssuedSession,
        cookies: &CookieBuilder,
        created: bool,
    ) -> HttpResponse {
        let cookie = cookies.build_session_cookie(issued.token.clone());
        let body = AuthSuccessResponse {
            user: issued.user,
            access_token: issued.token,
            expires_in: cookies.access_token_minutes() * 60,
        };

        let mut response = if created {
            created_response(body)
        } else {
            success_response(body)
        };
        if let Err(e) = response.add_cookie(&cookie) {
            error!("Failed to attach session cookie: {}", e);
        }
        response
    }

    /// `POST /api/v1/auth/signup`
    pub async fn signup(
        body: web::Json<Credentials>,
        sessions: web::Data<SessionProvider>,
        cookies: web::Data<CookieBuilder>,
    ) -> impl Responder {
        match sessions.sign_up(&body).await {
            Ok(issued) => {
                info!("New account registered: {}", issued.user.email);
                Self::session_response(issued, &cookies, true)
            }
            Err(e) => error_from_tappio(&e),
        }
    }

    /// `POST /api/v1/auth/login`
    pub async fn login(
        body: web::Json<Credentials>,
        sessions: web::Data<SessionProvider>,
        cookies: web::Data<CookieBuilder>,
    ) -> impl Responder {
        match sessions.sign_in(&body).await {
            Ok(issued) => Self::session_response(issued, &cookies, false),
            Err(e) => error_from_tappio(&e),
        }
    }

    /// `POST /api/v1/auth/logout`
    pub async fn logout(
        session: AuthSession,
        sessions: web::Data<SessionProvider>,
        cookies: web::Data<CookieBuilder>,
    ) -> impl Responder {
        sessions.sign_out(&session);

        let mut response = success_response(MessageResponse {
            message: "Signed out".to_string(),
        });
        if let Err(e) = response.add_cookie(&cookies.build_expired_session_cookie()) {
            error!("Failed to expire session cookie: {}", e);
        }
        response
    }

    /// `GET /api/v1/auth/session`
    pub async fn session(session: AuthSession) -> impl Responder {
        success_response(session.0)
    }
}

/// 认证路由；登录单独套限流
pub fn auth_routes(auth: &AuthConfig) -> actix_web::Scope {
    web::scope("/auth")
        .route("/signup", web::post().to(AuthService::signup))
        .service(
            web::resource("/login")
                .wrap(login_rate_limiter(auth))
                .route(web::post().to(AuthService::login)),
        )
        .route("/logout", web::post().to(AuthService::logout))
        .route("/session", web::get().to(AuthService::session))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_key_extractor_uses_peer_without_trusted_proxy() {
        let extractor = LoginKeyExtractor::default();
        let req = TestRequest::default()
            .peer_addr("203.0.113.7:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "1.2.3.4"))
            .to_srv_request();

        assert_eq!(extractor.extract(&req).unwrap(), "203.0.113.7");
    }

    #[test]
    fn test_key_extractor_trusts_configured_proxy() {
        let extractor = LoginKeyExtractor::new(vec!["10.0.0.0/8".to_string()]);
        let req = TestRequest::default()
            .peer_addr("10.1.2.3:5000".parse().unwrap())
            .insert_header(("X-Forwarded-For", "198.51.100.4, 10.1.2.3"))
            .to_srv_request();

        assert_eq!(extractor.extract(&req).unwrap(), "198.51.100.4");
    }

    #[test]
    fn test_key_extractor_without_peer() {
        let extractor = LoginKeyExtractor::default();
        let req = TestRequest::default().to_srv_request();
        assert_eq!(extractor.extract(&req).unwrap(), "unknown");
    }
}
