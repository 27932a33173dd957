//! HTTP 层
//!
//! - `services`: 各组路由的处理器
//! - `middleware`: request_id 与请求耗时
//! - `session`: 会话提供者与 `AuthSession` / `AdminSession` 提取器
//! - `jwt`: 访问令牌签发与校验

pub mod constants;
pub mod jwt;
pub mod middleware;
pub mod services;
pub mod session;

use actix_web::{HttpRequest, error, web};

use crate::config::{AuthConfig, StaticConfig};
use crate::errors::TappioError;
use crate::services::AppServices;
use crate::system::event::SessionBus;

use self::jwt::JwtService;
use self::services::{
    AppStartTime, CookieBuilder, admin_routes, auth_routes, health_routes, owner_routes,
    profile_routes, public_routes, redirect_routes,
};
use self::session::SessionProvider;

/// 会话事件通道容量
const SESSION_BUS_CAPACITY: usize = 64;

/// 注册到 App 的共享状态，启动时构建一次，每个 worker 克隆
#[derive(Clone)]
pub struct ApiState {
    pub services: AppServices,
    pub sessions: web::Data<SessionProvider>,
    pub cookies: web::Data<CookieBuilder>,
    pub started: AppStartTime,
    auth: AuthConfig,
}

impl ApiState {
    pub fn new(services: AppServices, config: &StaticConfig) -> Self {
        let jwt = JwtService::from_config(&config.auth);
        let sessions = SessionProvider::new(
            jwt,
            services.accounts.clone(),
            SessionBus::new(SESSION_BUS_CAPACITY),
        );

        Self {
            services,
            sessions: web::Data::new(sessions),
            cookies: web::Data::new(CookieBuilder::from_config(&config.auth)),
            started: AppStartTime::now(),
            auth: config.auth.clone(),
        }
    }
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    TappioError::validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    TappioError::validation(format!("Invalid query string: {}", err)).into()
}

/// 注册全部 app_data 与路由
///
/// 服务器与集成测试共用，保证两边路由一致。
pub fn configure(cfg: &mut web::ServiceConfig, state: &ApiState) {
    let services = &state.services;

    cfg.app_data(web::Data::new(services.storage.clone()))
        .app_data(web::Data::new(services.codes.clone()))
        .app_data(web::Data::new(services.profiles.clone()))
        .app_data(web::Data::new(services.plaques.clone()))
        .app_data(web::Data::new(services.feedback.clone()))
        .app_data(web::Data::new(services.accounts.clone()))
        .app_data(web::Data::new(services.dashboard.clone()))
        .app_data(state.sessions.clone())
        .app_data(state.cookies.clone())
        .app_data(web::Data::new(state.started.clone()))
        .app_data(
            web::JsonConfig::default()
                .limit(constants::JSON_LIMIT_BYTES)
                .error_handler(json_error_handler),
        )
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));

    cfg.service(health_routes())
        .service(
            web::scope(constants::API_PREFIX)
                .service(auth_routes(&state.auth))
                .service(admin_routes())
                .service(profile_routes())
                .configure(owner_routes),
        )
        .configure(public_routes)
        .configure(redirect_routes);
}
