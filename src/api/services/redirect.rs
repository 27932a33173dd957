//! 扫码跳转与激活页

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use actix_web::{HttpResponse, Responder, web};
use tracing::debug;

use crate::services::{CodeService, Navigation};

use super::helpers::api_result;

pub struct RedirectService;

impl RedirectService {
    /// `GET|HEAD /c/{code}`
    pub async fn handle_scan(
        path: web::Path<String>,
        codes: web::Data<Arc<CodeService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let navigation = codes.scan(&code).await;
        debug!("Scan of {:?} -> {:?}", code, navigation);
        Self::navigation_response(&navigation)
    }

    /// 外部地址 307，站内路由 302，均不缓存
    pub fn navigation_response(navigation: &Navigation) -> HttpResponse {
        let status = if navigation.is_external() {
            StatusCode::TEMPORARY_REDIRECT
        } else {
            StatusCode::FOUND
        };

        HttpResponse::build(status)
            .insert_header((LOCATION, navigation.location()))
            .insert_header((CACHE_CONTROL, "no-store"))
            .finish()
    }

    /// `GET /activate/{code}`
    pub async fn activation_page(
        path: web::Path<String>,
        codes: web::Data<Arc<CodeService>>,
    ) -> impl Responder {
        api_result(codes.activation_info(&path.into_inner()).await)
    }
}

/// 扫码相关路由
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/c/{code}")
            .route(web::get().to(RedirectService::handle_scan))
            .route(web::head().to(RedirectService::handle_scan)),
    )
    .service(
        web::resource("/activate/{code}").route(web::get().to(RedirectService::activation_page)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_response_status() {
        let external =
            RedirectService::navigation_response(&Navigation::External("https://example.com".into()));
        assert_eq!(external.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            external.headers().get(LOCATION).unwrap(),
            "https://example.com"
        );
        assert_eq!(external.headers().get(CACHE_CONTROL).unwrap(), "no-store");

        let internal = RedirectService::navigation_response(&Navigation::activate("AB12CD"));
        assert_eq!(internal.status(), StatusCode::FOUND);
        assert_eq!(internal.headers().get(LOCATION).unwrap(), "/activate/AB12CD");
    }
}
