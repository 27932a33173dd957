//! 访客可访问的接口：首页、公开资料页、vCard、按钮点击、上传文件

use std::path::{Component, Path};
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, trace};

use crate::services::{LOGIN_PATH, ProfileService, SIGNUP_PATH};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_tappio, error_response, success_response};
use super::types::{ButtonClickResponse, HomeResponse};

/// 按扩展名判断上传文件的 Content-Type
fn upload_content_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// 只接受普通路径分量，拒绝 `..`、绝对路径
fn is_safe_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}

pub struct PublicService;

impl PublicService {
    /// `GET /`
    pub async fn home() -> impl Responder {
        success_response(HomeResponse {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            login_path: LOGIN_PATH.to_string(),
            signup_path: SIGNUP_PATH.to_string(),
        })
    }

    /// `GET /profile/{id}/view`
    pub async fn view_profile(
        path: web::Path<String>,
        profiles: web::Data<Arc<ProfileService>>,
    ) -> impl Responder {
        api_result(profiles.public_view(&path.into_inner()).await)
    }

    /// `GET /profile/{id}/vcard`
    pub async fn download_vcard(
        path: web::Path<String>,
        profiles: web::Data<Arc<ProfileService>>,
    ) -> impl Responder {
        match profiles.vcard(&path.into_inner()).await {
            Ok(file) => HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, "text/vcard; charset=utf-8"))
                .insert_header((
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ))
                .body(file.body),
            Err(e) => error_from_tappio(&e),
        }
    }

    /// `POST /profile/{id}/buttons/{button_id}/click`
    pub async fn click_button(
        path: web::Path<(String, String)>,
        profiles: web::Data<Arc<ProfileService>>,
    ) -> impl Responder {
        let (profile_id, button_id) = path.into_inner();
        api_result(
            profiles
                .click(&profile_id, &button_id)
                .await
                .map(|href| ButtonClickResponse { href }),
        )
    }

    /// `GET /uploads/{path}`
    pub async fn serve_upload(
        path: web::Path<String>,
        profiles: web::Data<Arc<ProfileService>>,
    ) -> impl Responder {
        let relative = path.into_inner();
        let relative = Path::new(&relative);
        if !is_safe_relative(relative) {
            debug!("Rejected upload path: {}", relative.display());
            return error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                "File not found",
            );
        }

        let full = profiles.upload_dir().join(relative);
        match tokio::fs::read(&full).await {
            Ok(bytes) => {
                trace!("Serving upload {}", full.display());
                HttpResponse::Ok()
                    .insert_header((CONTENT_TYPE, upload_content_type(relative)))
                    .insert_header((CACHE_CONTROL, "public, max-age=86400"))
                    .body(bytes)
            }
            Err(_) => error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                "File not found",
            ),
        }
    }
}

/// 公开路由（无需登录）
pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(PublicService::home))
        .route(
            "/profile/{id}/view",
            web::get().to(PublicService::view_profile),
        )
        .route(
            "/profile/{id}/vcard",
            web::get().to(PublicService::download_vcard),
        )
        .route(
            "/profile/{id}/buttons/{button_id}/click",
            web::post().to(PublicService::click_button),
        )
        .route(
            "/uploads/{path:.*}",
            web::get().to(PublicService::serve_upload),
        );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_content_type() {
        assert_eq!(upload_content_type(Path::new("a/b/logo.PNG")), "image/png");
        assert_eq!(upload_content_type(Path::new("logo.jpeg")), "image/jpeg");
        assert_eq!(
            upload_content_type(Path::new("notes.txt")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_rejects_traversal() {
        assert!(is_safe_relative(Path::new("user/profile/logo.png")));
        assert!(!is_safe_relative(Path::new("../secret")));
        assert!(!is_safe_relative(Path::new("user/../../etc/passwd")));
        assert!(!is_safe_relative(Path::new("/etc/passwd")));
        assert!(!is_safe_relative(Path::new("")));
    }
}
