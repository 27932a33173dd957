//! 资料与按钮管理（仅所有者）

use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use futures_util::StreamExt;
use tracing::{error, info};

use crate::api::session::AuthSession;
use crate::services::{NewButton, ProfileService, ProfileUpdate};

use super::error_code::ErrorCode;
use super::helpers::{api_result, created_response, error_from_tappio, error_response};
use super::types::{MessageResponse, ReorderButtonsRequest};

/// `GET /api/v1/profiles/{id}`
pub async fn get_profile(
    session: AuthSession,
    path: web::Path<String>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(profiles.detail(&path.into_inner(), &session.user_id).await)
}

/// `PUT /api/v1/profiles/{id}`
pub async fn update_profile(
    session: AuthSession,
    path: web::Path<String>,
    body: web::Json<ProfileUpdate>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(
        profiles
            .update(&path.into_inner(), &session.user_id, body.into_inner())
            .await,
    )
}

/// `POST /api/v1/profiles/{id}/logo`
///
/// multipart 表单，文件字段名为 `file`
pub async fn upload_logo(
    session: AuthSession,
    path: web::Path<String>,
    mut payload: Multipart,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    let profile_id = path.into_inner();
    let max_bytes = profiles.upload_max_bytes();
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                );
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    if data.len() + bytes.len() > max_bytes {
                        return error_response(
                            StatusCode::PAYLOAD_TOO_LARGE,
                            ErrorCode::FileTooLarge,
                            &format!("Logo must be at most {} bytes", max_bytes),
                        );
                    }
                    data.extend_from_slice(&bytes);
                }
                Err(e) => {
                    error!("Failed to read upload chunk: {}", e);
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::InvalidMultipartData,
                        "Failed to read uploaded file",
                    );
                }
            }
        }
        upload = Some((content_type, data));
    }

    let Some((content_type, data)) = upload else {
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "No file provided",
        );
    };

    info!(
        "Logo upload for profile {}: {} bytes ({})",
        profile_id,
        data.len(),
        content_type
    );
    api_result(
        profiles
            .save_logo(&profile_id, &session.user_id, &content_type, &data)
            .await,
    )
}

/// `GET /api/v1/profiles/{id}/buttons`
pub async fn list_buttons(
    session: AuthSession,
    path: web::Path<String>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(profiles.buttons(&path.into_inner(), &session.user_id).await)
}

/// `POST /api/v1/profiles/{id}/buttons`
pub async fn add_button(
    session: AuthSession,
    path: web::Path<String>,
    body: web::Json<NewButton>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    match profiles
        .add_button(&path.into_inner(), &session.user_id, body.into_inner())
        .await
    {
        Ok(button) => created_response(button),
        Err(e) => error_from_tappio(&e),
    }
}

/// `DELETE /api/v1/profiles/{id}/buttons/{button_id}`
pub async fn delete_button(
    session: AuthSession,
    path: web::Path<(String, String)>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    let (profile_id, button_id) = path.into_inner();
    api_result(
        profiles
            .delete_button(&profile_id, &session.user_id, &button_id)
            .await
            .map(|_| MessageResponse {
                message: format!("Button {} deleted", button_id),
            }),
    )
}

/// `PUT /api/v1/profiles/{id}/buttons/order`
pub async fn reorder_buttons(
    session: AuthSession,
    path: web::Path<String>,
    body: web::Json<ReorderButtonsRequest>,
    profiles: web::Data<Arc<ProfileService>>,
) -> impl Responder {
    api_result(
        profiles
            .reorder_buttons(&path.into_inner(), &session.user_id, &body.button_ids)
            .await,
    )
}

/// 资料路由，挂在 `/api/v1` 下
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profiles/{id}")
        .route("", web::get().to(get_profile))
        .route("", web::put().to(update_profile))
        .route("/logo", web::post().to(upload_logo))
        .route("/buttons", web::get().to(list_buttons))
        .route("/buttons", web::post().to(add_button))
        .route("/buttons/order", web::put().to(reorder_buttons))
        .route("/buttons/{button_id}", web::delete().to(delete_button))
}
