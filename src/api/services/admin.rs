//! 管理员接口：码库存、导出、二维码、用户与反馈
//!
//! 全部处理器都要求 [`AdminSession`]，非管理员得到 403。

use std::sync::Arc;

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use tracing::info;

use crate::api::session::AdminSession;
use crate::services::{AccountService, CodeService, FeedbackService};

use super::helpers::{api_result, created_response, error_from_tappio};
use super::types::{
    CodeListQuery, ExportCodesQuery, FeedbackStatusRequest, GenerateCodesRequest,
    GenerateCodesResponse,
};

/// `POST /api/v1/admin/codes/generate`
pub async fn generate_codes(
    admin: AdminSession,
    body: web::Json<GenerateCodesRequest>,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    info!(
        "Admin {} generating {} {} codes",
        admin.email, body.count, body.code_type
    );
    match codes
        .generate(body.count, body.code_type, Some(admin.user_id.as_str()))
        .await
    {
        Ok(generated) => created_response(GenerateCodesResponse {
            generated: generated.len(),
            codes: generated.into_iter().map(|c| c.code).collect(),
        }),
        Err(e) => error_from_tappio(&e),
    }
}

/// `GET /api/v1/admin/codes`
pub async fn list_codes(
    _admin: AdminSession,
    query: web::Query<CodeListQuery>,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    api_result(codes.list(&query.into_inner().into()).await)
}

/// `GET /api/v1/admin/codes/recent`
pub async fn recent_codes(
    _admin: AdminSession,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    api_result(codes.recent_claimed().await)
}

/// `GET /api/v1/admin/codes/export`
pub async fn export_codes(
    _admin: AdminSession,
    query: web::Query<ExportCodesQuery>,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    match codes.export_csv(query.code_type).await {
        Ok(csv) => {
            let filename = format!("codes_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
            HttpResponse::Ok()
                .insert_header((CONTENT_TYPE, "text/csv; charset=utf-8"))
                .insert_header((
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(csv)
        }
        Err(e) => error_from_tappio(&e),
    }
}

/// `GET /api/v1/admin/codes/{code}/qr.svg`
pub async fn code_qr(
    _admin: AdminSession,
    path: web::Path<String>,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    let code = path.into_inner();
    match codes.qr_svg(&code).await {
        Ok(svg) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "image/svg+xml"))
            .insert_header((
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}.svg\"", code),
            ))
            .body(svg),
        Err(e) => error_from_tappio(&e),
    }
}

/// `GET /api/v1/admin/users`
pub async fn list_users(
    _admin: AdminSession,
    accounts: web::Data<Arc<AccountService>>,
) -> impl Responder {
    api_result(accounts.list_users().await)
}

/// `GET /api/v1/admin/feedback`
pub async fn all_feedback(
    _admin: AdminSession,
    feedback: web::Data<Arc<FeedbackService>>,
) -> impl Responder {
    api_result(feedback.all().await)
}

/// `PUT /api/v1/admin/feedback/{id}/status`
pub async fn set_feedback_status(
    _admin: AdminSession,
    path: web::Path<String>,
    body: web::Json<FeedbackStatusRequest>,
    feedback: web::Data<Arc<FeedbackService>>,
) -> impl Responder {
    api_result(feedback.set_status(&path.into_inner(), body.status).await)
}

/// 管理路由，挂在 `/api/v1` 下
pub fn admin_routes() -> actix_web::Scope {
    web::scope("/admin")
        .route("/codes/generate", web::post().to(generate_codes))
        .route("/codes", web::get().to(list_codes))
        .route("/codes/recent", web::get().to(recent_codes))
        .route("/codes/export", web::get().to(export_codes))
        .route("/codes/{code}/qr.svg", web::get().to(code_qr))
        .route("/users", web::get().to(list_users))
        .route("/feedback", web::get().to(all_feedback))
        .route("/feedback/{id}/status", web::put().to(set_feedback_status))
}
