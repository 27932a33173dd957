//! 登录用户的接口：认领码、仪表盘、评价牌、反馈

use std::sync::Arc;

use actix_web::{Responder, web};
use tracing::info;

use crate::api::session::AuthSession;
use crate::services::{
    CodeService, DashboardService, FeedbackService, NewFeedback, PlaqueService, PlaqueUpdate,
};

use super::helpers::{api_result, created_response, error_from_tappio};
use super::types::ClaimRequest;

/// `POST /api/v1/codes/claim`
pub async fn claim_code(
    session: AuthSession,
    body: web::Json<ClaimRequest>,
    codes: web::Data<Arc<CodeService>>,
) -> impl Responder {
    info!("User {} claiming code {:?}", session.email, body.code);
    api_result(codes.claim(&body.code, &session.user_id).await)
}

/// `GET /api/v1/dashboard`
pub async fn dashboard(
    session: AuthSession,
    dashboards: web::Data<Arc<DashboardService>>,
) -> impl Responder {
    api_result(dashboards.for_user(&session.user_id).await)
}

/// `GET /api/v1/plaques/{code}`
pub async fn get_plaque(
    session: AuthSession,
    path: web::Path<String>,
    plaques: web::Data<Arc<PlaqueService>>,
) -> impl Responder {
    api_result(plaques.get(&path.into_inner(), &session.user_id).await)
}

/// `PUT /api/v1/plaques/{code}`
pub async fn update_plaque(
    session: AuthSession,
    path: web::Path<String>,
    body: web::Json<PlaqueUpdate>,
    plaques: web::Data<Arc<PlaqueService>>,
) -> impl Responder {
    api_result(
        plaques
            .update(&path.into_inner(), &session.user_id, &body)
            .await,
    )
}

/// `POST /api/v1/feedback`
pub async fn submit_feedback(
    session: AuthSession,
    body: web::Json<NewFeedback>,
    feedback: web::Data<Arc<FeedbackService>>,
) -> impl Responder {
    match feedback.submit(&session.user_id, &body).await {
        Ok(entry) => created_response(entry),
        Err(e) => error_from_tappio(&e),
    }
}

/// `GET /api/v1/feedback`
pub async fn my_feedback(
    session: AuthSession,
    feedback: web::Data<Arc<FeedbackService>>,
) -> impl Responder {
    api_result(feedback.mine(&session.user_id).await)
}

/// 所有者路由，挂在 `/api/v1` 下
pub fn owner_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/codes/claim", web::post().to(claim_code))
        .route("/dashboard", web::get().to(dashboard))
        .route("/plaques/{code}", web::get().to(get_plaque))
        .route("/plaques/{code}", web::put().to(update_plaque))
        .route("/feedback", web::get().to(my_feedback))
        .route("/feedback", web::post().to(submit_feedback));
}
