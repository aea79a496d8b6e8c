use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};

use hireboard_auth::{Claims, Policy};
use hireboard_core::{ApplicationId, JobId};

use crate::app::dto::{ApplyRequest, StatusRequest};
use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::{self, ORGANIZATION};

pub fn router() -> Router {
    Router::new()
        .route("/apply/:job_id", post(apply))
        .route("/mine", get(list_mine))
        .route("/job/:job_id", get(list_for_job))
        .route("/:id/status", patch(update_status))
}

pub async fn apply(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<String>,
    JsonBody(body): JsonBody<ApplyRequest>,
) -> Response {
    let job_id: JobId = match errors::parse_id(&job_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services
        .applications
        .apply(job_id, &claims, &body.cover_letter)
        .await
    {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_mine(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    match services.applications.list_for_applicant(claims.id).await {
        Ok(applications) => Json(applications).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_for_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(job_id): Path<String>,
) -> Response {
    if let Err(res) = authz::require(&claims, &Policy::roles(ORGANIZATION)) {
        return res;
    }
    let job_id: JobId = match errors::parse_id(&job_id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.applications.list_for_job(job_id, claims.id).await {
        Ok(applicants) => Json(applicants).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<StatusRequest>,
) -> Response {
    if let Err(res) = authz::require(&claims, &Policy::roles(ORGANIZATION)) {
        return res;
    }
    let application_id: ApplicationId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services
        .applications
        .update_status(application_id, claims.id, &body.status)
        .await
    {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => errors::domain_error(e),
    }
}
