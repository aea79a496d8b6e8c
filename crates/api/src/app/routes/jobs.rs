use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};

use hireboard_auth::{Claims, Policy};
use hireboard_core::JobId;
use hireboard_jobs::{JobPatch, NewJob};

use crate::app::dto::MessageResponse;
use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::{self, ORGANIZATION_OR_ADMIN, USER_OR_ORGANIZATION};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_job).get(list_active))
        .route("/mine", get(list_mine))
        .route("/favorites", get(list_favorites))
        .route("/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/:id/activate", patch(activate_job))
        .route("/:id/deactivate", patch(deactivate_job))
        .route("/:id/like", post(like_job).delete(unlike_job))
}

pub async fn create_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<NewJob>,
) -> Response {
    if let Err(res) = authz::require(&claims, &Policy::roles(ORGANIZATION_OR_ADMIN)) {
        return res;
    }
    match services.jobs.create(claims.id, &claims.user_name, body).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_active(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    match services.jobs.list_active(claims.id).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_mine(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    match services.jobs.list_by_owner(claims.id).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_favorites(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    if let Err(res) = authz::require(&claims, &Policy::roles(USER_OR_ORGANIZATION)) {
        return res;
    }
    match services.jobs.list_liked(claims.id).await {
        Ok(jobs) => Json(jobs).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id: JobId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.jobs.get(job_id, claims.id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn update_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<JobPatch>,
) -> Response {
    let job_id = match author_gate(&claims, &id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.jobs.update(job_id, claims.id, body).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn delete_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id = match author_gate(&claims, &id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.jobs.delete(job_id, claims.id).await {
        Ok(()) => Json(MessageResponse::new("Job has been deleted successfully")).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn activate_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id = match author_gate(&claims, &id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.jobs.activate(job_id, claims.id).await {
        Ok(()) => Json(MessageResponse::new("Job has been activated")).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn deactivate_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id = match author_gate(&claims, &id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.jobs.deactivate(job_id, claims.id).await {
        Ok(()) => Json(MessageResponse::new("Job has been deactivated")).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn like_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id: JobId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.engagement.like(job_id, claims.id).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn unlike_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let job_id: JobId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.engagement.unlike(job_id, claims.id).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

/// Role gate for author-only operations; the author check itself needs the
/// stored job and happens in the service.
fn author_gate(claims: &Claims, raw_id: &str) -> Result<JobId, Response> {
    authz::require(claims, &Policy::roles(ORGANIZATION_OR_ADMIN))?;
    errors::parse_id(raw_id)
}
