use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use hireboard_auth::{AccountPatch, Claims, Policy, Registration};
use hireboard_core::AccountId;

use crate::app::dto::{ChangePasswordRequest, LoginRequest, MessageResponse, TokenResponse};
use crate::app::errors;
use crate::app::extract::JsonBody;
use crate::app::services::AppServices;
use crate::authz::{self, ADMIN, ANY_ROLE};

pub fn users_router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<Registration>,
) -> Response {
    match services.accounts.register(body).await {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Response {
    match services.accounts.login(&body.username, &body.password).await {
        Ok(token) => Json(TokenResponse { token }).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    match services.accounts.get_account(claims.id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<AccountPatch>,
) -> Response {
    match services.accounts.update_own_details(claims.id, body).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<ChangePasswordRequest>,
) -> Response {
    match services
        .accounts
        .change_password(claims.id, &body.old_password, &body.new_password)
        .await
    {
        Ok(()) => Json(MessageResponse::new("Password changed successfully")).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
) -> Response {
    if let Err(res) = authz::require(&claims, &Policy::roles(ADMIN)) {
        return res;
    }
    match services.accounts.list_accounts().await {
        Ok(accounts) => Json(accounts).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let id = match authorize_self(&claims, &id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.accounts.get_account(id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<AccountPatch>,
) -> Response {
    let id = match authorize_self(&claims, &id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.accounts.update_account(id, body).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => errors::domain_error(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Response {
    let id = match authorize_self(&claims, &id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match services.accounts.delete_account(id).await {
        Ok(()) => Json(MessageResponse::new(format!("User {id} has been deleted successfully")))
            .into_response(),
        Err(e) => errors::domain_error(e),
    }
}

/// Any account may act on itself; admins on anyone.
fn authorize_self(claims: &Claims, raw_id: &str) -> Result<AccountId, Response> {
    let id: AccountId = errors::parse_id(raw_id)?;
    authz::require(claims, &Policy::roles(ANY_ROLE).owned_by(id))?;
    Ok(id)
}
