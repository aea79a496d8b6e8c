use axum::{
    routing::{get, patch, post},
    Router,
};

pub mod applications;
pub mod auth;
pub mod jobs;
pub mod system;

/// Endpoints reachable without a token.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/registration", post(auth::register))
        .route("/auth/login", post(auth::login))
}

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me).put(auth::update_me))
        .route("/auth/password", patch(auth::change_password))
        .nest("/auth/users", auth::users_router())
        .nest("/jobs", jobs::router())
        .nest("/applications", applications::router())
}
