use axum::async_trait;
use axum::extract::{FromRequest, Request};
use axum::response::Response;
use axum::Json;
use serde::de::DeserializeOwned;

use hireboard_core::DomainError;

use super::errors::domain_error;

/// `Json<T>` whose rejections (bad content type, malformed or mistyped body)
/// answer with the usual 400 `validation_error` body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(status = %rejection.status(), reason = %rejection.body_text(), "request body rejected");
                Err(domain_error(DomainError::validation(rejection.body_text())))
            }
        }
    }
}
