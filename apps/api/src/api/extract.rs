use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

/// `axum::Json` with rejections rendered as `{"error", "details"}` 400s
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    ApiError::bad_request("Invalid request body").with_details(rejection.body_text())
}
