use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};

use crate::error::ApiError;

pub const NOT_JSON_MESSAGE: &str = "The request payload is not in JSON format";
pub const INVALID_JSON_MESSAGE: &str = "payload must be a valid json";

/// `Json` extractor whose rejections are rendered as 400 `{success, message}`.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => NOT_JSON_MESSAGE.to_string(),
        JsonRejection::JsonSyntaxError(_) => INVALID_JSON_MESSAGE.to_string(),
        other => other.body_text(),
    };
    tracing::debug!(%message, "rejected request body");
    ApiError::BadRequest(message)
}
