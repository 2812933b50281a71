//! Custom extractors
//!
//! Request extractors that answer malformed input with the API's JSON error shape.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde_json::json;

/// JSON body extractor with descriptive 400 responses
pub struct JsonExtractor<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonExtractor<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> (StatusCode, Json<serde_json::Value>) {
    let error_message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonRejection::JsonSyntaxError(err) => format!("JSON syntax error: {}", err.body_text()),
        JsonRejection::MissingJsonContentType(_) => {
            "Missing 'Content-Type: application/json' header".to_string()
        }
        other => format!("Failed to parse JSON: {}", other.body_text()),
    };

    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": error_message,
            "status": 400,
        })),
    )
}
