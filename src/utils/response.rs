use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::utils::ApiError;

/// Unified response envelope written for every request
///
/// A success carries `code` 200 and an optional `result`; a failure carries
/// the error `code`, a `message` and a null `result`. Never both.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub result: Option<T>,
}

impl Envelope<()> {
    /// Success with no payload
    pub fn success() -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: None,
            result: None,
        }
    }
}

impl<T> Envelope<T> {
    /// Success carrying a payload
    pub fn with_result(result: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            message: None,
            result: Some(result),
        }
    }

    pub fn failed(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: Some(message.into()),
            result: None,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Return type of every user handler.
///
/// Binder rejections and service failures both short-circuit through `?`
/// into [ApiError], which writes the failure envelope.
pub type Reply<T> = Result<Envelope<T>, ApiError>;

/// Fallback for paths no route matches
pub async fn not_found() -> Envelope<()> {
    Envelope::failed(StatusCode::NOT_FOUND, "no route matches the request path")
}

/// Fallback for a known path hit with an unsupported method
pub async fn method_not_allowed() -> Envelope<()> {
    Envelope::failed(StatusCode::METHOD_NOT_ALLOWED, "method not allowed on this path")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_without_result() {
        let response = Envelope::success().into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["code"], 200);
        assert!(json["result"].is_null());
        assert!(json.get("message").is_none());
    }

    #[tokio::test]
    async fn test_success_with_sequence_result() {
        let response = Envelope::with_result(vec![3, 1, 2]).into_response();

        let json = body_json(response).await;
        assert_eq!(json["result"], serde_json::json!([3, 1, 2]));
    }

    #[tokio::test]
    async fn test_failed_has_message_and_no_result() {
        let envelope: Envelope<String> = Envelope::failed(StatusCode::CONFLICT, "taken");
        assert_eq!(envelope.code, 409);

        let response = envelope.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = body_json(response).await;
        assert_eq!(json["code"], 409);
        assert_eq!(json["message"], "taken");
        assert!(json["result"].is_null());
    }

    #[test]
    fn test_envelope_deserializes_back() {
        let envelope: Envelope<i64> =
            serde_json::from_str(r#"{"code":200,"result":42}"#).unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.message, None);
        assert_eq!(envelope.result, Some(42));
    }

    #[tokio::test]
    async fn test_fallbacks() {
        let json = body_json(not_found().await.into_response()).await;
        assert_eq!(json["code"], 404);

        let response = method_not_allowed().await.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
