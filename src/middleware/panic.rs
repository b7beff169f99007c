use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::utils::response::Envelope;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Turns a panic inside a handler into a failure envelope
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Panic caught while handling request: {}", panic_message(payload.as_ref()));

    Envelope::<()>::failed(StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
        .into_response()
}

/// Layer that keeps a panicking handler from tearing down the connection
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_response as PanicHandler)
}

/// Route process-level panics through tracing
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_message(panic_info.payload());

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        tracing::error!(
            target: "panic",
            message = %message,
            location = %location,
            "Application panic occurred"
        );
    }));

    tracing::info!("Panic hook installed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");

        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn Any + Send> = Box::new(17_u8);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }

    #[tokio::test]
    async fn test_panicking_handler_yields_envelope() {
        async fn boom() -> &'static str {
            panic!("handler exploded");
        }

        let app = Router::new().route("/boom", get(boom)).layer(catch_panic_layer());
        let response = app
            .oneshot(http::Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], 500);
        assert_eq!(json["message"], "An unexpected error occurred");
        assert!(json["result"].is_null());
    }
}
