use axum::body::Body;
use axum::http::HeaderMap;
use axum::response::Response;

use crate::config::Config;

/// Gate a protected request on the `X-MC-Key` header.
///
/// When no server-side key is configured every request passes. Otherwise
/// the trimmed header value must equal the configured key; anything else
/// yields the fixed 401 body.
pub fn require_key(config: &Config, headers: &HeaderMap) -> Result<(), Response> {
    let Some(ref key) = config.api_key else {
        return Ok(());
    };

    let presented = headers
        .get("x-mc-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim);

    if presented == Some(key.as_str()) {
        Ok(())
    } else {
        Err(unauthorized())
    }
}

fn unauthorized() -> Response {
    Response::builder()
        .status(401)
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"detail":"bad key"}"#))
        .expect("infallible: all header values are valid ASCII")
}
