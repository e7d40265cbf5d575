//! Response helpers

use axum::{
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sportmeet_security::SessionCookie;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Json<Self> {
        Json(Self { message: message.to_string() })
    }
}

/// Any response plus the session cookie in `Set-Cookie`.
pub struct WithSession<T> {
    pub cookie: SessionCookie,
    pub body: T,
}

impl<T> WithSession<T> {
    pub fn new(cookie: SessionCookie, body: T) -> Self {
        Self { cookie, body }
    }
}

impl<T: IntoResponse> IntoResponse for WithSession<T> {
    fn into_response(self) -> Response {
        let value = match HeaderValue::from_str(&self.cookie.to_header_value()) {
            Ok(value) => value,
            Err(e) => return ApiError::Internal(format!("Session cookie is not a valid header: {e}")).into_response(),
        };

        let mut response = self.body.into_response();
        response.headers_mut().insert(header::SET_COOKIE, value);
        response
    }
}
