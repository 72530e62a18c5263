// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Altoke

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::remit::SendError;
use crate::storage::StoreError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => ApiError::not_found(e.to_string()),
            StoreError::AlreadyExists(_) => ApiError::conflict(e.to_string()),
            _ => ApiError::internal(e.to_string()),
        }
    }
}

/// Map pipeline errors onto the three user-visible outcomes plus the
/// operator-facing 5xx kinds, preserving the error detail in the body.
impl From<SendError> for ApiError {
    fn from(e: SendError) -> Self {
        match &e {
            SendError::Validation(_) => ApiError::bad_request(e.to_string()),
            SendError::WalletNotFound(_) => ApiError::not_found(e.to_string()),
            SendError::InsufficientFunds => ApiError::unprocessable(e.to_string()),
            SendError::Chain(_) => ApiError::bad_gateway(e.to_string()),
            SendError::KeyDecryption(_) | SendError::Store(_) | SendError::Transition(_) => {
                ApiError::internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "missing");

        let bad = ApiError::bad_request("bad");
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);
        assert_eq!(bad.message, "bad");

        let unp = ApiError::unprocessable("oops");
        assert_eq!(unp.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(unp.message, "oops");
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::bad_request("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"bad data"}"#);
    }

    #[test]
    fn send_errors_map_to_expected_statuses() {
        let cases = [
            (
                ApiError::from(SendError::InsufficientFunds).status,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::from(SendError::WalletNotFound("u".into())).status,
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(SendError::Validation("bad".into())).status,
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(SendError::Chain(
                    crate::chain::ChainError::ConfirmationTimeout { seconds: 120 },
                ))
                .status,
                StatusCode::BAD_GATEWAY,
            ),
            (
                ApiError::from(SendError::KeyDecryption(
                    crate::custody::KeyCipherError::Decrypt,
                ))
                .status,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (got, want) in cases {
            assert_eq!(got, want);
        }
    }

    #[test]
    fn store_errors_map_to_expected_statuses() {
        let nf = ApiError::from(StoreError::NotFound("Wallet x".into()));
        assert_eq!(nf.status, StatusCode::NOT_FOUND);

        let dup = ApiError::from(StoreError::AlreadyExists("Transaction y".into()));
        assert_eq!(dup.status, StatusCode::CONFLICT);
    }
}
