// ABOUTME: Rewrites bare rejections from tower-http layers into problem-details responses
// ABOUTME: Covers request timeouts and oversized bodies so every error shares one wire shape
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{header, StatusCode};

use super::RequestId;
use crate::errors::{AppError, ErrorCode};

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Replace body-less 408 and 413 responses with problem details
///
/// Responses that already carry `application/problem+json` pass through.
pub async fn layer_rejection_middleware(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().cloned();
    let response = next.run(request).await;

    let code = match response.status() {
        StatusCode::REQUEST_TIMEOUT => ErrorCode::RequestTimeout,
        StatusCode::PAYLOAD_TOO_LARGE => ErrorCode::PayloadTooLarge,
        _ => return response,
    };
    let is_problem = response
        .headers()
        .get(header::CONTENT_TYPE)
        .is_some_and(|value| value.as_bytes().starts_with(PROBLEM_CONTENT_TYPE.as_bytes()));
    if is_problem {
        return response;
    }

    let message = match code {
        ErrorCode::RequestTimeout => "The request did not complete in time",
        _ => "The request body exceeds the size limit",
    };
    let mut error = AppError::new(code, message);
    if let Some(request_id) = request_id {
        error = error.with_request_id(request_id.as_str());
    }
    error.into_response()
}
