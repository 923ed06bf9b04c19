// ABOUTME: Axum extractors reporting rejections as problem details
// ABOUTME: Authenticates and provisions the caller into a RequestContext
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::ServerResources;
use crate::errors::AppError;
use crate::middleware::RequestId;
use crate::pipeline::RequestContext;

fn request_id_of(extensions: &axum::http::Extensions) -> String {
    extensions
        .get::<RequestId>()
        .map_or_else(|| RequestId::generate().to_string(), ToString::to_string)
}

/// JSON body; malformed bodies become `INVALID_INPUT`
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let request_id = request_id_of(request.extensions());
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                Err(AppError::invalid_input(rejection.body_text()).with_request_id(request_id))
            }
        }
    }
}

/// Query string; malformed parameters become `INVALID_INPUT`
#[derive(Debug)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::invalid_input(rejection.body_text())
                .with_request_id(request_id_of(&parts.extensions))),
        }
    }
}

/// Path parameters; unparseable ids become `INVALID_INPUT`
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::invalid_input(rejection.body_text())
                .with_request_id(request_id_of(&parts.extensions))),
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<ServerResources>> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        resources: &Arc<ServerResources>,
    ) -> Result<Self, Self::Rejection> {
        let request_id = request_id_of(&parts.extensions);

        let principal = resources
            .verifier
            .authenticate(&parts.headers)
            .map_err(|error| error.with_request_id(request_id.clone()))?;
        let user = resources
            .database
            .users()
            .provision(&principal)
            .await
            .map_err(|error| error.with_request_id(request_id.clone()))?;

        Ok(Self {
            request_id,
            user,
            is_admin: principal.is_admin,
        })
    }
}
