//! Request extractors that reject with [`CampBarError`]
//!
//! Wrap axum's `Json`, `Path` and `Query` so malformed input leaves the API
//! in the usual error envelope instead of axum's plain-text rejections.

use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::utils::errors::{CampBarError, Result};

/// JSON request body
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

/// Typed path parameters
#[derive(Debug, Clone)]
pub struct PathParams<T>(pub T);

/// Typed query string
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl From<JsonRejection> for CampBarError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "Rejected request body");
        let message = match rejection {
            JsonRejection::JsonDataError(_) => "Request body has missing or invalid fields",
            JsonRejection::JsonSyntaxError(_) => "Request body is not valid JSON",
            JsonRejection::MissingJsonContentType(_) => "Expected a JSON request body",
            _ => "Could not read request body",
        };
        CampBarError::Validation(message.to_string())
    }
}

impl From<PathRejection> for CampBarError {
    fn from(rejection: PathRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "Rejected path parameters");
        CampBarError::Validation("Invalid path parameter".to_string())
    }
}

impl From<QueryRejection> for CampBarError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "Rejected query string");
        CampBarError::Validation("Invalid query parameter".to_string())
    }
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CampBarError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = CampBarError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(PathParams(value))
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = CampBarError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}
