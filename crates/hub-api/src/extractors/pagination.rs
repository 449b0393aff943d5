//! Pagination extractor
//!
//! Extracts zero-based `page` / `size` parameters from query strings.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use hub_core::PageRequest;
use serde::Deserialize;

use super::query::ApiQuery;
use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

/// Validated page request; size is clamped to 1-100
#[derive(Debug, Clone, Copy, Default)]
pub struct Pagination(pub PageRequest);

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self(PageRequest::new(
            params.page.unwrap_or(0),
            params.size.unwrap_or(PageRequest::DEFAULT_SIZE),
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ApiQuery(params) = ApiQuery::<PaginationParams>::from_request_parts(parts, state).await?;
        Ok(Self::from(params))
    }
}
