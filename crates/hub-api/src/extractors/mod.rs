//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, pagination and ids.

mod auth;
mod pagination;
mod path;
mod query;
mod validated;

pub use auth::{AdminUser, AuthUser, OptionalAuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use pagination::{Pagination, PaginationParams};
pub use path::IdPath;
pub use query::ApiQuery;
pub use validated::{OptionalValidatedJson, ValidatedJson};
