//! Model to entity mappers
//!
//! Enum columns are stored as text, so every conversion is a `TryFrom`
//! that rejects values the domain does not know.

mod chat;
mod comment;
mod coupon;
mod ledger;
mod member;
mod post;
mod roadmap;

use hub_core::error::DomainError;

/// Decode a text column into a domain enum
pub(crate) fn parse_column<T>(
    column: &'static str,
    raw: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, DomainError> {
    parse(raw).ok_or_else(|| DomainError::DatabaseError(format!("unexpected {column} value: {raw}")))
}

/// Convert a batch of rows, failing on the first bad one
pub(crate) fn convert_all<M, E>(rows: Vec<M>) -> Result<Vec<E>, DomainError>
where
    E: TryFrom<M, Error = DomainError>,
{
    rows.into_iter().map(E::try_from).collect()
}
