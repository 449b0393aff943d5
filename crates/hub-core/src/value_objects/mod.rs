//! Value objects - immutable domain primitives

mod id;
mod page;
mod roles;

pub use id::{Id, IdGenerator, IdParseError};
pub use page::{Page, PageRequest};
pub use roles::Roles;
