mod ports;
mod repositories;

pub use ports::*;
pub use repositories::*;
