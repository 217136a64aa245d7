//! Domain types, constants and pure validation logic shared by the
//! database and API crates.

pub mod blog;
pub mod category;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod survey;
pub mod task;
pub mod types;
pub mod verification;
