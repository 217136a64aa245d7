//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `inkwell_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod blog;
pub mod category;
pub mod export;
pub mod survey;
pub mod task;
pub mod user;
