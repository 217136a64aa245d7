//! Authentication primitives.
//!
//! - [`jwt`] -- JWT issue, validation and refresh.
//! - [`email`] -- delivery of emailed login codes.

pub mod email;
pub mod jwt;
