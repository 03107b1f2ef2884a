//! # Bloglist Shared
//!
//! Wire types for the HTTP API and the transforms that build them from
//! domain entities. Nothing here exposes a password hash.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
