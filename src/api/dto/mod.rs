//! Data Transfer Objects for REST response serialization.

pub mod score_dto;

pub use score_dto::*;
