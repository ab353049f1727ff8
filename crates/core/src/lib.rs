//! `clubhub-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no persistence concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{ClubId, EventId, ReportId, UserId};
pub use value_object::ValueObject;
