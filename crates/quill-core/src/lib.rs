//! # Quill Core
//!
//! The domain layer of Quill.
//! This crate contains the publishing workflow (posts, tags, comments, search)
//! with zero infrastructure dependencies. Storage and authentication are
//! reached through the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::{DomainError, DomainResult};
