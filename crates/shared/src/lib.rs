//! Shared utilities and common types for the GatePass backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Password hashing with Argon2id
//! - Organizer access tokens (HS256 JWT)
//! - Shareable event and ticket code generation
//! - Input normalization and validation helpers

pub mod codes;
pub mod jwt;
pub mod password;
pub mod validation;
