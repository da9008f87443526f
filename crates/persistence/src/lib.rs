//! Persistence layer for the GatePass backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the PostgreSQL ticket store

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
