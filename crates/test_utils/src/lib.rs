//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures and helpers for the conversation
//! notebook test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data, including a complete sample dialogue
//! - `builders`: Builder patterns for test data construction
//! - `database`: PostgreSQL test containers with the schema applied
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use generators::*;
