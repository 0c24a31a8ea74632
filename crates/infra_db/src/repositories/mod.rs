//! Repository implementations
//!
//! Repositories encapsulate the SQL for each aggregate and map between
//! database rows and plain row structs. Queries are built at runtime with
//! `sqlx::query_as` and bound parameters, so the crate compiles without a
//! live database.

pub mod conversation;

pub use conversation::ConversationRepository;
