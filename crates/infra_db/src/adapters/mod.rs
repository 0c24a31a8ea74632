//! Domain Adapters
//!
//! Adapter implementations connecting domain ports to the PostgreSQL layer.
//! Each adapter implements its domain's port trait, translates between domain
//! models and row types, and uses the repository layer for database access.

pub mod conversation;

pub use conversation::PostgresConversationAdapter;
