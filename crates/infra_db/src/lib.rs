//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the conversation notebook using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: repositories own the SQL and
//! work with row types, adapters implement the domain ports on top of them
//! and translate rows into domain models.
//!
//! Schema migrations live in the workspace `migrations/` directory and are
//! embedded at compile time (see [`MIGRATOR`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresConversationAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/conversations")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresConversationAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::PostgresConversationAdapter;
