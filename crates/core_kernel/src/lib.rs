//! Core Kernel - Foundational types shared by every layer of the conversation notebook
//!
//! This crate provides the building blocks used across the workspace:
//! - Strongly-typed identifiers for users, conversations and sentences
//! - The port error type and marker traits for the ports-and-adapters layout

pub mod identifiers;
pub mod ports;

pub use identifiers::{ConversationId, SentenceId, UserId};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
