//! PostgreSQL Conversation Adapter
//!
//! Implements `ConversationPort` on top of `ConversationRepository`,
//! translating between row types and domain models and between
//! `DatabaseError` and `PortError`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresConversationAdapter;
//! use domain_conversation::ConversationPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ConversationPort> = Arc::new(PostgresConversationAdapter::new(pool));
//! let conversation = port.get_conversation(id, user_id).await?;
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use core_kernel::{
    ConversationId, DomainPort, HealthCheckResult, HealthCheckable, PortError,
    SentenceId, UserId,
};
use domain_conversation::{
    Conversation, ConversationPort, ConversationSummary, Level, NewConversation, NewSentence,
    Sentence, SpeakerType,
};

use crate::error::DatabaseError;
use crate::repositories::conversation::{
    ConversationRepository, ConversationRow, Level as DbLevel, NewConversationRow, NewSentenceRow,
    SentenceRow, SpeakerType as DbSpeakerType,
};

const ADAPTER_ID: &str = "postgres-conversation-adapter";

/// PostgreSQL-backed implementation of the ConversationPort trait
///
/// # Error Handling
///
/// - `DatabaseError::NotFound` -> `PortError::NotFound`
/// - constraint violations -> `PortError::Conflict`
/// - connection errors -> `PortError::Connection`
/// - anything else -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PostgresConversationAdapter {
    repository: ConversationRepository,
    pool: PgPool,
}

impl PostgresConversationAdapter {
    /// Creates a new PostgreSQL conversation adapter
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ConversationRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresConversationAdapter {}

#[async_trait]
impl HealthCheckable for PostgresConversationAdapter {
    /// Runs `SELECT 1` against the pool
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl ConversationPort for PostgresConversationAdapter {
    #[instrument(skip(self), fields(user_id = %owner))]
    async fn list_conversations(&self, owner: UserId) -> Result<Vec<ConversationSummary>, PortError> {
        let rows = self
            .repository
            .list_by_owner(owner.into())
            .await
            .map_err(db_to_port_error)?;

        debug!(count = rows.len(), "Listed conversations");
        Ok(rows.into_iter().map(row_to_summary).collect())
    }

    #[instrument(skip(self), fields(conversation_id = %id, user_id = %owner))]
    async fn get_conversation(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Conversation, PortError> {
        let row = self
            .repository
            .get_owned(id.into(), owner.into())
            .await
            .map_err(|e| not_found_as_port(e, id))?;

        let sentences = self
            .repository
            .list_sentences(row.id)
            .await
            .map_err(db_to_port_error)?;

        Ok(row_to_conversation(row, sentences))
    }

    #[instrument(skip(self, request), fields(user_id = %owner, level = %request.level))]
    async fn create_conversation(
        &self,
        owner: UserId,
        request: NewConversation,
    ) -> Result<Conversation, PortError> {
        let row = self
            .repository
            .insert(NewConversationRow {
                id: ConversationId::new_v7().into(),
                user_id: owner.into(),
                level: domain_to_db_level(request.level),
                course: request.course,
                lesson: request.lesson,
            })
            .await
            .map_err(db_to_port_error)?;

        info!(conversation_id = %row.id, "Conversation created");
        Ok(row_to_conversation(row, Vec::new()))
    }

    #[instrument(skip(self, request), fields(conversation_id = %id, user_id = %owner))]
    async fn add_sentence(
        &self,
        id: ConversationId,
        owner: UserId,
        request: NewSentence,
    ) -> Result<Sentence, PortError> {
        let row = self
            .repository
            .insert_sentence(
                owner.into(),
                NewSentenceRow {
                    id: SentenceId::new_v7().into(),
                    conversation_id: id.into(),
                    position: request.position,
                    speaker: domain_to_db_speaker(request.speaker),
                    text: request.text,
                },
            )
            .await
            .map_err(|e| not_found_as_port(e, id))?;

        debug!(position = row.position, "Sentence added");
        Ok(row_to_sentence(row))
    }

    #[instrument(skip(self), fields(conversation_id = %id, user_id = %owner))]
    async fn delete_conversation(&self, id: ConversationId, owner: UserId) -> Result<(), PortError> {
        let deleted = self
            .repository
            .delete_owned(id.into(), owner.into())
            .await
            .map_err(db_to_port_error)?;

        if deleted == 0 {
            return Err(PortError::not_found("Conversation", id));
        }

        info!("Conversation deleted");
        Ok(())
    }
}

/// Converts a DatabaseError to a PortError
fn db_to_port_error(e: DatabaseError) -> PortError {
    if e.is_constraint_violation() {
        return PortError::conflict(e.to_string());
    }
    match e {
        DatabaseError::NotFound(msg) => PortError::NotFound {
            entity_type: "Record".to_string(),
            id: msg,
        },
        DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => {
            PortError::connection(e.to_string())
        }
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Like `db_to_port_error`, but reports the conversation id on NotFound
fn not_found_as_port(e: DatabaseError, id: ConversationId) -> PortError {
    if e.is_not_found() {
        PortError::not_found("Conversation", id)
    } else {
        db_to_port_error(e)
    }
}

fn row_to_summary(row: ConversationRow) -> ConversationSummary {
    ConversationSummary {
        id: ConversationId::from(row.id),
        level: db_to_domain_level(row.level),
        course: row.course,
        lesson: row.lesson,
        created_at: row.created_at,
    }
}

fn row_to_conversation(row: ConversationRow, sentences: Vec<SentenceRow>) -> Conversation {
    Conversation {
        id: ConversationId::from(row.id),
        owner: UserId::from(row.user_id),
        level: db_to_domain_level(row.level),
        course: row.course,
        lesson: row.lesson,
        sentences: sentences.into_iter().map(row_to_sentence).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

fn row_to_sentence(row: SentenceRow) -> Sentence {
    Sentence {
        id: SentenceId::from(row.id),
        conversation_id: ConversationId::from(row.conversation_id),
        position: row.position,
        speaker: db_to_domain_speaker(row.speaker),
        text: row.text,
        created_at: row.created_at,
    }
}

fn domain_to_db_level(level: Level) -> DbLevel {
    match level {
        Level::A1 => DbLevel::A1,
        Level::A2 => DbLevel::A2,
        Level::B1 => DbLevel::B1,
        Level::B2 => DbLevel::B2,
        Level::C1 => DbLevel::C1,
        Level::C2 => DbLevel::C2,
        Level::Business => DbLevel::Business,
    }
}

fn db_to_domain_level(level: DbLevel) -> Level {
    match level {
        DbLevel::A1 => Level::A1,
        DbLevel::A2 => Level::A2,
        DbLevel::B1 => Level::B1,
        DbLevel::B2 => Level::B2,
        DbLevel::C1 => Level::C1,
        DbLevel::C2 => Level::C2,
        DbLevel::Business => Level::Business,
    }
}

fn domain_to_db_speaker(speaker: SpeakerType) -> DbSpeakerType {
    match speaker {
        SpeakerType::Description => DbSpeakerType::Description,
        SpeakerType::PersonA => DbSpeakerType::PersonA,
        SpeakerType::PersonB => DbSpeakerType::PersonB,
    }
}

fn db_to_domain_speaker(speaker: DbSpeakerType) -> SpeakerType {
    match speaker {
        DbSpeakerType::Description => SpeakerType::Description,
        DbSpeakerType::PersonA => SpeakerType::PersonA,
        DbSpeakerType::PersonB => SpeakerType::PersonB,
    }
}
