//! PostgreSQL implementation of MessageRepository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::{debug, instrument};
use validator::Validate;

use chat_core::{
    Message, MessageColor, MessageKind, MessageRepository, NewMessage, RepoResult, RowId,
};

use crate::mappers::{MessageInsert, WrittenColumns};
use crate::models::{InsertedMessageModel, MessageModel};
use crate::pool::ConnectionManager;
use crate::schema::{OptionalColumn, SchemaProbe};

use super::error::{conversation_not_found, map_db_error, map_foreign_key_violation};

/// Optional message columns, in select-list order
const MESSAGE_COLUMNS: [OptionalColumn; 4] = [
    OptionalColumn::MessageColor,
    OptionalColumn::MessageType,
    OptionalColumn::AudioFilePath,
    OptionalColumn::AudioDuration,
];

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    manager: Arc<ConnectionManager>,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn list_by_conversation(&self, conversation_id: RowId) -> RepoResult<Vec<Message>> {
        self.manager
            .with_transaction(move |conn| Box::pin(select_messages(conn, conversation_id)))
            .await
    }

    #[instrument(skip(self, message), fields(conversation_id = %message.conversation_id))]
    async fn append(&self, message: &NewMessage) -> RepoResult<Message> {
        message.validate()?;
        let message = message.clone();
        self.manager
            .with_transaction(move |conn| Box::pin(insert_message(conn, message)))
            .await
    }
}

async fn select_messages(
    conn: &mut PgConnection,
    conversation_id: RowId,
) -> RepoResult<Vec<Message>> {
    let mut probe = SchemaProbe::new();
    let mut optional = Vec::with_capacity(MESSAGE_COLUMNS.len());
    for column in MESSAGE_COLUMNS {
        let present = probe.has_column(conn, column).await?;
        optional.push(column.select_expr("m", present));
    }

    let sql = format!(
        r"
        SELECT m.id, m.conversation_id, m.sender_id, m.content, m.timestamp,
               {},
               u.avatar_key AS sender_avatar
        FROM messages m
        LEFT JOIN users u ON u.id = m.sender_id
        WHERE m.conversation_id = $1
        ORDER BY COALESCE(m.timestamp, 'epoch'::timestamptz) ASC, m.id ASC
        ",
        optional.join(", ")
    );

    let results = sqlx::query_as::<_, MessageModel>(&sql)
        .bind(conversation_id.into_inner())
        .fetch_all(&mut *conn)
        .await
        .map_err(map_db_error)?;

    debug!(%conversation_id, count = results.len(), "Fetched messages");
    Ok(results.into_iter().map(Message::from).collect())
}

async fn insert_message(conn: &mut PgConnection, message: NewMessage) -> RepoResult<Message> {
    let conversation_id = message.conversation_id;
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM conversations WHERE id = $1)",
    )
    .bind(conversation_id.into_inner())
    .fetch_one(&mut *conn)
    .await
    .map_err(map_db_error)?;
    if !exists {
        return Err(conversation_not_found(conversation_id));
    }

    let mut probe = SchemaProbe::new();
    let color = match &message.color {
        Some(color) => color.clone(),
        None => preferred_color(conn, &mut probe, message.sender_id).await?,
    };
    let insert = MessageInsert::new(&message, &color);

    let written = WrittenColumns {
        color: probe.try_ensure(conn, OptionalColumn::MessageColor).await,
        kind: match insert.kind {
            MessageKind::Audio => probe.try_ensure(conn, OptionalColumn::MessageType).await,
            MessageKind::Text => probe.has_column(conn, OptionalColumn::MessageType).await?,
        },
        audio: insert.audio.is_some()
            && probe.try_ensure(conn, OptionalColumn::AudioFilePath).await
            && probe.try_ensure(conn, OptionalColumn::AudioDuration).await,
    };

    let mut query: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("INSERT INTO messages (conversation_id, sender_id, content, timestamp");
    if written.color {
        query.push(", message_color");
    }
    if written.kind {
        query.push(", message_type");
    }
    if written.audio {
        query.push(", audio_file_path, audio_duration");
    }

    query.push(") VALUES (");
    query.push_bind(insert.conversation_id);
    query.push(", ").push_bind(insert.sender_id);
    query.push(", ").push_bind(insert.content);
    query.push(", NOW()");
    if written.color {
        query.push(", ").push_bind(insert.color.as_str());
    }
    if written.kind {
        query.push(", ").push_bind(insert.kind.as_str());
    }
    if let Some(clip) = insert.audio.filter(|_| written.audio) {
        query.push(", ").push_bind(clip.file_path.as_str());
        query.push(", ").push_bind(clip.duration_secs);
    }
    query.push(
        r") RETURNING id, timestamp,
            (SELECT u.avatar_key FROM users u WHERE u.id = messages.sender_id) AS sender_avatar",
    );

    let inserted = query
        .build_query_as::<InsertedMessageModel>()
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_foreign_key_violation(e, || conversation_not_found(conversation_id)))?;

    debug!(message_id = inserted.id, ?written, "Message appended");
    Ok(insert.into_message(inserted, written))
}

/// Sender's stored colour, or the default when unset or the column is absent
async fn preferred_color(
    conn: &mut PgConnection,
    probe: &mut SchemaProbe,
    sender_id: RowId,
) -> RepoResult<MessageColor> {
    if !probe.has_column(conn, OptionalColumn::UserMessageColor).await? {
        return Ok(MessageColor::default());
    }

    let stored = sqlx::query_scalar::<_, Option<String>>(
        "SELECT message_color FROM users WHERE id = $1",
    )
    .bind(sender_id.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(MessageColor::stored_or_default(stored.flatten().as_deref()))
}
