use std::time::Duration;

use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use uuid::Uuid;

use crate::db::{Message, MessageKind, Participant};

use super::{Store, StoreError, StoreResult};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS participants (
        name TEXT PRIMARY KEY NOT NULL,
        last_status INTEGER NOT NULL
    )",
    // seq gives insertion order, which is also chronological order
    "CREATE TABLE IF NOT EXISTS messages (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT UNIQUE NOT NULL,
        from_name TEXT NOT NULL,
        to_name TEXT NOT NULL,
        text TEXT NOT NULL,
        kind TEXT NOT NULL,
        time TEXT NOT NULL
    )",
];

type MessageRow = (String, String, String, String, String, String);

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and creates the tables if they are missing.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        // every connection to an in-memory database is its own database
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(16)
        };

        let db_pool = options.connect(url).await?;
        Self::from_pool(db_pool).await
    }

    pub async fn from_pool(db_pool: SqlitePool) -> StoreResult<Self> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&db_pool).await?;
        }
        Ok(Self { db_pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db_pool
    }
}

fn message_from_row((id, from, to, text, kind, time): MessageRow) -> StoreResult<Message> {
    let id = Uuid::parse_str(&id).map_err(|e| StoreError::Corrupt(format!("message id {id:?}: {e}")))?;
    let kind: MessageKind = kind.parse().map_err(|e| StoreError::Corrupt(format!("message {id}: {e}")))?;
    Ok(Message { id, from, to, text, kind, time })
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_participant(&self, participant: &Participant) -> StoreResult<()> {
        let result = sqlx::query("INSERT INTO participants (name,last_status) VALUES (?,?)")
            .bind(&participant.name)
            .bind(participant.last_status)
            .execute(&self.db_pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateName(participant.name.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        let row: Option<(String, i64)> = sqlx::query_as("SELECT name,last_status FROM participants WHERE name=?")
            .bind(name)
            .fetch_optional(&self.db_pool)
            .await?;

        Ok(row.map(|(name, last_status)| Participant { name, last_status }))
    }

    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        let rows: Vec<(String, i64)> = sqlx::query_as("SELECT name,last_status FROM participants")
            .fetch_all(&self.db_pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(name, last_status)| Participant { name, last_status })
            .collect())
    }

    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool> {
        let result = sqlx::query("UPDATE participants SET last_status=? WHERE name=?")
            .bind(last_status)
            .bind(name)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_participant_if_idle(&self, name: &str, cutoff: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM participants WHERE name=? AND last_status<?")
            .bind(name)
            .bind(cutoff)
            .execute(&self.db_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_message(&self, message: &Message) -> StoreResult<()> {
        sqlx::query("INSERT INTO messages (id,from_name,to_name,text,kind,time) VALUES (?,?,?,?,?,?)")
            .bind(message.id.to_string())
            .bind(&message.from)
            .bind(&message.to)
            .bind(&message.text)
            .bind(message.kind.as_str())
            .bind(&message.time)
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn list_messages(&self) -> StoreResult<Vec<Message>> {
        let rows: Vec<MessageRow> =
            sqlx::query_as("SELECT id,from_name,to_name,text,kind,time FROM messages ORDER BY seq")
                .fetch_all(&self.db_pool)
                .await?;

        rows.into_iter().map(message_from_row).collect()
    }
}
