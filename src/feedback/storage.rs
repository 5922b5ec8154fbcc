use super::{Comment, Rating, RatingSummary};
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Builder, Connection, Database};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Default)]
struct Fallback {
    comments: Vec<Comment>,
    ratings: Vec<Rating>,
}

struct Store {
    _db: Database,
    // One shared connection; `:memory:` databases are per-connection.
    conn: Connection,
}

/// Append-only comment and rating collections.
pub struct FeedbackStorage {
    db: Option<Store>,
    // In-memory fallback storage
    fallback: Arc<Mutex<Fallback>>,
}

impl FeedbackStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let mut storage = Self {
            db: None,
            fallback: Arc::new(Mutex::new(Fallback::default())),
        };

        match storage.init_database(db_path).await {
            Ok(()) => {
                info!("Feedback database initialized: {}", db_path);
            }
            Err(e) => {
                warn!(
                    "Feedback database initialization failed, using in-memory fallback: {}",
                    e
                );
            }
        }

        Ok(storage)
    }

    async fn init_database(&mut self, db_path: &str) -> Result<()> {
        let db = Builder::new_local(db_path).build().await?;

        let conn = db.connect()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
            (),
        )
        .await?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS ratings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                value INTEGER NOT NULL CHECK (value BETWEEN 1 AND 5),
                created_at TEXT NOT NULL
            )
            "#,
            (),
        )
        .await?;

        self.db = Some(Store { _db: db, conn });
        Ok(())
    }

    pub async fn add_comment(&self, comment: Comment) -> Result<Comment> {
        if let Some(ref store) = self.db {
            match self.insert_comment(&store.conn, &comment).await {
                Ok(id) => {
                    debug!("Comment {} saved to database", id);
                    return Ok(Comment {
                        id: Some(id),
                        ..comment
                    });
                }
                Err(e) => {
                    warn!("Failed to save comment to database, using fallback: {}", e);
                }
            }
        }

        self.lock_fallback()?.comments.push(comment.clone());
        Ok(comment)
    }

    async fn insert_comment(&self, conn: &Connection, comment: &Comment) -> Result<i64> {
        let mut rows = conn
            .query(
                "INSERT INTO comments (name, text, created_at) VALUES (?, ?, ?) RETURNING id",
                (
                    comment.name.as_str(),
                    comment.text.as_str(),
                    format_timestamp(&comment.timestamp),
                ),
            )
            .await?;
        returned_id(&mut rows).await
    }

    /// All comments, newest first.
    pub async fn list_comments(&self) -> Result<Vec<Comment>> {
        let mut comments = Vec::new();
        if let Some(ref store) = self.db {
            match self.select_comments(&store.conn).await {
                Ok(stored) => {
                    debug!("Retrieved {} comments from database", stored.len());
                    comments = stored;
                }
                Err(e) => {
                    warn!("Failed to read comments from database, using fallback: {}", e);
                }
            }
        }

        // Rows whose database write failed live only in the fallback.
        let mut pending = self.lock_fallback()?.comments.clone();
        pending.reverse();
        comments.extend(pending);

        // Stable sort keeps later inserts first among equal timestamps.
        comments.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(comments)
    }

    async fn select_comments(&self, conn: &Connection) -> Result<Vec<Comment>> {
        let mut rows = conn
            .query(
                "SELECT id, name, text, created_at FROM comments ORDER BY created_at DESC, id DESC",
                (),
            )
            .await?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            let created_at: String = row.get(3)?;
            comments.push(Comment {
                id: Some(row.get(0)?),
                name: row.get(1)?,
                text: row.get(2)?,
                timestamp: parse_timestamp(&created_at)?,
            });
        }
        Ok(comments)
    }

    pub async fn add_rating(&self, rating: Rating) -> Result<Rating> {
        if let Some(ref store) = self.db {
            match self.insert_rating(&store.conn, &rating).await {
                Ok(id) => {
                    debug!("Rating {} saved to database", id);
                    return Ok(Rating {
                        id: Some(id),
                        ..rating
                    });
                }
                Err(e) => {
                    warn!("Failed to save rating to database, using fallback: {}", e);
                }
            }
        }

        self.lock_fallback()?.ratings.push(rating.clone());
        Ok(rating)
    }

    async fn insert_rating(&self, conn: &Connection, rating: &Rating) -> Result<i64> {
        let mut rows = conn
            .query(
                "INSERT INTO ratings (value, created_at) VALUES (?, ?) RETURNING id",
                (rating.value, format_timestamp(&rating.timestamp)),
            )
            .await?;
        returned_id(&mut rows).await
    }

    pub async fn list_ratings(&self) -> Result<Vec<Rating>> {
        let mut ratings = Vec::new();
        if let Some(ref store) = self.db {
            match self.select_ratings(&store.conn).await {
                Ok(stored) => ratings = stored,
                Err(e) => {
                    warn!("Failed to read ratings from database, using fallback: {}", e);
                }
            }
        }

        ratings.extend(self.lock_fallback()?.ratings.iter().cloned());
        Ok(ratings)
    }

    async fn select_ratings(&self, conn: &Connection) -> Result<Vec<Rating>> {
        let mut rows = conn
            .query("SELECT id, value, created_at FROM ratings", ())
            .await?;

        let mut ratings = Vec::new();
        while let Some(row) = rows.next().await? {
            let created_at: String = row.get(2)?;
            ratings.push(Rating {
                id: Some(row.get(0)?),
                value: row.get(1)?,
                timestamp: parse_timestamp(&created_at)?,
            });
        }
        Ok(ratings)
    }

    /// Reads every rating and reduces in process.
    pub async fn rating_summary(&self) -> Result<RatingSummary> {
        let values: Vec<i64> = self
            .list_ratings()
            .await?
            .into_iter()
            .map(|r| r.value)
            .collect();
        Ok(RatingSummary::from_values(&values))
    }

    fn lock_fallback(&self) -> Result<std::sync::MutexGuard<'_, Fallback>> {
        self.fallback
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}

async fn returned_id(rows: &mut libsql::Rows) -> Result<i64> {
    match rows.next().await? {
        Some(row) => Ok(row.get(0)?),
        None => Err(Error::internal("INSERT returned no id")),
    }
}

// Fixed-width so lexical order in SQL matches chronological order.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::internal(format!("Failed to parse timestamp: {e}")))
}
