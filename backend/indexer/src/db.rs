//! Database layer — migrations, queries, and cursor management.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::Result;
use crate::events::{EventRecord, FundingEvent};

/// Establish a SQLite connection pool and run pending migrations.
///
/// The database file is created if it doesn't exist yet.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied successfully");
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Cursor helpers
// ─────────────────────────────────────────────────────────

/// Read the last-seen ledger from the cursor row.
/// Returns `0` when no cursor has been persisted yet.
pub async fn get_last_ledger(pool: &SqlitePool) -> Result<i64> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT last_ledger FROM indexer_cursor WHERE id = 1")
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(v,)| v).unwrap_or(0))
}

/// Persist the last-seen ledger (and optionally a pagination cursor string).
pub async fn save_cursor(
    pool: &SqlitePool,
    last_ledger: i64,
    last_cursor: Option<&str>,
) -> Result<()> {
    sqlx::query("UPDATE indexer_cursor SET last_ledger = ?1, last_cursor = ?2 WHERE id = 1")
        .bind(last_ledger)
        .bind(last_cursor)
        .execute(pool)
        .await?;
    Ok(())
}

/// Read back the raw cursor string (used to resume pagination mid-ledger).
pub async fn get_cursor_string(pool: &SqlitePool) -> Result<Option<String>> {
    let row: Option<(Option<String>,)> =
        sqlx::query_as("SELECT last_cursor FROM indexer_cursor WHERE id = 1")
            .fetch_optional(pool)
            .await?;
    Ok(row.and_then(|(v,)| v))
}

// ─────────────────────────────────────────────────────────
// Event writes
// ─────────────────────────────────────────────────────────

/// Persist a batch of decoded events inside one transaction. Events whose
/// `event_id` is already stored are silently ignored, so re-polling the
/// same ledger range is harmless.
pub async fn insert_events(pool: &SqlitePool, events: &[FundingEvent]) -> Result<usize> {
    let mut tx = pool.begin().await?;
    let mut count = 0usize;
    for ev in events {
        let rows_affected = sqlx::query(
            r#"
            INSERT OR IGNORE INTO events
                (event_id, event_type, investor, amount, ledger, timestamp, contract_id, tx_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&ev.event_id)
        .bind(&ev.event_type)
        .bind(&ev.investor)
        .bind(&ev.amount)
        .bind(ev.ledger)
        .bind(ev.timestamp)
        .bind(&ev.contract_id)
        .bind(&ev.tx_hash)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        count += rows_affected as usize;
    }
    tx.commit().await?;
    Ok(count)
}

// ─────────────────────────────────────────────────────────
// Event reads
// ─────────────────────────────────────────────────────────

/// Fetch all events for a given investor, ordered by ledger ascending.
pub async fn get_events_for_investor(
    pool: &SqlitePool,
    investor: &str,
) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, investor, amount, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        WHERE  investor = ?1
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .bind(investor)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Fetch all events, ordered by ledger ascending.
pub async fn get_all_events(pool: &SqlitePool) -> Result<Vec<EventRecord>> {
    let rows = sqlx::query_as::<_, EventRecord>(
        r#"
        SELECT id, event_id, event_type, investor, amount, ledger, timestamp,
               contract_id, tx_hash, created_at
        FROM   events
        ORDER  BY ledger ASC, id ASC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One connection, since every `sqlite::memory:` connection is its own database.
    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    fn event(event_id: &str, event_type: &str, investor: Option<&str>, ledger: i64) -> FundingEvent {
        FundingEvent {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            investor: investor.map(String::from),
            amount: Some("1000000".to_string()),
            ledger,
            timestamp: 1_704_067_200,
            contract_id: "CONTRACT1".to_string(),
            tx_hash: Some("ab".repeat(32)),
        }
    }

    #[tokio::test]
    async fn cursor_starts_at_zero_and_persists() {
        let pool = memory_pool().await;
        assert_eq!(get_last_ledger(&pool).await.unwrap(), 0);
        assert_eq!(get_cursor_string(&pool).await.unwrap(), None);

        save_cursor(&pool, 4_200, Some("0000-1")).await.unwrap();

        assert_eq!(get_last_ledger(&pool).await.unwrap(), 4_200);
        assert_eq!(
            get_cursor_string(&pool).await.unwrap().as_deref(),
            Some("0000-1")
        );
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let pool = memory_pool().await;
        let batch = vec![
            event("ev-1", "initialized", None, 10),
            event("ev-2", "invested", Some("GA"), 11),
        ];

        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 0);
        assert_eq!(get_all_events(&pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn same_transaction_events_are_kept_apart_by_event_id() {
        let pool = memory_pool().await;
        let batch = vec![
            event("ev-1", "invested", Some("GA"), 11),
            event("ev-2", "invested", Some("GA"), 11),
        ];

        assert_eq!(insert_events(&pool, &batch).await.unwrap(), 2);
        assert_eq!(get_events_for_investor(&pool, "GA").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn events_filter_by_investor_in_ledger_order() {
        let pool = memory_pool().await;
        let batch = vec![
            event("ev-3", "refunded", Some("GA"), 30),
            event("ev-1", "invested", Some("GA"), 10),
            event("ev-2", "invested", Some("GB"), 20),
        ];
        insert_events(&pool, &batch).await.unwrap();

        let for_a = get_events_for_investor(&pool, "GA").await.unwrap();
        assert_eq!(for_a.len(), 2);
        assert_eq!(for_a[0].event_id, "ev-1");
        assert_eq!(for_a[1].event_id, "ev-3");

        let all = get_all_events(&pool).await.unwrap();
        let ledgers: Vec<i64> = all.iter().map(|e| e.ledger).collect();
        assert_eq!(ledgers, vec![10, 20, 30]);
    }
}
