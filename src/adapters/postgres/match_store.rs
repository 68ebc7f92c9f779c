//! PostgreSQL implementation of MatchStore.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::commentary::{Commentary, NewCommentary};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::matches::{Match, MatchStatus, NewMatch};
use crate::ports::MatchStore;

/// Postgres error code for a foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL implementation of MatchStore.
#[derive(Clone)]
pub struct PostgresMatchStore {
    pool: PgPool,
}

impl PostgresMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PostgresMatchStore {
    async fn create_match(&self, new: NewMatch) -> Result<Match, DomainError> {
        let status = new.initial_status(Utc::now());

        let row = sqlx::query(
            r#"
            INSERT INTO matches (
                sport, home_team, away_team, status,
                start_time, end_time, home_score, away_score
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, sport, home_team, away_team, status,
                      start_time, end_time, home_score, away_score, created_at
            "#,
        )
        .bind(&new.sport)
        .bind(&new.home_team)
        .bind(&new.away_team)
        .bind(status.as_str())
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.home_score)
        .bind(new.away_score)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert match: {}", e),
            )
        })?;

        row_to_match(row)
    }

    async fn list_matches(&self, limit: u32) -> Result<Vec<Match>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, sport, home_team, away_team, status,
                   start_time, end_time, home_score, away_score, created_at
            FROM matches
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch matches: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_match).collect()
    }

    async fn create_commentary(
        &self,
        match_id: i64,
        new: NewCommentary,
    ) -> Result<Commentary, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO commentary (
                match_id, minute, sequence, period, event_type,
                actor, team, message, metadata, tags
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, match_id, minute, sequence, period, event_type,
                      actor, team, message, metadata, tags, created_at
            "#,
        )
        .bind(match_id)
        .bind(new.minute)
        .bind(new.sequence)
        .bind(&new.period)
        .bind(&new.event_type)
        .bind(&new.actor)
        .bind(&new.team)
        .bind(&new.message)
        .bind(&new.metadata)
        .bind(&new.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error().and_then(|d| d.code()) {
            // Violating the match_id foreign key means the match is gone.
            Some(code) if code == FOREIGN_KEY_VIOLATION => DomainError::new(
                ErrorCode::MatchNotFound,
                format!("Match not found: {}", match_id),
            ),
            _ => DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to insert commentary: {}", e),
            ),
        })?;

        row_to_commentary(row)
    }

    async fn list_commentary(
        &self,
        match_id: i64,
        limit: u32,
    ) -> Result<Vec<Commentary>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, match_id, minute, sequence, period, event_type,
                   actor, team, message, metadata, tags, created_at
            FROM commentary
            WHERE match_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(match_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch commentary: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_commentary).collect()
    }
}

fn row_to_match(row: PgRow) -> Result<Match, DomainError> {
    let status_str: String = get(&row, "status")?;
    let status = MatchStatus::parse(&status_str).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Unknown match status in database: {}", status_str),
        )
    })?;

    Ok(Match {
        id: get(&row, "id")?,
        sport: get(&row, "sport")?,
        home_team: get(&row, "home_team")?,
        away_team: get(&row, "away_team")?,
        status,
        start_time: get(&row, "start_time")?,
        end_time: get(&row, "end_time")?,
        home_score: get(&row, "home_score")?,
        away_score: get(&row, "away_score")?,
        created_at: get(&row, "created_at")?,
    })
}

fn row_to_commentary(row: PgRow) -> Result<Commentary, DomainError> {
    Ok(Commentary {
        id: get(&row, "id")?,
        match_id: get(&row, "match_id")?,
        minute: get(&row, "minute")?,
        sequence: get(&row, "sequence")?,
        period: get(&row, "period")?,
        event_type: get(&row, "event_type")?,
        actor: get(&row, "actor")?,
        team: get(&row, "team")?,
        message: get(&row, "message")?,
        metadata: get(&row, "metadata")?,
        tags: get(&row, "tags")?,
        created_at: get(&row, "created_at")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to decode column '{}': {}", column, e),
        )
    })
}
