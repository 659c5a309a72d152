//! # Generic CRUD
//!
//! A single repository implementation parameterised by a [`Resource`]:
//! the resource supplies its SQL and how to bind a draft, the repository
//! supplies validation, error mapping and logging.

use std::fmt;
use std::marker::PhantomData;

use cashier_core::Validate;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A query with its positional arguments.
pub type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

// =============================================================================
// Resource
// =============================================================================

/// A table the generic repository can manage.
///
/// ## Contract
/// - `SELECT_ALL` / `SELECT_BY_ID` return columns matching the `FromRow`
///   impl; `SELECT_BY_ID` takes the id as its only parameter
/// - `INSERT` takes exactly the parameters bound by [`Resource::bind_draft`]
/// - `UPDATE` takes the draft parameters followed by the id
pub trait Resource: for<'r> FromRow<'r, SqliteRow> + Send + Unpin + 'static {
    /// Client-supplied fields for create and update.
    type Draft: Validate + Send + Sync;

    /// Human name used in errors and logs.
    const ENTITY: &'static str;
    const TABLE: &'static str;

    const SELECT_ALL: &'static str;
    const SELECT_BY_ID: &'static str;
    const INSERT: &'static str;
    const UPDATE: &'static str;

    /// Binds the draft's columns in `INSERT`/`UPDATE` order.
    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &Self::Draft) -> SqliteQuery<'q>;
}

// =============================================================================
// Repository
// =============================================================================

/// CRUD operations for one resource.
pub struct Repository<R> {
    pool: SqlitePool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> fmt::Debug for Repository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("entity", &R::ENTITY)
            .finish()
    }
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    /// All rows, ordered by id.
    pub async fn list(&self) -> DbResult<Vec<R>> {
        let rows = sqlx::query_as::<_, R>(R::SELECT_ALL)
            .fetch_all(&self.pool)
            .await?;

        debug!(entity = R::ENTITY, count = rows.len(), "Listed");
        Ok(rows)
    }

    /// One row by id, or `DbError::NotFound`.
    pub async fn get(&self, id: i64) -> DbResult<R> {
        sqlx::query_as::<_, R>(R::SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(R::ENTITY, id))
    }

    /// Validates and inserts a draft, returning the stored row.
    pub async fn create(&self, draft: &R::Draft) -> DbResult<R> {
        draft.validate()?;

        let result = R::bind_draft(sqlx::query(R::INSERT), draft)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        debug!(entity = R::ENTITY, id, "Created");

        self.get(id).await
    }

    /// Validates and replaces every draft field of an existing row.
    pub async fn update(&self, id: i64, draft: &R::Draft) -> DbResult<R> {
        draft.validate()?;

        let result = R::bind_draft(sqlx::query(R::UPDATE), draft)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(R::ENTITY, id));
        }

        debug!(entity = R::ENTITY, id, "Updated");
        self.get(id).await
    }

    /// Deletes a row by id.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(R::ENTITY, id));
        }

        debug!(entity = R::ENTITY, id, "Deleted");
        Ok(())
    }

    /// Number of rows.
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}
