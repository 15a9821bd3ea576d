use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgArguments, PgRow},
    FromRow, PgPool, Postgres,
};
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Category, Device, UserSession, Zone};
use super::retry::{with_insert_retry, with_retry};
use super::store::{DeviceLookup, EntityStore, SessionStore};

pub type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// Static description of a table and how to bind one of its rows
pub trait Table: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    const KEY: &'static str;
    /// Mutable columns, in the order `bind_columns` binds them
    const COLUMNS: &'static [&'static str];
    /// `EXISTS` query over referencing rows, `$1` is the key
    const DEPENDENTS: Option<&'static str> = None;

    fn key(&self) -> Uuid;
    fn date_created(&self) -> DateTime<Utc>;
    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q>;
}

impl Table for Category {
    const TABLE: &'static str = "category";
    const KEY: &'static str = "category_id";
    const COLUMNS: &'static [&'static str] = &["category_name", "category_description"];
    const DEPENDENTS: Option<&'static str> =
        Some("SELECT EXISTS(SELECT 1 FROM device WHERE category_id = $1)");

    fn key(&self) -> Uuid {
        self.category_id
    }

    fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.category_name.as_str())
            .bind(self.category_description.as_str())
    }
}

impl Table for Zone {
    const TABLE: &'static str = "zone";
    const KEY: &'static str = "zone_id";
    const COLUMNS: &'static [&'static str] = &["zone_name", "zone_description"];
    const DEPENDENTS: Option<&'static str> =
        Some("SELECT EXISTS(SELECT 1 FROM device WHERE zone_id = $1)");

    fn key(&self) -> Uuid {
        self.zone_id
    }

    fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.zone_name.as_str())
            .bind(self.zone_description.as_str())
    }
}

impl Table for Device {
    const TABLE: &'static str = "device";
    const KEY: &'static str = "device_id";
    const COLUMNS: &'static [&'static str] =
        &["device_name", "category_id", "zone_id", "status", "is_active"];

    fn key(&self) -> Uuid {
        self.device_id
    }

    fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query
            .bind(self.device_name.as_str())
            .bind(self.category_id)
            .bind(self.zone_id)
            .bind(self.status.as_str())
            .bind(self.is_active)
    }
}

impl Table for UserSession {
    const TABLE: &'static str = "user_session";
    const KEY: &'static str = "session_id";
    const COLUMNS: &'static [&'static str] = &["logout_date"];

    fn key(&self) -> Uuid {
        self.session_id
    }

    fn date_created(&self) -> DateTime<Utc> {
        self.date_created
    }

    fn bind_columns<'q>(&'q self, query: PgQuery<'q>) -> PgQuery<'q> {
        query.bind(self.logout_date)
    }
}

/// PostgreSQL-backed store for one table
pub struct PgRepository<T> {
    pool: PgPool,
    max_retries: u32,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Table> PgRepository<T> {
    pub fn new(pool: PgPool, max_retries: u32) -> Self {
        Self {
            pool,
            max_retries,
            _phantom: std::marker::PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT * FROM {} WHERE {} = $1", T::TABLE, T::KEY)
    }

    fn list_sql() -> String {
        format!("SELECT * FROM {} ORDER BY date_created, {}", T::TABLE, T::KEY)
    }

    fn insert_sql() -> String {
        let columns = T::COLUMNS.join(", ");
        let params: Vec<String> = (0..T::COLUMNS.len() + 2)
            .map(|i| format!("${}", i + 1))
            .collect();
        format!(
            "INSERT INTO {} ({}, {}, date_created) VALUES ({})",
            T::TABLE,
            T::KEY,
            columns,
            params.join(", ")
        )
    }

    fn update_sql() -> String {
        let assignments: Vec<String> = T::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ${}", column, i + 2))
            .collect();
        format!(
            "UPDATE {} SET {} WHERE {} = $1",
            T::TABLE,
            assignments.join(", "),
            T::KEY
        )
    }

    fn delete_sql() -> String {
        format!("DELETE FROM {} WHERE {} = $1", T::TABLE, T::KEY)
    }

    async fn fetch_where(&self, sql: &str, id: Uuid) -> Result<Vec<T>, DatabaseError> {
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            sqlx::query_as::<_, T>(sql)
                .bind(id)
                .fetch_all(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await
    }
}

#[async_trait]
impl<T: Table> EntityStore<T> for PgRepository<T> {
    async fn find(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        let sql = Self::select_sql();
        let sql = sql.as_str();
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            sqlx::query_as::<_, T>(sql)
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await
    }

    async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = Self::list_sql();
        let sql = sql.as_str();
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            sqlx::query_as::<_, T>(sql)
                .fetch_all(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await
    }

    async fn insert(&self, entity: &T) -> Result<(), DatabaseError> {
        let sql = Self::insert_sql();
        let sql = sql.as_str();
        let select_sql = Self::select_sql();
        let select_sql = select_sql.as_str();
        let pool = &self.pool;
        with_insert_retry(
            T::TABLE,
            self.max_retries,
            move || async move {
                let query = sqlx::query(sql).bind(entity.key());
                entity
                    .bind_columns(query)
                    .bind(entity.date_created())
                    .execute(pool)
                    .await
                    .map_err(|e| {
                        DatabaseError::from_insert(e, format!("{} {}", T::TABLE, entity.key()))
                    })?;
                Ok(())
            },
            // Our row carries our creation stamp, rounded to microseconds
            move || async move {
                let stored = sqlx::query_as::<_, T>(select_sql)
                    .bind(entity.key())
                    .fetch_optional(pool)
                    .await?;
                Ok(stored.is_some_and(|row| {
                    (row.date_created() - entity.date_created())
                        .num_microseconds()
                        .is_some_and(|drift| drift.abs() <= 1)
                }))
            },
        )
        .await
    }

    async fn update(&self, entity: &T) -> Result<(), DatabaseError> {
        let sql = Self::update_sql();
        let sql = sql.as_str();
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            let query = sqlx::query(sql).bind(entity.key());
            entity.bind_columns(query).execute(pool).await?;
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = Self::delete_sql();
        let sql = sql.as_str();
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            let result = sqlx::query(sql).bind(id).execute(pool).await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn has_dependents(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let Some(sql) = T::DEPENDENTS else {
            return Ok(false);
        };
        let pool = &self.pool;
        with_retry(T::TABLE, self.max_retries, move || async move {
            sqlx::query_scalar::<_, bool>(sql)
                .bind(id)
                .fetch_one(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await
    }
}

#[async_trait]
impl DeviceLookup for PgRepository<Device> {
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Device>, DatabaseError> {
        self.fetch_where(
            "SELECT * FROM device WHERE category_id = $1 ORDER BY date_created, device_id",
            category_id,
        )
        .await
    }

    async fn list_by_zone(&self, zone_id: Uuid) -> Result<Vec<Device>, DatabaseError> {
        self.fetch_where(
            "SELECT * FROM device WHERE zone_id = $1 ORDER BY date_created, device_id",
            zone_id,
        )
        .await
    }

    async fn count_zones_for_category(&self, category_id: Uuid) -> Result<i64, DatabaseError> {
        let pool = &self.pool;
        with_retry("device", self.max_retries, move || async move {
            sqlx::query_scalar::<_, i64>(
                r#"
                SELECT COUNT(DISTINCT z.zone_id)
                FROM zone z
                JOIN device d ON d.zone_id = z.zone_id
                WHERE d.category_id = $1
                "#,
            )
            .bind(category_id)
            .fetch_one(pool)
            .await
            .map_err(DatabaseError::from)
        })
        .await
    }
}

#[async_trait]
impl SessionStore for PgRepository<UserSession> {
    async fn insert(&self, session: &UserSession) -> Result<(), DatabaseError> {
        EntityStore::insert(self, session).await
    }

    async fn find(&self, session_id: Uuid) -> Result<Option<UserSession>, DatabaseError> {
        EntityStore::find(self, session_id).await
    }

    async fn mark_logged_out(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let pool = &self.pool;
        with_retry("user_session", self.max_retries, move || async move {
            let result = sqlx::query(
                "UPDATE user_session SET logout_date = $2 WHERE session_id = $1 AND logout_date IS NULL",
            )
            .bind(session_id)
            .bind(at)
            .execute(pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_category_statements() {
        assert_eq!(
            PgRepository::<Category>::insert_sql(),
            "INSERT INTO category (category_id, category_name, category_description, date_created) VALUES ($1, $2, $3, $4)"
        );
        assert_eq!(
            PgRepository::<Category>::update_sql(),
            "UPDATE category SET category_name = $2, category_description = $3 WHERE category_id = $1"
        );
    }

    #[test]
    fn builds_device_statements() {
        assert_eq!(
            PgRepository::<Device>::insert_sql(),
            "INSERT INTO device (device_id, device_name, category_id, zone_id, status, is_active, date_created) VALUES ($1, $2, $3, $4, $5, $6, $7)"
        );
        assert_eq!(
            PgRepository::<Device>::delete_sql(),
            "DELETE FROM device WHERE device_id = $1"
        );
    }

    #[test]
    fn only_category_and_zone_have_dependents() {
        assert!(Category::DEPENDENTS.is_some());
        assert!(Zone::DEPENDENTS.is_some());
        assert!(Device::DEPENDENTS.is_none());
        assert!(UserSession::DEPENDENTS.is_none());
    }
}
