use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

/// Idempotent DDL for the office tables and the identity tables.
/// `date_created` defaults to server time when a writer leaves it out.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS category (
        category_id UUID PRIMARY KEY,
        category_name TEXT NOT NULL DEFAULT '',
        category_description TEXT NOT NULL DEFAULT '',
        date_created TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS zone (
        zone_id UUID PRIMARY KEY,
        zone_name TEXT NOT NULL DEFAULT '',
        zone_description TEXT NOT NULL DEFAULT '',
        date_created TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS device (
        device_id UUID PRIMARY KEY,
        device_name TEXT NOT NULL DEFAULT '',
        category_id UUID NOT NULL,
        zone_id UUID NOT NULL,
        status TEXT NOT NULL DEFAULT '',
        is_active BOOLEAN NOT NULL DEFAULT false,
        date_created TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS device_category_id_idx ON device (category_id)",
    "CREATE INDEX IF NOT EXISTS device_zone_id_idx ON device (zone_id)",
    r#"
    CREATE TABLE IF NOT EXISTS user_session (
        session_id UUID PRIMARY KEY,
        date_created TIMESTAMPTZ NOT NULL DEFAULT now(),
        logout_date TIMESTAMPTZ NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS system_user (
        id UUID PRIMARY KEY,
        user_name TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        phone_number TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        date_created TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS system_user_user_name_lower_idx ON system_user (lower(user_name))",
    r#"
    CREATE TABLE IF NOT EXISTS system_role (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS system_user_role (
        user_id UUID NOT NULL REFERENCES system_user (id) ON DELETE CASCADE,
        role_id UUID NOT NULL REFERENCES system_role (id) ON DELETE CASCADE,
        date_assigned TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (user_id, role_id)
    )
    "#,
];

pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema verified ({} statements)", SCHEMA.len());
    Ok(())
}
