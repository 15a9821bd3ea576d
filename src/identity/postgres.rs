use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{IdentityError, IdentityFailure, IdentityProvider, PasswordHasher, PasswordPolicy};
use crate::database::models::{NewSystemUser, SystemUser};
use crate::database::retry::with_retry;
use crate::database::DatabaseError;

/// Identity provider over the `system_user`, `system_role` and
/// `system_user_role` tables. User names are matched without regard to case.
pub struct PgIdentityProvider {
    pool: PgPool,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
    max_retries: u32,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool, hasher: PasswordHasher, policy: PasswordPolicy, max_retries: u32) -> Self {
        Self {
            pool,
            hasher,
            policy,
            max_retries,
        }
    }

    fn duplicate_user_name(user_name: &str) -> IdentityFailure {
        IdentityFailure::new(
            "DuplicateUserName",
            format!("Username '{}' is already taken.", user_name),
        )
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<SystemUser>, IdentityError> {
        let pool = &self.pool;
        let user = with_retry("system_user", self.max_retries, move || async move {
            sqlx::query_as::<_, SystemUser>("SELECT * FROM system_user WHERE lower(user_name) = lower($1)")
                .bind(user_name)
                .fetch_optional(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SystemUser>, IdentityError> {
        let pool = &self.pool;
        let user = with_retry("system_user", self.max_retries, move || async move {
            sqlx::query_as::<_, SystemUser>("SELECT * FROM system_user WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewSystemUser, password: &str) -> Result<SystemUser, IdentityError> {
        let mut failures = Vec::new();
        if let Some(failure) = self.policy.validate_user_name(&user.user_name) {
            failures.push(failure);
        }
        failures.extend(self.policy.validate(password));
        if !failures.is_empty() {
            return Err(IdentityError::Rejected(failures));
        }

        let account = SystemUser {
            id: Uuid::new_v4(),
            user_name: user.user_name,
            email: user.email,
            phone_number: user.phone_number,
            password_hash: self.hasher.hash(password)?,
            date_created: Utc::now(),
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO system_user (id, user_name, email, phone_number, password_hash, date_created)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(account.id)
        .bind(&account.user_name)
        .bind(&account.email)
        .bind(&account.phone_number)
        .bind(&account.password_hash)
        .bind(account.date_created)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, account.user_name.clone()));

        match inserted {
            Ok(_) => {
                info!("Created system user {}", account.user_name);
                Ok(account)
            }
            Err(DatabaseError::Duplicate(_)) => Err(IdentityError::Rejected(vec![
                Self::duplicate_user_name(&account.user_name),
            ])),
            Err(e) => Err(e.into()),
        }
    }

    async fn check_password(&self, user: &SystemUser, password: &str) -> Result<bool, IdentityError> {
        self.hasher.verify(password, &user.password_hash)
    }

    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, IdentityError> {
        let pool = &self.pool;
        let roles = with_retry("system_user_role", self.max_retries, move || async move {
            sqlx::query_scalar::<_, String>(
                r#"
                SELECT r.name
                FROM system_user_role ur
                JOIN system_role r ON r.id = ur.role_id
                WHERE ur.user_id = $1
                ORDER BY ur.date_assigned, r.name
                "#,
            )
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(DatabaseError::from)
        })
        .await?;
        Ok(roles)
    }

    async fn role_exists(&self, role: &str) -> Result<bool, IdentityError> {
        let pool = &self.pool;
        let exists = with_retry("system_role", self.max_retries, move || async move {
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM system_role WHERE name = $1)")
                .bind(role)
                .fetch_one(pool)
                .await
                .map_err(DatabaseError::from)
        })
        .await?;
        Ok(exists)
    }

    async fn create_role(&self, role: &str) -> Result<(), IdentityError> {
        // Concurrent registrations may race to create the same role
        sqlx::query("INSERT INTO system_role (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
            .bind(Uuid::new_v4())
            .bind(role)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        debug!("Ensured role {}", role);
        Ok(())
    }

    async fn add_to_role(&self, user_id: Uuid, role: &str) -> Result<(), IdentityError> {
        sqlx::query(
            r#"
            INSERT INTO system_user_role (user_id, role_id, date_assigned)
            SELECT $1, r.id, now() FROM system_role r WHERE r.name = $2
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;
        Ok(())
    }
}
