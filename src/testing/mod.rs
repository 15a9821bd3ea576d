//! In-memory stand-ins for the database and identity provider, plus
//! helpers for building services and routers in unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::TokenService;
use crate::config::SecurityConfig;
use crate::database::models::{Category, Device, NewSystemUser, SystemUser, UserSession, Zone};
use crate::database::{DatabaseError, DeviceLookup, EntityStore, HealthProbe, SessionStore, Table};
use crate::identity::{
    IdentityError, IdentityFailure, IdentityProvider, PasswordHasher, PasswordPolicy,
};
use crate::server::AppState;
use crate::services::{
    CategoryService, DeviceQueryService, DeviceService, SecurityService, ZoneService,
};

pub const TEST_SECRET: &str = "unit-test-secret";

pub fn test_security_config() -> SecurityConfig {
    SecurityConfig {
        enable_cors: false,
        cors_origins: vec![],
        jwt_issuer: "connected-office-test".to_string(),
        jwt_audience: "connected-office-test-clients".to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        jwt_expiry_hours: 5,
    }
}

pub fn test_tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(&test_security_config()).expect("test token service"))
}

pub fn test_security(office: Arc<MemoryOffice>) -> SecurityService {
    SecurityService::new(Arc::new(MemoryIdentity::new()), office, test_tokens())
}

/// Application state wired entirely to in-memory fakes
pub fn test_state(office: Arc<MemoryOffice>) -> AppState {
    let tokens = test_tokens();
    AppState {
        categories: Arc::new(CategoryService::new(office.clone())),
        zones: Arc::new(ZoneService::new(office.clone())),
        devices: Arc::new(DeviceService::new(office.clone())),
        device_queries: Arc::new(DeviceQueryService::new(office.clone())),
        security: Arc::new(SecurityService::new(
            Arc::new(MemoryIdentity::new()),
            office.clone(),
            tokens.clone(),
        )),
        tokens,
        health: office,
    }
}

struct Rows<T>(RwLock<HashMap<Uuid, T>>);

impl<T: Table + Clone> Rows<T> {
    fn new() -> Self {
        Self(RwLock::new(HashMap::new()))
    }

    async fn find(&self, id: Uuid) -> Option<T> {
        self.0.read().await.get(&id).cloned()
    }

    async fn list(&self) -> Vec<T> {
        let mut rows: Vec<T> = self.0.read().await.values().cloned().collect();
        rows.sort_by_key(|row| (row.date_created(), row.key()));
        rows
    }

    async fn insert(&self, row: &T) -> Result<(), DatabaseError> {
        let mut rows = self.0.write().await;
        if rows.contains_key(&row.key()) {
            return Err(DatabaseError::Duplicate(format!("{} {}", T::TABLE, row.key())));
        }
        rows.insert(row.key(), row.clone());
        Ok(())
    }

    async fn update(&self, row: &T) {
        if let Some(existing) = self.0.write().await.get_mut(&row.key()) {
            *existing = row.clone();
        }
    }

    async fn delete(&self, id: Uuid) -> bool {
        self.0.write().await.remove(&id).is_some()
    }
}

/// Office tables held in memory. Counts every store call and can be
/// switched offline to simulate an unreachable database.
pub struct MemoryOffice {
    categories: Rows<Category>,
    zones: Rows<Zone>,
    devices: Rows<Device>,
    sessions: Rows<UserSession>,
    calls: AtomicUsize,
    offline: AtomicBool,
}

impl MemoryOffice {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self {
            categories: Rows::new(),
            zones: Rows::new(),
            devices: Rows::new(),
            sessions: Rows::new(),
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn sessions(&self) -> Vec<UserSession> {
        self.sessions.list().await
    }

    pub async fn add_zone(&self, zone_id: Uuid) {
        let zone = Zone {
            zone_id,
            zone_name: format!("zone-{}", zone_id),
            zone_description: String::new(),
            date_created: Utc::now(),
        };
        let _ = self.zones.insert(&zone).await;
    }

    fn enter(&self) -> Result<(), DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryError("simulated outage".into()));
        }
        Ok(())
    }
}

macro_rules! memory_entity_store {
    ($entity:ty, $rows:ident, |$office:ident, $id:ident| $dependents:expr) => {
        #[async_trait]
        impl EntityStore<$entity> for MemoryOffice {
            async fn find(&self, id: Uuid) -> Result<Option<$entity>, DatabaseError> {
                self.enter()?;
                Ok(self.$rows.find(id).await)
            }

            async fn list(&self) -> Result<Vec<$entity>, DatabaseError> {
                self.enter()?;
                Ok(self.$rows.list().await)
            }

            async fn insert(&self, entity: &$entity) -> Result<(), DatabaseError> {
                self.enter()?;
                self.$rows.insert(entity).await
            }

            async fn update(&self, entity: &$entity) -> Result<(), DatabaseError> {
                self.enter()?;
                self.$rows.update(entity).await;
                Ok(())
            }

            async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
                self.enter()?;
                Ok(self.$rows.delete(id).await)
            }

            async fn has_dependents(&self, $id: Uuid) -> Result<bool, DatabaseError> {
                self.enter()?;
                let $office = self;
                Ok($dependents)
            }
        }
    };
}

memory_entity_store!(Category, categories, |office, id| office
    .devices
    .list()
    .await
    .iter()
    .any(|d| d.category_id == id));

memory_entity_store!(Zone, zones, |office, id| office
    .devices
    .list()
    .await
    .iter()
    .any(|d| d.zone_id == id));

memory_entity_store!(Device, devices, |_office, _id| false);

#[async_trait]
impl DeviceLookup for MemoryOffice {
    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Device>, DatabaseError> {
        self.enter()?;
        let devices = self.devices.list().await;
        Ok(devices.into_iter().filter(|d| d.category_id == category_id).collect())
    }

    async fn list_by_zone(&self, zone_id: Uuid) -> Result<Vec<Device>, DatabaseError> {
        self.enter()?;
        let devices = self.devices.list().await;
        Ok(devices.into_iter().filter(|d| d.zone_id == zone_id).collect())
    }

    async fn count_zones_for_category(&self, category_id: Uuid) -> Result<i64, DatabaseError> {
        self.enter()?;
        let zones = self.zones.0.read().await;
        let mut held: Vec<Uuid> = self
            .devices
            .list()
            .await
            .into_iter()
            .filter(|d| d.category_id == category_id && zones.contains_key(&d.zone_id))
            .map(|d| d.zone_id)
            .collect();
        held.sort();
        held.dedup();
        Ok(held.len() as i64)
    }
}

#[async_trait]
impl SessionStore for MemoryOffice {
    async fn insert(&self, session: &UserSession) -> Result<(), DatabaseError> {
        self.enter()?;
        self.sessions.insert(session).await
    }

    async fn find(&self, session_id: Uuid) -> Result<Option<UserSession>, DatabaseError> {
        self.enter()?;
        Ok(self.sessions.find(session_id).await)
    }

    async fn mark_logged_out(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        self.enter()?;
        let mut rows = self.sessions.0.write().await;
        match rows.get_mut(&session_id) {
            Some(session) if session.logout_date.is_none() => {
                session.logout_date = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl HealthProbe for MemoryOffice {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionError("simulated outage".into()));
        }
        Ok(())
    }
}

/// Mirrors `lower(a) = lower(b)` in PostgreSQL
fn same_user_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Identity provider over in-memory accounts, hashing with minimal cost
pub struct MemoryIdentity {
    users: RwLock<Vec<SystemUser>>,
    known_roles: RwLock<Vec<String>>,
    assignments: RwLock<HashMap<Uuid, Vec<String>>>,
    hasher: PasswordHasher,
    policy: PasswordPolicy,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            known_roles: RwLock::new(Vec::new()),
            assignments: RwLock::new(HashMap::new()),
            hasher: PasswordHasher::with_params(argon2::Params::MIN_M_COST, 1, 1)
                .expect("minimal argon2 params"),
            policy: PasswordPolicy::default(),
        }
    }
}

impl Default for MemoryIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn find_by_name(&self, user_name: &str) -> Result<Option<SystemUser>, IdentityError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| same_user_name(&u.user_name, user_name)).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<SystemUser>, IdentityError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewSystemUser, password: &str) -> Result<SystemUser, IdentityError> {
        let mut failures: Vec<IdentityFailure> =
            self.policy.validate_user_name(&user.user_name).into_iter().collect();
        failures.extend(self.policy.validate(password));
        if !failures.is_empty() {
            return Err(IdentityError::Rejected(failures));
        }

        let mut users = self.users.write().await;
        if users.iter().any(|u| same_user_name(&u.user_name, &user.user_name)) {
            return Err(IdentityError::Rejected(vec![IdentityFailure::new(
                "DuplicateUserName",
                format!("Username '{}' is already taken.", user.user_name),
            )]));
        }

        let account = SystemUser {
            id: Uuid::new_v4(),
            user_name: user.user_name,
            email: user.email,
            phone_number: user.phone_number,
            password_hash: self.hasher.hash(password)?,
            date_created: Utc::now(),
        };
        users.push(account.clone());
        Ok(account)
    }

    async fn check_password(&self, user: &SystemUser, password: &str) -> Result<bool, IdentityError> {
        self.hasher.verify(password, &user.password_hash)
    }

    async fn roles(&self, user_id: Uuid) -> Result<Vec<String>, IdentityError> {
        Ok(self
            .assignments
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn role_exists(&self, role: &str) -> Result<bool, IdentityError> {
        Ok(self.known_roles.read().await.iter().any(|r| r == role))
    }

    async fn create_role(&self, role: &str) -> Result<(), IdentityError> {
        let mut roles = self.known_roles.write().await;
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }

    async fn add_to_role(&self, user_id: Uuid, role: &str) -> Result<(), IdentityError> {
        let mut assignments = self.assignments.write().await;
        let roles = assignments.entry(user_id).or_default();
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
        Ok(())
    }
}
