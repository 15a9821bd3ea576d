use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::database::{DatabaseError, EntityStore};

/// Binds an entity to its DTO and names it for messages
pub trait Resource: Send + Sync + 'static {
    type Entity: Clone + Send + Sync + 'static;
    type Dto: Send + Sync;

    /// Singular, lower-case ("category")
    const NAME: &'static str;

    fn dto_id(dto: &Self::Dto) -> Uuid;
    fn to_dto(entity: &Self::Entity) -> Self::Dto;
    fn to_entity(dto: &Self::Dto, now: DateTime<Utc>) -> Self::Entity;
    fn apply(dto: &Self::Dto, entity: &mut Self::Entity);
}

/// CRUD over one resource kind. Every write re-reads the row so the
/// response reflects what the store actually holds.
pub struct ResourceService<R: Resource> {
    store: Arc<dyn EntityStore<R::Entity>>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn EntityStore<R::Entity>>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    fn invalid_id(id: Uuid) -> ServiceError {
        ServiceError::InvalidArgument(format!(
            "The {}-id specified is not valid (id = '{}')",
            R::NAME,
            id
        ))
    }

    fn not_found(id: Uuid) -> ServiceError {
        ServiceError::NotFound(format!("No {} with id = '{}' has been found", R::NAME, id))
    }

    fn already_exists(id: Uuid) -> ServiceError {
        ServiceError::Conflict(format!("A {} already exists with id = '{}'", R::NAME, id))
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<R::Dto> {
        if id.is_nil() {
            return Err(Self::invalid_id(id));
        }

        debug!(resource = R::NAME, %id, "Getting by id");

        let entity = self.store.find(id).await?.ok_or_else(|| Self::not_found(id))?;
        Ok(R::to_dto(&entity))
    }

    pub async fn get_all(&self) -> ServiceResult<Vec<R::Dto>> {
        let entities = self.store.list().await?;
        debug!(resource = R::NAME, count = entities.len(), "Listed");
        Ok(entities.iter().map(R::to_dto).collect())
    }

    pub async fn create(&self, dto: R::Dto) -> ServiceResult<R::Dto> {
        let id = R::dto_id(&dto);
        if id.is_nil() {
            return Err(Self::invalid_id(id));
        }

        if self.store.find(id).await?.is_some() {
            return Err(Self::already_exists(id));
        }

        let entity = R::to_entity(&dto, Utc::now());
        match self.store.insert(&entity).await {
            Ok(()) => {}
            // Lost a race with a concurrent create of the same id
            Err(DatabaseError::Duplicate(_)) => {
                warn!(resource = R::NAME, %id, "Duplicate key on insert");
                return Err(Self::already_exists(id));
            }
            Err(e) => return Err(e.into()),
        }

        info!(resource = R::NAME, %id, "Created");
        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, dto: R::Dto) -> ServiceResult<R::Dto> {
        if id.is_nil() {
            return Err(Self::invalid_id(id));
        }

        let dto_id = R::dto_id(&dto);
        if id != dto_id {
            return Err(ServiceError::InvalidArgument(format!(
                "The id specified does NOT match {name}-id (id = '{id}', {name}-id = '{dto_id}')",
                name = R::NAME,
            )));
        }

        let mut entity = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No {} found with id = '{}'", R::NAME, id)))?;

        R::apply(&dto, &mut entity);
        self.store.update(&entity).await?;

        info!(resource = R::NAME, %id, "Updated");
        self.get_by_id(id).await
    }

    /// Remove the row and hand back its id
    pub async fn delete(&self, id: Uuid) -> ServiceResult<Uuid> {
        if id.is_nil() {
            return Err(Self::invalid_id(id));
        }

        if self.store.find(id).await?.is_none() {
            return Err(Self::not_found(id));
        }

        if self.store.has_dependents(id).await? {
            return Err(ServiceError::Forbidden(format!(
                "You can not delete this {} because it has devices assigned to it",
                R::NAME
            )));
        }

        if !self.store.delete(id).await? {
            return Err(Self::not_found(id));
        }

        info!(resource = R::NAME, %id, "Deleted");
        Ok(id)
    }
}
