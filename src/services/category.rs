use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Resource, ResourceService};
use crate::converters::category;
use crate::database::models::Category;
use crate::dto::DtoCategory;

pub struct CategoryResource;

impl Resource for CategoryResource {
    type Entity = Category;
    type Dto = DtoCategory;

    const NAME: &'static str = "category";

    fn dto_id(dto: &DtoCategory) -> Uuid {
        dto.base.id
    }

    fn to_dto(entity: &Category) -> DtoCategory {
        category::to_dto(entity)
    }

    fn to_entity(dto: &DtoCategory, now: DateTime<Utc>) -> Category {
        category::to_entity(dto, now)
    }

    fn apply(dto: &DtoCategory, entity: &mut Category) {
        category::apply(dto, entity)
    }
}

pub type CategoryService = ResourceService<CategoryResource>;
