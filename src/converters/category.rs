use chrono::{DateTime, Utc};

use crate::database::models::Category;
use crate::dto::{DtoBase, DtoCategory};

pub fn to_dto(entity: &Category) -> DtoCategory {
    DtoCategory {
        base: DtoBase {
            id: entity.category_id,
            date_created: Some(entity.date_created),
        },
        category_name: entity.category_name.clone(),
        category_description: entity.category_description.clone(),
    }
}

/// New row from a create request; the creation time is always the server's
pub fn to_entity(dto: &DtoCategory, now: DateTime<Utc>) -> Category {
    Category {
        category_id: dto.base.id,
        category_name: dto.category_name.clone(),
        category_description: dto.category_description.clone(),
        date_created: now,
    }
}

/// Overwrite mutable fields, leaving the key and creation time alone
pub fn apply(dto: &DtoCategory, entity: &mut Category) {
    entity.category_name = dto.category_name.clone();
    entity.category_description = dto.category_description.clone();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    #[test]
    fn apply_keeps_key_and_creation_time() {
        let created = Utc::now() - Duration::days(3);
        let mut entity = Category {
            category_id: Uuid::new_v4(),
            category_name: "HVAC".into(),
            category_description: "old".into(),
            date_created: created,
        };
        let original_id = entity.category_id;

        let dto = DtoCategory {
            base: DtoBase {
                id: Uuid::new_v4(),
                date_created: Some(Utc::now()),
            },
            category_name: "Lighting".into(),
            category_description: "new".into(),
        };
        apply(&dto, &mut entity);

        assert_eq!(entity.category_id, original_id);
        assert_eq!(entity.date_created, created);
        assert_eq!(entity.category_name, "Lighting");
        assert_eq!(entity.category_description, "new");
    }

    #[test]
    fn to_entity_ignores_client_timestamp() {
        let now = Utc::now();
        let dto = DtoCategory {
            base: DtoBase {
                id: Uuid::new_v4(),
                date_created: Some(now - Duration::days(365)),
            },
            ..Default::default()
        };
        let entity = to_entity(&dto, now);
        assert_eq!(entity.date_created, now);
        assert_eq!(to_dto(&entity).base.date_created, Some(now));
    }
}
