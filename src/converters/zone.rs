use chrono::{DateTime, Utc};

use crate::database::models::Zone;
use crate::dto::{DtoBase, DtoZone};

pub fn to_dto(entity: &Zone) -> DtoZone {
    DtoZone {
        base: DtoBase {
            id: entity.zone_id,
            date_created: Some(entity.date_created),
        },
        zone_name: entity.zone_name.clone(),
        zone_description: entity.zone_description.clone(),
    }
}

pub fn to_entity(dto: &DtoZone, now: DateTime<Utc>) -> Zone {
    Zone {
        zone_id: dto.base.id,
        zone_name: dto.zone_name.clone(),
        zone_description: dto.zone_description.clone(),
        date_created: now,
    }
}

pub fn apply(dto: &DtoZone, entity: &mut Zone) {
    entity.zone_name = dto.zone_name.clone();
    entity.zone_description = dto.zone_description.clone();
}
