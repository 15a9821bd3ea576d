use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Resource, ResourceService};
use crate::converters::zone;
use crate::database::models::Zone;
use crate::dto::DtoZone;

pub struct ZoneResource;

impl Resource for ZoneResource {
    type Entity = Zone;
    type Dto = DtoZone;

    const NAME: &'static str = "zone";

    fn dto_id(dto: &DtoZone) -> Uuid {
        dto.base.id
    }

    fn to_dto(entity: &Zone) -> DtoZone {
        zone::to_dto(entity)
    }

    fn to_entity(dto: &DtoZone, now: DateTime<Utc>) -> Zone {
        zone::to_entity(dto, now)
    }

    fn apply(dto: &DtoZone, entity: &mut Zone) {
        zone::apply(dto, entity)
    }
}

pub type ZoneService = ResourceService<ZoneResource>;
