use chrono::{DateTime, Utc};

use crate::database::models::Device;
use crate::dto::{DtoBase, DtoDevice};

pub fn to_dto(entity: &Device) -> DtoDevice {
    DtoDevice {
        base: DtoBase {
            id: entity.device_id,
            date_created: Some(entity.date_created),
        },
        device_name: entity.device_name.clone(),
        category_id: entity.category_id,
        zone_id: entity.zone_id,
        status: entity.status.clone(),
        is_active: entity.is_active,
    }
}

pub fn to_entity(dto: &DtoDevice, now: DateTime<Utc>) -> Device {
    Device {
        device_id: dto.base.id,
        device_name: dto.device_name.clone(),
        category_id: dto.category_id,
        zone_id: dto.zone_id,
        status: dto.status.clone(),
        is_active: dto.is_active,
        date_created: now,
    }
}

pub fn apply(dto: &DtoDevice, entity: &mut Device) {
    entity.device_name = dto.device_name.clone();
    entity.category_id = dto.category_id;
    entity.zone_id = dto.zone_id;
    entity.status = dto.status.clone();
    entity.is_active = dto.is_active;
}
