use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{Resource, ResourceService, ServiceError, ServiceResult};
use crate::converters::device;
use crate::database::models::Device;
use crate::database::DeviceLookup;
use crate::dto::DtoDevice;

pub struct DeviceResource;

impl Resource for DeviceResource {
    type Entity = Device;
    type Dto = DtoDevice;

    const NAME: &'static str = "device";

    fn dto_id(dto: &DtoDevice) -> Uuid {
        dto.base.id
    }

    fn to_dto(entity: &Device) -> DtoDevice {
        device::to_dto(entity)
    }

    fn to_entity(dto: &DtoDevice, now: DateTime<Utc>) -> Device {
        device::to_entity(dto, now)
    }

    fn apply(dto: &DtoDevice, entity: &mut Device) {
        device::apply(dto, entity)
    }
}

pub type DeviceService = ResourceService<DeviceResource>;

/// Read-only device queries keyed by category or zone
pub struct DeviceQueryService {
    lookup: Arc<dyn DeviceLookup>,
}

impl DeviceQueryService {
    pub fn new(lookup: Arc<dyn DeviceLookup>) -> Self {
        Self { lookup }
    }

    pub async fn devices_by_category(&self, category_id: Uuid) -> ServiceResult<Vec<DtoDevice>> {
        if category_id.is_nil() {
            return Err(invalid("category", category_id));
        }
        let devices = self.lookup.list_by_category(category_id).await?;
        debug!(%category_id, count = devices.len(), "Listed devices by category");
        Ok(devices.iter().map(device::to_dto).collect())
    }

    pub async fn devices_by_zone(&self, zone_id: Uuid) -> ServiceResult<Vec<DtoDevice>> {
        if zone_id.is_nil() {
            return Err(invalid("zone", zone_id));
        }
        let devices = self.lookup.list_by_zone(zone_id).await?;
        debug!(%zone_id, count = devices.len(), "Listed devices by zone");
        Ok(devices.iter().map(device::to_dto).collect())
    }

    /// Distinct zones holding at least one device of the category
    pub async fn zone_count_for_category(&self, category_id: Uuid) -> ServiceResult<i64> {
        if category_id.is_nil() {
            return Err(invalid("category", category_id));
        }
        Ok(self.lookup.count_zones_for_category(category_id).await?)
    }
}

fn invalid(name: &str, id: Uuid) -> ServiceError {
    ServiceError::InvalidArgument(format!("The {}-id specified is not valid (id = '{}')", name, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::DtoBase;
    use crate::testing::MemoryOffice;

    async fn seed(office: &Arc<MemoryOffice>, category_id: Uuid, zone_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        DeviceService::new(office.clone())
            .create(DtoDevice {
                base: DtoBase::new(id),
                device_name: "Sensor".into(),
                category_id,
                zone_id,
                status: "Online".into(),
                is_active: true,
            })
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn filters_devices_by_category_and_zone() {
        let office = MemoryOffice::shared();
        let (hvac, lighting) = (Uuid::new_v4(), Uuid::new_v4());
        let (floor1, floor2) = (Uuid::new_v4(), Uuid::new_v4());
        let a = seed(&office, hvac, floor1).await;
        let b = seed(&office, hvac, floor2).await;
        let c = seed(&office, lighting, floor1).await;

        let queries = DeviceQueryService::new(office.clone());

        let mut by_hvac: Vec<Uuid> = queries
            .devices_by_category(hvac)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.base.id)
            .collect();
        by_hvac.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(by_hvac, expected);

        let on_floor1: Vec<Uuid> = queries
            .devices_by_zone(floor1)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.base.id)
            .collect();
        assert_eq!(on_floor1.len(), 2);
        assert!(on_floor1.contains(&a) && on_floor1.contains(&c));
    }

    #[tokio::test]
    async fn counts_distinct_zones_per_category() {
        let office = MemoryOffice::shared();
        let hvac = Uuid::new_v4();
        let (floor1, floor2) = (Uuid::new_v4(), Uuid::new_v4());
        office.add_zone(floor1).await;
        office.add_zone(floor2).await;
        seed(&office, hvac, floor1).await;
        seed(&office, hvac, floor1).await;
        seed(&office, hvac, floor2).await;

        let queries = DeviceQueryService::new(office);
        assert_eq!(queries.zone_count_for_category(hvac).await.unwrap(), 2);
        assert_eq!(queries.zone_count_for_category(Uuid::new_v4()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_nil_ids() {
        let queries = DeviceQueryService::new(MemoryOffice::shared());
        assert!(matches!(
            queries.devices_by_zone(Uuid::nil()).await,
            Err(ServiceError::InvalidArgument(_))
        ));
        assert!(matches!(
            queries.zone_count_for_category(Uuid::nil()).await,
            Err(ServiceError::InvalidArgument(_))
        ));
    }
}
