use super::{internal, Service};
use crate::contract::{CatalogKind, EquipmentItem, MaintenanceError, NewEquipmentItem};
use crate::domain::repository::JobReference;
use crate::domain::validation::{normalize_optional, unique_key, validate_serial_no};

impl Service {
    // ===== Equipment items =====

    /// List items ordered by serial number, optionally of one type
    pub async fn list_items(
        &self,
        type_id: Option<i32>,
    ) -> Result<Vec<EquipmentItem>, MaintenanceError> {
        let mut items = self.repos.items.list(type_id).await.map_err(internal)?;
        items.sort_by_key(|i| unique_key(&i.serial_no));
        Ok(items)
    }

    pub async fn get_item(&self, id: i32) -> Result<EquipmentItem, MaintenanceError> {
        self.repos
            .items
            .find(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Equipment item", id))
    }

    pub async fn find_item_by_serial(
        &self,
        serial_no: &str,
    ) -> Result<EquipmentItem, MaintenanceError> {
        let serial = serial_no.trim();
        self.repos
            .items
            .find_by_serial(serial)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Equipment item", serial))
    }

    pub async fn create_item(
        &self,
        item: NewEquipmentItem,
    ) -> Result<EquipmentItem, MaintenanceError> {
        let item = self.check_item(None, item).await?;
        let created = self.repos.items.create(&item).await.map_err(internal)?;
        tracing::info!(item_id = created.id, serial_no = %created.serial_no, "equipment item created");
        Ok(created)
    }

    pub async fn update_item(
        &self,
        id: i32,
        item: NewEquipmentItem,
    ) -> Result<EquipmentItem, MaintenanceError> {
        let existing = self.get_item(id).await?;
        let item = self.check_item(Some(&existing), item).await?;
        let updated = self.repos.items.update(id, &item).await.map_err(internal)?;
        tracing::info!(item_id = id, "equipment item updated");
        Ok(updated)
    }

    pub async fn set_item_active(&self, id: i32, is_active: bool) -> Result<(), MaintenanceError> {
        self.get_item(id).await?;
        self.repos
            .items
            .set_active(id, is_active)
            .await
            .map_err(internal)?;
        tracing::info!(item_id = id, is_active, "equipment item activation changed");
        Ok(())
    }

    /// Delete an item that has no jobs and no notes
    pub async fn delete_item(&self, id: i32) -> Result<(), MaintenanceError> {
        let existing = self.get_item(id).await?;

        let jobs = self
            .repos
            .jobs
            .count_referencing(JobReference::Item(id))
            .await
            .map_err(internal)?;
        if jobs > 0 {
            return Err(MaintenanceError::conflict(format!(
                "Equipment item '{}' has {} job(s)",
                existing.serial_no, jobs
            )));
        }

        let notes = self.repos.notes.all_notes().await.map_err(internal)?;
        let note_count = notes.iter().filter(|n| n.item_id == id).count();
        if note_count > 0 {
            return Err(MaintenanceError::conflict(format!(
                "Equipment item '{}' has {} note(s)",
                existing.serial_no, note_count
            )));
        }

        self.repos.items.delete(id).await.map_err(internal)?;
        tracing::info!(item_id = id, "equipment item deleted");
        Ok(())
    }

    // ===== Helper Methods =====

    async fn check_item(
        &self,
        existing: Option<&EquipmentItem>,
        item: NewEquipmentItem,
    ) -> Result<NewEquipmentItem, MaintenanceError> {
        let serial_no = validate_serial_no(&item.serial_no)?;

        let equipment_type = self
            .get_catalog_entry(CatalogKind::EquipmentType, item.type_id)
            .await?;
        let unchanged = existing.map_or(false, |e| e.type_id == item.type_id);
        if !equipment_type.is_active && !unchanged {
            return Err(MaintenanceError::inactive("Equipment type", item.type_id));
        }

        let same_serial = self
            .repos
            .items
            .find_by_serial(&serial_no)
            .await
            .map_err(internal)?;
        if let Some(other) = same_serial {
            if Some(other.id) != existing.map(|e| e.id) {
                return Err(MaintenanceError::conflict(format!(
                    "Serial number '{}' is already in use",
                    serial_no
                )));
            }
        }

        Ok(NewEquipmentItem {
            type_id: item.type_id,
            serial_no,
            description: normalize_optional(item.description.as_deref()),
        })
    }
}
