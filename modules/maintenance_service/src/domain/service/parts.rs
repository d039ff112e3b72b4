use super::{internal, Service};
use crate::contract::{CatalogKind, MaintenanceError, NewPart, Part, PartForType};
use crate::domain::repository::JobReference;
use crate::domain::validation::{normalize_text, unique_key};

const MAX_PART_NO_LENGTH: usize = 50;

impl Service {
    // ===== Parts =====

    pub async fn list_parts(&self) -> Result<Vec<Part>, MaintenanceError> {
        let mut parts = self.repos.parts.list().await.map_err(internal)?;
        parts.sort_by_key(|p| unique_key(&p.part_no));
        Ok(parts)
    }

    pub async fn get_part(&self, id: i32) -> Result<Part, MaintenanceError> {
        self.repos
            .parts
            .find(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Part", id))
    }

    pub async fn create_part(&self, part: NewPart) -> Result<Part, MaintenanceError> {
        let part = self.check_part(None, part).await?;
        let created = self.repos.parts.create(&part).await.map_err(internal)?;
        tracing::info!(part_id = created.id, part_no = %created.part_no, "part created");
        Ok(created)
    }

    pub async fn update_part(&self, id: i32, part: NewPart) -> Result<Part, MaintenanceError> {
        self.get_part(id).await?;
        let part = self.check_part(Some(id), part).await?;
        let updated = self.repos.parts.update(id, &part).await.map_err(internal)?;
        tracing::info!(part_id = id, "part updated");
        Ok(updated)
    }

    pub async fn set_part_active(&self, id: i32, is_active: bool) -> Result<(), MaintenanceError> {
        self.get_part(id).await?;
        self.repos
            .parts
            .set_active(id, is_active)
            .await
            .map_err(internal)?;
        tracing::info!(part_id = id, is_active, "part activation changed");
        Ok(())
    }

    /// Delete a part that no job used and no type links to
    pub async fn delete_part(&self, id: i32) -> Result<(), MaintenanceError> {
        let existing = self.get_part(id).await?;

        let used = self
            .repos
            .jobs
            .count_referencing(JobReference::Part(id))
            .await
            .map_err(internal)?;
        if used > 0 {
            return Err(MaintenanceError::conflict(format!(
                "Part '{}' was used on {} job(s)",
                existing.part_no, used
            )));
        }

        let links = self
            .repos
            .parts
            .count_links(None, Some(id))
            .await
            .map_err(internal)?;
        if links > 0 {
            return Err(MaintenanceError::conflict(format!(
                "Part '{}' is linked to {} equipment type(s)",
                existing.part_no, links
            )));
        }

        self.repos.parts.delete(id).await.map_err(internal)?;
        tracing::info!(part_id = id, "part deleted");
        Ok(())
    }

    // ===== Parts per equipment type =====

    pub async fn parts_for_type(&self, type_id: i32) -> Result<Vec<PartForType>, MaintenanceError> {
        self.get_catalog_entry(CatalogKind::EquipmentType, type_id)
            .await?;
        let mut parts = self
            .repos
            .parts
            .parts_for_type(type_id)
            .await
            .map_err(internal)?;
        parts.sort_by_key(|p| unique_key(&p.part_no));
        Ok(parts)
    }

    /// Link an active part to an active equipment type
    pub async fn link_part_to_type(
        &self,
        type_id: i32,
        part_id: i32,
    ) -> Result<PartForType, MaintenanceError> {
        let equipment_type = self
            .get_catalog_entry(CatalogKind::EquipmentType, type_id)
            .await?;
        if !equipment_type.is_active {
            return Err(MaintenanceError::inactive("Equipment type", type_id));
        }
        let part = self.get_part(part_id).await?;
        if !part.is_active {
            return Err(MaintenanceError::inactive("Part", part_id));
        }

        let linked = self
            .repos
            .parts
            .parts_for_type(type_id)
            .await
            .map_err(internal)?;
        if linked.iter().any(|l| l.part_id == part_id) {
            return Err(MaintenanceError::conflict(format!(
                "Part '{}' is already linked to '{}'",
                part.part_no, equipment_type.description
            )));
        }

        let id = self
            .repos
            .parts
            .link(type_id, part_id)
            .await
            .map_err(internal)?;
        tracing::info!(link_id = id, type_id, part_id, "part linked to equipment type");
        Ok(PartForType {
            id,
            type_id,
            part_id,
            part_no: part.part_no,
            part_description: part.description,
        })
    }

    pub async fn unlink_part_from_type(&self, link_id: i32) -> Result<(), MaintenanceError> {
        self.repos
            .parts
            .find_link(link_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Part link", link_id))?;
        self.repos.parts.unlink(link_id).await.map_err(internal)?;
        tracing::info!(link_id, "part unlinked from equipment type");
        Ok(())
    }

    // ===== Helper Methods =====

    async fn check_part(
        &self,
        existing_id: Option<i32>,
        part: NewPart,
    ) -> Result<NewPart, MaintenanceError> {
        let part_no = normalize_text("Part number", &part.part_no, MAX_PART_NO_LENGTH)?;
        let description = normalize_text(
            "Description",
            &part.description,
            self.config.max_description_length,
        )?;

        let key = unique_key(&part_no);
        let parts = self.repos.parts.list().await.map_err(internal)?;
        if parts
            .iter()
            .any(|p| Some(p.id) != existing_id && unique_key(&p.part_no) == key)
        {
            return Err(MaintenanceError::conflict(format!(
                "Part number '{}' already exists",
                part_no
            )));
        }

        Ok(NewPart {
            part_no,
            description,
        })
    }
}
