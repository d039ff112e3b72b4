use super::{internal, Service};
use crate::contract::{
    CatalogEntry, CatalogKind, EquipmentTypeDetail, LocationDetail, MaintenanceError,
    NewCatalogEntry,
};
use crate::domain::repository::JobReference;
use crate::domain::validation::{normalize_text, unique_key};

impl Service {
    // ===== Lookup tables =====

    /// List rows of a lookup table, optionally limited to one parent
    pub async fn list_catalog(
        &self,
        kind: CatalogKind,
        parent_id: Option<i32>,
        include_inactive: bool,
    ) -> Result<Vec<CatalogEntry>, MaintenanceError> {
        let mut rows = self.repos.catalog.list(kind).await.map_err(internal)?;
        rows.retain(|e| {
            (include_inactive || e.is_active) && parent_id.map_or(true, |p| e.parent_id == Some(p))
        });
        rows.sort_by_key(|e| unique_key(&e.description));
        Ok(rows)
    }

    pub async fn get_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
    ) -> Result<CatalogEntry, MaintenanceError> {
        self.repos
            .catalog
            .find(kind, id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found(kind.resource(), id))
    }

    pub async fn create_catalog_entry(
        &self,
        kind: CatalogKind,
        entry: NewCatalogEntry,
    ) -> Result<CatalogEntry, MaintenanceError> {
        let entry = self.check_catalog_entry(kind, None, entry).await?;
        let created = self
            .repos
            .catalog
            .create(kind, &entry)
            .await
            .map_err(internal)?;
        tracing::info!(table = kind.table(), id = created.id, "lookup row created");
        Ok(created)
    }

    pub async fn update_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
        entry: NewCatalogEntry,
    ) -> Result<CatalogEntry, MaintenanceError> {
        let existing = self.get_catalog_entry(kind, id).await?;
        let entry = self.check_catalog_entry(kind, Some(&existing), entry).await?;
        let updated = self
            .repos
            .catalog
            .update(kind, id, &entry)
            .await
            .map_err(internal)?;
        tracing::info!(table = kind.table(), id, "lookup row updated");
        Ok(updated)
    }

    pub async fn set_catalog_active(
        &self,
        kind: CatalogKind,
        id: i32,
        is_active: bool,
    ) -> Result<(), MaintenanceError> {
        if !kind.has_active_flag() {
            return Err(MaintenanceError::validation(format!(
                "{} rows cannot be deactivated",
                kind.resource()
            )));
        }
        self.get_catalog_entry(kind, id).await?;
        self.repos
            .catalog
            .set_active(kind, id, is_active)
            .await
            .map_err(internal)?;
        tracing::info!(table = kind.table(), id, is_active, "lookup row activation changed");
        Ok(())
    }

    /// Delete a lookup row that nothing references
    pub async fn delete_catalog_entry(
        &self,
        kind: CatalogKind,
        id: i32,
    ) -> Result<(), MaintenanceError> {
        let existing = self.get_catalog_entry(kind, id).await?;

        if let Some(child) = kind.child() {
            let children = self.list_catalog(child, Some(id), true).await?;
            if !children.is_empty() {
                return Err(MaintenanceError::conflict(format!(
                    "{} '{}' still has {} {} row(s)",
                    kind.resource(),
                    existing.description,
                    children.len(),
                    child.resource().to_lowercase()
                )));
            }
        }

        match kind {
            CatalogKind::EquipmentType => {
                let items = self.repos.items.list(Some(id)).await.map_err(internal)?;
                if !items.is_empty() {
                    return Err(MaintenanceError::conflict(format!(
                        "Equipment type '{}' still has {} item(s)",
                        existing.description,
                        items.len()
                    )));
                }
                let links = self
                    .repos
                    .parts
                    .count_links(Some(id), None)
                    .await
                    .map_err(internal)?;
                if links > 0 {
                    return Err(MaintenanceError::conflict(format!(
                        "Equipment type '{}' still has {} linked part(s)",
                        existing.description, links
                    )));
                }
            }
            CatalogKind::Gang => {
                let jobs = self
                    .repos
                    .jobs
                    .count_referencing(JobReference::Gang(id))
                    .await
                    .map_err(internal)?;
                if jobs > 0 {
                    return Err(MaintenanceError::conflict(format!(
                        "Gang '{}' is used by {} job(s)",
                        existing.description, jobs
                    )));
                }
            }
            CatalogKind::Function => {
                let grants = self
                    .repos
                    .access
                    .count_grants(id)
                    .await
                    .map_err(internal)?;
                if grants > 0 {
                    return Err(MaintenanceError::conflict(format!(
                        "Function '{}' is granted to {} user(s)",
                        existing.description, grants
                    )));
                }
            }
            _ => {}
        }

        self.repos.catalog.delete(kind, id).await.map_err(internal)?;
        tracing::info!(table = kind.table(), id, "lookup row deleted");
        Ok(())
    }

    /// `get_allequipmenttypes`, ordered by category then type
    pub async fn equipment_types_detailed(
        &self,
    ) -> Result<Vec<EquipmentTypeDetail>, MaintenanceError> {
        let mut rows = self
            .repos
            .catalog
            .equipment_types_detailed()
            .await
            .map_err(internal)?;
        rows.sort_by_key(|r| (unique_key(&r.category), unique_key(&r.description)));
        Ok(rows)
    }

    /// Shafts, sections or gangs together with their ancestors
    pub async fn locations_detailed(
        &self,
        level: CatalogKind,
    ) -> Result<Vec<LocationDetail>, MaintenanceError> {
        if !matches!(
            level,
            CatalogKind::Shaft | CatalogKind::Section | CatalogKind::Gang
        ) {
            return Err(MaintenanceError::validation(format!(
                "{} is not a location level below a mine",
                level.resource()
            )));
        }
        let mut rows = self
            .repos
            .catalog
            .locations_detailed(level)
            .await
            .map_err(internal)?;
        rows.sort_by_key(|r| {
            (
                unique_key(&r.mine),
                r.shaft.as_deref().map(unique_key),
                r.section.as_deref().map(unique_key),
                unique_key(&r.description),
            )
        });
        Ok(rows)
    }

    // ===== Helper Methods =====

    /// Validate description, parent and sibling uniqueness
    ///
    /// `existing` is the row being updated; keeping its current parent is
    /// allowed even when that parent has been deactivated since.
    async fn check_catalog_entry(
        &self,
        kind: CatalogKind,
        existing: Option<&CatalogEntry>,
        entry: NewCatalogEntry,
    ) -> Result<NewCatalogEntry, MaintenanceError> {
        let description = normalize_text(
            "Description",
            &entry.description,
            self.config.max_description_length,
        )?;

        let parent_id = match kind.parent() {
            Some(parent_kind) => {
                let parent_id = entry.parent_id.ok_or_else(|| {
                    MaintenanceError::validation(format!(
                        "{} requires a {}",
                        kind.resource(),
                        parent_kind.resource().to_lowercase()
                    ))
                })?;
                let parent = self.get_catalog_entry(parent_kind, parent_id).await?;
                let unchanged = existing.map_or(false, |e| e.parent_id == Some(parent_id));
                if !parent.is_active && !unchanged {
                    return Err(MaintenanceError::inactive(parent_kind.resource(), parent_id));
                }
                Some(parent_id)
            }
            None => {
                if entry.parent_id.is_some() {
                    return Err(MaintenanceError::validation(format!(
                        "{} has no parent",
                        kind.resource()
                    )));
                }
                None
            }
        };

        let key = unique_key(&description);
        let existing_id = existing.map(|e| e.id);
        let siblings = self.repos.catalog.list(kind).await.map_err(internal)?;
        let duplicate = siblings.iter().any(|e| {
            Some(e.id) != existing_id && e.parent_id == parent_id && unique_key(&e.description) == key
        });
        if duplicate {
            return Err(MaintenanceError::conflict(format!(
                "{} '{}' already exists",
                kind.resource(),
                description
            )));
        }

        Ok(NewCatalogEntry {
            parent_id,
            description,
        })
    }
}
