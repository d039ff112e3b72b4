use super::{internal, Service};
use crate::contract::{MaintenanceError, NewTechnician, Technician};
use crate::domain::repository::JobReference;
use crate::domain::validation::{normalize_text, unique_key};

const MAX_NAME_LENGTH: usize = 50;

impl Service {
    /// Technicians ordered by surname, then name
    pub async fn list_technicians(&self) -> Result<Vec<Technician>, MaintenanceError> {
        let mut technicians = self.repos.technicians.list().await.map_err(internal)?;
        technicians.sort_by_key(|t| (unique_key(&t.surname), unique_key(&t.name)));
        Ok(technicians)
    }

    pub async fn get_technician(&self, id: i32) -> Result<Technician, MaintenanceError> {
        self.repos
            .technicians
            .find(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Technician", id))
    }

    pub async fn create_technician(
        &self,
        technician: NewTechnician,
    ) -> Result<Technician, MaintenanceError> {
        let technician = self.check_technician(None, technician).await?;
        let created = self
            .repos
            .technicians
            .create(&technician)
            .await
            .map_err(internal)?;
        tracing::info!(technician_id = created.id, "technician created");
        Ok(created)
    }

    pub async fn update_technician(
        &self,
        id: i32,
        technician: NewTechnician,
    ) -> Result<Technician, MaintenanceError> {
        self.get_technician(id).await?;
        let technician = self.check_technician(Some(id), technician).await?;
        let updated = self
            .repos
            .technicians
            .update(id, &technician)
            .await
            .map_err(internal)?;
        tracing::info!(technician_id = id, "technician updated");
        Ok(updated)
    }

    pub async fn set_technician_active(
        &self,
        id: i32,
        is_active: bool,
    ) -> Result<(), MaintenanceError> {
        self.get_technician(id).await?;
        self.repos
            .technicians
            .set_active(id, is_active)
            .await
            .map_err(internal)?;
        tracing::info!(technician_id = id, is_active, "technician activation changed");
        Ok(())
    }

    pub async fn delete_technician(&self, id: i32) -> Result<(), MaintenanceError> {
        let existing = self.get_technician(id).await?;
        let jobs = self
            .repos
            .jobs
            .count_referencing(JobReference::Technician(id))
            .await
            .map_err(internal)?;
        if jobs > 0 {
            return Err(MaintenanceError::conflict(format!(
                "Technician '{}' has {} job(s)",
                existing.full_name(),
                jobs
            )));
        }
        self.repos.technicians.delete(id).await.map_err(internal)?;
        tracing::info!(technician_id = id, "technician deleted");
        Ok(())
    }

    async fn check_technician(
        &self,
        existing_id: Option<i32>,
        technician: NewTechnician,
    ) -> Result<NewTechnician, MaintenanceError> {
        let name = normalize_text("Name", &technician.name, MAX_NAME_LENGTH)?;
        let surname = normalize_text("Surname", &technician.surname, MAX_NAME_LENGTH)?;

        let key = (unique_key(&name), unique_key(&surname));
        let technicians = self.repos.technicians.list().await.map_err(internal)?;
        let duplicate = technicians.iter().any(|t| {
            Some(t.id) != existing_id && (unique_key(&t.name), unique_key(&t.surname)) == key
        });
        if duplicate {
            return Err(MaintenanceError::conflict(format!(
                "Technician '{} {}' already exists",
                name, surname
            )));
        }

        Ok(NewTechnician { name, surname })
    }
}
