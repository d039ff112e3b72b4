use super::{internal, Service};
use crate::contract::{
    CatalogKind, Job, JobPart, JobUpdate, MaintenanceError, NewJob, NewJobPart, ReportPeriod,
};
use crate::domain::validation::{
    normalize_optional, normalize_text, validate_job_date, validate_period, validate_quantity,
};
use std::collections::HashSet;

const MAX_JOB_TYPE_LENGTH: usize = 50;

impl Service {
    // ===== Jobs =====

    /// Jobs ordered by date, optionally within a period
    pub async fn list_jobs(
        &self,
        period: Option<ReportPeriod>,
    ) -> Result<Vec<Job>, MaintenanceError> {
        if let Some(period) = &period {
            validate_period(period)?;
        }
        self.repos.jobs.list(period).await.map_err(internal)
    }

    pub async fn get_job(&self, id: i32) -> Result<Job, MaintenanceError> {
        self.repos
            .jobs
            .find(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Job", id))
    }

    /// Record a job and the parts it consumed
    pub async fn create_job(&self, job: NewJob) -> Result<(Job, Vec<JobPart>), MaintenanceError> {
        let header = self.check_job_header(None, job.header()).await?;

        let mut seen = HashSet::new();
        for part in &job.parts {
            validate_quantity(part.quantity)?;
            if !seen.insert(part.part_id) {
                return Err(MaintenanceError::validation(format!(
                    "Part {} is listed more than once",
                    part.part_id
                )));
            }
            self.check_usable_part(part.part_id).await?;
        }

        let job = NewJob {
            item_id: header.item_id,
            technician_id: header.technician_id,
            gang_id: header.gang_id,
            job_date: header.job_date,
            job_type: header.job_type,
            remarks: header.remarks,
            parts: job.parts,
        };
        let (created, parts) = self.repos.jobs.create(&job).await.map_err(internal)?;
        tracing::info!(
            job_id = created.id,
            item_id = created.item_id,
            parts = parts.len(),
            "job recorded"
        );
        Ok((created, parts))
    }

    pub async fn update_job(&self, id: i32, job: JobUpdate) -> Result<Job, MaintenanceError> {
        let existing = self.get_job(id).await?;
        let job = self.check_job_header(Some(&existing), job).await?;
        let updated = self.repos.jobs.update(id, &job).await.map_err(internal)?;
        tracing::info!(job_id = id, "job updated");
        Ok(updated)
    }

    /// Delete a job together with its parts
    pub async fn delete_job(&self, id: i32) -> Result<(), MaintenanceError> {
        self.get_job(id).await?;
        self.repos.jobs.delete(id).await.map_err(internal)?;
        tracing::info!(job_id = id, "job deleted");
        Ok(())
    }

    // ===== Parts per job =====

    pub async fn job_parts(&self, job_id: i32) -> Result<Vec<JobPart>, MaintenanceError> {
        self.get_job(job_id).await?;
        self.repos.jobs.parts(job_id).await.map_err(internal)
    }

    pub async fn add_job_part(
        &self,
        job_id: i32,
        part: NewJobPart,
    ) -> Result<JobPart, MaintenanceError> {
        self.get_job(job_id).await?;
        validate_quantity(part.quantity)?;
        let existing = self.check_usable_part(part.part_id).await?;

        let parts = self.repos.jobs.parts(job_id).await.map_err(internal)?;
        if parts.iter().any(|p| p.part_id == part.part_id) {
            return Err(MaintenanceError::conflict(format!(
                "Part '{}' is already on job {}",
                existing, job_id
            )));
        }

        let added = self
            .repos
            .jobs
            .add_part(job_id, &part)
            .await
            .map_err(internal)?;
        tracing::info!(job_id, part_id = part.part_id, quantity = part.quantity, "part added to job");
        Ok(added)
    }

    pub async fn remove_job_part(&self, id: i32) -> Result<(), MaintenanceError> {
        let part = self
            .repos
            .jobs
            .find_part(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| MaintenanceError::not_found("Job part", id))?;
        self.repos.jobs.remove_part(id).await.map_err(internal)?;
        tracing::info!(job_id = part.job_id, part_id = part.part_id, "part removed from job");
        Ok(())
    }

    // ===== Helper Methods =====

    /// Validate a job header
    ///
    /// Item, technician and gang must exist and be active, except that an
    /// update may keep a reference that has been deactivated since.
    async fn check_job_header(
        &self,
        existing: Option<&Job>,
        job: JobUpdate,
    ) -> Result<JobUpdate, MaintenanceError> {
        let job_type = normalize_text("Job type", &job.job_type, MAX_JOB_TYPE_LENGTH)?;
        validate_job_date(job.job_date, self.today(), self.config.reject_future_job_dates)?;

        let item = self.get_item(job.item_id).await?;
        if !item.is_active && existing.map_or(true, |e| e.item_id != job.item_id) {
            return Err(MaintenanceError::inactive("Equipment item", job.item_id));
        }

        let technician = self.get_technician(job.technician_id).await?;
        if !technician.is_active && existing.map_or(true, |e| e.technician_id != job.technician_id)
        {
            return Err(MaintenanceError::inactive("Technician", job.technician_id));
        }

        let gang = self.get_catalog_entry(CatalogKind::Gang, job.gang_id).await?;
        if !gang.is_active && existing.map_or(true, |e| e.gang_id != job.gang_id) {
            return Err(MaintenanceError::inactive("Gang", job.gang_id));
        }

        Ok(JobUpdate {
            item_id: job.item_id,
            technician_id: job.technician_id,
            gang_id: job.gang_id,
            job_date: job.job_date,
            job_type,
            remarks: normalize_optional(job.remarks.as_deref()),
        })
    }

    /// Returns the part number of an existing, active part
    async fn check_usable_part(&self, part_id: i32) -> Result<String, MaintenanceError> {
        let part = self.get_part(part_id).await?;
        if !part.is_active {
            return Err(MaintenanceError::inactive("Part", part_id));
        }
        Ok(part.part_no)
    }
}
