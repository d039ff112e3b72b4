use super::{internal, Service};
use crate::contract::{CatalogKind, MaintenanceError, ReportPeriod};
use crate::domain::filter::{
    location_options, FilterSubject, LocationFilter, LocationOptions, ReportFilter,
};
use crate::domain::reports::{
    individual_history_layout, job_count_layout, jobs_per_technician_layout,
    service_list_layout, services_done_layout, ReportLayout,
};
use crate::domain::validation::validate_period;
use crate::export::ReportTable;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// A rendered report and the stem of its download file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReport {
    pub table: ReportTable,
    pub file_stem: String,
}

impl Service {
    // ===== Reports =====

    /// Parts used per job, grouped by mine and shaft
    pub async fn services_done(
        &self,
        filter: ReportFilter,
    ) -> Result<GeneratedReport, MaintenanceError> {
        let (filter, period) = self.resolve_filter(filter).await?;
        let rows = self
            .repos
            .reports
            .jobs_with_parts(period)
            .await
            .map_err(internal)?;
        self.generate(services_done_layout(), filter.apply(rows), &filter)
            .await
    }

    /// Serviced items with last service date and count
    pub async fn service_list(
        &self,
        filter: ReportFilter,
    ) -> Result<GeneratedReport, MaintenanceError> {
        let (filter, period) = self.resolve_filter(filter).await?;
        let rows = self
            .repos
            .reports
            .serviced_list(period)
            .await
            .map_err(internal)?;
        self.generate(service_list_layout(), filter.apply(rows), &filter)
            .await
    }

    pub async fn jobs_per_technician(
        &self,
        filter: ReportFilter,
    ) -> Result<GeneratedReport, MaintenanceError> {
        let (filter, period) = self.resolve_filter(filter).await?;
        let rows = self
            .repos
            .reports
            .jobs_per_technician(period)
            .await
            .map_err(internal)?;
        self.generate(jobs_per_technician_layout(), filter.apply(rows), &filter)
            .await
    }

    pub async fn job_count(&self, filter: ReportFilter) -> Result<GeneratedReport, MaintenanceError> {
        let (filter, period) = self.resolve_filter(filter).await?;
        let rows = self
            .repos
            .reports
            .job_count_per_item(period)
            .await
            .map_err(internal)?;
        self.generate(job_count_layout(), filter.apply(rows), &filter)
            .await
    }

    /// Every job and part recorded against one item
    pub async fn individual_history(
        &self,
        item_id: i32,
    ) -> Result<GeneratedReport, MaintenanceError> {
        let item = self.get_item(item_id).await?;
        let equipment_type = self
            .get_catalog_entry(CatalogKind::EquipmentType, item.type_id)
            .await?;
        let rows = self
            .repos
            .reports
            .individual_history(item_id)
            .await
            .map_err(internal)?;

        let layout = individual_history_layout();
        let labels = vec![
            format!("Serial No: {}", item.serial_no),
            format!("Equipment Type: {}", equipment_type.description),
        ];
        let table = layout.build(rows, self.report_title(&layout), labels);
        Ok(GeneratedReport {
            table,
            file_stem: format!("{}_{}", layout.slug, item.serial_no),
        })
    }

    /// Options for the cascading mine, shaft, section and gang dropdowns
    pub async fn location_options(
        &self,
        filter: LocationFilter,
    ) -> Result<LocationOptions, MaintenanceError> {
        let mines = self.list_catalog(CatalogKind::Mine, None, true).await?;
        let shafts = self.locations_detailed(CatalogKind::Shaft).await?;
        let sections = self.locations_detailed(CatalogKind::Section).await?;
        let gangs = self.locations_detailed(CatalogKind::Gang).await?;
        Ok(location_options(filter, mines, shafts, sections, gangs))
    }

    /// Period from optional start and end dates
    ///
    /// A single date is extended by `default_report_days` days; without
    /// dates there is no explicit period and the default applies.
    pub fn report_period(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<ReportPeriod>, MaintenanceError> {
        let span = self.default_span();
        let period = match (start, end) {
            (Some(start), Some(end)) => ReportPeriod { start, end },
            (Some(start), None) => ReportPeriod {
                start,
                end: shift_date(start, span)?,
            },
            (None, Some(end)) => ReportPeriod {
                start: shift_date(end, -span)?,
                end,
            },
            (None, None) => return Ok(None),
        };
        Ok(Some(period))
    }

    // ===== Helper Methods =====

    /// Fill in the default period and normalize the location selection
    ///
    /// Without a period the report covers the last `default_report_days`
    /// days up to today.
    async fn resolve_filter(
        &self,
        filter: ReportFilter,
    ) -> Result<(ReportFilter, ReportPeriod), MaintenanceError> {
        let period = match filter.period {
            Some(period) => period,
            None => {
                let end = self.today();
                ReportPeriod {
                    start: shift_date(end, -self.default_span())?,
                    end,
                }
            }
        };
        validate_period(&period)?;

        let location = if filter.location.is_empty() {
            filter.location
        } else {
            let shafts = self.locations_detailed(CatalogKind::Shaft).await?;
            let sections = self.locations_detailed(CatalogKind::Section).await?;
            let gangs = self.locations_detailed(CatalogKind::Gang).await?;
            filter.location.normalize(&shafts, &sections, &gangs)
        };

        let filter = ReportFilter {
            period: Some(period),
            equipment_type_id: filter.equipment_type_id,
            location,
        };
        Ok((filter, period))
    }

    async fn generate<T: FilterSubject>(
        &self,
        layout: ReportLayout<T>,
        rows: Vec<T>,
        filter: &ReportFilter,
    ) -> Result<GeneratedReport, MaintenanceError> {
        let filter = &filter.scoped::<T>();
        let names = self.filter_names(filter).await?;
        let labels = filter.labels(|kind, id| names.get(&(kind, id)).cloned());
        let table = layout.build(rows, self.report_title(&layout), labels);
        let file_stem = match filter.period {
            Some(period) => format!("{}_{}_{}", layout.slug, period.start, period.end),
            None => layout.slug.to_string(),
        };
        tracing::debug!(report = layout.slug, rows = table.rows.len(), "report generated");
        Ok(GeneratedReport { table, file_stem })
    }

    fn default_span(&self) -> i64 {
        i64::from(self.config.default_report_days)
    }

    fn report_title<T>(&self, layout: &ReportLayout<T>) -> String {
        format!("{} - {}", self.config.report_title_prefix, layout.title)
    }

    /// Descriptions of the lookup rows selected in the filter
    async fn filter_names(
        &self,
        filter: &ReportFilter,
    ) -> Result<HashMap<(CatalogKind, i32), String>, MaintenanceError> {
        let selections = [
            (CatalogKind::EquipmentType, filter.equipment_type_id),
            (CatalogKind::Mine, filter.location.mine_id),
            (CatalogKind::Shaft, filter.location.shaft_id),
            (CatalogKind::Section, filter.location.section_id),
            (CatalogKind::Gang, filter.location.gang_id),
        ];
        let mut names = HashMap::new();
        for (kind, id) in selections {
            let Some(id) = id else { continue };
            if let Some(entry) = self.repos.catalog.find(kind, id).await.map_err(internal)? {
                names.insert((kind, id), entry.description);
            }
        }
        Ok(names)
    }
}

/// `date` moved by `days`, or a validation error outside the calendar range
fn shift_date(date: NaiveDate, days: i64) -> Result<NaiveDate, MaintenanceError> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| MaintenanceError::validation("date out of range"))
}
