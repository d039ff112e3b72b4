//! HTTP request handlers - thin layer that delegates to domain service

use super::dto::*;
use super::error::{ok, ApiError, ApiResult, Envelope};
use crate::contract::{CatalogKind, NewJobPart, NewNote, NewNoteComment, ReportPeriod};
use crate::domain::{GeneratedReport, LocationFilter, ReportFilter, Service};
use crate::export::{self, ExportFormat};
use axum::{
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

fn map_all<T, D: From<T>>(rows: Vec<T>) -> Vec<D> {
    rows.into_iter().map(D::from).collect()
}

// ===== Lookup Table Handlers =====

pub async fn list_catalog(
    service: Arc<Service>,
    kind: CatalogKind,
    query: ListCatalogQuery,
) -> ApiResult<Vec<CatalogEntryDto>> {
    let rows = service
        .list_catalog(kind, query.parentid, query.includeinactive)
        .await?;
    ok(map_all(rows))
}

pub async fn get_catalog_entry(
    service: Arc<Service>,
    kind: CatalogKind,
    id: i32,
) -> ApiResult<CatalogEntryDto> {
    ok(service.get_catalog_entry(kind, id).await?.into())
}

pub async fn create_catalog_entry(
    service: Arc<Service>,
    kind: CatalogKind,
    req: CatalogEntryRequest,
) -> ApiResult<CatalogEntryDto> {
    ok(service.create_catalog_entry(kind, req.into()).await?.into())
}

pub async fn update_catalog_entry(
    service: Arc<Service>,
    kind: CatalogKind,
    id: i32,
    req: CatalogEntryRequest,
) -> ApiResult<CatalogEntryDto> {
    ok(service
        .update_catalog_entry(kind, id, req.into())
        .await?
        .into())
}

pub async fn set_catalog_active(
    service: Arc<Service>,
    kind: CatalogKind,
    id: i32,
    req: ActiveRequest,
) -> ApiResult<()> {
    service.set_catalog_active(kind, id, req.isactive).await?;
    ok(())
}

pub async fn delete_catalog_entry(
    service: Arc<Service>,
    kind: CatalogKind,
    id: i32,
) -> ApiResult<()> {
    service.delete_catalog_entry(kind, id).await?;
    ok(())
}

pub async fn equipment_types_detailed(
    service: Arc<Service>,
) -> ApiResult<Vec<EquipmentTypeDetailDto>> {
    ok(map_all(service.equipment_types_detailed().await?))
}

pub async fn locations_detailed(
    service: Arc<Service>,
    level: CatalogKind,
) -> ApiResult<Vec<LocationDetailDto>> {
    ok(map_all(service.locations_detailed(level).await?))
}

// ===== Equipment Item Handlers =====

pub async fn list_items(
    service: Arc<Service>,
    query: ListItemsQuery,
) -> ApiResult<Vec<EquipmentItemDto>> {
    ok(map_all(service.list_items(query.typeid).await?))
}

pub async fn get_item(service: Arc<Service>, id: i32) -> ApiResult<EquipmentItemDto> {
    ok(service.get_item(id).await?.into())
}

pub async fn find_item_by_serial(
    service: Arc<Service>,
    serial_no: String,
) -> ApiResult<EquipmentItemDto> {
    ok(service.find_item_by_serial(&serial_no).await?.into())
}

pub async fn create_item(
    service: Arc<Service>,
    req: EquipmentItemRequest,
) -> ApiResult<EquipmentItemDto> {
    ok(service.create_item(req.into()).await?.into())
}

pub async fn update_item(
    service: Arc<Service>,
    id: i32,
    req: EquipmentItemRequest,
) -> ApiResult<EquipmentItemDto> {
    ok(service.update_item(id, req.into()).await?.into())
}

pub async fn set_item_active(service: Arc<Service>, id: i32, req: ActiveRequest) -> ApiResult<()> {
    service.set_item_active(id, req.isactive).await?;
    ok(())
}

pub async fn delete_item(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_item(id).await?;
    ok(())
}

// ===== Part Handlers =====

pub async fn list_parts(service: Arc<Service>) -> ApiResult<Vec<PartDto>> {
    ok(map_all(service.list_parts().await?))
}

pub async fn get_part(service: Arc<Service>, id: i32) -> ApiResult<PartDto> {
    ok(service.get_part(id).await?.into())
}

pub async fn create_part(service: Arc<Service>, req: PartRequest) -> ApiResult<PartDto> {
    ok(service.create_part(req.into()).await?.into())
}

pub async fn update_part(service: Arc<Service>, id: i32, req: PartRequest) -> ApiResult<PartDto> {
    ok(service.update_part(id, req.into()).await?.into())
}

pub async fn set_part_active(service: Arc<Service>, id: i32, req: ActiveRequest) -> ApiResult<()> {
    service.set_part_active(id, req.isactive).await?;
    ok(())
}

pub async fn delete_part(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_part(id).await?;
    ok(())
}

pub async fn parts_for_type(service: Arc<Service>, type_id: i32) -> ApiResult<Vec<PartForTypeDto>> {
    ok(map_all(service.parts_for_type(type_id).await?))
}

pub async fn link_part_to_type(
    service: Arc<Service>,
    type_id: i32,
    req: LinkPartRequest,
) -> ApiResult<PartForTypeDto> {
    ok(service.link_part_to_type(type_id, req.partid).await?.into())
}

pub async fn unlink_part_from_type(service: Arc<Service>, link_id: i32) -> ApiResult<()> {
    service.unlink_part_from_type(link_id).await?;
    ok(())
}

// ===== Technician Handlers =====

pub async fn list_technicians(service: Arc<Service>) -> ApiResult<Vec<TechnicianDto>> {
    ok(map_all(service.list_technicians().await?))
}

pub async fn get_technician(service: Arc<Service>, id: i32) -> ApiResult<TechnicianDto> {
    ok(service.get_technician(id).await?.into())
}

pub async fn create_technician(
    service: Arc<Service>,
    req: TechnicianRequest,
) -> ApiResult<TechnicianDto> {
    ok(service.create_technician(req.into()).await?.into())
}

pub async fn update_technician(
    service: Arc<Service>,
    id: i32,
    req: TechnicianRequest,
) -> ApiResult<TechnicianDto> {
    ok(service.update_technician(id, req.into()).await?.into())
}

pub async fn set_technician_active(
    service: Arc<Service>,
    id: i32,
    req: ActiveRequest,
) -> ApiResult<()> {
    service.set_technician_active(id, req.isactive).await?;
    ok(())
}

pub async fn delete_technician(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_technician(id).await?;
    ok(())
}

// ===== Job Handlers =====

pub async fn list_jobs(service: Arc<Service>, query: ListJobsQuery) -> ApiResult<Vec<JobDto>> {
    let period = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(ReportPeriod { start, end }),
        (None, None) => None,
        (start, end) => service.report_period(start, end)?,
    };
    ok(map_all(service.list_jobs(period).await?))
}

pub async fn get_job(service: Arc<Service>, id: i32) -> ApiResult<JobDetailDto> {
    let job = service.get_job(id).await?;
    let parts = service.job_parts(id).await?;
    ok(JobDetailDto {
        job: job.into(),
        parts: map_all(parts),
    })
}

pub async fn create_job(service: Arc<Service>, req: JobRequest) -> ApiResult<JobDetailDto> {
    let (job, parts) = service.create_job(req.into()).await?;
    ok(JobDetailDto {
        job: job.into(),
        parts: map_all(parts),
    })
}

pub async fn update_job(service: Arc<Service>, id: i32, req: JobRequest) -> ApiResult<JobDto> {
    ok(service.update_job(id, req.into()).await?.into())
}

pub async fn delete_job(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_job(id).await?;
    ok(())
}

pub async fn job_parts(service: Arc<Service>, job_id: i32) -> ApiResult<Vec<JobPartDto>> {
    ok(map_all(service.job_parts(job_id).await?))
}

pub async fn add_job_part(
    service: Arc<Service>,
    job_id: i32,
    req: JobPartRequest,
) -> ApiResult<JobPartDto> {
    let part = NewJobPart::from(req);
    ok(service.add_job_part(job_id, part).await?.into())
}

pub async fn remove_job_part(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.remove_job_part(id).await?;
    ok(())
}

// ===== Note Handlers =====

pub async fn list_notes(
    service: Arc<Service>,
    query: ListNotesQuery,
) -> ApiResult<Vec<NoteSummaryDto>> {
    ok(map_all(service.list_notes(query.serialno.as_deref()).await?))
}

pub async fn create_note(service: Arc<Service>, req: NoteRequest) -> ApiResult<NoteDto> {
    let note = NewNote {
        item_id: req.itemid,
        note_date: req
            .notedate
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
        note: req.note,
        created_by: req.createdby,
    };
    ok(service.create_note(note).await?.into())
}

pub async fn update_note(
    service: Arc<Service>,
    id: i32,
    req: UpdateNoteRequest,
) -> ApiResult<NoteDto> {
    ok(service.update_note(id, &req.note).await?.into())
}

pub async fn delete_note(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_note(id).await?;
    ok(())
}

pub async fn note_comments(service: Arc<Service>, note_id: i32) -> ApiResult<Vec<NoteCommentDto>> {
    ok(map_all(service.note_comments(note_id).await?))
}

pub async fn add_note_comment(
    service: Arc<Service>,
    note_id: i32,
    req: NoteCommentRequest,
) -> ApiResult<NoteCommentDto> {
    let comment = NewNoteComment {
        note_id,
        comment: req.comment,
        created_by: req.createdby,
    };
    ok(service.add_note_comment(comment).await?.into())
}

pub async fn delete_note_comment(service: Arc<Service>, id: i32) -> ApiResult<()> {
    service.delete_note_comment(id).await?;
    ok(())
}

// ===== User Handlers =====

pub async fn list_users(service: Arc<Service>) -> ApiResult<Vec<UserDto>> {
    ok(map_all(service.list_users().await?))
}

pub async fn get_user(service: Arc<Service>, id: Uuid) -> ApiResult<UserDto> {
    ok(service.get_user(id).await?.into())
}

pub async fn create_user(service: Arc<Service>, req: CreateUserRequest) -> ApiResult<UserDto> {
    ok(service.create_user(req.into()).await?.into())
}

pub async fn update_user(
    service: Arc<Service>,
    id: Uuid,
    req: UpdateUserRequest,
) -> ApiResult<UserDto> {
    ok(service
        .update_user(id, &req.email, &req.fullname)
        .await?
        .into())
}

pub async fn set_user_active(service: Arc<Service>, id: Uuid, req: ActiveRequest) -> ApiResult<()> {
    service.set_user_active(id, req.isactive).await?;
    ok(())
}

pub async fn user_functions(service: Arc<Service>, id: Uuid) -> ApiResult<Vec<UserFunctionDto>> {
    ok(map_all(service.user_functions(id).await?))
}

pub async fn grant_function(
    service: Arc<Service>,
    id: Uuid,
    req: GrantFunctionRequest,
) -> ApiResult<UserFunctionDto> {
    ok(service.grant_function(id, req.functionid).await?.into())
}

pub async fn revoke_function(service: Arc<Service>, id: Uuid, function_id: i32) -> ApiResult<()> {
    service.revoke_function(id, function_id).await?;
    ok(())
}

pub async fn permissions_for(service: Arc<Service>, id: Uuid) -> ApiResult<UserPermissionsDto> {
    ok(service.permissions_for(id).await?.into())
}

// ===== Report Handlers =====

/// Reports driven by the period / type / location filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilteredReport {
    ServicesDone,
    ServiceList,
    JobsPerTechnician,
    JobCount,
}

pub async fn filtered_report(
    service: Arc<Service>,
    report: FilteredReport,
    query: ReportQuery,
) -> Result<Response, ApiError> {
    let filter = ReportFilter {
        period: service.report_period(query.start, query.end)?,
        equipment_type_id: query.typeid,
        location: LocationFilter {
            mine_id: query.mineid,
            shaft_id: query.shaftid,
            section_id: query.sectionid,
            gang_id: query.gangid,
        },
    };
    let generated = match report {
        FilteredReport::ServicesDone => service.services_done(filter).await?,
        FilteredReport::ServiceList => service.service_list(filter).await?,
        FilteredReport::JobsPerTechnician => service.jobs_per_technician(filter).await?,
        FilteredReport::JobCount => service.job_count(filter).await?,
    };
    report_response(generated, query.format.as_deref())
}

pub async fn individual_history(
    service: Arc<Service>,
    item_id: i32,
    query: ReportQuery,
) -> Result<Response, ApiError> {
    let generated = service.individual_history(item_id).await?;
    report_response(generated, query.format.as_deref())
}

pub async fn location_options(
    service: Arc<Service>,
    query: LocationQuery,
) -> ApiResult<LocationOptionsDto> {
    ok(service.location_options(query.into()).await?.into())
}

/// JSON envelope, or the rendered file as an attachment
fn report_response(report: GeneratedReport, format: Option<&str>) -> Result<Response, ApiError> {
    let format = format
        .map(str::trim)
        .filter(|f| !f.is_empty() && !f.eq_ignore_ascii_case("json"));
    let Some(format) = format else {
        let body = Envelope::ok(ReportDto::from(report.table));
        return Ok(Json(body).into_response());
    };

    let format: ExportFormat = format.parse()?;
    let bytes = export::render(&report.table, format)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        format.file_name(&report.file_stem)
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
