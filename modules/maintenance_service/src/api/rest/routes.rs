//! Route registration

use super::dto::*;
use super::error::{ApiError, ApiResult};
use super::extract::{Json, Path, Query};
use super::handlers::{self, FilteredReport};
use crate::contract::CatalogKind;
use crate::domain::Service;
use axum::{
    response::Response,
    routing::{delete, get, put},
    Extension, Router,
};
use std::sync::Arc;
use uuid::Uuid;

type Svc = Extension<Arc<Service>>;

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let mut router = router;
    for kind in CatalogKind::ALL {
        router = router.merge(catalog_routes(kind));
    }

    router
        // Detailed lookup views
        .route("/equipment-types/detailed", get(equipment_types_detailed_handler))
        .route("/shafts/detailed", get(shafts_detailed_handler))
        .route("/sections/detailed", get(sections_detailed_handler))
        .route("/gangs/detailed", get(gangs_detailed_handler))
        // Equipment items
        .route("/equipment-items", get(list_items_handler).post(create_item_handler))
        .route(
            "/equipment-items/{id}",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        .route("/equipment-items/{id}/active", put(set_item_active_handler))
        .route("/equipment-items/by-serial/{serialno}", get(find_item_by_serial_handler))
        // Parts
        .route("/parts", get(list_parts_handler).post(create_part_handler))
        .route(
            "/parts/{id}",
            get(get_part_handler)
                .put(update_part_handler)
                .delete(delete_part_handler),
        )
        .route("/parts/{id}/active", put(set_part_active_handler))
        .route(
            "/equipment-types/{id}/parts",
            get(parts_for_type_handler).post(link_part_handler),
        )
        .route("/parts-per-type/{id}", delete(unlink_part_handler))
        // Technicians
        .route(
            "/technicians",
            get(list_technicians_handler).post(create_technician_handler),
        )
        .route(
            "/technicians/{id}",
            get(get_technician_handler)
                .put(update_technician_handler)
                .delete(delete_technician_handler),
        )
        .route("/technicians/{id}/active", put(set_technician_active_handler))
        // Jobs
        .route("/jobs", get(list_jobs_handler).post(create_job_handler))
        .route(
            "/jobs/{id}",
            get(get_job_handler)
                .put(update_job_handler)
                .delete(delete_job_handler),
        )
        .route("/jobs/{id}/parts", get(job_parts_handler).post(add_job_part_handler))
        .route("/job-parts/{id}", delete(remove_job_part_handler))
        // Notes
        .route("/notes", get(list_notes_handler).post(create_note_handler))
        .route("/notes/{id}", put(update_note_handler).delete(delete_note_handler))
        .route(
            "/notes/{id}/comments",
            get(note_comments_handler).post(add_note_comment_handler),
        )
        .route("/note-comments/{id}", delete(delete_note_comment_handler))
        // Users and permissions
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route("/users/{id}", get(get_user_handler).put(update_user_handler))
        .route("/users/{id}/active", put(set_user_active_handler))
        .route("/users/{id}/permissions", get(permissions_handler))
        .route(
            "/users/{id}/functions",
            get(user_functions_handler).post(grant_function_handler),
        )
        .route(
            "/users/{id}/functions/{functionid}",
            delete(revoke_function_handler),
        )
        // Reports
        .route("/reports/services-done", get(services_done_handler))
        .route("/reports/service-list", get(service_list_handler))
        .route("/reports/jobs-per-technician", get(jobs_per_technician_handler))
        .route("/reports/job-count", get(job_count_handler))
        .route(
            "/reports/individual-history/{itemid}",
            get(individual_history_handler),
        )
        .route("/filters/locations", get(location_options_handler))
        .layer(Extension(service))
}

/// CRUD routes of one lookup table
fn catalog_routes(kind: CatalogKind) -> Router {
    let base = format!("/{}", kind.path());
    Router::new()
        .route(
            &base,
            get(
                move |Extension(service): Svc, Query(query): Query<ListCatalogQuery>| {
                    handlers::list_catalog(service, kind, query)
                },
            )
            .post(
                move |Extension(service): Svc, Json(req): Json<CatalogEntryRequest>| {
                    handlers::create_catalog_entry(service, kind, req)
                },
            ),
        )
        .route(
            &format!("{}/{{id}}", base),
            get(move |Extension(service): Svc, Path(id): Path<i32>| {
                handlers::get_catalog_entry(service, kind, id)
            })
            .put(
                move |Extension(service): Svc,
                      Path(id): Path<i32>,
                      Json(req): Json<CatalogEntryRequest>| {
                    handlers::update_catalog_entry(service, kind, id, req)
                },
            )
            .delete(move |Extension(service): Svc, Path(id): Path<i32>| {
                handlers::delete_catalog_entry(service, kind, id)
            }),
        )
        .route(
            &format!("{}/{{id}}/active", base),
            put(
                move |Extension(service): Svc,
                      Path(id): Path<i32>,
                      Json(req): Json<ActiveRequest>| {
                    handlers::set_catalog_active(service, kind, id, req)
                },
            ),
        )
}

// ===== Handler wrappers that extract service from Extension =====

async fn equipment_types_detailed_handler(
    Extension(service): Svc,
) -> ApiResult<Vec<EquipmentTypeDetailDto>> {
    handlers::equipment_types_detailed(service).await
}

async fn shafts_detailed_handler(Extension(service): Svc) -> ApiResult<Vec<LocationDetailDto>> {
    handlers::locations_detailed(service, CatalogKind::Shaft).await
}

async fn sections_detailed_handler(Extension(service): Svc) -> ApiResult<Vec<LocationDetailDto>> {
    handlers::locations_detailed(service, CatalogKind::Section).await
}

async fn gangs_detailed_handler(Extension(service): Svc) -> ApiResult<Vec<LocationDetailDto>> {
    handlers::locations_detailed(service, CatalogKind::Gang).await
}

async fn list_items_handler(
    Extension(service): Svc,
    Query(query): Query<ListItemsQuery>,
) -> ApiResult<Vec<EquipmentItemDto>> {
    handlers::list_items(service, query).await
}

async fn get_item_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> ApiResult<EquipmentItemDto> {
    handlers::get_item(service, id).await
}

async fn find_item_by_serial_handler(
    Extension(service): Svc,
    Path(serial_no): Path<String>,
) -> ApiResult<EquipmentItemDto> {
    handlers::find_item_by_serial(service, serial_no).await
}

async fn create_item_handler(
    Extension(service): Svc,
    Json(req): Json<EquipmentItemRequest>,
) -> ApiResult<EquipmentItemDto> {
    handlers::create_item(service, req).await
}

async fn update_item_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<EquipmentItemRequest>,
) -> ApiResult<EquipmentItemDto> {
    handlers::update_item(service, id, req).await
}

async fn set_item_active_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<ActiveRequest>,
) -> ApiResult<()> {
    handlers::set_item_active(service, id, req).await
}

async fn delete_item_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::delete_item(service, id).await
}

async fn list_parts_handler(Extension(service): Svc) -> ApiResult<Vec<PartDto>> {
    handlers::list_parts(service).await
}

async fn get_part_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<PartDto> {
    handlers::get_part(service, id).await
}

async fn create_part_handler(
    Extension(service): Svc,
    Json(req): Json<PartRequest>,
) -> ApiResult<PartDto> {
    handlers::create_part(service, req).await
}

async fn update_part_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<PartRequest>,
) -> ApiResult<PartDto> {
    handlers::update_part(service, id, req).await
}

async fn set_part_active_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<ActiveRequest>,
) -> ApiResult<()> {
    handlers::set_part_active(service, id, req).await
}

async fn delete_part_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::delete_part(service, id).await
}

async fn parts_for_type_handler(
    Extension(service): Svc,
    Path(type_id): Path<i32>,
) -> ApiResult<Vec<PartForTypeDto>> {
    handlers::parts_for_type(service, type_id).await
}

async fn link_part_handler(
    Extension(service): Svc,
    Path(type_id): Path<i32>,
    Json(req): Json<LinkPartRequest>,
) -> ApiResult<PartForTypeDto> {
    handlers::link_part_to_type(service, type_id, req).await
}

async fn unlink_part_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::unlink_part_from_type(service, id).await
}

async fn list_technicians_handler(Extension(service): Svc) -> ApiResult<Vec<TechnicianDto>> {
    handlers::list_technicians(service).await
}

async fn get_technician_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> ApiResult<TechnicianDto> {
    handlers::get_technician(service, id).await
}

async fn create_technician_handler(
    Extension(service): Svc,
    Json(req): Json<TechnicianRequest>,
) -> ApiResult<TechnicianDto> {
    handlers::create_technician(service, req).await
}

async fn update_technician_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<TechnicianRequest>,
) -> ApiResult<TechnicianDto> {
    handlers::update_technician(service, id, req).await
}

async fn set_technician_active_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<ActiveRequest>,
) -> ApiResult<()> {
    handlers::set_technician_active(service, id, req).await
}

async fn delete_technician_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::delete_technician(service, id).await
}

async fn list_jobs_handler(
    Extension(service): Svc,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<Vec<JobDto>> {
    handlers::list_jobs(service, query).await
}

async fn get_job_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<JobDetailDto> {
    handlers::get_job(service, id).await
}

async fn create_job_handler(
    Extension(service): Svc,
    Json(req): Json<JobRequest>,
) -> ApiResult<JobDetailDto> {
    handlers::create_job(service, req).await
}

async fn update_job_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<JobRequest>,
) -> ApiResult<JobDto> {
    handlers::update_job(service, id, req).await
}

async fn delete_job_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::delete_job(service, id).await
}

async fn job_parts_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> ApiResult<Vec<JobPartDto>> {
    handlers::job_parts(service, id).await
}

async fn add_job_part_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<JobPartRequest>,
) -> ApiResult<JobPartDto> {
    handlers::add_job_part(service, id, req).await
}

async fn remove_job_part_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::remove_job_part(service, id).await
}

async fn list_notes_handler(
    Extension(service): Svc,
    Query(query): Query<ListNotesQuery>,
) -> ApiResult<Vec<NoteSummaryDto>> {
    handlers::list_notes(service, query).await
}

async fn create_note_handler(
    Extension(service): Svc,
    Json(req): Json<NoteRequest>,
) -> ApiResult<NoteDto> {
    handlers::create_note(service, req).await
}

async fn update_note_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<UpdateNoteRequest>,
) -> ApiResult<NoteDto> {
    handlers::update_note(service, id, req).await
}

async fn delete_note_handler(Extension(service): Svc, Path(id): Path<i32>) -> ApiResult<()> {
    handlers::delete_note(service, id).await
}

async fn note_comments_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> ApiResult<Vec<NoteCommentDto>> {
    handlers::note_comments(service, id).await
}

async fn add_note_comment_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
    Json(req): Json<NoteCommentRequest>,
) -> ApiResult<NoteCommentDto> {
    handlers::add_note_comment(service, id, req).await
}

async fn delete_note_comment_handler(
    Extension(service): Svc,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    handlers::delete_note_comment(service, id).await
}

async fn list_users_handler(Extension(service): Svc) -> ApiResult<Vec<UserDto>> {
    handlers::list_users(service).await
}

async fn get_user_handler(Extension(service): Svc, Path(id): Path<Uuid>) -> ApiResult<UserDto> {
    handlers::get_user(service, id).await
}

async fn create_user_handler(
    Extension(service): Svc,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<UserDto> {
    handlers::create_user(service, req).await
}

async fn update_user_handler(
    Extension(service): Svc,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<UserDto> {
    handlers::update_user(service, id, req).await
}

async fn set_user_active_handler(
    Extension(service): Svc,
    Path(id): Path<Uuid>,
    Json(req): Json<ActiveRequest>,
) -> ApiResult<()> {
    handlers::set_user_active(service, id, req).await
}

async fn permissions_handler(
    Extension(service): Svc,
    Path(id): Path<Uuid>,
) -> ApiResult<UserPermissionsDto> {
    handlers::permissions_for(service, id).await
}

async fn user_functions_handler(
    Extension(service): Svc,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<UserFunctionDto>> {
    handlers::user_functions(service, id).await
}

async fn grant_function_handler(
    Extension(service): Svc,
    Path(id): Path<Uuid>,
    Json(req): Json<GrantFunctionRequest>,
) -> ApiResult<UserFunctionDto> {
    handlers::grant_function(service, id, req).await
}

async fn revoke_function_handler(
    Extension(service): Svc,
    Path((id, function_id)): Path<(Uuid, i32)>,
) -> ApiResult<()> {
    handlers::revoke_function(service, id, function_id).await
}

async fn services_done_handler(
    Extension(service): Svc,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    handlers::filtered_report(service, FilteredReport::ServicesDone, query).await
}

async fn service_list_handler(
    Extension(service): Svc,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    handlers::filtered_report(service, FilteredReport::ServiceList, query).await
}

async fn jobs_per_technician_handler(
    Extension(service): Svc,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    handlers::filtered_report(service, FilteredReport::JobsPerTechnician, query).await
}

async fn job_count_handler(
    Extension(service): Svc,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    handlers::filtered_report(service, FilteredReport::JobCount, query).await
}

async fn individual_history_handler(
    Extension(service): Svc,
    Path(item_id): Path<i32>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, ApiError> {
    handlers::individual_history(service, item_id, query).await
}

async fn location_options_handler(
    Extension(service): Svc,
    Query(query): Query<LocationQuery>,
) -> ApiResult<LocationOptionsDto> {
    handlers::location_options(service, query).await
}
