//! REST DTOs with serde derives for HTTP API
//!
//! Field names follow the table columns (`serialno`, `typeid`, ...), which
//! is what the web client binds its grids and forms to.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// ===== Lookup Table DTOs =====

/// Row of a description-only lookup table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogEntryDto {
    pub id: i32,
    /// Parent row id (category of a type, mine of a shaft, ...)
    pub parentid: Option<i32>,
    #[schema(example = "Kopanang")]
    pub description: String,
    pub isactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CatalogEntryRequest {
    #[serde(default)]
    pub parentid: Option<i32>,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListCatalogQuery {
    pub parentid: Option<i32>,
    #[serde(default)]
    pub includeinactive: bool,
}

/// Body of every `PUT .../active` endpoint
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ActiveRequest {
    pub isactive: bool,
}

/// `get_allequipmenttypes` row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentTypeDetailDto {
    pub typeid: i32,
    pub categoryid: i32,
    pub category: String,
    pub description: String,
    pub isactive: bool,
}

/// Shaft, section or gang with its ancestors
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationDetailDto {
    pub id: i32,
    pub description: String,
    pub isactive: bool,
    pub mineid: i32,
    pub mine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaftid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shaft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectionid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

// ===== Equipment DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EquipmentItemDto {
    pub itemid: i32,
    pub typeid: i32,
    #[schema(example = "LHD-0042")]
    pub serialno: String,
    pub description: Option<String>,
    pub isactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EquipmentItemRequest {
    pub typeid: i32,
    pub serialno: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListItemsQuery {
    pub typeid: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartDto {
    pub partid: i32,
    #[schema(example = "F-100")]
    pub partno: String,
    pub description: String,
    pub isactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartRequest {
    pub partno: String,
    pub description: String,
}

/// `get_partspertype` row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartForTypeDto {
    pub partspertypeid: i32,
    pub typeid: i32,
    pub partid: i32,
    pub partno: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LinkPartRequest {
    pub partid: i32,
}

// ===== Technician DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TechnicianDto {
    pub technicianid: i32,
    pub name: String,
    pub surname: String,
    pub isactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TechnicianRequest {
    pub name: String,
    pub surname: String,
}

// ===== Job DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobDto {
    pub jobid: i32,
    pub itemid: i32,
    pub technicianid: i32,
    pub gangid: i32,
    pub jobdate: NaiveDate,
    #[schema(example = "Service")]
    pub jobtype: String,
    pub remarks: Option<String>,
}

/// Job header with the parts it consumed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobDetailDto {
    #[serde(flatten)]
    pub job: JobDto,
    pub parts: Vec<JobPartDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobPartDto {
    pub partsperjobid: i32,
    pub jobid: i32,
    pub partid: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobRequest {
    pub itemid: i32,
    pub technicianid: i32,
    pub gangid: i32,
    pub jobdate: NaiveDate,
    pub jobtype: String,
    #[serde(default)]
    pub remarks: Option<String>,
    /// Only read when the job is created
    #[serde(default)]
    pub parts: Vec<JobPartRequest>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct JobPartRequest {
    pub partid: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListJobsQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

// ===== Note DTOs =====

/// `get_allnotes` / `get_noteslikeserialno` row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteSummaryDto {
    pub noteid: i32,
    pub itemid: i32,
    pub serialno: String,
    pub notedate: NaiveDate,
    pub note: String,
    pub commentcount: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteDto {
    pub noteid: i32,
    pub itemid: i32,
    pub notedate: NaiveDate,
    pub note: String,
    pub createdby: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteRequest {
    pub itemid: i32,
    /// Defaults to today
    #[serde(default)]
    pub notedate: Option<NaiveDate>,
    pub note: String,
    #[serde(default)]
    pub createdby: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateNoteRequest {
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListNotesQuery {
    pub serialno: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteCommentDto {
    pub commentid: i32,
    pub noteid: i32,
    pub comment: String,
    pub commentdate: DateTime<Utc>,
    pub createdby: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteCommentRequest {
    pub comment: String,
    #[serde(default)]
    pub createdby: Option<Uuid>,
}

// ===== User DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub userid: Uuid,
    pub email: String,
    pub fullname: String,
    pub isactive: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub userid: Uuid,
    pub email: String,
    pub fullname: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub email: String,
    pub fullname: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserFunctionDto {
    pub userfunctionid: i32,
    pub userid: Uuid,
    pub functionid: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GrantFunctionRequest {
    pub functionid: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionDto {
    pub functionid: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserPermissionsDto {
    pub userid: Uuid,
    pub functions: Vec<PermissionDto>,
}

// ===== Report DTOs =====

/// Filters shared by the report endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub typeid: Option<i32>,
    pub mineid: Option<i32>,
    pub shaftid: Option<i32>,
    pub sectionid: Option<i32>,
    pub gangid: Option<i32>,
    /// `json` (default), `xlsx`, `pdf` or `csv`
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDto {
    pub title: String,
    pub filters: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<ReportRowDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportRowDto {
    /// `detail`, `subtotal` or `grandtotal`
    pub kind: String,
    /// Grouping depth of a subtotal row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
    #[schema(value_type = Vec<Object>)]
    pub cells: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationQuery {
    pub mineid: Option<i32>,
    pub shaftid: Option<i32>,
    pub sectionid: Option<i32>,
    pub gangid: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationSelectionDto {
    pub mineid: Option<i32>,
    pub shaftid: Option<i32>,
    pub sectionid: Option<i32>,
    pub gangid: Option<i32>,
}

/// Cascading dropdown contents
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LocationOptionsDto {
    pub selection: LocationSelectionDto,
    pub mines: Vec<CatalogEntryDto>,
    pub shafts: Vec<LocationDetailDto>,
    pub sections: Vec<LocationDetailDto>,
    pub gangs: Vec<LocationDetailDto>,
}
