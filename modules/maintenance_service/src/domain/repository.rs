//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs and infra/storage/rpc.rs

use crate::contract::{
    CatalogEntry, CatalogKind, EquipmentItem, EquipmentTypeDetail, HistoryEntry, ItemJobCount,
    Job, JobPart, JobPartUsage, JobUpdate, LocationDetail, NewCatalogEntry, NewEquipmentItem,
    NewJob, NewJobPart, NewNote, NewNoteComment, NewPart, NewTechnician, NewUser, Note,
    NoteComment, NoteSummary, Part, PartForType, Permission, ReportPeriod, ServicedItem,
    Technician, TechnicianJob, User, UserFunction,
};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Repository for the description-only lookup tables
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List every row of a lookup table
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>>;

    /// Find a row by id
    async fn find(&self, kind: CatalogKind, id: i32) -> Result<Option<CatalogEntry>>;

    /// Insert a row (active)
    async fn create(&self, kind: CatalogKind, entry: &NewCatalogEntry) -> Result<CatalogEntry>;

    /// Replace description and parent of a row
    async fn update(
        &self,
        kind: CatalogKind,
        id: i32,
        entry: &NewCatalogEntry,
    ) -> Result<CatalogEntry>;

    /// Flip the `isactive` flag
    async fn set_active(&self, kind: CatalogKind, id: i32, is_active: bool) -> Result<()>;

    /// Delete a row
    async fn delete(&self, kind: CatalogKind, id: i32) -> Result<()>;

    /// `get_allequipmenttypes`
    async fn equipment_types_detailed(&self) -> Result<Vec<EquipmentTypeDetail>>;

    /// `get_allshafts`, `get_allsections` or `get_allgangs` depending on level
    async fn locations_detailed(&self, level: CatalogKind) -> Result<Vec<LocationDetail>>;
}

/// Repository for `equipmentitems`
#[async_trait]
pub trait EquipmentItemRepository: Send + Sync {
    async fn list(&self, type_id: Option<i32>) -> Result<Vec<EquipmentItem>>;

    async fn find(&self, id: i32) -> Result<Option<EquipmentItem>>;

    /// Exact (case-insensitive) serial number lookup
    async fn find_by_serial(&self, serial_no: &str) -> Result<Option<EquipmentItem>>;

    async fn create(&self, item: &NewEquipmentItem) -> Result<EquipmentItem>;

    async fn update(&self, id: i32, item: &NewEquipmentItem) -> Result<EquipmentItem>;

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()>;

    async fn delete(&self, id: i32) -> Result<()>;
}

/// Repository for `parts` and the `partspertype` link table
#[async_trait]
pub trait PartRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Part>>;

    async fn find(&self, id: i32) -> Result<Option<Part>>;

    async fn create(&self, part: &NewPart) -> Result<Part>;

    async fn update(&self, id: i32, part: &NewPart) -> Result<Part>;

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()>;

    async fn delete(&self, id: i32) -> Result<()>;

    /// `get_partspertype`
    async fn parts_for_type(&self, type_id: i32) -> Result<Vec<PartForType>>;

    /// Insert a `partspertype` row, returning its id
    async fn link(&self, type_id: i32, part_id: i32) -> Result<i32>;

    /// Find a `partspertype` row as `(typeid, partid)`
    async fn find_link(&self, id: i32) -> Result<Option<(i32, i32)>>;

    async fn unlink(&self, id: i32) -> Result<()>;

    /// Number of `partspertype` rows referencing a type or a part
    async fn count_links(&self, type_id: Option<i32>, part_id: Option<i32>) -> Result<u64>;
}

/// Repository for `technicians`
#[async_trait]
pub trait TechnicianRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Technician>>;

    async fn find(&self, id: i32) -> Result<Option<Technician>>;

    async fn create(&self, technician: &NewTechnician) -> Result<Technician>;

    async fn update(&self, id: i32, technician: &NewTechnician) -> Result<Technician>;

    async fn set_active(&self, id: i32, is_active: bool) -> Result<()>;

    async fn delete(&self, id: i32) -> Result<()>;
}

/// What a job can point at; used for delete guards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobReference {
    Item(i32),
    Technician(i32),
    Gang(i32),
    Part(i32),
}

/// Repository for `jobs` and `partsperjob`
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Jobs ordered by date, optionally limited to a period
    async fn list(&self, period: Option<ReportPeriod>) -> Result<Vec<Job>>;

    async fn find(&self, id: i32) -> Result<Option<Job>>;

    /// Insert the job and its parts in one transaction
    async fn create(&self, job: &NewJob) -> Result<(Job, Vec<JobPart>)>;

    async fn update(&self, id: i32, job: &JobUpdate) -> Result<Job>;

    /// Delete the job's parts and then the job, in one transaction
    async fn delete(&self, id: i32) -> Result<()>;

    async fn parts(&self, job_id: i32) -> Result<Vec<JobPart>>;

    async fn add_part(&self, job_id: i32, part: &NewJobPart) -> Result<JobPart>;

    async fn find_part(&self, id: i32) -> Result<Option<JobPart>>;

    async fn remove_part(&self, id: i32) -> Result<()>;

    /// Number of jobs (or job parts, for `Part`) referencing a row
    async fn count_referencing(&self, reference: JobReference) -> Result<u64>;
}

/// Repository for `notes` and `notecomments`
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// `get_allnotes`
    async fn all_notes(&self) -> Result<Vec<NoteSummary>>;

    /// `get_noteslikeserialno`
    async fn notes_like_serial(&self, serial_no: &str) -> Result<Vec<NoteSummary>>;

    async fn find(&self, id: i32) -> Result<Option<Note>>;

    async fn create(&self, note: &NewNote) -> Result<Note>;

    async fn update_text(&self, id: i32, note: &str) -> Result<Note>;

    /// Delete the note's comments and then the note, in one transaction
    async fn delete(&self, id: i32) -> Result<()>;

    /// `get_commentsbynoteid`
    async fn comments(&self, note_id: i32) -> Result<Vec<NoteComment>>;

    async fn create_comment(&self, comment: &NewNoteComment) -> Result<NoteComment>;

    async fn find_comment(&self, id: i32) -> Result<Option<NoteComment>>;

    async fn delete_comment(&self, id: i32) -> Result<()>;
}

/// Repository for `users`, `userfunctions` and the permission RPC
#[async_trait]
pub trait AccessRepository: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn create_user(&self, user: &NewUser) -> Result<User>;

    async fn update_user(&self, id: Uuid, email: &str, full_name: &str) -> Result<User>;

    async fn set_user_active(&self, id: Uuid, is_active: bool) -> Result<()>;

    async fn user_functions(&self, user_id: Uuid) -> Result<Vec<UserFunction>>;

    async fn grant(&self, user_id: Uuid, function_id: i32) -> Result<UserFunction>;

    async fn revoke(&self, user_id: Uuid, function_id: i32) -> Result<()>;

    /// Number of `userfunctions` rows granting a function
    async fn count_grants(&self, function_id: i32) -> Result<u64>;

    /// `get_permissions_by_user`
    async fn permissions(&self, user_id: Uuid) -> Result<Vec<Permission>>;
}

/// Reporting RPC functions
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// `get_servicedlist`
    async fn serviced_list(&self, period: ReportPeriod) -> Result<Vec<ServicedItem>>;

    /// `jobswithparts`
    async fn jobs_with_parts(&self, period: ReportPeriod) -> Result<Vec<JobPartUsage>>;

    /// `get_jobspertechnician`
    async fn jobs_per_technician(&self, period: ReportPeriod) -> Result<Vec<TechnicianJob>>;

    /// `get_jobcountper_item`
    async fn job_count_per_item(&self, period: ReportPeriod) -> Result<Vec<ItemJobCount>>;

    /// `rpt_indivhistory`
    async fn individual_history(&self, item_id: i32) -> Result<Vec<HistoryEntry>>;
}

/// The full set of repositories the service works against
#[derive(Clone)]
pub struct Repositories {
    pub catalog: Arc<dyn CatalogRepository>,
    pub items: Arc<dyn EquipmentItemRepository>,
    pub parts: Arc<dyn PartRepository>,
    pub technicians: Arc<dyn TechnicianRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub access: Arc<dyn AccessRepository>,
    pub reports: Arc<dyn ReportRepository>,
}
