//! Contract models for the maintenance service
//!
//! Rows are mirrored from the database tables; field names follow the
//! Rust convention, the storage mappers own the column spelling.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// The description-only lookup tables.
///
/// Each kind is a row of `{ id, parent_id?, description, is_active }`; the
/// equipment and location hierarchies are chains of kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    EquipmentCategory,
    EquipmentType,
    Mine,
    Shaft,
    Section,
    Gang,
    Function,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 7] = [
        CatalogKind::EquipmentCategory,
        CatalogKind::EquipmentType,
        CatalogKind::Mine,
        CatalogKind::Shaft,
        CatalogKind::Section,
        CatalogKind::Gang,
        CatalogKind::Function,
    ];

    /// Database table backing this kind
    pub fn table(self) -> &'static str {
        match self {
            Self::EquipmentCategory => "equipmentcategories",
            Self::EquipmentType => "equipmenttypes",
            Self::Mine => "mines",
            Self::Shaft => "shafts",
            Self::Section => "sections",
            Self::Gang => "gangs",
            Self::Function => "functions",
        }
    }

    /// Human-readable name used in error messages and filter labels
    pub fn resource(self) -> &'static str {
        match self {
            Self::EquipmentCategory => "Equipment category",
            Self::EquipmentType => "Equipment type",
            Self::Mine => "Mine",
            Self::Shaft => "Shaft",
            Self::Section => "Section",
            Self::Gang => "Gang",
            Self::Function => "Function",
        }
    }

    /// REST collection segment
    pub fn path(self) -> &'static str {
        match self {
            Self::EquipmentCategory => "equipment-categories",
            Self::EquipmentType => "equipment-types",
            Self::Mine => "mines",
            Self::Shaft => "shafts",
            Self::Section => "sections",
            Self::Gang => "gangs",
            Self::Function => "functions",
        }
    }

    pub fn parent(self) -> Option<CatalogKind> {
        match self {
            Self::EquipmentType => Some(Self::EquipmentCategory),
            Self::Shaft => Some(Self::Mine),
            Self::Section => Some(Self::Shaft),
            Self::Gang => Some(Self::Section),
            Self::EquipmentCategory | Self::Mine | Self::Function => None,
        }
    }

    pub fn child(self) -> Option<CatalogKind> {
        match self {
            Self::EquipmentCategory => Some(Self::EquipmentType),
            Self::Mine => Some(Self::Shaft),
            Self::Shaft => Some(Self::Section),
            Self::Section => Some(Self::Gang),
            Self::EquipmentType | Self::Gang | Self::Function => None,
        }
    }

    /// `functions` carries no `isactive` column
    pub fn has_active_flag(self) -> bool {
        !matches!(self, Self::Function)
    }

    /// Location levels below a mine
    pub fn is_location(self) -> bool {
        matches!(self, Self::Mine | Self::Shaft | Self::Section | Self::Gang)
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A row of one of the lookup tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i32,
    /// Parent row id (category for a type, mine for a shaft, ...)
    pub parent_id: Option<i32>,
    pub description: String,
    pub is_active: bool,
}

/// Insert/update payload for a lookup row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogEntry {
    pub parent_id: Option<i32>,
    pub description: String,
}

/// Result row of `get_allequipmenttypes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentTypeDetail {
    pub type_id: i32,
    pub category_id: i32,
    pub category: String,
    pub description: String,
    pub is_active: bool,
}

/// Result row of `get_allshafts`, `get_allsections` and `get_allgangs`
///
/// Ancestors above the row's own level are filled in; levels below it are
/// `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationDetail {
    pub id: i32,
    pub description: String,
    pub is_active: bool,
    pub mine_id: i32,
    pub mine: String,
    pub shaft_id: Option<i32>,
    pub shaft: Option<String>,
    pub section_id: Option<i32>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentItem {
    pub id: i32,
    pub type_id: i32,
    pub serial_no: String,
    pub description: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipmentItem {
    pub type_id: i32,
    pub serial_no: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub id: i32,
    pub part_no: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPart {
    pub part_no: String,
    pub description: String,
}

/// Result row of `get_partspertype`: a part linked to an equipment type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartForType {
    /// `partspertypeid`
    pub id: i32,
    pub type_id: i32,
    pub part_id: i32,
    pub part_no: String,
    pub part_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technician {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub is_active: bool,
}

impl Technician {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTechnician {
    pub name: String,
    pub surname: String,
}

/// A service event against an equipment item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: i32,
    pub item_id: i32,
    pub technician_id: i32,
    pub gang_id: i32,
    pub job_date: NaiveDate,
    pub job_type: String,
    pub remarks: Option<String>,
}

/// New job together with the parts consumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub item_id: i32,
    pub technician_id: i32,
    pub gang_id: i32,
    pub job_date: NaiveDate,
    pub job_type: String,
    pub remarks: Option<String>,
    pub parts: Vec<NewJobPart>,
}

impl NewJob {
    /// Header fields without the parts list
    pub fn header(&self) -> JobUpdate {
        JobUpdate {
            item_id: self.item_id,
            technician_id: self.technician_id,
            gang_id: self.gang_id,
            job_date: self.job_date,
            job_type: self.job_type.clone(),
            remarks: self.remarks.clone(),
        }
    }
}

/// Job header update; parts are managed separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobUpdate {
    pub item_id: i32,
    pub technician_id: i32,
    pub gang_id: i32,
    pub job_date: NaiveDate,
    pub job_type: String,
    pub remarks: Option<String>,
}

/// Row of `partsperjob`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPart {
    pub id: i32,
    pub job_id: i32,
    pub part_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJobPart {
    pub part_id: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i32,
    pub item_id: i32,
    pub note_date: NaiveDate,
    pub note: String,
    pub created_by: Option<Uuid>,
}

/// Result row of `get_allnotes` / `get_noteslikeserialno`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSummary {
    pub id: i32,
    pub item_id: i32,
    pub serial_no: String,
    pub note_date: NaiveDate,
    pub note: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub item_id: i32,
    pub note_date: NaiveDate,
    pub note: String,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteComment {
    pub id: i32,
    pub note_id: i32,
    pub comment: String,
    pub comment_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNoteComment {
    pub note_id: i32,
    pub comment: String,
    pub created_by: Option<Uuid>,
}

/// Application user; the id is the auth provider's user id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

/// Row of `userfunctions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFunction {
    pub id: i32,
    pub user_id: Uuid,
    pub function_id: i32,
}

/// Result row of `get_permissions_by_user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub function_id: i32,
    pub description: String,
}

/// Functions granted to a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPermissions {
    pub user_id: Uuid,
    pub functions: Vec<Permission>,
}

impl UserPermissions {
    /// Whether the named function is granted (case-insensitive)
    pub fn allows(&self, function: &str) -> bool {
        self.functions
            .iter()
            .any(|p| p.description.eq_ignore_ascii_case(function.trim()))
    }
}
