//! Contract layer - transport-agnostic models and errors
//!
//! NO serde derives on models - these are pure domain types shared by the
//! domain, storage and REST layers.

pub mod error;
pub mod model;
pub mod report;

pub use error::MaintenanceError;
pub use model::{
    CatalogEntry, CatalogKind, EquipmentItem, EquipmentTypeDetail, Job, JobPart, JobUpdate,
    LocationDetail, NewCatalogEntry, NewEquipmentItem, NewJob, NewJobPart, NewNote,
    NewNoteComment, NewPart, NewTechnician, NewUser, Note, NoteComment, NoteSummary, Part,
    PartForType, Permission, Technician, User, UserFunction, UserPermissions,
};
pub use report::{
    HistoryEntry, ItemJobCount, JobPartUsage, ReportPeriod, ServicedItem, TechnicianJob,
};
