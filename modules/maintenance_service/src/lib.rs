//! Maintenance Service Module
//!
//! Equipment, location, job and parts tracking for mine maintenance crews,
//! with grouped reports exported to Excel, PDF and CSV.

// Public exports
pub mod contract;
pub use contract::{
    CatalogEntry, CatalogKind, EquipmentItem, Job, JobPart, MaintenanceError, Note, Part,
    ReportPeriod, Technician, User,
};

pub mod module;
pub use module::MaintenanceServiceModule;

pub mod config;
pub mod export;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
