//! Domain layer - business logic and services

pub mod filter;
pub mod grouping;
pub mod reports;
pub mod repository;
pub mod service;
pub mod validation;

pub use filter::{LocationFilter, LocationOptions, ReportFilter};
pub use repository::{
    AccessRepository, CatalogRepository, EquipmentItemRepository, JobReference, JobRepository,
    NoteRepository, PartRepository, ReportRepository, Repositories, TechnicianRepository,
};
pub use service::{GeneratedReport, Service};
