//! Domain service - business logic orchestration
//!
//! Every operation validates its input, performs the existence and
//! uniqueness checks the tables rely on, and then makes one or more
//! repository calls. Repository failures are logged and surface as
//! `MaintenanceError::Internal`.

mod access;
mod catalog;
mod equipment;
mod jobs;
mod notes;
mod parts;
mod reporting;
mod technicians;

pub use reporting::GeneratedReport;

use super::repository::Repositories;
use crate::config::Config;
use crate::contract::MaintenanceError;
use chrono::NaiveDate;

/// Domain service for maintenance tracking
pub struct Service {
    repos: Repositories,
    config: Config,
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, config: Config) -> Self {
        Self { repos, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Log a storage failure and hide its details from the caller
fn internal(err: anyhow::Error) -> MaintenanceError {
    tracing::error!("storage call failed: {:#}", err);
    MaintenanceError::Internal
}
