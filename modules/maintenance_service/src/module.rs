//! Module declaration and lifecycle

use crate::config::Config;
use crate::domain::{Repositories, Service};
use crate::infra::storage::repositories::{
    SeaOrmAccessRepository, SeaOrmCatalogRepository, SeaOrmEquipmentItemRepository,
    SeaOrmJobRepository, SeaOrmNoteRepository, SeaOrmPartRepository, SeaOrmTechnicianRepository,
};
use crate::infra::storage::rpc::SeaOrmReportRepository;
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Maintenance service module
pub struct MaintenanceServiceModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for MaintenanceServiceModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl MaintenanceServiceModule {
    /// Build the Postgres-backed repositories and the domain service
    pub fn init(&self, cfg: Config, conn: Arc<DatabaseConnection>) -> Result<()> {
        let repos = Repositories {
            catalog: Arc::new(SeaOrmCatalogRepository::new(conn.clone())),
            items: Arc::new(SeaOrmEquipmentItemRepository::new(conn.clone())),
            parts: Arc::new(SeaOrmPartRepository::new(conn.clone())),
            technicians: Arc::new(SeaOrmTechnicianRepository::new(conn.clone())),
            jobs: Arc::new(SeaOrmJobRepository::new(conn.clone())),
            notes: Arc::new(SeaOrmNoteRepository::new(conn.clone())),
            access: Arc::new(SeaOrmAccessRepository::new(conn.clone())),
            reports: Arc::new(SeaOrmReportRepository::new(conn)),
        };
        self.init_with_repositories(cfg, repos)
    }

    /// Build the domain service over caller-supplied repositories
    pub fn init_with_repositories(&self, cfg: Config, repos: Repositories) -> Result<()> {
        *self.config.write() = cfg.clone();
        let service = Arc::new(Service::new(repos, cfg));
        *self.service.write() = Some(service);

        tracing::info!("Maintenance service initialized");
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.read().clone()
    }

    /// Mount the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self
            .service
            .read()
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?
            .clone();

        tracing::info!("Registering maintenance service REST routes");
        Ok(crate::api::rest::routes::register_routes(router, service))
    }
}
