pub mod auth;
pub mod error;
pub mod routes;

use std::sync::Arc;

use db::DBService;
use services::services::{config::Config, crm_sync::CrmSyncService};

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct Deployment {
    db: DBService,
    config: Arc<Config>,
    events: CrmSyncService,
}

impl Deployment {
    pub fn new(db: DBService, config: Config, events: CrmSyncService) -> Self {
        Self {
            db,
            config: Arc::new(config),
            events,
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn events(&self) -> &CrmSyncService {
        &self.events
    }
}
