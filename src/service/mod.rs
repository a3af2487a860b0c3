pub mod announcement_service;

use std::sync::Arc;
use crate::config::StoreConfig;
use crate::repository::*;
use announcement_service::AnnouncementService;

pub use announcement_service::ReactionOutcome;

pub struct ServiceContext {
    pub announcement_service: Arc<AnnouncementService>,
}

impl ServiceContext {
    pub fn new(announcement_repo: Arc<dyn AnnouncementRepository>, store_config: &StoreConfig) -> Self {
        let announcement_service = Arc::new(AnnouncementService::new(
            announcement_repo,
            store_config,
        ));

        Self {
            announcement_service,
        }
    }

    /// Context backed by a fresh in-memory store.
    pub fn in_memory(store_config: &StoreConfig) -> Self {
        Self::new(Arc::new(InMemoryAnnouncementRepository::new(store_config)), store_config)
    }
}
