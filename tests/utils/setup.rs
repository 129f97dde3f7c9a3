use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

use medshare::{
    create_router,
    drug::repository::{DrugRepository, InMemoryDrugRepository},
    request::repository::InMemoryRequestRepository,
    upload::UploadStore,
    user::repository::InMemoryUserRepository,
    AppState, TokenConfig,
};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub drug_repository: Arc<InMemoryDrugRepository>,
    pub token_config: TokenConfig,
    pub upload_dir: TempDir,
}

pub struct TestSetupBuilder {
    token_config: TokenConfig,
    upload_max_bytes: Option<usize>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            token_config: TokenConfig::new("integration-test-secret", None),
            upload_max_bytes: None,
        }
    }

    pub fn with_token_expiry_days(mut self, days: i64) -> Self {
        self.token_config = TokenConfig::new("integration-test-secret", Some(days));
        self
    }

    pub fn with_upload_max_bytes(mut self, max_bytes: usize) -> Self {
        self.upload_max_bytes = Some(max_bytes);
        self
    }

    pub fn build(self) -> TestSetup {
        let upload_dir = tempfile::tempdir().unwrap();
        let drug_repository = Arc::new(InMemoryDrugRepository::new());

        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new()),
            drug_repository.clone() as Arc<dyn DrugRepository + Send + Sync>,
            Arc::new(InMemoryRequestRepository::new()),
            self.token_config.clone(),
            UploadStore::new(upload_dir.path().to_path_buf()).with_max_bytes(self.upload_max_bytes),
        );

        TestSetup {
            app: create_router(state),
            drug_repository,
            token_config: self.token_config,
            upload_dir,
        }
    }
}
