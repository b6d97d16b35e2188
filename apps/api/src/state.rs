use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::extraction::SectionClassifier;
use crate::job_source::JobSource;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume file store. Default: S3FileStore.
    pub files: Arc<dyn FileStore>,
    /// External listings provider. Default: ApifyJobSource.
    pub job_source: Arc<dyn JobSource>,
    pub classifier: Arc<SectionClassifier>,
    pub config: Config,
}
