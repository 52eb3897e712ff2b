use eq_assessment::assessment::{
    AssessmentResult, InMemoryResultRepository, JsonFileResultRepository, NewAssessmentResult,
    RepositoryError, ResultFilter, ResultId, ResultRepository, SentimentAnalyzer,
};
use eq_assessment::config::StorageConfig;
use eq_assessment::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) analyzer: Arc<SentimentAnalyzer>,
}

/// Result storage selected at startup: a JSON file when a path is configured, memory otherwise.
pub(crate) enum ResultStore {
    Memory(InMemoryResultRepository),
    File(JsonFileResultRepository),
}

impl ResultStore {
    pub(crate) fn from_config(config: &StorageConfig) -> Result<Self, AppError> {
        match &config.results_path {
            Some(path) => Self::open_file(path),
            None => {
                info!("no results path configured, keeping results in memory");
                Ok(Self::Memory(InMemoryResultRepository::new()))
            }
        }
    }

    pub(crate) fn open_file(path: &Path) -> Result<Self, AppError> {
        Ok(Self::File(JsonFileResultRepository::open(path)?))
    }

    fn repository(&self) -> &dyn ResultRepository {
        match self {
            ResultStore::Memory(repository) => repository,
            ResultStore::File(repository) => repository,
        }
    }
}

impl ResultRepository for ResultStore {
    fn insert(&self, result: NewAssessmentResult) -> Result<AssessmentResult, RepositoryError> {
        self.repository().insert(result)
    }

    fn fetch(&self, id: ResultId) -> Result<Option<AssessmentResult>, RepositoryError> {
        self.repository().fetch(id)
    }

    fn list(&self, filter: &ResultFilter) -> Result<Vec<AssessmentResult>, RepositoryError> {
        self.repository().list(filter)
    }
}
