use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, info};

use super::repository::{
    newest_first, AssessmentResult, NewAssessmentResult, RepositoryError, ResultFilter, ResultId,
    ResultRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access results store {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("results store {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<StoreError> for RepositoryError {
    fn from(value: StoreError) -> Self {
        RepositoryError::Unavailable(value.to_string())
    }
}

/// Flat JSON document holding every result; rewritten in full on each insert.
#[derive(Debug)]
pub struct JsonFileResultRepository {
    path: PathBuf,
    records: Mutex<Vec<AssessmentResult>>,
}

impl JsonFileResultRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if raw.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            Vec::new()
        };

        info!(path = %path.display(), records = records.len(), "results store opened");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &[AssessmentResult]) -> Result<(), StoreError> {
        let io_error = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let body = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let staging = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&staging).map_err(io_error)?;
        file.write_all(&body).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        fs::rename(&staging, &self.path).map_err(io_error)?;

        debug!(path = %self.path.display(), records = records.len(), "results store written");
        Ok(())
    }
}

impl ResultRepository for JsonFileResultRepository {
    fn insert(&self, result: NewAssessmentResult) -> Result<AssessmentResult, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("results store mutex poisoned".to_string()))?;

        let next_id = guard.iter().map(|record| record.id.0).max().unwrap_or(0) + 1;
        let stored = AssessmentResult::from_new(ResultId(next_id), Utc::now(), result);

        let mut updated = guard.clone();
        updated.push(stored.clone());
        self.persist(&updated)?;
        *guard = updated;

        Ok(stored)
    }

    fn fetch(&self, id: ResultId) -> Result<Option<AssessmentResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("results store mutex poisoned".to_string()))?;
        Ok(guard.iter().find(|record| record.id == id).cloned())
    }

    fn list(&self, filter: &ResultFilter) -> Result<Vec<AssessmentResult>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("results store mutex poisoned".to_string()))?;
        Ok(newest_first(guard.iter().filter(|record| filter.matches(record))))
    }
}

/// CSV listing of results with the reviewer-facing columns.
pub fn export_csv<W: Write>(results: &[AssessmentResult], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(result.summary_view())?;
    }
    csv_writer.flush()?;
    Ok(())
}
