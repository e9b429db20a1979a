//! Per-request pipeline: stage upload → extract text → estimate → format.
//!
//! Documents are processed strictly one after another. Any failure is confined
//! to its own document and recorded as an error entry.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::duration::RoundingMode;
use super::estimator::ExperienceEstimator;
use super::models::{ExperienceEstimate, ResultRecord, ResultRecords, ResumeDocument};
use crate::extraction::{extract_text, ExtractError};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("Failed to stage upload: {0}")]
    Staging(std::io::Error),

    #[error("Text extraction aborted unexpectedly: {0}")]
    Aborted(#[from] tokio::task::JoinError),

    #[error("Experience figure {0} cannot be represented")]
    Unrepresentable(f64),
}

pub struct DocumentPipeline {
    estimator: Arc<ExperienceEstimator>,
    rounding: RoundingMode,
    staging_dir: PathBuf,
}

impl DocumentPipeline {
    pub fn new(estimator: Arc<ExperienceEstimator>, rounding: RoundingMode) -> Self {
        Self {
            estimator,
            rounding,
            staging_dir: std::env::temp_dir(),
        }
    }

    /// Stage uploads somewhere other than the system temp directory.
    pub fn with_staging_dir(mut self, dir: PathBuf) -> Self {
        self.staging_dir = dir;
        self
    }

    pub async fn process_batch(&self, documents: Vec<ResumeDocument>) -> ResultRecords {
        let mut records = ResultRecords::new();
        for document in documents {
            let filename = document.filename.clone();
            let record = self.process_document(document).await;
            records.insert(filename, record);
        }
        records
    }

    pub async fn process_document(&self, document: ResumeDocument) -> ResultRecord {
        let filename = document.filename.clone();
        info!("Processing resume '{filename}' ({} bytes)", document.content.len());

        match self.estimate_document(document).await {
            Ok(estimate) => {
                info!(
                    "Resume '{filename}': {} years ({})",
                    estimate.decimal(),
                    estimate.human()
                );
                ResultRecord::Success(estimate)
            }
            Err(e) => {
                warn!("Resume '{filename}' failed: {e}");
                ResultRecord::Failure {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn estimate_document(
        &self,
        document: ResumeDocument,
    ) -> Result<ExperienceEstimate, DocumentError> {
        let staging_dir = self.staging_dir.clone();
        let text = tokio::task::spawn_blocking(move || stage_and_extract(&staging_dir, document))
            .await??;
        let decimal = self.estimator.estimate(&text).await;
        if !decimal.is_finite() {
            return Err(DocumentError::Unrepresentable(decimal));
        }
        Ok(ExperienceEstimate::new(decimal, self.rounding))
    }
}

/// Writes the upload to a temp file carrying the upload's extension and extracts
/// from it. The temp file is removed on every path, panics included; removal
/// errors are ignored.
fn stage_and_extract(staging_dir: &Path, document: ResumeDocument) -> Result<String, DocumentError> {
    let suffix = Path::new(&document.filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut staged = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(&suffix)
        .tempfile_in(staging_dir)
        .map_err(DocumentError::Staging)?;
    staged
        .write_all(&document.content)
        .and_then(|_| staged.flush())
        .map_err(DocumentError::Staging)?;
    drop(document);

    let extracted = extract_text(staged.path());

    if let Err(e) = staged.close() {
        debug!("Could not remove staged upload: {e}");
    }
    Ok(extracted?)
}
