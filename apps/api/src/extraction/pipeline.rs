//! The write path: extract → analyze → sanitize → save → log.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::extraction::analyzer::analyze;
use crate::extraction::sanitizer::{apply_policy, SanitizePolicy};
use crate::extraction::text::{extract_text, ExtractedText};
use crate::llm_client::TextGenerator;
use crate::store::file::{FileStore, SaveOutcome};
use crate::store::log::{upsert_from_file, RecordLog};

/// What a completed run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The model found nothing; no artifact was written or logged.
    NothingToSave,
    Saved {
        path: PathBuf,
        /// Row id in the database channel, when enabled and the artifact
        /// validated as a non-empty object.
        logged_id: Option<Uuid>,
    },
}

pub struct Pipeline {
    llm: Arc<dyn TextGenerator>,
    policy: SanitizePolicy,
    file: FileStore,
    log: Option<Arc<dyn RecordLog>>,
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        policy: SanitizePolicy,
        file: FileStore,
        log: Option<Arc<dyn RecordLog>>,
    ) -> Self {
        Self {
            llm,
            policy,
            file,
            log,
        }
    }

    /// Runs the whole write path for one document. Stops at the first
    /// failure; nothing is written if extraction or the model call fails.
    pub async fn run(&self, document_path: &Path) -> Result<RunOutcome, PipelineError> {
        info!(
            "Starting extraction run for {} (policy: {})",
            document_path.display(),
            self.policy
        );
        let text = extract_text(document_path)?;
        self.process_text(&text, document_path).await
    }

    /// Everything after text extraction.
    pub async fn process_text(
        &self,
        text: &ExtractedText,
        document_path: &Path,
    ) -> Result<RunOutcome, PipelineError> {
        let raw = analyze(text, self.llm.as_ref()).await?;
        let payload = apply_policy(self.policy, &raw);

        let path = match self.file.save(&payload)? {
            SaveOutcome::Skipped => return Ok(RunOutcome::NothingToSave),
            SaveOutcome::Written(path) => path,
        };

        let logged_id = match &self.log {
            Some(log) => upsert_from_file(&self.file, document_path, log.as_ref())
                .await?
                .map(|row| row.id),
            None => None,
        };

        Ok(RunOutcome::Saved { path, logged_id })
    }
}
