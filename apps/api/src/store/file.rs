//! File channel of the ResultStore: one well-known JSON file holding the
//! latest artifact.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::{json_kind, PersistenceError, ServingError};
use crate::extraction::sanitizer::Payload;
use crate::models::record::StructuredRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// Nothing worth writing; any previous artifact is left untouched.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the artifact with `payload`.
    ///
    /// Empty payloads are skipped with a warning. Otherwise the content goes
    /// to a temp file in the same directory, is fsynced, then renamed over
    /// the target, so a reader sees either the old or the new file in full.
    pub fn save(&self, payload: &Payload) -> Result<SaveOutcome, PersistenceError> {
        let Some(contents) = payload.file_contents() else {
            warn!(
                "No structured data to save; leaving {} untouched",
                self.path.display()
            );
            return Ok(SaveOutcome::Skipped);
        };

        self.write_atomic(contents.as_bytes())
            .map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;

        info!(
            "Saved {} bytes of structured data to {}",
            contents.len(),
            self.path.display()
        );
        Ok(SaveOutcome::Written(self.path.clone()))
    }

    fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;
        // Temp files are created 0600; the read path may run as another user.
        if let Some(permissions) = self.target_permissions() {
            tmp.as_file().set_permissions(permissions)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Mode of the artifact being replaced, or 0644 for a fresh one.
    fn target_permissions(&self) -> Option<std::fs::Permissions> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        }
    }

    /// Reads the current artifact back as a record. Missing, corrupt and
    /// non-object files are errors.
    pub async fn load(&self) -> Result<StructuredRecord, ServingError> {
        let contents =
            tokio::fs::read_to_string(&self.path)
                .await
                .map_err(|source| ServingError::Read {
                    path: self.path.clone(),
                    source,
                })?;
        match serde_json::from_str::<serde_json::Value>(&contents)? {
            serde_json::Value::Object(map) => Ok(map.into()),
            other => {
                warn!(
                    "Artifact {} holds a {} instead of an object",
                    self.path.display(),
                    json_kind(&other)
                );
                Err(ServingError::NotAnObject)
            }
        }
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<std::fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<std::fs::Permissions> {
    None
}
