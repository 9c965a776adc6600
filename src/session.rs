//! Persisted session state
//!
//! The processed-source reference and current selections have to survive
//! between CLI invocations (`source` then `analyze` run as separate
//! processes), so they live in a small JSON file under the data directory.
//! Switching source type invalidates everything derived from the old source.

use std::fs;
use std::path::{Path, PathBuf};

use audigest_protocol::SourceType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::default_data_dir;
use crate::error::{AudigestError, Result};

/// Session values carried between commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub source_type: Option<SourceType>,
    /// Opaque backend reference from the last successful source submission
    pub source_path: Option<String>,
    /// Display name of the submitted source (URL or file name)
    pub source_name: Option<String>,
    pub selected_model: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Session manager backed by a JSON file
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    state: SessionState,
}

impl Session {
    pub fn load() -> Result<Self> {
        Self::load_from(default_session_path())
    }

    pub fn load_from(path: PathBuf) -> Result<Self> {
        let state = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| AudigestError::io_from_error("Reading session file", e))?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SessionState::default()
        };

        Ok(Self { path, state })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn source_path(&self) -> Option<&str> {
        self.state.source_path.as_deref()
    }

    pub fn source_type(&self) -> Option<SourceType> {
        self.state.source_type
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.state.selected_model.as_deref()
    }

    /// Record a successfully processed source
    pub fn set_source(
        &mut self,
        source_type: SourceType,
        source_path: String,
        source_name: String,
    ) -> Result<()> {
        self.state.source_type = Some(source_type);
        self.state.source_path = Some(source_path);
        self.state.source_name = Some(source_name);
        self.touch();
        self.save()
    }

    /// Clear everything derived from the current source; called when the
    /// source type changes or on explicit reset
    pub fn reset_source(&mut self) -> Result<()> {
        self.state.source_type = None;
        self.state.source_path = None;
        self.state.source_name = None;
        self.touch();
        self.save()
    }

    pub fn set_selected_model(&mut self, model_id: Option<String>) -> Result<()> {
        self.state.selected_model = model_id;
        self.touch();
        self.save()
    }

    fn touch(&mut self) {
        self.state.updated_at = Some(Utc::now());
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AudigestError::io_from_error("Creating session directory", e))?;
        }

        let content = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, content)
            .map_err(|e| AudigestError::io_from_error("Writing session file", e))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_session_path() -> PathBuf {
    default_data_dir().join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::test_helpers::create_temp_dir;

    #[test]
    fn test_session_round_trips_source() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");

        let mut session = Session::load_from(path.clone()).unwrap();
        session
            .set_source(
                SourceType::Youtube,
                "/tmp/audio/abc.mp3".into(),
                "https://youtu.be/abc".into(),
            )
            .unwrap();

        let reloaded = Session::load_from(path).unwrap();
        assert_eq!(reloaded.source_type(), Some(SourceType::Youtube));
        assert_eq!(reloaded.source_path(), Some("/tmp/audio/abc.mp3"));
        assert!(reloaded.state().updated_at.is_some());
    }

    #[test]
    fn test_reset_clears_source_but_not_model() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");

        let mut session = Session::load_from(path).unwrap();
        session
            .set_source(SourceType::Upload, "/tmp/a.mp3".into(), "a.mp3".into())
            .unwrap();
        session
            .set_selected_model(Some("models/gemini-pro".into()))
            .unwrap();
        session.reset_source().unwrap();

        assert!(session.source_path().is_none());
        assert!(session.source_type().is_none());
        assert_eq!(session.selected_model(), Some("models/gemini-pro"));
    }

    #[test]
    fn test_corrupt_session_file_falls_back_to_default() {
        let dir = create_temp_dir();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let session = Session::load_from(path).unwrap();
        assert!(session.source_path().is_none());
    }
}
