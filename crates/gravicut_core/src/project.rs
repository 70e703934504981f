use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::settings::Settings;
use crate::store::ArrangementStore;
use crate::types::Timeline;

pub const PROJECT_EXTENSION: &str = "gravicut";

/// Everything persisted for one editing session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub settings: Settings,
    pub timeline: Timeline,
}

impl Project {
    /// Create a new empty project with the given name and settings.
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        let timeline = Timeline {
            zoom: settings.default_zoom.clamped(),
            ..Timeline::default()
        };
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings,
            timeline,
        }
    }

    /// Snapshot a store's committed state.
    pub fn from_store(name: impl Into<String>, store: &ArrangementStore) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            settings: store.settings().clone(),
            timeline: store.timeline().clone(),
        }
    }

    /// Hand the arrangement to a store, checking its invariants first.
    pub fn into_store(self) -> Result<ArrangementStore> {
        ArrangementStore::from_timeline(self.timeline, self.settings)
    }

    /// Save project to a file as pretty-printed JSON.
    /// Appends the `.gravicut` extension if not present. Returns the path written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = ensure_extension(path.as_ref());
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "project saved");
        Ok(path)
    }

    /// Load a project from a JSON file. Arrangements that break an invariant are refused.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(CoreError::Io)?;
        let mut project: Project = serde_json::from_str(&data)?;
        for track in &mut project.timeline.tracks {
            track.sort_clips();
        }
        project.timeline.validate()?;
        info!(path = %path.display(), tracks = project.timeline.tracks.len(), "project loaded");
        Ok(project)
    }
}

fn ensure_extension(path: &Path) -> PathBuf {
    if path.extension().and_then(|e| e.to_str()) == Some(PROJECT_EXTENSION) {
        path.to_path_buf()
    } else {
        let mut p = path.to_path_buf();
        let mut name = p.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        p.set_file_name(name);
        p
    }
}
