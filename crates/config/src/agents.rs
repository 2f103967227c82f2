//! Optional remote agent ids, one per stage role (spec §6 `agents.{role}Id`).
//! An unset id forces that stage's `BackendChooser` to fall back to the
//! generic chat backend (spec §4.1, §9 "Two-backend strategy").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub planner_id: Option<String>,
    #[serde(default)]
    pub researcher_id: Option<String>,
    #[serde(default)]
    pub outliner_id: Option<String>,
    #[serde(default)]
    pub scripter_id: Option<String>,
    #[serde(default)]
    pub tone_annotator_id: Option<String>,
    #[serde(default)]
    pub editor_id: Option<String>,
}

impl AgentsConfig {
    pub fn id_for(&self, stage: podforge_core::Stage) -> Option<&str> {
        use podforge_core::Stage::*;
        match stage {
            Planning => self.planner_id.as_deref(),
            Research => self.researcher_id.as_deref(),
            Outline => self.outliner_id.as_deref(),
            Scripting => self.scripter_id.as_deref(),
            ToneAnnotation => self.tone_annotator_id.as_deref(),
            Editing => self.editor_id.as_deref(),
            Synthesis | Assembly => None,
        }
    }
}
