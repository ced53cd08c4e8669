use serde::{Deserialize, Serialize};

use crate::core::{Frames, RecordIssue};
use crate::error::{ChartError, ChartResult};
use crate::interaction::MountState;
use crate::render::{RenderFrame, Renderer};

use super::{Chart, ChartFamily, FamilyAggregation};

/// Deterministic dump of a chart instance, used for fixture regression tests
/// and by the snapshot CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub id: String,
    pub uid: String,
    pub family: ChartFamily,
    pub state: MountState,
    pub filter: String,
    pub frames: Frames,
    #[serde(default)]
    pub issues: Vec<RecordIssue>,
    pub aggregation: Option<FamilyAggregation>,
    pub scene: RenderFrame,
}

impl<R: Renderer> Chart<R> {
    #[must_use]
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            id: self.config().id.clone(),
            uid: self.uid().to_owned(),
            family: self.config().family,
            state: self.state().clone(),
            filter: self.filter().label().to_owned(),
            frames: self.frames(),
            issues: self.records().issues().to_vec(),
            aggregation: self.aggregation().cloned(),
            scene: self.scene().to_frame(self.config().size()),
        }
    }

    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }
}
