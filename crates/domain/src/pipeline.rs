use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{DomainError, PluginKind};

/// One configured transformation step. The whole step, id included, is what
/// goes over the wire inside the config's `pipeline` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub id: u64,
    #[serde(rename = "plugin")]
    pub kind: PluginKind,
    pub params: Map<String, Value>,
}

/// The ordered sequence of steps. Order is execution order on the remote
/// processor. Step ids come from a per-pipeline monotonic counter and exist
/// only for list identity, never as domain identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    next_id: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            next_id: 1,
        }
    }

    /// The pipeline a fresh session starts with.
    pub fn seeded() -> Self {
        let mut pipeline = Self::new();
        pipeline.push_step(PluginKind::Resize, {
            let mut params = Map::new();
            params.insert("size".to_string(), json!([200, 200]));
            params
        });
        pipeline.push_step(PluginKind::Flip, PluginKind::Flip.default_params());
        pipeline.push_step(PluginKind::Pad, {
            let mut params = Map::new();
            params.insert("target_size".to_string(), json!([400, 400]));
            params.insert("position".to_string(), json!("center"));
            params.insert("color".to_string(), json!("#ffffff"));
            params
        });
        pipeline
    }

    fn push_step(&mut self, kind: PluginKind, params: Map<String, Value>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.steps.push(PipelineStep { id, kind, params });
        id
    }

    /// Appends a step of the given kind with its default parameters and
    /// returns the new step's id.
    pub fn add_step(&mut self, kind: PluginKind) -> u64 {
        self.push_step(kind, kind.default_params())
    }

    pub fn remove_step(&mut self, index: usize) -> Result<PipelineStep, DomainError> {
        if index >= self.steps.len() {
            return Err(DomainError::StepOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        Ok(self.steps.remove(index))
    }

    /// Moves the step at `from` to position `to` as a single list move.
    pub fn move_step(&mut self, from: usize, to: usize) -> Result<(), DomainError> {
        let len = self.steps.len();
        if from >= len {
            return Err(DomainError::StepOutOfRange { index: from, len });
        }
        if to >= len {
            return Err(DomainError::StepOutOfRange { index: to, len });
        }
        let step = self.steps.remove(from);
        self.steps.insert(to, step);
        Ok(())
    }

    /// Merges one key/value into the parameter mapping of the step at
    /// `index`. No other step is touched.
    pub fn set_param(
        &mut self,
        index: usize,
        key: &str,
        value: Value,
    ) -> Result<(), DomainError> {
        let len = self.steps.len();
        let step = self
            .steps
            .get_mut(index)
            .ok_or(DomainError::StepOutOfRange { index, len })?;
        step.params.insert(key.to_string(), value);
        Ok(())
    }

    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(pipeline: &Pipeline) -> Vec<PluginKind> {
        pipeline.steps().iter().map(|step| step.kind).collect()
    }

    #[test]
    fn seeded_pipeline_matches_startup_state() {
        let pipeline = Pipeline::seeded();
        assert_eq!(
            kinds(&pipeline),
            vec![PluginKind::Resize, PluginKind::Flip, PluginKind::Pad]
        );
        assert_eq!(pipeline.steps()[0].params.get("size"), Some(&json!([200, 200])));
        assert_eq!(
            pipeline.steps()[2].params.get("target_size"),
            Some(&json!([400, 400]))
        );
    }

    #[test]
    fn add_and_remove_reflect_applied_operations() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Resize);
        pipeline.add_step(PluginKind::Flip);
        pipeline.remove_step(0).expect("remove first");

        assert_eq!(kinds(&pipeline), vec![PluginKind::Flip]);
    }

    #[test]
    fn step_ids_are_unique_and_monotonic() {
        let mut pipeline = Pipeline::new();
        let first = pipeline.add_step(PluginKind::Resize);
        let second = pipeline.add_step(PluginKind::Flip);
        pipeline.remove_step(0).expect("remove");
        let third = pipeline.add_step(PluginKind::Pad);

        assert!(first < second && second < third);
    }

    #[test]
    fn move_step_is_a_single_list_move() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Resize);
        pipeline.add_step(PluginKind::Flip);
        pipeline.add_step(PluginKind::Pad);

        // Drag the first entry past the other two.
        pipeline.move_step(0, 2).expect("move");

        assert_eq!(
            kinds(&pipeline),
            vec![PluginKind::Flip, PluginKind::Pad, PluginKind::Resize]
        );
        assert_eq!(pipeline.len(), 3);
    }

    #[test]
    fn move_step_rejects_out_of_range_indices() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Resize);

        assert!(matches!(
            pipeline.move_step(0, 3),
            Err(DomainError::StepOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn set_param_leaves_other_steps_untouched() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Resize);
        pipeline.add_step(PluginKind::Resize);

        pipeline
            .set_param(0, "size", json!([640, 480]))
            .expect("set param");

        assert_eq!(pipeline.steps()[0].params.get("size"), Some(&json!([640, 480])));
        assert_eq!(pipeline.steps()[1].params.get("size"), Some(&json!([100, 100])));
    }

    #[test]
    fn steps_serialize_with_plugin_wire_field() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Flip);

        let serialized = serde_json::to_value(&pipeline.steps()[0]).expect("serialize step");
        assert_eq!(
            serialized,
            json!({ "id": 1, "plugin": "flip", "params": { "mode": "vertical" } })
        );
    }
}
