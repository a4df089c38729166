use serde::{Deserialize, Serialize};

use crate::PipelineStep;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    Gif,
    Png,
    Jpeg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Gif, OutputFormat::Png, OutputFormat::Jpeg];

    pub fn label(self) -> &'static str {
        match self {
            Self::Gif => "GIF",
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
        }
    }
}

/// Session-wide job settings, mutated in place by the settings panel.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    pub output_format: OutputFormat,
    pub create_preview: bool,
    pub output_filename: String,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Gif,
            create_preview: true,
            output_filename: "frames".to_string(),
        }
    }
}

/// The JSON document posted as the multipart `config` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    pub pipeline: Vec<PipelineStep>,
    pub create_preview: bool,
    pub output_format: OutputFormat,
    pub output_filename: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{Pipeline, PluginKind};

    #[test]
    fn output_format_uses_uppercase_wire_names() {
        assert_eq!(serde_json::to_string(&OutputFormat::Gif).expect("gif"), "\"GIF\"");
        assert_eq!(serde_json::to_string(&OutputFormat::Jpeg).expect("jpeg"), "\"JPEG\"");
    }

    #[test]
    fn config_serializes_to_the_documented_shape() {
        let mut pipeline = Pipeline::new();
        pipeline.add_step(PluginKind::Resize);

        let config = ProcessConfig {
            pipeline: pipeline.steps().to_vec(),
            create_preview: true,
            output_format: OutputFormat::Gif,
            output_filename: "frames".to_string(),
        };

        let serialized = serde_json::to_value(&config).expect("serialize config");
        assert_eq!(
            serialized,
            json!({
                "pipeline": [
                    { "id": 1, "plugin": "resize", "params": { "size": [100, 100] } }
                ],
                "create_preview": true,
                "output_format": "GIF",
                "output_filename": "frames",
            })
        );
    }
}
