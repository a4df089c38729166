use std::path::PathBuf;

use gifstudio_domain::{OutputFormat, PluginKind};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SelectSourceCommand {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct AddStepCommand {
    pub kind: PluginKind,
}

#[derive(Debug, Clone, Copy)]
pub struct RemoveStepCommand {
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveStepCommand {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone)]
pub struct SetParamCommand {
    pub index: usize,
    pub key: String,
    pub value: Value,
}

#[derive(Debug, Clone, Copy)]
pub struct SetOutputFormatCommand {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy)]
pub struct SetCreatePreviewCommand {
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct SetOutputFilenameCommand {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubmitPipelineCommand;

#[derive(Debug, Clone, Copy, Default)]
pub struct PumpEventsCommand;
