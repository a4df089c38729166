use std::path::PathBuf;

use gifstudio_domain::{ProbeReply, ProbeRequest, ProcessReply, ProcessRequest};

use crate::ApplicationError;

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    Completed(ProcessReply),
    Failed { sequence: u64, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeEvent {
    Completed(ProbeReply),
    Failed { token: u64, message: String },
}

/// The remote processing collaborator. Submissions run in the background;
/// completions are polled once per UI frame.
pub trait ProcessingGateway {
    fn submit(&self, request: ProcessRequest) -> Result<(), ApplicationError>;

    fn try_receive(&self) -> Result<Option<ProcessEvent>, ApplicationError>;
}

/// Derives display details for a selected file off the UI thread.
pub trait SourceInspector {
    fn submit(&self, request: ProbeRequest) -> Result<(), ApplicationError>;

    fn try_receive(&self) -> Result<Option<ProbeEvent>, ApplicationError>;
}

/// A result file owned by exactly one result slot until released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub path: PathBuf,
}

pub trait ArtifactStore {
    fn store(&self, file_name: &str, bytes: &[u8]) -> Result<StoredArtifact, ApplicationError>;

    fn remove(&self, artifact: &StoredArtifact) -> Result<(), ApplicationError>;
}
