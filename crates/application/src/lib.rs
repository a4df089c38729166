mod commands;
mod error;
mod ports;
mod service;
mod session;

pub use commands::{
    AddStepCommand, MoveStepCommand, PumpEventsCommand, RemoveStepCommand, SelectSourceCommand,
    SetCreatePreviewCommand, SetOutputFilenameCommand, SetOutputFormatCommand, SetParamCommand,
    SubmitPipelineCommand,
};
pub use error::ApplicationError;
pub use ports::{
    ArtifactStore, ProbeEvent, ProcessEvent, ProcessingGateway, SourceInspector, StoredArtifact,
};
pub use service::StudioService;
pub use session::{ResultSlot, Session};
