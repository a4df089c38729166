mod error;
mod job;
mod pipeline;
mod plugin;
mod settings;
mod source;

pub use error::DomainError;
pub use job::{
    JobMetrics, ProbeReply, ProbeRequest, ProcessReply, ProcessRequest, ReplyKind,
};
pub use pipeline::{Pipeline, PipelineStep};
pub use plugin::{FlipMode, PadPosition, PluginKind};
pub use settings::{JobSettings, OutputFormat, ProcessConfig};
pub use source::{format_dimensions, format_file_size, FileDetails, SelectedSource};
