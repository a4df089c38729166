pub mod fs;
pub mod http;
pub mod presenters;
pub mod probe;

pub use fs::FsArtifactStore;
pub use http::BackgroundProcessingGateway;
pub use presenters::{present_details, present_metrics};
pub use probe::{probe_file, BackgroundSourceInspector};
