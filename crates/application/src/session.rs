use gifstudio_domain::{FileDetails, JobSettings, Pipeline, SelectedSource};

use crate::StoredArtifact;

/// One live result artifact plus the name offered when the user saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSlot {
    pub artifact: StoredArtifact,
    pub sequence: u64,
    pub download_name: String,
}

/// All in-memory state for the current editing session. Nothing here
/// survives the process.
#[derive(Debug)]
pub struct Session {
    pub pipeline: Pipeline,
    pub settings: JobSettings,
    pub source: Option<SelectedSource>,
    pub details: Option<FileDetails>,
    pub preview: Option<ResultSlot>,
    pub archive: Option<ResultSlot>,
    /// A submission is in flight.
    pub busy: bool,
    /// A file probe is in flight.
    pub probing: bool,
    pub status: String,
    probe_token: u64,
    submit_sequence: u64,
}

impl Session {
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::seeded(),
            settings: JobSettings::default(),
            source: None,
            details: None,
            preview: None,
            archive: None,
            busy: false,
            probing: false,
            status: "Ready.".to_string(),
            probe_token: 0,
            submit_sequence: 0,
        }
    }

    pub(crate) fn next_probe_token(&mut self) -> u64 {
        self.probe_token += 1;
        self.probe_token
    }

    pub fn current_probe_token(&self) -> u64 {
        self.probe_token
    }

    pub(crate) fn next_submit_sequence(&mut self) -> u64 {
        self.submit_sequence += 1;
        self.submit_sequence
    }

    pub fn latest_submission(&self) -> u64 {
        self.submit_sequence
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
