use std::path::PathBuf;

use crate::{FileDetails, ProcessConfig};

/// Request to derive display details for a freshly selected file. The token
/// is the selection counter at submission time; a reply whose token no longer
/// matches the current selection must be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub token: u64,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReply {
    pub token: u64,
    pub details: FileDetails,
}

/// One submission of the current session to the remote processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessRequest {
    pub sequence: u64,
    pub source_path: PathBuf,
    pub source_name: String,
    pub config: ProcessConfig,
}

/// The raw reply: whatever the processor returned, classified later purely by
/// its declared content type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReply {
    pub sequence: u64,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Preview,
    Archive,
}

impl ReplyKind {
    /// Classification mirrors the service contract: a `image/gif`-matching
    /// content type is an inline preview, everything else is a downloadable
    /// archive. Status codes and body shape are deliberately not consulted.
    pub fn classify(content_type: &str) -> ReplyKind {
        if content_type.contains("image/gif") {
            ReplyKind::Preview
        } else {
            ReplyKind::Archive
        }
    }
}

/// Background-job counters surfaced in the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobMetrics {
    pub submitted: u64,
    pub completed: u64,
    pub failed: u64,
    pub stale_dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gif_content_types_classify_as_preview() {
        assert_eq!(ReplyKind::classify("image/gif"), ReplyKind::Preview);
        assert_eq!(
            ReplyKind::classify("image/gif; charset=binary"),
            ReplyKind::Preview
        );
    }

    #[test]
    fn everything_else_classifies_as_archive() {
        assert_eq!(ReplyKind::classify("application/zip"), ReplyKind::Archive);
        assert_eq!(ReplyKind::classify("image/png"), ReplyKind::Archive);
        assert_eq!(ReplyKind::classify(""), ReplyKind::Archive);
    }
}
