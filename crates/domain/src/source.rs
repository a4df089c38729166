use std::path::{Path, PathBuf};

/// The single file the session is working on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSource {
    pub path: PathBuf,
    pub file_name: String,
}

impl SelectedSource {
    pub fn new(path: PathBuf) -> Self {
        let file_name = Path::new(&path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Self { path, file_name }
    }
}

/// Details derived once per selection; display-only, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDetails {
    /// MIME-style format string, e.g. `image/gif`.
    pub format: String,
    pub frame_count: u32,
    /// Human-readable size, e.g. `12.34 KB`.
    pub file_size: String,
    /// `WxH` pixel dimensions.
    pub dimensions: String,
}

pub fn format_file_size(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

pub fn format_dimensions(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_size_is_kilobytes_with_two_decimals() {
        assert_eq!(format_file_size(1024), "1.00 KB");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(100), "0.10 KB");
    }

    #[test]
    fn dimensions_render_as_width_x_height() {
        assert_eq!(format_dimensions(320, 240), "320x240");
    }

    #[test]
    fn selected_source_uses_the_file_name() {
        let source = SelectedSource::new(PathBuf::from("/photos/party.gif"));
        assert_eq!(source.file_name, "party.gif");
    }
}
