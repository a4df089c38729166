use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The closed set of transformation plugins the remote processor understands.
///
/// Every kind pairs its wire name with a default-parameter constructor, so an
/// unrecognized kind cannot exist and a freshly added step always carries the
/// parameter shape its kind requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginKind {
    Resize,
    Flip,
    Pad,
    Crop,
    Rotate,
}

impl PluginKind {
    pub const ALL: [PluginKind; 5] = [
        PluginKind::Resize,
        PluginKind::Flip,
        PluginKind::Pad,
        PluginKind::Crop,
        PluginKind::Rotate,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Flip => "flip",
            Self::Pad => "pad",
            Self::Crop => "crop",
            Self::Rotate => "rotate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Resize => "Resize",
            Self::Flip => "Flip",
            Self::Pad => "Pad",
            Self::Crop => "Crop",
            Self::Rotate => "Rotate",
        }
    }

    /// The parameter mapping a newly added step of this kind starts with.
    pub fn default_params(self) -> Map<String, Value> {
        let mut params = Map::new();
        match self {
            Self::Resize => {
                params.insert("size".to_string(), json!([100, 100]));
            }
            Self::Flip => {
                params.insert("mode".to_string(), json!(FlipMode::Vertical.wire_name()));
            }
            Self::Pad => {
                params.insert("target_size".to_string(), json!([200, 200]));
                params.insert(
                    "position".to_string(),
                    json!(PadPosition::Center.wire_name()),
                );
                params.insert("color".to_string(), json!("#ffffff"));
            }
            Self::Crop => {
                params.insert("coordinates".to_string(), json!([0, 0, 100, 100]));
            }
            Self::Rotate => {
                params.insert("angle".to_string(), json!(90));
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipMode {
    Vertical,
    Horizontal,
    Both,
}

impl FlipMode {
    pub const ALL: [FlipMode; 3] = [FlipMode::Vertical, FlipMode::Horizontal, FlipMode::Both];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::Both => "both",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vertical => "Vertical",
            Self::Horizontal => "Horizontal",
            Self::Both => "Both",
        }
    }

    pub fn from_wire(name: &str) -> FlipMode {
        match name {
            "horizontal" => Self::Horizontal,
            "both" => Self::Both,
            _ => Self::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadPosition {
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl PadPosition {
    pub const ALL: [PadPosition; 5] = [
        PadPosition::Center,
        PadPosition::TopLeft,
        PadPosition::TopRight,
        PadPosition::BottomLeft,
        PadPosition::BottomRight,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::TopLeft => "Top Left",
            Self::TopRight => "Top Right",
            Self::BottomLeft => "Bottom Left",
            Self::BottomRight => "Bottom Right",
        }
    }

    pub fn from_wire(name: &str) -> PadPosition {
        match name {
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            _ => Self::Center,
        }
    }
}
