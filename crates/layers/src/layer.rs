use serde::{Deserialize, Serialize};

/// Rendering type of a style layer, as reported by the map style.
///
/// Only the kinds whose visibility can be faded are represented; `background`,
/// `sky`, `hillshade` and friends have no opacity channel the story drives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerKind {
    Fill,
    Line,
    Circle,
    Symbol,
    Raster,
    FillExtrusion,
    Heatmap,
}

impl LayerKind {
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Fill,
        LayerKind::Line,
        LayerKind::Circle,
        LayerKind::Symbol,
        LayerKind::Raster,
        LayerKind::FillExtrusion,
        LayerKind::Heatmap,
    ];

    pub fn from_style_type(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.style_type() == kind)
    }

    pub fn style_type(self) -> &'static str {
        match self {
            LayerKind::Fill => "fill",
            LayerKind::Line => "line",
            LayerKind::Circle => "circle",
            LayerKind::Symbol => "symbol",
            LayerKind::Raster => "raster",
            LayerKind::FillExtrusion => "fill-extrusion",
            LayerKind::Heatmap => "heatmap",
        }
    }

    /// Paint properties that together control how opaque the layer renders.
    ///
    /// Multi-channel kinds list every channel so a fade moves them in lockstep.
    pub fn opacity_properties(self) -> &'static [&'static str] {
        match self {
            LayerKind::Fill => &["fill-opacity"],
            LayerKind::Line => &["line-opacity"],
            LayerKind::Circle => &["circle-opacity", "circle-stroke-opacity"],
            LayerKind::Symbol => &["icon-opacity", "text-opacity"],
            LayerKind::Raster => &["raster-opacity"],
            LayerKind::FillExtrusion => &["fill-extrusion-opacity"],
            LayerKind::Heatmap => &["heatmap-opacity"],
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.style_type())
    }
}

/// A layer entry from the loaded style (`getStyle().layers`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleLayer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl StyleLayer {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }

    pub fn layer_kind(&self) -> Option<LayerKind> {
        LayerKind::from_style_type(&self.kind)
    }
}
