//! In-memory collaborators that record what the story asked of them.
//!
//! Used by the `storymap` replay command and by tests.

use std::collections::{BTreeMap, BTreeSet};

use foundation::geo::{CameraPose, LngLat};
use layers::{PaintSurface, PaintValue, StyleLayer};
use serde::Serialize;

use crate::surface::{MapSurface, Marker, MoveEndHandler, RotateOptions, StepElements, StepTracker};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum MapCommand {
    FlyTo {
        pose: CameraPose,
    },
    EaseTo {
        pose: CameraPose,
    },
    JumpTo {
        pose: CameraPose,
    },
    RotateTo {
        bearing: f64,
        options: RotateOptions,
    },
    SetPaintProperty {
        layer: String,
        property: String,
        value: PaintValue,
    },
}

/// Map double: camera moves land instantly, but "movement ended" only fires
/// on [`RecordingMap::settle`].
#[derive(Default)]
pub struct RecordingMap {
    layers: Vec<StyleLayer>,
    bearing: f64,
    commands: Vec<MapCommand>,
    paint: BTreeMap<(String, String), PaintValue>,
    move_end: Vec<MoveEndHandler>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, id: impl Into<String>, kind: impl Into<String>) -> Self {
        self.layers.push(StyleLayer::new(id, kind));
        self
    }

    pub fn with_style(mut self, layers: impl IntoIterator<Item = StyleLayer>) -> Self {
        self.layers.extend(layers);
        self
    }

    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn paint(&self, layer: &str, property: &str) -> Option<PaintValue> {
        self.paint
            .get(&(layer.to_string(), property.to_string()))
            .copied()
    }

    /// Current numeric value of a paint property.
    pub fn opacity(&self, layer: &str, property: &str) -> Option<f64> {
        match self.paint(layer, property)? {
            PaintValue::Number(v) => Some(v),
            PaintValue::Transition(_) => None,
        }
    }

    pub fn pending_move_end(&self) -> usize {
        self.move_end.len()
    }

    /// Ends the current movement, firing the registered one-shot handlers.
    /// Returns how many fired.
    pub fn settle(&mut self) -> usize {
        let handlers = std::mem::take(&mut self.move_end);
        let fired = handlers.len();
        for handler in handlers {
            let surface: &mut dyn MapSurface = &mut *self;
            handler(surface);
        }
        fired
    }

    fn camera(&mut self, command: MapCommand, pose: &CameraPose) {
        self.bearing = pose.bearing;
        self.commands.push(command);
    }
}

impl std::fmt::Debug for RecordingMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingMap")
            .field("layers", &self.layers)
            .field("bearing", &self.bearing)
            .field("commands", &self.commands.len())
            .field("pending_move_end", &self.move_end.len())
            .finish()
    }
}

impl PaintSurface for RecordingMap {
    fn layer_type(&self, layer: &str) -> Option<String> {
        self.layers
            .iter()
            .find(|l| l.id == layer)
            .map(|l| l.kind.clone())
    }

    fn set_paint_property(&mut self, layer: &str, property: &str, value: PaintValue) {
        self.paint
            .insert((layer.to_string(), property.to_string()), value);
        self.commands.push(MapCommand::SetPaintProperty {
            layer: layer.to_string(),
            property: property.to_string(),
            value,
        });
    }
}

impl MapSurface for RecordingMap {
    fn fly_to(&mut self, pose: &CameraPose) {
        self.camera(MapCommand::FlyTo { pose: *pose }, pose);
    }

    fn ease_to(&mut self, pose: &CameraPose) {
        self.camera(MapCommand::EaseTo { pose: *pose }, pose);
    }

    fn jump_to(&mut self, pose: &CameraPose) {
        self.camera(MapCommand::JumpTo { pose: *pose }, pose);
    }

    fn rotate_to(&mut self, bearing: f64, options: RotateOptions) {
        self.bearing = bearing;
        self.commands.push(MapCommand::RotateTo { bearing, options });
    }

    fn bearing(&self) -> f64 {
        self.bearing
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        self.layers.clone()
    }

    fn once_move_end(&mut self, handler: MoveEndHandler) {
        self.move_end.push(handler);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RecordingMarker {
    positions: Vec<LngLat>,
}

impl RecordingMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<LngLat> {
        self.positions.last().copied()
    }

    pub fn positions(&self) -> &[LngLat] {
        &self.positions
    }
}

impl Marker for RecordingMarker {
    fn set_lng_lat(&mut self, at: LngLat) {
        self.positions.push(at);
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RecordingElements {
    active: BTreeSet<String>,
}

impl RecordingElements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    pub fn active(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }
}

impl StepElements for RecordingElements {
    fn set_active(&mut self, id: &str, active: bool) {
        if active {
            self.active.insert(id.to_string());
        } else {
            self.active.remove(id);
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingTracker {
    resizes: usize,
}

impl RecordingTracker {
    pub fn resizes(&self) -> usize {
        self.resizes
    }
}

impl StepTracker for RecordingTracker {
    fn resize(&mut self) {
        self.resizes += 1;
    }
}
