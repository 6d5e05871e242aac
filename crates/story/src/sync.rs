use std::collections::HashMap;

use layers::{LayerKind, OpacityError, OpacityTransitioner};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::callbacks::CallbackTable;
use crate::camera::CameraController;
use crate::config::StoryConfig;
use crate::error::Result;
use crate::journal::{Journal, JournalEntry};
use crate::registry::ChapterRegistry;
use crate::surface::{
    Direction, MapSurface, Marker, StepElements, StepEvent, StepKind, StepTracker,
};

/// Which chapter card is currently marked active.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "chapter", rename_all = "lowercase")]
pub enum ActiveChapter {
    #[default]
    Inactive,
    Active(String),
}

impl ActiveChapter {
    pub fn chapter_id(&self) -> Option<&str> {
        match self {
            ActiveChapter::Inactive => None,
            ActiveChapter::Active(id) => Some(id),
        }
    }
}

/// Drives the map from step tracker reports.
///
/// Events are handled one at a time, fully, in delivery order. Camera and
/// opacity commands are fire-and-forget; the last one issued wins.
#[derive(Debug)]
pub struct Synchronizer<M, K, E> {
    registry: ChapterRegistry,
    map: M,
    marker: Option<K>,
    elements: E,
    camera: CameraController,
    opacity: OpacityTransitioner,
    callbacks: CallbackTable,
    state: ActiveChapter,
    /// Chapters entered and not yet exited, oldest first.
    entered: Vec<String>,
    journal: Journal,
}

impl<M, K, E> Synchronizer<M, K, E>
where
    M: MapSurface,
    K: Marker,
    E: StepElements,
{
    /// Checks callbacks against the registry and parks the marker on the
    /// opening chapter.
    pub fn new(
        registry: ChapterRegistry,
        map: M,
        mut marker: Option<K>,
        elements: E,
        callbacks: CallbackTable,
    ) -> Result<Self> {
        callbacks.validate(&registry)?;
        if let Some(marker) = marker.as_mut() {
            marker.set_lng_lat(registry.first().location.center);
        }
        info!(
            chapters = registry.len(),
            markers = marker.is_some(),
            "story synchronizer ready"
        );
        Ok(Self {
            registry,
            map,
            marker,
            elements,
            camera: CameraController::new(),
            opacity: OpacityTransitioner::new(),
            callbacks,
            state: ActiveChapter::Inactive,
            entered: Vec::new(),
            journal: Journal::new(),
        })
    }

    /// Builds from a loaded config; `marker` is dropped unless the config
    /// shows markers.
    pub fn from_config(
        config: &StoryConfig,
        map: M,
        marker: Option<K>,
        elements: E,
        callbacks: CallbackTable,
    ) -> Result<Self> {
        let registry = config.registry()?;
        let marker = marker.filter(|_| config.show_markers);
        Self::new(registry, map, marker, elements, callbacks)
    }

    pub fn handle(&mut self, event: &StepEvent) -> Result<()> {
        match event.kind {
            StepKind::Enter => self.on_step_enter(&event.element_id, event.direction),
            StepKind::Exit => self.on_step_exit(&event.element_id, event.direction),
        }
    }

    pub fn on_step_enter(&mut self, element_id: &str, direction: Direction) -> Result<()> {
        let chapter = self.registry.resolve(element_id)?;
        debug!(chapter = %chapter.id, ?direction, "step enter");

        self.elements.set_active(&chapter.id, true);
        self.camera
            .move_to(&mut self.map, &chapter.location, chapter.map_animation);
        if let Some(marker) = self.marker.as_mut() {
            marker.set_lng_lat(chapter.location.center);
        }
        self.opacity
            .apply_all(&mut self.map, &chapter.on_chapter_enter)?;
        if let Some(name) = &chapter.callback {
            self.callbacks.invoke(name, chapter)?;
        }
        if chapter.rotate_animation {
            self.camera.rotate_after_move(&mut self.map);
        }

        self.entered.retain(|id| id != &chapter.id);
        self.entered.push(chapter.id.clone());
        self.state = ActiveChapter::Active(chapter.id.clone());
        self.journal.record(StepKind::Enter, &chapter.id, direction);
        Ok(())
    }

    pub fn on_step_exit(&mut self, element_id: &str, direction: Direction) -> Result<()> {
        let chapter = self.registry.resolve(element_id)?;
        debug!(chapter = %chapter.id, ?direction, "step exit");

        self.elements.set_active(&chapter.id, false);
        self.opacity
            .apply_all(&mut self.map, &chapter.on_chapter_exit)?;

        match self.entered.iter().position(|id| id == &chapter.id) {
            Some(at) => {
                self.entered.remove(at);
            }
            None => {
                warn!(chapter = %chapter.id, active = ?self.state.chapter_id(), "exit of chapter never entered");
            }
        }
        // An earlier card still marked active takes over.
        self.state = match self.entered.last() {
            Some(id) => ActiveChapter::Active(id.clone()),
            None => ActiveChapter::Inactive,
        };
        self.journal.record(StepKind::Exit, &chapter.id, direction);
        Ok(())
    }

    /// Layout changed: have the tracker recompute step boundaries.
    pub fn relayout<T: StepTracker + ?Sized>(&self, tracker: &mut T) {
        debug!("recomputing step boundaries");
        tracker.resize();
    }

    /// Checks every layer the story fades against the loaded style.
    pub fn preflight_layers(&self) -> Result<()> {
        let style: HashMap<String, String> = self
            .map
            .style_layers()
            .into_iter()
            .map(|l| (l.id, l.kind))
            .collect();

        for layer in self.registry.layer_ids() {
            let kind = style
                .get(layer)
                .ok_or_else(|| OpacityError::UnknownLayer(layer.to_string()))?;
            if LayerKind::from_style_type(kind).is_none() {
                warn!(layer, kind = %kind, "story fades a layer without opacity");
                return Err(OpacityError::UnsupportedLayerType {
                    layer: layer.to_string(),
                    kind: kind.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    pub fn state(&self) -> &ActiveChapter {
        &self.state
    }

    pub fn registry(&self) -> &ChapterRegistry {
        &self.registry
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn marker(&self) -> Option<&K> {
        self.marker.as_ref()
    }

    pub fn elements(&self) -> &E {
        &self.elements
    }

    pub fn journal(&self) -> &[JournalEntry] {
        self.journal.entries()
    }

    pub fn drain_journal(&mut self) -> Vec<JournalEntry> {
        self.journal.drain()
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::{CameraPose, LngLat};
    use layers::{LayerOpacityInstruction, OpacityError};

    use super::{ActiveChapter, Synchronizer};
    use crate::callbacks::CallbackTable;
    use crate::chapter::Chapter;
    use crate::error::StoryError;
    use crate::recording::{RecordingElements, RecordingMap, RecordingMarker, RecordingTracker};
    use crate::registry::ChapterRegistry;
    use crate::surface::Direction;

    type TestSync = Synchronizer<RecordingMap, RecordingMarker, RecordingElements>;

    fn chapter(id: &str, lon: f64) -> Chapter {
        Chapter::new(id, CameraPose::new(LngLat::new(lon, 40.0), 10.0, 0.0, 0.0))
    }

    fn sync(chapters: Vec<Chapter>, map: RecordingMap) -> TestSync {
        Synchronizer::new(
            ChapterRegistry::new(chapters).unwrap(),
            map,
            Some(RecordingMarker::new()),
            RecordingElements::new(),
            CallbackTable::new(),
        )
        .unwrap()
    }

    #[test]
    fn marker_starts_on_first_chapter() {
        let s = sync(vec![chapter("a", 1.0), chapter("b", 2.0)], RecordingMap::new());
        assert_eq!(s.marker().unwrap().current(), Some(LngLat::new(1.0, 40.0)));
        assert_eq!(s.state(), &ActiveChapter::Inactive);
    }

    #[test]
    fn enter_moves_marker_and_marks_card() {
        let mut s = sync(vec![chapter("a", 1.0), chapter("b", 2.0)], RecordingMap::new());
        s.on_step_enter("b", Direction::Down).unwrap();
        assert_eq!(s.marker().unwrap().current(), Some(LngLat::new(2.0, 40.0)));
        assert!(s.elements().is_active("b"));
        assert_eq!(s.state(), &ActiveChapter::Active("b".to_string()));
    }

    #[test]
    fn exit_of_other_chapter_keeps_active_one() {
        let mut s = sync(vec![chapter("a", 1.0), chapter("b", 2.0)], RecordingMap::new());
        s.on_step_enter("a", Direction::Down).unwrap();
        s.on_step_enter("b", Direction::Down).unwrap();
        s.on_step_exit("a", Direction::Down).unwrap();
        assert_eq!(s.state(), &ActiveChapter::Active("b".to_string()));
        assert!(!s.elements().is_active("a"));
        assert!(s.elements().is_active("b"));
    }

    #[test]
    fn exit_without_enter_leaves_state_alone() {
        let mut s = sync(vec![chapter("a", 1.0), chapter("b", 2.0)], RecordingMap::new());
        s.on_step_enter("b", Direction::Down).unwrap();
        s.on_step_exit("a", Direction::Up).unwrap();
        assert_eq!(s.state(), &ActiveChapter::Active("b".to_string()));
        assert_eq!(s.journal().len(), 2);
    }

    #[test]
    fn unknown_element_is_fatal() {
        let mut s = sync(vec![chapter("a", 1.0)], RecordingMap::new());
        assert_eq!(
            s.on_step_enter("ghost", Direction::Down),
            Err(StoryError::UnknownChapter("ghost".to_string()))
        );
        assert!(s.map().commands().is_empty());
        assert!(s.journal().is_empty());
    }

    #[test]
    fn unknown_layer_surfaces_from_enter() {
        let chapters = vec![chapter("a", 1.0).on_enter(LayerOpacityInstruction::new("water", 0.0))];
        let mut s = sync(chapters, RecordingMap::new());
        assert_eq!(
            s.on_step_enter("a", Direction::Down),
            Err(StoryError::Opacity(OpacityError::UnknownLayer("water".to_string())))
        );
    }

    #[test]
    fn markers_hidden_by_config() {
        let mut s: TestSync = Synchronizer::new(
            ChapterRegistry::new(vec![chapter("a", 1.0)]).unwrap(),
            RecordingMap::new(),
            None,
            RecordingElements::new(),
            CallbackTable::new(),
        )
        .unwrap();
        s.on_step_enter("a", Direction::Down).unwrap();
        assert!(s.marker().is_none());
    }

    #[test]
    fn preflight_checks_style_layers() {
        let chapters = vec![
            chapter("a", 1.0).on_enter(LayerOpacityInstruction::new("water", 0.0)),
            chapter("b", 2.0).on_exit(LayerOpacityInstruction::new("sky", 1.0)),
        ];

        let s = sync(chapters.clone(), RecordingMap::new().with_layer("water", "fill"));
        assert_eq!(
            s.preflight_layers(),
            Err(StoryError::Opacity(OpacityError::UnknownLayer("sky".to_string())))
        );

        let s = sync(
            chapters.clone(),
            RecordingMap::new()
                .with_layer("water", "fill")
                .with_layer("sky", "sky"),
        );
        assert!(matches!(
            s.preflight_layers(),
            Err(StoryError::Opacity(OpacityError::UnsupportedLayerType { .. }))
        ));

        let s = sync(
            chapters,
            RecordingMap::new()
                .with_layer("water", "fill")
                .with_layer("sky", "raster"),
        );
        assert!(s.preflight_layers().is_ok());
    }

    #[test]
    fn relayout_delegates_to_tracker() {
        let s = sync(vec![chapter("a", 1.0)], RecordingMap::new());
        let mut tracker = RecordingTracker::default();
        s.relayout(&mut tracker);
        s.relayout(&mut tracker);
        assert_eq!(tracker.resizes(), 2);
    }
}
