use std::collections::{BTreeSet, HashMap};

use crate::chapter::Chapter;
use crate::error::{Result, StoryError};

/// Ordered, read-only list of chapters with lookup by id.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRegistry {
    chapters: Vec<Chapter>,
    index: HashMap<String, usize>,
}

impl ChapterRegistry {
    /// Validates every chapter and indexes them by id.
    pub fn new(chapters: Vec<Chapter>) -> Result<Self> {
        if chapters.is_empty() {
            return Err(StoryError::config("story has no chapters"));
        }

        let mut index = HashMap::with_capacity(chapters.len());
        for (i, chapter) in chapters.iter().enumerate() {
            if chapter.id.trim().is_empty() {
                return Err(StoryError::config(format!("chapter #{i} has an empty id")));
            }
            chapter
                .location
                .validate()
                .map_err(|e| StoryError::config(format!("chapter `{}`: {e}", chapter.id)))?;
            for instruction in chapter.on_chapter_enter.iter().chain(&chapter.on_chapter_exit) {
                instruction
                    .validate()
                    .map_err(|e| StoryError::config(format!("chapter `{}`: {e}", chapter.id)))?;
            }
            if index.insert(chapter.id.clone(), i).is_some() {
                return Err(StoryError::config(format!(
                    "duplicate chapter id `{}`",
                    chapter.id
                )));
            }
        }

        Ok(Self { chapters, index })
    }

    pub fn resolve(&self, id: &str) -> Result<&Chapter> {
        self.index
            .get(id)
            .map(|&i| &self.chapters[i])
            .ok_or_else(|| StoryError::UnknownChapter(id.to_string()))
    }

    /// The opening chapter; its pose is the map's initial camera.
    pub fn first(&self) -> &Chapter {
        &self.chapters[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Every style layer any chapter fades, deduplicated and sorted.
    pub fn layer_ids(&self) -> BTreeSet<&str> {
        self.chapters.iter().flat_map(|c| c.layer_ids()).collect()
    }
}

impl<'a> IntoIterator for &'a ChapterRegistry {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use foundation::geo::{CameraPose, LngLat};
    use layers::LayerOpacityInstruction;

    use super::ChapterRegistry;
    use crate::chapter::Chapter;
    use crate::error::StoryError;

    fn pose() -> CameraPose {
        CameraPose::new(LngLat::new(-73.9, 40.8), 12.0, 0.0, 0.0)
    }

    #[test]
    fn resolves_every_chapter_by_id() {
        let chapters = vec![
            Chapter::new("a", pose()),
            Chapter::new("b", pose()),
            Chapter::new("c", pose()),
        ];
        let registry = ChapterRegistry::new(chapters.clone()).unwrap();
        for chapter in &chapters {
            assert_eq!(registry.resolve(&chapter.id).unwrap(), chapter);
        }
        assert_eq!(registry.first().id, "a");
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = ChapterRegistry::new(vec![Chapter::new("a", pose())]).unwrap();
        assert_eq!(
            registry.resolve("ghost"),
            Err(StoryError::UnknownChapter("ghost".to_string()))
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ChapterRegistry::new(vec![Chapter::new("a", pose()), Chapter::new("a", pose())])
            .unwrap_err();
        assert!(matches!(err, StoryError::InvalidChapterConfig(_)));
    }

    #[test]
    fn rejects_empty_story_and_bad_poses() {
        assert!(ChapterRegistry::new(Vec::new()).is_err());

        let mut bad = pose();
        bad.zoom = 40.0;
        assert!(ChapterRegistry::new(vec![Chapter::new("a", bad)]).is_err());
    }

    #[test]
    fn rejects_out_of_range_opacity() {
        let chapter = Chapter::new("a", pose()).on_enter(LayerOpacityInstruction::new("water", 2.0));
        assert!(matches!(
            ChapterRegistry::new(vec![chapter]),
            Err(StoryError::InvalidChapterConfig(_))
        ));
    }

    #[test]
    fn collects_referenced_layers() {
        let registry = ChapterRegistry::new(vec![
            Chapter::new("a", pose()).on_enter(LayerOpacityInstruction::new("water", 0.0)),
            Chapter::new("b", pose())
                .on_enter(LayerOpacityInstruction::new("roads", 1.0))
                .on_exit(LayerOpacityInstruction::new("water", 1.0)),
        ])
        .unwrap();
        let ids: Vec<_> = registry.layer_ids().into_iter().collect();
        assert_eq!(ids, vec!["roads", "water"]);
    }
}
