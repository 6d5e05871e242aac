use std::collections::BTreeMap;

use crate::chapter::Chapter;
use crate::error::{Result, StoryError};
use crate::registry::ChapterRegistry;

pub type ChapterCallback = Box<dyn FnMut(&Chapter)>;

/// Named hooks chapters may trigger on enter, registered up front.
#[derive(Default)]
pub struct CallbackTable {
    hooks: BTreeMap<String, ChapterCallback>,
}

impl CallbackTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, hook: impl FnMut(&Chapter) + 'static) {
        self.hooks.insert(name.into(), Box::new(hook));
    }

    pub fn with(mut self, name: impl Into<String>, hook: impl FnMut(&Chapter) + 'static) -> Self {
        self.register(name, hook);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// Fails on the first chapter naming a hook that was never registered.
    pub fn validate(&self, registry: &ChapterRegistry) -> Result<()> {
        for chapter in registry {
            if let Some(name) = &chapter.callback {
                if !self.contains(name) {
                    return Err(StoryError::config(format!(
                        "chapter `{}` names unregistered callback `{name}`",
                        chapter.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn invoke(&mut self, name: &str, chapter: &Chapter) -> Result<()> {
        let hook = self.hooks.get_mut(name).ok_or_else(|| {
            StoryError::config(format!("callback `{name}` is not registered"))
        })?;
        hook(chapter);
        Ok(())
    }
}

impl std::fmt::Debug for CallbackTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.hooks.keys()).finish()
    }
}
