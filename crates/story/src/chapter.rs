use foundation::geo::CameraPose;
use layers::LayerOpacityInstruction;
use serde::{Deserialize, Deserializer, Serialize};

/// Camera transition primitive used to reach a chapter's pose.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapAnimation {
    #[default]
    FlyTo,
    EaseTo,
    JumpTo,
}

/// Where the chapter card sits over the map.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
    Full,
}

impl Alignment {
    pub fn css_class(self) -> &'static str {
        match self {
            Alignment::Left => "lefty",
            Alignment::Center => "centered",
            Alignment::Right => "righty",
            Alignment::Full => "fully",
        }
    }
}

/// One narrative step: a card of text plus the map state it shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Also the id of the card element on the page.
    pub id: String,
    pub location: CameraPose,
    #[serde(default)]
    pub map_animation: MapAnimation,
    #[serde(default)]
    pub rotate_animation: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub callback: Option<String>,
    #[serde(default)]
    pub on_chapter_enter: Vec<LayerOpacityInstruction>,
    #[serde(default)]
    pub on_chapter_exit: Vec<LayerOpacityInstruction>,

    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image: Option<String>,
}

impl Chapter {
    pub fn new(id: impl Into<String>, location: CameraPose) -> Self {
        Self {
            id: id.into(),
            location,
            map_animation: MapAnimation::default(),
            rotate_animation: false,
            callback: None,
            on_chapter_enter: Vec::new(),
            on_chapter_exit: Vec::new(),
            alignment: Alignment::default(),
            hidden: false,
            title: None,
            description: None,
            image: None,
        }
    }

    pub fn with_animation(mut self, animation: MapAnimation) -> Self {
        self.map_animation = animation;
        self
    }

    pub fn with_rotation(mut self) -> Self {
        self.rotate_animation = true;
        self
    }

    pub fn with_callback(mut self, name: impl Into<String>) -> Self {
        self.callback = Some(name.into());
        self
    }

    pub fn on_enter(mut self, instruction: LayerOpacityInstruction) -> Self {
        self.on_chapter_enter.push(instruction);
        self
    }

    pub fn on_exit(mut self, instruction: LayerOpacityInstruction) -> Self {
        self.on_chapter_exit.push(instruction);
        self
    }

    /// Layer ids touched by this chapter's enter and exit fades.
    pub fn layer_ids(&self) -> impl Iterator<Item = &str> {
        self.on_chapter_enter
            .iter()
            .chain(&self.on_chapter_exit)
            .map(|i| i.layer.as_str())
    }
}

/// Hand-written story configs use `""` for "not set".
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
