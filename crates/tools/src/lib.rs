//! Offline replay of a story against a recording map.

use foundation::geo::LngLat;
use layers::StyleLayer;
use serde::Serialize;
use story::recording::{MapCommand, RecordingElements, RecordingMap, RecordingMarker};
use story::{
    ActiveChapter, CallbackTable, Chapter, Direction, JournalEntry, StepEvent, StoryConfig,
    StoryError, Synchronizer,
};
use tracing::info;

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStep {
    Step(StepEvent),
    /// The camera finishes moving.
    Settle,
}

impl ReplayStep {
    /// Parses `enter:<id>`, `exit:<id>`, `up-enter:<id>`, `up-exit:<id>` or `settle`.
    pub fn parse(s: &str) -> Result<Self, String> {
        if s == "settle" {
            return Ok(ReplayStep::Settle);
        }
        let (verb, id) = s
            .split_once(':')
            .ok_or_else(|| format!("bad step `{s}`: expected <verb>:<chapter-id> or settle"))?;
        if id.is_empty() {
            return Err(format!("bad step `{s}`: empty chapter id"));
        }
        let event = match verb {
            "enter" => StepEvent::enter(id, Direction::Down),
            "exit" => StepEvent::exit(id, Direction::Down),
            "up-enter" => StepEvent::enter(id, Direction::Up),
            "up-exit" => StepEvent::exit(id, Direction::Up),
            _ => return Err(format!("bad step `{s}`: unknown verb `{verb}`")),
        };
        Ok(ReplayStep::Step(event))
    }
}

/// Parses `<id>=<type>` into a style layer.
pub fn parse_layer(s: &str) -> Result<StyleLayer, String> {
    match s.split_once('=') {
        Some((id, kind)) if !id.is_empty() && !kind.is_empty() => Ok(StyleLayer::new(id, kind)),
        _ => Err(format!("bad layer `{s}`: expected <id>=<type>")),
    }
}

/// One line of `storymap check` output.
pub fn chapter_row(index: usize, chapter: &Chapter) -> String {
    let pose = chapter.location;
    let mut row = format!(
        "{index:>3}  {:<24} {:?} [{:.5}, {:.5}] z{:.1} b{:.0} p{:.0} {}",
        chapter.id,
        chapter.map_animation,
        pose.center.lon,
        pose.center.lat,
        pose.zoom,
        pose.bearing,
        pose.pitch,
        chapter.alignment.css_class(),
    );
    if chapter.hidden {
        row.push_str(" hidden");
    }
    if chapter.rotate_animation {
        row.push_str(" rotate");
    }
    if let Some(name) = &chapter.callback {
        row.push_str(&format!(" callback={name}"));
    }
    row
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    pub commands: Vec<MapCommand>,
    pub markers: Vec<LngLat>,
    pub journal: Vec<JournalEntry>,
    pub state: ActiveChapter,
    pub active_elements: Vec<String>,
}

/// Callbacks that only log, standing in for page hooks.
pub fn logging_callbacks<'a>(names: impl IntoIterator<Item = &'a str>) -> CallbackTable {
    let mut table = CallbackTable::new();
    for name in names {
        let hook = name.to_string();
        table.register(name, move |chapter: &Chapter| {
            info!(callback = %hook, chapter = %chapter.id, "callback invoked");
        });
    }
    table
}

pub fn replay(
    config: &StoryConfig,
    style: Vec<StyleLayer>,
    callback_names: &[String],
    steps: &[ReplayStep],
) -> Result<ReplayReport, StoryError> {
    let mut sync = Synchronizer::from_config(
        config,
        RecordingMap::new().with_style(style),
        Some(RecordingMarker::new()),
        RecordingElements::new(),
        logging_callbacks(callback_names.iter().map(String::as_str)),
    )?;
    sync.preflight_layers()?;

    for step in steps {
        match step {
            ReplayStep::Step(event) => sync.handle(event)?,
            ReplayStep::Settle => {
                let fired = sync.map_mut().settle();
                info!(fired, "movement ended");
            }
        }
    }

    Ok(ReplayReport {
        commands: sync.map_mut().take_commands(),
        markers: sync
            .marker()
            .map(|m| m.positions().to_vec())
            .unwrap_or_default(),
        journal: sync.drain_journal(),
        state: sync.state().clone(),
        active_elements: sync.elements().active().map(str::to_string).collect(),
    })
}

#[cfg(test)]
mod tests {
    use layers::StyleLayer;
    use pretty_assertions::assert_eq;
    use story::recording::MapCommand;
    use story::{ActiveChapter, Direction, StepEvent, StoryConfig, StoryError};

    use super::{ReplayStep, chapter_row, parse_layer, replay};

    const CONFIG: &str = r#"{
        "chapters": [
            {"id": "intro", "location": {"center": [-73.95, 40.80], "zoom": 12},
             "rotateAnimation": true, "callback": "chart",
             "onChapterEnter": [{"layer": "poi-labels", "opacity": 1, "duration": 300}]},
            {"id": "outro", "location": {"center": [-73.94, 40.81], "zoom": 14},
             "mapAnimation": "easeTo"}
        ]
    }"#;

    #[test]
    fn parses_steps() {
        assert_eq!(ReplayStep::parse("settle"), Ok(ReplayStep::Settle));
        assert_eq!(
            ReplayStep::parse("up-exit:a"),
            Ok(ReplayStep::Step(StepEvent::exit("a", Direction::Up)))
        );
        assert!(ReplayStep::parse("scroll:a").is_err());
        assert!(ReplayStep::parse("enter:").is_err());
        assert!(ReplayStep::parse("intro").is_err());
    }

    #[test]
    fn parses_layers() {
        assert_eq!(parse_layer("water=fill"), Ok(StyleLayer::new("water", "fill")));
        assert!(parse_layer("water").is_err());
        assert!(parse_layer("=fill").is_err());
    }

    #[test]
    fn chapter_rows_show_presentation_class() {
        let config = StoryConfig::from_json(CONFIG).unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(
            chapter_row(0, registry.first()),
            "  0  intro                    FlyTo [-73.95000, 40.80000] z12.0 b0 p0 centered rotate callback=chart"
        );
    }

    #[test]
    fn replays_a_short_story() {
        let config = StoryConfig::from_json(CONFIG).unwrap();
        let steps: Vec<_> = ["enter:intro", "settle", "exit:intro", "enter:outro"]
            .into_iter()
            .map(|s| ReplayStep::parse(s).unwrap())
            .collect();
        let report = replay(
            &config,
            vec![StyleLayer::new("poi-labels", "symbol")],
            &["chart".to_string()],
            &steps,
        )
        .unwrap();

        let ops: Vec<_> = report
            .commands
            .iter()
            .map(|c| match c {
                MapCommand::FlyTo { .. } => "flyTo",
                MapCommand::EaseTo { .. } => "easeTo",
                MapCommand::JumpTo { .. } => "jumpTo",
                MapCommand::RotateTo { .. } => "rotateTo",
                MapCommand::SetPaintProperty { .. } => "setPaintProperty",
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                "flyTo",
                "setPaintProperty",
                "setPaintProperty",
                "setPaintProperty",
                "setPaintProperty",
                "rotateTo",
                "easeTo",
            ]
        );
        assert_eq!(report.markers.len(), 3);
        assert_eq!(report.journal.len(), 3);
        assert_eq!(report.state, ActiveChapter::Active("outro".to_string()));
        assert_eq!(report.active_elements, vec!["outro".to_string()]);
    }

    #[test]
    fn missing_style_layer_blocks_replay() {
        let config = StoryConfig::from_json(CONFIG).unwrap();
        let err = replay(&config, Vec::new(), &["chart".to_string()], &[]).unwrap_err();
        assert!(matches!(err, StoryError::Opacity(_)));
    }
}
