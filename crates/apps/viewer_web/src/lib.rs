use console_error_panic_hook::set_once;
use serde::Serialize;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use foundation::geo::LngLat;
use story::{
    CallbackTable, Chapter, Direction, StepEvent, StepTrackerOptions, StoryConfig, Synchronizer,
    transform_request,
};

mod bindings;
mod page;
use bindings::{story_create_map, story_create_marker, story_create_scroller};
use page::{DomSteps, JsMap, JsMarker, ScrollamaTracker, to_js};

type PageStory = Synchronizer<JsMap, JsMarker, DomSteps>;

thread_local! {
    static STORY: RefCell<Option<PageStory>> = const { RefCell::new(None) };
}

/// Element id of the map container.
const MAP_CONTAINER: &str = "map";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapOptions<'a> {
    container: &'a str,
    style: &'a str,
    center: LngLat,
    zoom: f64,
    bearing: f64,
    pitch: f64,
    interactive: bool,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn start() {
    set_once();
}

/// Creates the map and hands scrolling over to the story.
///
/// `config` is the story config object; `callbacks` maps the callback names
/// chapters use to functions, each called with the chapter id. Layers the
/// page adds itself must be in place by the map's `load` event, because the
/// story checks every layer it fades before scrolling takes over.
#[wasm_bindgen(js_name = startStory)]
pub fn start_story(config: JsValue, callbacks: JsValue) -> Result<(), JsValue> {
    let json = js_sys::JSON::stringify(&config)?
        .as_string()
        .ok_or_else(|| js_err("story config is not a JSON object"))?;
    let config = StoryConfig::from_json(&json).map_err(js_err)?;
    let callbacks = callback_table(&callbacks)?;

    let pose = config
        .initial_pose()
        .ok_or_else(|| js_err("story has no chapters"))?;
    let options = to_js(&MapOptions {
        container: MAP_CONTAINER,
        style: &config.style,
        center: pose.center,
        zoom: pose.zoom,
        bearing: pose.bearing,
        pitch: pose.pitch,
        interactive: false,
    })?;
    let transform = Closure::<dyn Fn(String) -> Result<JsValue, JsValue>>::new(|url: String| {
        to_js(&serde_json::json!({ "url": transform_request(&url) }))
    });
    js_sys::Reflect::set(
        &options,
        &JsValue::from_str("transformRequest"),
        &transform.into_js_value(),
    )?;
    let map = story_create_map(&options, &config.access_token)?;

    let marker = if config.show_markers {
        Some(JsMarker::new(story_create_marker(
            &map,
            &config.marker_color,
            &to_js(&pose.center)?,
        )?))
    } else {
        None
    };

    let sync = Synchronizer::from_config(
        &config,
        JsMap::new(map.clone()),
        marker,
        DomSteps::new()?,
        callbacks,
    )
    .map_err(js_err)?;
    STORY.with(|story| *story.borrow_mut() = Some(sync));

    let on_load = Closure::once_into_js(|| {
        if let Err(err) = on_map_load() {
            web_sys::console::error_2(&JsValue::from_str("story disabled:"), &err);
            STORY.with(|story| *story.borrow_mut() = None);
        }
    });
    map.on("load", &on_load);
    Ok(())
}

fn callback_table(hooks: &JsValue) -> Result<CallbackTable, JsValue> {
    let mut table = CallbackTable::new();
    if hooks.is_undefined() || hooks.is_null() {
        return Ok(table);
    }
    let object = hooks
        .dyn_ref::<js_sys::Object>()
        .ok_or_else(|| js_err("callbacks must be an object"))?;
    for entry in js_sys::Object::entries(object).iter() {
        let pair: js_sys::Array = entry.unchecked_into();
        let name = pair
            .get(0)
            .as_string()
            .ok_or_else(|| js_err("callback name is not a string"))?;
        let hook: js_sys::Function = pair
            .get(1)
            .dyn_into()
            .map_err(|_| js_err(format!("callback `{name}` is not a function")))?;
        table.register(name, move |chapter: &Chapter| {
            if let Err(err) = hook.call1(&JsValue::NULL, &JsValue::from_str(&chapter.id)) {
                web_sys::console::error_2(&JsValue::from_str("story callback failed:"), &err);
            }
        });
    }
    Ok(table)
}

fn on_map_load() -> Result<(), JsValue> {
    STORY.with(|story| match story.borrow().as_ref() {
        Some(sync) => sync.preflight_layers().map_err(js_err),
        None => Err(js_err("story not started")),
    })?;

    let scroller = story_create_scroller()?;
    scroller.setup(&to_js(&StepTrackerOptions::default())?);

    let enter = Closure::<dyn FnMut(JsValue)>::new(|response: JsValue| {
        dispatch(&response, StepEvent::enter);
    });
    scroller.on_step_enter(&enter.into_js_value());
    let exit = Closure::<dyn FnMut(JsValue)>::new(|response: JsValue| {
        dispatch(&response, StepEvent::exit);
    });
    scroller.on_step_exit(&exit.into_js_value());

    let mut tracker = ScrollamaTracker::new(scroller);
    let resize = Closure::<dyn FnMut()>::new(move || {
        STORY.with(|story| {
            if let Some(sync) = story.borrow().as_ref() {
                sync.relayout(&mut tracker);
            }
        });
    });
    let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
    window.add_event_listener_with_callback("resize", resize.into_js_value().unchecked_ref())?;
    Ok(())
}

/// Forwards a scrollama response. A failure means the page and the story
/// disagree, so the story stops driving the map.
fn dispatch(response: &JsValue, make: fn(String, Direction) -> StepEvent) {
    let event = match step_event(response, make) {
        Ok(event) => event,
        Err(err) => {
            web_sys::console::error_2(&JsValue::from_str("story: bad step response"), &err);
            return;
        }
    };

    STORY.with(|story| {
        let Ok(mut guard) = story.try_borrow_mut() else {
            web_sys::console::warn_1(&JsValue::from_str("story: re-entrant step event dropped"));
            return;
        };
        let Some(sync) = guard.as_mut() else {
            return;
        };
        if let Err(err) = sync.handle(&event) {
            web_sys::console::error_1(&js_err(format!("story stopped: {err}")));
            *guard = None;
        }
    });
}

fn step_event(
    response: &JsValue,
    make: fn(String, Direction) -> StepEvent,
) -> Result<StepEvent, JsValue> {
    let element: web_sys::Element =
        js_sys::Reflect::get(response, &JsValue::from_str("element"))?.dyn_into()?;
    let direction = match js_sys::Reflect::get(response, &JsValue::from_str("direction"))?
        .as_string()
        .as_deref()
    {
        Some("up") => Direction::Up,
        _ => Direction::Down,
    };
    Ok(make(element.id(), direction))
}
