//! Browser implementations of the story's collaborator traits.

use foundation::geo::{CameraPose, LngLat};
use foundation::time::Easing;
use layers::{PaintSurface, PaintValue, StyleLayer};
use serde::Serialize;
use story::{MapSurface, Marker, MoveEndHandler, RotateOptions, StepElements, StepTracker};
use wasm_bindgen::prelude::*;

use crate::bindings::{MapboxMap, MapboxMarker, Scroller};

/// Converts through JSON; mapbox option objects are plain data.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

/// For trait methods that cannot fail: logs the error and skips the call.
fn encoded<T: Serialize + ?Sized>(value: &T, what: &str) -> Option<JsValue> {
    to_js(value)
        .map_err(|err| {
            web_sys::console::error_2(&JsValue::from_str(&format!("story: cannot encode {what}")), &err)
        })
        .ok()
}

fn set_field(target: &js_sys::Object, key: &str, value: &JsValue) {
    if let Err(err) = js_sys::Reflect::set(target, &JsValue::from_str(key), value) {
        web_sys::console::error_2(&JsValue::from_str(&format!("story: cannot set `{key}`")), &err);
    }
}

pub struct JsMap {
    map: MapboxMap,
}

impl JsMap {
    pub fn new(map: MapboxMap) -> Self {
        Self { map }
    }
}

impl PaintSurface for JsMap {
    fn layer_type(&self, layer: &str) -> Option<String> {
        let found = self.map.get_layer(layer);
        if found.is_undefined() || found.is_null() {
            return None;
        }
        js_sys::Reflect::get(&found, &JsValue::from_str("type"))
            .ok()
            .and_then(|t| t.as_string())
    }

    fn set_paint_property(&mut self, layer: &str, property: &str, value: PaintValue) {
        if let Some(value) = encoded(&value, property) {
            self.map.set_paint_property(layer, property, &value);
        }
    }
}

impl MapSurface for JsMap {
    fn fly_to(&mut self, pose: &CameraPose) {
        if let Some(options) = encoded(pose, "camera pose") {
            self.map.fly_to(&options);
        }
    }

    fn ease_to(&mut self, pose: &CameraPose) {
        if let Some(options) = encoded(pose, "camera pose") {
            self.map.ease_to(&options);
        }
    }

    fn jump_to(&mut self, pose: &CameraPose) {
        if let Some(options) = encoded(pose, "camera pose") {
            self.map.jump_to(&options);
        }
    }

    fn rotate_to(&mut self, bearing: f64, options: RotateOptions) {
        let js_options = js_sys::Object::new();
        set_field(
            &js_options,
            "duration",
            &JsValue::from_f64(options.duration.0 as f64),
        );
        if options.easing == Easing::Linear {
            let linear = js_sys::Function::new_with_args("t", "return t;");
            set_field(&js_options, "easing", &linear);
        }
        self.map.rotate_to(bearing, &js_options);
    }

    fn bearing(&self) -> f64 {
        self.map.get_bearing()
    }

    fn style_layers(&self) -> Vec<StyleLayer> {
        let style = self.map.get_style();
        let layers = js_sys::Reflect::get(&style, &JsValue::from_str("layers"))
            .and_then(|l| js_sys::JSON::stringify(&l))
            .map(|json| json.as_string().unwrap_or_default());
        match layers.map(|json| serde_json::from_str::<Vec<StyleLayer>>(&json)) {
            Ok(Ok(layers)) => layers,
            Ok(Err(e)) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "story: unreadable style layers: {e}"
                )));
                Vec::new()
            }
            Err(err) => {
                web_sys::console::warn_2(&JsValue::from_str("story: no style layers"), &err);
                Vec::new()
            }
        }
    }

    fn once_move_end(&mut self, handler: MoveEndHandler) {
        let map = self.map.clone();
        let callback = Closure::once_into_js(move || {
            let mut surface = JsMap::new(map);
            let surface: &mut dyn MapSurface = &mut surface;
            handler(surface);
        });
        self.map.once("moveend", &callback);
    }
}

pub struct JsMarker {
    marker: MapboxMarker,
}

impl JsMarker {
    pub fn new(marker: MapboxMarker) -> Self {
        Self { marker }
    }
}

impl Marker for JsMarker {
    fn set_lng_lat(&mut self, at: LngLat) {
        if let Some(at) = encoded(&at, "marker position") {
            self.marker.set_lng_lat(&at);
        }
    }
}

/// Chapter cards, found by element id.
pub struct DomSteps {
    document: web_sys::Document,
}

impl DomSteps {
    pub fn new() -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { document })
    }
}

impl StepElements for DomSteps {
    fn set_active(&mut self, id: &str, active: bool) {
        let Some(element) = self.document.get_element_by_id(id) else {
            web_sys::console::warn_1(&JsValue::from_str(&format!("story: no element #{id}")));
            return;
        };
        let classes = element.class_list();
        let result = if active {
            classes.add_1("active")
        } else {
            classes.remove_1("active")
        };
        if let Err(err) = result {
            web_sys::console::warn_1(&err);
        }
    }
}

pub struct ScrollamaTracker {
    scroller: Scroller,
}

impl ScrollamaTracker {
    pub fn new(scroller: Scroller) -> Self {
        Self { scroller }
    }
}

impl StepTracker for ScrollamaTracker {
    fn resize(&mut self) {
        self.scroller.resize();
    }
}
