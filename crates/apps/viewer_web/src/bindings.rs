//! Imports from the page: mapbox-gl and scrollama.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type MapboxMap;

    #[wasm_bindgen(method, js_name = flyTo)]
    pub fn fly_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = easeTo)]
    pub fn ease_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = jumpTo)]
    pub fn jump_to(this: &MapboxMap, options: &JsValue);

    #[wasm_bindgen(method, js_name = rotateTo)]
    pub fn rotate_to(this: &MapboxMap, bearing: f64, options: &JsValue);

    #[wasm_bindgen(method, js_name = getBearing)]
    pub fn get_bearing(this: &MapboxMap) -> f64;

    #[wasm_bindgen(method, js_name = getLayer)]
    pub fn get_layer(this: &MapboxMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = getStyle)]
    pub fn get_style(this: &MapboxMap) -> JsValue;

    #[wasm_bindgen(method, js_name = setPaintProperty)]
    pub fn set_paint_property(this: &MapboxMap, layer: &str, name: &str, value: &JsValue);

    #[wasm_bindgen(method)]
    pub fn on(this: &MapboxMap, event: &str, handler: &JsValue);

    #[wasm_bindgen(method)]
    pub fn once(this: &MapboxMap, event: &str, handler: &JsValue);

    pub type MapboxMarker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &MapboxMarker, lng_lat: &JsValue);

    pub type Scroller;

    #[wasm_bindgen(method)]
    pub fn setup(this: &Scroller, options: &JsValue);

    #[wasm_bindgen(method, js_name = onStepEnter)]
    pub fn on_step_enter(this: &Scroller, handler: &JsValue);

    #[wasm_bindgen(method, js_name = onStepExit)]
    pub fn on_step_exit(this: &Scroller, handler: &JsValue);

    #[wasm_bindgen(method)]
    pub fn resize(this: &Scroller);
}

#[wasm_bindgen(inline_js = "
export function story_create_map(options, accessToken) {
    mapboxgl.accessToken = accessToken;
    return new mapboxgl.Map(options);
}

export function story_create_marker(map, color, lngLat) {
    return new mapboxgl.Marker({ color: color }).setLngLat(lngLat).addTo(map);
}

export function story_create_scroller() {
    return scrollama();
}
")]
extern "C" {
    #[wasm_bindgen(catch)]
    pub fn story_create_map(options: &JsValue, access_token: &str) -> Result<MapboxMap, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn story_create_marker(
        map: &MapboxMap,
        color: &str,
        lng_lat: &JsValue,
    ) -> Result<MapboxMarker, JsValue>;

    #[wasm_bindgen(catch)]
    pub fn story_create_scroller() -> Result<Scroller, JsValue>;
}
