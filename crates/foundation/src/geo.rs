use serde::{Deserialize, Serialize};

/// Web-mercator zoom range accepted by the map.
pub const MAX_ZOOM: f64 = 24.0;
/// Steepest camera pitch the map renders (degrees).
pub const MAX_PITCH_DEG: f64 = 85.0;

/// Geographic coordinate in degrees.
///
/// Serialized as a `[lon, lat]` pair, the order map styles and GeoJSON use.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lon: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

impl From<[f64; 2]> for LngLat {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lon, p.lat]
    }
}

/// Map viewport: where the camera looks and from which angle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub center: LngLat,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub pitch: f64,
}

impl CameraPose {
    pub const fn new(center: LngLat, zoom: f64, bearing: f64, pitch: f64) -> Self {
        Self {
            center,
            zoom,
            bearing,
            pitch,
        }
    }

    /// Returns a description of the first out-of-range component, if any.
    pub fn validate(&self) -> Result<(), String> {
        if !self.center.is_valid() {
            return Err(format!(
                "center [{}, {}] is not a valid longitude/latitude",
                self.center.lon, self.center.lat
            ));
        }
        if !self.zoom.is_finite() || !(0.0..=MAX_ZOOM).contains(&self.zoom) {
            return Err(format!("zoom {} outside 0..={MAX_ZOOM}", self.zoom));
        }
        if !self.bearing.is_finite() {
            return Err(format!("bearing {} is not finite", self.bearing));
        }
        if !self.pitch.is_finite() || !(0.0..=MAX_PITCH_DEG).contains(&self.pitch) {
            return Err(format!("pitch {} outside 0..={MAX_PITCH_DEG}", self.pitch));
        }
        Ok(())
    }
}
