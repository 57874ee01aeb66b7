//! User-configured visual options, read from the persisted `dataPoint` object on every update.

use crate::color::Rgb;
use crate::dataview::DataView;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATA_POINT_OBJECT: &str = "dataPoint";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPointSettings {
    pub high_color: Rgb,
    pub low_color: Rgb,
    pub outline_color: Rgb,
    pub show_text_labels: bool,
    pub font_color: Rgb,
    pub font_size: f64,
}

impl Default for DataPointSettings {
    fn default() -> Self {
        Self {
            high_color: Rgb::new(0x01, 0xb8, 0xaa),
            low_color: Rgb::new(0xe8, 0xf6, 0xf5),
            outline_color: Rgb::new(0xff, 0xff, 0xff),
            show_text_labels: true,
            font_color: Rgb::new(0x00, 0x00, 0x00),
            font_size: 12.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HexmapSettings {
    pub data_point: DataPointSettings,
}

impl HexmapSettings {
    /// Settings from the data view's persisted objects, or defaults when there is no data view.
    pub fn parse(data_view: Option<&DataView>) -> Self {
        let object = data_view.and_then(|dv| dv.object(DATA_POINT_OBJECT));
        Self {
            data_point: object
                .map(DataPointSettings::from_object)
                .unwrap_or_default(),
        }
    }
}

impl DataPointSettings {
    /// Reads each property independently; a missing or invalid property keeps its default.
    pub fn from_object(object: &Value) -> Self {
        let defaults = Self::default();
        Self {
            high_color: read_color(object, "highColor").unwrap_or(defaults.high_color),
            low_color: read_color(object, "lowColor").unwrap_or(defaults.low_color),
            outline_color: read_color(object, "outlineColor").unwrap_or(defaults.outline_color),
            show_text_labels: object
                .get("showTextLabels")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.show_text_labels),
            font_color: read_color(object, "fontColor").unwrap_or(defaults.font_color),
            font_size: object
                .get("fontSize")
                .and_then(Value::as_f64)
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(defaults.font_size),
        }
    }
}

/// Accepts a plain color string or the host fill shape `{"solid": {"color": "..."}}`.
fn read_color(object: &Value, property: &str) -> Option<Rgb> {
    let raw = object.get(property)?;
    let text = raw
        .as_str()
        .or_else(|| raw.get("solid")?.get("color")?.as_str())?;
    match Rgb::parse(text) {
        Ok(color) => Some(color),
        Err(err) => {
            tracing::warn!(property, %err, "ignoring invalid color setting");
            None
        }
    }
}
