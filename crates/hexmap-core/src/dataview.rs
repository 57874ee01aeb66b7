//! Host payload shapes delivered on every update.
//!
//! These mirror the JSON a report host hands to a visual: a list of data views (only the first
//! one is read), each with column metadata and an optional categorical projection. Every field
//! the host may omit is optional here so malformed payloads still deserialize and can be
//! rejected gracefully by the view-model builder instead of at the JSON boundary.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualUpdateOptions {
    #[serde(default)]
    pub data_views: Vec<DataView>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl VisualUpdateOptions {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Accepts either a full update payload or a bare data view.
    ///
    /// A bare data view is wrapped with the given viewport.
    pub fn from_json_lenient(text: &str, viewport: Viewport) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let is_update = value
            .as_object()
            .is_some_and(|o| o.contains_key("dataViews") || o.contains_key("viewport"));
        if is_update {
            let mut options: Self = serde_json::from_value(value)?;
            if options.viewport.is_empty() {
                options.viewport = viewport;
            }
            return Ok(options);
        }
        let data_view: DataView = serde_json::from_value(value)?;
        Ok(Self {
            data_views: vec![data_view],
            viewport,
        })
    }

    pub fn first_data_view(&self) -> Option<&DataView> {
        self.data_views.first()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataView {
    #[serde(default)]
    pub metadata: DataViewMetadata,
    #[serde(default)]
    pub categorical: Option<DataViewCategorical>,
}

impl DataView {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Persisted property-pane objects for `name`, e.g. `dataPoint`.
    pub fn object(&self, name: &str) -> Option<&Value> {
        self.metadata.objects.as_ref()?.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataViewMetadata {
    #[serde(default)]
    pub columns: Vec<DataViewColumn>,
    #[serde(default)]
    pub objects: Option<serde_json::Map<String, Value>>,
}

impl DataViewMetadata {
    /// First metadata column bound to `role`.
    pub fn column_for_role(&self, role: &str) -> Option<&DataViewColumn> {
        self.columns.iter().find(|c| c.has_role(role))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataViewColumn {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub query_name: Option<String>,
    #[serde(default)]
    pub roles: BTreeMap<String, bool>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueTypeDescriptor>,
}

impl DataViewColumn {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.get(role).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueTypeDescriptor {
    #[serde(default)]
    pub text: bool,
    #[serde(default)]
    pub numeric: bool,
    #[serde(default)]
    pub integer: bool,
    #[serde(default)]
    pub date_time: bool,
    #[serde(default)]
    pub bool: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataViewCategorical {
    #[serde(default)]
    pub categories: Option<Vec<CategoryColumn>>,
    #[serde(default)]
    pub values: Option<Vec<ValueColumn>>,
}

impl DataViewCategorical {
    /// Value columns grouped by series.
    ///
    /// Series grouping is not supported, so every value column lands in one group.
    pub fn grouped(&self) -> Vec<ValueColumnGroup<'_>> {
        match self.values.as_deref() {
            Some(values) => vec![ValueColumnGroup { values }],
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ValueColumnGroup<'a> {
    pub values: &'a [ValueColumn],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryColumn {
    #[serde(default)]
    pub source: Option<DataViewColumn>,
    #[serde(default)]
    pub values: Vec<PrimitiveValue>,
    #[serde(default)]
    pub identity: Option<Vec<ScopeIdentity>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeIdentity {
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueColumn {
    #[serde(default)]
    pub source: DataViewColumn,
    #[serde(default)]
    pub values: Vec<PrimitiveValue>,
}

impl ValueColumn {
    /// Cell at `row`; rows past the end of a short column read as null.
    pub fn value_at(&self, row: usize) -> &PrimitiveValue {
        static NULL: PrimitiveValue = PrimitiveValue::Null;
        self.values.get(row).unwrap_or(&NULL)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl PrimitiveValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// Label used for region matching. Numbers and booleans never name a region but are kept
    /// as text so they still show up in diagnostics.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(v) => {
                let mut b = ryu_js::Buffer::new();
                Some(b.format(*v).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitive_values_deserialize_untagged() {
        let v: Vec<PrimitiveValue> =
            serde_json::from_value(json!([null, true, 3.5, "Texas"])).unwrap();
        assert_eq!(
            v,
            vec![
                PrimitiveValue::Null,
                PrimitiveValue::Bool(true),
                PrimitiveValue::Number(3.5),
                PrimitiveValue::Text("Texas".to_string()),
            ]
        );
    }

    #[test]
    fn lenient_parse_wraps_bare_data_view() {
        let text = r#"{"metadata":{"columns":[]},"categorical":{"categories":[]}}"#;
        let options =
            VisualUpdateOptions::from_json_lenient(text, Viewport::new(400.0, 300.0)).unwrap();
        assert_eq!(options.data_views.len(), 1);
        assert_eq!(options.viewport, Viewport::new(400.0, 300.0));
    }

    #[test]
    fn short_value_columns_read_as_null() {
        let col = ValueColumn {
            source: DataViewColumn::default(),
            values: vec![PrimitiveValue::Number(1.0)],
        };
        assert_eq!(col.value_at(0), &PrimitiveValue::Number(1.0));
        assert!(col.value_at(5).is_null());
    }
}
