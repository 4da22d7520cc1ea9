use crate::schema::fields::{ADDRESS_FIELD, LATITUDE_FIELD, LONGITUDE_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered attribute map of a feature
pub type AttributeMap = serde_json::Map<String, Value>;

/// Spatial reference id for WGS84 longitude/latitude
pub const WGS84_WKID: u32 = 4326;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// Point geometry; `x` is longitude and `y` latitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

impl Geometry {
    pub fn wgs84(latitude: f64, longitude: f64) -> Self {
        Self {
            x: longitude,
            y: latitude,
            spatial_reference: SpatialReference { wkid: WGS84_WKID },
        }
    }

    pub fn latitude(&self) -> f64 {
        self.y
    }

    pub fn longitude(&self) -> f64 {
        self.x
    }
}

/// A record as exchanged with the feature store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub attributes: AttributeMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(attributes: AttributeMap) -> Self {
        Self {
            attributes,
            geometry: None,
        }
    }

    /// Object id from `OBJECTID` or `ObjectId`, whichever is set.
    pub fn object_id(&self) -> Option<i64> {
        ["OBJECTID", "ObjectId"]
            .iter()
            .filter_map(|k| self.attributes.get(*k))
            .find_map(|v| match v {
                Value::Number(n) => n.as_i64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
    }

    pub fn text(&self, field: &str) -> String {
        self.attributes.get(field).map(display_text).unwrap_or_default()
    }
}

/// Address and coordinates picked from a geocoder suggestion, not yet saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingGeocode {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl PendingGeocode {
    pub fn new(address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            address: address.into(),
            lat,
            lng,
        }
    }

    /// Value the pending geocode supplies for a custom field, if any.
    pub(crate) fn value_for(&self, field: &str) -> Option<Value> {
        match field {
            ADDRESS_FIELD => Some(Value::String(self.address.trim().to_string())),
            LATITUDE_FIELD => Some(coordinate_value(self.lat)),
            LONGITUDE_FIELD => Some(coordinate_value(self.lng)),
            _ => None,
        }
    }
}

fn coordinate_value(v: f64) -> Value {
    serde_json::Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(v.to_string()))
}

/// Text form of an attribute value. Null becomes the empty string.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Whether a service flag value counts as "on": the number 1, the string
/// `"1"` or boolean true.
pub fn flag_is_on(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim() == "1",
        _ => false,
    }
}
